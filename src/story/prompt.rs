//! Prompts handed to the generation backends.

/// Ruleset given to the text model as the system message. Every
/// transcript starts with this (or a caller-supplied override) and the
/// scene parser is built around the output format it demands.
pub const SYSTEM_PROMPT: &str = r#"You are an AI Dungeon Master creating a dynamic choose-your-own-adventure story.
Follow these instructions precisely:
1. Narrate vividly: describe scenes, characters, and events with engaging sensory detail. Keep descriptions concise but atmospheric (2-4 paragraphs).
2. Maintain coherence: the story must follow logically from the player's previous choices and the established narrative. Remember key details.
3. Offer choices: after describing the scene, ALWAYS provide 3 distinct, numbered choices for the player. Each choice should lead to a different, meaningful consequence or path.
4. Format the output STRICTLY as:
SCENE:
[Narrative description for the current scene.]

CHOICES:
1. [First choice]
2. [Second choice]
3. [Third choice]
Do NOT add any extra text, greetings, or commentary outside this structure.
"#;

const IMAGE_STYLE_PREFIX: &str =
    "Digital painting, dark fantasy atmosphere, illustration for a choose your own adventure game: ";

// Image backends reject prompts much past this length
const MAX_IMAGE_PROMPT_LEN: usize = 950;

/// Build the illustration prompt for a scene. Long scenes are cut at
/// the last sentence (or word) boundary that fits under the backend's
/// prompt limit.
pub fn image_prompt(scene: &str) -> String {
    let prompt = format!("{}{}", IMAGE_STYLE_PREFIX, scene);
    if prompt.len() <= MAX_IMAGE_PROMPT_LEN {
        return prompt;
    }
    let mut cut = MAX_IMAGE_PROMPT_LEN;
    while !prompt.is_char_boundary(cut) {
        cut -= 1;
    }
    let head = &prompt[..cut];
    let end = head.rfind('.').or_else(|| head.rfind(' ')).unwrap_or(cut);
    format!("{}...", prompt[..end].trim_end())
}
