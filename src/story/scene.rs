//! Heuristic extraction of a scene description and player choices from
//! one block of generated text.
//!
//! The text model is instructed to reply with `SCENE:` and `CHOICES:`
//! markers, but models drift: sometimes only one marker shows up,
//! sometimes neither and the choices are just trailing numbered lines.
//! This parser is a total function over arbitrary input; it always
//! produces a usable result and signals nothing to the caller.

use std::sync::LazyLock;

use regex::Regex;

const SCENE_MARKER: &str = "SCENE:";
const CHOICE_MARKER: &str = "CHOICES:";

const EMPTY_SCENE_PLACEHOLDER: &str = "(No scene description provided)";

// How many trailing lines to inspect when hunting for an unmarked
// choice block
const CHOICE_LOOKBACK_LINES: usize = 4;

/// Lines that look like a numbered choice: `1.` through `5.` after
/// trimming.
static NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-5]\.").expect("invalid numbered line pattern"));

#[derive(Debug, PartialEq)]
pub struct ParsedScene {
    pub scene: String,
    pub choices: Vec<String>,
}

/// Split one generated reply into a scene description and the choices
/// that follow it. Markers win when present; otherwise a run of
/// trailing numbered lines is treated as the choice block. An empty
/// scene is replaced with a placeholder so the scene text is never
/// empty.
pub fn parse(raw: &str) -> ParsedScene {
    let scene_idx = raw.find(SCENE_MARKER);
    let choice_idx = raw.find(CHOICE_MARKER);

    let (scene_part, choices_part) = match (scene_idx, choice_idx) {
        (_, Some(c)) => {
            let choices = raw[c + CHOICE_MARKER.len()..].trim().to_string();
            let prefix = &raw[..c];
            let scene = match scene_idx {
                // Only honor a SCENE: marker that precedes CHOICES:
                Some(s) if s < c => prefix[s + SCENE_MARKER.len()..].trim().to_string(),
                _ => prefix.trim().to_string(),
            };
            (scene, choices)
        }
        (Some(s), None) => {
            let scene = raw[s + SCENE_MARKER.len()..].trim().to_string();
            split_trailing_choices(&scene)
        }
        (None, None) => split_trailing_choices(raw.trim()),
    };

    let scene = if scene_part.is_empty() {
        EMPTY_SCENE_PLACEHOLDER.to_string()
    } else {
        scene_part
    };

    ParsedScene {
        scene,
        choices: parse_choices(&choices_part),
    }
}

/// Look for a run of numbered lines at the end of the text, scanning
/// backward over at most the last `CHOICE_LOOKBACK_LINES` lines.
/// Trailing non-numbered lines are skipped until a numbered line is
/// seen; the first non-numbered line after that ends the run. Returns
/// (scene, choices) with the choices block possibly empty.
fn split_trailing_choices(text: &str) -> (String, String) {
    let lines: Vec<&str> = text.split('\n').collect();
    let window_start = lines.len().saturating_sub(CHOICE_LOOKBACK_LINES);

    let mut run_start: Option<usize> = None;
    for i in (window_start..lines.len()).rev() {
        if NUMBERED_LINE.is_match(lines[i].trim()) {
            run_start = Some(i);
        } else if run_start.is_some() {
            break;
        }
    }

    match run_start {
        Some(start) => (
            lines[..start].join("\n").trim().to_string(),
            lines[start..].join("\n"),
        ),
        None => (text.to_string(), String::new()),
    }
}

/// Extract choice texts from a choices block. Numbered lines give up
/// everything before their first period; when no line parses that way
/// the non-empty lines are taken verbatim.
fn parse_choices(block: &str) -> Vec<String> {
    if block.trim().is_empty() {
        return Vec::new();
    }

    let choices: Vec<String> = block
        .lines()
        .filter(|line| !line.trim().is_empty() && line.contains('.'))
        .filter_map(|line| {
            let (_, rest) = line.split_once('.')?;
            let rest = rest.trim();
            (!rest.is_empty()).then(|| rest.to_string())
        })
        .collect();

    if choices.is_empty() {
        tracing::warn!("Could not parse numbered choices from: {}", block);
        return block
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.trim().to_string())
            .collect();
    }

    choices
}
