use std::path::Path;
use std::sync::{Arc, RwLock};

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::core::AppConfig;
use crate::r#gen::Gateway;
use crate::openai::OpenAiBackend;
use crate::story::{Orchestrator, SessionRegistry, TurnResult};

pub async fn run() -> Result<()> {
    let mut rl = DefaultEditor::new().expect("Editor failed");

    let config = AppConfig::default();
    let backend = if config.openai_api_key.is_empty() {
        println!("Warning: OPENAI_API_KEY is not set. Turns will fail until it is configured.");
        None
    } else {
        Some(OpenAiBackend::new(
            &config.openai_api_hostname,
            &config.openai_api_key,
        ))
    };
    let gateway = Gateway::new(
        backend,
        config.models(),
        config.max_attempts,
        Path::new(&config.audio_dir),
    );
    let registry = Arc::new(RwLock::new(SessionRegistry::new()));
    let orchestrator = Orchestrator::new(Arc::clone(&registry), gateway, &config.system_prompt);

    let session_id = {
        let mut registry = registry.write().expect("Unable to write session registry");
        registry.create(&config.system_prompt)
    };

    println!("Describe the adventure you want to play. Ctrl-C to quit.");
    let mut started = false;
    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let result = if started {
                    orchestrator.continue_turn(&session_id, line.as_str()).await
                } else {
                    orchestrator.begin_turn(&session_id, line.as_str()).await
                };
                match result {
                    Ok(turn) => {
                        started = true;
                        print_turn(&turn);
                    }
                    Err(err) => println!("Error: {}", err),
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

fn print_turn(turn: &TurnResult) {
    println!("\n{}\n", turn.scene);
    for (i, choice) in turn.choices.iter().enumerate() {
        println!("{}. {}", i + 1, choice);
    }
    if let Some(url) = &turn.image_url {
        println!("\n(Illustration: {})", url);
    }
    if let Some(path) = &turn.audio {
        println!("(Narration saved to {})", path.display());
    }
    for failure in &turn.errors {
        println!("({} generation failed: {})", failure.kind, failure.error);
    }
}
