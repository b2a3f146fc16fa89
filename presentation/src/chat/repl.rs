//! REPL (Read-Eval-Print Loop) for the interactive interview.
//!
//! This is the transport collaborator: it submits each line to the
//! session router and prints the streamed response chunks in arrival
//! order. One REPL drives one session.

use crate::output::console::ConsoleFormatter;
use blueprint_application::SessionRouter;
use blueprint_domain::TurnEvent;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;
use std::time::Duration;

/// Session id used by the single-user REPL transport.
const SESSION_ID: &str = "local";

/// Interactive interview REPL
pub struct ChatRepl {
    router: Arc<SessionRouter>,
    show_progress: bool,
}

impl ChatRepl {
    pub fn new(router: Arc<SessionRouter>) -> Self {
        Self {
            router,
            show_progress: true,
        }
    }

    /// Set whether to show a spinner while a turn is in flight
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run the interactive REPL, optionally seeding it with an opening
    /// message from the command line.
    pub async fn run(&self, opening: Option<String>) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|p| p.join("blueprint").join("history.txt"));
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        if let Some(message) = opening {
            let _ = rl.add_history_entry(&message);
            self.process_message(&message).await;
        }

        loop {
            let readline = rl.readline(">>> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);
                    self.process_message(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    /// Submit one message and print the streamed response.
    async fn process_message(&self, message: &str) {
        let spinner = if self.show_progress {
            Some(Self::spinner())
        } else {
            None
        };

        let mut stream = self.router.submit(SESSION_ID, message);
        let mut waiting = true;
        while let Some(event) = stream.next_event().await {
            match event {
                TurnEvent::Chunk(text) => {
                    if waiting {
                        if let Some(pb) = &spinner {
                            pb.finish_and_clear();
                        }
                        waiting = false;
                    }
                    println!("{}", text);
                    println!();
                }
                TurnEvent::Closed => break,
            }
        }

        if waiting {
            if let Some(pb) = &spinner {
                pb.finish_and_clear();
            }
        }
    }

    fn spinner() -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message("Thinking...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│        Blueprint - Design Interview         │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Describe the project you want to design, then answer the questions.");
        println!();
        println!("Commands:");
        println!("  /help      - Show this help");
        println!("  /progress  - Show interview progress");
        println!("  /doc       - Print the generated document");
        println!("  /save      - Save the generated document to a file");
        println!("  /quit      - Exit");
        println!();
    }

    /// Handle slash commands. Returns true if the REPL should exit.
    fn handle_command(&self, cmd: &str) -> bool {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                true
            }
            "/help" | "/h" | "/?" => {
                self.print_welcome();
                false
            }
            "/progress" | "/p" => {
                match self.router.snapshot(SESSION_ID) {
                    Some(session) => print!("{}", ConsoleFormatter::format_progress(&session)),
                    None => println!("No session yet - send a message first."),
                }
                false
            }
            "/doc" => {
                match self.router.snapshot(SESSION_ID).and_then(|s| s.final_doc().map(String::from)) {
                    Some(doc) => println!("{}", doc),
                    None => println!("No document yet - finish the interview and say \"generate\"."),
                }
                false
            }
            "/save" => {
                self.save_document();
                false
            }
            _ => {
                println!("{} {}", "Unknown command:".red(), cmd);
                false
            }
        }
    }

    fn save_document(&self) {
        let doc = self
            .router
            .snapshot(SESSION_ID)
            .and_then(|s| s.final_doc().map(String::from));
        match doc {
            Some(doc) => {
                let filename = ConsoleFormatter::document_filename(chrono::Local::now());
                match std::fs::write(&filename, doc) {
                    Ok(()) => println!("{} {}", "Saved:".green().bold(), filename),
                    Err(err) => println!("{} {}", "Save failed:".red(), err),
                }
            }
            None => println!("No document yet - finish the interview and say \"generate\"."),
        }
    }
}
