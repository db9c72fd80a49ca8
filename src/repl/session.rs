//! REPL session management

use std::path::Path;

use colored::Colorize;
use eyre::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::warn;

use crate::pipeline::CampaignRequest;
use crate::progress::ProgressSink;
use crate::render;
use crate::session::{BriefSession, RevisionResult};

/// Prints progress lines as the pipeline reports them
struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn notify(&self, message: &str) {
        println!("{}", message.dimmed());
    }
}

/// Interactive REPL session
pub struct ReplSession {
    session: BriefSession,
}

impl ReplSession {
    pub fn new(session: BriefSession) -> Self {
        Self { session }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self, initial: Option<CampaignRequest>) -> Result<()> {
        self.print_welcome();

        if let Some(request) = initial {
            self.generate(request).await;
        }

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let prompt = if self.session.current_brief().is_some() {
                "feedback>"
            } else {
                "objective>"
            };
            match rl.readline(&format!("{} ", prompt.bright_green())) {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input) {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else if self.session.current_brief().is_none() {
                        self.generate(CampaignRequest::new(input)).await;
                    } else {
                        self.revise(input).await;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Briefwright Interactive Session".bright_cyan().bold());
        println!("Session: {}", self.session.id().to_string().dimmed());
        println!("Type a campaign objective to generate a brief, then feedback to revise it.");
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    async fn generate(&mut self, request: CampaignRequest) {
        match self.session.generate(request, &ConsoleSink).await {
            Ok(brief) => {
                println!();
                print!("{}", render::brief_text(brief));
            }
            Err(e) => {
                warn!(error = %e, "Brief generation failed");
                println!("{} {}", "Error:".red(), e);
            }
        }
        println!();
    }

    async fn revise(&mut self, feedback: &str) {
        match self.session.revise(feedback, None).await {
            Ok(RevisionResult::NoSectionsDetected) => {
                println!(
                    "{}",
                    "Couldn't tell which part of the brief to change. Mention the analysis, strategy, creative or campaign details."
                        .yellow()
                );
            }
            Ok(RevisionResult::Revised {
                sections, changes, ..
            }) => {
                println!("{} {}", "Revised:".bright_cyan(), sections);
                print!("{}", render::changes_text(&changes));
            }
            Err(e) => {
                warn!(error = %e, "Revision failed");
                println!("{} {} (brief unchanged, try again)", "Error:".red(), e);
            }
        }
        println!();
    }

    fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");

        match cmd {
            "/help" | "/h" => {
                self.print_help();
                SlashResult::Continue
            }
            "/quit" | "/q" | "/exit" => SlashResult::Quit,
            "/brief" | "/b" => {
                match self.session.current_brief() {
                    Some(brief) => print!("{}", render::brief_text(brief)),
                    None => println!("{}", "No brief yet.".dimmed()),
                }
                SlashResult::Continue
            }
            "/history" => {
                print!("{}", render::history_text(self.session.history()));
                SlashResult::Continue
            }
            "/save" => {
                match parts.get(1) {
                    Some(path) => match self.save(Path::new(path)) {
                        Ok(()) => println!("{} Saved to {}", "✓".green(), path.cyan()),
                        Err(e) => println!("{} {:#}", "Error:".red(), e),
                    },
                    None => println!("Usage: /save FILE"),
                }
                SlashResult::Continue
            }
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
                SlashResult::Continue
            }
        }
    }

    /// Export the brief and its history as one JSON document
    fn save(&self, path: &Path) -> Result<()> {
        let brief = self
            .session
            .current_brief()
            .ok_or_else(|| eyre::eyre!("No brief to save yet"))?;
        let doc = serde_json::json!({
            "session": self.session.id(),
            "brief": brief,
            "history": self.session.history(),
        });
        std::fs::write(path, serde_json::to_string_pretty(&doc)?)
            .context(format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:14} Show this help", "/help".yellow());
        println!("  {:14} Exit the session", "/quit".yellow());
        println!("  {:14} Show the current brief", "/brief".yellow());
        println!("  {:14} Show revision history", "/history".yellow());
        println!("  {:14} Save brief and history as JSON", "/save FILE".yellow());
        println!();
        println!("Anything else is a campaign objective (no brief yet) or feedback.");
        println!();
    }
}

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}
