//! Console output formatting for session snapshots and documents

use blueprint_domain::{Phase, Session};
use colored::Colorize;

/// Formats session state for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a progress overview of the session snapshot.
    pub fn format_progress(session: &Session) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}\n",
            "Phase:".cyan().bold(),
            session.phase()
        ));

        match session.intent() {
            Some(intent) => {
                output.push_str(&format!(
                    "{} {} ({})\n",
                    "Project:".cyan().bold(),
                    intent.project_name,
                    intent.scope
                ));
                if !intent.goals.is_empty() {
                    output.push_str(&format!(
                        "{} {}\n",
                        "Goals:".cyan().bold(),
                        intent.goals.join("; ")
                    ));
                }
            }
            None => output.push_str("No project intent captured yet.\n"),
        }

        if session.questions().is_empty() {
            output.push_str("No questions planned yet.\n");
        } else {
            output.push_str(&format!(
                "{} {}/{} answered\n",
                "Questions:".cyan().bold(),
                session.answered_count(),
                session.questions().len()
            ));
            for question in session.questions() {
                let marker = if question.is_answered() {
                    "x".green()
                } else {
                    " ".normal()
                };
                output.push_str(&format!(
                    "  [{}] [{}] {}\n",
                    marker,
                    question.category().yellow(),
                    question.text()
                ));
                if let Some(answer) = question.answer() {
                    output.push_str(&format!("        -> {}\n", answer.dimmed()));
                }
            }
        }

        if !session.extra_notes().is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Extra notes:".cyan().bold(),
                session.extra_notes().len()
            ));
        }

        let doc_status = match (session.phase(), session.final_doc()) {
            (_, Some(_)) => "generated".green().to_string(),
            (Phase::Synthesis, None) => "generation failed".red().to_string(),
            _ => "not generated".dimmed().to_string(),
        };
        output.push_str(&format!("{} {}\n", "Document:".cyan().bold(), doc_status));

        output
    }

    /// File name for a saved document, stamped with the given local time.
    pub fn document_filename(now: chrono::DateTime<chrono::Local>) -> String {
        format!("blueprint-{}.md", now.format("%Y%m%d-%H%M%S"))
    }
}
