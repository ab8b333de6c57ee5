//! Implements InputPort. Inquire-based interactive consultation.
//!
//! The terminal session keeps the original query between the two phases and resubmits it with
//! the answers.

use crate::domain::{AnswerBundle, DomainError};
use crate::ports::{ConsultationPort, InputPort, QuestionsReply, ReportReply};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::error::InquireError;
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::{Confirm, Text};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Applies the prompt theme globally. Safe to call more than once.
pub fn apply_theme() {
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("§").with_fg(Color::LightYellow))
        .with_answered_prompt_prefix(Styled::new("✔").with_fg(Color::LightGreen));
    inquire::set_global_render_config(config);
}

/// Outcome of a prompt: an answer, or the user backing out (Esc / Ctrl+C).
fn prompted<T>(result: Result<T, InquireError>) -> Result<Option<T>, DomainError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(DomainError::Frontend(e.to_string())),
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.yellow} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn format_questions(reply: &QuestionsReply) -> String {
    let mut out = String::new();
    for (i, q) in reply.questions.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, q));
    }
    out
}

fn report_filename(generated_at: DateTime<Utc>) -> String {
    format!("legal_report_{}.md", generated_at.format("%Y%m%d_%H%M%S"))
}

/// Markdown document written when the user saves a report.
fn report_document(query: &str, reply: &ReportReply) -> String {
    format!(
        "# Legal Consultation Report\n\n**Generated:** {}\n\n**Query:** {}\n\n---\n\n{}\n",
        reply.generated_at.format("%Y-%m-%d %H:%M UTC"),
        query,
        reply.report
    )
}

fn print_report(report: &str) {
    println!();
    for line in report.lines() {
        if line.trim_start().starts_with('#') {
            println!("{}", line.bold().yellow());
        } else {
            println!("{}", line);
        }
    }
    println!();
}

/// Terminal adapter. Inquire prompts, indicatif spinners.
pub struct TuiInputPort {
    consultation: Arc<dyn ConsultationPort>,
}

impl TuiInputPort {
    pub fn new(consultation: Arc<dyn ConsultationPort>) -> Self {
        Self { consultation }
    }

    /// One full consultation. Returns false when the user backs out.
    async fn consult_once(&self) -> Result<bool, DomainError> {
        let Some(query) = prompted(
            Text::new("Describe your legal question:")
                .with_help_message("e.g. My landlord refuses to return my security deposit")
                .prompt(),
        )?
        else {
            return Ok(false);
        };

        let pb = spinner("Analyzing your query...");
        let questions = self.consultation.ask_questions(&query).await;
        pb.finish_and_clear();
        let questions = match questions {
            Ok(reply) => reply,
            Err(e) => {
                report_failure(&e);
                return Ok(true);
            }
        };

        println!("\n{}", "Clarifying questions".bold());
        print!("{}", format_questions(&questions));
        println!("\n{}\n", questions.message);

        let mut answers = Vec::with_capacity(questions.questions.len());
        for question in &questions.questions {
            let Some(answer) = prompted(Text::new(question).prompt())? else {
                return Ok(false);
            };
            answers.push(answer);
        }

        let bundle = match AnswerBundle::from_pairs(
            questions
                .questions
                .iter()
                .map(String::as_str)
                .zip(answers.iter().map(String::as_str)),
        ) {
            Ok(bundle) => bundle,
            Err(e) => {
                report_failure(&e);
                return Ok(true);
            }
        };

        let pb = spinner("Generating your report...");
        let report = self
            .consultation
            .generate_report(&query, bundle.text())
            .await;
        pb.finish_and_clear();
        let report = match report {
            Ok(reply) => reply,
            Err(e) => {
                report_failure(&e);
                return Ok(true);
            }
        };

        print_report(&report.report);
        self.offer_save(&query, &report).await?;
        Ok(true)
    }

    async fn offer_save(&self, query: &str, report: &ReportReply) -> Result<(), DomainError> {
        let save = prompted(
            Confirm::new("Save the report as a markdown file?")
                .with_default(true)
                .prompt(),
        )?;
        if save != Some(true) {
            return Ok(());
        }

        let default_name = report_filename(report.generated_at);
        let Some(path) = prompted(Text::new("File name:").with_default(&default_name).prompt())?
        else {
            return Ok(());
        };
        let path = PathBuf::from(path);

        match tokio::fs::write(&path, report_document(query, report)).await {
            Ok(()) => {
                info!(path = %path.display(), "report saved");
                println!("Saved to {}", path.display());
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to save report");
                println!("{} {}", "Could not save report:".red(), e);
            }
        }
        Ok(())
    }
}

fn report_failure(err: &DomainError) {
    warn!(error = %err, "consultation step failed");
    let hint = if err.is_service_failure() {
        "The completion service failed; you can try again."
    } else {
        "Please adjust your input and try again."
    };
    println!("{} {}\n{}", "Error:".red().bold(), err, hint);
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            if !self.consult_once().await? {
                break;
            }
            let again = prompted(
                Confirm::new("Start a new consultation?")
                    .with_default(false)
                    .prompt(),
            )?;
            if again != Some(true) {
                break;
            }
        }
        println!("Goodbye.");
        Ok(())
    }
}
