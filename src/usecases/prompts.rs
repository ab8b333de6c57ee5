//! Prompt templates and completion parsing shared by both consultation phases.
//!
//! Pure functions: no I/O, no state. User text is interpolated verbatim.

use crate::domain::{AnswerBundle, ConsultationQuery, DomainError, ReportSection};

/// Jurisdiction the consultant persona is specialised in.
pub const JURISDICTION: &str = "Indian legal framework";

/// Marker line present in every question prompt. The mock adapter keys on it.
pub const QUESTION_PROMPT_MARKER: &str = "TASK: CLARIFYING QUESTIONS";

/// Marker line present in every report prompt.
pub const REPORT_PROMPT_MARKER: &str = "TASK: CONSULTATION REPORT";

pub fn build_question_prompt(query: &ConsultationQuery, count: usize) -> String {
    format!(
        r#"{marker}

You are an expert legal consultant specialising in the **{jurisdiction}**.
A user has a query regarding a legal matter in India. Generate exactly {count} highly specific,
probing questions that gather the details needed to analyse it. Frame them to elicit information
relevant to Indian law, such as:
- The state or territory in India where the issue occurred (laws can vary).
- The nature of the parties involved (individuals, companies, government bodies).
- Key dates and a timeline of events.
- Any written agreements, contracts, notices or official documents.

Keep in mind the Acts likely to apply (e.g. Bharatiya Nyaya Sanhita / Indian Penal Code,
Indian Contract Act 1872, Information Technology Act 2000, Consumer Protection Act 2019).

Output format: exactly {count} lines, one question per line. No preamble, no closing remarks,
no blank lines. You may prefix each line with its number ("1. ").

User's query:
"""
{query}
"""
"#,
        marker = QUESTION_PROMPT_MARKER,
        jurisdiction = JURISDICTION,
        count = count,
        query = query.text(),
    )
}

pub fn build_report_prompt(query: &ConsultationQuery, answers: &AnswerBundle) -> String {
    let [facts, law, analysis, recommendations] = ReportSection::ALL.map(ReportSection::title);
    format!(
        r#"{marker}

You are a legal expert specialising in the **{jurisdiction}**. You asked the user clarifying
questions about their legal matter and they have answered. Write a comprehensive, well-structured
report in markdown with exactly these four sections, in this order, each introduced by a
second-level heading with the exact title shown:

## {facts}
Briefly outline the user's situation based on the information provided.

## {law}
Identify and cite the relevant Acts and sections of Indian law.

## {analysis}
Explain how the law applies to the user's facts and discuss the likely legal arguments.

## {recommendations}
Give a preliminary opinion and practical next steps (e.g. mediation, a legal notice, or
consulting an advocate enrolled with a State Bar Council).

Close with a one-paragraph disclaimer that the report is for informational purposes only and is
not legal advice from a licensed advocate.

Initial query:
"""
{query}
"""

User's answers:
"""
{answers}
"""
"#,
        marker = REPORT_PROMPT_MARKER,
        jurisdiction = JURISDICTION,
        query = query.text(),
        answers = answers.text(),
    )
}

/// Parse a raw completion into clarifying questions, at most `max` of them.
///
/// Strips numbering, bullets, `Question N:` labels and markdown emphasis; drops blank lines and
/// markdown headings. When any line asks something (`?`), only such lines are kept. Otherwise
/// preamble lines such as `Here are some questions:` are dropped unless nothing else is left.
/// The cap applies after filtering.
///
/// # Errors
/// `MalformedCompletion` when no usable line remains.
pub fn parse_questions(raw: &str, max: usize) -> Result<Vec<String>, DomainError> {
    let candidates: Vec<&str> = raw
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .map(clean_question_line)
        .filter(|line| !line.is_empty())
        .collect();

    let mut questions: Vec<String> = if candidates.iter().any(|line| line.contains('?')) {
        candidates
            .into_iter()
            .filter(|line| line.contains('?'))
            .map(str::to_string)
            .collect()
    } else {
        let substantive: Vec<&str> = candidates
            .iter()
            .copied()
            .filter(|line| !is_preamble(line))
            .collect();
        let kept = if substantive.is_empty() {
            candidates
        } else {
            substantive
        };
        kept.into_iter().map(str::to_string).collect()
    };
    questions.truncate(max);

    if questions.is_empty() {
        return Err(DomainError::MalformedCompletion(format!(
            "no clarifying questions in completion ({} chars)",
            raw.len()
        )));
    }
    Ok(questions)
}

/// Sections whose heading does not appear in `body`, in report order.
///
/// A heading is a line with heading markup (`#`, `**bold**`, numbering, a trailing `:`) that
/// starts with the title, or a bare line equal to the title. Prose never counts.
pub fn missing_sections(body: &str) -> Vec<ReportSection> {
    let headings: Vec<(String, bool)> = body.lines().filter_map(heading_candidate).collect();

    ReportSection::ALL
        .into_iter()
        .filter(|section| {
            let title = section.title().to_lowercase();
            !headings.iter().any(|(text, marked)| {
                if *marked {
                    text.starts_with(&title)
                } else {
                    *text == title
                }
            })
        })
        .collect()
}

fn clean_question_line(line: &str) -> &str {
    let s = strip_decoration(line);
    let s = strip_decoration(strip_numbering(s));
    strip_decoration(strip_label(s))
}

fn strip_decoration(s: &str) -> &str {
    s.trim()
        .trim_start_matches(|c: char| {
            matches!(c, '-' | '*' | '•' | '+' | '>' | '#' | '`') || c.is_whitespace()
        })
        .trim_end_matches(|c: char| matches!(c, '*' | '`') || c.is_whitespace())
        .trim()
}

/// `Question 2: ...`, `Q2. ...` -> `...`. Requires a separator and text after it.
fn strip_label(s: &str) -> &str {
    let lower = s.to_ascii_lowercase();
    let label_len = if lower.starts_with("question") {
        "question".len()
    } else if lower.starts_with('q') {
        1
    } else {
        return s;
    };
    let rest = s[label_len..].trim_start();
    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    let after = &rest[digits..];
    match after.strip_prefix([':', '.', ')']) {
        Some(text) if !text.trim().is_empty() => text,
        _ => s,
    }
}

/// `1. ...`, `2) ...`, `(3) ...` -> `...`. Leaves `1.5 lakh?` alone.
fn strip_numbering(s: &str) -> &str {
    let body = s.strip_prefix('(').unwrap_or(s);
    let digits = body.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return s;
    }
    let after = &body[digits..];
    match after.strip_prefix(['.', ')', ':']) {
        Some(text) if !text.starts_with(|c: char| c.is_ascii_digit()) => text,
        _ => s,
    }
}

fn is_preamble(line: &str) -> bool {
    line.ends_with(':') && !line.contains('?')
}

/// Lowercased heading text and whether the line carries heading markup.
fn heading_candidate(line: &str) -> Option<(String, bool)> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let marked = trimmed.starts_with('#')
        || trimmed.starts_with("**")
        || trimmed.starts_with("__")
        || strip_numbering(trimmed).len() != trimmed.len()
        || trimmed
            .trim_end_matches(|c: char| matches!(c, '*' | '_'))
            .ends_with(':');
    let text = clean_heading(trimmed)
        .trim_end_matches(|c: char| matches!(c, '*' | '_' | ':') || c.is_whitespace())
        .to_lowercase();
    (!text.is_empty()).then_some((text, marked))
}

fn clean_heading(line: &str) -> &str {
    let s = line
        .trim()
        .trim_start_matches(|c: char| matches!(c, '#' | '*' | '_') || c.is_whitespace());
    let s = strip_numbering(s);
    s.trim_start_matches(|c: char| matches!(c, '*' | '_') || c.is_whitespace())
}
