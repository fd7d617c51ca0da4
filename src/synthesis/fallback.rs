//! Deterministic, LLM-free artifact extraction.
//!
//! Used whenever synthesis is skipped or every model in the chain has
//! failed. The heuristics are intentionally simple — leading declarative
//! sentences become insights, trailing `?` marks open questions, quoted
//! spans become quotes — but they guarantee a session never ends with a
//! hard error just because no model was reachable.

use regex::Regex;
use std::sync::OnceLock;

use super::artifact::{Artifact, ArtifactKind};
use super::context::SynthesisContext;

/// Leading declarative sentences kept as insights.
const MAX_INSIGHTS: usize = 3;

/// Question sentences kept as open questions.
const MAX_OPEN_QUESTIONS: usize = 4;

/// Quoted spans shorter than this (after trimming) are discarded.
const MIN_QUOTE_CHARS: usize = 12;

fn quote_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#""([^"]+)""#).expect("quote pattern is valid"))
}

/// Generates heuristic artifacts from a raw transcript.
///
/// Empty or whitespace-only input yields no artifacts of any kind.
pub fn generate_fallback_artifacts(
    transcript: &str,
    context: Option<&SynthesisContext>,
) -> Vec<Artifact> {
    let collapsed = collapse_whitespace(transcript);
    if collapsed.is_empty() {
        return Vec::new();
    }

    let units = split_sentences(&collapsed);
    let mut artifacts = Vec::new();

    for (index, unit) in units
        .iter()
        .filter(|unit| !unit.ends_with('?'))
        .take(MAX_INSIGHTS)
        .enumerate()
    {
        artifacts.push(Artifact::new(
            ArtifactKind::Insight,
            format!("Session insight {}", index + 1),
            unit.clone(),
        ));
    }

    for (index, unit) in units
        .iter()
        .filter(|unit| unit.ends_with('?'))
        .take(MAX_OPEN_QUESTIONS)
        .enumerate()
    {
        artifacts.push(Artifact::new(
            ArtifactKind::OpenQuestion,
            format!("Open question {}", index + 1),
            unit.clone(),
        ));
    }

    let mut kept_quotes = 0usize;
    for capture in quote_pattern().captures_iter(&collapsed) {
        let candidate = capture[1].trim();
        if candidate.chars().count() >= MIN_QUOTE_CHARS {
            kept_quotes += 1;
            artifacts.push(Artifact::new(
                ArtifactKind::Quote,
                format!("Captured quote {kept_quotes}"),
                candidate,
            ));
        }
    }

    artifacts.push(follow_up_question(context));

    if let Some(expansion) = context_expansion(context) {
        artifacts.push(expansion);
    }

    artifacts
}

/// Collapses all whitespace runs to single spaces and trims the ends.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits text into sentence-like units on terminal punctuation, keeping the
/// punctuation with its sentence. A trailing fragment with no terminal
/// punctuation is kept as its own unit.
fn split_sentences(text: &str) -> Vec<String> {
    let mut units = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            // Consume a run of terminal punctuation ("?!", "...") whole.
            while let Some(&next) = chars.peek() {
                if matches!(next, '.' | '!' | '?') {
                    current.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            flush_unit(&mut current, &mut units);
        }
    }
    flush_unit(&mut current, &mut units);

    units
}

fn flush_unit(current: &mut String, units: &mut Vec<String>) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        units.push(trimmed.to_string());
    }
    current.clear();
}

fn follow_up_question(context: Option<&SynthesisContext>) -> Artifact {
    let book_title = context
        .and_then(|ctx| ctx.book.as_ref())
        .and_then(|book| book.display_title());

    let content = match book_title {
        Some(title) => format!(
            "Which part of \"{title}\" do you want to revisit in your next reading block?"
        ),
        None => "What from this session do you want to revisit in your next reading block?"
            .to_string(),
    };

    Artifact::new(ArtifactKind::FollowUpQuestion, "Follow-up question", content)
}

/// One expansion artifact when the session book has both a title and an
/// author; none otherwise.
fn context_expansion(context: Option<&SynthesisContext>) -> Option<Artifact> {
    let book = context?.book.as_ref()?;
    let title = book.display_title()?;
    let author = book.display_author()?;

    Some(Artifact::new(
        ArtifactKind::ContextExpansion,
        format!("Going deeper into {title}"),
        format!("Look into {author}'s other work and the ideas behind this book."),
    ))
}
