//! Prompt builder for artifact synthesis.
//!
//! Builds a single flat prompt: instruction block, the reading context when
//! present, then the transcript. The instruction pins the reply to a JSON
//! artifact array so the orchestrator can parse it without guessing.

use super::context::SynthesisContext;

const SYSTEM_INSTRUCTION: &str = "\
You turn the transcript of a spoken reading-session note into structured artifacts.

Reply with ONLY a JSON array. Each element is an object with exactly these keys:
  \"kind\": one of \"insight\", \"openQuestion\", \"quote\", \"followUpQuestion\", \"contextExpansion\"
  \"title\": a short label
  \"content\": the artifact text

Rules:
1. At most 3 insights, 4 open questions, 1 followUpQuestion, 1 contextExpansion.
2. Quotes must be passages the reader actually spoke as quotations.
3. Keep the reader's wording; do not invent facts about the book.
4. No prose outside the JSON array.";

/// Builds the synthesis prompt for one session.
pub fn build_synthesis_prompt(transcript: &str, context: Option<&SynthesisContext>) -> String {
    let mut prompt = String::with_capacity(2048);
    prompt.push_str(SYSTEM_INSTRUCTION);

    if let Some(ctx) = context.filter(|ctx| !ctx.is_empty()) {
        prompt.push_str("\n\nReading context:\n");
        if let Some(book) = ctx.book.as_ref().and_then(|b| b.display_title()) {
            let author = ctx
                .book
                .as_ref()
                .and_then(|b| b.display_author())
                .unwrap_or("unknown author");
            prompt.push_str(&format!("Session book: {book} by {author}\n"));
        }
        push_shelf(&mut prompt, "Currently reading", &ctx.currently_reading);
        push_shelf(&mut prompt, "Want to read", &ctx.want_to_read);
        push_shelf(&mut prompt, "Read", &ctx.read);
        if !ctx.recent_notes.is_empty() {
            prompt.push_str("Recent notes:\n");
            for note in &ctx.recent_notes {
                prompt.push_str(&format!("- {note}\n"));
            }
        }
    }

    prompt.push_str("\n\nTranscript:\n");
    prompt.push_str(transcript);
    prompt
}

fn push_shelf(prompt: &mut String, label: &str, shelf: &[super::context::BookRef]) {
    if shelf.is_empty() {
        return;
    }
    let titles: Vec<&str> = shelf.iter().filter_map(|book| book.display_title()).collect();
    if !titles.is_empty() {
        prompt.push_str(&format!("{label}: {}\n", titles.join(", ")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesis::context::BookRef;

    #[test]
    fn prompt_contains_contract_and_transcript() {
        let prompt = build_synthesis_prompt("I loved this chapter.", None);
        assert!(prompt.contains("JSON array"));
        assert!(prompt.contains("I loved this chapter."));
        assert!(!prompt.contains("Reading context"));
    }

    #[test]
    fn context_block_lists_book_and_shelves() {
        let context = SynthesisContext {
            book: Some(BookRef::new("Middlemarch", Some("George Eliot".into()))),
            currently_reading: vec![BookRef::new("Bleak House", None)],
            recent_notes: vec!["Dorothea's idealism".into()],
            ..Default::default()
        };
        let prompt = build_synthesis_prompt("A thought.", Some(&context));
        assert!(prompt.contains("Session book: Middlemarch by George Eliot"));
        assert!(prompt.contains("Currently reading: Bleak House"));
        assert!(prompt.contains("- Dorothea's idealism"));
    }
}
