//! Document summarization over the leading slice of the text.

use crate::error::Result;
use crate::generator::TextGenerator;
use serde::Serialize;

/// Only this many leading characters of the document are summarized; policy
/// preambles carry the coverage outline, and this keeps the prompt bounded.
pub const SUMMARY_INPUT_CHARS: usize = 6000;

const MAX_BULLETS: usize = 5;

/// A short document summary with up to five key points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// The prose summary line, when the model produced one.
    pub summary: Option<String>,
    /// Key points, in document order, capped at five.
    pub bullets: Vec<String>,
}

fn summary_prompt(text: &str) -> String {
    let head: String = text.chars().take(SUMMARY_INPUT_CHARS).collect();
    format!(
        "Summarize the following insurance policy document. First give a 2-3 sentence summary on \
         a line starting with 'Summary:'. Then list the five most important points as bullet \
         points, each on its own line starting with '- '.\n\n\
         Document:\n{head}\n"
    )
}

/// Parse the `Summary:` line and `- ` bullets out of the model's reply.
fn parse_summary(text: &str) -> Summary {
    let mut summary = None;
    let mut bullets = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if summary.is_none()
            && let Some(prefix) = line.get(..8)
            && prefix.eq_ignore_ascii_case("summary:")
        {
            let value = line[8..].trim();
            if !value.is_empty() {
                summary = Some(value.to_string());
            }
            continue;
        }
        if let Some(point) = line.strip_prefix("- ") {
            let point = point.trim();
            if !point.is_empty() && bullets.len() < MAX_BULLETS {
                bullets.push(point.to_string());
            }
        }
    }

    Summary { summary, bullets }
}

/// Summarize a document's leading text into a prose line and key bullets.
///
/// Unlike decisions and explanations there is no sentinel fallback here; the
/// caller decides how to render a failure, so errors propagate.
pub async fn summarize<G: TextGenerator + ?Sized>(generator: &G, text: &str) -> Result<Summary> {
    let prompt = summary_prompt(text);
    let generated = generator.generate(&prompt).await?;
    Ok(parse_summary(&generated.text))
}
