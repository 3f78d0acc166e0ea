//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{FolioArgs, OutputFormat};
use crate::error::Result;
use crate::ranking::ScoredDocument;
use crate::suggest::Suggestion;

/// Result structure for search operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchOutput {
    pub query: String,
    /// Compiled expression as sent to the index store.
    pub expression: String,
    pub page: usize,
    pub limit: usize,
    pub total: u64,
    pub duration_ms: u64,
    pub documents: Vec<ScoredDocument>,
}

/// Result structure for autocomplete.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestOutput {
    pub query: String,
    pub duration_ms: u64,
    pub suggestions: Vec<Suggestion>,
}

/// Something the CLI can print for humans.
pub trait HumanOutput {
    fn render_human(&self) -> String;
}

impl HumanOutput for SearchOutput {
    fn render_human(&self) -> String {
        let mut out = String::new();
        out.push_str("Search Results:\n");
        out.push_str("═══════════════\n");

        let first = self.page.saturating_sub(1) * self.limit;
        for (i, doc) in self.documents.iter().enumerate() {
            let title = doc
                .highlighted_title
                .as_deref()
                .unwrap_or(&doc.document.title);

            out.push('\n');
            out.push_str(&format!("{}. {} (rank: {:.3})\n", first + i + 1, title, doc.rank));
            if !doc.document.authors.is_empty() {
                out.push_str(&format!("   by {}\n", doc.document.authors.join(", ")));
            }
            let description = doc
                .highlighted_description
                .as_deref()
                .or(doc.document.description.as_deref());
            if let Some(description) = description {
                out.push_str(&format!("   {description}\n"));
            }
        }

        out.push('\n');
        if self.documents.is_empty() {
            out.push_str("No matches.\n");
        }
        out.push_str(&format!(
            "Total hits: {} (page {}, {} per page)\n",
            self.total, self.page, self.limit
        ));
        out.push_str(&format!("Search time: {}ms\n", self.duration_ms));
        out
    }
}

impl HumanOutput for SuggestOutput {
    fn render_human(&self) -> String {
        let mut out = String::new();
        out.push_str("Suggestions:\n");
        out.push_str("════════════\n");

        if self.suggestions.is_empty() {
            out.push_str("(none)\n");
        }
        for suggestion in &self.suggestions {
            out.push_str(&format!(
                "{:<40} {:<6} {:.3}\n",
                suggestion.text, suggestion.kind, suggestion.score
            ));
        }
        out
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(result: &T, args: &FolioArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            print!("{}", result.render_human());
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &FolioArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}
