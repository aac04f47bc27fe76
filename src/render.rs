//! Fills the page template with a game-data document.

use std::path::Path;

use serde_json::Value;

use crate::{error::PipelineError, store};

const TITLE_SLOT: &str = "{{TITLE}}";
const DATA_SLOT:  &str = "{{GAME_DATA}}";

/// Replaces every `{{TITLE}}` and `{{GAME_DATA}}` in `template`.
///
/// The title is HTML-escaped. The data is emitted as compact JSON with `</`
/// escaped so it can sit inside an inline `<script>` block.
pub fn render(template: &str, data: &Value) -> Result<String, PipelineError> {
    let title = data
        .get("title")
        .and_then(Value::as_str)
        .ok_or(PipelineError::MissingTitle)?;

    let json = serde_json::to_string(data)?.replace("</", "<\\/");

    Ok(template
        .replace(TITLE_SLOT, &escape_html(title))
        .replace(DATA_SLOT, &json))
}

pub fn render_files(template: &Path, data: &Path, output: &Path) -> Result<(), PipelineError> {
    let template_text =
        std::fs::read_to_string(template).map_err(|e| PipelineError::read(template, e))?;
    let data: Value = store::read_json(data)?;

    let html = render(&template_text, &data)?;
    store::write_text(output, &html)?;

    tracing::info!(output = %output.display(), bytes = html.len(), "Page rendered");
    Ok(())
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&'  => out.push_str("&amp;"),
            '<'  => out.push_str("&lt;"),
            '>'  => out.push_str("&gt;"),
            '"'  => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _    => out.push(c),
        }
    }
    out
}
