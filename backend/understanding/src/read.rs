//! Plain-text extraction from the prebuilt read (OCR) model.

use ropsdoc_core::AnalyzeResult;

/// Join every recognized line of every page, in page order, with `\n`.
///
/// Falls back to the top-level `content` when no line structure was returned.
pub fn read_text_from_result(result: &AnalyzeResult) -> String {
    let lines: Vec<&str> = result
        .pages
        .iter()
        .flat_map(|page| page.lines.iter())
        .map(|line| line.content.as_str())
        .collect();

    if lines.is_empty() {
        result.content.clone()
    } else {
        lines.join("\n")
    }
}
