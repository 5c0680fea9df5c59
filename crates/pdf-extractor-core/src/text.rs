//! Assembly of per-page text into the extracted document text.

/// Format one page block, or `None` when the page has no visible text.
///
/// The block is `"--- Page N ---\n" + text + "\n\n"`; `text` is kept as the
/// backend returned it.
pub fn page_block(page_number: usize, text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    Some(format!("--- Page {page_number} ---\n{text}\n\n"))
}

/// Concatenate page blocks in the given order.
///
/// Page numbers are 1-based and supplied by the caller, so skipped pages
/// keep later pages correctly numbered.
pub fn assemble_pages<'a, I>(pages: I) -> String
where
    I: IntoIterator<Item = (usize, &'a str)>,
{
    pages
        .into_iter()
        .filter_map(|(number, text)| page_block(number, text))
        .collect()
}
