const INVISIBLE: [char; 2] = ['\u{feff}', '\u{200b}'];

/// Strips byte-order marks and zero-width characters and collapses runs of
/// whitespace. Case is preserved; the classifier lowercases on its own.
pub(crate) fn normalize_text(value: &str) -> String {
    let cleaned = value.replace(INVISIBLE, "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits a keyword or domain cell on `,` and `;`, dropping empty entries.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split([',', ';'])
        .map(normalize_text)
        .filter(|entry| !entry.is_empty())
        .collect()
}
