use super::*;

/// Drops every whitespace character, then short parenthesized annotations
/// such as headcounts `（3,789）` or `(2人)`. Bracketed sub-lists and template
/// lists pass through with the same treatment.
pub(crate) fn normalize_line(raw: &str, patterns: &Patterns) -> String {
    let compact = raw
        .chars()
        .filter(|character| !character.is_whitespace())
        .collect::<String>();

    let without_full_width = patterns.full_width_annotation.replace_all(&compact, "");
    patterns
        .half_width_annotation
        .replace_all(&without_full_width, "")
        .into_owned()
}

/// Splits a trailing run of ASCII or full-width digits off `text`.
pub(crate) fn split_count_suffix(text: &str) -> (&str, &str) {
    let stem = text.trim_end_matches(|character: char| {
        character.is_ascii_digit() || ('０'..='９').contains(&character)
    });
    (stem, &text[stem.len()..])
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}
