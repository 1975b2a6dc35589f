use super::*;

/// Keeps the first entry per `(ministry, category, bureau, section)` and drops
/// entries recorded before any ministry header.
pub(crate) fn dedupe_entries(entries: Vec<Entry>, summary: &mut RecoverySummary) -> Vec<Entry> {
    let mut seen = HashSet::<(String, String, String, String)>::new();
    let mut unique = Vec::with_capacity(entries.len());

    for entry in entries {
        if entry.ministry.is_empty() {
            summary.empty_ministry_dropped += 1;
            continue;
        }

        let (ministry, category, bureau, section) = entry.key();
        let key = (
            ministry.to_string(),
            category.to_string(),
            bureau.to_string(),
            section.to_string(),
        );
        if seen.insert(key) {
            unique.push(entry);
        } else {
            summary.duplicates_dropped += 1;
        }
    }

    unique
}

pub(crate) fn tally_entries(entries: &[Entry], summary: &mut RecoverySummary) {
    summary.entries_total = entries.len();
    summary.ministries = entries
        .iter()
        .map(|entry| entry.ministry.as_str())
        .collect::<HashSet<&str>>()
        .len();
    summary.unique_bureaus = entries
        .iter()
        .filter(|entry| !entry.bureau.is_empty())
        .map(|entry| (entry.ministry.as_str(), entry.bureau.as_str()))
        .collect::<HashSet<(&str, &str)>>()
        .len();
    summary.unique_sections = entries
        .iter()
        .filter(|entry| !entry.section.is_empty())
        .map(|entry| entry.section.as_str())
        .collect::<HashSet<&str>>()
        .len();
    summary.expanded_entries = entries.iter().filter(|entry| entry.is_expanded()).count();
}
