use super::*;

/// Qualifier that informal usage drops from expanded regional bureau names.
const REGIONAL_QUALIFIER: &str = "地方";

/// Read-only existence check against names observed in real usage.
pub trait NameLookup {
    fn exists(&self, name: &str) -> Result<bool>;
}

/// In-memory canonical name set.
#[derive(Debug, Default, Clone)]
pub struct NameSet {
    names: HashSet<String>,
}

impl NameSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl NameLookup for NameSet {
    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.names.contains(name))
    }
}

pub(crate) fn alias_candidate(entry: &Entry) -> Option<String> {
    if !entry.is_expanded() || !entry.bureau.contains(REGIONAL_QUALIFIER) {
        return None;
    }

    let candidate = entry.bureau.replace(REGIONAL_QUALIFIER, "");
    if candidate.is_empty() || candidate == entry.bureau {
        return None;
    }
    Some(candidate)
}

/// Sets `bureau_alias` where the shortened name is attested and the printed
/// one is not. Returns how many aliases were assigned.
pub(crate) fn resolve_aliases<L: NameLookup + ?Sized>(
    entries: &mut [Entry],
    lookup: &L,
) -> Result<usize> {
    let mut assigned = 0usize;

    for entry in entries.iter_mut() {
        let Some(candidate) = alias_candidate(entry) else {
            continue;
        };

        let candidate_known = lookup
            .exists(&candidate)
            .with_context(|| format!("canonical-name lookup failed for {candidate}"))?;
        if !candidate_known {
            continue;
        }

        let printed_known = lookup
            .exists(&entry.bureau)
            .with_context(|| format!("canonical-name lookup failed for {}", entry.bureau))?;
        if printed_known {
            continue;
        }

        debug!(bureau = %entry.bureau, alias = %candidate, "assigned bureau alias");
        entry.bureau_alias = candidate;
        assigned += 1;
    }

    Ok(assigned)
}
