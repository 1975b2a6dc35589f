use super::*;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ParseContext {
    pub current_ministry: String,
    pub current_category: String,
}

/// State carried between blocks for template expansion.
///
/// `prev_bureau_*` is only set right after a numbered bureau line and lives
/// for exactly one following block. `last_prefixes` / `last_count_str` hold
/// the latest expansion until it is reused once or superseded.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ExpansionState {
    pub prev_bureau_base: String,
    pub prev_bureau_full: String,
    pub last_prefixes: Vec<String>,
    pub last_count_str: String,
}

impl ExpansionState {
    fn has_pending(&self) -> bool {
        !self.prev_bureau_base.is_empty()
    }

    fn clear_pending(&mut self) {
        self.prev_bureau_base.clear();
        self.prev_bureau_full.clear();
    }
}

/// Shape of one normalized block, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    Template { content: &'a str },
    OrphanTemplate,
    MinistryHeader { name: &'a str },
    GenericMinistryHeader,
    BareMinistry { name: &'a str },
    Category { name: &'a str },
    BureauWithSections { bureau: &'a str, sections: &'a str },
    BareBureau { name: &'a str },
    Unmatched,
}

pub(crate) struct Classifier<'p> {
    patterns: &'p Patterns,
    pub context: ParseContext,
    pub expansion: ExpansionState,
    pub summary: RecoverySummary,
}

impl<'p> Classifier<'p> {
    pub(crate) fn new(patterns: &'p Patterns) -> Self {
        Self {
            patterns,
            context: ParseContext::default(),
            expansion: ExpansionState::default(),
            summary: RecoverySummary::default(),
        }
    }

    pub(crate) fn into_summary(self) -> RecoverySummary {
        self.summary
    }

    /// First matching shape for `norm`. Only the template rule looks at state:
    /// a `＜…＞` line is actionable only while a bureau is pending.
    pub(crate) fn classify<'a>(&self, norm: &'a str) -> LineKind<'a> {
        let patterns = self.patterns;

        if let Some(captures) = patterns.template.captures(norm) {
            if !self.expansion.has_pending() {
                return LineKind::OrphanTemplate;
            }
            if let Some(content) = captures.get(1) {
                return LineKind::Template {
                    content: content.as_str(),
                };
            }
        }

        if let Some(name) = patterns
            .ministry_header
            .captures(norm)
            .and_then(|captures| captures.get(1))
        {
            if patterns.generic_ministry.is_match(name.as_str()) {
                return LineKind::GenericMinistryHeader;
            }
            return LineKind::MinistryHeader {
                name: name.as_str(),
            };
        }

        if patterns.bare_ministry.is_match(norm)
            && !has_annotation_or_list(norm)
            && !patterns.bare_ministry_excluded_start.is_match(norm)
        {
            return LineKind::BareMinistry { name: norm };
        }

        if let Some(name) = patterns
            .category
            .captures(norm)
            .and_then(|captures| captures.get(1))
            .filter(|name| patterns.category_suffix.is_match(name.as_str()))
        {
            return LineKind::Category {
                name: name.as_str(),
            };
        }

        if let Some(captures) = patterns.bracketed_sections.captures(norm) {
            if let (Some(bureau), Some(sections)) = (captures.get(1), captures.get(2)) {
                return LineKind::BureauWithSections {
                    bureau: bureau.as_str().trim(),
                    sections: sections.as_str(),
                };
            }
        }

        if self.is_bare_bureau(norm) {
            return LineKind::BareBureau { name: norm };
        }

        LineKind::Unmatched
    }

    /// Classifies one block, updates the context and returns its entries.
    pub(crate) fn classify_block(&mut self, norm: &str, next_is_template: bool) -> Vec<Entry> {
        let kind = self.classify(norm);
        if !matches!(kind, LineKind::Template { .. }) {
            self.expansion.clear_pending();
        }

        match kind {
            LineKind::Template { content } => self.expand_pending(content),
            LineKind::OrphanTemplate => {
                self.summary.orphan_template_lines += 1;
                Vec::new()
            }
            LineKind::MinistryHeader { name } | LineKind::BareMinistry { name } => {
                self.context.current_ministry = name.to_string();
                self.context.current_category.clear();
                self.summary.ministry_headers += 1;
                Vec::new()
            }
            LineKind::GenericMinistryHeader => {
                self.summary.generic_headers_skipped += 1;
                Vec::new()
            }
            LineKind::Category { name } => {
                self.context.current_category = name.to_string();
                self.summary.categories += 1;
                Vec::new()
            }
            LineKind::BureauWithSections { bureau, sections } => {
                self.summary.bracket_lines += 1;
                let mut entries = self.seed_or_carry(bureau, next_is_template);

                if (2..=35).contains(&char_len(bureau)) {
                    entries.push(self.entry(bureau, "", ""));
                }
                for section in self.section_names(sections) {
                    entries.push(self.entry(bureau, &section, ""));
                }
                entries
            }
            LineKind::BareBureau { name } => {
                self.summary.bare_bureau_lines += 1;
                let mut entries = self.seed_or_carry(name, next_is_template);
                entries.push(self.entry(name, "", ""));
                entries
            }
            LineKind::Unmatched => {
                self.summary.unmatched_blocks += 1;
                Vec::new()
            }
        }
    }

    fn is_bare_bureau(&self, norm: &str) -> bool {
        if !(2..=25).contains(&char_len(norm)) || has_annotation_or_list(norm) {
            return false;
        }

        let (stem, count) = split_count_suffix(norm);
        self.patterns.bureau_suffix.is_match(norm)
            || (!count.is_empty() && self.patterns.seed_suffix.is_match(stem))
    }

    fn section_names(&self, sections: &str) -> Vec<String> {
        sections
            .split('、')
            .map(|item| normalize_line(item, self.patterns))
            .filter(|item| char_len(item) >= 2 && self.patterns.section_suffix.is_match(item))
            .collect()
    }

    /// Applies the pending bureau to a template list.
    fn expand_pending(&mut self, content: &str) -> Vec<Entry> {
        let expansion = expand_template(content, self.patterns);
        self.summary.ordinals_dropped += expansion.dropped;
        self.summary.template_expansions += 1;

        let base = std::mem::take(&mut self.expansion.prev_bureau_base);
        let full = std::mem::take(&mut self.expansion.prev_bureau_full);

        let entries = expansion
            .prefixes
            .iter()
            .map(|prefix| self.entry(&format!("{prefix}{base}"), "", &full))
            .collect::<Vec<Entry>>();

        debug!(
            bureau = %full,
            prefixes = expansion.prefixes.len(),
            "expanded template list"
        );

        self.expansion.last_count_str = split_count_suffix(&full).1.to_string();
        self.expansion.last_prefixes = expansion.prefixes;
        entries
    }

    /// A numbered bureau either reuses the previous expansion once (same
    /// count, no template line following) or becomes the pending bureau.
    fn seed_or_carry(&mut self, raw: &str, next_is_template: bool) -> Vec<Entry> {
        let (stem, count) = split_count_suffix(raw);
        if count.is_empty() || !self.patterns.seed_suffix.is_match(stem) {
            return Vec::new();
        }

        let reuse = !next_is_template
            && !self.expansion.last_prefixes.is_empty()
            && count == self.expansion.last_count_str;
        if !reuse {
            self.expansion.prev_bureau_base = stem.to_string();
            self.expansion.prev_bureau_full = raw.to_string();
            return Vec::new();
        }

        let entries = self
            .expansion
            .last_prefixes
            .iter()
            .map(|prefix| self.entry(&format!("{prefix}{stem}"), "", raw))
            .collect::<Vec<Entry>>();
        // One reuse only; a third sibling must bring its own template.
        self.expansion.last_count_str.clear();
        self.summary.carried_expansions += 1;

        debug!(bureau = %raw, prefixes = entries.len(), "carried previous expansion");
        entries
    }

    fn entry(&self, bureau: &str, section: &str, expanded_from: &str) -> Entry {
        Entry {
            ministry: self.context.current_ministry.clone(),
            category: self.context.current_category.clone(),
            bureau: bureau.to_string(),
            section: section.to_string(),
            expanded_from: expanded_from.to_string(),
            bureau_alias: String::new(),
        }
    }
}

fn has_annotation_or_list(text: &str) -> bool {
    text.contains('（') || text.contains('(') || text.contains('、')
}
