use serde::{Deserialize, Serialize};

/// One recovered organizational unit.
///
/// `section` is empty for a bureau-level row. `expanded_from` holds the printed
/// literal when the bureau name came out of a template expansion, and
/// `bureau_alias` is only ever filled by the alias pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub ministry: String,
    pub category: String,
    pub bureau: String,
    pub section: String,
    pub expanded_from: String,
    pub bureau_alias: String,
}

impl Entry {
    pub fn key(&self) -> (&str, &str, &str, &str) {
        (
            self.ministry.as_str(),
            self.category.as_str(),
            self.bureau.as_str(),
            self.section.as_str(),
        )
    }

    pub fn is_expanded(&self) -> bool {
        !self.expanded_from.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoverySummary {
    pub pages_in: usize,
    pub pages_balanced: usize,
    pub blocks_total: usize,
    pub blocks_empty: usize,
    pub ministry_headers: usize,
    pub generic_headers_skipped: usize,
    pub categories: usize,
    pub bracket_lines: usize,
    pub bare_bureau_lines: usize,
    pub template_expansions: usize,
    pub carried_expansions: usize,
    pub orphan_template_lines: usize,
    pub unmatched_blocks: usize,
    pub ordinals_dropped: usize,
    pub entries_emitted: usize,
    pub empty_ministry_dropped: usize,
    pub duplicates_dropped: usize,
    pub aliases_assigned: usize,
    pub entries_total: usize,
    pub ministries: usize,
    pub unique_bureaus: usize,
    pub unique_sections: usize,
    pub expanded_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolVersions {
    pub kikou: String,
    pub pdftotext: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub path: String,
    pub doc_id: String,
    pub sha256: String,
    pub page_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractPaths {
    pub cache_root: String,
    pub manifest_dir: String,
    pub recipients_db_path: String,
    pub names_file_path: Option<String>,
    pub db_path: String,
    pub entries_json_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub db_schema_version: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub tool_versions: ToolVersions,
    pub source: SourceDocument,
    pub paths: ExtractPaths,
    pub summary: RecoverySummary,
    pub warnings: Vec<String>,
}
