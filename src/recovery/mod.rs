//! Recovery of the ministry / category / bureau / section hierarchy from the
//! linearized text of the organization list.
//!
//! The pass is strictly ordered: pages are balanced on angle brackets, split
//! into blocks, normalized, then classified left to right against a single
//! [`Classifier`] that owns the parse context and the template-expansion
//! state. Deduplication and alias resolution run over the emitted set.

use std::collections::HashSet;

use anyhow::{Context, Result, bail};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::model::{Entry, RecoverySummary};

mod alias;
mod classify;
mod dedupe;
mod expand;
mod normalize;
mod segment;

pub use alias::{NameLookup, NameSet};

use alias::*;
use classify::*;
use dedupe::*;
use expand::*;
use normalize::*;
use segment::*;

#[derive(Debug, Clone)]
pub struct Recovery {
    pub entries: Vec<Entry>,
    pub summary: RecoverySummary,
}

/// Compiled line shapes shared by every stage of the pass.
#[derive(Debug)]
pub(crate) struct Patterns {
    force_new_block: Regex,
    page_number: Regex,
    full_width_annotation: Regex,
    half_width_annotation: Regex,
    template: Regex,
    ministry_header: Regex,
    generic_ministry: Regex,
    bare_ministry: Regex,
    bare_ministry_excluded_start: Regex,
    category: Regex,
    category_suffix: Regex,
    bracketed_sections: Regex,
    section_suffix: Regex,
    bureau_suffix: Regex,
    seed_suffix: Regex,
    ordinal_range: Regex,
}

impl Patterns {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            force_new_block: Regex::new(r"^(\d+\s|[（(]\d|[２３４５６７８９１]+\s|＜|【|\d+$)")
                .context("failed to compile forced-new block regex")?,
            page_number: Regex::new(r"^\d{1,3}$").context("failed to compile page number regex")?,
            full_width_annotation: Regex::new(r"（[^）]{1,30}）")
                .context("failed to compile full-width annotation regex")?,
            half_width_annotation: Regex::new(r"\([^)]{1,30}\)")
                .context("failed to compile half-width annotation regex")?,
            template: Regex::new(r"^＜(.+?)＞").context("failed to compile template regex")?,
            ministry_header: Regex::new(
                r"^[XⅠⅡⅢⅣⅤⅥⅦⅧⅨⅩⅪⅫxivl\d一二三四五六七八九十]+(本府?[省庁]|.{2,20}[省庁院府])$",
            )
            .context("failed to compile ministry header regex")?,
            generic_ministry: Regex::new(r"^本府?[省庁]$")
                .context("failed to compile generic ministry regex")?,
            bare_ministry: Regex::new(r"^.{2,15}[省庁院府]$")
                .context("failed to compile bare ministry regex")?,
            bare_ministry_excluded_start: Regex::new(r"^[本１２３４５６７８９(（\d]")
                .context("failed to compile bare ministry exclusion regex")?,
            category: Regex::new(r"^[ＡＢＣＤＥＦＧＨＩａｂｃｄｅｆA-I](.{2,15})$")
                .context("failed to compile category regex")?,
            category_suffix: Regex::new(r"[局部会機関]$")
                .context("failed to compile category suffix regex")?,
            bracketed_sections: Regex::new(r"^(.+?)［(.+?)］(.*)$")
                .context("failed to compile bracketed sections regex")?,
            section_suffix: Regex::new(r"[課室班係官]$")
                .context("failed to compile section suffix regex")?,
            bureau_suffix: Regex::new(r"[局部所署館庁校区]$")
                .context("failed to compile bureau suffix regex")?,
            seed_suffix: Regex::new(r"[局部所署台庁会校区]$")
                .context("failed to compile expansion seed suffix regex")?,
            ordinal_range: Regex::new(
                r"^第([一二三四五六七八九十]+)～第([一二三四五六七八九十]+)$",
            )
            .context("failed to compile ordinal range regex")?,
        })
    }
}

/// Runs the full pass over `pages` (document order) and returns the
/// deduplicated, alias-resolved entries.
///
/// Fails only when there is nothing to parse or when `lookup` fails.
pub fn recover<L: NameLookup + ?Sized>(pages: &[String], lookup: &L) -> Result<Recovery> {
    if pages.is_empty() {
        bail!("no pages to parse");
    }
    if pages.iter().all(|page| page.trim().is_empty()) {
        bail!("all {} pages are blank", pages.len());
    }

    let patterns = Patterns::new()?;

    let balanced = merge_balanced_pages(pages);
    if balanced.unbalanced_tail {
        warn!(
            pages = balanced.pages.len(),
            "angle brackets still open at end of input; last page absorbed the remainder"
        );
    }

    let page_blocks = balanced
        .pages
        .iter()
        .map(|page| {
            join_continuation_lines(page, &patterns)
                .iter()
                .map(|block| normalize_line(block, &patterns))
                .collect::<Vec<String>>()
        })
        .collect::<Vec<Vec<String>>>();

    let mut classifier = Classifier::new(&patterns);
    let mut emitted = Vec::new();
    for (page_index, blocks) in page_blocks.iter().enumerate() {
        for (block_index, norm) in blocks.iter().enumerate() {
            classifier.summary.blocks_total += 1;
            if norm.is_empty() {
                classifier.summary.blocks_empty += 1;
                continue;
            }

            let next_is_template = next_normalized_block(&page_blocks, page_index, block_index)
                .is_some_and(|next| next.starts_with('＜'));
            emitted.extend(classifier.classify_block(norm, next_is_template));
        }
    }

    let mut summary = classifier.into_summary();
    summary.pages_in = pages.len();
    summary.pages_balanced = balanced.pages.len();
    summary.entries_emitted = emitted.len();

    if summary.ordinals_dropped > 0 {
        warn!(
            dropped = summary.ordinals_dropped,
            "ordinal range members outside 一..十二 were dropped"
        );
    }

    let mut entries = dedupe_entries(emitted, &mut summary);
    summary.aliases_assigned = resolve_aliases(&mut entries, lookup)?;
    tally_entries(&entries, &mut summary);

    info!(
        blocks = summary.blocks_total,
        emitted = summary.entries_emitted,
        entries = summary.entries_total,
        ministries = summary.ministries,
        aliases = summary.aliases_assigned,
        "recovery pass completed"
    );

    Ok(Recovery { entries, summary })
}

/// The next non-empty normalized block after `block_index`, looking into the
/// following page when the current one is exhausted.
fn next_normalized_block(
    page_blocks: &[Vec<String>],
    page_index: usize,
    block_index: usize,
) -> Option<&str> {
    fn first_nonempty(blocks: &[String]) -> Option<&str> {
        blocks
            .iter()
            .find(|block| !block.is_empty())
            .map(String::as_str)
    }

    let current = page_blocks.get(page_index)?;
    first_nonempty(current.get(block_index + 1..).unwrap_or_default()).or_else(|| {
        page_blocks
            .get(page_index + 1)
            .and_then(|blocks| first_nonempty(blocks))
    })
}
