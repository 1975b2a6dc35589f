use super::*;

#[derive(Debug, Default)]
pub(crate) struct BalancedPages {
    pub pages: Vec<String>,
    /// Input ran out while an angle-bracket span was still open.
    pub unbalanced_tail: bool,
}

/// Merges each page forward into the following ones until its `＜`/`＞` count
/// balances, so a template list split by a page break stays in one page.
pub(crate) fn merge_balanced_pages(raw_pages: &[String]) -> BalancedPages {
    let mut balanced = BalancedPages {
        pages: Vec::with_capacity(raw_pages.len()),
        unbalanced_tail: false,
    };

    let mut index = 0usize;
    while index < raw_pages.len() {
        let mut page_text = raw_pages[index].clone();
        let mut open_angles = delimiter_balance(&page_text, '＜', '＞');

        while open_angles > 0 && index + 1 < raw_pages.len() {
            index += 1;
            page_text.push('\n');
            page_text.push_str(&raw_pages[index]);
            open_angles += delimiter_balance(&raw_pages[index], '＜', '＞');
        }

        if open_angles > 0 {
            balanced.unbalanced_tail = true;
        }
        balanced.pages.push(page_text);
        index += 1;
    }

    balanced
}

/// Rebuilds logical blocks from the raw lines of one page.
///
/// An indented line, a forced-new shape, or the first line opens a block;
/// anything else is glued onto the open block without a separator. While the
/// open block has an unclosed `［`, unindented lines always continue it.
pub(crate) fn join_continuation_lines(page_text: &str, patterns: &Patterns) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<String> = None;
    let mut open_brackets = 0i64;

    for raw_line in page_text.split('\n') {
        let stripped = raw_line.trim();
        if stripped.is_empty() {
            continue;
        }
        // Bare page numbers would otherwise split a template span.
        if patterns.page_number.is_match(stripped) {
            continue;
        }

        let has_indent = raw_line.starts_with(' ') || raw_line.starts_with('\t');
        let forced_new = patterns.force_new_block.is_match(stripped);
        let inside_bracket = open_brackets > 0 && !has_indent;

        if let Some(block) = current.as_mut() {
            if inside_bracket || !(has_indent || forced_new) {
                block.push_str(stripped);
                open_brackets = (open_brackets + delimiter_balance(stripped, '［', '］')).max(0);
                continue;
            }
        }

        if let Some(finished) = current.take() {
            blocks.push(finished);
        }
        current = Some(stripped.to_string());
        open_brackets = delimiter_balance(stripped, '［', '］').max(0);
    }

    if let Some(finished) = current {
        blocks.push(finished);
    }
    blocks
}

fn delimiter_balance(text: &str, open: char, close: char) -> i64 {
    text.chars().fold(0i64, |balance, character| {
        if character == open {
            balance + 1
        } else if character == close {
            balance - 1
        } else {
            balance
        }
    })
}
