use super::*;

/// Ordinal labels the document uses inside template lists, indexed from one.
const ORDINAL_LABELS: [&str; 12] = [
    "一", "二", "三", "四", "五", "六", "七", "八", "九", "十", "十一", "十二",
];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Expansion {
    pub prefixes: Vec<String>,
    /// Range members that had no label in [`ORDINAL_LABELS`].
    pub dropped: usize,
}

/// Expands the content of one `＜…＞` pair into name prefixes.
///
/// `東北、関東` gives `[東北, 関東]`; `第一～第三、第五` gives
/// `[第一, 第二, 第三, 第五]`.
pub(crate) fn expand_template(content: &str, patterns: &Patterns) -> Expansion {
    let mut expansion = Expansion::default();

    for item in content.split('、') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }

        let Some(captures) = patterns.ordinal_range.captures(item) else {
            expansion.prefixes.push(item.to_string());
            continue;
        };

        let start = kanji_to_number(&captures[1]);
        let end = kanji_to_number(&captures[2]);
        for value in start..=end {
            match ordinal_label(value) {
                Some(label) => expansion.prefixes.push(format!("第{label}")),
                None => expansion.dropped += 1,
            }
        }
    }

    expansion
}

fn ordinal_label(value: u32) -> Option<&'static str> {
    let index = usize::try_from(value).ok()?.checked_sub(1)?;
    ORDINAL_LABELS.get(index).copied()
}

fn kanji_digit(character: char) -> Option<u32> {
    match character {
        '一' => Some(1),
        '二' => Some(2),
        '三' => Some(3),
        '四' => Some(4),
        '五' => Some(5),
        '六' => Some(6),
        '七' => Some(7),
        '八' => Some(8),
        '九' => Some(9),
        _ => None,
    }
}

/// Reads a small kanji numeral (`三`, `十`, `十一`, `二十`). Unreadable input is 0.
pub(crate) fn kanji_to_number(text: &str) -> u32 {
    let single_digit = |part: &str| {
        let mut characters = part.chars();
        match (characters.next(), characters.next()) {
            (Some(character), None) => kanji_digit(character),
            _ => None,
        }
    };

    match text.split_once('十') {
        None => single_digit(text).unwrap_or(0),
        Some((tens, ones)) => {
            let tens = if tens.is_empty() {
                1
            } else {
                single_digit(tens).unwrap_or(1)
            };
            tens * 10 + single_digit(ones).unwrap_or(0)
        }
    }
}
