//! Glyph subset extraction.
//!
//! The renderer ships a base Latin font plus two subsetted fonts: one for
//! Hangul and one for CJK/symbols. Every character seen in the submissions
//! is sorted into at most one of those subsets; anything else is assumed to
//! be covered by the base font.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

/// Hangul first, so Hangul code points inside the CJK ranges (compatibility
/// jamo, enclosed Hangul) land in the Korean subset.
const CHARSET_PATTERN: &str = concat!(
    r"(?P<kr>\p{Hangul})",
    "|",
    r"(?P<jp>[\x{2200}-\x{22FF}\x{3000}-\x{9FFF}\x{FF00}-\x{FFEF}])",
);

fn charset_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(CHARSET_PATTERN).expect("valid charset regex"))
}

/// Glyph subsets required by the observed text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharsetPair {
    /// Hangul characters used
    pub charset_sans_kr: String,
    /// CJK, fullwidth and math symbol characters used
    pub charset_sans_jp: String,
}

/// Partition accumulated characters into the two glyph subsets
///
/// Both outputs are deduplicated and sorted by code point.
pub fn extract_charsets<'a, I>(chars: I) -> CharsetPair
where
    I: IntoIterator<Item = &'a char>,
{
    let text: String = chars.into_iter().collect();

    let mut kr = BTreeSet::new();
    let mut jp = BTreeSet::new();
    for caps in charset_regex().captures_iter(&text) {
        if let Some(m) = caps.name("kr") {
            kr.extend(m.as_str().chars());
        } else if let Some(m) = caps.name("jp") {
            jp.extend(m.as_str().chars());
        }
    }

    CharsetPair {
        charset_sans_kr: kr.into_iter().collect(),
        charset_sans_jp: jp.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(s: &str) -> BTreeSet<char> {
        s.chars().collect()
    }

    #[test]
    fn test_partitions_hangul_and_cjk() {
        let chars = set("한글中文A");
        let pair = extract_charsets(&chars);

        assert_eq!(pair.charset_sans_kr, "글한");
        assert_eq!(pair.charset_sans_jp, "中文");
    }

    #[test]
    fn test_symbol_ranges() {
        // U+2200 FOR ALL, U+3001 ideographic comma, U+FF01 fullwidth !
        let chars = set("∀、！あア");
        let pair = extract_charsets(&chars);

        assert_eq!(pair.charset_sans_kr, "");
        assert_eq!(pair.charset_sans_jp, "∀、あア！");
    }

    #[test]
    fn test_hangul_inside_cjk_range_goes_to_korean() {
        // U+3131 HANGUL LETTER KIYEOK sits inside 3000-9FFF
        let chars = set("ㄱ中");
        let pair = extract_charsets(&chars);

        assert_eq!(pair.charset_sans_kr, "ㄱ");
        assert_eq!(pair.charset_sans_jp, "中");
    }

    #[test]
    fn test_base_font_characters_dropped() {
        let chars = set("Hello, wörld! 😀 é");
        assert_eq!(extract_charsets(&chars), CharsetPair::default());
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let chars = vec!['文', '한', '中', '글', '中'];
        let pair = extract_charsets(&chars);

        assert_eq!(pair.charset_sans_kr, "글한");
        assert_eq!(pair.charset_sans_jp, "中文");
    }
}
