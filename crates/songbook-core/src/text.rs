//! Lyrics text formatting.
//!
//! Scraped lyrics arrive as one loosely structured string: section headers
//! run into the lyric that follows them, sentences share a line, and words
//! lose the spacing a `<br>` used to provide. [`format_lyrics`] turns such a
//! string into display lines, and [`paginate_lines`] slices those lines into
//! verses.

/// Section headers that always start a new line.
const SECTION_MARKERS: [&str; 3] = ["[Verse", "[Chorus", "[Bridge"];

/// Sentence endings that terminate a line. The trailing space is consumed.
const SENTENCE_BREAKS: [(&str, &str); 3] = [(". ", ".\n"), ("! ", "!\n"), ("? ", "?\n")];

/// Opens a section header anywhere in a line (`[Verse 1]`, `word[Intro]`).
const SECTION_OPENER: char = '[';

/// Open a word only at the start of a line or after whitespace. Elsewhere
/// (`"Hello"World`) they close the previous word.
const WORD_OPENERS: [char; 7] = ['(', '{', '"', '\'', '«', '“', '‘'];

/// Split raw lyrics into non-empty display lines, in source order.
///
/// Section markers start a new line, sentence-terminal punctuation followed
/// by a space ends one, and words glued together without spacing
/// (`"HelloWorld"`) are pulled apart. A `[`, or an opening bracket or quote
/// at the start of a word, does not count as the end of a word. Abbreviations and decimal numbers are
/// mis-split; the sentence heuristic is not grammar-aware.
pub fn format_lyrics(text: &str) -> Vec<String> {
    let mut text = text.to_owned();
    for marker in SECTION_MARKERS {
        text = text.replace(marker, &format!("\n{marker}"));
    }
    for (from, to) in SENTENCE_BREAKS {
        text = text.replace(from, to);
    }

    text.split('\n')
        .map(|line| split_concatenated_words(line.trim()))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Return the lines visible for a 1-based `verse` of `limit` lines.
///
/// A verse starting at or past the end yields an empty result.
pub fn paginate_lines(lines: &[String], verse: u32, limit: u32) -> Vec<String> {
    let limit = limit as usize;
    let start = (verse.saturating_sub(1) as usize).saturating_mul(limit);
    if start >= lines.len() {
        return Vec::new();
    }
    let end = start.saturating_add(limit).min(lines.len());
    lines[start..end].to_vec()
}

/// Put every section header on its own line before the text is stored.
pub fn normalize_scraped_lyrics(text: &str) -> String {
    text.replace(']', "]\n")
}

/// Insert a space before an upper-case letter glued to the preceding word.
fn split_concatenated_words(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 8);
    let mut prev: Option<char> = None;
    let mut prev_opens_word = false;
    for ch in line.chars() {
        if ch.is_uppercase() && !prev_opens_word && prev.is_some_and(|p| !p.is_whitespace()) {
            out.push(' ');
        }
        prev_opens_word = ch == SECTION_OPENER
            || (WORD_OPENERS.contains(&ch) && prev.is_none_or(char::is_whitespace));
        out.push(ch);
        prev = Some(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_marker_and_sentence_splitting() {
        let formatted = format_lyrics("[Verse 1] Hello World. This is a Test!");
        assert_eq!(formatted, lines(&["[Verse 1] Hello World.", "This is a Test!"]));
    }

    #[test]
    fn test_every_marker_starts_a_line() {
        let formatted = format_lyrics("intro[Chorus]la la[Bridge]na na[Verse 2]end");
        assert_eq!(
            formatted,
            lines(&["intro", "[Chorus]la la", "[Bridge]na na", "[Verse 2]end"])
        );
    }

    #[test]
    fn test_markers_are_case_sensitive() {
        assert_eq!(format_lyrics("a [verse] b"), lines(&["a [verse] b"]));
    }

    #[test]
    fn test_question_and_exclamation_end_lines() {
        let formatted = format_lyrics("Who are you? I am here! ok");
        assert_eq!(formatted, lines(&["Who are you?", "I am here!", "ok"]));
    }

    #[test]
    fn test_concatenated_words_are_split() {
        assert_eq!(format_lyrics("HelloWorld"), lines(&["Hello World"]));
        assert_eq!(format_lyrics("one twoThree"), lines(&["one two Three"]));
    }

    #[test]
    fn test_concatenation_split_is_unicode_aware() {
        assert_eq!(format_lyrics("ПриветМир"), lines(&["Привет Мир"]));
        assert_eq!(format_lyrics("étéÉcole"), lines(&["été École"]));
    }

    #[test]
    fn test_openers_at_word_start_do_not_split() {
        assert_eq!(
            format_lyrics("\"Hello\" (Oh) 'Cause «Да» word[Intro]"),
            lines(&["\"Hello\" (Oh) 'Cause «Да» word[Intro]"])
        );
    }

    #[test]
    fn test_closing_quote_glued_to_next_word_splits() {
        assert_eq!(format_lyrics("\"Hello\"World"), lines(&["\"Hello\" World"]));
        assert_eq!(
            format_lyrics("Jay-Z (Oh)Yeah \"Hello\"World"),
            lines(&["Jay- Z (Oh) Yeah \"Hello\" World"])
        );
    }

    #[test]
    fn test_no_empty_lines() {
        let formatted = format_lyrics("\n\n   \n[Verse 1]\n\n. ! ? \nword\n   ");
        assert!(!formatted.is_empty());
        assert!(formatted.iter().all(|line| !line.trim().is_empty()));
    }

    #[test]
    fn test_empty_input() {
        assert!(format_lyrics("").is_empty());
        assert!(format_lyrics("   \n  ").is_empty());
    }

    #[test]
    fn test_paginate_first_and_second_verse() {
        let all = lines(&["a", "b", "c", "d", "e", "f"]);
        assert_eq!(paginate_lines(&all, 1, 4), lines(&["a", "b", "c", "d"]));
        assert_eq!(paginate_lines(&all, 2, 4), lines(&["e", "f"]));
    }

    #[test]
    fn test_paginate_past_end_is_empty() {
        let all = lines(&["a", "b", "c", "d"]);
        assert!(paginate_lines(&all, 2, 4).is_empty());
        assert!(paginate_lines(&all, 100, 4).is_empty());
        assert!(paginate_lines(&[], 1, 4).is_empty());
    }

    #[test]
    fn test_paginate_huge_values_do_not_overflow() {
        let all = lines(&["a"]);
        assert!(paginate_lines(&all, u32::MAX, u32::MAX).is_empty());
    }

    #[test]
    fn test_normalize_scraped_lyrics() {
        assert_eq!(
            normalize_scraped_lyrics("[Verse 1]Hello[Chorus]World"),
            "[Verse 1]\nHello[Chorus]\nWorld"
        );
    }

    #[test]
    fn test_normalized_text_formats_headers_alone() {
        let stored = normalize_scraped_lyrics("[Verse 1]Hello there");
        assert_eq!(format_lyrics(&stored), lines(&["[Verse 1]", "Hello there"]));
    }
}
