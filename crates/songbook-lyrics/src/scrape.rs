//! Lyrics extraction from song pages.

use scraper::{Html, Selector};

/// Selectors tried in order; the first that yields text wins.
const LYRICS_SELECTORS: [&str; 2] = [".lyrics", "div[class^='Lyrics__Container']"];

/// Extract the raw lyrics from a song page.
///
/// Every element matched by a selector contributes its concatenated text
/// followed by a newline. Markup such as `<br>` is dropped, so words on
/// adjacent lines may end up glued together; the text formatter splits
/// them again when the lyrics are read.
///
/// Returns `None` when no selector yields non-blank text.
pub fn extract_lyrics(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    LYRICS_SELECTORS.iter().find_map(|raw| {
        let selector = Selector::parse(raw).ok()?;
        let mut lyrics = String::new();
        for element in document.select(&selector) {
            lyrics.extend(element.text());
            lyrics.push('\n');
        }
        (!lyrics.trim().is_empty()).then_some(lyrics)
    })
}
