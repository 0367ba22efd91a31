use regex::Regex;
use std::sync::LazyLock;

static URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)http\S+").expect("url pattern"));
static NON_ALPHA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z\s]").expect("non-alpha pattern"));
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Strip URLs and everything but ASCII letters/whitespace, collapse
/// whitespace runs to one space, lowercase. Total: `""` maps to `""`.
///
/// URLs are stripped a second time after the character filter, since
/// dropping digits or punctuation can splice a new `http...` token together
/// (`h1ttpx` becomes `httpx`). Without that the function is not idempotent.
pub fn normalize(raw: &str) -> String {
    let text = URL.replace_all(raw, "");
    let text = NON_ALPHA.replace_all(&text, "");
    let text = URL.replace_all(&text, "");
    let text = SPACES.replace_all(&text, " ");
    text.to_lowercase()
}

/// First `max_chars` characters of `text` (fact-check claim, article head).
pub fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
