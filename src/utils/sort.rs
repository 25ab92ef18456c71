//! Natural ("human") sort order.
//!
//! Names are split into alternating runs of non-digits and digits. Digit runs
//! compare by numeric value and text runs compare case-insensitively, so
//! `backup_2` sorts before `backup_10`.

use std::cmp::Ordering;

/// One run of a [`NaturalKey`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Chunk {
    /// Lower-cased text run (possibly empty).
    Text(String),
    /// Digit run.
    Number(Digits),
}

/// A digit run compared by value, without integer overflow.
///
/// Leading zeros are stripped, so `007` and `7` compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Digits(String);

impl Digits {
    fn new(run: &str) -> Self {
        let trimmed = run.trim_start_matches('0');
        Self(if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() })
    }
}

impl Ord for Digits {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.len().cmp(&other.0.len()).then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Digits {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort key implementing natural order.
///
/// The run sequence always starts with a text run (empty when the name starts
/// with a digit), so text is only ever compared with text and numbers with
/// numbers.
///
/// # Examples
///
/// ```rust
/// use modloader_installer::utils::sort::natural_sort_key;
///
/// assert!(natural_sort_key("a10b") > natural_sort_key("a9b"));
/// assert!(natural_sort_key("a2") < natural_sort_key("a10"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Chunk>);

/// Build the natural sort key of `text`.
pub fn natural_sort_key(text: &str) -> NaturalKey {
    let mut chunks = Vec::new();
    let mut text_run = String::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c.is_ascii_digit() {
            let mut end = start + c.len_utf8();
            while let Some(&(i, next)) = chars.peek() {
                if !next.is_ascii_digit() {
                    break;
                }
                end = i + next.len_utf8();
                chars.next();
            }
            chunks.push(Chunk::Text(std::mem::take(&mut text_run).to_lowercase()));
            chunks.push(Chunk::Number(Digits::new(&text[start..end])));
        } else {
            text_run.push(c);
        }
    }
    chunks.push(Chunk::Text(text_run.to_lowercase()));

    NaturalKey(chunks)
}

/// Compare two strings in natural order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_sort_key(a).cmp(&natural_sort_key(b))
}
