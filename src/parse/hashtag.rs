use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::task::dedup_tags;

/// A whole whitespace-delimited token of the form `#word`, where word is
/// ASCII alphanumerics, `_` or `-`.
static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([A-Za-z0-9_-]+)$").expect("hashtag pattern is valid"));

/// How hashtags in entered text become tags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagMode {
    /// Every hashtag becomes a tag and is stripped from the text
    #[default]
    Multi,
    /// Single-tag schema: only the last hashtag is taken and stripped
    LegacySingle,
}

/// Split entered text into display text and tags.
///
/// Returns the text with extracted hashtags removed and runs of whitespace
/// collapsed to a single space.
pub fn parse_text_and_tags(input: &str, mode: TagMode) -> (String, Vec<String>) {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    match mode {
        TagMode::Multi => {
            let mut words = Vec::new();
            let mut tags = Vec::new();
            for token in tokens {
                match hashtag(token) {
                    Some(tag) => tags.push(tag),
                    None => words.push(token),
                }
            }
            (words.join(" "), dedup_tags(tags))
        }
        TagMode::LegacySingle => {
            let last = tokens.iter().rposition(|t| hashtag(t).is_some());
            match last {
                Some(idx) => {
                    let tag = hashtag(tokens[idx]).map(str::to_string);
                    let words: Vec<&str> = tokens
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i != idx)
                        .map(|(_, t)| *t)
                        .collect();
                    (words.join(" "), tag.into_iter().collect())
                }
                None => (tokens.join(" "), Vec::new()),
            }
        }
    }
}

/// The tag name if `token` is a bare hashtag
fn hashtag(token: &str) -> Option<&str> {
    HASHTAG
        .captures(token)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}
