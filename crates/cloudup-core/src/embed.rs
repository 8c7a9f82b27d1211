//! Discovery of local media embeds (`![[target]]`) in note text.

use std::sync::LazyLock;

use regex::Regex;

static EMBED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\[([^\[\]\n]+?)\]\]").expect("valid regex"));

/// A local embed found in a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    /// The exact embed text, used as the replacement needle.
    pub raw: String,
    /// Link target with `|alias` and `#fragment` removed.
    pub target: String,
}

/// Find media embeds in `text`, in document order.
///
/// Remote targets (`http://`, `https://`) and note transclusions (`.md` or
/// no extension) are skipped.
#[must_use]
pub fn find_embeds(text: &str) -> Vec<Embed> {
    EMBED_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let raw = caps.get(0)?.as_str();
            let inner = caps.get(1)?.as_str();
            let target = inner.split(['|', '#']).next()?.trim();
            if target.starts_with("http://") || target.starts_with("https://") {
                return None;
            }
            let name = target.rsplit('/').next().unwrap_or(target);
            let (_, ext) = name.rsplit_once('.')?;
            if ext.eq_ignore_ascii_case("md") {
                return None;
            }
            Some(Embed {
                raw: raw.to_owned(),
                target: target.to_owned(),
            })
        })
        .collect()
}
