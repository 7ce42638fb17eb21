//! Link harvesting from raw results-page markup.
//!
//! Search result pages wrap outbound links in a redirect of the form
//! `/url?q=<absolute-url>&...`. The scanner below walks the document once,
//! left to right, and collects every anchor whose href carries that wrapper.
//! The ordinal assigned to each link is its match order in that single scan,
//! which is exactly the visual rank on the page.

use serde::{Deserialize, Serialize};
use serptrack_core::Error;

/// Redirect wrapper prefix in front of outbound link targets.
const WRAPPER_PREFIX: &str = "/url?q=";

/// A harvested outbound link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// 1-based ordinal among all extracted links, in document order.
    pub position: u32,
    /// The wrapped absolute URL, extracted verbatim.
    pub href: String,
}

/// Extract wrapped outbound links from raw markup, in document order.
///
/// Anchors whose href is not a `/url?q=` wrapper around an absolute
/// http(s) URL (optional `www.`, scheme matched case-insensitively) are
/// skipped and not counted. The wrapped URL is taken verbatim up to the
/// next `&` or the closing attribute quote.
///
/// # Errors
///
/// Returns `Error::InvalidInput` if the markup is empty or whitespace-only.
pub fn extract_links(markup: &str) -> Result<Vec<Link>, Error> {
    if markup.trim().is_empty() {
        return Err(Error::InvalidInput("markup cannot be empty or whitespace".into()));
    }

    let mut links = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = find_ignore_case(&markup[cursor..], "<a") {
        let after_name = cursor + offset + 2;

        // Only `<a` followed by whitespace opens an anchor element; this
        // rejects `<abbr`, `<area`, and friends.
        match markup.as_bytes().get(after_name) {
            Some(b) if b.is_ascii_whitespace() => {}
            _ => {
                cursor = after_name;
                continue;
            }
        }

        let tag_end = markup[after_name..]
            .find('>')
            .map(|i| after_name + i)
            .unwrap_or(markup.len());

        if let Some(target) = wrapped_target(&markup[after_name..tag_end]) {
            links.push(Link { position: links.len() as u32 + 1, href: target.to_string() });
        }

        cursor = tag_end;
    }

    Ok(links)
}

/// Pull the wrapped absolute URL out of an anchor tag body, if present.
fn wrapped_target(tag: &str) -> Option<&str> {
    let href = find_ignore_case(tag, "href")?;
    let rest = tag[href + 4..].trim_start();
    let rest = rest.strip_prefix('=')?.trim_start();

    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    let value = match value.find(quote) {
        Some(end) => &value[..end],
        None => value,
    };

    let wrapped = strip_prefix_ignore_case(value, WRAPPER_PREFIX)?;
    let target = match wrapped.find('&') {
        Some(amp) => &wrapped[..amp],
        None => wrapped,
    };

    has_absolute_scheme(target).then_some(target)
}

/// True when the candidate starts with `http://` or `https://` (any casing,
/// optional `www.`) and carries at least one character beyond the prefix.
fn has_absolute_scheme(candidate: &str) -> bool {
    let lower = candidate.to_ascii_lowercase();
    let Some(rest) = lower.strip_prefix("https://").or_else(|| lower.strip_prefix("http://")) else {
        return false;
    };
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    !rest.is_empty()
}

/// Byte offset of the first ASCII-case-insensitive occurrence of `needle`.
fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (0..=haystack.len() - needle.len()).find(|&i| haystack[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

/// `str::strip_prefix` with ASCII-case-insensitive comparison.
fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let n = prefix.len();
    if s.len() >= n && s.as_bytes()[..n].eq_ignore_ascii_case(prefix.as_bytes()) {
        Some(&s[n..])
    } else {
        None
    }
}
