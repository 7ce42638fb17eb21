//! Position matching: where an ordered link sequence contains a target URL.

use serptrack_core::Error;

use super::links::Link;

/// Ordinals of the links whose href contains `target_url`, ascending.
///
/// Matching is case-insensitive substring containment, so a bare domain
/// matches links carrying a path or query suffix. An empty return is valid;
/// the not-found sentinel is the orchestrator's concern.
///
/// # Errors
///
/// Returns `Error::InvalidInput` if the target URL is empty or
/// whitespace-only.
pub fn match_positions(links: &[Link], target_url: &str) -> Result<Vec<u32>, Error> {
    if target_url.trim().is_empty() {
        return Err(Error::InvalidInput("target URL cannot be empty".into()));
    }

    let needle = target_url.to_lowercase();

    Ok(links
        .iter()
        .filter(|link| link.href.to_lowercase().contains(&needle))
        .map(|link| link.position)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_links;

    fn link(position: u32, href: &str) -> Link {
        Link { position, href: href.to_string() }
    }

    #[test]
    fn test_empty_target_rejected() {
        let links = vec![link(1, "https://example.com")];
        let result = match_positions(&links, "");
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_whitespace_target_rejected() {
        let result = match_positions(&[], "   ");
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_no_links_no_positions() {
        let positions = match_positions(&[], "https://example.com").unwrap();
        assert!(positions.is_empty());
    }

    #[test]
    fn test_no_match_returns_empty() {
        let links = vec![link(1, "https://www.udemy.com/course/x")];
        let positions = match_positions(&links, "https://example.com").unwrap();
        assert!(positions.is_empty());
    }

    #[test]
    fn test_substring_match_with_suffix() {
        let links = vec![link(1, "https://example.com/pricing?ref=serp")];
        let positions = match_positions(&links, "example.com").unwrap();
        assert_eq!(positions, vec![1]);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let links = vec![link(1, "https://Example.COM/About")];
        let positions = match_positions(&links, "https://example.com").unwrap();
        assert_eq!(positions, vec![1]);
    }

    #[test]
    fn test_positions_ascending() {
        let links = vec![
            link(1, "https://example.se/"),
            link(2, "https://www.linkedin.com/company/example"),
            link(3, "https://www.udemy.com/course/x"),
            link(4, "https://example.se/about"),
        ];
        let positions = match_positions(&links, "https://example.se/").unwrap();
        assert_eq!(positions, vec![1, 4]);
    }

    #[test]
    fn test_substring_rule_overmatches_lookalike_hosts() {
        // Documented behavior of the containment rule: a bare domain also
        // matches hosts that merely embed it.
        let links = vec![link(1, "https://example.com.evil.com/login")];
        let positions = match_positions(&links, "example.com").unwrap();
        assert_eq!(positions, vec![1]);
    }

    #[test]
    fn test_single_anchor_page_end_to_end() {
        let markup = r#"<a href="/url?q=https://example.com">Link</a>"#;
        let links = extract_links(markup).unwrap();
        let positions = match_positions(&links, "https://example.com").unwrap();
        assert_eq!(positions, vec![1]);
    }

    #[test]
    fn test_four_anchor_page_end_to_end() {
        let markup = concat!(
            r#"<a href="/url?q=https://example.se/&sa=U">Example</a>"#,
            r#"<a href="/url?q=https://www.linkedin.com/company/example&sa=U">LinkedIn</a>"#,
            r#"<a href="/url?q=https://www.udemy.com/course/x&sa=U">Udemy</a>"#,
            r#"<a href="/url?q=https://example.se/about&sa=U">About</a>"#,
        );
        let links = extract_links(markup).unwrap();
        let positions = match_positions(&links, "https://example.se/").unwrap();
        assert_eq!(positions, vec![1, 4]);
    }

    #[test]
    fn test_rank_shifts_with_preceding_links() {
        let bare = r#"<a href="/url?q=https://example.com">Hit</a>"#;
        let with_preceding = concat!(
            r#"<a href="/url?q=https://other.com">Miss</a>"#,
            r#"<a href="/url?q=https://example.com">Hit</a>"#,
        );

        let positions = match_positions(&extract_links(bare).unwrap(), "example.com").unwrap();
        assert_eq!(positions, vec![1]);

        let positions = match_positions(&extract_links(with_preceding).unwrap(), "example.com").unwrap();
        assert_eq!(positions, vec![2]);
    }

    #[test]
    fn test_rank_unaffected_by_following_links() {
        let with_following = concat!(
            r#"<a href="/url?q=https://example.com">Hit</a>"#,
            r#"<a href="/url?q=https://other.com">Miss</a>"#,
            r#"<a href="/url?q=https://another.com">Miss</a>"#,
        );
        let positions = match_positions(&extract_links(with_following).unwrap(), "example.com").unwrap();
        assert_eq!(positions, vec![1]);
    }
}
