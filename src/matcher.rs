//! Segment-aligned path matching.
//!
//! A pattern is a `/`-delimited list of segments. A segment starting with `:`
//! is a parameter and matches any single pathname segment; every other
//! segment must be equal to its counterpart. Empty segments are ignored on
//! both sides, so `/users/42`, `users/42/` and `//users//42` are the same path.
//!
//! There are no prefix matches, optional segments or trailing wildcards. The
//! universal fallback patterns (`*` and `/*`) are handled by the router, not
//! here.

use std::collections::HashMap;

/// Marks a pattern segment as a named parameter.
const PARAM_MARKER: char = ':';

/// Returns `true` if `pathname` matches `pattern`.
///
/// ```rust
/// use takanashi::matcher;
///
/// assert!(matcher::matches("/users/:id", "/users/42"));
/// assert!(!matcher::matches("/users/:id", "/users/42/posts"));
/// ```
pub fn matches(pattern: &str, pathname: &str) -> bool {
    if pattern == pathname {
        return true;
    }

    let pattern: Vec<&str> = segments(pattern).collect();
    let pathname: Vec<&str> = segments(pathname).collect();

    pattern.len() == pathname.len()
        && pattern
            .iter()
            .zip(&pathname)
            .all(|(p, s)| is_param(p) || p == s)
}

/// Captures the parameter segments of `pattern` from `pathname`.
///
/// Only meaningful after [`matches`] returned `true`. A parameter whose
/// position lies past the end of `pathname` is left out of the map.
pub fn extract_params(pathname: &str, pattern: &str) -> HashMap<String, String> {
    let pathname: Vec<&str> = segments(pathname).collect();

    segments(pattern)
        .enumerate()
        .filter_map(|(i, seg)| {
            let name = seg.strip_prefix(PARAM_MARKER)?;
            let value = pathname.get(i)?;
            Some((name.to_owned(), (*value).to_owned()))
        })
        .collect()
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn is_param(segment: &str) -> bool {
    segment.starts_with(PARAM_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_string_always_matches() {
        assert!(matches("/", "/"));
        assert!(matches("/about", "/about"));
        assert!(matches("*", "*"));
    }

    #[test]
    fn literal_segments_must_be_equal() {
        assert!(matches("/users/list", "/users/list"));
        assert!(!matches("/users/list", "/users/all"));
        assert!(!matches("/users", "/Users"));
    }

    #[test]
    fn empty_segments_are_normalized_away() {
        assert!(matches("/users/list", "/users/list/"));
        assert!(matches("/users/list", "//users//list"));
        assert!(matches("users/list", "/users/list"));
        assert!(matches("/", ""));
    }

    #[test]
    fn segment_count_must_match() {
        assert!(!matches("/users/:id", "/users"));
        assert!(!matches("/users/:id", "/users/42/posts"));
        assert!(!matches("/", "/users"));
    }

    #[test]
    fn parameter_segment_matches_anything() {
        assert!(matches("/users/:id", "/users/42"));
        assert!(matches("/users/:id", "/users/alice"));
        assert!(matches("/:a/:b", "/x/y"));
        assert!(!matches("/users/:id/posts", "/users/42/comments"));
    }

    #[test]
    fn extracts_named_parameters() {
        let params = extract_params("/users/42", "/users/:id");
        assert_eq!(params.len(), 1);
        assert_eq!(params["id"], "42");

        let params = extract_params("/org/acme/repo/tools", "/org/:org/repo/:repo");
        assert_eq!(params["org"], "acme");
        assert_eq!(params["repo"], "tools");
    }

    #[test]
    fn literal_pattern_has_no_params() {
        assert!(extract_params("/about", "/about").is_empty());
    }

    #[test]
    fn short_pathname_does_not_panic() {
        let params = extract_params("/users", "/users/:id");
        assert!(params.get("id").is_none());
    }
}
