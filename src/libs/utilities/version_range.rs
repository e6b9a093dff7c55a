//! Version range matching for release tags.
//!
//! Ranges in `dcm_global.yaml` are written in the npm/node-semver dialect,
//! which differs from Cargo's:
//! - `>=1.0.0 <2.0.0` - whitespace separated comparators must all hold
//! - `^1.2.0 || ^2.0.0` - any alternative may hold
//! - `1.2.0 - 1.4.0` - inclusive hyphen range
//! - `1.2.3` - a bare version is an exact match (Cargo would read `^1.2.3`)
//! - `1.x`, `1.2.*`, `*` - wildcards
//! - `~>1.2` - same as `~1.2`
//! - `^1.0.0 ||` - an empty alternative matches any version
//!
//! Each alternative is rewritten into Cargo syntax and parsed as a
//! [`semver::VersionReq`].
//!
//! Cargo-only syntax is refused: comma separated comparators
//! (`>=1.0.0,<2.0.0`) are an error. Tags follow the same strict reading,
//! an optional lowercase `v` and nothing else, so `=1.2.3` or `V1.2.3`
//! never match. Where node-semver quietly treats a malformed range as
//! "matches nothing", the range is reported as unparsable instead, and a
//! range that is empty as a whole is refused.

use semver::{Version, VersionReq};
use std::fmt;

/// A parsed range: satisfied when any alternative is.
#[derive(Debug, Clone)]
pub struct VersionRange {
    raw: String,
    alternatives: Vec<VersionReq>,
}

impl VersionRange {
    /// Parses an npm style range expression.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err("empty version range".to_string());
        }

        let alternatives = trimmed
            .split("||")
            .map(|set| {
                // Empty alternative: no constraint at all.
                if set.trim().is_empty() {
                    return Ok(VersionReq::STAR);
                }
                let cargo_syntax = translate_comparator_set(set)?;
                VersionReq::parse(&cargo_syntax)
                    .map_err(|e| format!("invalid range '{}': {}", set.trim(), e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(VersionRange {
            raw: trimmed.to_string(),
            alternatives,
        })
    }

    /// Whether `tag` (e.g. `v1.5.0`) satisfies the range. Tags that are not
    /// semantic versions never match.
    pub fn matches_tag(&self, tag: &str) -> bool {
        match parse_tag(tag) {
            Some(version) => self.matches(&version),
            None => false,
        }
    }

    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parses a release tag into a version. Surrounding whitespace and one
/// leading lowercase `v` are accepted.
pub fn parse_tag(tag: &str) -> Option<Version> {
    let trimmed = tag.trim();
    Version::parse(trimmed.strip_prefix('v').unwrap_or(trimmed)).ok()
}

/// Rewrites one `||`-free comparator set into a comma separated Cargo
/// requirement.
fn translate_comparator_set(set: &str) -> Result<String, String> {
    let set = set.trim();
    // `VersionReq` would read a comma as "and"; npm ranges have no commas.
    if set.contains(',') {
        return Err(format!("unexpected ',' in '{set}'"));
    }

    if let Some((low, high)) = set.split_once(" - ") {
        let low = strip_wildcards(strip_v(low.trim()));
        let high = strip_wildcards(strip_v(high.trim()));
        let mut parts = Vec::new();
        if !low.is_empty() {
            parts.push(format!(">={low}"));
        }
        if !high.is_empty() {
            parts.push(format!("<={high}"));
        }
        return Ok(join_or_star(parts));
    }

    let mut comparators = Vec::new();
    let mut pending_op: Option<&str> = None;
    for token in set.split_whitespace() {
        // `>= 1.0.0` splits the operator from its version.
        if is_operator(token) {
            if pending_op.is_some() {
                return Err(format!("dangling operator in '{set}'"));
            }
            pending_op = Some(token);
            continue;
        }
        let joined = match pending_op.take() {
            Some(op) => format!("{op}{token}"),
            None => token.to_string(),
        };
        if let Some(comparator) = translate_comparator(&joined) {
            comparators.push(comparator);
        }
    }
    if let Some(op) = pending_op {
        return Err(format!("operator '{op}' without a version in '{set}'"));
    }

    Ok(join_or_star(comparators))
}

/// Translates one comparator; `None` means "matches everything".
fn translate_comparator(token: &str) -> Option<String> {
    let split = token
        .find(|c: char| c.is_ascii_alphanumeric() || c == '*')
        .unwrap_or(token.len());
    let (op, version) = token.split_at(split);
    let version = strip_wildcards(strip_v(version));

    if version.is_empty() {
        // `*`, `x`, `>=*`: no constraint.
        return None;
    }

    let op = match op {
        // Bare versions are exact in npm; `=1.2` still covers all of 1.2.x.
        "" => "=",
        "~>" => "~",
        other => other,
    };
    Some(format!("{op}{version}"))
}

fn is_operator(token: &str) -> bool {
    matches!(token, "<" | "<=" | ">" | ">=" | "=" | "^" | "~" | "~>")
}

fn strip_v(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

/// Drops trailing wildcard segments: `1.2.x` -> `1.2`, `x` -> ``.
fn strip_wildcards(version: &str) -> String {
    let (core, suffix) = match version.find(['-', '+']) {
        Some(index) => version.split_at(index),
        None => (version, ""),
    };
    let kept: Vec<&str> = core
        .split('.')
        .take_while(|segment| !matches!(*segment, "x" | "X" | "*" | ""))
        .collect();
    if kept.is_empty() {
        return String::new();
    }
    let mut result = kept.join(".");
    if kept.len() == core.split('.').count() {
        result.push_str(suffix);
    }
    result
}

fn join_or_star(parts: Vec<String>) -> String {
    if parts.is_empty() {
        "*".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(">=1.0.0 <2.0.0", "v1.5.0", true)]
    #[case(">=1.0.0 <2.0.0", "v2.0.0", false)]
    #[case(">=1.0.0 <2.0.0", "v0.9.0", false)]
    #[case(">= 1.0.0 < 2.0.0", "1.9.9", true)]
    #[case("^1.2.0", "1.20.3", true)]
    #[case("^1.2.0", "2.0.0", false)]
    #[case("~1.2.0", "1.2.9", true)]
    #[case("~1.2.0", "1.3.0", false)]
    #[case("1.2.3", "v1.2.3", true)]
    #[case("1.2.3", "v1.2.4", false)]
    #[case("1.x", "1.99.0", true)]
    #[case("1.2.*", "1.3.0", false)]
    #[case("*", "0.0.1", true)]
    #[case("1.0.0 - 1.4.0", "1.4.0", true)]
    #[case("1.0.0 - 1.4", "1.4.7", true)]
    #[case("1.0.0 - 1.4.0", "1.4.1", false)]
    #[case("^1.0.0 || ^3.0.0", "3.1.0", true)]
    #[case("^1.0.0 || ^3.0.0", "2.1.0", false)]
    #[case(">=v1.0.0", "1.0.0", true)]
    #[case(">=1.0.0", "not-a-version", false)]
    #[case(">=1.0.0", "1.1.0-beta.1", false)]
    #[case("~>1.2", "1.2.9", true)]
    #[case("~> 1.2", "1.3.0", false)]
    #[case("^1.0.0 ||", "5.0.0", true)]
    #[case("|| ^1.0.0", "0.1.0", true)]
    #[case(">=1.0.0", "=1.2.0", false)]
    #[case(">=1.0.0", "V1.2.0", false)]
    fn matches_tags(#[case] range: &str, #[case] tag: &str, #[case] expected: bool) {
        let range = VersionRange::parse(range).unwrap();
        assert_eq!(range.matches_tag(tag), expected, "{range} vs {tag}");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case(">=")]
    #[case("banana")]
    #[case(">=1.0.0,<2.0.0")]
    #[case(">=1.0.0, <2.0.0")]
    fn rejects_malformed_ranges(#[case] range: &str) {
        assert!(VersionRange::parse(range).is_err());
    }

    #[test]
    fn parses_prefixed_tags() {
        assert_eq!(parse_tag("v1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_tag(" 1.2.3 "), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_tag("=1.2.3"), None);
        assert_eq!(parse_tag("V1.2.3"), None);
        assert_eq!(parse_tag("release-1"), None);
    }
}
