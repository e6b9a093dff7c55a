use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// An opaque release identifier such as `v1.5.0`.
pub type ReleaseTag = String;

/// What the user asked for through the `version` input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    /// The most recent published release.
    Latest,
    /// Match the range declared in the project's configuration file.
    Auto,
    /// A tag used verbatim, never checked against the release list.
    Explicit(ReleaseTag),
}

impl FromStr for VersionSelector {
    type Err = Infallible;

    /// Keywords are matched exactly after trimming; an empty input falls back
    /// to `latest`, everything else is taken as a tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "" | "latest" => VersionSelector::Latest,
            "auto" => VersionSelector::Auto,
            tag => VersionSelector::Explicit(tag.to_string()),
        })
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VersionSelector::Latest => write!(f, "latest"),
            VersionSelector::Auto => write!(f, "auto"),
            VersionSelector::Explicit(tag) => write!(f, "{tag}"),
        }
    }
}
