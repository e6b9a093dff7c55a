// Canonical download URL of a release artifact.
//
// Windows has a single published build, so its file name carries no
// architecture: `dcm-windows-release.zip`. Every other platform embeds both:
// `dcm-linux-x64-release.zip`, `dcm-macos-arm-release.zip`.

use crate::schemas::common::Upstream;
use crate::schemas::platform::{Architecture, Platform};

/// File name of the release artifact for a platform/architecture.
pub fn artifact_name(tool_name: &str, platform: Platform, architecture: Architecture) -> String {
    match platform {
        Platform::Windows => format!("{tool_name}-{platform}-release.zip"),
        _ => format!("{tool_name}-{platform}-{architecture}-release.zip"),
    }
}

/// `<download_url>/<owner>/<repo>/releases/download/<version>/<artifact>`
pub fn locate(
    upstream: &Upstream,
    tool_name: &str,
    version: &str,
    platform: Platform,
    architecture: Architecture,
) -> String {
    format!(
        "{}/{}/{}/releases/download/{}/{}",
        upstream.download_url.trim_end_matches('/'),
        upstream.owner,
        upstream.repo,
        version,
        artifact_name(tool_name, platform, architecture)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_url_has_no_architecture() {
        let url = locate(&Upstream::default(), "dcm", "v1.2.0", Platform::Windows, Architecture::X64);
        assert_eq!(
            url,
            "https://github.com/CQLabs/homebrew-dcm/releases/download/v1.2.0/dcm-windows-release.zip"
        );
        assert!(!url.contains("x64"));
    }

    #[test]
    fn linux_arm_url_names_platform_and_architecture() {
        let url = locate(&Upstream::default(), "dcm", "v1.2.0", Platform::Linux, Architecture::Arm);
        assert_eq!(
            url,
            "https://github.com/CQLabs/homebrew-dcm/releases/download/v1.2.0/dcm-linux-arm-release.zip"
        );
    }

    #[test]
    fn macos_x64_artifact_name() {
        assert_eq!(
            artifact_name("dcm", Platform::MacOS, Architecture::X64),
            "dcm-macos-x64-release.zip"
        );
    }

    #[test]
    fn custom_upstream_is_honoured() {
        let upstream = Upstream {
            owner: "acme".to_string(),
            repo: "dcm-mirror".to_string(),
            download_url: "https://ghe.example.com/".to_string(),
            ..Upstream::default()
        };
        let url = locate(&upstream, "dcm", "1.0.0", Platform::Linux, Architecture::X64);
        assert_eq!(
            url,
            "https://ghe.example.com/acme/dcm-mirror/releases/download/1.0.0/dcm-linux-x64-release.zip"
        );
    }
}
