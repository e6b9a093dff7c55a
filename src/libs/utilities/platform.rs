// Maps the host's operating system and CPU architecture onto the fixed set
// of (platform, architecture) pairs DCM is published for. Unknown values are
// never an error: they fall back to Linux and x64.

// Our custom logging macro for detailed, debug-only output.
use crate::log_debug;
// The fixed enumerations this module maps onto.
use crate::schemas::platform::{Architecture, Platform, PlatformArch};
// The 'colored' crate helps us make our console output look pretty and readable.
use colored::Colorize;
// Compile-time identifiers of the target, e.g. `OS = "macos"`, `ARCH = "aarch64"`.
use std::env::consts;

/// Detects the pair for the machine this binary runs on.
pub fn detect() -> PlatformArch {
    let pair = classify(consts::OS, consts::ARCH);
    log_debug!(
        "[Platform] Host reports os='{}' arch='{}', using {}",
        consts::OS,
        consts::ARCH,
        pair.to_string().cyan()
    );
    pair
}

/// Classifies raw OS and architecture identifiers.
pub fn classify(os: &str, arch: &str) -> PlatformArch {
    PlatformArch {
        platform: classify_platform(os),
        architecture: classify_architecture(arch),
    }
}

fn classify_platform(os: &str) -> Platform {
    match os.to_lowercase().as_str() {
        "windows" | "win32" => Platform::Windows,
        "macos" | "darwin" => Platform::MacOS,
        _ => Platform::Linux,
    }
}

// Rust reports 64-bit ARM as "aarch64"; other toolchains say "arm64".
fn classify_architecture(arch: &str) -> Architecture {
    match arch.to_lowercase().as_str() {
        "arm" | "arm64" | "aarch64" => Architecture::Arm,
        _ => Architecture::X64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("windows", Platform::Windows)]
    #[case("win32", Platform::Windows)]
    #[case("macos", Platform::MacOS)]
    #[case("darwin", Platform::MacOS)]
    #[case("linux", Platform::Linux)]
    #[case("freebsd", Platform::Linux)]
    #[case("", Platform::Linux)]
    fn maps_operating_systems(#[case] os: &str, #[case] expected: Platform) {
        assert_eq!(classify(os, "x86_64").platform, expected);
    }

    #[rstest]
    #[case("arm", Architecture::Arm)]
    #[case("arm64", Architecture::Arm)]
    #[case("aarch64", Architecture::Arm)]
    #[case("x86_64", Architecture::X64)]
    #[case("x64", Architecture::X64)]
    #[case("riscv64", Architecture::X64)]
    #[case("s390x", Architecture::X64)]
    fn maps_architectures(#[case] arch: &str, #[case] expected: Architecture) {
        assert_eq!(classify("linux", arch).architecture, expected);
    }

    #[test]
    fn detection_never_fails() {
        let pair = detect();
        assert_eq!(pair, classify(consts::OS, consts::ARCH));
    }
}
