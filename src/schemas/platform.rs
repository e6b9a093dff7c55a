// Platform and architecture identifiers used to pick a release artifact and
// to key the artifact cache.

use std::fmt;

/// Operating systems a DCM release is published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    MacOS,
    Linux,
}

/// CPU architectures a DCM release is published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    Arm,
    X64,
}

/// The `(platform, architecture)` pair detected once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformArch {
    pub platform: Platform,
    pub architecture: Architecture,
}

impl Platform {
    /// Name used in artifact file names (`dcm-<platform>-...`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::MacOS => "macos",
            Platform::Linux => "linux",
        }
    }

    /// File name of the tool's executable on this platform.
    pub fn executable_name(&self, tool_name: &str) -> String {
        match self {
            Platform::Windows => format!("{tool_name}.exe"),
            _ => tool_name.to_string(),
        }
    }
}

impl Architecture {
    /// Name used in artifact file names and cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::Arm => "arm",
            Architecture::X64 => "x64",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PlatformArch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.platform, self.architecture)
    }
}
