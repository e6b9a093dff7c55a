//! # Tool Cache
//!
//! A directory-per-version cache of extracted release artifacts, laid out the
//! way hosted runners lay out their tool cache so entries written by other
//! setup actions look the same:
//!
//! ```text
//! <root>/<tool>/<version>/<arch>/            extracted artifact
//! <root>/<tool>/<version>/<arch>.complete    written last, marks the entry usable
//! ```
//!
//! [`ArtifactCache::acquire`] consults the cache before any network access.
//! On a miss it downloads the artifact once, extracts it and registers the
//! extracted tree as a fresh entry.
//!
//! A version only becomes a directory name when it is a single plain path
//! segment; tags such as `../x` or `a/b` are rejected before any path is
//! built, so an entry can never resolve outside the cache root.
//!
//! No lock is taken around "look up, else populate": one installation per
//! cache key at a time is assumed. Two runs racing on a shared cache both
//! populate the entry and the later one wins.

// Downloads go through this trait so tests can serve archives from memory.
use crate::libs::utilities::assets::ArtifactFetcher;
// Zip extraction into the staging directory.
use crate::libs::utilities::compression::extract_zip;
// Copying the extracted tree into the cache and clearing stale entries.
use crate::libs::utilities::file_operations::{copy_dir_contents, remove_if_exists};
// Semantic-version parsing of release tags, for the version directory name.
use crate::libs::utilities::version_range::parse_tag;
// Typed failures of this step.
use crate::schemas::errors::AcquisitionError;
// The architecture is part of the key; the platform decides `dcm` vs `dcm.exe`.
use crate::schemas::platform::{Architecture, Platform};
// Our custom logging macros.
use crate::{log_debug, log_info, log_warn};
// The 'colored' crate helps us make our console output look pretty and readable.
use colored::Colorize;
// For creating the staging root and writing the completion marker.
use std::fs;
// For working with file paths in an OS-agnostic way.
use std::path::{Path, PathBuf};

/// Key of one cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheKey<'a> {
    pub tool_name: &'a str,
    pub version: &'a str,
    pub architecture: Architecture,
}

/// The on-disk cache store.
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
}

impl ToolCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ToolCache { root: root.into() }
    }

    /// `<root>/<tool>/<version>`, shared by the entry and its marker.
    fn version_dir(&self, key: &CacheKey) -> Result<PathBuf, AcquisitionError> {
        Ok(self.root.join(key.tool_name).join(clean_version(key.version)?))
    }

    /// Directory of the entry for `key`, whether or not it exists.
    pub fn entry_dir(&self, key: &CacheKey) -> Result<PathBuf, AcquisitionError> {
        Ok(self.version_dir(key)?.join(key.architecture.as_str()))
    }

    fn marker_path(&self, key: &CacheKey) -> Result<PathBuf, AcquisitionError> {
        Ok(self
            .version_dir(key)?
            .join(format!("{}.complete", key.architecture.as_str())))
    }

    /// The entry for `key` if it was completely populated.
    pub fn find(&self, key: &CacheKey) -> Option<PathBuf> {
        let dir = self.entry_dir(key).ok()?;
        let marker = self.marker_path(key).ok()?;
        // Both must exist: a directory without its marker is a half-written entry.
        if dir.is_dir() && marker.is_file() {
            Some(dir)
        } else {
            None
        }
    }

    /// Copies `source` into a fresh entry for `key`, replacing any previous
    /// entry, and marks it complete.
    pub fn store(&self, source: &Path, key: &CacheKey) -> Result<PathBuf, AcquisitionError> {
        let dir = self.entry_dir(key)?;
        let marker = self.marker_path(key)?;
        // Builds a `map_err` adapter that remembers which path failed.
        let cache_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| AcquisitionError::Cache { path, source }
        };

        log_debug!("[Cache] Populating {}", dir.to_string_lossy().cyan());
        // Marker first, so a crash mid-way leaves an entry `find` ignores.
        remove_if_exists(&marker).map_err(cache_err(&marker))?;
        remove_if_exists(&dir).map_err(cache_err(&dir))?;
        copy_dir_contents(source, &dir).map_err(cache_err(&dir))?;
        // Marker last: the entry is complete from here on.
        fs::write(&marker, b"").map_err(cache_err(&marker))?;

        Ok(dir)
    }
}

/// Cache directory name for a version: the semantic version without a
/// leading `v` when the tag parses as one, the trimmed tag otherwise.
///
/// Tags that are not a single plain path segment (empty, `.`, `..`, or
/// containing `/`, `\` or `:`) are rejected.
pub fn clean_version(version: &str) -> Result<String, AcquisitionError> {
    let cleaned = match parse_tag(version) {
        Some(parsed) => parsed.to_string(),
        None => version.trim().to_string(),
    };

    let unsafe_segment = cleaned.is_empty()
        || cleaned == "."
        || cleaned == ".."
        || cleaned.contains(['/', '\\', ':']);
    if unsafe_segment {
        return Err(AcquisitionError::UnsafeVersion(version.to_string()));
    }
    Ok(cleaned)
}

/// Cache lookup in front of download and extraction.
pub struct ArtifactCache<'a> {
    cache: &'a ToolCache,
    fetcher: &'a dyn ArtifactFetcher,
    platform: Platform,
    staging_root: PathBuf,
}

impl<'a> ArtifactCache<'a> {
    pub fn new(
        cache: &'a ToolCache,
        fetcher: &'a dyn ArtifactFetcher,
        platform: Platform,
        staging_root: impl Into<PathBuf>,
    ) -> Self {
        ArtifactCache {
            cache,
            fetcher,
            platform,
            staging_root: staging_root.into(),
        }
    }

    /// Returns the cache entry holding the extracted artifact for
    /// `(tool_name, version, architecture)`, downloading `url` on a miss.
    ///
    /// # Arguments
    /// * `url`: Where to download the artifact from on a miss.
    /// * `tool_name`, `version`, `architecture`: The cache key.
    pub fn acquire(
        &self,
        url: &str,
        tool_name: &str,
        version: &str,
        architecture: Architecture,
    ) -> Result<PathBuf, AcquisitionError> {
        let key = CacheKey {
            tool_name,
            version,
            architecture,
        };
        // Refuse unusable versions before touching the cache or the network.
        let expected = self.cache.entry_dir(&key)?;
        log_debug!("[Cache] Looking for {}", expected.to_string_lossy().cyan());

        if let Some(dir) = self.cache.find(&key) {
            if self.holds_executable(&dir, tool_name) {
                log_info!("Using cached version from {}.", dir.to_string_lossy().green());
                return Ok(dir);
            }
            // Complete entry, but the executable is gone: treat it as a miss.
            log_warn!(
                "[Cache] Entry {} has no {} executable; downloading it again.",
                dir.to_string_lossy().yellow(),
                tool_name
            );
        }

        self.download_and_store(url, &key)
    }

    /// A usable entry holds the executable at its root, or in `bin/` when
    /// a previous run already installed it there.
    fn holds_executable(&self, dir: &Path, tool_name: &str) -> bool {
        let executable = self.platform.executable_name(tool_name);
        dir.join(&executable).is_file() || dir.join("bin").join(&executable).is_file()
    }

    /// Miss path: download into a private staging directory, extract, copy
    /// into the cache.
    fn download_and_store(&self, url: &str, key: &CacheKey) -> Result<PathBuf, AcquisitionError> {
        // The staging directory lives under the configured temp root and is
        // removed when `staging` goes out of scope.
        fs::create_dir_all(&self.staging_root).map_err(AcquisitionError::Staging)?;
        let staging = tempfile::Builder::new()
            .prefix("setup-dcm-")
            .tempdir_in(&self.staging_root)
            .map_err(AcquisitionError::Staging)?;

        // Keep the artifact's own file name for the downloaded archive.
        let archive = staging.path().join(archive_file_name(url));
        log_info!("Downloading from {}...", url.blue());
        self.fetcher
            .fetch(url, &archive)
            .map_err(|e| AcquisitionError::Download {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        // Unpack next to the archive, then register the result.
        let extracted =
            extract_zip(&archive, staging.path()).map_err(|e| AcquisitionError::Extract {
                archive: archive.clone(),
                message: e.to_string(),
            })?;

        let dir = self.cache.store(&extracted, key)?;
        log_info!("Extracted path: {}.", dir.to_string_lossy().green());

        // `staging` is dropped here, removing the archive and the extracted copy.
        Ok(dir)
    }
}

/// Last URL segment, e.g. `dcm-linux-x64-release.zip`.
fn archive_file_name(url: &str) -> String {
    url.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("artifact.zip")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::utilities::assets::{FetchError, HttpFetcher};
    use rstest::rstest;
    use std::cell::RefCell;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::FileOptions;

    const URL: &str = "https://example.invalid/v1.2.0/dcm-linux-x64-release.zip";

    /// Serves a fixed zip body and records every requested URL.
    struct ZipFetcher {
        entries: Vec<(&'static str, &'static [u8])>,
        requests: RefCell<Vec<String>>,
    }

    impl ZipFetcher {
        fn with_tool() -> Self {
            ZipFetcher {
                entries: vec![("dcm", b"#!/bin/sh\necho dcm\n".as_slice())],
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl ArtifactFetcher for ZipFetcher {
        fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
            self.requests.borrow_mut().push(url.to_string());
            let mut writer = zip::ZipWriter::new(File::create(dest).unwrap());
            for (name, contents) in &self.entries {
                writer.start_file(*name, FileOptions::default()).unwrap();
                writer.write_all(contents).unwrap();
            }
            writer.finish().unwrap();
            Ok(())
        }
    }

    struct FailingFetcher;

    impl ArtifactFetcher for FailingFetcher {
        fn fetch(&self, _url: &str, _dest: &Path) -> Result<(), FetchError> {
            Err(FetchError("HTTP 404".to_string()))
        }
    }

    struct GarbageFetcher;

    impl ArtifactFetcher for GarbageFetcher {
        fn fetch(&self, _url: &str, dest: &Path) -> Result<(), FetchError> {
            fs::write(dest, b"definitely not a zip").unwrap();
            Ok(())
        }
    }

    struct Fixture {
        cache_dir: TempDir,
        staging_dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                cache_dir: TempDir::new().unwrap(),
                staging_dir: TempDir::new().unwrap(),
            }
        }

        fn cache(&self) -> ToolCache {
            ToolCache::new(self.cache_dir.path())
        }
    }

    #[test]
    fn second_acquire_hits_the_cache() {
        let fixture = Fixture::new();
        let cache = fixture.cache();
        let fetcher = ZipFetcher::with_tool();
        let artifacts = ArtifactCache::new(&cache, &fetcher, Platform::Linux, fixture.staging_dir.path());

        let first = artifacts.acquire(URL, "dcm", "v1.2.0", Architecture::X64).unwrap();
        let second = artifacts.acquire(URL, "dcm", "v1.2.0", Architecture::X64).unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.requests.borrow().as_slice(), [URL.to_string()]);
        assert_eq!(first, fixture.cache_dir.path().join("dcm/1.2.0/x64"));
        assert!(first.join("dcm").is_file());
    }

    #[test]
    fn entry_without_executable_is_downloaded_again() {
        let fixture = Fixture::new();
        let cache = fixture.cache();
        let fetcher = ZipFetcher::with_tool();
        let artifacts = ArtifactCache::new(&cache, &fetcher, Platform::Linux, fixture.staging_dir.path());

        let dir = artifacts.acquire(URL, "dcm", "v1.2.0", Architecture::X64).unwrap();
        fs::remove_file(dir.join("dcm")).unwrap();

        let again = artifacts.acquire(URL, "dcm", "v1.2.0", Architecture::X64).unwrap();

        assert_eq!(fetcher.requests.borrow().len(), 2);
        assert!(again.join("dcm").is_file());
    }

    #[test]
    fn installed_entry_counts_as_a_hit() {
        let fixture = Fixture::new();
        let cache = fixture.cache();
        let fetcher = ZipFetcher::with_tool();
        let artifacts = ArtifactCache::new(&cache, &fetcher, Platform::Linux, fixture.staging_dir.path());

        let dir = artifacts.acquire(URL, "dcm", "v1.2.0", Architecture::X64).unwrap();
        fs::create_dir_all(dir.join("bin")).unwrap();
        fs::rename(dir.join("dcm"), dir.join("bin/dcm")).unwrap();

        artifacts.acquire(URL, "dcm", "v1.2.0", Architecture::X64).unwrap();

        assert_eq!(fetcher.requests.borrow().len(), 1);
    }

    #[test]
    fn windows_entries_need_the_exe() {
        let fixture = Fixture::new();
        let cache = fixture.cache();
        // The archive carries `dcm` but Windows expects `dcm.exe`.
        let fetcher = ZipFetcher::with_tool();
        let artifacts = ArtifactCache::new(&cache, &fetcher, Platform::Windows, fixture.staging_dir.path());

        artifacts.acquire(URL, "dcm", "v1.2.0", Architecture::X64).unwrap();
        artifacts.acquire(URL, "dcm", "v1.2.0", Architecture::X64).unwrap();

        assert_eq!(fetcher.requests.borrow().len(), 2);
    }

    #[test]
    fn incomplete_entry_is_ignored() {
        let fixture = Fixture::new();
        let cache = fixture.cache();
        let key = CacheKey {
            tool_name: "dcm",
            version: "v1.2.0",
            architecture: Architecture::Arm,
        };
        fs::create_dir_all(cache.entry_dir(&key).unwrap()).unwrap();
        fs::write(cache.entry_dir(&key).unwrap().join("dcm"), b"partial").unwrap();

        assert_eq!(cache.find(&key), None);
    }

    #[test]
    fn keys_are_separated_by_architecture() {
        let fixture = Fixture::new();
        let cache = fixture.cache();
        let fetcher = ZipFetcher::with_tool();
        let artifacts = ArtifactCache::new(&cache, &fetcher, Platform::Linux, fixture.staging_dir.path());

        let x64 = artifacts.acquire(URL, "dcm", "v1.2.0", Architecture::X64).unwrap();
        let arm = artifacts.acquire(URL, "dcm", "v1.2.0", Architecture::Arm).unwrap();

        assert_ne!(x64, arm);
        assert_eq!(fetcher.requests.borrow().len(), 2);
    }

    #[test]
    fn download_failure_is_reported() {
        let fixture = Fixture::new();
        let cache = fixture.cache();
        let artifacts = ArtifactCache::new(&cache, &FailingFetcher, Platform::Linux, fixture.staging_dir.path());

        let err = artifacts.acquire(URL, "dcm", "v1.2.0", Architecture::X64).unwrap_err();

        assert!(matches!(err, AcquisitionError::Download { ref message, .. } if message == "HTTP 404"));
        assert_eq!(cache.find(&CacheKey { tool_name: "dcm", version: "v1.2.0", architecture: Architecture::X64 }), None);
    }

    #[test]
    fn corrupt_archive_is_an_extract_error() {
        let fixture = Fixture::new();
        let cache = fixture.cache();
        let artifacts = ArtifactCache::new(&cache, &GarbageFetcher, Platform::Linux, fixture.staging_dir.path());

        let err = artifacts.acquire(URL, "dcm", "v1.2.0", Architecture::X64).unwrap_err();

        assert!(matches!(err, AcquisitionError::Extract { .. }));
    }

    #[test]
    fn staging_is_cleaned_up() {
        let fixture = Fixture::new();
        let cache = fixture.cache();
        let fetcher = ZipFetcher::with_tool();
        let artifacts = ArtifactCache::new(&cache, &fetcher, Platform::Linux, fixture.staging_dir.path());

        artifacts.acquire(URL, "dcm", "v1.2.0", Architecture::X64).unwrap();

        assert_eq!(fs::read_dir(fixture.staging_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn clean_version_strips_prefix_only_for_semver_tags() {
        assert_eq!(clean_version("v1.2.0").unwrap(), "1.2.0");
        assert_eq!(clean_version("1.21.0").unwrap(), "1.21.0");
        assert_eq!(clean_version("nightly-2024").unwrap(), "nightly-2024");
    }

    #[rstest]
    #[case("../../x")]
    #[case("..")]
    #[case(".")]
    #[case("a/b")]
    #[case("a\\b")]
    #[case("C:evil")]
    #[case("  ")]
    fn clean_version_rejects_path_like_tags(#[case] tag: &str) {
        assert!(matches!(
            clean_version(tag),
            Err(AcquisitionError::UnsafeVersion(ref rejected)) if rejected == tag
        ));
    }

    #[test]
    fn traversal_tag_never_touches_the_filesystem() {
        let fixture = Fixture::new();
        let cache = ToolCache::new(fixture.cache_dir.path().join("cache"));
        // A sibling of the cache root that `../x` would resolve to.
        let outside = fixture.cache_dir.path().join("x");
        fs::create_dir_all(&outside).unwrap();
        fs::write(outside.join("keep"), b"precious").unwrap();
        let fetcher = ZipFetcher::with_tool();
        let artifacts = ArtifactCache::new(&cache, &fetcher, Platform::Linux, fixture.staging_dir.path());

        let err = artifacts.acquire(URL, "dcm", "../../x", Architecture::X64).unwrap_err();

        assert!(matches!(err, AcquisitionError::UnsafeVersion(_)));
        assert!(fetcher.requests.borrow().is_empty());
        assert_eq!(fs::read(outside.join("keep")).unwrap(), b"precious");
    }

    #[test]
    fn download_error_names_the_url_once() {
        let fixture = Fixture::new();
        let cache = fixture.cache();
        let fetcher = HttpFetcher::new();
        let artifacts = ArtifactCache::new(&cache, &fetcher, Platform::Linux, fixture.staging_dir.path());
        let url = "http://127.0.0.1:9/v1.0.0/dcm-linux-x64-release.zip";

        let err = artifacts.acquire(url, "dcm", "v1.0.0", Architecture::X64).unwrap_err();

        assert!(matches!(err, AcquisitionError::Download { .. }));
        assert_eq!(err.to_string().matches(url).count(), 1, "{}", err);
    }
}
