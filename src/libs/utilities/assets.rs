// Download of release artifacts over HTTP.
//
// Failures are returned to the caller, never logged here as errors: the
// pipeline reports each failure exactly once, from `main`.

// The 'colored' crate helps us make our console output look pretty and readable.
use colored::Colorize;
// Our custom logging macro for detailed, debug-only output.
use crate::log_debug;
// For creating the destination file of a download.
use std::fs::File;
// `BufWriter` batches the many small writes `io::copy` makes into larger ones.
// `std::io` also brings the `Write` trait for `flush`.
use std::io::{self, BufWriter, Write};
// For working with file paths in an OS-agnostic way.
use std::path::Path;

/// Error from a single download attempt.
///
/// Carries only the cause (an HTTP status or a transport failure), never the
/// URL: the caller wraps it together with the URL it asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError(pub String);

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transfers an artifact to a local file. One attempt, no retries.
pub trait ArtifactFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}

/// Streams artifacts with a `ureq` agent. Redirects (release downloads are
/// served from a CDN) are followed.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new() -> Self {
        HttpFetcher {
            agent: ureq::AgentBuilder::new().user_agent("setup-dcm").build(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactFetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        download_file(&self.agent, url, dest)
    }
}

/// Downloads a file from `url` and saves it at `dest`.
///
/// # Arguments
/// * `agent`: The `ureq` agent to send the request with.
/// * `url`: The URL of the artifact, e.g. `https://github.com/.../dcm-linux-x64-release.zip`.
/// * `dest`: Full path of the file to write. Created, or truncated if it exists.
///
/// # Returns
/// * `Ok(())` once the whole body is on disk.
/// * `FetchError` with the HTTP status, the transport failure or the write
///   failure otherwise.
pub fn download_file(agent: &ureq::Agent, url: &str, dest: &Path) -> Result<(), FetchError> {
    // Log the start of the download, coloring the URL for clarity.
    log_debug!("[Download] Starting download from URL: {}", url.blue());

    // Execute the HTTP GET request. Redirects are followed by the agent.
    let response = match agent.get(url).call() {
        Ok(response) => response,
        // The server answered, but not with a success status (e.g. 404 for an
        // unknown tag or platform).
        Err(ureq::Error::Status(status, _)) => {
            log_debug!("[Download] {} answered HTTP {}", url.red(), status);
            return Err(FetchError(format!("HTTP {status}")));
        }
        // No usable answer at all: DNS, connection refused, TLS, ...
        Err(ureq::Error::Transport(transport)) => {
            log_debug!("[Download] HTTP request failed for {}: {}", url.red(), transport);
            return Err(FetchError(describe_transport(&transport)));
        }
    };

    // Stream the body into the destination file.
    let write = || -> io::Result<u64> {
        let mut file = BufWriter::new(File::create(dest)?);
        let copied = io::copy(&mut response.into_reader(), &mut file)?;
        // Surface write errors that `BufWriter`'s drop would swallow.
        file.flush()?;
        Ok(copied)
    };

    match write() {
        Ok(bytes) => {
            log_debug!(
                "[Download] Wrote {} bytes to {}",
                bytes,
                dest.to_string_lossy().green()
            );
            Ok(())
        }
        Err(e) => Err(FetchError(format!(
            "failed writing {}: {}",
            dest.display(),
            e
        ))),
    }
}

/// The transport failure without the URL ureq prefixes its message with:
/// the error kind plus the underlying cause when there is one.
fn describe_transport(transport: &ureq::Transport) -> String {
    // Imported locally for `source()` on the transport error.
    use std::error::Error;

    let mut description = transport.kind().to_string();
    if let Some(message) = transport.message() {
        description.push_str(": ");
        description.push_str(message);
    }
    if let Some(source) = transport.source() {
        description.push_str(": ");
        description.push_str(&source.to_string());
    }
    description
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn downloads_body_to_destination() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/artifact.zip")
            .with_status(200)
            .with_body(b"PK\x03\x04payload".as_slice())
            .create();
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("artifact.zip");

        HttpFetcher::new()
            .fetch(&format!("{}/artifact.zip", server.url()), &dest)
            .unwrap();

        mock.assert();
        assert_eq!(fs::read(&dest).unwrap(), b"PK\x03\x04payload");
    }

    #[test]
    fn http_errors_are_reported() {
        let mut server = Server::new();
        let _mock = server.mock("GET", "/missing.zip").with_status(404).create();
        let dir = TempDir::new().unwrap();

        let err = HttpFetcher::new()
            .fetch(
                &format!("{}/missing.zip", server.url()),
                &dir.path().join("missing.zip"),
            )
            .unwrap_err();

        assert_eq!(err, FetchError("HTTP 404".to_string()));
    }

    #[test]
    fn transport_errors_leave_out_the_url() {
        let dir = TempDir::new().unwrap();
        let url = "http://127.0.0.1:9/v1.0.0/dcm-linux-x64-release.zip";

        let err = HttpFetcher::new()
            .fetch(url, &dir.path().join("artifact.zip"))
            .unwrap_err();

        assert!(!err.0.contains(url), "unexpected URL in {:?}", err.0);
        assert!(!err.0.is_empty());
    }
}
