use std::path::PathBuf;
use thiserror::Error;

/// Failures of the resolve/fetch/extract pipeline.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("unsupported platform: {os}-{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("download failed: {status} for {url}")]
    Download { status: u16, url: String },

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("redirect {status} from {url} has no usable Location header")]
    MissingRedirectLocation { status: u16, url: String },

    #[error("gave up after {limit} redirects (last hop {url})")]
    TooManyRedirects { url: String, limit: usize },

    #[error("extraction failed")]
    Extraction(#[from] ExtractionError),

    #[error("archive did not contain the expected binary at {}", .path.display())]
    BinaryMissing { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("'{tool}' was not found on PATH")]
    ToolUnavailable { tool: String },

    #[error("'{tool}' exited with {}", exit_description(.code))]
    ToolFailed { tool: String, code: Option<i32> },

    #[error("reading zip archive")]
    Zip(#[from] zip::result::ZipError),

    #[error("archive entry '{name}' would be written outside the destination")]
    UnsafeEntry { name: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "no status (terminated by signal)".to_string(),
    }
}
