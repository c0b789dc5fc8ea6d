use reqwest::StatusCode;
use std::path::PathBuf;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for the pipeline.
///
/// `Request` and `Status` cover the recoverable class: the top-level
/// orchestration logs them after the fetch/download phase and carries on
/// with whatever is already cached. Everything else is fatal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure (connection refused, DNS, interrupted body).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("API request failed: HTTP {status} for url ({url}){detail}")]
    Status {
        status: StatusCode,
        url: String,
        detail: String,
    },

    /// The response body did not have the expected JSON shape.
    #[error("failed to parse API JSON (url={url}): {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Local filesystem failure while writing to the cache.
    #[error("storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Embedded database failure (aggregation or export).
    #[error("database error: {0}")]
    Database(#[from] duckdb::Error),
}

impl Error {
    /// True for the request-shaped failures the top level recovers from.
    ///
    /// `Malformed` is deliberately excluded: a catalogue answering 2xx with
    /// an unparseable body is fatal here, not logged and skipped.
    pub fn is_request(&self) -> bool {
        matches!(self, Error::Request { .. } | Error::Status { .. })
    }
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct StacErrorResponse {
    #[serde(default)]
    pub(crate) code: Option<serde_json::Value>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    // Some deployments respond with {"message": ...} instead.
    #[serde(default)]
    pub(crate) message: Option<String>,
}

/// Builds a `Status` error, folding in any server-supplied detail so the
/// message is actionable without re-running with extra verbosity.
pub(crate) fn status_error(status: StatusCode, url: &str, body: &str) -> Error {
    let detail = match serde_json::from_str::<StacErrorResponse>(body) {
        Ok(e) => {
            let description = e.description.or(e.message).unwrap_or_default();
            let code = e
                .code
                .map(|c| c.to_string().trim_matches('"').to_string())
                .unwrap_or_default();
            match (code.is_empty(), description.is_empty()) {
                (false, false) => format!("\n{}: {}", code, description),
                (true, false) => format!("\n{}", description),
                (false, true) => format!("\n{}", code),
                (true, true) => String::new(),
            }
        }
        Err(_) if !body.trim().is_empty() => format!("\n{}", body.trim()),
        Err(_) => String::new(),
    };

    Error::Status {
        status,
        url: url.to_string(),
        detail,
    }
}

// -- Tests -------------------------------------------------------------------
