use std::path::Path;

/// Derives a filename from the final path segment of a URL, ignoring any
/// query string.
pub(crate) fn filename_from_url(url: &str) -> Option<String> {
    let path = url.split('?').next().unwrap_or(url);
    path.rsplit('/').next().and_then(|s| {
        if s.is_empty() {
            None
        } else {
            Some(s.to_string())
        }
    })
}

/// Quotes a path for interpolation into a SQL string literal.
///
/// DuckDB takes file paths as plain string literals (`read_parquet('...')`,
/// `COPY ... TO '...'`), so embedded single quotes must be doubled.
pub(crate) fn sql_string(path: &Path) -> String {
    path.to_string_lossy().replace('\'', "''")
}

// -- Tests -------------------------------------------------------------------
