//! Public static assets under `/data`, stage four of the pipeline.
//!
//! Files are read from the configured data directory and served with
//! `Access-Control-Allow-Origin: *` — intentionally wider than the general
//! CORS policy, because the asset tree (quiz imagery, exported result
//! sets) is public by definition. Lookups that escape the data directory,
//! via `..` segments or symlinks, are refused with the same 404 a missing
//! file gets.

use std::path::{Component, Path, PathBuf};

use http::header;
use http::StatusCode;

use crate::response::Response;

/// Path prefix below which requests are served from disk.
pub const ROUTE_PREFIX: &str = "/data";

/// Returns the in-tree remainder when `path` addresses an asset, i.e. for
/// `/data/quizzes/logic.json` returns `quizzes/logic.json`. The bare
/// prefix (`/data`) is not an asset.
pub(crate) fn asset_subpath(path: &str) -> Option<&str> {
    path.strip_prefix(ROUTE_PREFIX)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty())
}

/// Serves one asset. Any miss — absent file, unreadable file, traversal
/// attempt — is a plain 404; the distinction only matters server-side.
pub(crate) async fn serve(data_dir: &Path, subpath: &str) -> Response {
    let Some(file_path) = resolve(data_dir, subpath) else {
        tracing::warn!(subpath, "refused asset path escaping the data directory");
        return Response::status(StatusCode::NOT_FOUND);
    };

    // Symlinks could still point outside the tree; compare canonical forms.
    let (canonical_root, canonical_file) = match (
        tokio::fs::canonicalize(data_dir).await,
        tokio::fs::canonicalize(&file_path).await,
    ) {
        (Ok(root), Ok(file)) => (root, file),
        _ => return Response::status(StatusCode::NOT_FOUND),
    };
    if !canonical_file.starts_with(&canonical_root) {
        tracing::warn!(subpath, "refused asset resolving outside the data directory");
        return Response::status(StatusCode::NOT_FOUND);
    }

    match tokio::fs::read(&canonical_file).await {
        Ok(content) => Response::builder()
            .header(header::ACCESS_CONTROL_ALLOW_ORIGIN.as_str(), "*")
            .bytes(content_type_for(&canonical_file), content),
        Err(_) => Response::status(StatusCode::NOT_FOUND),
    }
}

/// Joins the subpath onto the data directory, rejecting any component that
/// is not a plain path segment.
fn resolve(data_dir: &Path, subpath: &str) -> Option<PathBuf> {
    let relative = Path::new(subpath);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(data_dir.join(relative))
}

/// Content type by file extension; unknown extensions download as opaque
/// bytes.
fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("csv") => "text/csv",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}
