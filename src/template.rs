// ==============================================================================
// Overview Template and Published Asset URLs
// ==============================================================================
//
// The `info.description` of a document is an optional HTML overview kept next
// to the proto sources: `admin.proto` is described by `<template_dir>/admin.html`.
// The template may link to companion SDK downloads through placeholders such
// as `{{ .clientts }}`, which are filled with the public URL of each SDK file.
//
// Templates use Go's text/template language through `gtmpl`, so conditionals
// (`{{ if .pythonzip }}...{{ else }}...{{ end }}`), `with`, `range`,
// whitespace trimming and `{{/* comments */}}` all work. The data is a flat
// map from SDK key to URL.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use gtmpl::Value;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::swagger::Logo;

/// Host serving the public documentation bucket.
pub const DOCS_HOST: &str = "https://storage.googleapis.com";
pub const PUBLIC_DOCS_BUCKET: &str = "compass-public-docs";

const LOGO_FILENAME: &str = "compass_logo.png";
const LOGO_ALT_TEXT: &str = "Compass IoT logo";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct TemplateError {
    pub message: String,
}

/// Join path segments onto [`DOCS_HOST`] with single slashes, dropping empty
/// segments.
pub fn docs_url(segments: &[&str]) -> String {
    let mut url = DOCS_HOST.to_string();
    for part in segments
        .iter()
        .flat_map(|segment| segment.split('/'))
        .filter(|part| !part.is_empty() && *part != ".")
    {
        url.push('/');
        url.push_str(part);
    }
    url
}

/// The root file's path with its extension removed, using `/` separators.
fn label(root: &str) -> String {
    Path::new(root)
        .with_extension("")
        .to_string_lossy()
        .replace('\\', "/")
}

/// Placeholder key for an SDK file: its base name without `.`, `_` or `-`.
pub fn sdk_file_key(file: &str) -> String {
    let base = file.rsplit('/').next().unwrap_or(file);
    base.chars()
        .filter(|c| !matches!(c, '.' | '_' | '-'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Map each entry of the comma-separated `sdk_files` to its published URL
/// `<host>/<bucket>/<root without extension>/<version>/<file>`.
pub fn sdk_files_map(root: &str, version: &str, sdk_files: &str) -> IndexMap<String, String> {
    let label = label(root);
    sdk_files
        .split(',')
        .map(str::trim)
        .filter(|file| !file.is_empty())
        .map(|file| {
            let url = docs_url(&[PUBLIC_DOCS_BUCKET, &label, version, file]);
            (sdk_file_key(file), url)
        })
        .collect()
}

/// `<template_dir>/<root base name>.html`.
pub fn template_path(template_dir: &Path, root: &str) -> PathBuf {
    let base = Path::new(root)
        .with_extension("html")
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_default();
    template_dir.join(base)
}

/// Execute `template` with `data` as its dot value.
pub fn render(template: &str, data: &IndexMap<String, String>) -> Result<String, TemplateError> {
    let context: HashMap<String, String> = data
        .iter()
        .map(|(key, url)| (key.clone(), url.clone()))
        .collect();
    gtmpl::template(template, Value::from(context)).map_err(|err| TemplateError {
        message: err.to_string(),
    })
}

/// The overview for `root`: its template rendered with the SDK URLs, or `""`
/// if there is no template or it does not render.
pub fn overview(template_dir: &Path, root: &str, data: &IndexMap<String, String>) -> String {
    let path = template_path(template_dir, root);
    let Ok(source) = fs::read_to_string(&path) else {
        debug!(template = %path.display(), "no overview template");
        return String::new();
    };
    render(&source, data).unwrap_or_else(|err| {
        warn!(template = %path.display(), error = %err, "could not render overview template");
        String::new()
    })
}

/// The `x-logo` extension shown by documentation renderers.
pub fn logo() -> Logo {
    Logo {
        url: docs_url(&[PUBLIC_DOCS_BUCKET, LOGO_FILENAME]),
        background_color: String::new(),
        alt_text: LOGO_ALT_TEXT.to_string(),
    }
}
