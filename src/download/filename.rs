//! Choosing the local file name for a download.

use std::path::{Component, Path};
use url::Url;

/// Pick a file name from the `Content-Disposition` header, the URL path, or
/// a fresh UUID, in that order. The result is always a single, safe path
/// component.
pub fn resolve_filename(content_disposition: Option<&str>, url: &Url) -> String {
    content_disposition
        .and_then(parse_content_disposition)
        .map(|name| sanitize_filename(&name))
        .filter(|name| !name.is_empty())
        .or_else(|| filename_from_url(url))
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Extract a file name from a `Content-Disposition` value.
///
/// Handles:
/// - `attachment; filename*=UTF-8''example%20file.pdf` (RFC 5987)
/// - `attachment; filename="example.pdf"`
/// - `attachment; filename=example.pdf`
/// - anything else containing `=`: the text after the first `=`
pub fn parse_content_disposition(header: &str) -> Option<String> {
    // Try filename*= first (RFC 5987 encoded)
    if let Some(pos) = find_ignore_case(header, "filename*=") {
        let value = header[pos + 10..].trim();
        if let Some(quote_pos) = value.find("''") {
            let encoded = &value[quote_pos + 2..];
            let end = encoded.find(';').unwrap_or(encoded.len());
            if let Ok(decoded) = urlencoding::decode(encoded[..end].trim()) {
                if !decoded.is_empty() {
                    return Some(decoded.into_owned());
                }
            }
        }
    }

    if let Some(pos) = find_ignore_case(header, "filename=") {
        if let Some(name) = param_value(&header[pos + 9..]) {
            return Some(name);
        }
    }

    let (_, rest) = header.split_once('=')?;
    param_value(rest)
}

/// Value of a header parameter: quoted string, or up to the next `;`.
fn param_value(value: &str) -> Option<String> {
    let value = value.trim();
    let name = match value.strip_prefix('"') {
        Some(stripped) => &stripped[..stripped.find('"').unwrap_or(stripped.len())],
        None => value[..value.find(';').unwrap_or(value.len())].trim(),
    };
    (!name.is_empty()).then(|| name.to_string())
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack.to_ascii_lowercase().find(needle)
}

/// Last non-empty segment of the URL path, percent-decoded and sanitized.
pub fn filename_from_url(url: &Url) -> Option<String> {
    let last = url.path_segments()?.next_back()?;
    if last.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(last)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| last.to_string());
    let name = sanitize_filename(&decoded);
    (!name.is_empty()).then_some(name)
}

/// Make `name` safe to join onto the download directory.
///
/// Path separators and characters invalid on common filesystems become `_`;
/// `.` and `..` are rejected (empty result).
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let mut components = Path::new(&sanitized).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => sanitized,
        _ => String::new(),
    }
}
