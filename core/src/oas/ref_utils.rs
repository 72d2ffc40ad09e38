#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Helpers for turning `$ref` strings into local JSON Pointers with respect to the
//! OAS 3.2 `$self` URI.
//!
//! Nothing here fetches external documents. An absolute or relative reference is
//! only treated as local when its document part matches the current `$self`.

use percent_encoding::percent_decode_str;
use std::path::Path;
use url::Url;

/// Classification of a `$ref` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReferenceKind {
    /// Fragment-only reference (`#/components/...`).
    Local,
    /// Relative document reference (`other.yaml#/...`).
    Relative,
    /// Absolute URI reference (`https://...#/...`).
    Remote,
}

/// A `$ref` split into its document and fragment parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ParsedReference<'a> {
    /// Everything before `#` (empty for local references).
    pub document: &'a str,
    /// Everything after `#`, if present.
    pub fragment: Option<&'a str>,
    /// Reference classification.
    pub kind: ReferenceKind,
}

/// Splits a `$ref` string into document and fragment.
pub(crate) fn parse_reference(ref_str: &str) -> ParsedReference<'_> {
    let (document, fragment) = match ref_str.split_once('#') {
        Some((doc, frag)) => (doc, Some(frag)),
        None => (ref_str, None),
    };

    let kind = if document.is_empty() {
        ReferenceKind::Local
    } else if Url::parse(document).is_ok() {
        ReferenceKind::Remote
    } else {
        ReferenceKind::Relative
    };

    ParsedReference {
        document,
        fragment,
        kind,
    }
}

/// Normalizes a `$ref` to a local JSON Pointer (e.g. `#/components/...`) if it targets the
/// current document as identified by `$self`.
///
/// Returns `None` if the reference is external or lacks a fragment.
pub(crate) fn normalize_ref_to_local(ref_str: &str, self_uri: Option<&str>) -> Option<String> {
    if ref_str.starts_with("#/") || ref_str == "#" {
        return Some(ref_str.to_string());
    }

    let parsed = parse_reference(ref_str);
    match parsed.kind {
        ReferenceKind::Local => Some(ref_str.to_string()),
        ReferenceKind::Relative | ReferenceKind::Remote => {
            let frag = parsed.fragment?;
            let self_uri = self_uri?;
            if ref_doc_matches_self(parsed.document, self_uri) {
                return Some(format!("#{}", frag));
            }
            None
        }
    }
}

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent escapes).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

fn ref_doc_matches_self(ref_doc: &str, self_uri: &str) -> bool {
    if ref_doc == self_uri {
        return true;
    }

    if let (Ok(ref_url), Ok(self_url)) = (Url::parse(ref_doc), Url::parse(self_uri)) {
        return ref_url.scheme() == self_url.scheme()
            && ref_url.host() == self_url.host()
            && ref_url.port() == self_url.port()
            && ref_url.path() == self_url.path();
    }

    // `$self` given as an absolute path (e.g. "/api/openapi"): compare paths.
    if self_uri.starts_with('/') {
        if let Ok(ref_url) = Url::parse(ref_doc) {
            return ref_url.path() == self_uri;
        }
    }

    if !self_uri.contains("://") && !ref_doc.contains("://") {
        return Path::new(ref_doc) == Path::new(self_uri);
    }

    false
}
