//! Minimal `multipart/form-data` body encoder (RFC 7578).

use std::borrow::Cow;

/// One named field of a form body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormPart<'a> {
    pub name: &'static str,
    pub filename: Option<String>,
    pub content_type: Option<&'static str>,
    pub body: Cow<'a, [u8]>,
}

impl<'a> FormPart<'a> {
    pub fn text(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            filename: None,
            content_type: None,
            body: Cow::Owned(value.into().into_bytes()),
        }
    }

    pub fn file(
        name: &'static str,
        filename: impl Into<String>,
        content_type: &'static str,
        body: &'a [u8],
    ) -> Self {
        Self {
            name,
            filename: Some(filename.into()),
            content_type: Some(content_type),
            body: Cow::Borrowed(body),
        }
    }
}

/// `Content-Type` header value for a body encoded with `boundary`.
pub fn content_type(boundary: &str) -> String {
    format!("multipart/form-data; boundary={boundary}")
}

/// Encode `parts` as a form body delimited by `boundary`.
///
/// The caller guarantees the boundary does not occur inside any part body; see
/// [`boundary_is_safe`].
pub fn encode(parts: &[FormPart<'_>], boundary: &str) -> Vec<u8> {
    let payload: usize = parts.iter().map(|p| p.body.len() + 128).sum();
    let mut out = Vec::with_capacity(payload + boundary.len() + 8);
    for part in parts {
        out.extend_from_slice(b"--");
        out.extend_from_slice(boundary.as_bytes());
        out.extend_from_slice(b"\r\n");

        out.extend_from_slice(b"Content-Disposition: form-data; name=\"");
        out.extend_from_slice(part.name.as_bytes());
        out.push(b'"');
        if let Some(filename) = &part.filename {
            out.extend_from_slice(b"; filename=\"");
            out.extend_from_slice(escape_quoted(filename).as_bytes());
            out.push(b'"');
        }
        out.extend_from_slice(b"\r\n");
        if let Some(ct) = part.content_type {
            out.extend_from_slice(b"Content-Type: ");
            out.extend_from_slice(ct.as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(&part.body);
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b"--");
    out.extend_from_slice(boundary.as_bytes());
    out.extend_from_slice(b"--\r\n");
    out
}

/// True when `boundary` appears in none of the part bodies.
pub fn boundary_is_safe(parts: &[FormPart<'_>], boundary: &str) -> bool {
    let needle = boundary.as_bytes();
    !parts
        .iter()
        .any(|p| p.body.windows(needle.len()).any(|w| w == needle))
}

fn escape_quoted(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "%22")
        .replace(['\r', '\n'], " ")
}

#[cfg(test)]
#[path = "../../tests/unit/submit/multipart.rs"]
mod tests;
