//! multipart/form-data encoding
//!
//! Upload endpoints (files, image edits, audio) take a multipart body instead
//! of JSON. Scalar parameters become text parts and the payload becomes a
//! binary part carrying a filename and content type.

use uuid::Uuid;

const BOUNDARY_PREFIX: &str = "openai-client-";
const CRLF: &[u8] = b"\r\n";

/// One part of a multipart form
#[derive(Debug, Clone, PartialEq)]
struct Part {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

/// Staging area for a multipart/form-data body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    parts: Vec<Part>,
}

/// Encoded multipart body together with its boundary
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedMultipart {
    /// Boundary token separating the parts
    pub boundary: String,
    /// Encoded body bytes
    pub body: Vec<u8>,
}

impl EncodedMultipart {
    /// Value of the `Content-Type` header for this body
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }
}

impl MultipartForm {
    /// Create an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text part
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(Part {
            name: name.into(),
            filename: None,
            content_type: None,
            data: value.into().into_bytes(),
        });
        self
    }

    /// Add a text part unless the value is blank
    pub fn text_if_set(self, name: &str, value: &str) -> Self {
        if crate::codec::is_blank(value) {
            self
        } else {
            self.text(name, value)
        }
    }

    /// Add a numeric part unless the value is zero
    pub fn number_if_set(self, name: &str, value: f64) -> Self {
        if crate::codec::is_unset_f64(&value) {
            self
        } else {
            self.text(name, value.to_string())
        }
    }

    /// Add a binary file part
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        self.parts.push(Part {
            name: name.into(),
            filename: Some(filename.into()),
            content_type: Some(content_type.into()),
            data: data.into(),
        });
        self
    }

    /// Number of parts in the form
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the form has no parts
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Encode the form with a freshly generated boundary
    pub fn encode(&self) -> EncodedMultipart {
        self.encode_with(|| format!("{}{}", BOUNDARY_PREFIX, Uuid::new_v4().simple()))
    }

    /// Encode the form, drawing boundary candidates from `next_boundary`
    /// until one does not occur anywhere in the payload
    pub(crate) fn encode_with(&self, mut next_boundary: impl FnMut() -> String) -> EncodedMultipart {
        let boundary = loop {
            let candidate = next_boundary();
            if !self.collides(candidate.as_bytes()) {
                break candidate;
            }
        };

        let mut body = Vec::with_capacity(self.encoded_len_hint(&boundary));
        for part in &self.parts {
            body.extend_from_slice(b"--");
            body.extend_from_slice(boundary.as_bytes());
            body.extend_from_slice(CRLF);

            let mut disposition = format!(
                "Content-Disposition: form-data; name=\"{}\"",
                escape_header_value(&part.name)
            );
            if let Some(filename) = &part.filename {
                disposition.push_str(&format!("; filename=\"{}\"", escape_header_value(filename)));
            }
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(CRLF);

            if let Some(content_type) = &part.content_type {
                body.extend_from_slice(
                    format!("Content-Type: {}", escape_line_breaks(content_type)).as_bytes(),
                );
                body.extend_from_slice(CRLF);
            }

            body.extend_from_slice(CRLF);
            body.extend_from_slice(&part.data);
            body.extend_from_slice(CRLF);
        }
        body.extend_from_slice(b"--");
        body.extend_from_slice(boundary.as_bytes());
        body.extend_from_slice(b"--");
        body.extend_from_slice(CRLF);

        EncodedMultipart { boundary, body }
    }

    fn collides(&self, boundary: &[u8]) -> bool {
        self.parts.iter().any(|part| {
            contains(&part.data, boundary)
                || contains(part.name.as_bytes(), boundary)
                || part
                    .filename
                    .as_ref()
                    .is_some_and(|f| contains(f.as_bytes(), boundary))
                || part
                    .content_type
                    .as_ref()
                    .is_some_and(|t| contains(t.as_bytes(), boundary))
        })
    }

    fn encoded_len_hint(&self, boundary: &str) -> usize {
        self.parts
            .iter()
            .map(|p| p.data.len() + p.name.len() + boundary.len() + 128)
            .sum::<usize>()
            + boundary.len()
            + 8
    }
}

/// Guess the content type of an upload
///
/// Magic bytes win over the file extension; unknown payloads are sent as
/// `application/octet-stream`.
pub fn guess_content_type(filename: &str, data: &[u8]) -> String {
    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }
    mime_guess::from_path(filename)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|window| window == needle)
}

fn escape_line_breaks(value: &str) -> String {
    value.replace('\r', "%0D").replace('\n', "%0A")
}

// Quoted parameter values (name, filename)
fn escape_header_value(value: &str) -> String {
    escape_line_breaks(&value.replace('"', "%22"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let form = MultipartForm::new()
            .text("purpose", "fine-tune")
            .file("file", "data.jsonl", "application/jsonl", b"{\"prompt\":\"hi\"}".to_vec());

        let encoded = form.encode_with(|| "XYZ".to_string());
        let body = String::from_utf8(encoded.body).unwrap();

        assert_eq!(
            body,
            "--XYZ\r\n\
             Content-Disposition: form-data; name=\"purpose\"\r\n\
             \r\n\
             fine-tune\r\n\
             --XYZ\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"data.jsonl\"\r\n\
             Content-Type: application/jsonl\r\n\
             \r\n\
             {\"prompt\":\"hi\"}\r\n\
             --XYZ--\r\n"
        );
        assert_eq!(encoded.boundary, "XYZ");
    }

    #[test]
    fn test_colliding_boundary_is_rejected() {
        let form = MultipartForm::new().file("file", "a.txt", "text/plain", b"xx--AAA--xx".to_vec());

        let mut candidates = vec!["BBB".to_string(), "AAA".to_string()];
        let encoded = form.encode_with(|| candidates.pop().unwrap());

        assert_eq!(encoded.boundary, "BBB");
    }

    #[test]
    fn test_sentinel_parts_are_skipped() {
        let form = MultipartForm::new()
            .text_if_set("prompt", "")
            .number_if_set("temperature", 0.0)
            .number_if_set("top", 0.5);

        assert_eq!(form.len(), 1);
    }

    #[test]
    fn test_header_values_are_escaped() {
        assert_eq!(escape_header_value("a\"b\r\nc"), "a%22b%0D%0Ac");
    }

    #[test]
    fn test_content_type_cannot_inject_headers() {
        let form = MultipartForm::new().file(
            "file",
            "a.txt",
            "text/plain\r\nX-Injected: yes",
            b"data".to_vec(),
        );

        let encoded = form.encode_with(|| "XYZ".to_string());
        let body = String::from_utf8(encoded.body).unwrap();

        assert!(body.contains("Content-Type: text/plain%0D%0AX-Injected: yes\r\n"));
        assert!(!body.contains("\r\nX-Injected"));
    }

    #[test]
    fn test_boundary_avoids_content_type() {
        let form = MultipartForm::new().file("file", "a.txt", "text/plain; x=AAA", b"data".to_vec());

        let mut candidates = vec!["BBB".to_string(), "AAA".to_string()];
        let encoded = form.encode_with(|| candidates.pop().unwrap());

        assert_eq!(encoded.boundary, "BBB");
    }

    #[test]
    fn test_guess_content_type() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(guess_content_type("upload.bin", &png), "image/png");
        assert_eq!(guess_content_type("speech.mp3", b"plain bytes"), "audio/mpeg");
        assert_eq!(guess_content_type("unknown", b"plain bytes"), "application/octet-stream");
    }
}
