//! File payloads for multipart uploads

use std::fmt;
use std::path::Path;

use crate::codec::multipart::{guess_content_type, MultipartForm};
use crate::utils::error::{ClientResult, ErrorContext};

/// Binary payload of an upload request
#[derive(Clone, Default, PartialEq)]
pub struct FileUpload {
    /// Filename reported to the API
    pub filename: String,
    /// File content
    pub data: Vec<u8>,
    /// Explicit content type, guessed from the bytes and filename when `None`
    pub content_type: Option<String>,
}

impl FileUpload {
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
            content_type: None,
        }
    }

    /// Read a file from disk, keeping its file name
    pub fn from_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).multipart_context(&format!("Failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(filename, data))
    }

    /// Set an explicit content type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Explicit content type, or a guess
    pub fn resolved_content_type(&self) -> String {
        match &self.content_type {
            Some(content_type) => content_type.clone(),
            None => guess_content_type(&self.filename, &self.data),
        }
    }

    /// Append this payload to a form under `name`
    pub(crate) fn attach(&self, form: MultipartForm, name: &str) -> MultipartForm {
        form.file(name, self.filename.clone(), self.resolved_content_type(), self.data.clone())
    }
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("filename", &self.filename)
            .field("bytes", &self.data.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_path_keeps_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training.jsonl");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"{\"prompt\":\"a\",\"completion\":\"b\"}\n").unwrap();

        let upload = FileUpload::from_path(&path).unwrap();

        assert_eq!(upload.filename, "training.jsonl");
        assert_eq!(upload.data.len(), 32);
    }

    #[test]
    fn test_missing_file_is_multipart_error() {
        let err = FileUpload::from_path("/definitely/not/here.png").unwrap_err();
        assert_eq!(err.error_type(), "multipart_error");
    }

    #[test]
    fn test_explicit_content_type_wins() {
        let upload = FileUpload::new("image.png", vec![1, 2, 3]).with_content_type("image/webp");
        assert_eq!(upload.resolved_content_type(), "image/webp");
        assert_eq!(FileUpload::new("image.png", vec![1, 2, 3]).resolved_content_type(), "image/png");
    }
}
