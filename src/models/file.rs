//! File models
//!
//! Uploading, listing, retrieving and deleting files, and downloading their
//! content.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::common::timestamp_to_datetime;
use super::upload::FileUpload;
use super::{json_response, ApiPath, ApiRequest, ApiResponse, RequestBody};
use crate::codec::{is_blank, MultipartForm};
use crate::utils::error::ClientResult;

/// Upload a file for use by other endpoints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileUploadRequest {
    pub file: FileUpload,
    /// Intended use, e.g. `fine-tune`
    pub purpose: String,
}

impl FileUploadRequest {
    pub fn builder() -> FileUploadRequestBuilder {
        FileUploadRequestBuilder::default()
    }
}

/// Builder for [`FileUploadRequest`]
#[derive(Debug, Clone, Default)]
pub struct FileUploadRequestBuilder {
    inner: FileUploadRequest,
}

impl FileUploadRequestBuilder {
    pub fn file(mut self, file: FileUpload) -> Self {
        self.inner.file = file;
        self
    }

    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.inner.purpose = purpose.into();
        self
    }

    pub fn build(self) -> FileUploadRequest {
        self.inner
    }
}

/// List uploaded files, optionally filtered by purpose
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilesRequest {
    pub purpose: String,
}

impl ListFilesRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only list files uploaded for `purpose`
    pub fn with_purpose(purpose: impl Into<String>) -> Self {
        Self {
            purpose: purpose.into(),
        }
    }
}

/// Fetch metadata of one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrieveFileRequest {
    pub file_id: String,
}

impl RetrieveFileRequest {
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
        }
    }
}

/// Delete one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteFileRequest {
    pub file_id: String,
}

impl DeleteFileRequest {
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
        }
    }
}

/// Download the content of one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileContentRequest {
    pub file_id: String,
}

impl FileContentRequest {
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
        }
    }
}

/// Processing state of an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Uploaded,
    Processed,
    Pending,
    Error,
    Deleting,
    Deleted,
    #[serde(other)]
    Other,
}

/// File metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileData {
    pub id: String,
    pub object: String,
    /// Size in bytes
    pub bytes: u64,
    pub created_at: i64,
    pub filename: String,
    pub purpose: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FileStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_details: Option<String>,
}

impl FileData {
    /// Upload time
    pub fn created(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        timestamp_to_datetime(self.created_at)
    }
}

/// File list response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileListResponse {
    pub object: String,
    pub data: Vec<FileData>,
}

/// File deletion response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteFileResponse {
    pub id: String,
    pub object: String,
    pub deleted: bool,
}

json_response!(FileData, FileListResponse, DeleteFileResponse);

/// Raw file content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileContentResponse {
    pub bytes: Vec<u8>,
}

impl FileContentResponse {
    /// Content as UTF-8 text, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl ApiResponse for FileContentResponse {
    fn from_body(_status: u16, body: &[u8]) -> ClientResult<Self> {
        Ok(Self {
            bytes: body.to_vec(),
        })
    }

    fn from_error_body(_body: &[u8]) -> Self {
        Self::default()
    }
}

impl ApiRequest for FileUploadRequest {
    type Response = FileData;

    const ENDPOINT: &'static str = "files.upload";

    fn path(&self) -> ApiPath {
        ApiPath::new("/files")
    }

    fn body(&self) -> ClientResult<RequestBody> {
        let form = self
            .file
            .attach(MultipartForm::new(), "file")
            .text_if_set("purpose", &self.purpose);
        Ok(RequestBody::Multipart(form.encode()))
    }

    fn log_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "endpoint": Self::ENDPOINT,
            "filename": self.file.filename,
            "bytes": self.file.data.len(),
            "purpose": self.purpose,
        })
    }
}

impl ApiRequest for ListFilesRequest {
    type Response = FileListResponse;

    const ENDPOINT: &'static str = "files.list";

    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> ApiPath {
        ApiPath::new("/files")
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        if is_blank(&self.purpose) {
            Vec::new()
        } else {
            vec![("purpose", self.purpose.clone())]
        }
    }

    fn body(&self) -> ClientResult<RequestBody> {
        Ok(RequestBody::Empty)
    }
}

impl ApiRequest for RetrieveFileRequest {
    type Response = FileData;

    const ENDPOINT: &'static str = "files.retrieve";

    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> ApiPath {
        ApiPath::new("/files").param(&self.file_id)
    }

    fn body(&self) -> ClientResult<RequestBody> {
        Ok(RequestBody::Empty)
    }
}

impl ApiRequest for DeleteFileRequest {
    type Response = DeleteFileResponse;

    const ENDPOINT: &'static str = "files.delete";

    fn method(&self) -> Method {
        Method::DELETE
    }

    fn path(&self) -> ApiPath {
        ApiPath::new("/files").param(&self.file_id)
    }

    fn body(&self) -> ClientResult<RequestBody> {
        Ok(RequestBody::Empty)
    }
}

impl ApiRequest for FileContentRequest {
    type Response = FileContentResponse;

    const ENDPOINT: &'static str = "files.content";

    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> ApiPath {
        ApiPath::new("/files").param(&self.file_id).route("content")
    }

    fn body(&self) -> ClientResult<RequestBody> {
        Ok(RequestBody::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_falls_back() {
        let file: FileData = serde_json::from_str(
            r#"{"id":"file-1","object":"file","bytes":120,"created_at":1677610602,"filename":"a.jsonl","purpose":"fine-tune","status":"archived"}"#,
        )
        .unwrap();

        assert_eq!(file.status, Some(FileStatus::Other));
        assert_eq!(file.bytes, 120);
        assert!(file.created().is_some());
    }

    #[test]
    fn test_list_query_only_when_purpose_set() {
        assert!(ListFilesRequest::new().query().is_empty());
        assert_eq!(
            ListFilesRequest::with_purpose("fine-tune").query(),
            vec![("purpose", "fine-tune".to_string())]
        );
    }

    #[test]
    fn test_file_content_keeps_raw_bytes() {
        let content = FileContentResponse::from_body(200, b"line one\nline two").unwrap();
        assert_eq!(content.text(), "line one\nline two");
        assert!(FileContentResponse::from_error_body(b"{}").bytes.is_empty());
    }

    #[test]
    fn test_upload_body_has_file_and_purpose() {
        let request = FileUploadRequest::builder()
            .file(FileUpload::new("data.jsonl", b"{}\n".to_vec()))
            .purpose("fine-tune")
            .build();

        assert_eq!(request.path().to_string(), "/files");
        let body = String::from_utf8(request.body().unwrap().into_bytes()).unwrap();
        assert!(body.contains("name=\"file\"; filename=\"data.jsonl\""));
        assert!(body.contains("name=\"purpose\"\r\n\r\nfine-tune\r\n"));
    }
}
