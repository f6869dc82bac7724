//! Client dispatch tests against a mock HTTP server

use async_trait::async_trait;
use httpmock::prelude::*;
use openai_client::models::*;
use openai_client::services::{HttpRequest, HttpResponse};
use openai_client::{ClientResponse, OpenAiClient, Transport, TransportError};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::json;
use std::sync::{Arc, Mutex};

const API_KEY: &str = "sk-test-key";

fn chat_fixture() -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1677652288,
        "choices": [{"index": 0, "message": {"role": "assistant", "content": "hi"}, "finish_reason": "stop"}],
        "usage": {"prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21}
    })
}

fn chat_request() -> ChatRequest {
    ChatRequest::builder()
        .model("gpt-3.5-turbo")
        .message(Message::user("Hello!"))
        .build()
}

fn mock_client(server: &MockServer) -> OpenAiClient {
    OpenAiClient::builder()
        .api_key(API_KEY)
        .base_url(server.url("/v1"))
        .build()
        .unwrap()
}

/// Refuses every connection
#[derive(Debug)]
struct RefusingTransport;

#[async_trait]
impl Transport for RefusingTransport {
    fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        Err(TransportError::Connect("connection refused".to_string()))
    }

    async fn send_async(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        Err(TransportError::Connect("connection refused".to_string()))
    }
}

/// Answers every request with a canned response and keeps the last request
#[derive(Debug)]
struct CannedTransport {
    status: StatusCode,
    body: Vec<u8>,
    last_request: Mutex<Option<HttpRequest>>,
}

impl CannedTransport {
    fn new(status: StatusCode, body: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: body.to_vec(),
            last_request: Mutex::new(None),
        })
    }

    fn last_request(&self) -> HttpRequest {
        self.last_request.lock().unwrap().clone().unwrap()
    }

    fn answer(&self, request: HttpRequest) -> HttpResponse {
        *self.last_request.lock().unwrap() = Some(request);
        HttpResponse {
            status: self.status,
            headers: HeaderMap::new(),
            body: self.body.clone(),
        }
    }
}

#[async_trait]
impl Transport for CannedTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        Ok(self.answer(request))
    }

    async fn send_async(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        Ok(self.answer(request))
    }
}

fn canned_client(transport: Arc<CannedTransport>) -> OpenAiClient {
    OpenAiClient::builder()
        .api_key(API_KEY)
        .base_url("https://api.example.com/v1")
        .transport(transport)
        .build()
        .unwrap()
}

#[test_log::test]
fn test_chat_blocking() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer sk-test-key")
            .header("content-type", "application/json")
            .body_contains("\"messages\":[{\"role\":\"user\",\"content\":\"Hello!\"}]");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(chat_fixture());
    });

    let envelope = mock_client(&server).chat(chat_request());

    mock.assert();
    assert!(!envelope.has_exception());
    assert_eq!(envelope.status_code(), Some(200));
    let response = envelope.response().unwrap();
    assert_eq!(response.id, "chatcmpl-123");
    assert_eq!(response.first_message().unwrap().content, "hi");
    assert_eq!(envelope.request().model, "gpt-3.5-turbo");
}

#[test_log::test(tokio::test)]
async fn test_chat_async() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer sk-test-key");
            then.status(200).json_body(chat_fixture());
        })
        .await;

    let envelope = mock_client(&server).chat_async(chat_request()).await;

    mock.assert_async().await;
    let response = envelope.into_result().unwrap();
    assert_eq!(response.usage.total_tokens, 21);
    assert_eq!(response.choices[0].meta.finish_reason, FinishReason::Stop);
}

#[test]
fn test_transport_fault_is_failure() {
    let client = OpenAiClient::builder()
        .api_key(API_KEY)
        .transport(Arc::new(RefusingTransport))
        .build()
        .unwrap();

    let envelope = client.chat(chat_request());

    assert!(envelope.has_exception());
    assert!(envelope.response().is_none());
    assert!(envelope.exception().unwrap().is_transport());
    assert_eq!(envelope.request(), &chat_request());
}

#[tokio::test]
async fn test_transport_fault_is_failure_async() {
    let client = OpenAiClient::builder()
        .api_key(API_KEY)
        .transport(Arc::new(RefusingTransport))
        .build()
        .unwrap();

    let envelope = client.list_models_async().await;

    assert!(envelope.has_exception());
    assert!(envelope.status_code().is_none());
}

#[test]
fn test_error_status_is_success_shaped() {
    let transport = CannedTransport::new(
        StatusCode::BAD_REQUEST,
        br#"{"error":{"message":"'messages' is a required property","type":"invalid_request_error","param":null,"code":null}}"#,
    );
    let client = canned_client(transport.clone());

    let envelope = client.chat(chat_request());

    assert!(!envelope.has_exception());
    assert_eq!(envelope.status_code(), Some(400));
    assert_eq!(envelope.status_message(), Some("'messages' is a required property"));
    assert_eq!(envelope.response(), Some(&ChatResponse::default()));
    assert!(!envelope.is_success_status());
}

#[test]
fn test_error_status_from_server() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/models/gpt-9");
        then.status(404)
            .json_body(json!({"error": {"message": "The model 'gpt-9' does not exist", "type": "invalid_request_error"}}));
    });

    let envelope = mock_client(&server).retrieve_model(RetrieveModelRequest::new("gpt-9"));

    assert_eq!(envelope.status_code(), Some(404));
    match envelope.into_result() {
        Err(openai_client::ClientError::Api { status, message }) => {
            assert_eq!(status, 404);
            assert!(message.contains("does not exist"));
        }
        other => panic!("Expected API error, got {:?}", other),
    }
}

#[test]
fn test_malformed_success_body_is_failure() {
    let transport = CannedTransport::new(StatusCode::OK, b"<html>not json</html>");
    let client = canned_client(transport);

    let envelope = client.chat(chat_request());

    assert!(envelope.has_exception());
    assert_eq!(envelope.exception().unwrap().error_type(), "decode_error");
    assert_eq!(envelope.exception().unwrap().status(), Some(200));
}

#[test]
fn test_organization_header() {
    let transport = CannedTransport::new(StatusCode::OK, br#"{"object":"list","data":[]}"#);
    let client = OpenAiClient::builder()
        .api_key(API_KEY)
        .base_url("https://api.example.com/v1")
        .organization("org-abc")
        .transport(transport.clone())
        .build()
        .unwrap();

    let envelope = client.list_models();
    let sent = transport.last_request();

    assert!(envelope.response().unwrap().data.is_empty());
    assert_eq!(sent.method, reqwest::Method::GET);
    assert_eq!(sent.url.as_str(), "https://api.example.com/v1/models");
    assert_eq!(sent.headers["openai-organization"], "org-abc");
    assert!(sent.headers.get(CONTENT_TYPE).is_none());
    assert!(sent.body.is_empty());
}

#[test]
fn test_file_upload_is_multipart() {
    let transport = CannedTransport::new(
        StatusCode::OK,
        br#"{"id":"file-XjGxS3KTG0uNmNOK362iJua3","object":"file","bytes":140,"created_at":1613779121,"filename":"mydata.jsonl","purpose":"fine-tune"}"#,
    );
    let client = canned_client(transport.clone());

    let request = FileUploadRequest::builder()
        .file(FileUpload::new("mydata.jsonl", b"{\"prompt\":\"p\",\"completion\":\"c\"}\n".to_vec()))
        .purpose("fine-tune")
        .build();
    let envelope = client.upload_file(request);

    let sent = transport.last_request();
    let content_type = sent.headers[CONTENT_TYPE].to_str().unwrap().to_string();
    let boundary = content_type
        .strip_prefix("multipart/form-data; boundary=")
        .unwrap()
        .to_string();
    let body = String::from_utf8(sent.body).unwrap();

    assert_eq!(sent.url.path(), "/v1/files");
    assert!(body.starts_with(&format!("--{}\r\n", boundary)));
    assert!(body.ends_with(&format!("--{}--\r\n", boundary)));
    assert!(body.contains("filename=\"mydata.jsonl\""));
    assert_eq!(envelope.response().unwrap().filename, "mydata.jsonl");
}

#[tokio::test]
async fn test_transcription_async() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/audio/transcriptions")
                .header_exists("content-type")
                .body_contains("name=\"model\"\r\n\r\nwhisper-1\r\n")
                .body_contains("filename=\"speech.wav\"");
            then.status(200)
                .header("content-type", "text/plain")
                .body("Imagine the wildest idea that you've ever had.");
        })
        .await;

    let request = AudioTranscriptionRequest::builder()
        .file(FileUpload::new("speech.wav", vec![0u8; 16]))
        .model("whisper-1")
        .response_format("text")
        .build();
    let envelope = mock_client(&server).create_transcription_async(request).await;

    mock.assert_async().await;
    assert_eq!(
        envelope.response().unwrap().text,
        "Imagine the wildest idea that you've ever had."
    );
}

#[test]
fn test_list_files_with_purpose() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/v1/files").query_param("purpose", "fine-tune");
        then.status(200).json_body(json!({
            "object": "list",
            "data": [{"id": "file-1", "object": "file", "bytes": 10, "created_at": 1613677385, "filename": "a.jsonl", "purpose": "fine-tune"}]
        }));
    });

    let envelope = mock_client(&server).list_files(ListFilesRequest::with_purpose("fine-tune"));

    mock.assert();
    assert_eq!(envelope.response().unwrap().data[0].id, "file-1");
}

#[test]
fn test_delete_and_download_file() {
    let server = MockServer::start();
    let delete = server.mock(|when, then| {
        when.method(DELETE).path("/v1/files/file-1");
        then.status(200)
            .json_body(json!({"id": "file-1", "object": "file", "deleted": true}));
    });
    let content = server.mock(|when, then| {
        when.method(GET).path("/v1/files/file-1/content");
        then.status(200).body("{\"prompt\":\"a\"}\n");
    });
    let client = mock_client(&server);

    let deleted = client.delete_file(DeleteFileRequest::new("file-1"));
    let downloaded = client.retrieve_file_content(FileContentRequest::new("file-1"));

    delete.assert();
    content.assert();
    assert!(deleted.response().unwrap().deleted);
    assert_eq!(downloaded.response().unwrap().text(), "{\"prompt\":\"a\"}\n");
}

#[test]
fn test_image_generation() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/images/generations")
            .json_body(json!({"prompt": "A cute baby sea otter", "n": 2, "size": "1024x1024"}));
        then.status(200).json_body(json!({
            "created": 1589478378,
            "data": [{"url": "https://example.com/1.png"}, {"url": "https://example.com/2.png"}]
        }));
    });

    let request = ImageRequest::builder()
        .prompt("A cute baby sea otter")
        .n(2)
        .size(ImageSize::S1024x1024)
        .build();
    let envelope: ClientResponse<ImageRequest, ImageResponse> =
        mock_client(&server).create_image(request);

    mock.assert();
    assert_eq!(envelope.response().unwrap().data.len(), 2);
}

#[test]
fn test_connection_refused_is_transport_fault() {
    // Nothing listens on port 9 on test machines
    let client = OpenAiClient::builder()
        .api_key(API_KEY)
        .base_url("http://127.0.0.1:9/v1")
        .build()
        .unwrap();

    let envelope = client.embedding(
        EmbeddingRequest::builder()
            .model("text-embedding-ada-002")
            .input("hello")
            .build(),
    );

    assert!(envelope.has_exception());
    assert!(envelope.exception().unwrap().is_transport());
}

#[test]
fn test_async_dispatch_on_test_runtime() {
    let transport = CannedTransport::new(
        StatusCode::OK,
        br#"{"id":"modr-1","model":"text-moderation-005","results":[{"flagged":false}]}"#,
    );
    let client = canned_client(transport.clone());
    let request = CreateModerationRequest::builder().input("I love you").build();

    let envelope = tokio_test::block_on(client.moderation_async(request));

    assert_eq!(transport.last_request().url.path(), "/v1/moderations");
    assert!(!envelope.response().unwrap().results[0].flagged);
}

#[test]
fn test_file_id_cannot_escape_its_segment() {
    let transport = CannedTransport::new(
        StatusCode::OK,
        br#"{"id":"../models/gpt-4","object":"file","deleted":true}"#,
    );
    let client = canned_client(transport.clone());

    let envelope = client.delete_file(DeleteFileRequest::new("../models/gpt-4"));
    let sent = transport.last_request();

    assert!(!envelope.has_exception());
    assert_eq!(sent.method, reqwest::Method::DELETE);
    assert_eq!(sent.url.as_str(), "https://api.example.com/v1/files/..%2Fmodels%2Fgpt-4");

    let envelope = client.retrieve_file_content(FileContentRequest::new(".."));
    assert!(envelope.has_exception());
    assert_eq!(envelope.exception().unwrap().error_type(), "config_error");
}

#[test]
fn test_null_members_decode_to_defaults() {
    let transport = CannedTransport::new(
        StatusCode::OK,
        br#"{"id":"chatcmpl-9","object":"chat.completion","created":1677652288,"model":null,"choices":[{"index":0,"message":{"role":"assistant","content":"hi","name":null,"function_call":null},"finish_reason":null}],"usage":null}"#,
    );
    let client = canned_client(transport);

    let envelope = client.chat(chat_request());

    assert!(!envelope.has_exception());
    let response = envelope.response().unwrap();
    assert_eq!(response.model, "");
    assert_eq!(response.usage, Usage::default());
    let message = response.first_message().unwrap();
    assert_eq!(message.name, "");
    assert_eq!(message.content, "hi");
    assert_eq!(response.choices[0].meta.finish_reason, FinishReason::Null);
}

#[test]
fn test_text_transcript_starting_with_brace() {
    let transport = CannedTransport::new(StatusCode::OK, b"{applause} Thank you all.");
    let client = canned_client(transport);

    let request = AudioTranscriptionRequest::builder()
        .file(FileUpload::new("speech.mp3", vec![0u8; 8]))
        .model("whisper-1")
        .response_format("text")
        .build();
    let envelope = client.create_transcription(request);

    assert!(!envelope.has_exception());
    assert_eq!(envelope.response().unwrap().text, "{applause} Thank you all.");
}
