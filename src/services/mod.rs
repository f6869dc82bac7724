//! Service layer module
//!
//! Contains the response envelope, the HTTP transport and the API client

pub mod client;
pub mod envelope;
pub mod transport;

pub use client::{OpenAiClient, OpenAiClientBuilder};
pub use envelope::ClientResponse;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
