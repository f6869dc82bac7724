//! Response envelope
//!
//! Every call yields exactly one [`ClientResponse`]: either the server
//! answered (any status) or the call failed before a usable answer arrived.

use crate::utils::error::ClientError;

/// Outcome of one API call
#[derive(Debug)]
pub enum ClientResponse<Req, Resp> {
    /// The server answered. Non-2xx statuses land here too, with a
    /// leniently decoded payload and the API error message.
    Success {
        request: Req,
        status_code: u16,
        status_message: Option<String>,
        response: Resp,
    },
    /// The call failed: transport fault, encoding failure, or an
    /// undecodable 2xx body
    Failure { request: Req, error: ClientError },
}

impl<Req, Resp> ClientResponse<Req, Resp> {
    pub fn success(
        request: Req,
        status_code: u16,
        status_message: Option<String>,
        response: Resp,
    ) -> Self {
        ClientResponse::Success {
            request,
            status_code,
            status_message,
            response,
        }
    }

    pub fn failure(request: Req, error: ClientError) -> Self {
        ClientResponse::Failure { request, error }
    }

    pub fn has_exception(&self) -> bool {
        matches!(self, ClientResponse::Failure { .. })
    }

    pub fn exception(&self) -> Option<&ClientError> {
        match self {
            ClientResponse::Failure { error, .. } => Some(error),
            ClientResponse::Success { .. } => None,
        }
    }

    pub fn response(&self) -> Option<&Resp> {
        match self {
            ClientResponse::Success { response, .. } => Some(response),
            ClientResponse::Failure { .. } => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientResponse::Success { status_code, .. } => Some(*status_code),
            ClientResponse::Failure { .. } => None,
        }
    }

    pub fn status_message(&self) -> Option<&str> {
        match self {
            ClientResponse::Success { status_message, .. } => status_message.as_deref(),
            ClientResponse::Failure { .. } => None,
        }
    }

    /// The request that produced this outcome
    pub fn request(&self) -> &Req {
        match self {
            ClientResponse::Success { request, .. } | ClientResponse::Failure { request, .. } => {
                request
            }
        }
    }

    /// Whether the server answered with a 2xx status
    pub fn is_success_status(&self) -> bool {
        matches!(self.status_code(), Some(code) if (200..300).contains(&code))
    }

    /// Collapse into a `Result`, treating non-2xx answers as
    /// [`ClientError::Api`]
    pub fn into_result(self) -> Result<Resp, ClientError> {
        match self {
            ClientResponse::Success {
                status_code,
                response,
                ..
            } if (200..300).contains(&status_code) => Ok(response),
            ClientResponse::Success {
                status_code,
                status_message,
                ..
            } => Err(ClientError::Api {
                status: status_code,
                message: status_message.unwrap_or_else(|| format!("HTTP {}", status_code)),
            }),
            ClientResponse::Failure { error, .. } => Err(error),
        }
    }
}
