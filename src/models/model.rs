//! Model listing models
//!
//! `GET /models` and `GET /models/{model}`

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::common::timestamp_to_datetime;
use super::{json_response, ApiPath, ApiRequest, RequestBody};
use crate::utils::error::ClientResult;

/// List all models available to the account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListModelsRequest;

/// Fetch one model by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrieveModelRequest {
    pub model: String,
}

impl RetrieveModelRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self { model: model.into() }
    }
}

/// Model list response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelListResponse {
    pub object: String,
    pub data: Vec<Model>,
}

impl ModelListResponse {
    /// Ids of every listed model
    pub fn ids(&self) -> Vec<&str> {
        self.data.iter().map(|model| model.id.as_str()).collect()
    }
}

/// Model description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Model {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
    pub permission: Vec<ModelPermission>,
    pub root: String,
    pub parent: Option<String>,
}

impl Model {
    /// Creation time
    pub fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        timestamp_to_datetime(self.created)
    }
}

/// Access flags attached to a model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPermission {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub allow_create_engine: bool,
    pub allow_sampling: bool,
    pub allow_logprobs: bool,
    pub allow_search_indices: bool,
    pub allow_view: bool,
    pub allow_fine_tuning: bool,
    pub organization: String,
    pub group: Option<String>,
    pub is_blocking: bool,
}

json_response!(ModelListResponse, Model);

impl ApiRequest for ListModelsRequest {
    type Response = ModelListResponse;

    const ENDPOINT: &'static str = "models.list";

    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> ApiPath {
        ApiPath::new("/models")
    }

    fn body(&self) -> ClientResult<RequestBody> {
        Ok(RequestBody::Empty)
    }
}

impl ApiRequest for RetrieveModelRequest {
    type Response = Model;

    const ENDPOINT: &'static str = "models.retrieve";

    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> ApiPath {
        ApiPath::new("/models").param(&self.model)
    }

    fn body(&self) -> ClientResult<RequestBody> {
        Ok(RequestBody::Empty)
    }
}
