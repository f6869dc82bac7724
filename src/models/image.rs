//! Image models
//!
//! `POST /images/generations` (JSON), `POST /images/edits` and
//! `POST /images/variations` (multipart)

use serde::{Deserialize, Serialize};

use super::common::timestamp_to_datetime;
use super::upload::FileUpload;
use super::{json_response, ApiPath, ApiRequest, RequestBody};
use crate::codec::{is_blank, is_unset_u32, MultipartForm};
use crate::utils::error::ClientResult;

/// Generated image dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    #[serde(rename = "256x256")]
    S256x256,
    #[serde(rename = "512x512")]
    S512x512,
    #[serde(rename = "1024x1024")]
    S1024x1024,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::S256x256 => "256x256",
            ImageSize::S512x512 => "512x512",
            ImageSize::S1024x1024 => "1024x1024",
        }
    }
}

/// How generated images are returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageResponseFormat {
    Url,
    B64Json,
}

impl ImageResponseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageResponseFormat::Url => "url",
            ImageResponseFormat::B64Json => "b64_json",
        }
    }
}

/// Image generation request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageRequest {
    /// Description of the desired image
    pub prompt: String,
    #[serde(skip_serializing_if = "is_unset_u32")]
    pub n: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<ImageSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ImageResponseFormat>,
    #[serde(skip_serializing_if = "is_blank")]
    pub user: String,
}

impl ImageRequest {
    pub fn builder() -> ImageRequestBuilder {
        ImageRequestBuilder::default()
    }
}

/// Builder for [`ImageRequest`]
#[derive(Debug, Clone, Default)]
pub struct ImageRequestBuilder {
    inner: ImageRequest,
}

impl ImageRequestBuilder {
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.inner.prompt = prompt.into();
        self
    }

    pub fn n(mut self, n: u32) -> Self {
        self.inner.n = n;
        self
    }

    pub fn size(mut self, size: ImageSize) -> Self {
        self.inner.size = Some(size);
        self
    }

    pub fn response_format(mut self, format: ImageResponseFormat) -> Self {
        self.inner.response_format = Some(format);
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.inner.user = user.into();
        self
    }

    pub fn build(self) -> ImageRequest {
        self.inner
    }
}

/// Image edit request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageEditRequest {
    /// Square PNG to edit
    pub image: FileUpload,
    /// Transparent areas mark where to edit (optional)
    pub mask: Option<FileUpload>,
    pub prompt: String,
    pub n: u32,
    pub size: Option<ImageSize>,
    pub response_format: Option<ImageResponseFormat>,
    pub user: String,
}

impl ImageEditRequest {
    pub fn builder() -> ImageEditRequestBuilder {
        ImageEditRequestBuilder::default()
    }
}

/// Builder for [`ImageEditRequest`]
#[derive(Debug, Clone, Default)]
pub struct ImageEditRequestBuilder {
    inner: ImageEditRequest,
}

impl ImageEditRequestBuilder {
    pub fn image(mut self, image: FileUpload) -> Self {
        self.inner.image = image;
        self
    }

    pub fn mask(mut self, mask: FileUpload) -> Self {
        self.inner.mask = Some(mask);
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.inner.prompt = prompt.into();
        self
    }

    pub fn n(mut self, n: u32) -> Self {
        self.inner.n = n;
        self
    }

    pub fn size(mut self, size: ImageSize) -> Self {
        self.inner.size = Some(size);
        self
    }

    pub fn response_format(mut self, format: ImageResponseFormat) -> Self {
        self.inner.response_format = Some(format);
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.inner.user = user.into();
        self
    }

    pub fn build(self) -> ImageEditRequest {
        self.inner
    }
}

/// Image variation request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageVariationRequest {
    /// Square PNG to vary
    pub image: FileUpload,
    pub n: u32,
    pub size: Option<ImageSize>,
    pub response_format: Option<ImageResponseFormat>,
    pub user: String,
}

impl ImageVariationRequest {
    pub fn builder() -> ImageVariationRequestBuilder {
        ImageVariationRequestBuilder::default()
    }
}

/// Builder for [`ImageVariationRequest`]
#[derive(Debug, Clone, Default)]
pub struct ImageVariationRequestBuilder {
    inner: ImageVariationRequest,
}

impl ImageVariationRequestBuilder {
    pub fn image(mut self, image: FileUpload) -> Self {
        self.inner.image = image;
        self
    }

    pub fn n(mut self, n: u32) -> Self {
        self.inner.n = n;
        self
    }

    pub fn size(mut self, size: ImageSize) -> Self {
        self.inner.size = Some(size);
        self
    }

    pub fn response_format(mut self, format: ImageResponseFormat) -> Self {
        self.inner.response_format = Some(format);
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.inner.user = user.into();
        self
    }

    pub fn build(self) -> ImageVariationRequest {
        self.inner
    }
}

/// Image response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageResponse {
    pub created: i64,
    pub data: Vec<ImageData>,
}

impl ImageResponse {
    /// Creation time
    pub fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        timestamp_to_datetime(self.created)
    }
}

/// One generated image, either a URL or base64 data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,
}

json_response!(ImageResponse);

/// Scalar fields shared by the multipart image endpoints
fn image_options(
    form: MultipartForm,
    n: u32,
    size: Option<ImageSize>,
    response_format: Option<ImageResponseFormat>,
    user: &str,
) -> MultipartForm {
    let mut form = form;
    if !is_unset_u32(&n) {
        form = form.text("n", n.to_string());
    }
    if let Some(size) = size {
        form = form.text("size", size.as_str());
    }
    if let Some(format) = response_format {
        form = form.text("response_format", format.as_str());
    }
    form.text_if_set("user", user)
}

impl ApiRequest for ImageRequest {
    type Response = ImageResponse;

    const ENDPOINT: &'static str = "images.generations";

    fn path(&self) -> ApiPath {
        ApiPath::new("/images/generations")
    }

    fn body(&self) -> ClientResult<RequestBody> {
        RequestBody::json(self)
    }
}

impl ApiRequest for ImageEditRequest {
    type Response = ImageResponse;

    const ENDPOINT: &'static str = "images.edits";

    fn path(&self) -> ApiPath {
        ApiPath::new("/images/edits")
    }

    fn body(&self) -> ClientResult<RequestBody> {
        let mut form = self.image.attach(MultipartForm::new(), "image");
        if let Some(mask) = &self.mask {
            form = mask.attach(form, "mask");
        }
        form = form.text("prompt", self.prompt.as_str());
        let form = image_options(form, self.n, self.size, self.response_format, &self.user);
        Ok(RequestBody::Multipart(form.encode()))
    }
}

impl ApiRequest for ImageVariationRequest {
    type Response = ImageResponse;

    const ENDPOINT: &'static str = "images.variations";

    fn path(&self) -> ApiPath {
        ApiPath::new("/images/variations")
    }

    fn body(&self) -> ClientResult<RequestBody> {
        let form = self.image.attach(MultipartForm::new(), "image");
        let form = image_options(form, self.n, self.size, self.response_format, &self.user);
        Ok(RequestBody::Multipart(form.encode()))
    }
}
