//! Stateless HTTP request builder and response parser for the shop API.
//!
//! # Design
//! `ShopClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Executing the round-trip is left to a `Transport`, keeping this half of
//! the client deterministic and free of I/O.
//!
//! Response bodies are handed back as decoded JSON without any schema
//! checks. The upload response is the exception: its id feeds the second
//! phase of the create/update flows.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::mapper::{inquiry_list_query, product_list_query};
use crate::multipart::encode_file_part;
use crate::types::{
    CreateInquiry, ImageFile, InquiryListParams, ProductListParams, ProductRequestBody,
    ProfileRequestBody, StoreRequestBody, UploadResponse,
};

/// Form field the upload endpoint reads the file from.
pub const UPLOAD_FIELD: &str = "image";

/// Synchronous, stateless client for the shop API.
#[derive(Debug, Clone)]
pub struct ShopClient {
    base_url: String,
}

impl ShopClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    // -- products -----------------------------------------------------------

    pub fn build_list_products(&self, params: &ProductListParams) -> HttpRequest {
        HttpRequest {
            query: product_list_query(params),
            ..self.bare(HttpMethod::Get, "/products")
        }
    }

    pub fn build_get_product(&self, id: &str) -> HttpRequest {
        self.bare(HttpMethod::Get, &format!("/products/{id}"))
    }

    pub fn build_create_product(&self, body: &ProductRequestBody) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/products", body)
    }

    pub fn build_update_product(
        &self,
        id: &str,
        body: &ProductRequestBody,
    ) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Patch, &format!("/products/{id}"), body)
    }

    pub fn build_delete_product(&self, id: &str) -> HttpRequest {
        self.bare(HttpMethod::Delete, &format!("/products/{id}"))
    }

    // -- inquiries ----------------------------------------------------------

    pub fn build_list_inquiries(&self, product_id: &str, params: &InquiryListParams) -> HttpRequest {
        HttpRequest {
            query: inquiry_list_query(params),
            ..self.bare(HttpMethod::Get, &format!("/products/{product_id}/inquiries"))
        }
    }

    pub fn build_create_inquiry(
        &self,
        product_id: &str,
        input: &CreateInquiry,
    ) -> Result<HttpRequest, ApiError> {
        self.json(
            HttpMethod::Post,
            &format!("/products/{product_id}/inquiries"),
            input,
        )
    }

    // -- uploads ------------------------------------------------------------

    pub fn build_upload_image(&self, file: &ImageFile) -> Result<HttpRequest, ApiError> {
        let (content_type, body) = encode_file_part(UPLOAD_FIELD, file)?;
        Ok(HttpRequest {
            headers: vec![("content-type".to_string(), content_type)],
            body: Some(body),
            ..self.bare(HttpMethod::Post, "/s3/upload")
        })
    }

    pub fn parse_upload_image(&self, response: HttpResponse) -> Result<UploadResponse, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    // -- users --------------------------------------------------------------

    pub fn build_edit_profile(&self, body: &ProfileRequestBody) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Patch, "/users/me", body)
    }

    pub fn build_list_favorite_stores(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, "/users/me/likes")
    }

    // -- stores -------------------------------------------------------------

    pub fn build_create_store(&self, body: &StoreRequestBody) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/stores", body)
    }

    // -- responses ----------------------------------------------------------

    /// Decode any 2xx response body as-is. An empty body decodes to `null`.
    pub fn parse_json(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        decode(&response.body)
    }

    fn bare(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_vec(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
            ..self.bare(method, path)
        })
    }
}

/// Anything outside 2xx is an `HttpError` carrying the raw body.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
