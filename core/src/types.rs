//! Form values, request bodies and query parameters for the shop API.
//!
//! # Design
//! Form values are what the caller hands in: in-memory, loosely shaped,
//! possibly half-filled. Request bodies are the wire format the backend
//! expects (camelCase, optional fields omitted rather than sent as `null`).
//! The mapping between the two lives in `mapper`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// A binary image chosen by the user, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        }
    }
}

/// Image field of a form. Only `File` triggers an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageInput {
    #[default]
    Empty,
    File(ImageFile),
}

impl ImageInput {
    pub fn as_file(&self) -> Option<&ImageFile> {
        match self {
            ImageInput::File(file) => Some(file),
            ImageInput::Empty => None,
        }
    }
}

/// Response of `POST /s3/upload`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadResponse {
    pub message: String,
    pub data: UploadedImage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedImage {
    pub url: String,
    pub key: String,
    pub id: String,
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Discount section of the product form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscountValues {
    pub enabled: bool,
    /// Discount rate; `None` when the field holds no number.
    pub value: Option<u32>,
    pub period_enabled: bool,
    pub period_start: Option<DateTime<Utc>>,
    pub period_end: Option<DateTime<Utc>>,
}

/// The product create/edit form as filled in by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFormValues {
    pub name: String,
    pub price: u64,
    pub category: String,
    /// Size label to quantity, in form order. A `None` quantity is skipped.
    pub stocks: Vec<(String, Option<u32>)>,
    pub detail: String,
    pub discount: DiscountValues,
    pub image: ImageInput,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StockEntry {
    /// Absent when the size label is not one of the known sizes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_id: Option<u8>,
    pub quantity: u32,
}

/// Wire body for `POST /products` and `PATCH /products/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequestBody {
    pub name: String,
    pub price: u64,
    pub category_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    pub stocks: Vec<StockEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_end_time: Option<String>,
    pub content: String,
}

/// Filters for `GET /products`. Absent fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort: Option<String>,
    pub search: Option<String>,
    pub price_min: Option<u64>,
    /// Zero is treated the same as absent.
    pub price_max: Option<u64>,
    pub size: Option<String>,
    pub favorite_store: Option<String>,
    pub category_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Inquiries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquirySort {
    Oldest,
    Recent,
}

impl InquirySort {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquirySort::Oldest => "oldest",
            InquirySort::Recent => "recent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InquiryStatus {
    CompletedAnswer,
    WaitingAnswer,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::CompletedAnswer => "CompletedAnswer",
            InquiryStatus::WaitingAnswer => "WaitingAnswer",
        }
    }
}

/// Query for `GET /products/{id}/inquiries`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InquiryListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort: Option<InquirySort>,
    pub status: Option<InquiryStatus>,
}

/// Body for `POST /products/{id}/inquiries`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateInquiry {
    pub title: String,
    pub content: String,
    pub is_secret: bool,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Input of the profile edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditProfileParams {
    pub current_password: String,
    pub nickname: Option<String>,
    pub new_password: Option<String>,
    pub image: ImageInput,
}

/// Wire body for `PATCH /users/me`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequestBody {
    pub current_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreAddress {
    pub basic: String,
    pub detail: Option<String>,
}

/// The store registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreFormValues {
    pub store_name: String,
    pub address: StoreAddress,
    pub phone_number: String,
    pub description: String,
    pub image: ImageInput,
}

/// Wire body for `POST /stores`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoreRequestBody {
    pub name: String,
    pub address: String,
    pub detail_address: String,
    pub phone_number: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
}
