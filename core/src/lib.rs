//! Client core for the shop API: products, inquiries, profile, stores and
//! image uploads.
//!
//! # Overview
//! `ShopClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network. `ShopApi` pairs it with an injected
//! `Transport` and runs the two-phase flows (upload an image, then submit
//! JSON that references the uploaded id).
//!
//! # Design
//! - `ShopClient` is stateless; it holds only `base_url`.
//! - Form values are mapped to wire bodies by the pure functions in `mapper`.
//! - The transport is passed in explicitly. `UreqTransport` is the default,
//!   configured from `ClientConfig`.
//! - Responses are returned as decoded JSON, unvalidated.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod mapper;
pub mod multipart;
pub mod transport;
pub mod types;

pub use api::ShopApi;
pub use client::ShopClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{
    CreateInquiry, DiscountValues, EditProfileParams, ImageFile, ImageInput, InquiryListParams,
    InquirySort, InquiryStatus, ProductFormValues, ProductListParams, ProductRequestBody,
    ProfileRequestBody, StockEntry, StoreAddress, StoreFormValues, StoreRequestBody,
    UploadResponse, UploadedImage,
};
