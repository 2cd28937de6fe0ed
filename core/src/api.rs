//! Executing client: `ShopClient` plus an injected `Transport`.
//!
//! # Design
//! Every operation is one sequential chain of build, execute, parse. The
//! create/update/edit flows add an upload phase in front when the form
//! carries an image file: the upload must succeed and yield an id before the
//! JSON body is built. Errors from either phase are returned unchanged and
//! nothing is retried.

use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::client::ShopClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::mapper::{to_product_request_body, to_profile_request_body, to_store_request_body};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    CreateInquiry, EditProfileParams, ImageFile, ImageInput, InquiryListParams,
    ProductFormValues, ProductListParams, StoreFormValues, UploadResponse,
};

pub struct ShopApi<T> {
    client: ShopClient,
    transport: T,
}

impl ShopApi<UreqTransport> {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(ShopClient::new(&config.base_url), UreqTransport::new(config))
    }
}

impl<T: Transport> ShopApi<T> {
    pub fn new(client: ShopClient, transport: T) -> Self {
        Self { client, transport }
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, path = %request.path, "sending request");
        self.transport.execute(request)
    }

    /// Upload phase: only a file produces an id.
    fn upload_if_file(&self, image: &ImageInput) -> Result<Option<String>, ApiError> {
        match image.as_file() {
            Some(file) => Ok(Some(self.upload_image(file)?.data.id)),
            None => Ok(None),
        }
    }

    // -- products -----------------------------------------------------------

    #[instrument(skip(self, form), fields(name = %form.name))]
    pub fn create_product(&self, form: &ProductFormValues) -> Result<Value, ApiError> {
        let image_id = self.upload_if_file(&form.image)?;
        let body = to_product_request_body(form, image_id.as_deref());
        let request = self.client.build_create_product(&body)?;
        self.client.parse_json(self.send(request)?)
    }

    #[instrument(skip(self, form))]
    pub fn update_product(&self, id: &str, form: &ProductFormValues) -> Result<Value, ApiError> {
        let image_id = self.upload_if_file(&form.image)?;
        let body = to_product_request_body(form, image_id.as_deref());
        let request = self.client.build_update_product(id, &body)?;
        self.client.parse_json(self.send(request)?)
    }

    #[instrument(skip(self))]
    pub fn list_products(&self, params: &ProductListParams) -> Result<Value, ApiError> {
        let request = self.client.build_list_products(params);
        self.client.parse_json(self.send(request)?)
    }

    #[instrument(skip(self))]
    pub fn get_product(&self, id: &str) -> Result<Value, ApiError> {
        let request = self.client.build_get_product(id);
        self.client.parse_json(self.send(request)?)
    }

    #[instrument(skip(self))]
    pub fn delete_product(&self, id: &str) -> Result<Value, ApiError> {
        let request = self.client.build_delete_product(id);
        self.client.parse_json(self.send(request)?)
    }

    // -- inquiries ----------------------------------------------------------

    #[instrument(skip(self))]
    pub fn list_inquiries(
        &self,
        product_id: &str,
        params: &InquiryListParams,
    ) -> Result<Value, ApiError> {
        let request = self.client.build_list_inquiries(product_id, params);
        self.client.parse_json(self.send(request)?)
    }

    #[instrument(skip(self, input))]
    pub fn create_inquiry(&self, product_id: &str, input: &CreateInquiry) -> Result<Value, ApiError> {
        let request = self.client.build_create_inquiry(product_id, input)?;
        self.client.parse_json(self.send(request)?)
    }

    // -- uploads ------------------------------------------------------------

    #[instrument(skip(self, file), fields(file_name = %file.file_name, size = file.bytes.len()))]
    pub fn upload_image(&self, file: &ImageFile) -> Result<UploadResponse, ApiError> {
        let request = self.client.build_upload_image(file)?;
        let upload = self.client.parse_upload_image(self.send(request)?)?;
        debug!(image_id = %upload.data.id, "image uploaded");
        Ok(upload)
    }

    // -- users --------------------------------------------------------------

    /// Failures are logged with the server payload before being returned.
    #[instrument(skip(self, params))]
    pub fn edit_profile(&self, params: &EditProfileParams) -> Result<Value, ApiError> {
        let image_id = self.upload_if_file(&params.image)?;
        let body = to_profile_request_body(params, image_id.as_deref());
        let result = self
            .client
            .build_edit_profile(&body)
            .and_then(|request| self.send(request))
            .and_then(|response| self.client.parse_json(response));

        if let Err(err) = &result {
            error!(detail = %err.detail(), "profile update failed");
        }
        result
    }

    #[instrument(skip(self))]
    pub fn list_favorite_stores(&self) -> Result<Value, ApiError> {
        let request = self.client.build_list_favorite_stores();
        self.client.parse_json(self.send(request)?)
    }

    // -- stores -------------------------------------------------------------

    #[instrument(skip(self, form), fields(name = %form.store_name))]
    pub fn create_store(&self, form: &StoreFormValues) -> Result<Value, ApiError> {
        let image_id = self.upload_if_file(&form.image)?;
        let body = to_store_request_body(form, image_id.as_deref());
        let request = self.client.build_create_store(&body)?;
        self.client.parse_json(self.send(request)?)
    }
}
