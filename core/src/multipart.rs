//! `multipart/form-data` encoding for the single-file image upload.

use ureq::http::HeaderValue;
use uuid::Uuid;

use crate::error::ApiError;
use crate::types::ImageFile;

/// Encode `file` as the only part of a form, under `field`.
///
/// Returns the `content-type` header value (with boundary) and the body.
/// The file's content type must be a valid header value.
pub fn encode_file_part(field: &str, file: &ImageFile) -> Result<(String, Vec<u8>), ApiError> {
    let content_type = HeaderValue::from_str(&file.content_type)
        .map_err(|e| ApiError::SerializationError(format!("invalid content type: {e}")))?;
    let content_type = content_type
        .to_str()
        .map_err(|e| ApiError::SerializationError(format!("invalid content type: {e}")))?;

    let boundary = format!("----shop-core-{}", Uuid::new_v4().simple());
    let field = escape_quoted(field);
    let file_name = escape_quoted(&file.file_name);

    let mut body = Vec::with_capacity(file.bytes.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(&file.bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Ok((format!("multipart/form-data; boundary={boundary}"), body))
}

/// Percent-encode the characters that would end a quoted header parameter.
fn escape_quoted(value: &str) -> String {
    value
        .replace('\r', "%0D")
        .replace('\n', "%0A")
        .replace('"', "%22")
}
