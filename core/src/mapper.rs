//! Form-to-wire mapping.
//!
//! Pure functions: no I/O, no validation, never fail. Malformed input is
//! mapped best-effort and left for the backend to reject.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::types::{
    EditProfileParams, InquiryListParams, ProductFormValues, ProductListParams,
    ProductRequestBody, ProfileRequestBody, StockEntry, StoreFormValues, StoreRequestBody,
};

/// Backend size ids, keyed by lower-case size label.
pub const SIZE_IDS: [(&str, u8); 6] = [
    ("xs", 1),
    ("s", 2),
    ("m", 3),
    ("l", 4),
    ("xl", 5),
    ("free", 6),
];

/// Case-insensitive size label lookup. Unknown labels have no id.
pub fn size_id(label: &str) -> Option<u8> {
    let label = label.to_lowercase();
    SIZE_IDS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, id)| *id)
}

/// ISO-8601 UTC instant with millisecond precision, e.g. `2024-05-01T09:30:00.000Z`.
pub fn iso_timestamp(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn non_empty(image_id: Option<&str>) -> Option<String> {
    image_id.filter(|id| !id.is_empty()).map(str::to_string)
}

/// Build the product wire body from form values and an optional uploaded image id.
pub fn to_product_request_body(
    form: &ProductFormValues,
    image_id: Option<&str>,
) -> ProductRequestBody {
    let stocks = form
        .stocks
        .iter()
        .filter_map(|(label, quantity)| {
            quantity.map(|quantity| StockEntry {
                size_id: size_id(label),
                quantity,
            })
        })
        .collect();

    let discount = &form.discount;
    let discount_rate = if discount.enabled { discount.value } else { None };
    let period = discount.enabled && discount.period_enabled;
    let discount_start_time = period
        .then_some(discount.period_start.as_ref())
        .flatten()
        .map(iso_timestamp);
    let discount_end_time = period
        .then_some(discount.period_end.as_ref())
        .flatten()
        .map(iso_timestamp);

    ProductRequestBody {
        name: form.name.clone(),
        price: form.price,
        category_name: form.category.to_lowercase(),
        image_id: non_empty(image_id),
        stocks,
        discount_rate,
        discount_start_time,
        discount_end_time,
        content: form.detail.clone(),
    }
}

/// Build the profile wire body. Blank nickname/password are dropped, the rest trimmed.
pub fn to_profile_request_body(
    params: &EditProfileParams,
    image_id: Option<&str>,
) -> ProfileRequestBody {
    let trimmed = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    ProfileRequestBody {
        current_password: params.current_password.clone(),
        name: trimmed(&params.nickname),
        password: trimmed(&params.new_password),
        image_id: non_empty(image_id),
    }
}

/// Build the store wire body.
pub fn to_store_request_body(form: &StoreFormValues, image_id: Option<&str>) -> StoreRequestBody {
    StoreRequestBody {
        name: form.store_name.clone(),
        address: form.address.basic.clone(),
        detail_address: form.address.detail.clone().unwrap_or_default(),
        phone_number: form.phone_number.clone(),
        content: form.description.clone(),
        image_id: non_empty(image_id),
    }
}

/// Query pairs for `GET /products`.
pub fn product_list_query(params: &ProductListParams) -> Vec<(String, String)> {
    let mut query = Vec::new();
    push(&mut query, "page", params.page);
    push(&mut query, "pageSize", params.page_size);
    push(&mut query, "sort", params.sort.as_ref());
    push(&mut query, "search", params.search.as_ref());
    push(&mut query, "priceMin", params.price_min);
    push(&mut query, "priceMax", params.price_max.filter(|max| *max != 0));
    push(&mut query, "size", params.size.as_ref());
    push(&mut query, "favoriteStore", params.favorite_store.as_ref());
    push(&mut query, "categoryName", params.category_name.as_ref());
    query
}

/// Query pairs for `GET /products/{id}/inquiries`.
pub fn inquiry_list_query(params: &InquiryListParams) -> Vec<(String, String)> {
    let mut query = Vec::new();
    push(&mut query, "page", params.page);
    push(&mut query, "pageSize", params.page_size);
    push(&mut query, "sort", params.sort.map(|s| s.as_str()));
    push(&mut query, "status", params.status.map(|s| s.as_str()));
    query
}

fn push<V: ToString>(query: &mut Vec<(String, String)>, key: &str, value: Option<V>) {
    if let Some(value) = value {
        query.push((key.to_string(), value.to_string()));
    }
}
