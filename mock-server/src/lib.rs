use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DEFAULT_PASSWORD: &str = "password123";
const DEFAULT_PAGE_SIZE: usize = 16;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedImage {
    pub url: String,
    pub key: String,
    pub id: String,
}

#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub name: String,
    pub password: String,
    pub image_id: Option<String>,
}

/// Everything the server knows, plus a log of the calls it served.
#[derive(Debug)]
pub struct ShopState {
    pub products: Vec<Value>,
    pub inquiries: HashMap<String, Vec<Value>>,
    pub images: HashMap<String, UploadedImage>,
    pub stores: Vec<Value>,
    pub likes: Vec<Value>,
    pub user: User,
    pub calls: Vec<String>,
    pub last_product_query: Option<HashMap<String, String>>,
}

impl Default for ShopState {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            inquiries: HashMap::new(),
            images: HashMap::new(),
            stores: Vec::new(),
            likes: vec![json!({
                "storeId": "store-1",
                "userId": "user-1",
                "store": { "id": "store-1", "name": "Seed store" }
            })],
            user: User {
                id: "user-1".to_string(),
                name: "buyer".to_string(),
                password: DEFAULT_PASSWORD.to_string(),
                image_id: None,
            },
            calls: Vec::new(),
            last_product_query: None,
        }
    }
}

impl ShopState {
    /// Number of served calls matching `"METHOD /path"` exactly.
    pub fn call_count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| c.as_str() == call).count()
    }

    fn record(&mut self, call: impl Into<String>) {
        self.calls.push(call.into());
    }

    fn product_index(&self, id: &str) -> Option<usize> {
        self.products.iter().position(|p| p["id"] == id)
    }
}

pub type Db = Arc<RwLock<ShopState>>;

type Failure = (StatusCode, Json<Value>);

fn fail(status: StatusCode, message: &str) -> Failure {
    (status, Json(json!({ "message": message })))
}

pub fn app() -> Router {
    app_with_db(Db::default())
}

pub fn app_with_db(db: Db) -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route(
            "/products/{id}/inquiries",
            get(list_inquiries).post(create_inquiry),
        )
        .route("/s3/upload", post(upload_image))
        .route("/users/me", patch(edit_profile))
        .route("/users/me/likes", get(list_likes))
        .route("/stores", post(create_store))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_db(listener, Db::default()).await
}

pub async fn run_with_db(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_db(db)).await
}

fn page<T: Clone>(items: &[T], page: Option<usize>, page_size: Option<usize>) -> Vec<T> {
    let page = page.unwrap_or(1).max(1);
    let size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    items
        .iter()
        .skip((page - 1).saturating_mul(size))
        .take(size)
        .cloned()
        .collect()
}

// --- products ---

async fn list_products(
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut state = db.write().await;
    state.record("GET /products");
    state.last_product_query = Some(query.clone());

    let number = |key: &str| query.get(key).and_then(|v| v.parse::<u64>().ok());
    let price_min = number("priceMin");
    let price_max = number("priceMax");
    let search = query.get("search").map(|s| s.to_lowercase());
    let category = query.get("categoryName");

    let matching: Vec<Value> = state
        .products
        .iter()
        .filter(|p| {
            let price = p["price"].as_u64().unwrap_or(0);
            let name = p["name"].as_str().unwrap_or("").to_lowercase();
            price_min.map_or(true, |min| price >= min)
                && price_max.map_or(true, |max| price <= max)
                && search.as_ref().map_or(true, |s| name.contains(s.as_str()))
                && category.map_or(true, |c| p["categoryName"] == c.as_str())
        })
        .cloned()
        .collect();

    let page_no = query.get("page").and_then(|v| v.parse().ok());
    let page_size = query.get("pageSize").and_then(|v| v.parse().ok());
    Json(json!({
        "list": page(&matching, page_no, page_size),
        "totalCount": matching.len(),
    }))
}

fn validate_product(body: &Map<String, Value>) -> Result<(), Failure> {
    if !body.get("name").is_some_and(Value::is_string) {
        return Err(fail(StatusCode::BAD_REQUEST, "name is required"));
    }
    if !body.get("price").is_some_and(Value::is_u64) {
        return Err(fail(StatusCode::BAD_REQUEST, "price must be a non-negative integer"));
    }
    Ok(())
}

fn attach_image(state: &ShopState, product: &mut Map<String, Value>) -> Result<(), Failure> {
    if let Some(image_id) = product.get("imageId").and_then(Value::as_str) {
        let image = state
            .images
            .get(image_id)
            .ok_or_else(|| fail(StatusCode::BAD_REQUEST, "unknown imageId"))?;
        product.insert("image".to_string(), Value::String(image.url.clone()));
    }
    Ok(())
}

async fn create_product(
    State(db): State<Db>,
    Json(body): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<Value>), Failure> {
    let mut state = db.write().await;
    state.record("POST /products");
    validate_product(&body)?;

    let mut product = body;
    attach_image(&state, &mut product)?;
    product.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));

    let product = Value::Object(product);
    state.products.push(product.clone());
    Ok((StatusCode::CREATED, Json(product)))
}

async fn get_product(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, Failure> {
    let mut state = db.write().await;
    state.record(format!("GET /products/{id}"));
    let index = state
        .product_index(&id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "product not found"))?;
    Ok(Json(state.products[index].clone()))
}

async fn update_product(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<Value>, Failure> {
    let mut state = db.write().await;
    state.record(format!("PATCH /products/{id}"));
    let index = state
        .product_index(&id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "product not found"))?;

    let mut patch = body;
    patch.remove("id");
    attach_image(&state, &mut patch)?;

    let product = &mut state.products[index];
    if let Value::Object(fields) = product {
        fields.extend(patch);
    }
    Ok(Json(product.clone()))
}

async fn delete_product(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, Failure> {
    let mut state = db.write().await;
    state.record(format!("DELETE /products/{id}"));
    let index = state
        .product_index(&id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "product not found"))?;
    state.products.remove(index);
    state.inquiries.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

// --- inquiries ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryQuery {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub sort: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInquiry {
    pub title: String,
    pub content: String,
    pub is_secret: bool,
}

async fn list_inquiries(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(query): Query<InquiryQuery>,
) -> Result<Json<Value>, Failure> {
    let mut state = db.write().await;
    state.record(format!("GET /products/{id}/inquiries"));
    if state.product_index(&id).is_none() {
        return Err(fail(StatusCode::NOT_FOUND, "product not found"));
    }

    let mut matching: Vec<Value> = state
        .inquiries
        .get(&id)
        .into_iter()
        .flatten()
        .filter(|i| query.status.as_ref().map_or(true, |s| i["status"] == s.as_str()))
        .cloned()
        .collect();
    match query.sort.as_deref() {
        None | Some("recent") => matching.reverse(),
        Some("oldest") => {}
        Some(_) => return Err(fail(StatusCode::BAD_REQUEST, "sort must be oldest or recent")),
    }

    Ok(Json(json!({
        "list": page(&matching, query.page, query.page_size),
        "totalCount": matching.len(),
    })))
}

async fn create_inquiry(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<CreateInquiry>,
) -> Result<(StatusCode, Json<Value>), Failure> {
    let mut state = db.write().await;
    state.record(format!("POST /products/{id}/inquiries"));
    if state.product_index(&id).is_none() {
        return Err(fail(StatusCode::NOT_FOUND, "product not found"));
    }

    let inquiry = json!({
        "id": Uuid::new_v4().to_string(),
        "userId": state.user.id,
        "productId": id,
        "title": input.title,
        "content": input.content,
        "isSecret": input.is_secret,
        "status": "WaitingAnswer",
    });
    state
        .inquiries
        .entry(id)
        .or_default()
        .push(inquiry.clone());
    Ok((StatusCode::CREATED, Json(inquiry)))
}

// --- uploads ---

async fn upload_image(
    State(db): State<Db>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), Failure> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| fail(StatusCode::BAD_REQUEST, "malformed multipart body"))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| fail(StatusCode::BAD_REQUEST, "unreadable image field"))?;
        upload = Some((file_name, bytes.len()));
    }

    let mut state = db.write().await;
    state.record("POST /s3/upload");
    let (file_name, size) =
        upload.ok_or_else(|| fail(StatusCode::BAD_REQUEST, "image field is required"))?;
    if size == 0 {
        return Err(fail(StatusCode::BAD_REQUEST, "image is empty"));
    }

    let id = Uuid::new_v4().to_string();
    let key = format!("{id}-{file_name}");
    let image = UploadedImage {
        url: format!("https://cdn.mock.local/{key}"),
        key,
        id: id.clone(),
    };
    state.images.insert(id, image.clone());
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "upload succeeded", "data": image })),
    ))
}

// --- users ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditProfile {
    pub current_password: String,
    pub name: Option<String>,
    pub password: Option<String>,
    pub image_id: Option<String>,
}

fn user_view(state: &ShopState) -> Value {
    let image = state
        .user
        .image_id
        .as_ref()
        .and_then(|id| state.images.get(id))
        .map(|image| image.url.clone());
    json!({ "id": state.user.id, "name": state.user.name, "image": image })
}

async fn edit_profile(
    State(db): State<Db>,
    Json(input): Json<EditProfile>,
) -> Result<Json<Value>, Failure> {
    let mut state = db.write().await;
    state.record("PATCH /users/me");
    if input.current_password != state.user.password {
        return Err(fail(StatusCode::UNAUTHORIZED, "current password is incorrect"));
    }
    if let Some(image_id) = &input.image_id {
        if !state.images.contains_key(image_id) {
            return Err(fail(StatusCode::BAD_REQUEST, "unknown imageId"));
        }
    }

    if let Some(name) = input.name {
        state.user.name = name;
    }
    if let Some(password) = input.password {
        state.user.password = password;
    }
    if input.image_id.is_some() {
        state.user.image_id = input.image_id;
    }
    Ok(Json(user_view(&state)))
}

async fn list_likes(State(db): State<Db>) -> Json<Vec<Value>> {
    let mut state = db.write().await;
    state.record("GET /users/me/likes");
    Json(state.likes.clone())
}

// --- stores ---

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStore {
    pub name: String,
    pub address: String,
    pub detail_address: String,
    pub phone_number: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
}

async fn create_store(
    State(db): State<Db>,
    Json(input): Json<CreateStore>,
) -> Result<(StatusCode, Json<Value>), Failure> {
    let mut state = db.write().await;
    state.record("POST /stores");
    if let Some(image_id) = &input.image_id {
        if !state.images.contains_key(image_id) {
            return Err(fail(StatusCode::BAD_REQUEST, "unknown imageId"));
        }
    }

    let mut store = serde_json::to_value(&input)
        .map_err(|_| fail(StatusCode::INTERNAL_SERVER_ERROR, "store encoding failed"))?;
    store["id"] = Value::String(Uuid::new_v4().to_string());
    store["userId"] = Value::String(state.user.id.clone());
    state.stores.push(store.clone());
    Ok((StatusCode::CREATED, Json(store)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_has_seed_user_and_like() {
        let state = ShopState::default();
        assert_eq!(state.user.password, DEFAULT_PASSWORD);
        assert_eq!(state.likes.len(), 1);
        assert!(state.calls.is_empty());
    }

    #[test]
    fn call_count_matches_exact_calls() {
        let mut state = ShopState::default();
        state.record("POST /s3/upload");
        state.record("POST /products");
        state.record("POST /s3/upload");
        assert_eq!(state.call_count("POST /s3/upload"), 2);
        assert_eq!(state.call_count("POST /products"), 1);
        assert_eq!(state.call_count("GET /products"), 0);
    }

    #[test]
    fn page_clamps_and_slices() {
        let items: Vec<u32> = (1..=5).collect();
        assert_eq!(page(&items, Some(2), Some(2)), vec![3, 4]);
        assert_eq!(page(&items, Some(0), Some(3)), vec![1, 2, 3]);
        assert!(page(&items, Some(9), Some(2)).is_empty());
    }

    #[test]
    fn page_with_huge_numbers_is_empty() {
        let items: Vec<u32> = (1..=5).collect();
        assert!(page(&items, Some(usize::MAX), Some(usize::MAX)).is_empty());
        assert!(page(&items, Some(2), Some(usize::MAX)).is_empty());
    }

    #[test]
    fn validate_product_requires_name_and_price() {
        let body: Map<String, Value> = serde_json::from_str(r#"{"price":10}"#).unwrap();
        assert_eq!(validate_product(&body).unwrap_err().0, StatusCode::BAD_REQUEST);

        let body: Map<String, Value> = serde_json::from_str(r#"{"name":"x","price":-1}"#).unwrap();
        assert!(validate_product(&body).is_err());

        let body: Map<String, Value> = serde_json::from_str(r#"{"name":"x","price":10}"#).unwrap();
        assert!(validate_product(&body).is_ok());
    }

    #[test]
    fn create_inquiry_requires_is_secret() {
        let result: Result<CreateInquiry, _> =
            serde_json::from_str(r#"{"title":"t","content":"c"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn edit_profile_optional_fields() {
        let input: EditProfile = serde_json::from_str(r#"{"currentPassword":"pw"}"#).unwrap();
        assert_eq!(input.current_password, "pw");
        assert!(input.name.is_none());
        assert!(input.password.is_none());
        assert!(input.image_id.is_none());
    }
}
