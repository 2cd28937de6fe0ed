use std::sync::Arc;

use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_db, Db, ShopState, DEFAULT_PASSWORD};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

fn upload_request(field: &str, file_name: &str, content: &str) -> Request<String> {
    let boundary = "test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: image/png\r\n\r\n\
         {content}\r\n\
         --{boundary}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri("/s3/upload")
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(body)
        .unwrap()
}

fn shared_db() -> Db {
    Arc::new(RwLock::new(ShopState::default()))
}

// --- products ---

#[tokio::test]
async fn list_products_empty() {
    let resp = app().oneshot(empty_request("GET", "/products")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let page: Value = body_json(resp).await;
    assert_eq!(page["totalCount"], 0);
    assert_eq!(page["list"], json!([]));
}

#[tokio::test]
async fn list_products_records_query() {
    let db = shared_db();
    let resp = app_with_db(db.clone())
        .oneshot(empty_request("GET", "/products?page=1&priceMax=10"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let state = db.read().await;
    let query = state.last_product_query.as_ref().unwrap();
    assert_eq!(query.get("priceMax").map(String::as_str), Some("10"));
    assert_eq!(query.get("page").map(String::as_str), Some("1"));
}

#[tokio::test]
async fn create_product_returns_201() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/products",
            r#"{"name":"Tee","price":12000,"categoryName":"top","stocks":[],"content":"cotton"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: Value = body_json(resp).await;
    assert_eq!(product["name"], "Tee");
    assert!(product["id"].is_string());
}

#[tokio::test]
async fn create_product_without_name_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/products", r#"{"price":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_product_with_unknown_image_returns_400() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/products",
            r#"{"name":"Tee","price":1,"imageId":"nope"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_product_not_found() {
    let resp = app()
        .oneshot(empty_request("GET", "/products/missing"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_product_not_found() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/products/missing"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- uploads ---

#[tokio::test]
async fn upload_returns_image_id() {
    let db = shared_db();
    let resp = app_with_db(db.clone())
        .oneshot(upload_request("image", "a.png", "PNGDATA"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let upload: Value = body_json(resp).await;
    let id = upload["data"]["id"].as_str().unwrap().to_string();
    assert!(upload["data"]["key"].as_str().unwrap().ends_with("a.png"));

    let state = db.read().await;
    assert!(state.images.contains_key(&id));
    assert_eq!(state.call_count("POST /s3/upload"), 1);
}

#[tokio::test]
async fn upload_without_image_field_returns_400() {
    let resp = app()
        .oneshot(upload_request("file", "a.png", "PNGDATA"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- users ---

#[tokio::test]
async fn edit_profile_wrong_password_returns_401() {
    let resp = app()
        .oneshot(json_request(
            "PATCH",
            "/users/me",
            r#"{"currentPassword":"wrong","name":"x"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["message"], "current password is incorrect");
}

#[tokio::test]
async fn edit_profile_updates_name() {
    let body = json!({ "currentPassword": DEFAULT_PASSWORD, "name": "neo" }).to_string();
    let resp = app()
        .oneshot(json_request("PATCH", "/users/me", &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let user: Value = body_json(resp).await;
    assert_eq!(user["name"], "neo");
    assert_eq!(user["image"], Value::Null);
}

#[tokio::test]
async fn list_likes_returns_seed_store() {
    let resp = app()
        .oneshot(empty_request("GET", "/users/me/likes"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let likes: Vec<Value> = body_json(resp).await;
    assert_eq!(likes.len(), 1);
    assert_eq!(likes[0]["store"]["id"], "store-1");
}

// --- stores ---

#[tokio::test]
async fn create_store_missing_fields_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/stores", r#"{"name":"only"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- full product lifecycle ---

#[tokio::test]
async fn product_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // upload
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(upload_request("image", "front.png", "IMG"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let upload: Value = body_json(resp).await;
    let image_id = upload["data"]["id"].as_str().unwrap().to_string();

    // create referencing the upload
    let body = json!({
        "name": "Parka",
        "price": 99000,
        "categoryName": "outer",
        "imageId": image_id,
        "stocks": [{ "sizeId": 3, "quantity": 2 }],
        "content": "warm",
    })
    .to_string();
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/products", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = body_json(resp).await;
    assert!(created["image"].as_str().unwrap().starts_with("https://cdn.mock.local/"));
    let id = created["id"].as_str().unwrap().to_string();

    // filtered list
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/products?priceMax=50000"))
        .await
        .unwrap();
    let page: Value = body_json(resp).await;
    assert_eq!(page["totalCount"], 0);

    // patch price
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PATCH", &format!("/products/{id}"), r#"{"price":45000}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = body_json(resp).await;
    assert_eq!(updated["price"], 45000);
    assert_eq!(updated["name"], "Parka"); // unchanged

    // inquiries
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            &format!("/products/{id}/inquiries"),
            r#"{"title":"Fit","content":"True to size?","isSecret":false}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request(
            "GET",
            &format!("/products/{id}/inquiries?status=WaitingAnswer&sort=oldest"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let inquiries: Value = body_json(resp).await;
    assert_eq!(inquiries["totalCount"], 1);
    assert_eq!(inquiries["list"][0]["isSecret"], false);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/products/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/products/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
