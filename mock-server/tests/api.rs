use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Credentials, StructureResponse};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

const TOKEN: &str = "test-token";
const SECRET: &str = "test-secret";

fn router() -> axum::Router {
    app(Credentials::new(TOKEN, SECRET))
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn clean_request(uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::AUTHORIZATION, format!("Token {TOKEN}"))
        .header("X-Secret", SECRET)
        .body(body.to_string())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_token_returns_401() {
    let resp = router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/clean/name")
                .header(http::header::CONTENT_TYPE, "application/json")
                .header("X-Secret", SECRET)
                .body(r#"["Иван"]"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "Invalid API key");
}

#[tokio::test]
async fn wrong_secret_returns_401() {
    let resp = router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/clean/phone")
                .header(http::header::CONTENT_TYPE, "application/json")
                .header(http::header::AUTHORIZATION, format!("Token {TOKEN}"))
                .header("X-Secret", "nope")
                .body("[]".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- clean/{kind} ---

#[tokio::test]
async fn clean_phone_returns_one_object_per_item() {
    let resp = router()
        .oneshot(clean_request("/clean/phone", r#"["8 916 823-34-54", "garbage"]"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Value> = body_json(resp).await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["phone"], "+7 916 823-34-54");
    assert_eq!(items[0]["source"], "8 916 823-34-54");
    assert!(items[1]["phone"].is_null());
}

#[tokio::test]
async fn clean_passport_returns_series_and_number() {
    let resp = router()
        .oneshot(clean_request("/clean/passport", r#"["4509 235857"]"#))
        .await
        .unwrap();

    let items: Vec<Value> = body_json(resp).await;
    assert_eq!(items, vec![json!({"source": "4509 235857", "series": "45 09", "number": "235857", "qc": 0})]);
}

#[tokio::test]
async fn clean_empty_batch_returns_empty_array() {
    let resp = router().oneshot(clean_request("/clean/email", "[]")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Value> = body_json(resp).await;
    assert!(items.is_empty());
}

#[tokio::test]
async fn unknown_kind_returns_404() {
    let resp = router()
        .oneshot(clean_request("/clean/address", r#"["Москва"]"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_array_body_is_rejected() {
    let resp = router()
        .oneshot(clean_request("/clean/name", r#"{"name":"Иван"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- clean (structure) ---

#[tokio::test]
async fn clean_structure_cleans_every_cell() {
    let resp = router()
        .oneshot(clean_request(
            "/clean",
            r#"{"structure":["AS_IS","NAME","EMAIL"],"data":[["1","иван петров","Ivan@Mail.RU"]]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: StructureResponse = body_json(resp).await;
    assert_eq!(body.structure, vec!["AS_IS", "NAME", "EMAIL"]);
    assert_eq!(body.data.len(), 1);
    assert_eq!(body.data[0][0], json!({"source": "1"}));
    assert_eq!(body.data[0][1]["result"], "Иван Петров");
    assert_eq!(body.data[0][2]["email"], "ivan@mail.ru");
}

#[tokio::test]
async fn clean_structure_rejects_unknown_column() {
    let resp = router()
        .oneshot(clean_request("/clean", r#"{"structure":["ADDRESS"],"data":[["Москва"]]}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn clean_structure_rejects_ragged_rows() {
    let resp = router()
        .oneshot(clean_request("/clean", r#"{"structure":["NAME","PHONE"],"data":[["Иван"]]}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "row length does not match structure");
}
