use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use bookshelf_kernel::settings::Settings;
use serde_json::{json, Value};
use tower::ServiceExt;

fn router_with(settings: &Settings) -> Router {
    let registry = bookshelf_app::build_registry(settings).unwrap();
    bookshelf_http::build_router(&registry, settings)
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn post_query(router: Router, path: &str, query: &str) -> Value {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "query": query }).to_string()))
        .unwrap();

    let (status, body) = send(router, request).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn post_book_by_id_over_http() {
    let router = router_with(&Settings::default());
    let body = post_query(router, "/", r#"{ book(id: "3") { title author createdAt } }"#).await;

    assert_eq!(
        body,
        json!({
            "data": {
                "book": {
                    "title": "Harry Potter",
                    "author": "J.K. Rowling",
                    "createdAt": "2022-02-22T09:35:10.000Z"
                }
            }
        })
    );
}

#[tokio::test]
async fn post_missing_book_over_http() {
    let router = router_with(&Settings::default());
    let body = post_query(router, "/", r#"{ book(id: "42") { title } }"#).await;
    assert_eq!(body, json!({ "data": { "book": null } }));
}

#[tokio::test]
async fn post_books_over_http() {
    let router = router_with(&Settings::default());
    let body = post_query(router, "/", "{ books { id } }").await;
    let ids: Vec<&str> = body["data"]["books"]
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["1", "2", "3", "4", "5", "6"]);
}

#[tokio::test]
async fn validation_errors_are_reported_in_body() {
    let router = router_with(&Settings::default());
    let body = post_query(router, "/", "{ books { publisher } }").await;
    assert!(body["data"].is_null());
    assert!(body["errors"][0]["message"]
        .as_str()
        .unwrap()
        .contains("publisher"));
}

#[tokio::test]
async fn malformed_body_gets_error_envelope() {
    let router = router_with(&Settings::default());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let (status, body) = send(router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["code"], "bad_request");
    assert_eq!(body["error"]["details"][0]["field"], "body");
}

#[tokio::test]
async fn get_serves_graphiql() {
    let router = router_with(&Settings::default());
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let (status, body) = send(router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("graphiql"));
}

#[tokio::test]
async fn get_without_playground_is_not_allowed() {
    let mut settings = Settings::default();
    settings.graphql.playground = false;
    let router = router_with(&settings);
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let (status, _) = send(router, request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn endpoint_path_is_configurable() {
    let mut settings = Settings::default();
    settings.graphql.path = "/graphql".to_string();
    let router = router_with(&settings);

    let body = post_query(router.clone(), "/graphql", r#"{ book(id: "1") { title } }"#).await;
    assert_eq!(body["data"]["book"]["title"], "The Awakening");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"query":"{ books { id } }"}"#))
        .unwrap();
    let (status, _) = send(router, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalogue_file_replaces_seed_data() {
    let path = std::env::temp_dir().join(format!(
        "bookshelf-http-catalogue-{}.json",
        std::process::id()
    ));
    std::fs::write(
        &path,
        r#"[{"id": 11, "title": "Solaris", "author": "Stanislaw Lem", "begin_with": 0}]"#,
    )
    .unwrap();

    let mut settings = Settings::default();
    settings.books.data_path = Some(path);
    let router = router_with(&settings);

    let body = post_query(router, "/", "{ books { id title createdAt } }").await;
    assert_eq!(
        body["data"]["books"],
        json!([{ "id": "11", "title": "Solaris", "createdAt": "1970-01-01T00:00:00.000Z" }])
    );
}

#[tokio::test]
async fn openapi_documents_graphql_endpoint() {
    let router = router_with(&Settings::default());
    let request = Request::builder()
        .uri("/docs/openapi.json")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(router, request).await;
    assert_eq!(status, StatusCode::OK);

    let spec: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(spec["paths"]["/"]["post"]["summary"], "Execute a GraphQL query");
    assert!(spec["components"]["schemas"]["GraphQLRequest"].is_object());
}

#[tokio::test]
async fn unrenderable_created_at_keeps_partial_response() {
    let path = std::env::temp_dir().join(format!(
        "bookshelf-http-far-future-{}.json",
        std::process::id()
    ));
    std::fs::write(
        &path,
        format!(
            r#"[{{"id": 1, "title": "Now", "author": "A", "begin_with": 0}},
               {{"id": 2, "title": "Never", "author": "B", "begin_with": {}}}]"#,
            i64::MAX
        ),
    )
    .unwrap();

    let mut settings = Settings::default();
    settings.books.data_path = Some(path);
    let router = router_with(&settings);

    let body = post_query(router, "/", "{ books { title createdAt } }").await;
    assert_eq!(
        body["data"]["books"],
        json!([
            { "title": "Now", "createdAt": "1970-01-01T00:00:00.000Z" },
            { "title": "Never", "createdAt": null }
        ])
    );
    assert_eq!(body["errors"][0]["path"], json!(["books", 1, "createdAt"]));
    assert_eq!(body["errors"][0]["extensions"]["code"], "FORMAT_ERROR");
}
