use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, app_with_state, AppState, Echo, Envelope, Item, Page};
use restcall_core::Problem;
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

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

async fn create(app: &Router, name: &str, tags: &[&str]) -> Item {
    let body = serde_json::json!({ "name": name, "tags": tags }).to_string();
    let resp = app.clone().oneshot(json_request("POST", "/items", &body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

// --- list ---

#[tokio::test]
async fn list_items_empty() {
    let resp = app().oneshot(get("/items")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Item> = body_json(resp).await;
    assert!(items.is_empty());
}

#[tokio::test]
async fn list_items_filters_by_every_tag() {
    let app = app_with_state(AppState::default());
    create(&app, "b", &["red", "round"]).await;
    create(&app, "a", &["red"]).await;
    create(&app, "c", &["blue"]).await;

    let items: Vec<Item> = body_json(app.clone().oneshot(get("/items?tag=red")).await.unwrap()).await;
    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["a", "b"]);

    let items: Vec<Item> =
        body_json(app.clone().oneshot(get("/items?tag=red&tag=round")).await.unwrap()).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "b");
}

// --- create ---

#[tokio::test]
async fn create_item_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/items", r#"{"name":"Lamp"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let item: Item = body_json(resp).await;
    assert_eq!(item.name, "Lamp");
    assert!(item.tags.is_empty());
}

#[tokio::test]
async fn create_item_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/items", r#"{"not_name":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_item_invalid_name_returns_problem() {
    let resp = app()
        .oneshot(json_request("POST", "/items", r#"{"name":""}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "application/problem+json");
    let problem: Problem = body_json(resp).await;
    assert_eq!(problem.status, Some(422));
    assert!(problem.detail.unwrap().contains("name"));
}

// --- get ---

#[tokio::test]
async fn get_item_not_found_returns_problem() {
    let resp = app()
        .oneshot(get("/items/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let problem: Problem = body_json(resp).await;
    assert_eq!(problem.title.as_deref(), Some("Not Found"));
}

#[tokio::test]
async fn get_item_bad_uuid_returns_400() {
    let resp = app().oneshot(get("/items/not-a-uuid")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn enveloped_item_wraps_data() {
    let app = app_with_state(AppState::default());
    let item = create(&app, "Chair", &[]).await;

    let resp = app.oneshot(get(&format!("/items/{}/envelope", item.id))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: Envelope<Item> = body_json(resp).await;
    assert_eq!(envelope.data, item);
}

// --- page ---

#[tokio::test]
async fn page_limits_objects_but_reports_total() {
    let app = app_with_state(AppState::default());
    for name in ["x", "y", "z"] {
        create(&app, name, &[]).await;
    }

    let page: Page<Item> = body_json(app.clone().oneshot(get("/items/page?size=2")).await.unwrap()).await;
    assert_eq!(page.total, 3);
    assert_eq!(page.objects.len(), 2);

    let page: Page<Item> = body_json(app.oneshot(get("/items/page")).await.unwrap()).await;
    assert_eq!(page.objects.len(), 3);
}

// --- echo ---

#[tokio::test]
async fn echo_reflects_allow_listed_headers_query_and_cookies() {
    let request = Request::builder()
        .method("PATCH")
        .uri("/echo/some/path?b=2&a=1&a=x%20y")
        .header("X-Tenant", "acme")
        .header("x-conversation-id", "c-1")
        .header("x-conversation-id", "c-2")
        .header("authorization", "secret")
        .header(http::header::COOKIE, "session=abc; flag=")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(r#"{"k":[1,2]}"#.to_string())
        .unwrap();

    let resp = app().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;

    assert_eq!(echo.method, "PATCH");
    assert_eq!(echo.path, "/echo/some/path");
    assert_eq!(echo.query["a"], vec!["1", "x y"]);
    assert_eq!(echo.query["b"], vec!["2"]);
    assert_eq!(echo.headers["x-tenant"], vec!["acme"]);
    assert_eq!(echo.headers["x-conversation-id"], vec!["c-1", "c-2"]);
    assert!(!echo.headers.contains_key("authorization"));
    assert_eq!(echo.cookies["session"], "abc");
    assert_eq!(echo.cookies["flag"], "");
    assert_eq!(echo.content_type.as_deref(), Some("application/json"));
    assert_eq!(echo.body, Some(serde_json::json!({"k": [1, 2]})));
}

#[tokio::test]
async fn echo_rejects_non_json_body() {
    let resp = app()
        .oneshot(json_request("POST", "/echo", "<xml/>"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/items", r#"{"name":"Desk","tags":["wood"]}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Item = body_json(resp).await;
    let id = created.id;

    // update, partial: only tags
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", &format!("/items/{id}"), r#"{"tags":["oak","wood"]}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Item = body_json(resp).await;
    assert_eq!(updated.name, "Desk");
    assert_eq!(updated.tags, ["oak", "wood"]);

    // update with an invalid name is rejected and changes nothing
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", &format!("/items/{id}"), r#"{"name":""}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/items/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Item = body_json(resp).await;
    assert_eq!(fetched, updated);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/items/{id}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // delete again, 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/items/{id}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
