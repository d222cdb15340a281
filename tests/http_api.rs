mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use table_order_api::{routes::create_api_router, state::AppState};
use tower::ServiceExt;

fn app(state: AppState) -> Router {
    Router::new().nest("/api", create_api_router()).with_state(state)
}

async fn send(app: &Router, request: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}

fn json_request(method: &str, uri: &str, body: Value) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))?)
}

async fn login(app: &Router) -> anyhow::Result<String> {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/admin/login",
            json!({ "password": common::ADMIN_PASSWORD }),
        )?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(body["data"]["token"]
        .as_str()
        .expect("token in login response")
        .to_string())
}

#[tokio::test]
async fn admin_routes_require_a_session() -> anyhow::Result<()> {
    let (state, _uploads) = common::setup_state().await?;
    let app = app(state);

    for uri in ["/api/admin/orders", "/api/admin/stats", "/api/admin/reviews"] {
        let request = Request::builder().uri(uri).body(Body::empty())?;
        let (status, body) = send(&app, request).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["message"], "Unauthorized");
    }

    let forged = Request::builder()
        .uri("/api/admin/orders")
        .header(header::AUTHORIZATION, "Bearer not-a-token")
        .body(Body::empty())?;
    let (status, _) = send(&app, forged).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_rejected() -> anyhow::Result<()> {
    let (state, _uploads) = common::setup_state().await?;
    let app = app(state);

    let (status, body) = send(
        &app,
        json_request("POST", "/api/admin/login", json!({ "password": "guess" }))?,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["error"], "Wrong password");
    Ok(())
}

#[tokio::test]
async fn admin_session_unlocks_the_dashboard() -> anyhow::Result<()> {
    let (state, _uploads) = common::setup_state().await?;
    let app = app(state);
    let token = login(&app).await?;

    let request = Request::builder()
        .uri("/api/admin/stats")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())?;
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["today_orders"], 0);
    assert_eq!(body["data"]["pending_orders"], 0);

    let request = Request::builder()
        .uri("/api/admin/revenue-trend")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())?;
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(7));
    Ok(())
}

#[tokio::test]
async fn empty_cart_and_malformed_json_are_bad_requests() -> anyhow::Result<()> {
    let (state, _uploads) = common::setup_state().await?;
    let app = app(state);

    let (status, _) = send(&app, json_request("POST", "/api/orders", json!({ "items": [] }))?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let malformed = Request::builder()
        .method("POST")
        .uri("/api/orders")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ items: nope"))?;
    let (status, body) = send(&app, malformed).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["error"], "Invalid order data");
    Ok(())
}

#[tokio::test]
async fn table_session_flows_into_the_order() -> anyhow::Result<()> {
    let (state, _uploads) = common::setup_state().await?;
    let table = common::create_table(&state, "Table 7").await?;
    let dish = common::create_dish(&state, None, "Spring Rolls", 18.5, true).await?;
    let app = app(state);

    let request = Request::builder()
        .uri(format!("/api/table-session?table={table}"))
        .body(Body::empty())?;
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["table_name"], "Table 7");
    let session = body["data"]["token"].as_str().expect("session token").to_string();

    let mut request = json_request(
        "POST",
        "/api/orders",
        json!({ "items": [{ "dish_id": dish.id, "quantity": 2 }], "note": "extra chili" }),
    )?;
    request
        .headers_mut()
        .insert("x-table-session", session.parse()?);
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 37.0);
    let order_id = body["data"]["order_id"].as_i64().expect("order id");

    let request = Request::builder()
        .uri(format!("/api/orders/{order_id}"))
        .body(Body::empty())?;
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["table_id"], table);
    assert_eq!(body["data"]["table_name"], "Table 7");
    assert_eq!(body["data"]["status"], "Pending");
    assert_eq!(body["data"]["customer_note"], "extra chili");
    assert_eq!(body["data"]["items"][0]["dish_name"], "Spring Rolls");
    Ok(())
}

#[tokio::test]
async fn unknown_table_session_is_not_found() -> anyhow::Result<()> {
    let (state, _uploads) = common::setup_state().await?;
    let app = app(state);

    let request = Request::builder()
        .uri("/api/table-session?table=404")
        .body(Body::empty())?;
    let (status, _) = send(&app, request).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn kitchen_moves_an_order_through_statuses() -> anyhow::Result<()> {
    let (state, _uploads) = common::setup_state().await?;
    let order_id = common::insert_order(
        &state,
        table_order_api::entity::orders::OrderStatus::Pending,
        42.0,
        common::now(),
    )
    .await?;
    let app = app(state);
    let token = login(&app).await?;

    let mut request = json_request(
        "PUT",
        &format!("/api/admin/orders/{order_id}/status"),
        json!({ "status": "Cooking" }),
    )?;
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, format!("Bearer {token}").parse()?);
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Cooking");

    let mut request = json_request(
        "PUT",
        &format!("/api/admin/orders/{order_id}/status"),
        json!({ "status": "Lost" }),
    )?;
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, format!("Bearer {token}").parse()?);
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["error"], "Invalid order status");

    let request = Request::builder()
        .uri("/api/admin/orders")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())?;
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["status"], "Cooking");
    Ok(())
}

#[tokio::test]
async fn reviews_accept_loose_ratings() -> anyhow::Result<()> {
    let (state, _uploads) = common::setup_state().await?;
    let app = app(state);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/reviews",
            json!({ "order_id": 5, "rating": 9, "comment": "Too salty" }),
        )?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rating"], 5);
    assert_eq!(body["data"]["order_id"], 5);
    Ok(())
}

#[tokio::test]
async fn malformed_admin_bodies_get_the_error_envelope() -> anyhow::Result<()> {
    let (state, _uploads) = common::setup_state().await?;
    let order_id = common::insert_order(
        &state,
        table_order_api::entity::orders::OrderStatus::Pending,
        42.0,
        common::now(),
    )
    .await?;
    let app = app(state);
    let token = login(&app).await?;

    let cases = [
        ("PUT", format!("/api/admin/orders/{order_id}/status"), json!({ "status": 7 }), "Invalid status data"),
        ("POST", "/api/admin/categories".to_string(), json!({}), "Invalid category data"),
        ("POST", "/api/admin/tables".to_string(), json!({ "name": 3 }), "Invalid table data"),
    ];
    for (method, uri, payload, error) in cases {
        let mut request = json_request(method, &uri, payload)?;
        request
            .headers_mut()
            .insert(header::AUTHORIZATION, format!("Bearer {token}").parse()?);
        let (status, body) = send(&app, request).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["data"]["error"], error, "{uri}");
        assert!(body["message"].is_string(), "{uri}");
    }

    let (status, body) = send(&app, json_request("POST", "/api/admin/login", json!({}))?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["error"], "Invalid login data");

    let request = Request::builder()
        .uri(format!("/api/orders/{order_id}"))
        .body(Body::empty())?;
    let (_, body) = send(&app, request).await?;
    assert_eq!(body["data"]["status"], "Pending");
    Ok(())
}
