use axum::body::Body;
use axum::http::{Request, StatusCode};
use library_lending::api::handlers::AppState;
use library_lending::api::router::create_router;
use library_lending::api::types::*;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

mod common;

// ============================================================================
// E2Eテスト用のヘルパー関数
// ============================================================================

/// E2Eテスト用のアプリケーションセットアップ
///
/// インメモリストアと実際のAPIルーターを使用します。
fn setup_e2e_app() -> axum::Router {
    let service_deps = common::memory_dependencies();
    let app_state = Arc::new(AppState { service_deps });

    create_router(app_state)
}

/// リクエストを送信し、ステータスとボディ（JSON）を返す
async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

/// 書籍を登録してIDを返す
async fn create_book(app: &axum::Router, inventory: u32) -> Uuid {
    let (status, body) = send(
        app,
        "POST",
        "/books/",
        Some(json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "inventory": inventory,
            "daily_fee": "1.50",
            "cover": "SOFT",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let book: BookResponse = serde_json::from_value(body).unwrap();
    book.id
}

/// 書籍を借りて貸出IDを返す
async fn borrow(app: &axum::Router, book_id: Uuid, user_id: Uuid) -> Uuid {
    let (status, body) = send(
        app,
        "POST",
        "/borrowings/",
        Some(json!({ "book_id": book_id, "user_id": user_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let borrowing: BorrowingResponse = serde_json::from_value(body).unwrap();
    borrowing.id
}

// ============================================================================
// E2Eテスト: 正常系フロー
// ============================================================================

#[tokio::test]
async fn test_e2e_health_check() {
    let app = setup_e2e_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_e2e_full_borrowing_flow() {
    let app = setup_e2e_app();
    let book_id = create_book(&app, 1).await;
    let user_id = Uuid::new_v4();

    // Step 1: 貸出作成
    let borrowing_id = borrow(&app, book_id, user_id).await;

    let (status, body) = send(&app, "GET", &format!("/books/{}/", book_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let book: BookResponse = serde_json::from_value(body).unwrap();
    assert_eq!(book.inventory, 0);
    assert!(!book.is_available);

    // Step 2: 在庫切れの書籍は借りられない
    let (status, body) = send(
        &app,
        "POST",
        "/borrowings/",
        Some(json!({ "book_id": book_id, "user_id": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_value(body).unwrap();
    assert!(error.error.to_lowercase().contains("unavailable"));

    // Step 3: 貸出詳細取得
    let (status, body) = send(&app, "GET", &format!("/borrowings/{}/", borrowing_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let borrowing: BorrowingResponse = serde_json::from_value(body).unwrap();
    assert_eq!(borrowing.user_id, user_id);
    assert!(borrowing.is_active);
    assert!(!borrowing.is_overdue);
    assert_eq!(
        borrowing.expected_return_date,
        borrowing.borrow_date + chrono::Duration::days(14)
    );

    // Step 4: 返却（期限内なので通常料金のみ: 14日 × 1.50）
    let (status, body) = send(
        &app,
        "POST",
        &format!("/borrowings/{}/return_book/", borrowing_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let returned: BookReturnedResponse = serde_json::from_value(body).unwrap();
    assert!(!returned.borrowing.is_active);
    assert_eq!(returned.payments.len(), 1);
    assert_eq!(returned.payments[0].money_to_pay.to_string(), "21.00");

    // Step 5: 二重返却は400
    let (status, body) = send(
        &app,
        "POST",
        &format!("/borrowings/{}/return_book/", borrowing_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_value(body).unwrap();
    assert!(error.error.to_lowercase().contains("already returned"));

    // 在庫は戻っている
    let (_, body) = send(&app, "GET", &format!("/books/{}/", book_id), None).await;
    let book: BookResponse = serde_json::from_value(body).unwrap();
    assert_eq!(book.inventory, 1);
}

#[tokio::test]
async fn test_e2e_payment_can_be_marked_paid_once() {
    let app = setup_e2e_app();
    let book_id = create_book(&app, 1).await;
    let borrowing_id = borrow(&app, book_id, Uuid::new_v4()).await;
    send(
        &app,
        "POST",
        &format!("/borrowings/{}/return_book/", borrowing_id),
        None,
    )
    .await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/payments/?borrowing_id={}", borrowing_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let payments: Vec<PaymentResponse> = serde_json::from_value(body.clone()).unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(body[0]["type"], "PAYMENT");
    assert_eq!(body[0]["status"], "PENDING");
    let payment_id = payments[0].id;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/payments/{}/", payment_id),
        Some(json!({ "status": "PAID" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "PAID");

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/payments/{}/", payment_id),
        Some(json!({ "status": "PAID" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/payments/{}/", payment_id),
        Some(json!({ "status": "PENDING" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_e2e_borrowing_alias_and_filters() {
    let app = setup_e2e_app();
    let book_id = create_book(&app, 3).await;
    let user_id = Uuid::new_v4();

    let first = borrow(&app, book_id, user_id).await;
    borrow(&app, book_id, user_id).await;
    borrow(&app, book_id, Uuid::new_v4()).await;
    send(
        &app,
        "POST",
        &format!("/borrowing/{}/return_book/", first),
        None,
    )
    .await;

    let (status, body) = send(&app, "GET", &format!("/borrowing/?user_id={}", user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let borrowings: Vec<BorrowingResponse> = serde_json::from_value(body).unwrap();
    assert_eq!(borrowings.len(), 2);

    let (_, body) = send(
        &app,
        "GET",
        &format!("/borrowings/?user_id={}&is_active=true", user_id),
        None,
    )
    .await;
    let active: Vec<BorrowingResponse> = serde_json::from_value(body).unwrap();
    assert_eq!(active.len(), 1);
    assert_ne!(active[0].id, first);

    let (_, body) = send(&app, "GET", "/borrowings/?is_active=0", None).await;
    let returned: Vec<BorrowingResponse> = serde_json::from_value(body).unwrap();
    assert_eq!(returned.len(), 1);
    assert_eq!(returned[0].id, first);

    let (status, _) = send(&app, "GET", "/borrowings/?is_active=maybe", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_e2e_book_update_and_delete() {
    let app = setup_e2e_app();
    let book_id = create_book(&app, 2).await;

    // PUT: 省略した項目は現在値を維持
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/books/{}/", book_id),
        Some(json!({ "title": "Dune Messiah", "author": "Frank Herbert" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let book: BookResponse = serde_json::from_value(body).unwrap();
    assert_eq!(book.title, "Dune Messiah");
    assert_eq!(book.inventory, 2);

    // PATCH: 部分更新
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/books/{}/", book_id),
        Some(json!({ "daily_fee": "2.25" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["daily_fee"], "2.25");
    assert_eq!(body["cover"], "SOFT");

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/books/{}/", book_id),
        Some(json!({ "daily_fee": "0.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/books/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &format!("/books/{}/", book_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/books/{}/", book_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// E2Eテスト: エラーケース
// ============================================================================

#[tokio::test]
async fn test_e2e_create_book_with_defaults() {
    let app = setup_e2e_app();

    let (status, body) = send(
        &app,
        "POST",
        "/books/",
        Some(json!({ "title": "Emma", "author": "Jane Austen" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["inventory"], 1);
    assert_eq!(body["daily_fee"], "1.00");
    assert_eq!(body["cover"], "HARD");
    assert_eq!(body["is_available"], true);
}

#[tokio::test]
async fn test_e2e_create_book_validation_errors() {
    let app = setup_e2e_app();

    let (status, body) = send(
        &app,
        "POST",
        "/books/",
        Some(json!({ "title": "   ", "author": "Nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        "POST",
        "/books/",
        Some(json!({ "title": "Emma", "author": "Jane Austen", "inventory": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/books/",
        Some(json!({ "title": "Emma", "author": "Jane Austen", "cover": "LEATHER" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_e2e_invalid_json_is_bad_request() {
    let app = setup_e2e_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/borrowings/")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert!(!error.error.is_empty());
}

#[tokio::test]
async fn test_e2e_unknown_resources_are_not_found() {
    let app = setup_e2e_app();
    let missing = Uuid::new_v4();

    let (status, _) = send(&app, "GET", &format!("/books/{}/", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", &format!("/borrowings/{}/", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/borrowings/{}/return_book/", missing),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", &format!("/payments/{}/", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/borrowings/",
        Some(json!({ "book_id": missing, "user_id": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // UUIDでないIDは404
    let (status, body) = send(&app, "GET", "/books/not-a-uuid/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}
