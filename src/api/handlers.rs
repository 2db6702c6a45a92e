use crate::application::{ServiceDependencies, catalog, lending};
use crate::domain::{
    BookId, BorrowingId, PaymentId, PaymentStatus, UserId,
    commands::{BorrowBook, MarkPaymentPaid, ReturnBook},
};
use crate::ports::BorrowingFilter;
use axum::{Json, extract::State, http::StatusCode};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    extractor::{JsonBody, PathId, QueryParams},
    types::{
        BookResponse, BookReturnedResponse, BorrowBookRequest, BorrowingResponse,
        CreateBookRequest, ListBorrowingsQuery, ListPaymentsQuery, PatchBookRequest,
        PaymentResponse, UpdateBookRequest, UpdatePaymentRequest, parse_bool_filter,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// ============================================================================
// Books
// ============================================================================

/// GET /books/ - 書籍一覧
pub async fn list_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = catalog::list_books(&state.service_deps).await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// POST /books/ - 書籍を登録
///
/// 省略された在庫・日額・装丁には既定値（1, 1.00, HARD）が入る。
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateBookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let book = catalog::create_book(&state.service_deps, req.into_new_book()).await?;
    Ok((StatusCode::CREATED, Json(BookResponse::from(book))))
}

/// GET /books/:id/ - 書籍詳細
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    PathId(book_id): PathId<Uuid>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = catalog::get_book(&state.service_deps, BookId::from_uuid(book_id)).await?;
    Ok(Json(BookResponse::from(book)))
}

/// PUT /books/:id/ - 書籍を更新
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    PathId(book_id): PathId<Uuid>,
    JsonBody(req): JsonBody<UpdateBookRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = catalog::update_book(
        &state.service_deps,
        BookId::from_uuid(book_id),
        req.into_changes(),
    )
    .await?;
    Ok(Json(BookResponse::from(book)))
}

/// PATCH /books/:id/ - 書籍を部分更新
pub async fn patch_book(
    State(state): State<Arc<AppState>>,
    PathId(book_id): PathId<Uuid>,
    JsonBody(req): JsonBody<PatchBookRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = catalog::update_book(
        &state.service_deps,
        BookId::from_uuid(book_id),
        req.into_changes(),
    )
    .await?;
    Ok(Json(BookResponse::from(book)))
}

/// DELETE /books/:id/ - 書籍を削除
///
/// 関連する貸出と支払いも削除される。
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    PathId(book_id): PathId<Uuid>,
) -> Result<StatusCode, ApiError> {
    catalog::delete_book(&state.service_deps, BookId::from_uuid(book_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Borrowings
// ============================================================================

/// GET /borrowings/ - オプションフィルタ付き貸出一覧取得
///
/// クエリパラメータ:
/// - user_id: 利用者IDでフィルタリング（オプション）
/// - is_active: true なら貸出中のみ、false なら返却済みのみ（オプション）
pub async fn list_borrowings(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<ListBorrowingsQuery>,
) -> Result<Json<Vec<BorrowingResponse>>, ApiError> {
    let is_active = query
        .is_active
        .as_deref()
        .map(|value| parse_bool_filter("is_active", value))
        .transpose()
        .map_err(ApiError::BadRequest)?;

    let filter = BorrowingFilter {
        user_id: query.user_id.map(UserId::from_uuid),
        is_active,
    };

    let today = today();
    let borrowings = lending::list_borrowings(&state.service_deps, filter).await?;

    Ok(Json(
        borrowings
            .into_iter()
            .map(|b| BorrowingResponse::new(b, today))
            .collect(),
    ))
}

/// POST /borrowings/ - 書籍を貸し出す
///
/// 強制されるビジネスルール:
/// - 書籍が存在すること（404）
/// - 在庫が1冊以上あること（400 unavailable）
pub async fn create_borrowing(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<BorrowBookRequest>,
) -> Result<(StatusCode, Json<BorrowingResponse>), ApiError> {
    let today = today();
    let cmd = BorrowBook {
        book_id: BookId::from_uuid(req.book_id),
        user_id: UserId::from_uuid(req.user_id),
        today,
    };

    let borrowing = lending::borrow_book(&state.service_deps, cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowingResponse::new(borrowing, today)),
    ))
}

/// GET /borrowings/:id/ - 貸出詳細
pub async fn get_borrowing(
    State(state): State<Arc<AppState>>,
    PathId(borrowing_id): PathId<Uuid>,
) -> Result<Json<BorrowingResponse>, ApiError> {
    let borrowing =
        lending::get_borrowing(&state.service_deps, BorrowingId::from_uuid(borrowing_id)).await?;
    Ok(Json(BorrowingResponse::new(borrowing, today())))
}

/// POST /borrowings/:id/return_book/ - 書籍を返却
///
/// 返却済みの貸出は400（already returned）。
/// 返却時に作成された支払い（通常料金と、延滞時は延滞金）を返す。
pub async fn return_borrowing(
    State(state): State<Arc<AppState>>,
    PathId(borrowing_id): PathId<Uuid>,
) -> Result<Json<BookReturnedResponse>, ApiError> {
    let now = Utc::now();
    let today = now.date_naive();
    let cmd = ReturnBook {
        borrowing_id: BorrowingId::from_uuid(borrowing_id),
        today,
        returned_at: now,
    };

    let returned = lending::return_book(&state.service_deps, cmd).await?;

    Ok(Json(BookReturnedResponse::new(returned, today)))
}

// ============================================================================
// Payments
// ============================================================================

/// GET /payments/ - 支払い一覧（borrowing_idで絞り込み可能）
pub async fn list_payments(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<ListPaymentsQuery>,
) -> Result<Json<Vec<PaymentResponse>>, ApiError> {
    let payments = lending::list_payments(
        &state.service_deps,
        query.borrowing_id.map(BorrowingId::from_uuid),
    )
    .await?;
    Ok(Json(payments.into_iter().map(PaymentResponse::from).collect()))
}

/// GET /payments/:id/ - 支払い詳細
pub async fn get_payment(
    State(state): State<Arc<AppState>>,
    PathId(payment_id): PathId<Uuid>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let payment =
        lending::get_payment(&state.service_deps, PaymentId::from_uuid(payment_id)).await?;
    Ok(Json(PaymentResponse::from(payment)))
}

/// PATCH /payments/:id/ - 支払いを完了にする
///
/// 受け付けるのは `{"status": "PAID"}` のみ。請求額は変更できない。
pub async fn update_payment(
    State(state): State<Arc<AppState>>,
    PathId(payment_id): PathId<Uuid>,
    JsonBody(req): JsonBody<UpdatePaymentRequest>,
) -> Result<Json<PaymentResponse>, ApiError> {
    if req.status != PaymentStatus::Paid {
        return Err(ApiError::BadRequest(
            "status can only be changed to PAID".to_string(),
        ));
    }

    let cmd = MarkPaymentPaid {
        payment_id: PaymentId::from_uuid(payment_id),
    };
    let payment = lending::mark_payment_paid(&state.service_deps, cmd).await?;

    Ok(Json(PaymentResponse::from(payment)))
}
