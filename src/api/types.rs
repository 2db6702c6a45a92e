use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Book, BookChanges, Borrowing, Cover, DailyFee, NewBook, Payment, PaymentStatus, PaymentType,
    ReturnedBorrowing,
};

// ============================================================================
// Books
// ============================================================================

/// 書籍登録リクエスト（POST /books/）
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub inventory: Option<i64>,
    pub daily_fee: Option<Decimal>,
    pub cover: Option<Cover>,
}

impl CreateBookRequest {
    pub fn into_new_book(self) -> NewBook {
        NewBook {
            title: self.title,
            author: self.author,
            inventory: self.inventory,
            daily_fee: self.daily_fee,
            cover: self.cover,
        }
    }
}

/// 書籍更新リクエスト（PUT /books/:id/）
///
/// title, author は必須。その他は省略時に現在値を維持する。
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateBookRequest {
    pub title: String,
    pub author: String,
    pub inventory: Option<i64>,
    pub daily_fee: Option<Decimal>,
    pub cover: Option<Cover>,
}

impl UpdateBookRequest {
    pub fn into_changes(self) -> BookChanges {
        BookChanges {
            title: Some(self.title),
            author: Some(self.author),
            inventory: self.inventory,
            daily_fee: self.daily_fee,
            cover: self.cover,
        }
    }
}

/// 書籍部分更新リクエスト（PATCH /books/:id/）
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PatchBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub inventory: Option<i64>,
    pub daily_fee: Option<Decimal>,
    pub cover: Option<Cover>,
}

impl PatchBookRequest {
    pub fn into_changes(self) -> BookChanges {
        BookChanges {
            title: self.title,
            author: self.author,
            inventory: self.inventory,
            daily_fee: self.daily_fee,
            cover: self.cover,
        }
    }
}

/// 書籍レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub inventory: u32,
    pub daily_fee: DailyFee,
    pub cover: Cover,
    pub is_available: bool,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.book_id.value(),
            is_available: book.is_available(),
            title: book.title,
            author: book.author,
            inventory: book.inventory,
            daily_fee: book.daily_fee,
            cover: book.cover,
        }
    }
}

// ============================================================================
// Borrowings
// ============================================================================

/// 貸出リクエスト（POST /borrowings/）
#[derive(Debug, Serialize, Deserialize)]
pub struct BorrowBookRequest {
    pub book_id: Uuid,
    pub user_id: Uuid,
}

/// 貸出一覧取得のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct ListBorrowingsQuery {
    /// 利用者IDでフィルタリング
    pub user_id: Option<Uuid>,
    /// 貸出中（true）/返却済み（false）でフィルタリング
    pub is_active: Option<String>,
}

/// 貸出レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BorrowingResponse {
    pub id: Uuid,
    pub book_id: Uuid,
    pub user_id: Uuid,
    pub borrow_date: NaiveDate,
    pub expected_return_date: NaiveDate,
    pub actual_return_date: Option<NaiveDate>,
    pub is_active: bool,
    pub is_overdue: bool,
}

impl BorrowingResponse {
    /// `today`時点の延滞判定を含めて変換する
    pub fn new(borrowing: Borrowing, today: NaiveDate) -> Self {
        Self {
            id: borrowing.borrowing_id.value(),
            book_id: borrowing.book_id.value(),
            user_id: borrowing.user_id.value(),
            borrow_date: borrowing.borrow_date,
            expected_return_date: borrowing.expected_return_date,
            actual_return_date: borrowing.actual_return_date,
            is_active: borrowing.is_active(),
            is_overdue: borrowing.is_overdue(today),
        }
    }
}

/// 返却レスポンス（POST /borrowings/:id/return_book/）
#[derive(Debug, Serialize, Deserialize)]
pub struct BookReturnedResponse {
    pub borrowing: BorrowingResponse,
    pub payments: Vec<PaymentResponse>,
}

impl BookReturnedResponse {
    pub fn new(returned: ReturnedBorrowing, today: NaiveDate) -> Self {
        Self {
            borrowing: BorrowingResponse::new(returned.borrowing, today),
            payments: returned
                .payments
                .into_iter()
                .map(PaymentResponse::from)
                .collect(),
        }
    }
}

// ============================================================================
// Payments
// ============================================================================

/// 支払い一覧取得のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct ListPaymentsQuery {
    pub borrowing_id: Option<Uuid>,
}

/// 支払い更新リクエスト（PATCH /payments/:id/）
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatePaymentRequest {
    pub status: PaymentStatus,
}

/// 支払いレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub borrowing_id: Uuid,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub status: PaymentStatus,
    pub money_to_pay: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.payment_id.value(),
            borrowing_id: payment.borrowing_id.value(),
            payment_type: payment.payment_type,
            status: payment.status,
            money_to_pay: payment.money_to_pay,
            created_at: payment.created_at,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// 真偽値クエリパラメータのパースとバリデーション
///
/// `true`/`false`/`1`/`0`（大文字小文字は問わない）を受け付ける。
pub fn parse_bool_filter(name: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(format!("{} must be a boolean (true or false): {}", name, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_filter_accepts_common_spellings() {
        assert_eq!(parse_bool_filter("is_active", "true"), Ok(true));
        assert_eq!(parse_bool_filter("is_active", "True"), Ok(true));
        assert_eq!(parse_bool_filter("is_active", "1"), Ok(true));
        assert_eq!(parse_bool_filter("is_active", "FALSE"), Ok(false));
        assert_eq!(parse_bool_filter("is_active", "0"), Ok(false));
    }

    #[test]
    fn test_parse_bool_filter_rejects_other_values() {
        let err = parse_bool_filter("is_active", "maybe").unwrap_err();
        assert!(err.contains("is_active"));
    }

    #[test]
    fn test_payment_response_uses_type_key() {
        let response = PaymentResponse {
            id: Uuid::new_v4(),
            borrowing_id: Uuid::new_v4(),
            payment_type: PaymentType::Fine,
            status: PaymentStatus::Pending,
            money_to_pay: Decimal::new(900, 2),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "FINE");
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["money_to_pay"], "9.00");
    }
}
