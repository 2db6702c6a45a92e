use crate::domain::{
    Book, BookId, Borrowing, BorrowingId, Cover, DailyFee, Payment, PaymentId, PaymentStatus,
    PaymentType, UserId,
};
use crate::ports::book_repository::Result;
use rust_decimal::Decimal;
use sqlx::{Row, postgres::PgRow};
use std::str::FromStr;

pub(super) const BOOK_COLUMNS: &str = "book_id, title, author, inventory, daily_fee, cover";

pub(super) const BORROWING_COLUMNS: &str =
    "borrowing_id, book_id, user_id, borrow_date, expected_return_date, actual_return_date";

pub(super) const PAYMENT_COLUMNS: &str =
    "payment_id, borrowing_id, payment_type, status, money_to_pay, created_at";

fn invalid_data(message: String) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message))
}

/// PostgreSQLの行データをBookに変換する
///
/// inventoryのi32からu32への変換、daily_feeとcoverの検証で
/// エラーハンドリングを行う。
pub(super) fn map_row_to_book(row: &PgRow) -> Result<Book> {
    let inventory_i32: i32 = row.get("inventory");
    let inventory: u32 = inventory_i32
        .try_into()
        .map_err(|_| invalid_data(format!("inventory out of range: {}", inventory_i32)))?;

    let daily_fee_raw: Decimal = row.get("daily_fee");
    let daily_fee = DailyFee::try_from(daily_fee_raw)
        .map_err(|e| invalid_data(format!("invalid daily_fee {}: {:?}", daily_fee_raw, e)))?;

    let cover_str: &str = row.get("cover");
    let cover = Cover::from_str(cover_str).map_err(invalid_data)?;

    Ok(Book {
        book_id: BookId::from_uuid(row.get("book_id")),
        title: row.get("title"),
        author: row.get("author"),
        inventory,
        daily_fee,
        cover,
    })
}

pub(super) fn map_row_to_borrowing(row: &PgRow) -> Result<Borrowing> {
    Ok(Borrowing {
        borrowing_id: BorrowingId::from_uuid(row.get("borrowing_id")),
        book_id: BookId::from_uuid(row.get("book_id")),
        user_id: UserId::from_uuid(row.get("user_id")),
        borrow_date: row.get("borrow_date"),
        expected_return_date: row.get("expected_return_date"),
        actual_return_date: row.get("actual_return_date"),
    })
}

pub(super) fn map_row_to_payment(row: &PgRow) -> Result<Payment> {
    let type_str: &str = row.get("payment_type");
    let payment_type = PaymentType::from_str(type_str).map_err(invalid_data)?;

    let status_str: &str = row.get("status");
    let status = PaymentStatus::from_str(status_str).map_err(invalid_data)?;

    Ok(Payment {
        payment_id: PaymentId::from_uuid(row.get("payment_id")),
        borrowing_id: BorrowingId::from_uuid(row.get("borrowing_id")),
        payment_type,
        status,
        money_to_pay: row.get("money_to_pay"),
        created_at: row.get("created_at"),
    })
}

pub(super) fn inventory_to_db(inventory: u32) -> Result<i32> {
    i32::try_from(inventory).map_err(|_| invalid_data(format!("inventory too large: {}", inventory)))
}
