use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{
    Book, BookId, BorrowBookError, BorrowingId, Payment, PaymentType, ReturnBookError, UserId,
    payment,
};

/// 貸出期間（日数）
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Borrowing集約 - 1冊の書籍の1回の貸出
///
/// ビジネスルール：
/// - borrow_date, expected_return_date は作成時に確定し変更されない
/// - actual_return_date は一度設定されたら変更されない
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borrowing {
    // 識別子
    pub borrowing_id: BorrowingId,

    // 他の集約への参照（IDのみ）
    pub book_id: BookId,
    pub user_id: UserId,

    // 貸出管理の責務
    pub borrow_date: NaiveDate,
    pub expected_return_date: NaiveDate,
    pub actual_return_date: Option<NaiveDate>,
}

impl Borrowing {
    /// 貸出中か（未返却か）
    pub fn is_active(&self) -> bool {
        self.actual_return_date.is_none()
    }

    /// 延滞判定
    ///
    /// 返却済みなら返却日、未返却なら`today`を返却予定日と比較する。
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.actual_return_date {
            Some(returned) => returned > self.expected_return_date,
            None => today > self.expected_return_date,
        }
    }
}

/// 純粋関数：書籍を貸し出す
///
/// ビジネスルール：
/// - 在庫が1冊以上あること
/// - 貸出期間は14日間
/// - 在庫を1減らす
///
/// 副作用なし。新しいBorrowingと在庫を減らしたBookを返す。
pub fn borrow_book(
    book: &Book,
    user_id: UserId,
    today: NaiveDate,
) -> Result<(Borrowing, Book), BorrowBookError> {
    if !book.is_available() {
        return Err(BorrowBookError::Unavailable);
    }

    let borrowing = Borrowing {
        borrowing_id: BorrowingId::new(),
        book_id: book.book_id,
        user_id,
        borrow_date: today,
        expected_return_date: today + Duration::days(LOAN_PERIOD_DAYS),
        actual_return_date: None,
    };

    let book = Book {
        inventory: book.inventory - 1,
        ..book.clone()
    };

    Ok((borrowing, book))
}

/// 返却の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnedBorrowing {
    pub borrowing: Borrowing,
    pub book: Book,
    /// 通常料金（必ず1件）と、延滞時のみ延滞金
    pub payments: Vec<Payment>,
}

/// 純粋関数：書籍を返却する
///
/// ビジネスルール：
/// - 返却済みの貸出は返却不可
/// - 返却日は`today`
/// - 在庫を1増やす
/// - 通常料金を1件作成し、返却予定日を過ぎていれば延滞金も作成する
///
/// 料金はここで一度だけ計算され、Paymentに確定値として保持される。
pub fn return_book(
    borrowing: &Borrowing,
    book: &Book,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<ReturnedBorrowing, ReturnBookError> {
    if !borrowing.is_active() {
        return Err(ReturnBookError::AlreadyReturned);
    }
    if borrowing.book_id != book.book_id {
        return Err(ReturnBookError::BookMismatch);
    }

    let returned = Borrowing {
        actual_return_date: Some(today),
        ..borrowing.clone()
    };

    let book = Book {
        inventory: book.inventory.saturating_add(1),
        ..book.clone()
    };

    let mut payments = vec![payment::issue_payment(
        &returned,
        &book,
        PaymentType::Payment,
        today,
        now,
    )];

    if returned.is_overdue(today) {
        payments.push(payment::issue_payment(
            &returned,
            &book,
            PaymentType::Fine,
            today,
            now,
        ));
    }

    Ok(ReturnedBorrowing {
        borrowing: returned,
        book,
        payments,
    })
}
