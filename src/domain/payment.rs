use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Book, Borrowing, BorrowingId, MarkPaidError, PaymentId};

/// 延滞金の倍率（日額料金に対して）
pub const FINE_MULTIPLIER: i64 = 2;

/// 支払い種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentType {
    /// 通常料金
    Payment,
    /// 延滞金
    Fine,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Payment => "PAYMENT",
            PaymentType::Fine => "FINE",
        }
    }
}

impl std::str::FromStr for PaymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PAYMENT" => Ok(PaymentType::Payment),
            "FINE" => Ok(PaymentType::Fine),
            _ => Err(format!("Invalid payment type: {}", s)),
        }
    }
}

/// 支払いステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    /// 未払い
    Pending,
    /// 支払い済み
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(PaymentStatus::Pending),
            "PAID" => Ok(PaymentStatus::Paid),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

/// Payment - 返却時に確定する請求
///
/// money_to_pay は作成時に一度だけ計算され、以後再計算しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: PaymentId,
    pub borrowing_id: BorrowingId,
    pub payment_type: PaymentType,
    pub status: PaymentStatus,
    pub money_to_pay: Decimal,
    pub created_at: DateTime<Utc>,
}

/// 純粋関数：請求額を計算する
///
/// - PAYMENT: max(1, 返却予定日 - 貸出日) × 日額
/// - FINE: (返却日または`today` - 返却予定日) × 日額 × 2。延滞日数が0以下なら0
pub fn calculate_money_to_pay(
    payment_type: PaymentType,
    borrowing: &Borrowing,
    book: &Book,
    today: NaiveDate,
) -> Decimal {
    let daily_fee = book.daily_fee.value();

    let amount = match payment_type {
        PaymentType::Payment => {
            let days = (borrowing.expected_return_date - borrowing.borrow_date)
                .num_days()
                .max(1);
            Decimal::from(days) * daily_fee
        }
        PaymentType::Fine => {
            let returned = borrowing.actual_return_date.unwrap_or(today);
            let overdue_days = (returned - borrowing.expected_return_date).num_days();
            if overdue_days <= 0 {
                Decimal::ZERO
            } else {
                Decimal::from(overdue_days) * daily_fee * Decimal::from(FINE_MULTIPLIER)
            }
        }
    };

    let mut amount = amount.round_dp(2);
    amount.rescale(2);
    amount
}

/// 純粋関数：請求を発行する
///
/// 請求額を確定させたPENDING状態のPaymentを返す。
pub fn issue_payment(
    borrowing: &Borrowing,
    book: &Book,
    payment_type: PaymentType,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Payment {
    Payment {
        payment_id: PaymentId::new(),
        borrowing_id: borrowing.borrowing_id,
        payment_type,
        status: PaymentStatus::Pending,
        money_to_pay: calculate_money_to_pay(payment_type, borrowing, book, today),
        created_at: now,
    }
}

/// 純粋関数：支払い済みにする
///
/// PENDING → PAID の一方向のみ。
pub fn mark_paid(payment: &Payment) -> Result<Payment, MarkPaidError> {
    match payment.status {
        PaymentStatus::Paid => Err(MarkPaidError::AlreadyPaid),
        PaymentStatus::Pending => Ok(Payment {
            status: PaymentStatus::Paid,
            ..payment.clone()
        }),
    }
}
