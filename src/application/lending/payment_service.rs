use crate::application::{LibraryApplicationError, Result, ServiceDependencies};
use crate::domain::{
    self, BorrowingId, MarkPaidError, Payment, PaymentId, PaymentStatus, commands::MarkPaymentPaid,
};

/// IDで支払いを取得する
pub async fn get_payment(deps: &ServiceDependencies, payment_id: PaymentId) -> Result<Payment> {
    deps.payment_repository
        .find_by_id(payment_id)
        .await
        .map_err(LibraryApplicationError::PaymentRepositoryError)?
        .ok_or(LibraryApplicationError::PaymentNotFound)
}

/// 支払い一覧を取得する（貸出IDで絞り込み可能）
pub async fn list_payments(
    deps: &ServiceDependencies,
    borrowing_id: Option<BorrowingId>,
) -> Result<Vec<Payment>> {
    deps.payment_repository
        .list(borrowing_id)
        .await
        .map_err(LibraryApplicationError::PaymentRepositoryError)
}

/// 支払いを完了にする
///
/// ビジネスルール：
/// - PENDING → PAID のみ
/// - 請求額は変更しない
pub async fn mark_payment_paid(deps: &ServiceDependencies, cmd: MarkPaymentPaid) -> Result<Payment> {
    let payment = get_payment(deps, cmd.payment_id).await?;

    let paid = domain::payment::mark_paid(&payment).map_err(|e| match e {
        MarkPaidError::AlreadyPaid => LibraryApplicationError::AlreadyPaid,
    })?;

    let updated = deps
        .payment_repository
        .update_status(cmd.payment_id, PaymentStatus::Pending, PaymentStatus::Paid)
        .await
        .map_err(LibraryApplicationError::PaymentRepositoryError)?;

    if !updated {
        return Err(LibraryApplicationError::AlreadyPaid);
    }

    tracing::info!(
        payment_id = %cmd.payment_id.value(),
        amount = %paid.money_to_pay,
        "Payment marked as paid"
    );

    Ok(paid)
}
