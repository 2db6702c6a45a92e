use crate::domain::{BorrowingId, Payment, PaymentId, PaymentStatus};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 支払いリポジトリポート
///
/// 支払いの作成は返却時に`BorrowingRepository::record_return`で行われる。
/// ここでは参照とステータス更新のみを扱う。
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// IDで支払いを取得する
    async fn find_by_id(&self, payment_id: PaymentId) -> Result<Option<Payment>>;

    /// 支払いを新しい順に取得する
    async fn list(&self, borrowing_id: Option<BorrowingId>) -> Result<Vec<Payment>>;

    /// ステータスを`from`から`to`へ更新する
    ///
    /// 現在のステータスが`from`でなかった場合は`false`を返す。
    async fn update_status(
        &self,
        payment_id: PaymentId,
        from: PaymentStatus,
        to: PaymentStatus,
    ) -> Result<bool>;
}
