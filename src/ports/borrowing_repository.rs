use crate::domain::{Book, Borrowing, BorrowingId, ReturnedBorrowing, UserId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出一覧の絞り込み条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BorrowingFilter {
    pub user_id: Option<UserId>,
    pub is_active: Option<bool>,
}

impl BorrowingFilter {
    /// 条件に一致するか
    pub fn matches(&self, borrowing: &Borrowing) -> bool {
        self.user_id.is_none_or(|user_id| borrowing.user_id == user_id)
            && self
                .is_active
                .is_none_or(|active| borrowing.is_active() == active)
    }
}

/// 貸出リポジトリポート
///
/// 貸出と返却は書籍の在庫・支払いと同時に更新する必要があるため、
/// 複数テーブルにまたがる操作を1つのメソッドで原子的に行う。
#[async_trait]
pub trait BorrowingRepository: Send + Sync {
    /// 在庫を1冊確保して貸出を保存する
    ///
    /// 在庫の減算は `inventory > 0` を条件に行い、貸出の保存と同じ
    /// トランザクションで確定する。確保できた場合は減算後の書籍を返し、
    /// 在庫がない（または書籍が消えた）場合は`None`を返して何も保存しない。
    async fn record_borrowing(&self, borrowing: &Borrowing) -> Result<Option<Book>>;

    /// 返却を保存する
    ///
    /// 未返却であることを条件に返却日を設定し、在庫を1冊戻し、
    /// 支払いを保存する。既に返却済みだった場合は`false`を返して何も変更しない。
    async fn record_return(&self, returned: &ReturnedBorrowing) -> Result<bool>;

    /// IDで貸出を取得する
    async fn find_by_id(&self, borrowing_id: BorrowingId) -> Result<Option<Borrowing>>;

    /// 貸出を新しい順に取得する
    async fn list(&self, filter: BorrowingFilter) -> Result<Vec<Borrowing>>;
}
