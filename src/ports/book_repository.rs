use crate::domain::{Book, BookId, BookPatch};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 書籍リポジトリポート
///
/// カタログの永続化を抽象化する。
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// 新しい書籍を保存する
    async fn insert(&self, book: &Book) -> Result<()>;

    /// IDで書籍を取得する
    async fn find_by_id(&self, book_id: BookId) -> Result<Option<Book>>;

    /// 全書籍をタイトル順に取得する
    async fn list(&self) -> Result<Vec<Book>>;

    /// 保存されている最新の行に差分を適用する
    ///
    /// `patch`で指定されたフィールドだけを書き換え、それ以外（特に貸出・返却で
    /// 変わるinventory）は保存時点の値を維持する。更新後の書籍を返し、
    /// 存在しない場合は`None`を返す。
    async fn update(&self, book_id: BookId, patch: &BookPatch) -> Result<Option<Book>>;

    /// 書籍を削除する
    ///
    /// 関連する貸出記録と支払いも削除される。存在しない場合は`false`を返す。
    async fn delete(&self, book_id: BookId) -> Result<bool>;
}
