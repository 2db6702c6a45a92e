use thiserror::Error;

/// 貸出管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum LibraryApplicationError {
    /// 入力値が不正
    #[error("{0}")]
    Validation(String),

    /// 書籍が見つからない
    #[error("Book not found")]
    BookNotFound,

    /// 貸出が見つからない
    #[error("Borrowing not found")]
    BorrowingNotFound,

    /// 支払いが見つからない
    #[error("Payment not found")]
    PaymentNotFound,

    /// 在庫がなく貸出不可
    #[error("Book is unavailable for borrowing")]
    BookUnavailable,

    /// 既に返却済み
    #[error("Book already returned")]
    AlreadyReturned,

    /// 既に支払い済み
    #[error("Payment already paid")]
    AlreadyPaid,

    /// ドメイン層の整合性エラー
    #[error("Domain error: {0}")]
    DomainError(String),

    /// BookRepositoryのエラー
    #[error("Book repository error")]
    BookRepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// BorrowingRepositoryのエラー
    #[error("Borrowing repository error")]
    BorrowingRepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// PaymentRepositoryのエラー
    #[error("Payment repository error")]
    PaymentRepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LibraryApplicationError>;
