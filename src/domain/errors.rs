use super::DailyFeeError;

/// 書籍の検証エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    /// 空文字（フィールド名）
    Blank(&'static str),
    /// 最大文字数を超えた（フィールド名）
    TooLong(&'static str),
    /// 在庫数が負、または範囲外
    InvalidInventory,
    /// 日額料金が不正
    InvalidDailyFee(DailyFeeError),
}

impl std::fmt::Display for BookValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookValidationError::Blank(field) => write!(f, "{} may not be blank", field),
            BookValidationError::TooLong(field) => write!(
                f,
                "{} must be at most {} characters",
                field,
                super::book::MAX_TEXT_LENGTH
            ),
            BookValidationError::InvalidInventory => {
                write!(f, "inventory must be a non-negative integer")
            }
            BookValidationError::InvalidDailyFee(e) => write!(f, "{}", e),
        }
    }
}

/// 貸出のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BorrowBookError {
    /// 在庫がない
    Unavailable,
}

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnBookError {
    /// 既に返却済み
    AlreadyReturned,
    /// 貸出記録と書籍が対応していない
    BookMismatch,
}

/// 支払い処理のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkPaidError {
    /// 既に支払い済み
    AlreadyPaid,
}
