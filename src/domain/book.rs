use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BookId, BookValidationError, Cover, DailyFee};

/// タイトル・著者名の最大文字数
pub const MAX_TEXT_LENGTH: usize = 255;

/// 在庫数の既定値
pub const DEFAULT_INVENTORY: u32 = 1;

/// Book集約 - カタログの1タイトル
///
/// 不変条件：inventory >= 0（u32で保証）、daily_fee >= 0.01（DailyFeeで保証）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub inventory: u32,
    pub daily_fee: DailyFee,
    pub cover: Cover,
}

impl Book {
    /// 貸出可能か（在庫が1冊以上あるか）
    pub fn is_available(&self) -> bool {
        self.inventory > 0
    }
}

/// 書籍登録の入力
///
/// 省略されたフィールドには既定値（在庫1、日額1.00、HARD）が適用される。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub inventory: Option<i64>,
    pub daily_fee: Option<Decimal>,
    pub cover: Option<Cover>,
}

/// 書籍更新の入力（Noneは現在値を維持）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub inventory: Option<i64>,
    pub daily_fee: Option<Decimal>,
    pub cover: Option<Cover>,
}

fn validate_text(field: &'static str, value: &str) -> Result<String, BookValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BookValidationError::Blank(field));
    }
    if trimmed.chars().count() > MAX_TEXT_LENGTH {
        return Err(BookValidationError::TooLong(field));
    }
    Ok(trimmed.to_string())
}

fn validate_inventory(value: i64) -> Result<u32, BookValidationError> {
    u32::try_from(value).map_err(|_| BookValidationError::InvalidInventory)
}

fn validate_daily_fee(value: Decimal) -> Result<DailyFee, BookValidationError> {
    DailyFee::try_from(value).map_err(BookValidationError::InvalidDailyFee)
}

/// 純粋関数：書籍を登録する
///
/// 副作用なし。検証済みの新しいBookを返す。
pub fn create_book(input: NewBook) -> Result<Book, BookValidationError> {
    let title = validate_text("title", &input.title)?;
    let author = validate_text("author", &input.author)?;
    let inventory = input
        .inventory
        .map(validate_inventory)
        .transpose()?
        .unwrap_or(DEFAULT_INVENTORY);
    let daily_fee = input
        .daily_fee
        .map(validate_daily_fee)
        .transpose()?
        .unwrap_or_default();

    Ok(Book {
        book_id: BookId::new(),
        title,
        author,
        inventory,
        daily_fee,
        cover: input.cover.unwrap_or_default(),
    })
}

/// 検証済みの更新内容（Noneは現在値を維持）
///
/// リポジトリは保存時点の行に対して適用する。更新対象でないinventoryを
/// 読み取り時点の値で上書きしないため、Book全体ではなく差分を渡す。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub inventory: Option<u32>,
    pub daily_fee: Option<DailyFee>,
    pub cover: Option<Cover>,
}

impl BookPatch {
    /// 書籍に差分を適用する。IDは変わらない。
    pub fn apply(&self, book: &Book) -> Book {
        Book {
            book_id: book.book_id,
            title: self.title.clone().unwrap_or_else(|| book.title.clone()),
            author: self.author.clone().unwrap_or_else(|| book.author.clone()),
            inventory: self.inventory.unwrap_or(book.inventory),
            daily_fee: self.daily_fee.unwrap_or(book.daily_fee),
            cover: self.cover.unwrap_or(book.cover),
        }
    }
}

/// 純粋関数：更新内容を検証する
///
/// 指定されたフィールドのみを検証し、適用可能な差分を返す。
pub fn validate_changes(changes: BookChanges) -> Result<BookPatch, BookValidationError> {
    Ok(BookPatch {
        title: changes
            .title
            .map(|title| validate_text("title", &title))
            .transpose()?,
        author: changes
            .author
            .map(|author| validate_text("author", &author))
            .transpose()?,
        inventory: changes.inventory.map(validate_inventory).transpose()?,
        daily_fee: changes.daily_fee.map(validate_daily_fee).transpose()?,
        cover: changes.cover,
    })
}

/// 純粋関数：書籍を更新する
///
/// 指定されたフィールドのみを検証して差し替える。IDは変わらない。
pub fn update_book(book: &Book, changes: BookChanges) -> Result<Book, BookValidationError> {
    validate_changes(changes).map(|patch| patch.apply(book))
}
