use crate::application::{LibraryApplicationError, Result, ServiceDependencies};
use crate::domain::{self, Book, BookChanges, BookId, NewBook};

/// 書籍を登録する
///
/// 既定値の適用と不変条件の検証はドメイン層の`create_book`が行う。
pub async fn create_book(deps: &ServiceDependencies, input: NewBook) -> Result<Book> {
    let book = domain::book::create_book(input)
        .map_err(|e| LibraryApplicationError::Validation(e.to_string()))?;

    deps.book_repository
        .insert(&book)
        .await
        .map_err(LibraryApplicationError::BookRepositoryError)?;

    tracing::info!(book_id = %book.book_id.value(), title = %book.title, "Book created");

    Ok(book)
}

/// 書籍一覧を取得する
pub async fn list_books(deps: &ServiceDependencies) -> Result<Vec<Book>> {
    deps.book_repository
        .list()
        .await
        .map_err(LibraryApplicationError::BookRepositoryError)
}

/// IDで書籍を取得する
pub async fn get_book(deps: &ServiceDependencies, book_id: BookId) -> Result<Book> {
    deps.book_repository
        .find_by_id(book_id)
        .await
        .map_err(LibraryApplicationError::BookRepositoryError)?
        .ok_or(LibraryApplicationError::BookNotFound)
}

/// 書籍を更新する
///
/// PUTでもPATCHでも、省略されたフィールドは現在値を維持する。
/// PUTで必須となるフィールドの確認はAPI層で行う。
///
/// 差分のみを保存するため、同時に行われた貸出・返却による在庫の増減は
/// inventoryを指定しない更新で上書きされない。
pub async fn update_book(
    deps: &ServiceDependencies,
    book_id: BookId,
    changes: BookChanges,
) -> Result<Book> {
    // 1. 入力の検証
    let patch = domain::book::validate_changes(changes)
        .map_err(|e| LibraryApplicationError::Validation(e.to_string()))?;

    // 2. 保存時点の行に差分を適用
    let updated = deps
        .book_repository
        .update(book_id, &patch)
        .await
        .map_err(LibraryApplicationError::BookRepositoryError)?
        .ok_or(LibraryApplicationError::BookNotFound)?;

    tracing::info!(
        book_id = %book_id.value(),
        inventory_changed = patch.inventory.is_some(),
        "Book updated"
    );

    Ok(updated)
}

/// 書籍を削除する
pub async fn delete_book(deps: &ServiceDependencies, book_id: BookId) -> Result<()> {
    let deleted = deps
        .book_repository
        .delete(book_id)
        .await
        .map_err(LibraryApplicationError::BookRepositoryError)?;

    if !deleted {
        return Err(LibraryApplicationError::BookNotFound);
    }

    tracing::info!(book_id = %book_id.value(), "Book deleted");

    Ok(())
}
