use crate::domain::{Book, BookId, BookPatch};
use crate::ports::book_repository::{BookRepository as BookRepositoryTrait, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::PgPool;

use super::rows::{BOOK_COLUMNS, inventory_to_db, map_row_to_book};

/// BookRepositoryのPostgreSQL実装
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    /// PostgreSQLコネクションプールから新しいBookRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn insert(&self, book: &Book) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO books (book_id, title, author, inventory, daily_fee, cover)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(book.book_id.value())
        .bind(&book.title)
        .bind(&book.author)
        .bind(inventory_to_db(book.inventory)?)
        .bind(book.daily_fee.value())
        .bind(book.cover.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, book_id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM books WHERE book_id = $1",
            BOOK_COLUMNS
        ))
        .bind(book_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_book).transpose()
    }

    /// タイトル順（同名はID順）で全書籍を取得
    async fn list(&self) -> Result<Vec<Book>> {
        let sql = format!(
            "SELECT {} FROM books ORDER BY title ASC, book_id ASC",
            BOOK_COLUMNS
        );
        let mut rows = sqlx::query(&sql).fetch(&self.pool);

        let mut books = Vec::new();
        while let Some(row) = rows.try_next().await? {
            books.push(map_row_to_book(&row)?);
        }

        Ok(books)
    }

    /// 指定されたカラムのみ更新（NULLのパラメータは現在値を維持）
    async fn update(&self, book_id: BookId, patch: &BookPatch) -> Result<Option<Book>> {
        let inventory = patch.inventory.map(inventory_to_db).transpose()?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE books
            SET title = COALESCE($2, title),
                author = COALESCE($3, author),
                inventory = COALESCE($4, inventory),
                daily_fee = COALESCE($5, daily_fee),
                cover = COALESCE($6, cover),
                updated_at = NOW()
            WHERE book_id = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(book_id.value())
        .bind(patch.title.as_deref())
        .bind(patch.author.as_deref())
        .bind(inventory)
        .bind(patch.daily_fee.map(|fee| fee.value()))
        .bind(patch.cover.map(|cover| cover.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_book).transpose()
    }

    /// 書籍を削除（貸出と支払いは外部キーのCASCADEで削除される）
    async fn delete(&self, book_id: BookId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE book_id = $1")
            .bind(book_id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}
