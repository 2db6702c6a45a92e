use crate::domain::{Book, Borrowing, BorrowingId, ReturnedBorrowing};
use crate::ports::borrowing_repository::{
    BorrowingFilter, BorrowingRepository as BorrowingRepositoryTrait, Result,
};
use async_trait::async_trait;
use sqlx::PgPool;

use super::rows::{BOOK_COLUMNS, BORROWING_COLUMNS, map_row_to_book, map_row_to_borrowing};

/// BorrowingRepositoryのPostgreSQL実装
///
/// 貸出・返却は書籍の在庫と支払いを同じトランザクションで更新する。
/// 在庫の減算と返却日の設定はいずれも条件付きUPDATEで行い、
/// 同時リクエストによる在庫の過剰貸出や二重返却を防ぐ。
pub struct BorrowingRepository {
    pool: PgPool,
}

impl BorrowingRepository {
    /// PostgreSQLコネクションプールから新しいBorrowingRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BorrowingRepositoryTrait for BorrowingRepository {
    async fn record_borrowing(&self, borrowing: &Borrowing) -> Result<Option<Book>> {
        let mut tx = self.pool.begin().await?;

        // 在庫が残っている場合のみ1冊減らす
        let row = sqlx::query(&format!(
            r#"
            UPDATE books
            SET inventory = inventory - 1, updated_at = NOW()
            WHERE book_id = $1 AND inventory > 0
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(borrowing.book_id.value())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            // 何も変更していないのでロールバック
            tx.rollback().await?;
            return Ok(None);
        };
        let book = map_row_to_book(&row)?;

        sqlx::query(
            r#"
            INSERT INTO borrowings (
                borrowing_id,
                book_id,
                user_id,
                borrow_date,
                expected_return_date,
                actual_return_date
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(borrowing.borrowing_id.value())
        .bind(borrowing.book_id.value())
        .bind(borrowing.user_id.value())
        .bind(borrowing.borrow_date)
        .bind(borrowing.expected_return_date)
        .bind(borrowing.actual_return_date)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(book))
    }

    async fn record_return(&self, returned: &ReturnedBorrowing) -> Result<bool> {
        let borrowing = &returned.borrowing;
        let mut tx = self.pool.begin().await?;

        // 未返却の場合のみ返却日を設定する
        let closed = sqlx::query(
            r#"
            UPDATE borrowings
            SET actual_return_date = $2
            WHERE borrowing_id = $1 AND actual_return_date IS NULL
            "#,
        )
        .bind(borrowing.borrowing_id.value())
        .bind(borrowing.actual_return_date)
        .execute(&mut *tx)
        .await?;

        if closed.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            UPDATE books
            SET inventory = inventory + 1, updated_at = NOW()
            WHERE book_id = $1
            "#,
        )
        .bind(borrowing.book_id.value())
        .execute(&mut *tx)
        .await?;

        // Batch INSERT using UNNEST
        let mut payment_ids = Vec::with_capacity(returned.payments.len());
        let mut borrowing_ids = Vec::with_capacity(returned.payments.len());
        let mut payment_types = Vec::with_capacity(returned.payments.len());
        let mut statuses = Vec::with_capacity(returned.payments.len());
        let mut amounts = Vec::with_capacity(returned.payments.len());
        let mut created_at_list = Vec::with_capacity(returned.payments.len());

        for payment in &returned.payments {
            payment_ids.push(payment.payment_id.value());
            borrowing_ids.push(payment.borrowing_id.value());
            payment_types.push(payment.payment_type.as_str());
            statuses.push(payment.status.as_str());
            amounts.push(payment.money_to_pay);
            created_at_list.push(payment.created_at);
        }

        sqlx::query(
            r#"
            INSERT INTO payments (
                payment_id,
                borrowing_id,
                payment_type,
                status,
                money_to_pay,
                created_at
            )
            SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::varchar[], $4::varchar[], $5::numeric[], $6::timestamptz[])
            "#,
        )
        .bind(&payment_ids)
        .bind(&borrowing_ids)
        .bind(&payment_types)
        .bind(&statuses)
        .bind(&amounts)
        .bind(&created_at_list)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn find_by_id(&self, borrowing_id: BorrowingId) -> Result<Option<Borrowing>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM borrowings WHERE borrowing_id = $1",
            BORROWING_COLUMNS
        ))
        .bind(borrowing_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_borrowing).transpose()
    }

    /// 貸出を新しい順に取得（user_id・is_activeはNULLなら無条件）
    async fn list(&self, filter: BorrowingFilter) -> Result<Vec<Borrowing>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM borrowings
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::boolean IS NULL OR (actual_return_date IS NULL) = $2)
            ORDER BY borrow_date DESC, borrowing_id ASC
            "#,
            BORROWING_COLUMNS
        ))
        .bind(filter.user_id.map(|id| id.value()))
        .bind(filter.is_active)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_borrowing).collect()
    }
}
