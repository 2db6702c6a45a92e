use crate::domain::{BorrowingId, Payment, PaymentId, PaymentStatus};
use crate::ports::payment_repository::{PaymentRepository as PaymentRepositoryTrait, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use super::rows::{PAYMENT_COLUMNS, map_row_to_payment};

/// PaymentRepositoryのPostgreSQL実装
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    /// PostgreSQLコネクションプールから新しいPaymentRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepositoryTrait for PaymentRepository {
    async fn find_by_id(&self, payment_id: PaymentId) -> Result<Option<Payment>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM payments WHERE payment_id = $1",
            PAYMENT_COLUMNS
        ))
        .bind(payment_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_payment).transpose()
    }

    async fn list(&self, borrowing_id: Option<BorrowingId>) -> Result<Vec<Payment>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM payments
            WHERE ($1::uuid IS NULL OR borrowing_id = $1)
            ORDER BY created_at DESC, payment_id ASC
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(borrowing_id.map(|id| id.value()))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_payment).collect()
    }

    /// ステータスの比較更新（現在値が`from`の場合のみ更新）
    async fn update_status(
        &self,
        payment_id: PaymentId,
        from: PaymentStatus,
        to: PaymentStatus,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = $3
            WHERE payment_id = $1 AND status = $2
            "#,
        )
        .bind(payment_id.value())
        .bind(from.as_str())
        .bind(to.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
