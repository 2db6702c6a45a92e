use crate::application::{LibraryApplicationError, Result, ServiceDependencies};
use crate::domain::{
    self, BorrowBookError, Borrowing, BorrowingId, ReturnBookError, ReturnedBorrowing,
    commands::*,
};
use crate::ports::BorrowingFilter;

/// 書籍を貸し出す（純粋な関数）
///
/// ビジネスルール：
/// - 書籍が存在すること
/// - 書籍の在庫が1冊以上あること
/// - 返却予定日は貸出日の14日後
///
/// すべての依存が引数として明示的に渡される（関数型の原則）。
///
/// # 同時実行
///
/// 在庫確認はドメイン層で一度行うが、確定は`record_borrowing`の
/// 条件付き減算による。最後の1冊を同時に借りようとした場合、
/// 後者は`BookUnavailable`となり貸出は作成されない。
///
/// # 戻り値
/// 成功時は作成された貸出
pub async fn borrow_book(deps: &ServiceDependencies, cmd: BorrowBook) -> Result<Borrowing> {
    // 1. 書籍の存在確認
    let book = deps
        .book_repository
        .find_by_id(cmd.book_id)
        .await
        .map_err(LibraryApplicationError::BookRepositoryError)?
        .ok_or(LibraryApplicationError::BookNotFound)?;

    // 2. ドメイン層の純粋関数を呼び出し
    let (borrowing, _) =
        domain::borrowing::borrow_book(&book, cmd.user_id, cmd.today).map_err(|e| match e {
            BorrowBookError::Unavailable => LibraryApplicationError::BookUnavailable,
        })?;

    // 3. 在庫の確保と貸出の保存
    let reserved = deps
        .borrowing_repository
        .record_borrowing(&borrowing)
        .await
        .map_err(LibraryApplicationError::BorrowingRepositoryError)?;

    let Some(book) = reserved else {
        tracing::warn!(
            book_id = %cmd.book_id.value(),
            "Last copy was taken before the borrowing could be recorded"
        );
        return Err(LibraryApplicationError::BookUnavailable);
    };

    tracing::info!(
        borrowing_id = %borrowing.borrowing_id.value(),
        book_id = %book.book_id.value(),
        user_id = %cmd.user_id.value(),
        remaining = book.inventory,
        "Book borrowed"
    );

    Ok(borrowing)
}

/// 書籍を返却する（純粋な関数）
///
/// ビジネスルール：
/// - 貸出が存在すること
/// - 既に返却済みでないこと
/// - 在庫を1冊戻す
/// - 通常料金を1件、返却予定日を過ぎていれば延滞金を1件作成する
///
/// 料金は返却時に一度だけ計算して保存する。
///
/// # 戻り値
/// 返却済みの貸出と作成された支払い
pub async fn return_book(deps: &ServiceDependencies, cmd: ReturnBook) -> Result<ReturnedBorrowing> {
    // 1. 貸出の取得
    let borrowing = get_borrowing(deps, cmd.borrowing_id).await?;

    if !borrowing.is_active() {
        return Err(LibraryApplicationError::AlreadyReturned);
    }

    // 2. 書籍の取得（料金計算に日額が必要）
    let book = deps
        .book_repository
        .find_by_id(borrowing.book_id)
        .await
        .map_err(LibraryApplicationError::BookRepositoryError)?
        .ok_or(LibraryApplicationError::BookNotFound)?;

    // 3. ドメイン層の純粋関数を呼び出し
    let returned = domain::borrowing::return_book(&borrowing, &book, cmd.today, cmd.returned_at)
        .map_err(|e| match e {
            ReturnBookError::AlreadyReturned => LibraryApplicationError::AlreadyReturned,
            ReturnBookError::BookMismatch => LibraryApplicationError::DomainError(format!(
                "Borrowing {} does not reference book {}",
                borrowing.borrowing_id.value(),
                book.book_id.value()
            )),
        })?;

    // 4. 返却・在庫・支払いを原子的に保存
    let closed = deps
        .borrowing_repository
        .record_return(&returned)
        .await
        .map_err(LibraryApplicationError::BorrowingRepositoryError)?;

    if !closed {
        tracing::warn!(
            borrowing_id = %cmd.borrowing_id.value(),
            "Borrowing was returned by a concurrent request"
        );
        return Err(LibraryApplicationError::AlreadyReturned);
    }

    tracing::info!(
        borrowing_id = %cmd.borrowing_id.value(),
        book_id = %book.book_id.value(),
        payments = returned.payments.len(),
        overdue = returned.borrowing.is_overdue(cmd.today),
        "Book returned"
    );

    Ok(returned)
}

/// IDで貸出を取得する
pub async fn get_borrowing(
    deps: &ServiceDependencies,
    borrowing_id: BorrowingId,
) -> Result<Borrowing> {
    deps.borrowing_repository
        .find_by_id(borrowing_id)
        .await
        .map_err(LibraryApplicationError::BorrowingRepositoryError)?
        .ok_or(LibraryApplicationError::BorrowingNotFound)
}

/// 条件付きで貸出一覧を取得する
pub async fn list_borrowings(
    deps: &ServiceDependencies,
    filter: BorrowingFilter,
) -> Result<Vec<Borrowing>> {
    tracing::debug!(?filter, "Listing borrowings");

    deps.borrowing_repository
        .list(filter)
        .await
        .map_err(LibraryApplicationError::BorrowingRepositoryError)
}
