use crate::domain::{
    Book, BookId, BookPatch, Borrowing, BorrowingId, Payment, PaymentId, PaymentStatus,
    ReturnedBorrowing,
};
use crate::ports::{
    BookRepository, BorrowingFilter, BorrowingRepository, PaymentRepository,
    book_repository::Result,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct LibraryState {
    books: HashMap<BookId, Book>,
    borrowings: HashMap<BorrowingId, Borrowing>,
    payments: HashMap<PaymentId, Payment>,
}

/// 3つのリポジトリポートのインメモリ実装
///
/// 全体を1つのMutexで保護するため、各操作は原子的に実行される。
/// テストと`storage = "memory"`での起動に使用する。
#[derive(Debug, Default)]
pub struct LibraryStore {
    state: Mutex<LibraryState>,
}

impl LibraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, LibraryState>> {
        self.state
            .lock()
            .map_err(|_| "memory store lock poisoned".into())
    }
}

#[async_trait]
impl BookRepository for LibraryStore {
    async fn insert(&self, book: &Book) -> Result<()> {
        let mut state = self.lock()?;
        state.books.insert(book.book_id, book.clone());
        Ok(())
    }

    async fn find_by_id(&self, book_id: BookId) -> Result<Option<Book>> {
        Ok(self.lock()?.books.get(&book_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Book>> {
        let state = self.lock()?;
        let mut books: Vec<Book> = state.books.values().cloned().collect();
        books.sort_by(|a, b| a.title.cmp(&b.title).then(a.book_id.cmp(&b.book_id)));
        Ok(books)
    }

    async fn update(&self, book_id: BookId, patch: &BookPatch) -> Result<Option<Book>> {
        let mut state = self.lock()?;
        Ok(state.books.get_mut(&book_id).map(|existing| {
            *existing = patch.apply(existing);
            existing.clone()
        }))
    }

    async fn delete(&self, book_id: BookId) -> Result<bool> {
        let mut state = self.lock()?;
        if state.books.remove(&book_id).is_none() {
            return Ok(false);
        }

        // ON DELETE CASCADE と同じ挙動
        let removed: Vec<BorrowingId> = state
            .borrowings
            .values()
            .filter(|b| b.book_id == book_id)
            .map(|b| b.borrowing_id)
            .collect();
        for borrowing_id in &removed {
            state.borrowings.remove(borrowing_id);
        }
        state
            .payments
            .retain(|_, payment| !removed.contains(&payment.borrowing_id));

        Ok(true)
    }
}

#[async_trait]
impl BorrowingRepository for LibraryStore {
    async fn record_borrowing(&self, borrowing: &Borrowing) -> Result<Option<Book>> {
        let mut state = self.lock()?;

        let Some(book) = state.books.get_mut(&borrowing.book_id) else {
            return Ok(None);
        };
        if book.inventory == 0 {
            return Ok(None);
        }
        book.inventory -= 1;
        let book = book.clone();

        state
            .borrowings
            .insert(borrowing.borrowing_id, borrowing.clone());

        Ok(Some(book))
    }

    async fn record_return(&self, returned: &ReturnedBorrowing) -> Result<bool> {
        let mut state = self.lock()?;
        let borrowing_id = returned.borrowing.borrowing_id;

        match state.borrowings.get(&borrowing_id) {
            Some(current) if current.is_active() => {}
            _ => return Ok(false),
        }

        state.borrowings.insert(borrowing_id, returned.borrowing.clone());
        if let Some(book) = state.books.get_mut(&returned.borrowing.book_id) {
            book.inventory = book.inventory.saturating_add(1);
        }
        for payment in &returned.payments {
            state.payments.insert(payment.payment_id, payment.clone());
        }

        Ok(true)
    }

    async fn find_by_id(&self, borrowing_id: BorrowingId) -> Result<Option<Borrowing>> {
        Ok(self.lock()?.borrowings.get(&borrowing_id).cloned())
    }

    async fn list(&self, filter: BorrowingFilter) -> Result<Vec<Borrowing>> {
        let state = self.lock()?;
        let mut borrowings: Vec<Borrowing> = state
            .borrowings
            .values()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        borrowings.sort_by(|a, b| {
            b.borrow_date
                .cmp(&a.borrow_date)
                .then(a.borrowing_id.cmp(&b.borrowing_id))
        });
        Ok(borrowings)
    }
}

#[async_trait]
impl PaymentRepository for LibraryStore {
    async fn find_by_id(&self, payment_id: PaymentId) -> Result<Option<Payment>> {
        Ok(self.lock()?.payments.get(&payment_id).cloned())
    }

    async fn list(&self, borrowing_id: Option<BorrowingId>) -> Result<Vec<Payment>> {
        let state = self.lock()?;
        let mut payments: Vec<Payment> = state
            .payments
            .values()
            .filter(|p| borrowing_id.is_none_or(|id| p.borrowing_id == id))
            .cloned()
            .collect();
        payments.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(a.payment_id.cmp(&b.payment_id))
        });
        Ok(payments)
    }

    async fn update_status(
        &self,
        payment_id: PaymentId,
        from: PaymentStatus,
        to: PaymentStatus,
    ) -> Result<bool> {
        let mut state = self.lock()?;
        match state.payments.get_mut(&payment_id) {
            Some(payment) if payment.status == from => {
                payment.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
