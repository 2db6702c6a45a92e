pub mod book_repository;
pub mod borrowing_repository;
pub mod payment_repository;

pub use book_repository::BookRepository;
pub use borrowing_repository::{BorrowingFilter, BorrowingRepository};
pub use payment_repository::PaymentRepository;
