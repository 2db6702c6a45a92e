mod borrowing_service;
mod payment_service;

pub use borrowing_service::{borrow_book, get_borrowing, list_borrowings, return_book};
pub use payment_service::{get_payment, list_payments, mark_payment_paid};
