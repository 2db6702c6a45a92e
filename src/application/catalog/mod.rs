mod book_service;

pub use book_service::{create_book, delete_book, get_book, list_books, update_book};
