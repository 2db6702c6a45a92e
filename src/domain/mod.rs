pub mod book;
pub mod borrowing;
pub mod commands;
pub mod errors;
pub mod payment;
pub mod value_objects;

pub use book::{Book, BookChanges, BookPatch, NewBook};
pub use borrowing::{Borrowing, ReturnedBorrowing};
pub use errors::*;
pub use payment::{Payment, PaymentStatus, PaymentType};
pub use value_objects::*;
