pub mod books;
pub mod user_books;
