// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod covers;
pub mod entity;
pub mod error;
pub mod lazy;
pub mod records;
pub mod searchby;
pub mod values;

use anyhow::Error;

pub use covers::{CoverStore, LocalCoverStore};
pub use entity::{Entity, ToTable};
pub use lazy::LazyItemChunks;
pub use records::{Book, NewBook, NewUserBook, Score, UserBook};
pub use searchby::SearchBy;
pub use values::{Field, Type, Value};

pub type Result<T> = std::result::Result<T, Error>;

/// Storage backend for the catalog and the user/book associations
pub trait Controller {
    /// Get all books, in storage order
    fn items(&self) -> Result<Vec<Book>>;

    /// Get books by id, exact title or exact author, empty results are an error
    fn items_by(&self, by: &SearchBy) -> Result<Vec<Book>>;

    /// Get a chunk of books specified by certain offset and limit
    fn items_offset_limit(&self, offset: usize, limit: usize) -> Result<Vec<Book>>;

    /// Build an iterator that returns all books by chunks, stops after an error
    fn items_by_chunks(&self, chunk_size: usize) -> LazyItemChunks<Self>
    where
        Self: Sized,
    {
        LazyItemChunks {
            curr_offset: 0,
            chunk_size,
            controller: self,
            done: false,
        }
    }

    /// Return a list of fields required to insert a new book
    fn fields_for_items(&self) -> Vec<Field> {
        vec![
            Field::Required("title", Type::String),
            Field::Required("author", Type::String),
            Field::Optional("description", Type::String),
        ]
    }

    /// Insert a single book, the store assigns its id
    fn insert_item(&self, book: &NewBook) -> Result<Book>;

    /// Insert a batch of books, returns how many were inserted
    fn insert_items(&self, books: &[NewBook]) -> Result<usize>;

    /// Remove a book, fails while any association still points to it
    fn remove_item(&self, book_id: &str) -> Result<Book>;

    /// Get every association of every user
    fn all_user_books(&self) -> Result<Vec<UserBook>>;

    /// Get the associations of a single user
    fn user_books(&self, user_id: &str) -> Result<Vec<UserBook>>;

    /// Get the association of a user with a book, if there's any
    fn user_book(&self, user_id: &str, book_id: &str) -> Result<Option<UserBook>>;

    /// Insert or replace the association on (user_id, book_id)
    fn upsert_user_book(&self, user_book: &NewUserBook) -> Result<UserBook>;

    /// Remove the association of a user with a book, returns the removed row
    fn remove_user_book(&self, user_id: &str, book_id: &str) -> Result<Option<UserBook>>;

    /// Remove all associations with a book, returns how many were removed
    fn remove_book_ratings(&self, book_id: &str) -> Result<usize>;
}
