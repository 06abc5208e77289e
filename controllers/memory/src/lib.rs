// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use anyhow::Error;
use controller::{
    error::ErrorKind, Book, Controller, NewBook, NewUserBook, SearchBy, UserBook,
};
use std::cell::RefCell;
use uuid::Uuid;

/// Keeps everything in process memory, rows are kept in insertion order.
/// Associations must point to a stored book, like the `user_books` foreign key.
#[derive(Debug, Default)]
pub struct MemoryController {
    books: RefCell<Vec<Book>>,
    user_books: RefCell<Vec<UserBook>>,
}

impl MemoryController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: RefCell::new(books),
            ..Default::default()
        }
    }
}

impl Controller for MemoryController {
    fn items(&self) -> Result<Vec<Book>, Error> {
        Ok(self.books.borrow().clone())
    }

    fn items_by(&self, by: &SearchBy) -> Result<Vec<Book>, Error> {
        let found: Vec<Book> = self
            .books
            .borrow()
            .iter()
            .filter(|b| by.matches(b))
            .cloned()
            .collect();

        if found.is_empty() {
            Err(by.not_found().into())
        } else {
            Ok(found)
        }
    }

    fn items_offset_limit(&self, offset: usize, limit: usize) -> Result<Vec<Book>, Error> {
        let books = self.books.borrow();
        Ok(books.iter().skip(offset).take(limit).cloned().collect())
    }

    fn insert_item(&self, book: &NewBook) -> Result<Book, Error> {
        let book = book.clone().into_book(Uuid::new_v4().to_string());
        self.books.borrow_mut().push(book.clone());

        Ok(book)
    }

    fn insert_items(&self, books: &[NewBook]) -> Result<usize, Error> {
        let mut stored = self.books.borrow_mut();
        for book in books {
            stored.push(book.clone().into_book(Uuid::new_v4().to_string()));
        }

        Ok(books.len())
    }

    fn remove_item(&self, book_id: &str) -> Result<Book, Error> {
        let referenced = self
            .user_books
            .borrow()
            .iter()
            .any(|ub| ub.book_id == book_id);
        if referenced {
            return Err(ErrorKind::BookReferenced(book_id.into()).into());
        }

        let mut books = self.books.borrow_mut();
        let pos = books
            .iter()
            .position(|b| b.id == book_id)
            .ok_or_else(|| ErrorKind::NotFoundById(book_id.into()))?;

        log::debug!("Removed book {}", book_id);
        Ok(books.remove(pos))
    }

    fn all_user_books(&self) -> Result<Vec<UserBook>, Error> {
        Ok(self.user_books.borrow().clone())
    }

    fn user_books(&self, user_id: &str) -> Result<Vec<UserBook>, Error> {
        let user_books = self.user_books.borrow();
        Ok(user_books
            .iter()
            .filter(|ub| ub.user_id == user_id)
            .cloned()
            .collect())
    }

    fn user_book(&self, user_id: &str, book_id: &str) -> Result<Option<UserBook>, Error> {
        let user_books = self.user_books.borrow();
        Ok(user_books
            .iter()
            .find(|ub| ub.user_id == user_id && ub.book_id == book_id)
            .cloned())
    }

    fn upsert_user_book(&self, user_book: &NewUserBook) -> Result<UserBook, Error> {
        if !self.books.borrow().iter().any(|b| b.id == user_book.book_id) {
            return Err(ErrorKind::NotFoundById(user_book.book_id.clone()).into());
        }

        let row = UserBook::from(user_book.clone());
        let mut user_books = self.user_books.borrow_mut();

        let existing = user_books
            .iter_mut()
            .find(|ub| ub.user_id == row.user_id && ub.book_id == row.book_id);

        match existing {
            Some(existing) => *existing = row.clone(),
            None => user_books.push(row.clone()),
        }

        log::debug!("Upserted {} on {}", row.user_id, row.book_id);
        Ok(row)
    }

    fn remove_user_book(&self, user_id: &str, book_id: &str) -> Result<Option<UserBook>, Error> {
        let mut user_books = self.user_books.borrow_mut();
        let pos = user_books
            .iter()
            .position(|ub| ub.user_id == user_id && ub.book_id == book_id);

        log::debug!("Removing {} on {}: {}", user_id, book_id, pos.is_some());
        Ok(pos.map(|pos| user_books.remove(pos)))
    }

    fn remove_book_ratings(&self, book_id: &str) -> Result<usize, Error> {
        let mut user_books = self.user_books.borrow_mut();
        let before = user_books.len();
        user_books.retain(|ub| ub.book_id != book_id);

        let removed = before - user_books.len();
        log::debug!("Removed {} associations of book {}", removed, book_id);
        Ok(removed)
    }
}
