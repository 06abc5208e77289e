// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::schema::books;
use controller::{Book, NewBook};

// To query data from the database
#[derive(Debug, Clone, Identifiable, Queryable, Default)]
#[table_name = "books"]
pub struct BookRow {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_url: Option<String>,
    pub title_lowercase: String,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            author: row.author,
            description: row.description,
            cover_url: row.cover_url,
            title_lowercase: row.title_lowercase,
        }
    }
}

// To insert a new book into the database
#[derive(Debug, Clone, Insertable)]
#[table_name = "books"]
pub struct NewBookRow<'a> {
    pub id: String,
    pub title: &'a str,
    pub author: &'a str,
    pub description: &'a str,
    pub cover_url: Option<&'a str>,
    pub title_lowercase: &'a str,
}

impl<'a> NewBookRow<'a> {
    pub fn with_id(id: String, book: &'a NewBook) -> Self {
        Self {
            id,
            title: &book.title,
            author: &book.author,
            description: &book.description,
            cover_url: book.cover_url.as_deref(),
            title_lowercase: &book.title_lowercase,
        }
    }
}
