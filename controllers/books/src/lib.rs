// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

#[macro_use]
extern crate diesel;

pub mod models;
pub mod schema;

use crate::models::books::{BookRow, NewBookRow};
use crate::models::user_books::{NewUserBookRow, UserBookRow};
use crate::schema::{books, user_books};
use anyhow::Error;
use config::Config;
use controller::{
    error::ErrorKind, Book, Controller, NewBook, NewUserBook, SearchBy, UserBook,
};
use diesel::pg::upsert::excluded;
use diesel::pg::PgConnection;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{delete, insert_into, prelude::*};
use std::convert::TryFrom;
use uuid::Uuid;

pub fn establish_connection(url: &str) -> Result<PgConnection, Error> {
    Ok(PgConnection::establish(url)?)
}

fn into_user_books(rows: Vec<UserBookRow>) -> Result<Vec<UserBook>, Error> {
    rows.into_iter()
        .map(|row| UserBook::try_from(row).map_err(Error::from))
        .collect()
}

pub struct BooksController {
    pg_conn: PgConnection,
}

impl BooksController {
    pub fn new() -> Result<Self, Error> {
        let cfg = Config::default();

        Self::from_config(&cfg, "books")
    }

    pub fn from_config(config: &Config, name: &str) -> Result<Self, Error> {
        let db = config
            .databases
            .get(name)
            .ok_or_else(|| ErrorKind::DbConfigError(name.into()))?;

        log::debug!("Connecting to database {}", name);
        Self::with_url(&db.psql_url)
    }

    pub fn with_url(url: &str) -> Result<Self, Error> {
        let pg_conn = establish_connection(url)?;
        Ok(Self { pg_conn })
    }
}

impl Controller for BooksController {
    fn items(&self) -> Result<Vec<Book>, Error> {
        let items = books::table.load::<BookRow>(&self.pg_conn)?;
        Ok(items.into_iter().map(Book::from).collect())
    }

    fn items_by(&self, by: &SearchBy) -> Result<Vec<Book>, Error> {
        let query = books::table.into_boxed();
        let query = match by {
            SearchBy::Id(id) => query.filter(books::id.eq(id)),
            SearchBy::Title(title) => query.filter(books::title.eq(title)),
            SearchBy::Author(author) => query.filter(books::author.eq(author)),
        };

        let rows = query.load::<BookRow>(&self.pg_conn)?;
        if rows.is_empty() {
            Err(by.not_found().into())
        } else {
            Ok(rows.into_iter().map(Book::from).collect())
        }
    }

    fn items_offset_limit(&self, offset: usize, limit: usize) -> Result<Vec<Book>, Error> {
        let items = books::table
            .order(books::id)
            .offset(offset as i64)
            .limit(limit as i64)
            .load::<BookRow>(&self.pg_conn)?;

        Ok(items.into_iter().map(Book::from).collect())
    }

    fn insert_item(&self, book: &NewBook) -> Result<Book, Error> {
        let row = NewBookRow::with_id(Uuid::new_v4().to_string(), book);

        let inserted = insert_into(books::table)
            .values(&row)
            .get_result::<BookRow>(&self.pg_conn)?;

        Ok(inserted.into())
    }

    fn insert_items(&self, books: &[NewBook]) -> Result<usize, Error> {
        let rows: Vec<_> = books
            .iter()
            .map(|book| NewBookRow::with_id(Uuid::new_v4().to_string(), book))
            .collect();

        let inserted = insert_into(books::table)
            .values(&rows)
            .execute(&self.pg_conn)?;

        Ok(inserted)
    }

    fn remove_item(&self, book_id: &str) -> Result<Book, Error> {
        let removed = match delete(books::table.filter(books::id.eq(book_id)))
            .get_result::<BookRow>(&self.pg_conn)
            .optional()
        {
            Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
                return Err(ErrorKind::BookReferenced(book_id.into()).into());
            }
            res => res?.ok_or_else(|| ErrorKind::NotFoundById(book_id.into()))?,
        };

        Ok(removed.into())
    }

    fn all_user_books(&self) -> Result<Vec<UserBook>, Error> {
        let rows = user_books::table.load::<UserBookRow>(&self.pg_conn)?;
        into_user_books(rows)
    }

    fn user_books(&self, user_id: &str) -> Result<Vec<UserBook>, Error> {
        let rows = user_books::table
            .filter(user_books::user_id.eq(user_id))
            .load::<UserBookRow>(&self.pg_conn)?;

        into_user_books(rows)
    }

    fn user_book(&self, user_id: &str, book_id: &str) -> Result<Option<UserBook>, Error> {
        let row = user_books::table
            .filter(user_books::user_id.eq(user_id))
            .filter(user_books::book_id.eq(book_id))
            .first::<UserBookRow>(&self.pg_conn)
            .optional()?;

        Ok(row.map(UserBook::try_from).transpose()?)
    }

    fn upsert_user_book(&self, user_book: &NewUserBook) -> Result<UserBook, Error> {
        let row = NewUserBookRow::from(user_book);

        let stored = insert_into(user_books::table)
            .values(&row)
            .on_conflict((user_books::user_id, user_books::book_id))
            .do_update()
            .set((
                user_books::score.eq(excluded(user_books::score)),
                user_books::comment.eq(excluded(user_books::comment)),
                user_books::updated_at.eq(excluded(user_books::updated_at)),
            ))
            .get_result::<UserBookRow>(&self.pg_conn)?;

        Ok(UserBook::try_from(stored)?)
    }

    fn remove_user_book(&self, user_id: &str, book_id: &str) -> Result<Option<UserBook>, Error> {
        let removed = delete(
            user_books::table
                .filter(user_books::user_id.eq(user_id))
                .filter(user_books::book_id.eq(book_id)),
        )
        .get_result::<UserBookRow>(&self.pg_conn)
        .optional()?;

        Ok(removed.map(UserBook::try_from).transpose()?)
    }

    fn remove_book_ratings(&self, book_id: &str) -> Result<usize, Error> {
        let removed = delete(user_books::table.filter(user_books::book_id.eq(book_id)))
            .execute(&self.pg_conn)?;

        Ok(removed)
    }
}
