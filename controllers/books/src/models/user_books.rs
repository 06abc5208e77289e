// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::schema::user_books;
use chrono::{DateTime, Utc};
use controller::{error::ErrorKind, NewUserBook, Score, UserBook};
use std::convert::TryFrom;

// To query data from the database
#[derive(Debug, Clone, Queryable)]
pub struct UserBookRow {
    pub user_id: String,
    pub book_id: String,
    pub score: Option<i16>,
    pub comment: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserBookRow> for UserBook {
    type Error = ErrorKind;

    fn try_from(row: UserBookRow) -> Result<Self, Self::Error> {
        let score = row.score.map(Score::try_from).transpose()?;

        Ok(Self {
            user_id: row.user_id,
            book_id: row.book_id,
            score,
            comment: row.comment,
            updated_at: row.updated_at,
        })
    }
}

// To upsert an association into the database
#[derive(Debug, Clone, Insertable)]
#[table_name = "user_books"]
pub struct NewUserBookRow<'a> {
    pub user_id: &'a str,
    pub book_id: &'a str,
    pub score: Option<i16>,
    pub comment: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a NewUserBook> for NewUserBookRow<'a> {
    fn from(new: &'a NewUserBook) -> Self {
        Self {
            user_id: &new.user_id,
            book_id: &new.book_id,
            score: new.score.map(i16::from),
            comment: new.comment.as_deref(),
            updated_at: new.updated_at,
        }
    }
}
