// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::error::ErrorKind;
use crate::{Entity, Value};
use chrono::{DateTime, Utc};
use common_macros::hash_map;
use std::collections::HashMap;
use std::convert::TryFrom;
use std::fmt::{self, Display};

/// A catalogued book
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_url: Option<String>,
    pub title_lowercase: String,
}

impl Entity for Book {
    type Id = String;

    fn get_id(&self) -> Self::Id {
        self.id.clone()
    }

    fn get_data(&self) -> HashMap<String, String> {
        let mut data = hash_map! {
            "title".into() => self.title.clone(),
            "author".into() => self.author.clone(),
            "description".into() => self.description.clone(),
        };

        if let Some(cover_url) = &self.cover_url {
            data.insert("cover".into(), cover_url.clone());
        }

        data
    }
}

/// A book that hasn't been stored yet, the store assigns its id
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_url: Option<String>,
    pub title_lowercase: String,
}

impl NewBook {
    pub fn new(title: &str, author: &str, description: &str, cover_url: Option<String>) -> Self {
        Self {
            title: title.to_owned(),
            author: author.to_owned(),
            description: description.to_owned(),
            cover_url,
            title_lowercase: title.to_lowercase(),
        }
    }

    /// Build a book from a prototype collected with `Controller::fields_for_items`
    pub fn from_prototype(
        proto: &HashMap<&str, Value>,
        cover_url: Option<String>,
    ) -> Result<Self, ErrorKind> {
        let title = required_field(proto, "title")?;
        let author = required_field(proto, "author")?;
        let description = match proto.get("description") {
            Some(value) => value.as_str().trim(),
            None => "",
        };

        Ok(Self::new(title, author, description, cover_url))
    }

    /// Attach an identity, used by the stores once they've generated one
    pub fn into_book(self, id: String) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            description: self.description,
            cover_url: self.cover_url,
            title_lowercase: self.title_lowercase,
        }
    }
}

fn required_field<'a>(proto: &'a HashMap<&str, Value>, name: &str) -> Result<&'a str, ErrorKind> {
    let value = proto
        .get(name)
        .ok_or_else(|| ErrorKind::MissingField(name.into()))?
        .as_str()
        .trim();

    if value.is_empty() {
        Err(ErrorKind::MissingField(name.into()))
    } else {
        Ok(value)
    }
}

/// A star rating, always within 1..=5
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, ErrorKind> {
        if value < Self::MIN as i64 || value > Self::MAX as i64 {
            Err(ErrorKind::ScoreOutOfRange(value))
        } else {
            Ok(Self(value as u8))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i16> for Score {
    type Error = ErrorKind;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::new(value as i64)
    }
}

impl From<Score> for i16 {
    fn from(score: Score) -> Self {
        score.0 as i16
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Association between a user and a book. Its presence means the book is a
/// favorite of the user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserBook {
    pub user_id: String,
    pub book_id: String,
    pub score: Option<Score>,
    pub comment: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert payload for an association, keyed on (user_id, book_id)
#[derive(Debug, Clone, PartialEq)]
pub struct NewUserBook {
    pub user_id: String,
    pub book_id: String,
    pub score: Option<Score>,
    pub comment: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl NewUserBook {
    pub fn new(user_id: &str, book_id: &str, score: Option<Score>, comment: Option<String>) -> Self {
        Self {
            user_id: user_id.to_owned(),
            book_id: book_id.to_owned(),
            score,
            comment,
            updated_at: Utc::now(),
        }
    }
}

impl From<NewUserBook> for UserBook {
    fn from(new: NewUserBook) -> Self {
        Self {
            user_id: new.user_id,
            book_id: new.book_id,
            score: new.score,
            comment: new.comment,
            updated_at: new.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Error;

    #[test]
    fn score_bounds() {
        assert!(Score::new(0).is_err());
        assert!(Score::new(6).is_err());
        assert_eq!(Score::new(1).map(Score::get).ok(), Some(1));
        assert_eq!(Score::new(5).map(Score::get).ok(), Some(5));
    }

    #[test]
    fn score_from_column() -> Result<(), Error> {
        let score = Score::try_from(4i16)?;
        assert_eq!(i16::from(score), 4);
        assert!(Score::try_from(-1i16).is_err());

        Ok(())
    }

    #[test]
    fn new_book_lowercases_title() {
        let book = NewBook::new("The Left Hand of Darkness", "Le Guin", "", None);
        assert_eq!(book.title_lowercase, "the left hand of darkness");

        let book = book.into_book("42".into());
        assert_eq!(book.get_id(), "42");
        assert_eq!(book.get_data()["author"], "Le Guin");
        assert!(!book.get_data().contains_key("cover"));
    }

    #[test]
    fn new_book_from_prototype() -> Result<(), Error> {
        let proto = hash_map! {
            "title" => Value::String(" Dune ".into()),
            "author" => Value::String("Frank Herbert".into()),
        };

        let book = NewBook::from_prototype(&proto, Some("http://covers/x.png".into()))?;
        assert_eq!(book.title, "Dune");
        assert_eq!(book.title_lowercase, "dune");
        assert_eq!(book.description, "");
        assert_eq!(book.cover_url.as_deref(), Some("http://covers/x.png"));

        Ok(())
    }

    #[test]
    fn prototype_requires_title_and_author() {
        let proto = hash_map! {
            "title" => Value::String("   ".into()),
            "author" => Value::String("Frank Herbert".into()),
        };

        match NewBook::from_prototype(&proto, None) {
            Err(ErrorKind::MissingField(field)) => assert_eq!(field, "title"),
            other => panic!("unexpected result {:?}", other),
        }

        let proto = hash_map! { "title" => Value::String("Dune".into()) };
        assert!(NewBook::from_prototype(&proto, None).is_err());
    }
}
