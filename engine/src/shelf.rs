// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

//! Favorite/rating lifecycle of a single (user, book) pair.
//!
//! ```text
//! NotFavorited -> Unrated -> Rated -> Reviewed
//!       ^            |         |         |
//!       +------------+---------+---------+  (remove)
//! ```
//!
//! Every transition is computed from the state read before the command and
//! writes the whole row, so two sessions of the same user resolve as last
//! write wins on (user, book).

use crate::error::ErrorKind;
use controller::{NewUserBook, Score, UserBook};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShelfState {
    NotFavorited,
    Unrated,
    Rated(Score),
    Reviewed(Score, String),
}

/// What has to happen to the stored row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShelfWrite {
    Upsert,
    Delete,
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: ShelfState,
    pub write: ShelfWrite,
}

impl Transition {
    fn upsert(next: ShelfState) -> Self {
        Self {
            next,
            write: ShelfWrite::Upsert,
        }
    }

    fn nothing(next: ShelfState) -> Self {
        Self {
            next,
            write: ShelfWrite::Nothing,
        }
    }
}

impl ShelfState {
    /// A row without score is `Unrated` even if it carries a comment
    pub fn from_row(row: Option<&UserBook>) -> Self {
        let row = match row {
            Some(row) => row,
            None => return Self::NotFavorited,
        };

        let comment = row
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        match (row.score, comment) {
            (None, _) => Self::Unrated,
            (Some(score), None) => Self::Rated(score),
            (Some(score), Some(comment)) => Self::Reviewed(score, comment.to_owned()),
        }
    }

    pub fn is_favorited(&self) -> bool {
        !matches!(self, Self::NotFavorited)
    }

    pub fn score(&self) -> Option<Score> {
        match self {
            Self::Rated(score) | Self::Reviewed(score, _) => Some(*score),
            _ => None,
        }
    }

    pub fn comment(&self) -> Option<&str> {
        match self {
            Self::Reviewed(_, comment) => Some(comment),
            _ => None,
        }
    }

    pub fn favorite(&self) -> Transition {
        match self {
            Self::NotFavorited => Transition::upsert(Self::Unrated),
            state => Transition::nothing(state.clone()),
        }
    }

    /// Rating a book that isn't a favorite yet also makes it one, the
    /// comment (if any) is kept
    pub fn rate(&self, score: Score) -> Transition {
        match self {
            Self::Reviewed(_, comment) => Transition::upsert(Self::Reviewed(score, comment.clone())),
            _ => Transition::upsert(Self::Rated(score)),
        }
    }

    /// A blank comment clears the current one
    pub fn review(&self, comment: &str) -> Result<Transition, ErrorKind> {
        let score = self.score().ok_or(ErrorKind::CommentWithoutScore)?;
        let comment = comment.trim();

        let next = if comment.is_empty() {
            Self::Rated(score)
        } else {
            Self::Reviewed(score, comment.to_owned())
        };

        Ok(Transition::upsert(next))
    }

    pub fn remove(&self) -> Transition {
        match self {
            Self::NotFavorited => Transition::nothing(Self::NotFavorited),
            _ => Transition {
                next: Self::NotFavorited,
                write: ShelfWrite::Delete,
            },
        }
    }

    /// The row to upsert for this state
    pub fn to_row(&self, user_id: &str, book_id: &str) -> NewUserBook {
        NewUserBook::new(
            user_id,
            book_id,
            self.score(),
            self.comment().map(String::from),
        )
    }
}
