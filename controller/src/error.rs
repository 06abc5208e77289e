// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use thiserror::Error as DError;

#[derive(Debug, Clone, DError)]
pub enum ErrorKind {
    #[error("Couldn't find book with id({0})")]
    NotFoundById(String),

    #[error("Couldn't find a book titled '{0}'")]
    NotFoundByTitle(String),

    #[error("Couldn't find a book by {0}")]
    NotFoundByAuthor(String),

    #[error("Couldn't find database config for {0}")]
    DbConfigError(String),

    #[error("Missing required field '{0}'")]
    MissingField(String),

    #[error("Score must be between 1 and 5, got {0}")]
    ScoreOutOfRange(i64),

    #[error("Book {0} still has favorites or ratings")]
    BookReferenced(String),

    #[error("Couldn't upload cover from {0}")]
    CoverUpload(String),
}
