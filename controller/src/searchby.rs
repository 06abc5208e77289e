// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::error::ErrorKind;
use crate::Book;
use std::fmt::{self, Display};

/// Exact lookups over the catalog, free text search lives in the engine
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SearchBy {
    Id(String),
    Title(String),
    Author(String),
}

impl SearchBy {
    pub fn id(id: &str) -> Self {
        Self::Id(id.into())
    }

    pub fn title(title: &str) -> Self {
        Self::Title(title.into())
    }

    pub fn author(author: &str) -> Self {
        Self::Author(author.into())
    }

    pub fn matches(&self, book: &Book) -> bool {
        match self {
            SearchBy::Id(id) => &book.id == id,
            SearchBy::Title(title) => &book.title == title,
            SearchBy::Author(author) => &book.author == author,
        }
    }

    /// What to report when the lookup comes back empty
    pub fn not_found(&self) -> ErrorKind {
        match self {
            SearchBy::Id(id) => ErrorKind::NotFoundById(id.clone()),
            SearchBy::Title(title) => ErrorKind::NotFoundByTitle(title.clone()),
            SearchBy::Author(author) => ErrorKind::NotFoundByAuthor(author.clone()),
        }
    }
}

impl Display for SearchBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchBy::Id(id) => write!(f, "id({})", id),
            SearchBy::Title(title) => write!(f, "title({})", title),
            SearchBy::Author(author) => write!(f, "author({})", author),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_matches() {
        let book = Book {
            id: "8f1c".into(),
            title: "Emma".into(),
            author: "Jane Austen".into(),
            ..Default::default()
        };

        assert!(SearchBy::id("8f1c").matches(&book));
        assert!(SearchBy::title("Emma").matches(&book));
        assert!(!SearchBy::title("emma").matches(&book));
        assert!(!SearchBy::author("Austen").matches(&book));
    }

    #[test]
    fn display_and_errors() {
        assert_eq!(SearchBy::title("Dune").to_string(), "title(Dune)");
        assert_eq!(
            SearchBy::author("Austen").not_found().to_string(),
            "Couldn't find a book by Austen"
        );
        assert!(matches!(
            SearchBy::id("8f1c").not_found(),
            ErrorKind::NotFoundById(id) if id == "8f1c"
        ));
    }
}
