// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::aggregate::CatalogBook;
use controller::Book;

/// Case insensitive search over title, author and comments, plus an exact
/// (case sensitive) author filter. An empty search matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    search: String,
    author: Option<String>,
}

impl CatalogFilter {
    pub fn new(search: &str, author: Option<&str>) -> Self {
        Self {
            search: search.to_lowercase(),
            author: author.filter(|a| !a.is_empty()).map(String::from),
        }
    }

    pub fn matches(&self, entry: &CatalogBook) -> bool {
        let book = &entry.book;

        let matches_search = book.title.to_lowercase().contains(&self.search)
            || book.author.to_lowercase().contains(&self.search)
            || entry.comment_text.contains(&self.search);

        let matches_author = match &self.author {
            Some(author) => &book.author == author,
            None => true,
        };

        matches_search && matches_author
    }

    pub fn apply<'a>(&self, books: &'a [CatalogBook]) -> Vec<&'a CatalogBook> {
        books.iter().filter(|b| self.matches(b)).collect()
    }
}

pub fn filter_catalog<'a>(
    books: &'a [CatalogBook],
    search: &str,
    author: Option<&str>,
) -> Vec<&'a CatalogBook> {
    CatalogFilter::new(search, author).apply(books)
}

/// Sorted distinct authors, what the author filter can be set to
pub fn unique_authors<'a>(books: impl IntoIterator<Item = &'a Book>) -> Vec<String> {
    let mut authors: Vec<String> = books.into_iter().map(|b| b.author.clone()).collect();
    authors.sort();
    authors.dedup();
    authors
}
