// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use controller::{Book, UserBook};
use std::collections::HashMap;

/// Running sum and count of the scores given to a book
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ScoreTally {
    pub sum: u32,
    pub count: u32,
}

impl ScoreTally {
    /// Mean of the tallied scores, `None` if nobody scored the book
    pub fn average(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum as f64 / self.count as f64)
        }
    }
}

/// A book as listed on the popularity ranking
#[derive(Debug, Clone, PartialEq)]
pub struct PopularBook {
    pub book: Book,
    pub average: Option<f64>,
    pub ratings: u32,
}

/// A book as listed on the catalog, `comment_text` is only a search haystack
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogBook {
    pub book: Book,
    pub comment_text: String,
}

/// Tally the scores by book id, rows without a score don't count
pub fn tally_scores(rows: &[UserBook]) -> HashMap<&str, ScoreTally> {
    let mut tallies: HashMap<&str, ScoreTally> = HashMap::new();

    for row in rows {
        if let Some(score) = row.score {
            let tally = tallies.entry(row.book_id.as_str()).or_default();
            tally.sum += score.get() as u32;
            tally.count += 1;
        }
    }

    tallies
}

/// Rank books by their average score, highest first. Unrated books sink to
/// the bottom and ties keep the order they were fetched in.
pub fn popular(books: Vec<Book>, rows: &[UserBook]) -> Vec<PopularBook> {
    let tallies = tally_scores(rows);

    let mut ranked: Vec<_> = books
        .into_iter()
        .map(|book| {
            let tally = tallies.get(book.id.as_str()).copied().unwrap_or_default();

            PopularBook {
                book,
                average: tally.average(),
                ratings: tally.count,
            }
        })
        .collect();

    // `sort_by` is stable
    ranked.sort_by(|a, b| {
        let a = a.average.unwrap_or(0.0);
        let b = b.average.unwrap_or(0.0);
        b.total_cmp(&a)
    });

    ranked
}

/// Lowercased, space joined, non empty comments of every user by book id
pub fn comment_texts(rows: &[UserBook]) -> HashMap<&str, String> {
    let mut texts: HashMap<&str, String> = HashMap::new();

    for row in rows {
        let comment = match row.comment.as_deref().map(str::trim) {
            Some(comment) if !comment.is_empty() => comment.to_lowercase(),
            _ => continue,
        };

        let text = texts.entry(row.book_id.as_str()).or_default();
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&comment);
    }

    texts
}

pub fn with_comments(books: Vec<Book>, rows: &[UserBook]) -> Vec<CatalogBook> {
    let mut texts = comment_texts(rows);

    books
        .into_iter()
        .map(|book| {
            let comment_text = texts.remove(book.id.as_str()).unwrap_or_default();
            CatalogBook { book, comment_text }
        })
        .collect()
}
