// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use controller::{Score, ToTable};
use engine::aggregate::{CatalogBook, PopularBook};
use engine::shelf::ShelfState;
use engine::{BookDetail, Catalog, FavoriteBook};
use prettytable::{cell, format::consts::FORMAT_NO_LINESEP, row, Table};

pub const NO_BOOKS: &str = "No books found.";
pub const NO_RATINGS: &str = "No ratings yet";

/// Five stars, the first `filled` of them solid
pub fn stars(filled: u8) -> String {
    let filled = filled.min(Score::MAX) as usize;
    let empty = Score::MAX as usize - filled;

    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

pub fn score_stars(score: Option<Score>) -> String {
    stars(score.map(Score::get).unwrap_or(0))
}

/// Averages are only rounded here, to the nearest whole star
pub fn average_stars(average: Option<f64>) -> String {
    stars(average.map(|avg| avg.round() as u8).unwrap_or(0))
}

pub fn display_average(average: Option<f64>) -> String {
    match average {
        Some(avg) => format!("{} / 5", avg.round()),
        None => NO_RATINGS.into(),
    }
}

fn table_with(titles: prettytable::Row) -> Table {
    let mut table = Table::new();
    table.set_format(*FORMAT_NO_LINESEP);
    table.set_titles(titles);
    table
}

pub fn catalog_table(catalog: &Catalog) -> Option<Table> {
    if catalog.books.is_empty() {
        return None;
    }

    let mut table = table_with(row!["id", "title", "author", "favorite"]);
    for CatalogBook { book, .. } in &catalog.books {
        let favorite = match catalog.favorites.get(&book.id) {
            Some(score) => score_stars(*score),
            None => String::new(),
        };

        table.add_row(row![book.id, book.title, book.author, favorite]);
    }

    Some(table)
}

pub fn search_table(books: &[CatalogBook]) -> Option<Table> {
    if books.is_empty() {
        return None;
    }

    let mut table = table_with(row!["id", "title", "author"]);
    for CatalogBook { book, .. } in books {
        table.add_row(row![book.id, book.title, book.author]);
    }

    Some(table)
}

pub fn popular_table(books: &[PopularBook]) -> Option<Table> {
    if books.is_empty() {
        return None;
    }

    let mut table = table_with(row!["#", "title", "author", "rating", "average", "votes"]);
    for (pos, entry) in books.iter().enumerate() {
        table.add_row(row![
            pos + 1,
            entry.book.title,
            entry.book.author,
            average_stars(entry.average),
            display_average(entry.average),
            entry.ratings
        ]);
    }

    Some(table)
}

pub fn favorites_table(books: &[FavoriteBook]) -> Option<Table> {
    if books.is_empty() {
        return None;
    }

    let mut table = table_with(row!["id", "title", "author", "score", "comment"]);
    for entry in books {
        table.add_row(row![
            entry.book.id,
            entry.book.title,
            entry.book.author,
            score_stars(entry.score),
            entry.comment.as_deref().unwrap_or_default()
        ]);
    }

    Some(table)
}

pub fn state_line(state: &ShelfState) -> String {
    match state {
        ShelfState::NotFavorited => "Not in your favorites".into(),
        ShelfState::Unrated => "In your favorites, not rated yet".into(),
        ShelfState::Rated(score) => format!("Your rating: {}", score_stars(Some(*score))),
        ShelfState::Reviewed(score, comment) => format!(
            "Your rating: {}\nYour comment: {}",
            score_stars(Some(*score)),
            comment
        ),
    }
}

pub fn detail_table(detail: &BookDetail) -> Table {
    let mut table = detail.book.to_table();
    if detail.state.is_favorited() {
        table.add_row(row!["shelf", state_line(&detail.state)]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Error;
    use controller::Book;
    use std::collections::HashMap;

    fn book(id: &str) -> Book {
        Book {
            id: id.into(),
            title: format!("Title {}", id),
            author: "Anon".into(),
            ..Default::default()
        }
    }

    #[test]
    fn stars_are_rounded_to_nearest() {
        assert_eq!(stars(3), "★★★☆☆");
        assert_eq!(stars(9), "★★★★★");
        assert_eq!(average_stars(Some(4.5)), "★★★★★");
        assert_eq!(average_stars(Some(3.4)), "★★★☆☆");
        assert_eq!(average_stars(None), "☆☆☆☆☆");
    }

    #[test]
    fn averages_display() {
        assert_eq!(display_average(None), "No ratings yet");
        assert_eq!(display_average(Some(11.0 / 3.0)), "4 / 5");
        assert_eq!(display_average(Some(4.5)), "5 / 5");
    }

    #[test]
    fn empty_lists_have_no_table() {
        let catalog = Catalog {
            books: Vec::new(),
            favorites: HashMap::new(),
        };

        assert!(catalog_table(&catalog).is_none());
        assert!(search_table(&[]).is_none());
        assert!(popular_table(&[]).is_none());
        assert!(favorites_table(&[]).is_none());
    }

    #[test]
    fn popular_rows_in_ranking_order() -> Result<(), Error> {
        let ranked = vec![
            PopularBook {
                book: book("a"),
                average: Some(4.5),
                ratings: 2,
            },
            PopularBook {
                book: book("b"),
                average: None,
                ratings: 0,
            },
        ];

        let table = popular_table(&ranked).ok_or_else(|| anyhow::anyhow!("no table"))?;
        let cell = |r: usize, c: usize| {
            table
                .get_row(r)
                .and_then(|row| row.get_cell(c))
                .map(|cell| cell.get_content())
        };

        assert_eq!(table.len(), 2);
        assert_eq!(cell(0, 1), Some("Title a".into()));
        assert_eq!(cell(1, 4), Some(NO_RATINGS.into()));

        Ok(())
    }

    #[test]
    fn shelf_lines() -> Result<(), Error> {
        let four = Score::new(4)?;

        assert_eq!(state_line(&ShelfState::Rated(four)), "Your rating: ★★★★☆");
        assert!(state_line(&ShelfState::Reviewed(four, "Great".into())).ends_with("Great"));

        Ok(())
    }
}
