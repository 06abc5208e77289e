// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod session;
pub mod shelf;

use crate::aggregate::{popular, with_comments, CatalogBook, PopularBook};
use crate::filter::{unique_authors, CatalogFilter};
use crate::shelf::{ShelfState, ShelfWrite, Transition};
use anyhow::Error;
use controller::{
    error::ErrorKind as ControllerError, Book, Controller, CoverStore, NewBook, Score, SearchBy,
    Value,
};
use std::collections::HashMap;
use std::path::Path;

pub use session::Session;

/// Home page listing: every book plus the current user's favorites
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub books: Vec<CatalogBook>,
    /// book id => score of the current user, only favorites are present
    pub favorites: HashMap<String, Option<Score>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookDetail {
    pub book: Book,
    pub state: ShelfState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteBook {
    pub book: Book,
    pub score: Option<Score>,
    pub comment: Option<String>,
}

pub struct Engine<'a, C: Controller> {
    controller: &'a C,
    admins: Vec<String>,
}

impl<'a, C: Controller> Engine<'a, C> {
    pub fn with_controller(controller: &'a C) -> Self {
        Self {
            controller,
            admins: Vec::new(),
        }
    }

    pub fn with_admins(mut self, admins: Vec<String>) -> Self {
        self.admins = admins;
        self
    }

    pub fn is_admin(&self, session: &Session) -> bool {
        session.is_admin(&self.admins)
    }

    pub fn catalog(&self, session: &Session) -> Result<Catalog, Error> {
        let books = self.controller.items()?;
        let rows = self.controller.all_user_books()?;

        let favorites = match session.user_id() {
            Some(user_id) => self
                .controller
                .user_books(user_id)?
                .into_iter()
                .map(|ub| (ub.book_id, ub.score))
                .collect(),
            None => HashMap::new(),
        };

        Ok(Catalog {
            books: with_comments(books, &rows),
            favorites,
        })
    }

    pub fn search(&self, search: &str, author: Option<&str>) -> Result<Vec<CatalogBook>, Error> {
        let books = self.controller.items()?;
        let rows = self.controller.all_user_books()?;
        let filter = CatalogFilter::new(search, author);

        Ok(with_comments(books, &rows)
            .into_iter()
            .filter(|b| filter.matches(b))
            .collect())
    }

    pub fn authors(&self) -> Result<Vec<String>, Error> {
        let mut books = Vec::new();
        for chunk in self.controller.items_by_chunks(500) {
            books.extend(chunk?);
        }

        Ok(unique_authors(&books))
    }

    pub fn popular(&self) -> Result<Vec<PopularBook>, Error> {
        let books = self.controller.items()?;
        let rows = self.controller.all_user_books()?;

        Ok(popular(books, &rows))
    }

    pub fn book(&self, book_id: &str) -> Result<Book, Error> {
        self.controller
            .items_by(&SearchBy::id(book_id))?
            .into_iter()
            .next()
            .ok_or_else(|| ControllerError::NotFoundById(book_id.into()).into())
    }

    pub fn book_detail(&self, session: &Session, book_id: &str) -> Result<BookDetail, Error> {
        let book = self.book(book_id)?;

        let state = match session.user_id() {
            Some(user_id) => {
                let row = self.controller.user_book(user_id, book_id)?;
                ShelfState::from_row(row.as_ref())
            }
            None => ShelfState::NotFavorited,
        };

        Ok(BookDetail { book, state })
    }

    /// `None` when nobody is logged in
    pub fn my_books(&self, session: &Session) -> Result<Option<Vec<FavoriteBook>>, Error> {
        let user_id = match session.user_id() {
            Some(user_id) => user_id,
            None => return Ok(None),
        };

        let rows = self.controller.user_books(user_id)?;
        let mut books: HashMap<String, Book> = self
            .controller
            .items()?
            .into_iter()
            .map(|b| (b.id.clone(), b))
            .collect();

        let favorites = rows
            .into_iter()
            .filter_map(|row| {
                let book = books.remove(&row.book_id)?;
                Some(FavoriteBook {
                    book,
                    score: row.score,
                    comment: row.comment,
                })
            })
            .collect();

        Ok(Some(favorites))
    }

    pub fn favorite(&self, session: &Session, book_id: &str) -> Result<Option<ShelfState>, Error> {
        self.transition(session, book_id, true, |state| Ok(state.favorite()))
    }

    pub fn unfavorite(
        &self,
        session: &Session,
        book_id: &str,
    ) -> Result<Option<ShelfState>, Error> {
        self.transition(session, book_id, false, |state| Ok(state.remove()))
    }

    pub fn rate(
        &self,
        session: &Session,
        book_id: &str,
        score: Score,
    ) -> Result<Option<ShelfState>, Error> {
        self.transition(session, book_id, true, |state| Ok(state.rate(score)))
    }

    pub fn comment(
        &self,
        session: &Session,
        book_id: &str,
        comment: &str,
    ) -> Result<Option<ShelfState>, Error> {
        self.transition(session, book_id, true, |state| {
            state.review(comment).map_err(Error::from)
        })
    }

    /// Writes without an identity are silently dropped, returns the new state
    /// otherwise
    fn transition<F>(
        &self,
        session: &Session,
        book_id: &str,
        needs_book: bool,
        step: F,
    ) -> Result<Option<ShelfState>, Error>
    where
        F: FnOnce(&ShelfState) -> Result<Transition, Error>,
    {
        let user_id = match session.user_id() {
            Some(user_id) => user_id,
            None => {
                log::debug!("Ignoring write on book {} without a user", book_id);
                return Ok(None);
            }
        };

        if needs_book {
            self.book(book_id)?;
        }

        let row = self.controller.user_book(user_id, book_id)?;
        let state = ShelfState::from_row(row.as_ref());
        let Transition { next, write } = step(&state)?;

        match write {
            ShelfWrite::Upsert => {
                self.controller
                    .upsert_user_book(&next.to_row(user_id, book_id))?;
            }
            ShelfWrite::Delete => {
                self.controller.remove_user_book(user_id, book_id)?;
            }
            ShelfWrite::Nothing => {}
        }

        log::debug!("{} on {}: {:?} -> {:?}", user_id, book_id, state, next);
        Ok(Some(next))
    }

    /// Admin only, uploads the cover (if any) before inserting the book
    pub fn add_book(
        &self,
        session: &Session,
        proto: &HashMap<&str, Value>,
        cover: Option<&Path>,
        covers: &dyn CoverStore,
    ) -> Result<Option<Book>, Error> {
        if !self.is_admin(session) {
            log::warn!("Only admins can add books");
            return Ok(None);
        }

        // validate before uploading anything
        NewBook::from_prototype(proto, None)?;

        let cover_url = match cover {
            Some(path) => Some(covers.upload(path)?),
            None => None,
        };

        let book = NewBook::from_prototype(proto, cover_url)?;
        let book = self.controller.insert_item(&book)?;
        log::info!("Added book {} ({})", book.title, book.id);

        Ok(Some(book))
    }

    /// Admin only, removes every association with the book and then the book
    pub fn delete_book(&self, session: &Session, book_id: &str) -> Result<Option<Book>, Error> {
        if !self.is_admin(session) {
            log::warn!("Only admins can delete books");
            return Ok(None);
        }

        // associations reference the book, they go first
        self.book(book_id)?;
        let removed = self.controller.remove_book_ratings(book_id)?;
        let book = self.controller.remove_item(book_id)?;
        log::info!("Deleted book {} and {} associations", book.id, removed);

        Ok(Some(book))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Error;
    use common_macros::hash_map;
    use controller::{NewUserBook, UserBook};
    use memory::MemoryController;
    use std::cell::Cell;
    use std::path::PathBuf;

    const ADMIN: &str = "admin@example.com";

    fn controller() -> Result<(MemoryController, Book, Book), Error> {
        let controller = MemoryController::new();
        let dune = controller.insert_item(&NewBook::new("Dune", "Herbert", "", None))?;
        let emma = controller.insert_item(&NewBook::new("Emma", "Austen", "", None))?;

        Ok((controller, dune, emma))
    }

    fn engine(controller: &MemoryController) -> Engine<MemoryController> {
        Engine::with_controller(controller).with_admins(vec![ADMIN.into()])
    }

    /// Serves the first chunk of books and then loses its connection
    struct Flaky(MemoryController);

    impl Controller for Flaky {
        fn items(&self) -> Result<Vec<Book>, Error> {
            self.0.items()
        }

        fn items_by(&self, by: &SearchBy) -> Result<Vec<Book>, Error> {
            self.0.items_by(by)
        }

        fn items_offset_limit(&self, offset: usize, limit: usize) -> Result<Vec<Book>, Error> {
            if offset > 0 {
                return Err(anyhow::anyhow!("connection lost"));
            }
            self.0.items_offset_limit(offset, limit)
        }

        fn insert_item(&self, book: &NewBook) -> Result<Book, Error> {
            self.0.insert_item(book)
        }

        fn insert_items(&self, books: &[NewBook]) -> Result<usize, Error> {
            self.0.insert_items(books)
        }

        fn remove_item(&self, book_id: &str) -> Result<Book, Error> {
            self.0.remove_item(book_id)
        }

        fn all_user_books(&self) -> Result<Vec<UserBook>, Error> {
            Err(anyhow::anyhow!("connection lost"))
        }

        fn user_books(&self, user_id: &str) -> Result<Vec<UserBook>, Error> {
            self.0.user_books(user_id)
        }

        fn user_book(&self, user_id: &str, book_id: &str) -> Result<Option<UserBook>, Error> {
            self.0.user_book(user_id, book_id)
        }

        fn upsert_user_book(&self, user_book: &NewUserBook) -> Result<UserBook, Error> {
            self.0.upsert_user_book(user_book)
        }

        fn remove_user_book(&self, user_id: &str, book_id: &str) -> Result<Option<UserBook>, Error> {
            self.0.remove_user_book(user_id, book_id)
        }

        fn remove_book_ratings(&self, book_id: &str) -> Result<usize, Error> {
            self.0.remove_book_ratings(book_id)
        }
    }

    struct FakeCovers {
        uploads: Cell<usize>,
    }

    impl CoverStore for FakeCovers {
        fn upload(&self, path: &Path) -> Result<String, Error> {
            self.uploads.set(self.uploads.get() + 1);
            Ok(format!("http://covers/{}", path.display()))
        }
    }

    #[test]
    fn anonymous_writes_are_ignored() -> Result<(), Error> {
        let (controller, dune, _) = controller()?;
        let engine = engine(&controller);
        let nobody = Session::anonymous();

        assert_eq!(engine.favorite(&nobody, &dune.id)?, None);
        assert_eq!(engine.rate(&nobody, &dune.id, Score::new(4)?)?, None);
        assert_eq!(engine.comment(&nobody, &dune.id, "hi")?, None);
        assert_eq!(engine.unfavorite(&nobody, "missing")?, None);
        assert_eq!(engine.my_books(&nobody)?, None);
        assert!(controller.all_user_books()?.is_empty());

        Ok(())
    }

    #[test]
    fn favorite_then_unfavorite() -> Result<(), Error> {
        let (controller, dune, _) = controller()?;
        let engine = engine(&controller);
        let ana = Session::login("ana", None);

        assert_eq!(engine.favorite(&ana, &dune.id)?, Some(ShelfState::Unrated));
        assert_eq!(engine.catalog(&ana)?.favorites.get(&dune.id), Some(&None));

        assert_eq!(engine.unfavorite(&ana, &dune.id)?, Some(ShelfState::NotFavorited));
        assert!(controller.all_user_books()?.is_empty());

        Ok(())
    }

    #[test]
    fn rating_twice_keeps_one_row() -> Result<(), Error> {
        let (controller, dune, _) = controller()?;
        let engine = engine(&controller);
        let ana = Session::login("ana", None);

        engine.rate(&ana, &dune.id, Score::new(3)?)?;
        engine.rate(&ana, &dune.id, Score::new(5)?)?;

        let rows = controller.all_user_books()?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].score, Some(Score::new(5)?));

        Ok(())
    }

    #[test]
    fn comment_requires_rating() -> Result<(), Error> {
        let (controller, dune, _) = controller()?;
        let engine = engine(&controller);
        let ana = Session::login("ana", None);

        engine.favorite(&ana, &dune.id)?;
        let err = engine.comment(&ana, &dune.id, "spice!").unwrap_err();
        assert!(err.downcast_ref::<error::ErrorKind>().is_some());

        engine.rate(&ana, &dune.id, Score::new(4)?)?;
        let state = engine.comment(&ana, &dune.id, "Spice!")?;
        assert_eq!(state, Some(ShelfState::Reviewed(Score::new(4)?, "Spice!".into())));

        let detail = engine.book_detail(&ana, &dune.id)?;
        assert_eq!(detail.state.comment(), Some("Spice!"));

        Ok(())
    }

    #[test]
    fn missing_book_is_not_found() -> Result<(), Error> {
        let (controller, _, _) = controller()?;
        let engine = engine(&controller);
        let ana = Session::login("ana", None);

        let err = engine.book_detail(&ana, "missing").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ControllerError>(),
            Some(ControllerError::NotFoundById(_))
        ));

        assert!(engine.favorite(&ana, "missing").is_err());
        assert!(controller.all_user_books()?.is_empty());

        Ok(())
    }

    #[test]
    fn last_write_wins_between_sessions() -> Result<(), Error> {
        let (controller, dune, _) = controller()?;
        let engine = engine(&controller);
        let first_tab = Session::login("ana", None);
        let second_tab = Session::login("ana", None);

        engine.rate(&first_tab, &dune.id, Score::new(2)?)?;
        engine.comment(&first_tab, &dune.id, "meh")?;
        engine.rate(&second_tab, &dune.id, Score::new(5)?)?;

        let rows = controller.user_books("ana")?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].score, Some(Score::new(5)?));
        assert_eq!(rows[0].comment.as_deref(), Some("meh"));

        Ok(())
    }

    #[test]
    fn search_uses_everyones_comments() -> Result<(), Error> {
        let (controller, dune, _) = controller()?;
        let engine = engine(&controller);

        let bob = Session::login("bob", None);
        engine.rate(&bob, &dune.id, Score::new(5)?)?;
        engine.comment(&bob, &dune.id, "Sandworms everywhere")?;

        let found = engine.search("SANDWORM", None)?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].book.title, "Dune");

        let found = engine.search("", Some("Austen"))?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].book.title, "Emma");

        assert_eq!(engine.authors()?, vec!["Austen", "Herbert"]);

        Ok(())
    }

    #[test]
    fn popular_ranking() -> Result<(), Error> {
        let (controller, dune, emma) = controller()?;
        let engine = engine(&controller);

        controller.upsert_user_book(&NewUserBook::new("ana", &emma.id, Some(Score::new(4)?), None))?;
        controller.upsert_user_book(&NewUserBook::new("bob", &emma.id, Some(Score::new(5)?), None))?;
        controller.upsert_user_book(&NewUserBook::new("bob", &dune.id, None, None))?;

        let ranked = engine.popular()?;
        assert_eq!(ranked[0].book.id, emma.id);
        assert_eq!(ranked[0].average, Some(4.5));
        assert_eq!(ranked[1].average, None);

        Ok(())
    }

    #[test]
    fn my_books_skip_deleted_books() -> Result<(), Error> {
        let (controller, dune, emma) = controller()?;
        let engine = engine(&controller);
        let ana = Session::login("ana", None);

        engine.favorite(&ana, &dune.id)?;
        engine.rate(&ana, &emma.id, Score::new(3)?)?;
        assert!(controller.remove_item(&dune.id).is_err());

        let admin = Session::login("root", Some(ADMIN));
        engine.delete_book(&admin, &dune.id)?;

        let mine = engine.my_books(&ana)?.unwrap_or_default();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].book.title, "Emma");
        assert_eq!(mine[0].score, Some(Score::new(3)?));

        Ok(())
    }

    #[test]
    fn only_admins_add_and_delete() -> Result<(), Error> {
        let (controller, dune, _) = controller()?;
        let engine = engine(&controller);
        let covers = FakeCovers {
            uploads: Cell::new(0),
        };

        let proto = hash_map! {
            "title" => Value::String("Persuasion".into()),
            "author" => Value::String("Austen".into()),
        };
        let cover = PathBuf::from("persuasion.jpg");

        let reader = Session::login("ana", Some("ana@example.com"));
        assert_eq!(engine.add_book(&reader, &proto, Some(&cover), &covers)?, None);
        assert_eq!(engine.delete_book(&reader, &dune.id)?, None);
        assert_eq!(covers.uploads.get(), 0);
        assert_eq!(controller.items()?.len(), 2);

        let admin = Session::login("root", Some(ADMIN));
        let added = engine.add_book(&admin, &proto, Some(&cover), &covers)?;
        let added = added.expect("admin can add books");
        assert_eq!(added.cover_url.as_deref(), Some("http://covers/persuasion.jpg"));
        assert_eq!(covers.uploads.get(), 1);
        assert_eq!(engine.book(&added.id)?.title_lowercase, "persuasion");

        Ok(())
    }

    #[test]
    fn invalid_book_uploads_nothing() -> Result<(), Error> {
        let (controller, _, _) = controller()?;
        let engine = engine(&controller);
        let covers = FakeCovers {
            uploads: Cell::new(0),
        };

        let admin = Session::login("root", Some(ADMIN));
        let proto = hash_map! { "title" => Value::String("No author".into()) };
        let cover = PathBuf::from("cover.png");

        assert!(engine.add_book(&admin, &proto, Some(&cover), &covers).is_err());
        assert_eq!(covers.uploads.get(), 0);

        Ok(())
    }

    #[test]
    fn delete_cascades_associations() -> Result<(), Error> {
        let (controller, dune, emma) = controller()?;
        let engine = engine(&controller);

        engine.favorite(&Session::login("ana", None), &dune.id)?;
        engine.rate(&Session::login("bob", None), &dune.id, Score::new(2)?)?;
        engine.favorite(&Session::login("bob", None), &emma.id)?;

        let admin = Session::login("root", Some(ADMIN));
        let deleted = engine.delete_book(&admin, &dune.id)?;
        assert_eq!(deleted.map(|b| b.title), Some("Dune".to_string()));

        let rows = controller.all_user_books()?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].book_id, emma.id);

        Ok(())
    }

    #[test]
    fn store_errors_are_not_hidden() -> Result<(), Error> {
        let (controller, _, _) = controller()?;
        let flaky = Flaky(controller);
        let engine = Engine::with_controller(&flaky);

        let mut chunks = flaky.items_by_chunks(1);
        assert!(matches!(chunks.next(), Some(Ok(_))));
        assert!(matches!(chunks.next(), Some(Err(_))));
        assert!(chunks.next().is_none());

        assert!(engine.authors().is_err());
        assert!(engine.popular().is_err());

        Ok(())
    }
}
