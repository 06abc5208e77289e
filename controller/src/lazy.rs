// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::{Book, Controller};
use anyhow::Error;

/// Walks the whole catalog by chunks of `chunk_size` books. Ends on the first
/// empty chunk, a failing query is yielded once and ends it too.
pub struct LazyItemChunks<'a, C: ?Sized> {
    pub(crate) curr_offset: usize,
    pub(crate) chunk_size: usize,
    pub(crate) controller: &'a C,
    pub(crate) done: bool,
}

impl<'a, C> Iterator for LazyItemChunks<'a, C>
where
    C: Controller + ?Sized,
{
    type Item = Result<Vec<Book>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let offset = self.curr_offset;
        let items = self.controller.items_offset_limit(offset, self.chunk_size);

        self.curr_offset += self.chunk_size;
        match items {
            Ok(items) if items.is_empty() => {
                self.done = true;
                None
            }
            Ok(items) => Some(Ok(items)),
            Err(e) => {
                log::warn!("Chunked read failed at offset {}: {}", offset, e);
                self.done = true;
                Some(Err(e))
            }
        }
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.curr_offset = n * self.chunk_size;
        self.next()
    }
}
