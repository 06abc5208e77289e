// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod volumes;

use crate::volumes::{transform_volume, Volume, VolumesPage};
use anyhow::Error;
use config::ImportConfig;
use controller::{Controller, NewBook};
use indicatif::ProgressBar;
use thiserror::Error as DError;

#[derive(Debug, Clone, DError)]
pub enum ErrorKind {
    #[error("Page size should be between 1 and 40, got {0}")]
    InvalidPageSize(usize),
}

/// Where volumes come from, a page is empty once the source runs out
pub trait VolumeSource {
    fn fetch_page(&self, start_index: usize, max_results: usize) -> Result<Vec<Volume>, Error>;
}

/// Blocking client for the Google Books volumes endpoint
pub struct GoogleBooks {
    client: reqwest::blocking::Client,
    api_url: String,
    subject: String,
    api_key: String,
}

impl GoogleBooks {
    pub fn from_config(config: &ImportConfig) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder().build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            subject: config.subject.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

impl VolumeSource for GoogleBooks {
    fn fetch_page(&self, start_index: usize, max_results: usize) -> Result<Vec<Volume>, Error> {
        let mut query = vec![
            ("q", format!("subject:{}", self.subject)),
            ("printType", "books".to_string()),
            ("startIndex", start_index.to_string()),
            ("maxResults", max_results.to_string()),
        ];

        if !self.api_key.is_empty() {
            query.push(("key", self.api_key.clone()));
        }

        let page: VolumesPage = self
            .client
            .get(&self.api_url)
            .query(&query)
            .send()?
            .error_for_status()?
            .json()?;

        Ok(page.items.unwrap_or_default())
    }
}

/// Fetch pages until the source runs out or `max_books` were fetched,
/// every page is stored right away. Returns how many books were inserted.
pub fn import_books<S, C>(
    source: &S,
    controller: &C,
    page_size: usize,
    max_books: usize,
    progress: &ProgressBar,
) -> Result<usize, Error>
where
    S: VolumeSource + ?Sized,
    C: Controller + ?Sized,
{
    if page_size == 0 || page_size > 40 {
        return Err(ErrorKind::InvalidPageSize(page_size).into());
    }

    let mut fetched = 0;
    let mut inserted = 0;

    while fetched < max_books {
        let max_results = page_size.min(max_books - fetched);
        let volumes = source.fetch_page(fetched, max_results)?;

        if volumes.is_empty() {
            log::info!("No more volumes after {} books", fetched);
            break;
        }

        let books: Vec<NewBook> = volumes.iter().map(transform_volume).collect();
        inserted += controller.insert_items(&books)?;
        fetched += volumes.len();

        log::info!("Imported page at {} with {} books", fetched - volumes.len(), volumes.len());
        progress.set_position(fetched.min(max_books) as u64);
    }

    progress.finish();
    Ok(inserted)
}
