// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use controller::NewBook;
use serde::Deserialize;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// A page of the volumes endpoint, `items` is missing past the last page
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct VolumesPage {
    #[serde(default)]
    pub items: Option<Vec<Volume>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    #[serde(default)]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub description: Option<String>,
    pub image_links: Option<ImageLinks>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Map a volume into a book ready to be stored, filling the blanks
pub fn transform_volume(volume: &Volume) -> NewBook {
    let info = &volume.volume_info;

    let title = trimmed(info.title.as_deref()).unwrap_or(UNKNOWN_TITLE);
    let author = info
        .authors
        .as_ref()
        .and_then(|authors| trimmed(authors.first().map(String::as_str)))
        .unwrap_or(UNKNOWN_AUTHOR);
    let description = trimmed(info.description.as_deref()).unwrap_or_default();
    let cover_url = info
        .image_links
        .as_ref()
        .and_then(|links| links.thumbnail.clone());

    let mut book = NewBook::new(title, author, description, cover_url);
    // lowercase of what the API sent, not of the placeholder
    book.title_lowercase = info
        .title
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();

    book
}
