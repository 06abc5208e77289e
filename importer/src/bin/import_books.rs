// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use anyhow::Error;
use books::BooksController;
use config::Config;
use importer::{import_books, GoogleBooks};
use indicatif::ProgressBar;
use simplelog::{ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::collections::HashMap;
use std::path::Path;

fn main() -> Result<(), Error> {
    let log_config = ConfigBuilder::new()
        .set_thread_level(LevelFilter::Off)
        .set_time_level(LevelFilter::Off)
        .build();
    TermLogger::init(LevelFilter::Info, log_config, TerminalMode::Mixed)?;

    let mut config = if Path::new("config.toml").exists() {
        Config::load("config.toml")?
    } else {
        Config::default()
    };

    let vars: HashMap<String, String> = dotenv::vars().collect();
    config.apply_vars(&vars);

    let controller = BooksController::from_config(&config, "books")?;
    let source = GoogleBooks::from_config(&config.import)?;

    println!("Importing '{}' books...", config.import.subject);
    let progress = ProgressBar::new(config.import.max_books as u64);
    let total = import_books(
        &source,
        &controller,
        config.import.page_size,
        config.import.max_books,
        &progress,
    )?;

    println!("Done importing books. ({} total)", total);
    Ok(())
}
