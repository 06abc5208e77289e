// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod parser;
pub mod render;
pub mod utils;

use anyhow::Error;
use books::BooksController;
use clap::{App, Arg};
use config::Config;
use controller::{error::ErrorKind, Controller, LocalCoverStore, Score, ToTable};
use engine::{Engine, Session};
use memory::MemoryController;
use parser::{Database, Statement};
use prettytable::Table;
use simplelog::{ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::collections::HashMap;
use std::path::Path;

macro_rules! prompt {
    ($ed:ident) => {{
        prompt!($ed, "", "")
    }};

    ($ed:ident, $db:expr, $user:expr) => {{
        use rustyline::error::ReadlineError;

        let msg = match ($db.is_empty(), $user.is_empty()) {
            (true, _) => format!("{}", PROMPT),
            (false, true) => format!("({}) {}", $db, PROMPT),
            (false, false) => format!("({}:{}) {}", $db, $user, PROMPT),
        };

        match $ed.readline(&msg) {
            Ok(line) => {
                $ed.add_history_entry(line.as_str());
                Ok(line)
            }

            Err(ReadlineError::Interrupted) => {
                continue;
            }

            Err(ReadlineError::Eof) => {
                if $db.is_empty() {
                    println!("Exiting...Good bye!");
                } else {
                    println!("Disconnecting from {}", $db);
                }

                break;
            }

            Err(e) => Err(e),
        }
    }};
}

const VERSION: &str = env!("CARGO_PKG_VERSION");
const PROMPT: &str = ">> ";

const MAIN_HELP: &str = "\
h | help                 Shows this help
q | quit                 Quit
v | version              Shows the version
connect(memory)          Connect to an in-memory catalog
connect(<db>)            Connect to a database from the config";

const CONNECTED_HELP: &str = "\
login('<user>'[, '<email>'])   Log in, admins are matched by e-mail
logout | whoami                Forget or show the current user
books                          List the catalog
search('<term>'[, '<author>']) Search titles, authors and comments
authors                        List every author
popular                        Books ranked by average rating
book(<id>)                     Show a book
favorite(<id>)                 Add a book to your favorites
unfavorite(<id>)               Remove a book from your favorites
rate(<id>, <1-5>)              Rate a book
comment(<id>, '<text>')        Comment a rated book, '' clears it
my_books                       Your favorites, scores and comments
add_book[('<cover path>')]     Add a book (admins)
delete_book(<id>)              Delete a book (admins)
d | disconnect                 Back to the main prompt
q | quit                       Quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Disconnect,
    Quit,
}

fn print_table(table: Option<Table>) {
    match table {
        Some(table) => {
            table.printstd();
        }
        None => println!("{}", render::NO_BOOKS),
    }
}

fn print_error(e: &Error) {
    match e.downcast_ref::<ErrorKind>() {
        Some(ErrorKind::NotFoundById(_)) => println!("Book not found"),
        _ => println!("{}", e),
    }
}

fn print_state<T>(res: Result<Option<T>, Error>, anonymous: &str, show: impl FnOnce(T)) {
    match res {
        Ok(Some(value)) => show(value),
        Ok(None) => println!("{}", anonymous),
        Err(e) => print_error(&e),
    }
}

fn database_connected_prompt<C: Controller>(
    controller: C,
    name: &str,
    config: &Config,
) -> Result<Exit, Error> {
    let engine = Engine::with_controller(&controller).with_admins(config.catalog.admins.clone());
    let covers = LocalCoverStore::new(&config.covers.root, &config.covers.public_url);
    let mut session = Session::anonymous();
    let mut rl = rustyline::Editor::<()>::new();

    loop {
        let user = session.user_id().unwrap_or_default().to_owned();
        let opt: String = prompt!(rl, name, user)?;

        let stmt = match opt.trim() {
            "?" | "h" | "help" => {
                println!("{}", CONNECTED_HELP);
                continue;
            }

            "q" | "quit" => {
                println!("Bye!");
                return Ok(Exit::Quit);
            }

            "d" | "disconnect" => {
                println!("Disconnecting from database {}", name);
                break;
            }

            "v" | "version" => {
                println!("version: {}", VERSION);
                continue;
            }

            empty if empty.is_empty() => continue,

            line => match parser::parse_line(line) {
                Some(stmt) => stmt,
                None => {
                    println!("Invalid syntax");
                    continue;
                }
            },
        };

        match stmt {
            Statement::Connect(_) => println!("Invalid in this context!"),

            Statement::Login(user_id, email) => {
                session = Session::login(&user_id, email.as_deref());
                if engine.is_admin(&session) {
                    println!("Logged in as {} (admin)", user_id);
                } else {
                    println!("Logged in as {}", user_id);
                }
            }

            Statement::Logout => {
                session = Session::anonymous();
                println!("Logged out");
            }

            Statement::WhoAmI => match session.user_id() {
                Some(user_id) => {
                    println!("user: {}", user_id);
                    if let Some(email) = session.email() {
                        println!("email: {}", email);
                    }
                    println!("admin: {}", engine.is_admin(&session));
                }
                None => println!("Not logged in"),
            },

            Statement::Books => match engine.catalog(&session) {
                Ok(catalog) => print_table(render::catalog_table(&catalog)),
                Err(e) => print_error(&e),
            },

            Statement::Search(term, author) => match engine.search(&term, author.as_deref()) {
                Ok(books) => print_table(render::search_table(&books)),
                Err(e) => print_error(&e),
            },

            Statement::Authors => match engine.authors() {
                Ok(authors) if authors.is_empty() => println!("{}", render::NO_BOOKS),
                Ok(authors) => {
                    for author in authors {
                        println!("{}", author);
                    }
                }
                Err(e) => print_error(&e),
            },

            Statement::Popular => match engine.popular() {
                Ok(ranked) => print_table(render::popular_table(&ranked)),
                Err(e) => print_error(&e),
            },

            Statement::Book(id) => match engine.book_detail(&session, &id) {
                Ok(detail) => {
                    render::detail_table(&detail).printstd();
                }
                Err(e) => print_error(&e),
            },

            Statement::Favorite(id) => print_state(
                engine.favorite(&session, &id),
                "Log in to keep favorites",
                |state| println!("{}", render::state_line(&state)),
            ),

            Statement::Unfavorite(id) => print_state(
                engine.unfavorite(&session, &id),
                "Log in to keep favorites",
                |state| println!("{}", render::state_line(&state)),
            ),

            Statement::Rate(id, score) => {
                let res = Score::new(score)
                    .map_err(Error::from)
                    .and_then(|score| engine.rate(&session, &id, score));

                print_state(res, "Log in to rate books", |state| {
                    println!("{}", render::state_line(&state))
                })
            }

            Statement::Comment(id, text) => print_state(
                engine.comment(&session, &id, &text),
                "Log in to comment books",
                |state| println!("{}", render::state_line(&state)),
            ),

            Statement::MyBooks => print_state(
                engine.my_books(&session),
                "Log in to see your books",
                |books| print_table(render::favorites_table(&books)),
            ),

            Statement::AddBook(cover) => {
                if !engine.is_admin(&session) {
                    println!("Only admins can add books");
                    continue;
                }

                let prototype = match utils::build_prototype(&mut rl, controller.fields_for_items())? {
                    Some(prototype) => prototype,
                    None => {
                        println!("Cancelled");
                        continue;
                    }
                };
                let cover = cover.as_deref().map(Path::new);

                print_state(
                    engine.add_book(&session, &prototype, cover, &covers),
                    "Only admins can add books",
                    |book| {
                        println!("Book added!");
                        println!("{}", book.to_table());
                    },
                )
            }

            Statement::DeleteBook(id) => print_state(
                engine.delete_book(&session, &id),
                "Only admins can delete books",
                |book| println!("Deleted '{}'", book.title),
            ),
        }
    }

    Ok(Exit::Disconnect)
}

fn load_config(path: Option<&str>) -> Result<Config, Error> {
    let mut config = match path {
        Some(path) => Config::load(path)?,
        None if Path::new("config.toml").exists() => Config::load("config.toml")?,
        None => Config::default(),
    };

    let vars: HashMap<String, String> = dotenv::vars().collect();
    config.apply_vars(&vars);

    Ok(config)
}

fn connect(database: Database, config: &Config) -> Result<Exit, Error> {
    match database {
        Database::Memory => database_connected_prompt(MemoryController::new(), "memory", config),
        Database::Postgres(name) => {
            let controller = BooksController::from_config(config, &name)?;
            database_connected_prompt(controller, &name, config)
        }
    }
}

fn main() -> Result<(), Error> {
    let matches = App::new("bookshelf")
        .version(VERSION)
        .about("Book catalog with favorites, ratings and comments")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Sets the level of verbosity"),
        )
        .get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let log_config = ConfigBuilder::new()
        .set_thread_level(LevelFilter::Off)
        .set_time_level(LevelFilter::Off)
        .build();
    TermLogger::init(level, log_config, TerminalMode::Mixed)?;

    let config = load_config(matches.value_of("config"))?;

    println!("Welcome to bookshelf {}", VERSION);
    let mut rl = rustyline::Editor::<()>::new();

    loop {
        let opt: String = prompt!(rl)?;

        match opt.trim() {
            "?" | "h" | "help" => {
                println!("Main help:");
                println!("{}", MAIN_HELP);
            }

            "q" | "quit" => {
                println!("Bye!");
                break;
            }

            "v" | "version" => {
                println!("version: {}", VERSION);
            }

            empty if empty.is_empty() => {}

            line => match parser::parse_line(line) {
                Some(Statement::Connect(db)) => match connect(db, &config) {
                    Ok(Exit::Quit) => break,
                    Ok(Exit::Disconnect) => {}
                    Err(e) => println!("{}", e),
                },
                Some(_) => println!("Invalid statement in this context!"),
                None => println!("Invalid syntax!"),
            },
        }
    }

    Ok(())
}
