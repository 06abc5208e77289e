// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

mod basics;

use basics::{parse_ident, parse_number, parse_separator, parse_string};
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::char;
use nom::combinator::{map, opt};
use nom::sequence::{delimited, preceded, separated_pair, tuple};
use nom::IResult;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Database {
    Memory,
    /// A PostgreSQL database from the `[databases]` table
    Postgres(String),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Statement {
    Connect(Database),
    Login(String, Option<String>),
    Logout,
    WhoAmI,
    Books,
    Search(String, Option<String>),
    Authors,
    Popular,
    Book(String),
    Favorite(String),
    Unfavorite(String),
    Rate(String, i64),
    Comment(String, String),
    MyBooks,
    AddBook(Option<String>),
    DeleteBook(String),
}

fn parse_database(input: &str) -> IResult<&str, Database> {
    map(parse_ident, |name| match name {
        "memory" => Database::Memory,
        name => Database::Postgres(name.into()),
    })(input)
}

fn parse_connect(input: &str) -> IResult<&str, Statement> {
    map(
        preceded(
            tag("connect"),
            delimited(char('('), parse_database, char(')')),
        ),
        Statement::Connect,
    )(input)
}

fn parse_login(input: &str) -> IResult<&str, Statement> {
    let (input, (user, email)) = preceded(
        tag("login"),
        delimited(
            char('('),
            tuple((parse_string, opt(preceded(parse_separator, parse_string)))),
            char(')'),
        ),
    )(input)?;

    Ok((input, Statement::Login(user, email)))
}

fn parse_search(input: &str) -> IResult<&str, Statement> {
    let (input, (term, author)) = preceded(
        tag("search"),
        delimited(
            char('('),
            tuple((parse_string, opt(preceded(parse_separator, parse_string)))),
            char(')'),
        ),
    )(input)?;

    Ok((input, Statement::Search(term, author)))
}

fn parse_by_id<'a>(
    name: &'static str,
    statement: fn(String) -> Statement,
) -> impl Fn(&'a str) -> IResult<&'a str, Statement> {
    map(
        preceded(tag(name), delimited(char('('), parse_ident, char(')'))),
        move |id: &str| statement(id.into()),
    )
}

fn parse_rate(input: &str) -> IResult<&str, Statement> {
    let (input, (id, score)) = preceded(
        tag("rate"),
        delimited(
            char('('),
            separated_pair(parse_ident, parse_separator, parse_number),
            char(')'),
        ),
    )(input)?;

    Ok((input, Statement::Rate(id.into(), score)))
}

fn parse_comment(input: &str) -> IResult<&str, Statement> {
    let (input, (id, text)) = preceded(
        tag("comment"),
        delimited(
            char('('),
            separated_pair(parse_ident, parse_separator, parse_string),
            char(')'),
        ),
    )(input)?;

    Ok((input, Statement::Comment(id.into(), text)))
}

fn parse_add_book(input: &str) -> IResult<&str, Statement> {
    let (input, cover) = preceded(
        tag("add_book"),
        opt(delimited(char('('), parse_string, char(')'))),
    )(input)?;

    Ok((input, Statement::AddBook(cover)))
}

fn parse_keyword(input: &str) -> IResult<&str, Statement> {
    alt((
        map(tag("logout"), |_| Statement::Logout),
        map(tag("whoami"), |_| Statement::WhoAmI),
        map(tag("my_books"), |_| Statement::MyBooks),
        map(tag("books"), |_| Statement::Books),
        map(tag("authors"), |_| Statement::Authors),
        map(tag("popular"), |_| Statement::Popular),
    ))(input)
}

fn parse_statement(input: &str) -> IResult<&str, Statement> {
    alt((
        parse_connect,
        parse_login,
        parse_search,
        parse_rate,
        parse_comment,
        parse_add_book,
        parse_by_id("delete_book", Statement::DeleteBook),
        parse_by_id("unfavorite", Statement::Unfavorite),
        parse_by_id("favorite", Statement::Favorite),
        parse_by_id("book", Statement::Book),
        parse_keyword,
    ))(input)
}

pub fn parse_line(input: &str) -> Option<Statement> {
    let input = input.trim();
    let (rest, statement) = parse_statement(input).ok()?;

    if rest.is_empty() {
        Some(statement)
    } else {
        None
    }
}
