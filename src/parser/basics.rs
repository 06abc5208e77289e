// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use nom::branch::alt;
use nom::bytes::complete::{is_not, tag, take_while, take_while1};
use nom::character::complete::{char, digit1};
use nom::combinator::{map, map_res, opt, recognize};
use nom::multi::fold_many0;
use nom::sequence::{delimited, pair};
use nom::IResult;

pub(crate) fn parse_ident(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-')(input)
}

fn parse_fragment(input: &str) -> IResult<&str, &str> {
    alt((
        is_not("\\'"),
        map(tag("\\'"), |_| "'"),
        map(tag("\\\\"), |_| "\\"),
    ))(input)
}

/// Single quoted, may be empty, `\'` and `\\` escape a quote and a backslash
pub(crate) fn parse_string(input: &str) -> IResult<&str, String> {
    delimited(
        char('\''),
        fold_many0(parse_fragment, String::new(), |mut acc: String, fragment| {
            acc.push_str(fragment);
            acc
        }),
        char('\''),
    )(input)
}

pub(crate) fn parse_number(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i64>()
    })(input)
}

pub(crate) fn parse_separator(input: &str) -> IResult<&str, &str> {
    delimited(
        take_while(|c: char| c == ' '),
        tag(","),
        take_while(|c: char| c == ' '),
    )(input)
}
