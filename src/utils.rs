// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use anyhow::Error;
use controller::{Field, Type, Value};
use rustyline::Editor;
use std::collections::HashMap;

macro_rules! field {
    ($ed:ident, $name:expr, $opt:expr, $ty:expr) => {{
        use rustyline::error::ReadlineError;

        let kind = if $opt { "optional" } else { "required" };
        let msg = format!("{}{} ({}, {}): ", $crate::PROMPT, $name, kind, $ty);

        match $ed.readline(&msg) {
            Ok(line) => Ok(Some(line)),

            // CTRL-D
            Err(ReadlineError::Eof) => Ok(None),

            Err(e) => Err(e),
        }
    }};
}

/// What to do with the answer given for a field
#[derive(Debug, Clone, PartialEq)]
enum Answer {
    Value(Value),
    Skip,
    Retry,
    Cancel,
}

/// `None` is CTRL-D, blank answers count as no answer
fn read_answer(input: Option<&str>, ty: Type, is_optional: bool) -> Answer {
    let input = match input.map(str::trim) {
        Some(input) => input,
        None if is_optional => return Answer::Skip,
        None => return Answer::Cancel,
    };

    if !input.is_empty() {
        Answer::Value(Value::from_str(input, ty))
    } else if is_optional {
        Answer::Skip
    } else {
        Answer::Retry
    }
}

/// Ask for every field of a new book. Blank required fields are asked again,
/// CTRL-D on a required field cancels the whole prototype.
pub(crate) fn build_prototype<'a>(
    rl: &mut Editor<()>,
    fields: Vec<Field<'a>>,
) -> Result<Option<HashMap<&'a str, Value>>, Error> {
    println!("Leave an optional field blank to skip it, CTRL-D cancels");
    let mut prototype = HashMap::new();

    for field in fields {
        let is_optional = field.is_optional();
        let (name, ty) = field.into_tuple();

        loop {
            let input: Option<String> = field!(rl, name, is_optional, ty)?;

            match read_answer(input.as_deref(), ty, is_optional) {
                Answer::Value(value) => {
                    prototype.insert(name, value);
                    break;
                }

                Answer::Skip => break,

                Answer::Cancel => return Ok(None),

                Answer::Retry => {
                    log::error!("Field '{}' is required, cannot be empty!", name);
                }
            }
        }
    }

    Ok(Some(prototype))
}
