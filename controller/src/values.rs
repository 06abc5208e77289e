// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use std::fmt::{self, Display};

/// Kind of input a prototype field expects, every book field is text
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Type {
    String,
}

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::String => write!(f, "string"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Field<'a> {
    Required(&'a str, Type),
    Optional(&'a str, Type),
}

impl<'a> Field<'a> {
    pub fn is_optional(&self) -> bool {
        matches!(self, Field::Optional(..))
    }

    pub fn into_tuple(self) -> (&'a str, Type) {
        match self {
            Field::Required(name, ty) | Field::Optional(name, ty) => (name, ty),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Value {
    String(String),
}

impl Value {
    pub fn from_str(value: &str, tp: Type) -> Self {
        match tp {
            Type::String => Self::String(value.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::String(s) => s,
        }
    }
}
