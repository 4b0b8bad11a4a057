//! Naming conventions turning property names into wire names.
//!
//! Names are split into words at `_`, `-` and spaces, at lower to upper case
//! changes, and before the last capital of an upper case run followed by a
//! lower case letter (`HTTPServer` is `HTTP` + `Server`).
//!
//! # Examples
//!
//! ```
//! use tg_codec::naming::{CamelCase, KebabCase, NamingConvention, PascalCase, SnakeCase};
//!
//! assert_eq!(CamelCase.convert("created_at"), "createdAt");
//! assert_eq!(PascalCase.convert("created_at"), "CreatedAt");
//! assert_eq!(SnakeCase.convert("createdAt"), "created_at");
//! assert_eq!(KebabCase.convert("HTTPServer"), "http-server");
//! ```

use alloc::string::String;
use alloc::vec::Vec;

// -----------------------------------------------------------------------------
// NamingConvention

/// Converts a property name into its wire name.
pub trait NamingConvention: Send + Sync {
    fn convert(&self, name: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CamelCase;

#[derive(Debug, Clone, Copy, Default)]
pub struct PascalCase;

#[derive(Debug, Clone, Copy, Default)]
pub struct SnakeCase;

#[derive(Debug, Clone, Copy, Default)]
pub struct KebabCase;

impl NamingConvention for CamelCase {
    fn convert(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len());
        for (index, word) in split_words(name).into_iter().enumerate() {
            if index == 0 {
                out.extend(word.chars().flat_map(char::to_lowercase));
            } else {
                push_capitalized(&mut out, word);
            }
        }
        out
    }
}

impl NamingConvention for PascalCase {
    fn convert(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len());
        for word in split_words(name) {
            push_capitalized(&mut out, word);
        }
        out
    }
}

impl NamingConvention for SnakeCase {
    #[inline]
    fn convert(&self, name: &str) -> String {
        join_lowercase(name, '_')
    }
}

impl NamingConvention for KebabCase {
    #[inline]
    fn convert(&self, name: &str) -> String {
        join_lowercase(name, '-')
    }
}

// -----------------------------------------------------------------------------
// Word splitting

fn split_words(name: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = name.char_indices().collect();
    let mut words = Vec::new();
    let mut start: Option<usize> = None;

    for (position, &(offset, c)) in chars.iter().enumerate() {
        if matches!(c, '_' | '-' | ' ') {
            if let Some(begin) = start.take() {
                words.push(&name[begin..offset]);
            }
            continue;
        }
        let Some(begin) = start else {
            start = Some(offset);
            continue;
        };
        let previous = chars[position - 1].1;
        let next_is_lower = chars.get(position + 1).is_some_and(|(_, n)| n.is_lowercase());
        let boundary = c.is_uppercase()
            && (previous.is_lowercase() || previous.is_ascii_digit() || (previous.is_uppercase() && next_is_lower));
        if boundary {
            words.push(&name[begin..offset]);
            start = Some(offset);
        }
    }
    if let Some(begin) = start {
        words.push(&name[begin..]);
    }
    words
}

fn push_capitalized(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.extend(chars.flat_map(char::to_lowercase));
    }
}

fn join_lowercase(name: &str, separator: char) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (index, word) in split_words(name).into_iter().enumerate() {
        if index > 0 {
            out.push(separator);
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{CamelCase, KebabCase, NamingConvention, PascalCase, SnakeCase, split_words};

    #[test]
    fn splits_on_separators_and_case() {
        assert_eq!(split_words("user_name"), ["user", "name"]);
        assert_eq!(split_words("userName"), ["user", "Name"]);
        assert_eq!(split_words("HTTPServer"), ["HTTP", "Server"]);
        assert_eq!(split_words("__private--field "), ["private", "field"]);
        assert_eq!(split_words("v2Api"), ["v2", "Api"]);
        assert_eq!(split_words(""), Vec::<&str>::new());
    }

    #[test]
    fn conventions() {
        assert_eq!(CamelCase.convert("UserName"), "userName");
        assert_eq!(CamelCase.convert("user-id"), "userId");
        assert_eq!(PascalCase.convert("userName"), "UserName");
        assert_eq!(SnakeCase.convert("UserName"), "user_name");
        assert_eq!(KebabCase.convert("user_name"), "user-name");
        assert_eq!(SnakeCase.convert("id"), "id");
    }
}
