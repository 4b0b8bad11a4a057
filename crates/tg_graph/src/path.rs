//! The path grammar used for diagnostics and `$ref` markers.
//!
//! - Root: `$`
//! - Index: `[Number]`, e.g. `[1]`
//! - Member: `['Name']`, e.g. `['field_0']`, with `'` and `\` escaped by `\`

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Write};

// -----------------------------------------------------------------------------
// PathKey

/// One step of a [`Path`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathKey {
    Index(usize),
    Member(String),
}

impl PathKey {
    /// Appends the rendered key to `out`.
    pub fn write_to(&self, out: &mut String) {
        // Writing into a `String` cannot fail.
        let _ = write!(out, "{self}");
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "[{index}]"),
            Self::Member(name) => {
                f.write_str("['")?;
                for c in name.chars() {
                    if c == '\'' || c == '\\' {
                        f.write_char('\\')?;
                    }
                    f.write_char(c)?;
                }
                f.write_str("']")
            }
        }
    }
}

impl From<usize> for PathKey {
    #[inline]
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

impl From<&str> for PathKey {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Member(String::from(value))
    }
}

impl From<String> for PathKey {
    #[inline]
    fn from(value: String) -> Self {
        Self::Member(value)
    }
}

// -----------------------------------------------------------------------------
// ParseError

/// Path parsing error information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError<'a> {
    /// Position in `path`.
    pub offset: usize,
    /// The path that the error occurred in.
    pub path: &'a str,
    /// The underlying error.
    pub error: Cow<'static, str>,
}

impl fmt::Display for ParseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Encountered an error at offset {} while parsing `{}`: {}",
            self.offset, self.path, self.error,
        )
    }
}

impl core::error::Error for ParseError<'_> {}

// -----------------------------------------------------------------------------
// Path

/// A chain of [`PathKey`]s rooted at `$`.
///
/// # Examples
///
/// ```
/// use tg_graph::{Path, PathKey};
///
/// let path = Path::root().child(PathKey::from("items")).child(PathKey::Index(2));
/// assert_eq!(path.to_string(), "$['items'][2]");
/// assert_eq!(Path::parse("$['items'][2]").unwrap(), path);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path {
    keys: Vec<PathKey>,
}

impl Path {
    /// The root path `$`.
    #[inline]
    pub const fn root() -> Self {
        Self { keys: Vec::new() }
    }

    #[inline]
    pub fn keys(&self) -> &[PathKey] {
        &self.keys
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub fn push(&mut self, key: PathKey) {
        self.keys.push(key);
    }

    /// Returns this path extended by `key`.
    #[inline]
    pub fn child(mut self, key: PathKey) -> Self {
        self.keys.push(key);
        self
    }

    /// Parses a rendered path.
    pub fn parse(path: &str) -> Result<Self, ParseError<'_>> {
        let error = |offset: usize, error: &'static str| ParseError {
            offset,
            path,
            error: Cow::Borrowed(error),
        };

        let bytes = path.as_bytes();
        if bytes.first() != Some(&b'$') {
            return Err(error(0, "path must start with `$`"));
        }

        let mut keys = Vec::new();
        let mut offset = 1;
        while offset < bytes.len() {
            if bytes[offset] != b'[' {
                return Err(error(offset, "expected `[`"));
            }
            offset += 1;
            match bytes.get(offset) {
                Some(b'\'') => {
                    offset += 1;
                    let mut name = String::new();
                    let mut chars = path[offset..].char_indices();
                    let mut closed = None;
                    while let Some((at, c)) = chars.next() {
                        match c {
                            '\\' => match chars.next() {
                                Some((_, escaped)) => name.push(escaped),
                                None => return Err(error(offset + at, "dangling escape")),
                            },
                            '\'' => {
                                closed = Some(at);
                                break;
                            }
                            _ => name.push(c),
                        }
                    }
                    let Some(at) = closed else {
                        return Err(error(path.len(), "unterminated member name"));
                    };
                    offset += at + 1;
                    if bytes.get(offset) != Some(&b']') {
                        return Err(error(offset, "expected `]`"));
                    }
                    offset += 1;
                    keys.push(PathKey::Member(name));
                }
                Some(b'0'..=b'9') => {
                    let start = offset;
                    while matches!(bytes.get(offset), Some(b'0'..=b'9')) {
                        offset += 1;
                    }
                    let index = path[start..offset]
                        .parse::<usize>()
                        .map_err(|_| error(start, "index out of range"))?;
                    if bytes.get(offset) != Some(&b']') {
                        return Err(error(offset, "expected `]`"));
                    }
                    offset += 1;
                    keys.push(PathKey::Index(index));
                }
                _ => return Err(error(offset, "expected an index or a quoted member")),
            }
        }

        Ok(Self { keys })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('$')?;
        for key in &self.keys {
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

impl FromIterator<PathKey> for Path {
    fn from_iter<T: IntoIterator<Item = PathKey>>(iter: T) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}
