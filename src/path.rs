//! Normalized paths locating values inside validated data.
//!
//! Every error produced by a compiled procedure carries a [`JsonPath`]. The
//! rendering is the normalized dotted/indexed form (`user.tags[2]`), and the
//! top-level value renders as `root`. Keys the dotted form cannot carry (empty,
//! or containing `.`, brackets, quotes or backslashes) are written as JSON
//! strings in brackets: `meta["a.b"]`. Code generated outside this crate can
//! stay consistent with these paths by going through [`JsonPath::from_access_chain`]
//! and the `Display`/`FromStr` pair.

use std::fmt::{self, Display};
use std::str::FromStr;

/// Rendering of the path that points at the top-level value.
pub const ROOT: &str = "root";

/// A segment of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object property access (e.g., `user`, `email`)
    Field(String),
    /// An array index access (e.g., `[0]`, `[42]`)
    Index(usize),
}

impl PathSegment {
    /// Creates a new field segment.
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

/// A path to a value in a nested structure.
///
/// Paths are built purely from the access chain used to reach a value, never
/// by looking anything up in the data.
///
/// # Example
///
/// ```rust
/// use shapecheck::JsonPath;
///
/// let path = JsonPath::root()
///     .push_field("user")
///     .push_field("tags")
///     .push_index(2);
///
/// assert_eq!(path.to_string(), "user.tags[2]");
/// assert_eq!(JsonPath::root().to_string(), "root");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// Creates an empty path representing the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a single field segment.
    pub fn from_field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Field(name.into())],
        }
    }

    /// Creates a path from a single index segment.
    pub fn from_index(idx: usize) -> Self {
        Self {
            segments: vec![PathSegment::Index(idx)],
        }
    }

    /// Creates a path from already collected segments.
    pub fn from_segments(segments: impl Into<Vec<PathSegment>>) -> Self {
        Self {
            segments: segments.into(),
        }
    }

    /// Parses a bracketed access chain such as `['user']['tags'][2]`.
    ///
    /// An optional leading variable name (`input['user']`) is ignored, so
    /// generated accessors can be passed through verbatim. An empty chain is
    /// the root path.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shapecheck::JsonPath;
    ///
    /// let path = JsonPath::from_access_chain("data['user'][\"tags\"][2]").unwrap();
    /// assert_eq!(path.to_string(), "user.tags[2]");
    /// ```
    pub fn from_access_chain(chain: &str) -> Result<Self, PathParseError> {
        let chain = chain.trim();
        let start = chain.find('[').unwrap_or(chain.len());
        let mut segments = Vec::new();
        let mut rest = &chain[start..];

        while !rest.is_empty() {
            let body_end = rest
                .find(']')
                .ok_or_else(|| PathParseError::Unterminated(chain.to_string()))?;
            let body = rest[1..body_end].trim();

            let quoted = body.len() >= 2
                && ((body.starts_with('\'') && body.ends_with('\''))
                    || (body.starts_with('"') && body.ends_with('"')));

            if quoted {
                segments.push(PathSegment::Field(body[1..body.len() - 1].to_string()));
            } else {
                let idx = body
                    .parse::<usize>()
                    .map_err(|_| PathParseError::InvalidIndex(body.to_string()))?;
                segments.push(PathSegment::Index(idx));
            }

            rest = &rest[body_end + 1..];
            if !rest.is_empty() && !rest.starts_with('[') {
                return Err(PathParseError::Unexpected(rest.to_string()));
            }
        }

        Ok(Self { segments })
    }

    /// Returns a new path with a field segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the parent path, or None if this is root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            None
        } else {
            Some(Self {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        }
    }

    /// Returns the last segment, or None if this is root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }
}

impl Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str(ROOT);
        }

        let lone = self.segments.len() == 1;
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if needs_quoting(name, lone) => {
                    let quoted = serde_json::to_string(name).map_err(|_| fmt::Error)?;
                    write!(f, "[{}]", quoted)?;
                }
                PathSegment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

/// Keys that the dotted form cannot carry are written as `["a.b"]`. A lone
/// `root` key is quoted too, so it is not read back as the top-level path.
fn needs_quoting(name: &str, lone: bool) -> bool {
    name.is_empty()
        || (lone && name == ROOT)
        || name.contains(['.', '[', ']', '"', '\\'])
}

impl FromStr for JsonPath {
    type Err = PathParseError;

    /// Parses the normalized form produced by `Display`, including quoted
    /// keys, so every rendered path reads back to the same segments.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == ROOT {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        let mut rest = s;
        while !rest.is_empty() {
            if let Some(bracket) = rest.strip_prefix('[') {
                let (segment, tail) = if bracket.starts_with('"') {
                    let (key, tail) = quoted_key(bracket, s)?;
                    (PathSegment::Field(key), tail)
                } else {
                    let end = bracket
                        .find(']')
                        .ok_or_else(|| PathParseError::Unterminated(s.to_string()))?;
                    let body = &bracket[..end];
                    let idx = body
                        .parse::<usize>()
                        .map_err(|_| PathParseError::InvalidIndex(body.to_string()))?;
                    (PathSegment::Index(idx), &bracket[end + 1..])
                };
                segments.push(segment);
                rest = tail;
                continue;
            }

            let name = if segments.is_empty() {
                rest
            } else {
                rest.strip_prefix('.')
                    .ok_or_else(|| PathParseError::Unexpected(rest.to_string()))?
            };
            let end = name.find(['.', '[']).unwrap_or(name.len());
            if end == 0 {
                return Err(PathParseError::EmptyField(s.to_string()));
            }
            segments.push(PathSegment::Field(name[..end].to_string()));
            rest = &name[end..];
        }

        Ok(Self { segments })
    }
}

/// Reads a JSON string key at the start of `bracket` and the `]` after it.
fn quoted_key<'a>(bracket: &'a str, path: &str) -> Result<(String, &'a str), PathParseError> {
    let mut escaped = false;
    let close = bracket
        .char_indices()
        .skip(1)
        .find(|&(_, c)| {
            let closes = c == '"' && !escaped;
            escaped = c == '\\' && !escaped;
            closes
        })
        .map(|(i, _)| i)
        .ok_or_else(|| PathParseError::Unterminated(path.to_string()))?;

    let literal = &bracket[..=close];
    let key = serde_json::from_str::<String>(literal)
        .map_err(|_| PathParseError::InvalidKey(literal.to_string()))?;
    let tail = bracket[close + 1..]
        .strip_prefix(']')
        .ok_or_else(|| PathParseError::Unterminated(path.to_string()))?;
    Ok((key, tail))
}

/// Errors produced when parsing a path string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathParseError {
    /// A `[` without its closing `]`.
    #[error("unterminated bracket in path '{0}'")]
    Unterminated(String),

    /// A bracket that holds neither a quoted key nor an index.
    #[error("invalid index '{0}'")]
    InvalidIndex(String),

    /// A quoted key that is not a valid JSON string.
    #[error("invalid quoted key '{0}'")]
    InvalidKey(String),

    /// An empty property name, e.g. `a..b`.
    #[error("empty field name in path '{0}'")]
    EmptyField(String),

    /// Trailing text that is not a bracketed segment.
    #[error("unexpected text '{0}' in path")]
    Unexpected(String),
}
