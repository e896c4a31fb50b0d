//! Field paths into nested provider data.
//!
//! A [`Path`] is a sequence of string segments resolved one step at a time
//! against a `serde_json::Value`. At each step the kind of the current node
//! decides what the segment means:
//!
//! * object: the segment is a key, the value under it becomes the current node
//! * array: the segment must be a member of the array, the matching element
//!   becomes the current node
//! * scalar: nothing to descend into, the lookup misses
//!
//! Lookups are case-sensitive and fail closed.

use crate::error::PathError;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// One step of a field path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Segment(String);

impl Segment {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn matches_element(&self, element: &Value) -> bool {
        match element {
            Value::String(s) => s == &self.0,
            Value::Number(n) => n.to_string() == self.0,
            Value::Bool(b) => b.to_string() == self.0,
            _ => false,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Segment {
    fn from(segment: &str) -> Self {
        Segment(segment.to_string())
    }
}

impl From<String> for Segment {
    fn from(segment: String) -> Self {
        Segment(segment)
    }
}

/// Why a path did not resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissReason {
    /// An object had no such key
    MissingKey,
    /// An array did not contain the segment
    NotAMember,
    /// The path continues past a scalar value
    NotAContainer,
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissReason::MissingKey => write!(f, "missing key"),
            MissReason::NotAMember => write!(f, "not a list member"),
            MissReason::NotAContainer => write!(f, "not a mapping or list"),
        }
    }
}

/// A failed lookup: how far the path got and why it stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Miss {
    /// Index of the segment that could not be resolved
    pub depth: usize,
    pub reason: MissReason,
}

/// A sequence of segments addressing a value inside nested data
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Build a path from literal segments. Segments are not split on dots.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Segment>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a dotted path such as `provisioning.host`
    pub fn parse(dotted: &str) -> Result<Self, PathError> {
        if dotted.is_empty() {
            return Err(PathError::Empty);
        }
        let mut segments = Vec::new();
        for (position, part) in dotted.split('.').enumerate() {
            if part.is_empty() {
                return Err(PathError::EmptySegment {
                    path: dotted.to_string(),
                    position,
                });
            }
            segments.push(Segment::from(part));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, used as a default argument name
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(Segment::as_str)
    }

    /// Resolve the path, reporting where and why it missed.
    ///
    /// The empty path resolves to `root` itself.
    pub fn lookup<'v>(&self, root: &'v Value) -> Result<&'v Value, Miss> {
        let mut current = root;
        for (depth, segment) in self.segments.iter().enumerate() {
            current = match current {
                Value::Object(map) => map.get(segment.as_str()).ok_or(Miss {
                    depth,
                    reason: MissReason::MissingKey,
                })?,
                Value::Array(items) => items
                    .iter()
                    .find(|item| segment.matches_element(item))
                    .ok_or(Miss {
                        depth,
                        reason: MissReason::NotAMember,
                    })?,
                _ => {
                    return Err(Miss {
                        depth,
                        reason: MissReason::NotAContainer,
                    })
                }
            };
        }
        Ok(current)
    }

    /// Resolve the path, `None` on any miss
    pub fn resolve<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        self.lookup(root).ok()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl<S: Into<Segment>, const N: usize> From<[S; N]> for Path {
    fn from(segments: [S; N]) -> Self {
        Path::from_segments(segments)
    }
}

impl<S: Into<Segment>> From<Vec<S>> for Path {
    fn from(segments: Vec<S>) -> Self {
        Path::from_segments(segments)
    }
}
