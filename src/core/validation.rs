//! Field-addressable validation errors.
//!
//! A [`FieldPath`] names the exact position of an offending value inside a
//! nested submission (`items[0].taxes[1].rate`), so a client can render the
//! message next to the form input it came from.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// One step into a nested structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Field(String),
}

/// Location of a value inside a submission, serialized as `["items", 0, "price"]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Path extended with a named field
    pub fn field(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Field(name.to_string()));
        Self(segments)
    }

    /// Path extended with a sequence index
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
                PathSegment::Field(name) if position == 0 => write!(f, "{}", name)?,
                PathSegment::Field(name) => write!(f, ".{}", name)?,
            }
        }
        Ok(())
    }
}

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: FieldPath,
    pub message: String,
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FieldError", 3)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("field", &self.path.to_string())?;
        state.serialize_field("message", &self.message)?;
        state.end()
    }
}

/// Every violation found in one pass over a submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single error, used at transport boundaries
    pub fn single(path: FieldPath, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(path, message);
        errors
    }

    pub fn push(&mut self, path: FieldPath, message: impl Into<String>) {
        self.fields.push(FieldError {
            path,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    /// First error recorded at the dotted path, e.g. `items[0].price`
    pub fn get(&self, path: &str) -> Option<&FieldError> {
        self.fields
            .iter()
            .find(|error| error.path.to_string() == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary: Vec<String> = self
            .fields
            .iter()
            .map(|error| {
                if error.path.is_root() {
                    error.message.clone()
                } else {
                    format!("{}: {}", error.path, error.message)
                }
            })
            .collect();
        write!(f, "{}", summary.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}
