use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a string cannot be used as an identifier.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("{kind} must not be empty")]
    Empty { kind: &'static str },

    #[error("{kind} must not contain '/': {raw}")]
    InvalidSegment { kind: &'static str, raw: String },
}

fn validate_segment(kind: &'static str, raw: &str) -> Result<String, IdError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdError::Empty { kind });
    }
    if trimmed.contains('/') {
        return Err(IdError::InvalidSegment {
            kind,
            raw: raw.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

// Identifiers double as route segments, so they are validated on parse and
// displayed verbatim.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Builds the identifier, rejecting empty values and path separators.
            ///
            /// # Errors
            ///
            /// Returns `IdError` when the value cannot be used as a route segment.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, IdError> {
                validate_segment(stringify!($name), raw.as_ref()).map(Self)
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Study material a quiz was generated from.
    FileId
}

string_id! {
    /// Unique identifier for a Quiz
    QuizId
}

string_id! {
    /// Unique identifier for a Question within the question bank
    QuestionId
}

string_id! {
    /// Unique identifier for one run through a quiz
    AttemptId
}

impl AttemptId {
    /// Generates a fresh random attempt id.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}
