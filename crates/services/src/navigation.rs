//! Route targets reachable from the attempt flow.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use quiz_core::model::{AttemptId, FileId, IdError, QuizId};

/// A page the attempt flow can send the user to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QuizRoute {
    /// `/dashboard/{file_id}/quiz`
    QuizList { file_id: FileId },
    /// `/dashboard/{file_id}/quiz/{quiz_id}/attempt`
    Attempt { file_id: FileId, quiz_id: QuizId },
    /// `/dashboard/{file_id}/quiz/{quiz_id}/attempt/{attempt_id}/results`
    Results {
        file_id: FileId,
        quiz_id: QuizId,
        attempt_id: AttemptId,
    },
}

impl QuizRoute {
    #[must_use]
    pub fn quiz_list(file_id: &FileId) -> Self {
        Self::QuizList {
            file_id: file_id.clone(),
        }
    }

    #[must_use]
    pub fn attempt(file_id: &FileId, quiz_id: &QuizId) -> Self {
        Self::Attempt {
            file_id: file_id.clone(),
            quiz_id: quiz_id.clone(),
        }
    }

    #[must_use]
    pub fn results(file_id: &FileId, quiz_id: &QuizId, attempt_id: &AttemptId) -> Self {
        Self::Results {
            file_id: file_id.clone(),
            quiz_id: quiz_id.clone(),
            attempt_id: attempt_id.clone(),
        }
    }

    #[must_use]
    pub fn file_id(&self) -> &FileId {
        match self {
            Self::QuizList { file_id }
            | Self::Attempt { file_id, .. }
            | Self::Results { file_id, .. } => file_id,
        }
    }

    /// Absolute path for this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::QuizList { file_id } => format!("/dashboard/{file_id}/quiz"),
            Self::Attempt { file_id, quiz_id } => {
                format!("/dashboard/{file_id}/quiz/{quiz_id}/attempt")
            }
            Self::Results {
                file_id,
                quiz_id,
                attempt_id,
            } => format!("/dashboard/{file_id}/quiz/{quiz_id}/attempt/{attempt_id}/results"),
        }
    }
}

impl fmt::Display for QuizRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Failure to parse a path into a [`QuizRoute`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RouteParseError {
    #[error("unrecognised route: {0}")]
    Unknown(String),
    #[error(transparent)]
    Id(#[from] IdError),
}

impl FromStr for QuizRoute {
    type Err = RouteParseError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = path
            .trim_end_matches('/')
            .split('/')
            .skip_while(|s| s.is_empty())
            .collect();

        match segments.as_slice() {
            ["dashboard", file, "quiz"] => Ok(Self::QuizList {
                file_id: FileId::new(file)?,
            }),
            ["dashboard", file, "quiz", quiz, "attempt"] => Ok(Self::Attempt {
                file_id: FileId::new(file)?,
                quiz_id: QuizId::new(quiz)?,
            }),
            ["dashboard", file, "quiz", quiz, "attempt", attempt, "results"] => Ok(Self::Results {
                file_id: FileId::new(file)?,
                quiz_id: QuizId::new(quiz)?,
                attempt_id: AttemptId::new(attempt)?,
            }),
            _ => Err(RouteParseError::Unknown(path.to_string())),
        }
    }
}

/// Sink for route changes requested by the attempt flow.
///
/// The UI adapts its router to this; tests record the calls.
pub trait Navigator {
    fn navigate(&self, route: QuizRoute);
}

impl<T: Navigator + ?Sized> Navigator for &T {
    fn navigate(&self, route: QuizRoute) {
        (**self).navigate(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (FileId, QuizId, AttemptId) {
        (
            FileId::new("f1").unwrap(),
            QuizId::new("q1").unwrap(),
            AttemptId::new("a1").unwrap(),
        )
    }

    #[test]
    fn paths_follow_dashboard_layout() {
        let (file, quiz, attempt) = ids();
        assert_eq!(QuizRoute::quiz_list(&file).path(), "/dashboard/f1/quiz");
        assert_eq!(
            QuizRoute::attempt(&file, &quiz).path(),
            "/dashboard/f1/quiz/q1/attempt"
        );
        assert_eq!(
            QuizRoute::results(&file, &quiz, &attempt).to_string(),
            "/dashboard/f1/quiz/q1/attempt/a1/results"
        );
    }

    #[test]
    fn parse_accepts_every_route_shape() {
        let (file, quiz, attempt) = ids();
        for route in [
            QuizRoute::quiz_list(&file),
            QuizRoute::attempt(&file, &quiz),
            QuizRoute::results(&file, &quiz, &attempt),
        ] {
            assert_eq!(route.path().parse::<QuizRoute>().unwrap(), route);
        }
        assert_eq!(
            "/dashboard/f1/quiz/".parse::<QuizRoute>().unwrap(),
            QuizRoute::quiz_list(&file)
        );
    }

    #[test]
    fn parse_rejects_foreign_paths() {
        assert!(matches!(
            "/settings".parse::<QuizRoute>(),
            Err(RouteParseError::Unknown(_))
        ));
        assert!(matches!(
            "/dashboard/f1/quiz/q1".parse::<QuizRoute>(),
            Err(RouteParseError::Unknown(_))
        ));
    }
}
