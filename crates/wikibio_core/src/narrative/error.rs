//! Biography generation errors.
//!
//! Missing references and privacy flags are not errors: they degrade the
//! output locally. Only store failures, a missing subject and role
//! inconsistencies abort a generation.

use crate::model::event::EventRole;
use crate::model::handle::Handle;
use crate::repo::tree_db::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BioResult<T> = Result<T, BioError>;

#[derive(Debug)]
pub enum BioError {
    /// Store-level failure.
    Repo(RepoError),
    /// The subject person could not be resolved (handle or gramps id).
    PersonNotFound(String),
    /// No participant of `event` carries the `expected` role.
    AmbiguousRole { event: Handle, expected: EventRole },
}

impl Display for BioError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::PersonNotFound(key) => write!(f, "person not found: {key}"),
            Self::AmbiguousRole { event, expected } => write!(
                f,
                "event {event} has no participant with role {}",
                expected.label()
            ),
        }
    }
}

impl Error for BioError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for BioError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}
