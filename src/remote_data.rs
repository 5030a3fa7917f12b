//! Three-state view of an asynchronous data source, and the aggregate over several of them.

use serde::{Deserialize, Serialize};

use crate::error::ChartError;

/// Status of one source, or of the aggregate across sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStatus {
    Pending,
    Complete,
    Error,
}

/// A loader result as the container observes it.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteData<T> {
    Pending,
    Complete(T),
    /// Rejection message from the loader.
    Error(String),
}

impl<T> Default for RemoteData<T> {
    fn default() -> Self {
        Self::Pending
    }
}

impl<T> RemoteData<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            Self::Complete(value) => Some(value),
            _ => None,
        }
    }

    pub fn status(&self) -> LoadStatus {
        match self {
            Self::Pending => LoadStatus::Pending,
            Self::Complete(_) => LoadStatus::Complete,
            Self::Error(_) => LoadStatus::Error,
        }
    }

    /// The rejection as a `LoadFailure`, if any.
    pub fn error(&self) -> Option<ChartError> {
        match self {
            Self::Error(msg) => Some(ChartError::LoadFailure(msg.clone())),
            _ => None,
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for RemoteData<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Complete(value),
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

/// Error wins over pending; complete only when every source is complete (or there are none).
pub fn aggregate_status<I>(statuses: I) -> LoadStatus
where
    I: IntoIterator<Item = LoadStatus>,
{
    let mut aggregate = LoadStatus::Complete;
    for status in statuses {
        match status {
            LoadStatus::Error => return LoadStatus::Error,
            LoadStatus::Pending => aggregate = LoadStatus::Pending,
            LoadStatus::Complete => {}
        }
    }
    aggregate
}
