//! Source adapter errors.

use pastehunt_core::{Error, SourceKind};

/// Why a source contributed nothing to an aggregation run.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The upstream document could not be fetched.
    #[error("{kind} fetch failed: {source}")]
    Fetch {
        kind: SourceKind,
        #[source]
        source: Error,
    },

    /// The document was fetched but did not have the expected structure.
    #[error("{kind} returned an unexpected document: {source}")]
    Shape {
        kind: SourceKind,
        #[source]
        source: Error,
    },

    /// The source served a captcha or anomaly page instead of results.
    #[error("{kind} blocked the request")]
    Blocked { kind: SourceKind },

    /// The adapter future panicked.
    #[error("{kind} adapter panicked")]
    Panicked { kind: SourceKind },

    /// The stage ran past the remaining request budget.
    #[error("{kind} exceeded the request budget")]
    OverBudget { kind: SourceKind },
}

impl SourceError {
    pub fn fetch(kind: SourceKind, source: Error) -> Self {
        SourceError::Fetch { kind, source }
    }

    pub fn shape(kind: SourceKind, reason: impl Into<String>) -> Self {
        SourceError::Shape { kind, source: Error::ParseFailed(reason.into()) }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            SourceError::Fetch { kind, .. }
            | SourceError::Shape { kind, .. }
            | SourceError::Blocked { kind }
            | SourceError::Panicked { kind }
            | SourceError::OverBudget { kind } => *kind,
        }
    }

    /// Whether the failure happened on the wire rather than in the adapter.
    pub fn is_transport(&self) -> bool {
        match self {
            SourceError::Fetch { source, .. } => source.is_transport(),
            _ => false,
        }
    }

    /// Stable code for logs, reusing the core error code where one exists.
    pub fn code(&self) -> &'static str {
        match self {
            SourceError::Fetch { source, .. } | SourceError::Shape { source, .. } => source.code(),
            SourceError::Blocked { .. } => "BLOCKED",
            SourceError::Panicked { .. } => "PANICKED",
            SourceError::OverBudget { .. } => "OVER_BUDGET",
        }
    }
}
