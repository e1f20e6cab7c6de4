use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the barindex workspace.
///
/// Every failure aborts the whole call: range construction never returns a
/// truncated index alongside an error.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BarError {
    /// The frequency specification is unparseable, zero, or negative.
    #[error("invalid frequency {spec:?}: {reason}")]
    InvalidFrequency {
        /// The offending input as given by the caller.
        spec: String,
        /// Human-readable description of what is wrong with it.
        reason: String,
    },

    /// A session does not satisfy `close > open`.
    #[error("invalid session: close {close} is not after open {open}")]
    InvalidSession {
        /// Session open, normalized to UTC.
        open: DateTime<Utc>,
        /// Session close, normalized to UTC.
        close: DateTime<Utc>,
    },

    /// A session starts before the previous session has closed.
    #[error("sessions out of order: open {open} precedes previous close {previous_close}")]
    UnorderedSessions {
        /// Close of the preceding session, normalized to UTC.
        previous_close: DateTime<Utc>,
        /// Open of the offending session, normalized to UTC.
        open: DateTime<Utc>,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A session provider failed to produce its sessions.
    #[error("{provider} failed: {msg}")]
    Provider {
        /// Provider name that failed.
        provider: String,
        /// Human-readable error message.
        msg: String,
    },
}

impl BarError {
    /// Helper: build an `InvalidFrequency` error for the given input and reason.
    pub fn invalid_frequency(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFrequency {
            spec: spec.into(),
            reason: reason.into(),
        }
    }

    /// Helper: build an `InvalidSession` error, normalizing both ends to UTC.
    pub fn invalid_session<Tz: chrono::TimeZone>(open: &DateTime<Tz>, close: &DateTime<Tz>) -> Self {
        Self::InvalidSession {
            open: open.with_timezone(&Utc),
            close: close.with_timezone(&Utc),
        }
    }

    /// Helper: build a `Provider` error with the provider name and message.
    pub fn provider(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            msg: msg.into(),
        }
    }

    /// Returns true if the caller can fix this error by changing its inputs.
    ///
    /// Provider failures are the only errors that originate outside the
    /// caller's arguments.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        !matches!(self, Self::Provider { .. })
    }
}
