// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Result alias for engine operations.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Closed set of engine error kinds.
///
/// The first three variants are business-rule rejections: entry points
/// convert them into a `success: false` result for the caller instead of
/// propagating. `Exhaustion` and `Persistence` are not recoverable by the
/// caller and propagate as errors; any open unit of work rolls back.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed or disallowed input (bad PIN, non-positive amount,
    /// self-transfer, inactive card, ...).
    #[error("{0}")]
    Validation(String),

    /// A spend/deposit ceiling or card limit would be exceeded.
    #[error("{0}")]
    LimitExceeded(String),

    /// A referenced customer, account, card, or transaction does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Identifier generation hit its retry ceiling.
    #[error("identifier space exhausted generating {0}")]
    Exhaustion(&'static str),

    /// The store failed mid-operation; the unit of work was aborted.
    #[error("persistence error: {0}")]
    Persistence(#[from] rusqlite::Error),
}

impl EngineError {
    /// True for user-facing rejections that leave the store untouched.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            EngineError::Validation(_) | EngineError::LimitExceeded(_) | EngineError::NotFound(_)
        )
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }

    pub fn limit(msg: impl Into<String>) -> Self {
        EngineError::LimitExceeded(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        EngineError::NotFound(msg.into())
    }
}
