// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Failure taxonomy shared by every store operation.
#[derive(Error, Debug)]
pub enum Error {
    /// No identity present; raised locally before any I/O.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Identity present but not allowed to perform the operation.
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// A referenced document does not exist.
    #[error("{0} not found: {1}")]
    NotFound(&'static str, String),

    /// Rejected input, checked before any I/O is attempted.
    #[error("validation error: {0}")]
    Validation(String),

    /// Transport or storage failure, passed through unchanged.
    #[error("backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Backend(anyhow::Error::new(err))
    }
}
