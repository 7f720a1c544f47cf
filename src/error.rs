// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

use crate::models::RecordKind;

/// Failures raised by the store, the aggregator and the export writer.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Malformed or out-of-range record data: negative amount, empty name,
    /// unparseable date. Nothing is written when this is returned.
    #[error("Invalid {kind} record: {reason}")]
    InvalidRecord { kind: RecordKind, reason: String },

    #[error("{kind} '{key}' not found")]
    NotFound { kind: RecordKind, key: String },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    pub fn invalid(kind: RecordKind, reason: impl Into<String>) -> Self {
        LedgerError::InvalidRecord {
            kind,
            reason: reason.into(),
        }
    }

    pub fn is_invalid_record(&self) -> bool {
        matches!(self, LedgerError::InvalidRecord { .. })
    }
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;
