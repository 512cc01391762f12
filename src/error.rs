// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Fusion Bridge contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Error types for sale retrieval and normalization.
//!
//! Only connection-level failures are fatal to a query. Everything below
//! that degrades locally: a missing field becomes `None`, a record without
//! a resolvable sale id is dropped, a silent hose is skipped.

use thiserror::Error;

/// Errors raised by a [`SaleSource`](crate::SaleSource) implementation.
///
/// Trait methods reserve `Err` for failures at the connection/driver level.
/// "The controller answered but has no such record" is `Ok(None)`, never an
/// error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Controller address unreachable, or the driver rejected the link.
    #[error("cannot reach controller at {address}: {reason}")]
    Connection { address: String, reason: String },

    /// A driver call failed below the connection level.
    #[error("driver call failed: {0}")]
    Driver(String),
}

impl SourceError {
    /// Convenience constructor for connection failures.
    pub fn connection(address: impl Into<String>, reason: impl Into<String>) -> Self {
        SourceError::Connection {
            address: address.into(),
            reason: reason.into(),
        }
    }
}

/// Whole-record normalization failures.
///
/// Per-field extraction problems are not errors (the field stays `None`);
/// only an unresolvable sale id sinks the record, because dedup and the
/// day walk both key on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// None of the probed field surfaces yielded a sale id.
    #[error("sale id could not be resolved from any field surface")]
    SaleIdUnresolved,
}

#[cfg(test)]
mod tests {
    use super::{NormalizeError, SourceError};

    #[test]
    fn error_display_messages() {
        assert_eq!(
            SourceError::connection("10.0.0.7", "timed out").to_string(),
            "cannot reach controller at 10.0.0.7: timed out"
        );
        assert_eq!(
            SourceError::Driver("GetSale returned garbage".into()).to_string(),
            "driver call failed: GetSale returned garbage"
        );
        assert_eq!(
            NormalizeError::SaleIdUnresolved.to_string(),
            "sale id could not be resolved from any field surface"
        );
    }

    #[test]
    fn errors_are_cloneable() {
        let error = SourceError::connection("addr", "refused");
        let cloned = error.clone();
        assert_eq!(error, cloned);
    }
}
