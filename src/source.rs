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

//! The Sale Source capability boundary.
//!
//! Everything upstream of the vendor driver goes through [`SaleSource`].
//! The driver's "success flag plus out-parameter" calling convention maps
//! to `Result<Option<_>, SourceError>`: `Ok(None)` is the driver answering
//! "no such record", `Err` is reserved for connection-level failures.
//! [`ReplaySource`](crate::replay::ReplaySource) is the shipped
//! implementation; tests use it as their double.

use crate::base::{GradeId, HoseId, SaleId};
use crate::error::SourceError;
use crate::raw::RawSale;
use std::time::Duration;

/// Settle delay after establishing the controller link, before the first
/// request. The underlying link drops early requests otherwise.
pub const CONNECT_SETTLE: Duration = Duration::from_secs(2);

/// Read-side capability of a Fusion controller connection.
///
/// All calls are blocking and issued strictly sequentially by the callers
/// in this crate.
pub trait SaleSource {
    /// Resolves a grade number to its configured product name.
    ///
    /// `Ok(None)` when the grade slot is unconfigured.
    fn get_grade_name(&self, grade: GradeId) -> Result<Option<String>, SourceError>;

    /// Fetches one sale record for a hose.
    ///
    /// `sale_number` of `None` (or `SaleId(0)`, which implementations must
    /// treat identically) requests the hose's current/last sale; a positive
    /// value requests that historical record. `Ok(None)` when the driver
    /// reports no matching record.
    fn get_sale(
        &self,
        hose_id: HoseId,
        sale_number: Option<SaleId>,
    ) -> Result<Option<RawSale>, SourceError>;

    /// Fetches the most recent sale, controller-wide when `hose_id` is
    /// `None`, otherwise for that hose.
    fn get_last_sale(&self, hose_id: Option<HoseId>) -> Result<Option<RawSale>, SourceError>;
}
