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

//! Sale retrieval over a [`SaleSource`].
//!
//! The [`SaleReader`] is the central component: single-sale lookups,
//! last-sale queries, and the day-range walk all live here, on top of the
//! pure normalizer. Per-hose problems (no response, no history, dropped
//! records) degrade to absence of data; only source-level errors propagate.
//!
//! # Day walk
//!
//! For each candidate hose the reader fetches the current sale cursor,
//! reads the latest sale number off it, and walks sale numbers down to 1,
//! keeping records whose transaction date matches the target day. The
//! walk never terminates early: sale numbers are not guaranteed to be
//! chronologically monotonic, so an early break on an older date could
//! lose out-of-order matches. Results are deduplicated by sale id across
//! the whole invocation.

use crate::base::{HoseId, SaleId};
use crate::catalog;
use crate::error::{NormalizeError, SourceError};
use crate::normalize::normalize;
use crate::raw::{self, RawSale};
use crate::sale::Sale;
use crate::source::SaleSource;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::ops::RangeInclusive;
use tracing::{debug, warn};

/// Hose ids enumerated when a query targets "all hoses".
///
/// The controller's own configuration enumeration is unreliable, so the
/// reader probes a fixed range and lets silent hoses skip themselves.
pub const DEFAULT_HOSE_RANGE: RangeInclusive<u16> = 1..=21;

/// Reads and normalizes sales from a connected source.
pub struct SaleReader<S> {
    source: S,
    hose_range: RangeInclusive<u16>,
}

impl<S: SaleSource> SaleReader<S> {
    /// Wraps a source with the default all-hoses range.
    pub fn new(source: S) -> Self {
        Self {
            source,
            hose_range: DEFAULT_HOSE_RANGE,
        }
    }

    /// Overrides the hose range probed by all-hoses queries.
    pub fn with_hose_range(mut self, range: RangeInclusive<u16>) -> Self {
        self.hose_range = range;
        self
    }

    /// Borrows the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches and normalizes one sale.
    ///
    /// `sale_number` of `None` or `0` requests the hose's current/last
    /// sale. `Ok(None)` covers both "driver has no such record" and a
    /// record whose sale id could not be resolved.
    pub fn get_sale(
        &self,
        hose_id: HoseId,
        sale_number: Option<SaleId>,
    ) -> Result<Option<Sale>, SourceError> {
        let Some(raw) = self.source.get_sale(hose_id, sale_number)? else {
            return Ok(None);
        };
        Ok(self.finish(raw, hose_id))
    }

    /// Fetches the most recent sale, controller-wide when `hose_id` is
    /// `None`.
    ///
    /// The hose tag on the result comes from the record itself when it
    /// carries one, falling back to the requested hose.
    pub fn last_sale(&self, hose_id: Option<HoseId>) -> Result<Option<Sale>, SourceError> {
        let Some(raw) = self.source.get_last_sale(hose_id)? else {
            return Ok(None);
        };
        let hose = raw
            .probe_int(raw::HOSE_KEYS)
            .and_then(|n| u16::try_from(n).ok())
            .map(HoseId)
            .or(hose_id)
            .unwrap_or(HoseId(0));
        Ok(self.finish(raw, hose))
    }

    /// Collects all sales dated `day`, for one hose or (with `None`/`0`)
    /// for every hose in the configured range.
    ///
    /// Hoses that do not answer or have no history contribute nothing.
    /// Records without a parseable date are skipped. The result carries no
    /// duplicate sale ids.
    pub fn sales_for_day(
        &self,
        hose_id: Option<HoseId>,
        day: NaiveDate,
    ) -> Result<Vec<Sale>, SourceError> {
        let hoses: Vec<HoseId> = match hose_id {
            Some(hose) if hose.0 > 0 => vec![hose],
            _ => self.hose_range.clone().map(HoseId).collect(),
        };

        let mut seen: HashSet<SaleId> = HashSet::new();
        let mut sales = Vec::new();

        for hose in hoses {
            let Some(cursor) = self.source.get_sale(hose, None)? else {
                debug!(%hose, "hose did not answer, skipping");
                continue;
            };
            let Some(latest) = cursor.probe_int(raw::SALE_ID_KEYS) else {
                debug!(%hose, "cursor carries no sale number, skipping");
                continue;
            };
            if latest <= 0 {
                debug!(%hose, "hose has no sale history");
                continue;
            }
            let latest = u32::try_from(latest).unwrap_or(u32::MAX);

            for number in (1..=latest).rev() {
                let Some(record) = self.source.get_sale(hose, Some(SaleId(number)))? else {
                    continue;
                };
                let sale = match normalize(&record, hose) {
                    Ok(sale) => sale,
                    Err(NormalizeError::SaleIdUnresolved) => {
                        debug!(%hose, number, "dropping record without resolvable sale id");
                        continue;
                    }
                };
                let Some(date) = sale.transaction_date else {
                    continue;
                };
                if date != day {
                    continue;
                }
                if seen.insert(sale.sale_id) {
                    sales.push(self.enrich(sale));
                }
            }
        }

        Ok(sales)
    }

    /// Normalizes and enriches a raw record; unresolvable sale ids become
    /// `None`.
    fn finish(&self, raw: RawSale, hose_id: HoseId) -> Option<Sale> {
        match normalize(&raw, hose_id) {
            Ok(sale) => Some(self.enrich(sale)),
            Err(NormalizeError::SaleIdUnresolved) => {
                debug!(%hose_id, "dropping record without resolvable sale id");
                None
            }
        }
    }

    /// Fills in the product name for sales with a grade. Lookup failures
    /// leave the name unset; they never fail the sale.
    fn enrich(&self, sale: Sale) -> Sale {
        let Some(grade) = sale.grade_id else {
            return sale;
        };
        match catalog::product_name(&self.source, grade) {
            Ok(name) => sale.with_grade_name(name),
            Err(err) => {
                warn!(%grade, %err, "product name lookup failed");
                sale
            }
        }
    }
}
