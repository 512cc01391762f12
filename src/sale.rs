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

//! Canonical sale entity.

use crate::base::{GradeId, HoseId, PumpId, SaleId};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;

/// A normalized sale transaction.
///
/// Constructed fresh per query by [`normalize`](crate::normalize::normalize),
/// never mutated afterwards, and discarded once returned or printed. Every
/// field except `sale_id` and `hose_id` is optional: the vendor record may
/// simply not carry it, and a missing field is data absence, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sale {
    /// Unique within one hose's history; the dedup key.
    pub sale_id: SaleId,
    /// Hose the sale was read from.
    pub hose_id: HoseId,
    /// Dispenser the hose belongs to, when the record carries it.
    pub pump_id: Option<PumpId>,
    /// Grade number, `None` when absent or reported as `0`.
    pub grade_id: Option<GradeId>,
    /// Product name resolved through the catalog; `None` when the grade is
    /// unset or the lookup failed.
    pub grade_name: Option<String>,
    /// Dispensed volume.
    pub volume: Option<Decimal>,
    /// Monetary amount.
    pub amount: Option<Decimal>,
    /// Price per unit volume.
    pub unit_price: Option<Decimal>,
    /// Calendar date of the transaction; `None` when unparseable. Records
    /// without a date are excluded from date-filtered queries but remain
    /// usable for single lookups.
    pub transaction_date: Option<NaiveDate>,
    /// Time of day of the transaction; `None` when unparseable.
    pub transaction_time: Option<NaiveTime>,
}

impl Sale {
    /// Returns a copy with the product name filled in.
    ///
    /// Enrichment happens after normalization so [`normalize`] stays pure;
    /// this is the only sanctioned way a `Sale` changes between
    /// construction and return.
    ///
    /// [`normalize`]: crate::normalize::normalize
    pub fn with_grade_name(mut self, name: Option<String>) -> Self {
        self.grade_name = name;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Sale {
        Sale {
            sale_id: SaleId(42),
            hose_id: HoseId(5),
            pump_id: Some(PumpId(2)),
            grade_id: Some(GradeId(1)),
            grade_name: Some("Diesel".into()),
            volume: Some(dec!(31.500)),
            amount: Some(dec!(47.25)),
            unit_price: Some(dec!(1.50)),
            transaction_date: NaiveDate::from_ymd_opt(2024, 1, 10),
            transaction_time: NaiveTime::from_hms_opt(14, 30, 0),
        }
    }

    #[test]
    fn serializes_flat_for_csv_and_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["sale_id"], 42);
        assert_eq!(json["hose_id"], 5);
        // serde-str: decimals travel as strings, no float rounding.
        assert_eq!(json["volume"], "31.500");
        assert_eq!(json["transaction_date"], "2024-01-10");
    }

    #[test]
    fn with_grade_name_replaces_only_the_name() {
        let enriched = sample().with_grade_name(Some("Premium".into()));
        assert_eq!(enriched.grade_name.as_deref(), Some("Premium"));
        assert_eq!(enriched.sale_id, SaleId(42));
        assert_eq!(enriched.volume, Some(dec!(31.500)));
    }
}
