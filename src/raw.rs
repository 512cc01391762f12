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

//! Loosely-typed vendor sale records and field probing.
//!
//! Different vendor driver versions expose sale fields under different
//! surfaces: a method-style getter (`GetVolume`), a legacy getter under an
//! alternate name (`GetGradeNr` for the product number), or a bare attribute
//! (`Volume`). A [`RawSale`] carries whatever subset the driver produced,
//! keyed by surface name; each canonical field has a fixed, ordered list of
//! keys that are probed first-success-wins. Method-form names come before
//! attribute-form names.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::HashMap;

/// Surface names probed for the sale identifier.
pub const SALE_ID_KEYS: &[&str] = &["GetSaleID", "GetSaleNumber", "SaleId", "SaleNumber"];

/// Surface names probed for the pump number.
pub const PUMP_KEYS: &[&str] = &["GetPumpNumber", "PumpNumber", "PumpNr", "Pump"];

/// Surface names probed for the hose number on last-sale records.
pub const HOSE_KEYS: &[&str] = &["GetHoseNumber", "HoseNumber", "HoseNr", "Nozzle"];

/// Surface names probed for the grade/product number.
///
/// `GetGradeNr` is the legacy getter some driver builds use instead of
/// `GetProduct`.
pub const GRADE_KEYS: &[&str] = &["GetProduct", "GetGradeNr", "Product", "Grade"];

/// Surface names probed for the dispensed volume.
pub const VOLUME_KEYS: &[&str] = &["GetVolume", "Volume", "Quantity"];

/// Surface names probed for the monetary amount.
pub const AMOUNT_KEYS: &[&str] = &["GetAmount", "Amount", "Total"];

/// Surface names probed for the unit price.
pub const UNIT_PRICE_KEYS: &[&str] = &["GetUnitPrice", "UnitPrice", "PPU"];

/// Surface names probed for the transaction date.
pub const DATE_KEYS: &[&str] = &["GetDateOfTransaction", "DateOfTransaction", "DateTime", "Date"];

/// Surface names probed for the transaction time-of-day.
pub const TIME_KEYS: &[&str] = &["GetTimeOfTransaction", "TimeOfTransaction", "Time"];

/// Canonical field name paired with its probe order, for introspection
/// output (`list-methods`).
pub const FIELD_SURFACES: &[(&str, &[&str])] = &[
    ("sale_id", SALE_ID_KEYS),
    ("pump_id", PUMP_KEYS),
    ("hose_id", HOSE_KEYS),
    ("grade_id", GRADE_KEYS),
    ("volume", VOLUME_KEYS),
    ("amount", AMOUNT_KEYS),
    ("unit_price", UNIT_PRICE_KEYS),
    ("transaction_date", DATE_KEYS),
    ("transaction_time", TIME_KEYS),
];

/// A single loosely-typed value read off the vendor object model.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Int(i64),
    Decimal(Decimal),
    Text(String),
}

impl RawValue {
    /// Coerces to an integer. Decimals coerce only when they carry no
    /// fractional part; text coerces when it parses cleanly.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RawValue::Int(n) => Some(*n),
            RawValue::Decimal(d) => {
                if d.fract().is_zero() {
                    d.to_i64()
                } else {
                    None
                }
            }
            RawValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Coerces to a decimal. Integers widen losslessly; text coerces when
    /// it parses cleanly.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            RawValue::Int(n) => Some(Decimal::from(*n)),
            RawValue::Decimal(d) => Some(*d),
            RawValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Returns the text form, for text values only.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<Decimal> for RawValue {
    fn from(value: Decimal) -> Self {
        RawValue::Decimal(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// An opaque sale record as produced by the vendor driver.
///
/// Carries values keyed by the surface name they were read from. Which
/// surfaces are present depends entirely on the driver build; consumers
/// must go through the probe methods instead of assuming any one key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSale {
    fields: HashMap<String, RawValue>,
}

impl RawSale {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value under a surface name, replacing any previous value.
    pub fn set(&mut self, key: &str, value: impl Into<RawValue>) {
        self.fields.insert(key.to_owned(), value.into());
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, key: &str, value: impl Into<RawValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Reads a single surface by exact name.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields.get(key)
    }

    /// Returns the first present value among `keys`, in probe order.
    pub fn probe(&self, keys: &[&str]) -> Option<&RawValue> {
        keys.iter().find_map(|key| self.fields.get(*key))
    }

    /// Probes `keys` in order, returning the first value that `extract`
    /// accepts. A key whose value fails extraction does not stop the
    /// walk; later surfaces still get their turn.
    pub fn probe_with<T>(
        &self,
        keys: &[&str],
        extract: impl Fn(&RawValue) -> Option<T>,
    ) -> Option<T> {
        keys.iter()
            .filter_map(|key| self.fields.get(*key))
            .find_map(|value| extract(value))
    }

    /// First integer-coercible value among `keys`.
    pub fn probe_int(&self, keys: &[&str]) -> Option<i64> {
        self.probe_with(keys, RawValue::as_int)
    }

    /// First decimal-coercible value among `keys`.
    pub fn probe_decimal(&self, keys: &[&str]) -> Option<Decimal> {
        self.probe_with(keys, RawValue::as_decimal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn probe_prefers_method_form() {
        let raw = RawSale::new()
            .with("Volume", dec!(10.0))
            .with("GetVolume", dec!(42.5));

        assert_eq!(raw.probe_decimal(VOLUME_KEYS), Some(dec!(42.5)));
    }

    #[test]
    fn probe_falls_back_to_attribute_form() {
        let raw = RawSale::new().with("Volume", dec!(10.0));
        assert_eq!(raw.probe_decimal(VOLUME_KEYS), Some(dec!(10.0)));
    }

    #[test]
    fn probe_missing_field_is_none() {
        let raw = RawSale::new().with("GetAmount", dec!(55.00));
        assert_eq!(raw.probe_decimal(VOLUME_KEYS), None);
    }

    #[test]
    fn probe_skips_uncoercible_surface() {
        // Preferred surface holds junk text; the legacy surface still wins.
        let raw = RawSale::new()
            .with("GetSaleID", "not-a-number")
            .with("SaleNumber", 17i64);

        assert_eq!(raw.probe_int(SALE_ID_KEYS), Some(17));
    }

    #[test]
    fn int_coercions() {
        assert_eq!(RawValue::Int(7).as_int(), Some(7));
        assert_eq!(RawValue::Decimal(dec!(7)).as_int(), Some(7));
        assert_eq!(RawValue::Decimal(dec!(7.5)).as_int(), None);
        assert_eq!(RawValue::Text(" 7 ".into()).as_int(), Some(7));
        assert_eq!(RawValue::Text("seven".into()).as_int(), None);
    }

    #[test]
    fn decimal_coercions() {
        assert_eq!(RawValue::Int(3).as_decimal(), Some(dec!(3)));
        assert_eq!(RawValue::Text("3.25".into()).as_decimal(), Some(dec!(3.25)));
        assert_eq!(RawValue::Text("3,25".into()).as_decimal(), None);
    }

    #[test]
    fn set_replaces_previous_value() {
        let mut raw = RawSale::new();
        raw.set("GetVolume", dec!(1.0));
        raw.set("GetVolume", dec!(2.0));
        assert_eq!(raw.probe_decimal(VOLUME_KEYS), Some(dec!(2.0)));
    }
}
