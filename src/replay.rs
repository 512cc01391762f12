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

//! CSV-backed sale source.
//!
//! Plays back controller captures from disk, and doubles as the test
//! double for everything that consumes a [`SaleSource`]. Capture rows use
//! attribute-form surface names on purpose, so replayed records exercise
//! the same fallback chains a legacy driver build would.
//!
//! Capture format: `hose,sale,pump,grade,volume,amount,unit_price,date,time`
//! (headered; empty cells mean the field was absent from the record).
//! Product format: `grade,name`.

use crate::base::{GradeId, HoseId, SaleId};
use crate::error::SourceError;
use crate::raw::RawSale;
use crate::source::SaleSource;
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// In-memory [`SaleSource`] over per-hose sale histories and a grade
/// table.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    grades: BTreeMap<GradeId, String>,
    hoses: BTreeMap<HoseId, BTreeMap<SaleId, RawSale>>,
}

/// One capture row. Every field past `hose` and `sale` is optional;
/// unparseable cells degrade to absent, matching how a flaky driver
/// surface behaves.
#[derive(Debug, Deserialize)]
struct CaptureRecord {
    hose: u16,
    sale: u32,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pump: Option<u16>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    grade: Option<u8>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    volume: Option<Decimal>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    amount: Option<Decimal>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    unit_price: Option<Decimal>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    time: Option<String>,
}

impl CaptureRecord {
    fn into_raw(self) -> (HoseId, SaleId, RawSale) {
        let mut raw = RawSale::new()
            .with("SaleNumber", i64::from(self.sale))
            .with("HoseNr", i64::from(self.hose));
        if let Some(pump) = self.pump {
            raw.set("Pump", i64::from(pump));
        }
        if let Some(grade) = self.grade {
            raw.set("Product", i64::from(grade));
        }
        if let Some(volume) = self.volume {
            raw.set("Volume", volume);
        }
        if let Some(amount) = self.amount {
            raw.set("Amount", amount);
        }
        if let Some(unit_price) = self.unit_price {
            raw.set("UnitPrice", unit_price);
        }
        if let Some(date) = self.date.filter(|s| !s.is_empty()) {
            raw.set("Date", date);
        }
        if let Some(time) = self.time.filter(|s| !s.is_empty()) {
            raw.set("Time", time);
        }
        (HoseId(self.hose), SaleId(self.sale), raw)
    }
}

/// One product row.
#[derive(Debug, Deserialize)]
struct ProductRecord {
    grade: u8,
    name: String,
}

impl ReplaySource {
    /// Creates an empty source: no grades, no hoses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a capture file, plus an optional product file.
    ///
    /// # Errors
    ///
    /// [`SourceError::Connection`] when a file cannot be opened (the
    /// capture is the transport here), [`SourceError::Driver`] when its
    /// structure is unreadable.
    pub fn open(capture: &Path, products: Option<&Path>) -> Result<Self, SourceError> {
        let mut source = Self::new();
        let file = File::open(capture)
            .map_err(|e| SourceError::connection(capture.display().to_string(), e.to_string()))?;
        source.read_capture(file)?;
        if let Some(products) = products {
            let file = File::open(products).map_err(|e| {
                SourceError::connection(products.display().to_string(), e.to_string())
            })?;
            source.read_products(file)?;
        }
        Ok(source)
    }

    /// Ingests capture rows from any reader. Malformed rows are logged
    /// and skipped; later rows for the same hose and sale number win.
    pub fn read_capture<R: Read>(&mut self, reader: R) -> Result<(), SourceError> {
        let mut rdr = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        for result in rdr.deserialize::<CaptureRecord>() {
            match result {
                Ok(record) => {
                    let (hose, sale, raw) = record.into_raw();
                    self.insert_sale(hose, sale, raw);
                }
                Err(e) => {
                    warn!(%e, "skipping malformed capture row");
                }
            }
        }
        Ok(())
    }

    /// Ingests product rows from any reader.
    pub fn read_products<R: Read>(&mut self, reader: R) -> Result<(), SourceError> {
        let mut rdr = ReaderBuilder::new()
            .trim(Trim::All)
            .has_headers(true)
            .from_reader(reader);

        for result in rdr.deserialize::<ProductRecord>() {
            match result {
                Ok(record) => self.set_grade(GradeId(record.grade), &record.name),
                Err(e) => {
                    warn!(%e, "skipping malformed product row");
                }
            }
        }
        Ok(())
    }

    /// Configures a grade slot.
    pub fn set_grade(&mut self, grade: GradeId, name: &str) {
        self.grades.insert(grade, name.to_owned());
    }

    /// Stores a sale record under `hose`/`number`, replacing any previous
    /// record there. The highest stored number acts as the hose's cursor.
    pub fn insert_sale(&mut self, hose: HoseId, number: SaleId, raw: RawSale) {
        self.hoses.entry(hose).or_default().insert(number, raw);
    }

    fn latest(&self, hose: HoseId) -> Option<&RawSale> {
        self.hoses
            .get(&hose)
            .and_then(|history| history.last_key_value())
            .map(|(_, raw)| raw)
    }
}

impl SaleSource for ReplaySource {
    fn get_grade_name(&self, grade: GradeId) -> Result<Option<String>, SourceError> {
        Ok(self.grades.get(&grade).cloned())
    }

    fn get_sale(
        &self,
        hose_id: HoseId,
        sale_number: Option<SaleId>,
    ) -> Result<Option<RawSale>, SourceError> {
        let record = match sale_number {
            None | Some(SaleId(0)) => self.latest(hose_id),
            Some(number) => self.hoses.get(&hose_id).and_then(|h| h.get(&number)),
        };
        Ok(record.cloned())
    }

    fn get_last_sale(&self, hose_id: Option<HoseId>) -> Result<Option<RawSale>, SourceError> {
        match hose_id {
            Some(hose) if hose.0 > 0 => Ok(self.latest(hose).cloned()),
            _ => {
                // Controller-wide: the highest sale number wins across hoses.
                let best = self
                    .hoses
                    .values()
                    .filter_map(|history| history.last_key_value())
                    .max_by_key(|(number, _)| **number)
                    .map(|(_, raw)| raw.clone());
                Ok(best)
            }
        }
    }
}
