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

//! Sale normalization.
//!
//! Converts a [`RawSale`] into a canonical [`Sale`] with a deterministic,
//! ordered fallback per field. A failure extracting one field never aborts
//! extraction of the others; the one hard requirement is a resolvable sale
//! id, because dedup and the day walk key on it.
//!
//! `normalize` is pure: same input, same output, no driver calls. Product
//! name enrichment happens in [`SaleReader`](crate::reader::SaleReader).

use crate::base::{GradeId, HoseId, PumpId, SaleId};
use crate::error::NormalizeError;
use crate::raw::{self, RawSale, RawValue};
use crate::sale::Sale;
use chrono::{NaiveDate, NaiveTime};

/// Normalizes a raw vendor record read from `hose_id`.
///
/// # Errors
///
/// [`NormalizeError::SaleIdUnresolved`] when no probed surface yields a
/// sale id. Every other extraction failure degrades to `None` on that
/// field alone.
pub fn normalize(raw: &RawSale, hose_id: HoseId) -> Result<Sale, NormalizeError> {
    let sale_id = raw
        .probe_int(raw::SALE_ID_KEYS)
        .and_then(|n| u32::try_from(n).ok())
        .map(SaleId)
        .ok_or(NormalizeError::SaleIdUnresolved)?;

    let pump_id = raw
        .probe_int(raw::PUMP_KEYS)
        .and_then(|n| u16::try_from(n).ok())
        .map(PumpId);

    // Grade 0 means "no product configured", not a real grade.
    let grade_id = raw
        .probe_int(raw::GRADE_KEYS)
        .and_then(|n| u8::try_from(n).ok())
        .filter(|grade| *grade != 0)
        .map(GradeId);

    let transaction_time = raw
        .probe_with(raw::TIME_KEYS, parse_time)
        .or_else(|| raw.probe_with(raw::DATE_KEYS, embedded_time));

    Ok(Sale {
        sale_id,
        hose_id,
        pump_id,
        grade_id,
        grade_name: None,
        volume: raw.probe_decimal(raw::VOLUME_KEYS),
        amount: raw.probe_decimal(raw::AMOUNT_KEYS),
        unit_price: raw.probe_decimal(raw::UNIT_PRICE_KEYS),
        transaction_date: raw.probe_with(raw::DATE_KEYS, parse_date),
        transaction_time,
    })
}

/// Parses a transaction date from either the 8-digit compact form
/// (`20240110`, integer or digit string) or an ISO-like `YYYY-MM-DD...`
/// prefix. Anything else is `None`.
pub fn parse_date(value: &RawValue) -> Option<NaiveDate> {
    match value {
        RawValue::Text(s) => parse_date_text(s.trim()),
        other => other.as_int().and_then(compact_date),
    }
}

/// Parses a time-of-day from `HH:MM:SS...` text or the compact `HHMMSS`
/// integer form.
pub fn parse_time(value: &RawValue) -> Option<NaiveTime> {
    match value {
        RawValue::Text(s) => parse_time_text(s.trim()),
        other => other.as_int().and_then(compact_time),
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    if let Some(prefix) = s.get(..10)
        && let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
    {
        return Some(date);
    }
    if let Some(prefix) = s.get(..8)
        && prefix.bytes().all(|b| b.is_ascii_digit())
    {
        return prefix.parse().ok().and_then(compact_date);
    }
    None
}

fn parse_time_text(s: &str) -> Option<NaiveTime> {
    if let Some(prefix) = s.get(..8)
        && let Ok(time) = NaiveTime::parse_from_str(prefix, "%H:%M:%S")
    {
        return Some(time);
    }
    if s.len() == 6 && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse::<i64>().ok().and_then(compact_time);
    }
    None
}

/// Pulls the time component out of a full datetime string on a date
/// surface (`2024-01-10 14:30:00` or `2024-01-10T14:30:00`).
fn embedded_time(value: &RawValue) -> Option<NaiveTime> {
    let text = value.as_text()?.trim();
    let tail = text.get(11..19)?;
    NaiveTime::parse_from_str(tail, "%H:%M:%S").ok()
}

fn compact_date(n: i64) -> Option<NaiveDate> {
    if !(10_000_101..=99_991_231).contains(&n) {
        return None;
    }
    let year = (n / 10_000) as i32;
    let month = ((n / 100) % 100) as u32;
    let day = (n % 100) as u32;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn compact_time(n: i64) -> Option<NaiveTime> {
    if !(0..=235_959).contains(&n) {
        return None;
    }
    let hour = (n / 10_000) as u32;
    let minute = ((n / 100) % 100) as u32;
    let second = (n % 100) as u32;
    NaiveTime::from_hms_opt(hour, minute, second)
}
