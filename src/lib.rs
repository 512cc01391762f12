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

//! # Fusion Bridge
//!
//! A thin retrieval and polling library for Wayne Fusion forecourt
//! controllers: configured product grades, single sale lookups, per-day
//! sale history, and last-sale polling.
//!
//! The vendor driver's object surface varies between builds, so sale
//! records arrive as loosely-typed [`RawSale`] maps and every canonical
//! field is extracted through a fixed, ordered, first-success-wins list of
//! surface names. The driver itself sits behind the [`SaleSource`]
//! capability trait; [`ReplaySource`] is the shipped implementation,
//! playing back controller captures from CSV.
//!
//! ## Core Components
//!
//! - [`SaleReader`]: single lookups, last-sale queries, and the day-range
//!   walk with sale-id deduplication
//! - [`normalize`]: pure `RawSale` → [`Sale`] conversion
//! - [`catalog`]: product grade enumeration
//! - [`poll`]: last-sale novelty polling with explicit [`PollState`]
//!
//! ## Example
//!
//! ```
//! use fusion_bridge_rs::{HoseId, RawSale, ReplaySource, SaleId, SaleReader};
//!
//! let mut source = ReplaySource::new();
//! source.set_grade(fusion_bridge_rs::GradeId(1), "Diesel");
//! source.insert_sale(
//!     HoseId(5),
//!     SaleId(1),
//!     RawSale::new()
//!         .with("GetSaleID", 1i64)
//!         .with("GetProduct", 1i64)
//!         .with("GetDateOfTransaction", "2024-01-10"),
//! );
//!
//! let reader = SaleReader::new(source);
//! let sale = reader.get_sale(HoseId(5), None).unwrap().unwrap();
//! assert_eq!(sale.sale_id, SaleId(1));
//! assert_eq!(sale.grade_name.as_deref(), Some("Diesel"));
//! ```
//!
//! ## Concurrency
//!
//! Single-threaded, synchronous, blocking. Calls into the source are
//! strictly sequential; the only suspension points are the post-connect
//! settle delay and the polling interval.

pub mod base;
pub mod catalog;
pub mod error;
pub mod normalize;
pub mod poll;
pub mod raw;
pub mod reader;
pub mod replay;
pub mod sale;
pub mod source;

pub use base::{GradeId, HoseId, PumpId, SaleId};
pub use error::{NormalizeError, SourceError};
pub use normalize::normalize;
pub use poll::PollState;
pub use raw::{RawSale, RawValue};
pub use reader::SaleReader;
pub use replay::ReplaySource;
pub use sale::Sale;
pub use source::SaleSource;
