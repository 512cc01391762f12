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

//! SaleReader public API integration tests.

use chrono::NaiveDate;
use fusion_bridge_rs::{GradeId, HoseId, RawSale, ReplaySource, SaleId, SaleReader};
use rust_decimal_macros::dec;

// === Helper Functions ===

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn make_sale(sale_id: u32, date: &str) -> RawSale {
    RawSale::new()
        .with("GetSaleID", i64::from(sale_id))
        .with("GetVolume", dec!(10.0))
        .with("GetAmount", dec!(15.00))
        .with("GetDateOfTransaction", date)
}

/// Hose 5 with sales numbered 1..4, newest first by number:
/// 4 and 3 on 2024-01-10, 2 and 1 on 2024-01-09.
fn hose_five_history() -> ReplaySource {
    let mut source = ReplaySource::new();
    source.insert_sale(HoseId(5), SaleId(1), make_sale(1, "2024-01-09"));
    source.insert_sale(HoseId(5), SaleId(2), make_sale(2, "2024-01-09"));
    source.insert_sale(HoseId(5), SaleId(3), make_sale(3, "2024-01-10"));
    source.insert_sale(HoseId(5), SaleId(4), make_sale(4, "2024-01-10"));
    source
}

fn sale_ids(sales: &[fusion_bridge_rs::Sale]) -> Vec<u32> {
    let mut ids: Vec<u32> = sales.iter().map(|s| s.sale_id.0).collect();
    ids.sort_unstable();
    ids
}

// === Day-Range Retrieval ===

#[test]
fn day_filter_keeps_only_matching_dates() {
    let reader = SaleReader::new(hose_five_history());

    let sales = reader.sales_for_day(Some(HoseId(5)), day(2024, 1, 10)).unwrap();
    assert_eq!(sale_ids(&sales), vec![3, 4]);

    let sales = reader.sales_for_day(Some(HoseId(5)), day(2024, 1, 9)).unwrap();
    assert_eq!(sale_ids(&sales), vec![1, 2]);
}

#[test]
fn day_with_no_sales_is_empty_not_an_error() {
    let reader = SaleReader::new(hose_five_history());
    let sales = reader.sales_for_day(Some(HoseId(5)), day(2024, 2, 1)).unwrap();
    assert!(sales.is_empty());
}

#[test]
fn walk_does_not_stop_at_an_older_date() {
    // Sale numbers are not chronologically monotonic here: number 2 is a
    // day older than its neighbors. The walk must still find number 1.
    let mut source = ReplaySource::new();
    source.insert_sale(HoseId(7), SaleId(1), make_sale(1, "2024-01-10"));
    source.insert_sale(HoseId(7), SaleId(2), make_sale(2, "2024-01-09"));
    source.insert_sale(HoseId(7), SaleId(3), make_sale(3, "2024-01-10"));

    let reader = SaleReader::new(source);
    let sales = reader.sales_for_day(Some(HoseId(7)), day(2024, 1, 10)).unwrap();
    assert_eq!(sale_ids(&sales), vec![1, 3]);
}

#[test]
fn all_hoses_query_aggregates_and_skips_silent_hoses() {
    let mut source = ReplaySource::new();
    source.insert_sale(HoseId(2), SaleId(1), make_sale(1, "2024-01-10"));
    source.insert_sale(HoseId(4), SaleId(1), make_sale(11, "2024-01-10"));
    // Hoses 1 and 3 never answer.

    let reader = SaleReader::new(source).with_hose_range(1..=4);
    let sales = reader.sales_for_day(None, day(2024, 1, 10)).unwrap();
    assert_eq!(sale_ids(&sales), vec![1, 11]);
}

#[test]
fn hose_zero_means_all_hoses() {
    let mut source = ReplaySource::new();
    source.insert_sale(HoseId(2), SaleId(1), make_sale(1, "2024-01-10"));

    let reader = SaleReader::new(source).with_hose_range(1..=4);
    let sales = reader
        .sales_for_day(Some(HoseId(0)), day(2024, 1, 10))
        .unwrap();
    assert_eq!(sale_ids(&sales), vec![1]);
}

#[test]
fn result_never_repeats_a_sale_id() {
    // Same sale id surfacing on two hoses; only the first survives.
    let mut source = ReplaySource::new();
    source.insert_sale(HoseId(1), SaleId(1), make_sale(99, "2024-01-10"));
    source.insert_sale(HoseId(2), SaleId(1), make_sale(99, "2024-01-10"));

    let reader = SaleReader::new(source).with_hose_range(1..=2);
    let sales = reader.sales_for_day(None, day(2024, 1, 10)).unwrap();
    assert_eq!(sale_ids(&sales), vec![99]);
}

#[test]
fn unparseable_date_is_excluded_from_day_queries() {
    let mut source = ReplaySource::new();
    source.insert_sale(HoseId(5), SaleId(1), make_sale(1, "garbled"));
    source.insert_sale(HoseId(5), SaleId(2), make_sale(2, "2024-01-10"));

    let reader = SaleReader::new(source);
    let sales = reader.sales_for_day(Some(HoseId(5)), day(2024, 1, 10)).unwrap();
    assert_eq!(sale_ids(&sales), vec![2]);
}

#[test]
fn record_without_sale_id_is_dropped_and_walk_continues() {
    let mut source = ReplaySource::new();
    source.insert_sale(
        HoseId(5),
        SaleId(1),
        RawSale::new().with("GetVolume", dec!(1.0)),
    );
    source.insert_sale(HoseId(5), SaleId(2), make_sale(2, "2024-01-10"));

    let reader = SaleReader::new(source);
    let sales = reader.sales_for_day(Some(HoseId(5)), day(2024, 1, 10)).unwrap();
    assert_eq!(sale_ids(&sales), vec![2]);
}

// === Single Lookups ===

#[test]
fn absent_hose_lookup_is_none_not_an_error() {
    let reader = SaleReader::new(hose_five_history());
    assert!(reader.get_sale(HoseId(12), None).unwrap().is_none());
}

#[test]
fn lookup_without_number_returns_the_cursor_sale() {
    let reader = SaleReader::new(hose_five_history());
    let sale = reader.get_sale(HoseId(5), None).unwrap().unwrap();
    assert_eq!(sale.sale_id, SaleId(4));
    assert_eq!(sale.hose_id, HoseId(5));
}

#[test]
fn lookup_by_number_returns_that_record() {
    let reader = SaleReader::new(hose_five_history());
    let sale = reader.get_sale(HoseId(5), Some(SaleId(2))).unwrap().unwrap();
    assert_eq!(sale.sale_id, SaleId(2));
    assert_eq!(sale.transaction_date, Some(day(2024, 1, 9)));
}

#[test]
fn unparseable_date_still_allows_single_lookup() {
    let mut source = ReplaySource::new();
    source.insert_sale(HoseId(5), SaleId(1), make_sale(1, "garbled"));

    let reader = SaleReader::new(source);
    let sale = reader.get_sale(HoseId(5), Some(SaleId(1))).unwrap().unwrap();
    assert_eq!(sale.sale_id, SaleId(1));
    assert_eq!(sale.transaction_date, None);
}

// === Grade Enrichment ===

#[test]
fn sales_carry_resolved_product_names() {
    let mut source = ReplaySource::new();
    source.set_grade(GradeId(2), "Diesel");
    source.insert_sale(
        HoseId(5),
        SaleId(1),
        make_sale(1, "2024-01-10").with("GetProduct", 2i64),
    );

    let reader = SaleReader::new(source);
    let sale = reader.get_sale(HoseId(5), None).unwrap().unwrap();
    assert_eq!(sale.grade_id, Some(GradeId(2)));
    assert_eq!(sale.grade_name.as_deref(), Some("Diesel"));
}

#[test]
fn unknown_grade_leaves_name_unset() {
    let mut source = ReplaySource::new();
    source.insert_sale(
        HoseId(5),
        SaleId(1),
        make_sale(1, "2024-01-10").with("GetProduct", 6i64),
    );

    let reader = SaleReader::new(source);
    let sale = reader.get_sale(HoseId(5), None).unwrap().unwrap();
    assert_eq!(sale.grade_id, Some(GradeId(6)));
    assert_eq!(sale.grade_name, None);
}

// === Last Sale ===

#[test]
fn controller_wide_last_sale_is_tagged_with_its_hose() {
    let mut source = ReplaySource::new();
    source.insert_sale(
        HoseId(3),
        SaleId(8),
        make_sale(8, "2024-01-10").with("HoseNr", 3i64),
    );
    source.insert_sale(
        HoseId(6),
        SaleId(2),
        make_sale(2, "2024-01-10").with("HoseNr", 6i64),
    );

    let reader = SaleReader::new(source);
    let sale = reader.last_sale(None).unwrap().unwrap();
    assert_eq!(sale.sale_id, SaleId(8));
    assert_eq!(sale.hose_id, HoseId(3));
}
