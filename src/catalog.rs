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

//! Product catalog reader.
//!
//! The controller exposes no "list grades" call, only a per-grade name
//! lookup, so enumeration walks grade numbers `1..=max` and keeps the
//! slots that answered with a non-empty name.

use crate::base::GradeId;
use crate::error::SourceError;
use crate::source::SaleSource;

/// Highest grade slot probed by default. Fusion installations configure
/// at most 8 grades.
pub const DEFAULT_MAX_GRADE: u8 = 8;

/// Resolves one grade to its product name.
///
/// Blank names count as unconfigured and come back as `None`.
pub fn product_name<S: SaleSource>(
    source: &S,
    grade: GradeId,
) -> Result<Option<String>, SourceError> {
    Ok(source
        .get_grade_name(grade)?
        .filter(|name| !name.trim().is_empty()))
}

/// Enumerates configured products over grade slots `1..=max_grade`.
///
/// Unconfigured slots are skipped; order is ascending by grade number.
pub fn list_products<S: SaleSource>(
    source: &S,
    max_grade: u8,
) -> Result<Vec<(GradeId, String)>, SourceError> {
    let mut products = Vec::new();
    for slot in 1..=max_grade {
        let grade = GradeId(slot);
        if let Some(name) = product_name(source, grade)? {
            products.push((grade, name));
        }
    }
    Ok(products)
}
