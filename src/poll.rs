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

//! Continuous last-sale polling.
//!
//! Novelty detection compares the most recent known sale id against each
//! cycle's last-sale answer. That id is the only state that crosses
//! cycles, and it is threaded explicitly through [`PollState`] rather
//! than living in a global.

use crate::base::{HoseId, SaleId};
use crate::error::SourceError;
use crate::reader::SaleReader;
use crate::sale::Sale;
use crate::source::SaleSource;
use std::thread;
use std::time::Duration;

/// Default delay between polling cycles.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Cross-cycle polling state: the last sale id handed to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    last_seen: Option<SaleId>,
}

impl PollState {
    /// Fresh state; the first sale observed will always count as new.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent sale id handed out, if any.
    pub fn last_seen(&self) -> Option<SaleId> {
        self.last_seen
    }
}

/// Runs one polling cycle.
///
/// Returns the current last sale only when its id differs from the one in
/// `state`, updating `state` in that case. `Ok(None)` means either no sale
/// was available or the sale was already seen.
pub fn poll_step<S: SaleSource>(
    reader: &SaleReader<S>,
    hose_id: Option<HoseId>,
    state: &mut PollState,
) -> Result<Option<Sale>, SourceError> {
    let Some(sale) = reader.last_sale(hose_id)? else {
        return Ok(None);
    };
    if state.last_seen == Some(sale.sale_id) {
        return Ok(None);
    }
    state.last_seen = Some(sale.sale_id);
    Ok(Some(sale))
}

/// Polls indefinitely at a fixed interval, invoking `on_sale` per novel
/// sale.
///
/// Source errors within a cycle are logged and the loop continues; there
/// is no cancellation beyond terminating the process.
pub fn watch<S: SaleSource, F: FnMut(&Sale)>(
    reader: &SaleReader<S>,
    hose_id: Option<HoseId>,
    interval: Duration,
    state: &mut PollState,
    mut on_sale: F,
) -> ! {
    loop {
        match poll_step(reader, hose_id, state) {
            Ok(Some(sale)) => on_sale(&sale),
            Ok(None) => {}
            Err(err) => tracing::warn!(%err, "polling cycle failed"),
        }
        thread::sleep(interval);
    }
}
