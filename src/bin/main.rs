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

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use fusion_bridge_rs::{
    GradeId, HoseId, ReplaySource, Sale, SaleId, SaleReader, SourceError, catalog, raw,
    source::CONNECT_SETTLE,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::thread;
use tracing_subscriber::EnvFilter;

/// Fusion Bridge - Query a Wayne Fusion controller for products and sales
///
/// Connects to the controller, then performs one action: read a product
/// grade, fetch the last or a specific sale for a hose, collect a whole
/// day's sales, or list all configured products. Day output is CSV on
/// stdout.
#[derive(Parser, Debug)]
#[command(name = "fusion-bridge-rs")]
#[command(about = "A bridge for Wayne Fusion forecourt controllers", long_about = None)]
struct Args {
    /// Action to perform
    #[arg(long, value_enum)]
    action: Action,

    /// Controller address (required for everything except list-methods)
    #[arg(long)]
    address: Option<String>,

    /// Controller capture file played back as the transport
    #[arg(long)]
    capture: Option<PathBuf>,

    /// Product table (grade,name CSV) for grade-name lookups
    #[arg(long)]
    products: Option<PathBuf>,

    /// Hose to query (0 = all hoses, where the action allows it)
    #[arg(long)]
    hose_id: Option<u16>,

    /// Sale number to query (0 = last sale)
    #[arg(long, default_value_t = 0)]
    sale_number: u32,

    /// Grade slot to read (1-8)
    #[arg(long)]
    grade: Option<u8>,

    /// Day to filter sales by (YYYY-MM-DD)
    #[arg(long)]
    day: Option<NaiveDate>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Action {
    ReadProduct,
    ListMethods,
    LastSale,
    SpecificSale,
    SalesForDay,
    ListProducts,
}

fn main() {
    let args = Args::parse();
    init_logging(&args.log_level);

    // Introspection needs no controller.
    if matches!(args.action, Action::ListMethods) {
        print_methods();
        return;
    }

    let Some(address) = args.address.clone() else {
        eprintln!("--address is required for this action");
        process::exit(1);
    };

    let reader = match connect(&address, args.capture.as_deref(), args.products.as_deref()) {
        Ok(reader) => reader,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&args, &reader) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Opens the sale source for `address` and lets the link settle before
/// the first request.
///
/// The native driver binding is outside this build; the shipped transport
/// is capture playback, so a missing capture file reads as a connection
/// failure.
fn connect(
    address: &str,
    capture: Option<&Path>,
    products: Option<&Path>,
) -> Result<SaleReader<ReplaySource>, SourceError> {
    let Some(capture) = capture else {
        return Err(SourceError::connection(
            address,
            "no capture file given and no native driver binding in this build",
        ));
    };
    let source = ReplaySource::open(capture, products)?;
    tracing::info!(address, "link established, settling");
    thread::sleep(CONNECT_SETTLE);
    Ok(SaleReader::new(source))
}

fn run(args: &Args, reader: &SaleReader<ReplaySource>) -> Result<(), SourceError> {
    match args.action {
        Action::ListMethods => unreachable!("handled before connecting"),
        Action::ReadProduct => {
            let Some(grade) = args.grade else {
                eprintln!("--grade is required to read a product");
                process::exit(1);
            };
            match catalog::product_name(reader.source(), GradeId(grade))? {
                Some(name) => println!("Product at grade {}: {}", grade, name),
                None => println!("No product configured at grade {}.", grade),
            }
        }
        Action::LastSale => {
            let Some(hose) = args.hose_id else {
                eprintln!("--hose-id is required to query the last sale");
                process::exit(1);
            };
            match reader.get_sale(HoseId(hose), None)? {
                Some(sale) => print_sale(&sale),
                None => println!("No sale available for hose {}.", hose),
            }
        }
        Action::SpecificSale => {
            let Some(hose) = args.hose_id else {
                eprintln!("--hose-id is required to query a specific sale");
                process::exit(1);
            };
            match reader.get_sale(HoseId(hose), Some(SaleId(args.sale_number)))? {
                Some(sale) => print_sale(&sale),
                None => println!(
                    "No sale {} recorded for hose {}.",
                    args.sale_number, hose
                ),
            }
        }
        Action::SalesForDay => {
            let Some(day) = args.day else {
                eprintln!("--day (YYYY-MM-DD) is required to query a day's sales");
                process::exit(1);
            };
            let hose = args.hose_id.map(HoseId);
            let sales = reader.sales_for_day(hose, day)?;
            if sales.is_empty() {
                eprintln!("No sales found for {}.", day);
            } else if let Err(e) = write_sales(&sales, std::io::stdout()) {
                eprintln!("Error writing output: {}", e);
                process::exit(1);
            }
        }
        Action::ListProducts => {
            let products = catalog::list_products(reader.source(), catalog::DEFAULT_MAX_GRADE)?;
            if products.is_empty() {
                println!("No products configured.");
            } else {
                for (grade, name) in products {
                    println!("Grade {}: {}", grade, name);
                }
            }
        }
    }
    Ok(())
}

/// Prints one sale as key: value lines.
fn print_sale(sale: &Sale) {
    println!("sale_id: {}", sale.sale_id);
    println!("hose_id: {}", sale.hose_id);
    println!("pump_id: {}", display_opt(&sale.pump_id));
    println!("grade_id: {}", display_opt(&sale.grade_id));
    println!("grade_name: {}", display_opt(&sale.grade_name));
    println!("volume: {}", display_opt(&sale.volume));
    println!("amount: {}", display_opt(&sale.amount));
    println!("unit_price: {}", display_opt(&sale.unit_price));
    println!("date: {}", display_opt(&sale.transaction_date));
    println!("time: {}", display_opt(&sale.transaction_time));
}

fn display_opt<T: std::fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_owned(),
    }
}

/// Writes a day's sales as CSV.
fn write_sales<W: Write>(sales: &[Sale], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for sale in sales {
        wtr.serialize(sale)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Prints the capability contract and the per-field probe order — the
/// replacement for poking at the driver with reflection.
fn print_methods() {
    println!("--- SaleSource capability ---");
    println!("get_grade_name(grade) -> name?");
    println!("get_sale(hose_id, sale_number?) -> raw_sale?");
    println!("get_last_sale(hose_id?) -> raw_sale?");
    println!();
    println!("--- Field probe order (first surface wins) ---");
    for (field, keys) in raw::FIELD_SURFACES {
        println!("{}: {}", field, keys.join(", "));
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
