use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hotel_kpi_tracker::importers::ReportWorkbook;
use hotel_kpi_tracker::kpi::label::{classify_row, is_property_marker};
use hotel_kpi_tracker::kpi::{matches_year, select_sheet, Era, WorkbookSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,hotel_kpi_tracker=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let args: Vec<String> = env::args().collect();
    let file_path = if args.len() > 1 {
        &args[1]
    } else {
        "data/jhr_2016_hotel_performance.xlsx"
    };
    let year: i32 = match args.get(2) {
        Some(year) => year.parse()?,
        None => 2016,
    };

    println!("Opening workbook: {file_path}");
    let mut workbook = ReportWorkbook::open(file_path)?;

    let sheet_names = workbook.sheet_names();
    println!("\nSheet names:");
    for (i, name) in sheet_names.iter().enumerate() {
        println!("  {i}: {name}");
    }

    let Some(sheet_name) = select_sheet(&sheet_names, year) else {
        println!("\nNo sheet selected for {year}");
        return Ok(());
    };
    let sheet_name = sheet_name.to_string();
    let era = Era::for_year(year);

    println!("\n\nExamining sheet: {sheet_name} ({year}, {era})");
    println!("{}", "=".repeat(100));

    let grid = workbook.grid(&sheet_name)?;
    println!("Dimensions: {} rows x {} columns", grid.height(), grid.width());
    println!("\nFirst 60 rows (showing first 8 columns):");
    println!("{}", "=".repeat(100));

    for (row_idx, row) in grid.rows().enumerate().take(60) {
        // Only print rows with data
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let mut tags = Vec::new();
        if is_property_marker(row) {
            tags.push("property".to_string());
        }
        if let Some(kind) = classify_row(row) {
            tags.push(kind.key().to_string());
        }
        if row.iter().take(5).any(|cell| matches_year(&cell.text(), year)) {
            tags.push(format!("{year}"));
        }

        print!("Row {:3}: ", row_idx + 1);
        for cell in row.iter().take(8) {
            if cell.is_empty() {
                print!("[empty] ");
            } else {
                print!("[{}] ", cell.text());
            }
        }
        if !tags.is_empty() {
            print!(" <- {}", tags.join(", "));
        }
        println!();
    }

    let data = era.extract(&grid, year, &Default::default());
    println!("\n{}", "=".repeat(100));
    println!("Extracted {} valid months", data.valid_months());
    for (month, record) in data.iter() {
        println!("  {month:02}: {record:?}");
    }

    Ok(())
}
