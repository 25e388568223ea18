#![allow(dead_code)]

use rust_xlsxwriter::{Workbook, XlsxError};
use std::path::Path;

/// A fixture cell
pub enum Value {
    Text(&'static str),
    Number(f64),
    Blank,
}

pub use Value::{Blank, Number, Text};

/// A labelled row: label, year label, then monthly values from column 2
pub fn metric_row(label: &'static str, year: &'static str, values: &[f64]) -> Vec<Value> {
    let mut row = vec![Text(label), Text(year)];
    row.extend(values.iter().map(|v| Number(*v)));
    row
}

/// Write a workbook with the given sheets, each a list of rows starting at A1
pub fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<Value>>)]) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();

    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name)?;

        for (row_idx, row) in rows.iter().enumerate() {
            for (col_idx, value) in row.iter().enumerate() {
                let (r, c) = (row_idx as u32, col_idx as u16);
                match value {
                    Text(text) => {
                        worksheet.write_string(r, c, *text)?;
                    }
                    Number(number) => {
                        worksheet.write_number(r, c, *number)?;
                    }
                    Blank => {}
                }
            }
        }
    }

    workbook.save(path)
}

/// The 2016 legacy fixture: an aggregated table behind a disclaimer sheet
pub fn legacy_2016_sheets() -> Vec<(&'static str, Vec<Vec<Value>>)> {
    vec![
        ("ご利用上の注意", vec![vec![Text("本資料のご利用上の注意")]]),
        (
            "HMJ5ホテル",
            vec![
                vec![Text("HMJ5ホテル 運営実績"), Blank, Text("1月"), Text("2月")],
                metric_row(
                    "客室稼働率",
                    "2016年",
                    &[55.0, 60.0, 65.0, 70.0, 75.0, 80.0, 85.0, 80.0, 75.0, 70.0, 65.0, 60.0],
                ),
                metric_row("", "2015年", &[50.0; 12]),
                metric_row("ADR（円）", "2016年", &[12000.0; 12]),
                metric_row("RevPAR（円）", "2016年", &[8400.0; 12]),
                metric_row("売上高合計（百万円）", "2016年", &[1500.0; 12]),
            ],
        ),
    ]
}
