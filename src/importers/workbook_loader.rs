use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::kpi::grid::{Cell, Grid, WorkbookError, WorkbookSource};

/// A yearly report workbook on disk (xlsx or legacy xls)
pub struct ReportWorkbook {
    path: PathBuf,
    workbook: Sheets<Cursor<Vec<u8>>>,
}

impl ReportWorkbook {
    /// Open a workbook; the format is detected from the file contents
    ///
    /// Cached reports are always named `.xlsx`, but older years are BIFF `.xls`
    /// files, so the extension cannot be trusted.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WorkbookError> {
        let path = path.as_ref().to_path_buf();
        info!("Opening workbook: {}", path.display());

        let bytes = std::fs::read(&path)
            .map_err(|e| WorkbookError::WorkbookOpen(format!("{}: {e}", path.display())))?;
        let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| WorkbookError::WorkbookOpen(format!("{}: {e}", path.display())))?;

        debug!("Workbook sheets: {:?}", workbook.sheet_names());
        Ok(Self { path, workbook })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WorkbookSource for ReportWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn grid(&mut self, sheet_name: &str) -> Result<Grid, WorkbookError> {
        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|_| WorkbookError::SheetNotFound(sheet_name.to_string()))?;

        let grid = range_to_grid(&range);
        debug!(
            "Sheet '{}' loaded: {} rows x {} columns",
            sheet_name,
            grid.height(),
            grid.width()
        );
        Ok(grid)
    }
}

/// Convert a calamine range into a grid addressed from A1
///
/// calamine ranges start at the first used cell, while the extractors rely on
/// absolute column positions, so leading empty rows and columns are restored.
pub fn range_to_grid(range: &Range<Data>) -> Grid {
    let Some((start_row, start_col)) = range.start() else {
        return Grid::default();
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); start_row];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; start_col];
        cells.extend(row.iter().map(data_to_cell));
        rows.push(cells);
    }
    Grid::new(rows)
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::Bool(b) => Cell::Text(b.to_string()),
        _ => Cell::Empty,
    }
}
