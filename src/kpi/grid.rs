/// Worksheet grid accessor
///
/// The extraction engine never touches spreadsheet files directly. It works on a
/// plain 2-D table of cells per sheet, addressed by absolute (row, column) starting
/// at A1. Anything that can list sheets and hand out such a table implements
/// [`WorkbookSource`].
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("Failed to open workbook: {0}")]
    WorkbookOpen(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),
}

/// A single raw cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

static EMPTY_CELL: Cell = Cell::Empty;

/// Characters stripped from text cells before numeric parsing ("12,345円", "65.3%")
const NUMERIC_NOISE: [char; 5] = [',', '円', '%', '¥', '￥'];

/// Texts that stand for "no value" in the reports
const PLACEHOLDERS: [&str; 5] = ["", "-", "－", "―", "0"];

impl Cell {
    /// Text rendering used for label and period matching
    pub fn text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(f) => f.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Empty cells, dashes and zeroes carry no data
    pub fn is_placeholder(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => PLACEHOLDERS.contains(&s.trim()),
            Cell::Number(f) => *f == 0.0,
        }
    }

    /// Numeric value of the cell, or None for placeholders and unparseable text
    pub fn as_number(&self) -> Option<f64> {
        if self.is_placeholder() {
            return None;
        }

        match self {
            Cell::Number(f) if f.is_finite() => Some(*f),
            Cell::Text(s) => {
                let cleaned: String = s
                    .trim()
                    .chars()
                    .filter(|c| !NUMERIC_NOISE.contains(c))
                    .collect();
                cleaned
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
            }
            _ => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// Row-major table of cells for one worksheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell at (row, col); out-of-bounds positions read as empty
    pub fn get(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

/// Anything that exposes named worksheets as grids
pub trait WorkbookSource {
    fn sheet_names(&self) -> Vec<String>;

    fn grid(&mut self, sheet_name: &str) -> Result<Grid, WorkbookError>;
}

/// Workbook held entirely in memory, sheets in insertion order
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkbook {
    sheets: Vec<(String, Grid)>,
}

impl InMemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: impl Into<String>, grid: Grid) -> Self {
        self.sheets.push((name.into(), grid));
        self
    }
}

impl WorkbookSource for InMemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn grid(&mut self, sheet_name: &str) -> Result<Grid, WorkbookError> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet_name)
            .map(|(_, grid)| grid.clone())
            .ok_or_else(|| WorkbookError::SheetNotFound(sheet_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_have_no_number() {
        assert_eq!(Cell::Empty.as_number(), None);
        assert_eq!(Cell::from("-").as_number(), None);
        assert_eq!(Cell::from(" 0 ").as_number(), None);
        assert_eq!(Cell::Number(0.0).as_number(), None);
    }

    #[test]
    fn test_text_numbers_are_cleaned() {
        assert_eq!(Cell::from("12,345円").as_number(), Some(12345.0));
        assert_eq!(Cell::from("65.3%").as_number(), Some(65.3));
        assert_eq!(Cell::from("n/a").as_number(), None);
    }

    #[test]
    fn test_out_of_bounds_reads_empty() {
        let grid = Grid::new(vec![vec![Cell::from("a")]]);
        assert_eq!(grid.get(0, 0), &Cell::from("a"));
        assert_eq!(grid.get(0, 5), &Cell::Empty);
        assert_eq!(grid.get(9, 0), &Cell::Empty);
    }

    #[test]
    fn test_in_memory_workbook_missing_sheet() {
        let mut workbook = InMemoryWorkbook::new().with_sheet("HMJ", Grid::default());
        assert_eq!(workbook.sheet_names(), vec!["HMJ".to_string()]);
        assert!(workbook.grid("HMJ").is_ok());
        assert!(matches!(
            workbook.grid("other"),
            Err(WorkbookError::SheetNotFound(_))
        ));
    }
}
