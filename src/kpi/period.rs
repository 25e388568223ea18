/// Fiscal year matching for row labels such as "2016年", "平成28年" or "令和元年"
use super::grid::Cell;

const HEISEI_START: i32 = 1989;
const HEISEI_END: i32 = 2019;
const REIWA_START: i32 = 2019;

/// Labels that denote `year` in the reports
pub fn year_labels(year: i32) -> Vec<String> {
    let mut labels = vec![format!("{year}年")];
    if (HEISEI_START..=HEISEI_END).contains(&year) {
        labels.extend(era_labels("平成", year - HEISEI_START + 1));
    }
    if year >= REIWA_START {
        labels.extend(era_labels("令和", year - REIWA_START + 1));
    }
    labels
}

fn era_labels(era: &str, era_year: i32) -> Vec<String> {
    let mut labels = vec![format!("{era}{era_year}年")];
    if era_year == 1 {
        labels.push(format!("{era}元年"));
    }
    labels
}

/// True if the text carries a label for `year`. Bare digits never match; the
/// "年" marker is required.
pub fn matches_year(text: &str, year: i32) -> bool {
    year_labels(year)
        .iter()
        .any(|label| text.contains(label.as_str()))
}

/// Check the given candidate columns of a row for a year label
pub fn row_matches_year(row: &[Cell], columns: std::ops::Range<usize>, year: i32) -> bool {
    let labels = year_labels(year);
    columns
        .filter_map(|col| row.get(col))
        .map(Cell::text)
        .any(|text| labels.iter().any(|label| text.contains(label.as_str())))
}
