/// Worksheet selection
///
/// Each yearly workbook holds several sheets (disclaimers, per-brand tables,
/// variable-rent hotel tables). The KPI table we want moved between sheets over
/// the years, so the search keywords depend on the year.
use tracing::debug;

/// Sheets carrying usage notes rather than data
const DISCLAIMER_MARKER: &str = "注意";

/// Sheet name fragments to look for, in priority order
fn era_keywords(year: i32) -> &'static [&'static str] {
    match year {
        y if y >= 2024 => &["変動賃料等導入28ホテル", "変動賃料等導入"],
        2019 => &["変動賃料等導入"],
        2020..=2023 => &["HMJ"],
        _ => &["HMJ"],
    }
}

/// Pick the sheet holding the KPI table for `year`
///
/// Tries each era keyword in order, then falls back to the first sheet that is
/// not a disclaimer sheet.
pub fn select_sheet<S: AsRef<str>>(sheet_names: &[S], year: i32) -> Option<&str> {
    let names: Vec<&str> = sheet_names.iter().map(|name| name.as_ref()).collect();

    for keyword in era_keywords(year) {
        if let Some(name) = names.iter().find(|name| name.contains(keyword)).copied() {
            debug!("Year {} matched sheet '{}' by keyword '{}'", year, name, keyword);
            return Some(name);
        }
    }

    let fallback = names
        .iter()
        .find(|name| !name.contains(DISCLAIMER_MARKER))
        .copied();
    if let Some(name) = fallback {
        debug!("Year {} fell back to first data sheet '{}'", year, name);
    }
    fallback
}
