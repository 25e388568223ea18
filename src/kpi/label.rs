/// Row label classification
///
/// Report rows are identified by their leading label text, e.g. "客室稼働率",
/// "ADR（円）" or "売上高合計（百万円）". Rules are ordered and the first match wins.
use super::grid::Cell;
use super::metric::MetricKind;

/// Label of a row that starts a new hotel block in per-property sheets
const PROPERTY_MARKER: &str = "物件番号";

const CURRENCY_MARKERS: [&str; 4] = ["円", "¥", "￥", "JPY"];

struct LabelRule {
    kind: MetricKind,
    /// Every group must match; a group matches if any of its needles is present
    all_of: &'static [&'static [&'static str]],
}

const RULES: [LabelRule; 8] = [
    LabelRule {
        kind: MetricKind::OccupancyPct,
        all_of: &[&["客室稼働率", "稼働率", "Occupancy"]],
    },
    LabelRule {
        kind: MetricKind::AdrJpy,
        all_of: &[&["ADR"], &CURRENCY_MARKERS],
    },
    LabelRule {
        kind: MetricKind::RevparJpy,
        all_of: &[&["RevPAR"], &CURRENCY_MARKERS],
    },
    LabelRule {
        kind: MetricKind::SalesTotalMil,
        all_of: &[&["売上"], &["合計"]],
    },
    LabelRule {
        kind: MetricKind::SalesLodgingMil,
        all_of: &[&["売上"], &["宿泊", "Room"]],
    },
    LabelRule {
        kind: MetricKind::SalesFnbMil,
        all_of: &[&["売上"], &["料飲", "F&B"]],
    },
    LabelRule {
        kind: MetricKind::SalesOtherMil,
        all_of: &[&["売上"], &["その他"]],
    },
    // Unqualified sales in millions is the hotel total
    LabelRule {
        kind: MetricKind::SalesTotalMil,
        all_of: &[&["売上高"], &["百万円"]],
    },
];

impl LabelRule {
    fn matches(&self, label: &str) -> bool {
        self.all_of
            .iter()
            .all(|group| group.iter().any(|needle| label.contains(needle)))
    }
}

/// Classify label text into a metric kind
pub fn classify_label(label: &str) -> Option<MetricKind> {
    if label.trim().is_empty() {
        return None;
    }
    RULES
        .iter()
        .find(|rule| rule.matches(label))
        .map(|rule| rule.kind)
}

/// Classify a row by the text of its first two cells
pub fn classify_row(row: &[Cell]) -> Option<MetricKind> {
    classify_label(&leading_text(row))
}

/// True for rows that open a new property block
pub fn is_property_marker(row: &[Cell]) -> bool {
    row.first()
        .map(|cell| cell.text().contains(PROPERTY_MARKER))
        .unwrap_or(false)
}

/// Concatenated text of the first two cells; labels are sometimes split
/// across them ("ADR" | "（円）")
fn leading_text(row: &[Cell]) -> String {
    row.iter().take(2).map(Cell::text).collect::<Vec<_>>().join("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupancy_labels() {
        assert_eq!(classify_label("客室稼働率"), Some(MetricKind::OccupancyPct));
        assert_eq!(classify_label("稼働率（%）"), Some(MetricKind::OccupancyPct));
    }

    #[test]
    fn test_rates_require_currency_marker() {
        assert_eq!(classify_label("ADR（円）"), Some(MetricKind::AdrJpy));
        assert_eq!(classify_label("RevPAR（円）"), Some(MetricKind::RevparJpy));
        assert_eq!(classify_label("ADR"), None);
        assert_eq!(classify_label("RevPAR前年比"), None);
    }

    #[test]
    fn test_sales_subtypes() {
        assert_eq!(
            classify_label("売上高合計（百万円）"),
            Some(MetricKind::SalesTotalMil)
        );
        assert_eq!(
            classify_label("宿泊部門売上高（百万円）"),
            Some(MetricKind::SalesLodgingMil)
        );
        assert_eq!(
            classify_label("料飲部門売上高（百万円）"),
            Some(MetricKind::SalesFnbMil)
        );
        assert_eq!(
            classify_label("その他売上高（百万円）"),
            Some(MetricKind::SalesOtherMil)
        );
        assert_eq!(classify_label("売上高（百万円）"), Some(MetricKind::SalesTotalMil));
        assert_eq!(classify_label("売上高"), None);
    }

    #[test]
    fn test_unrelated_labels() {
        assert_eq!(classify_label(""), None);
        assert_eq!(classify_label("2019年"), None);
        assert_eq!(classify_label("物件番号 1"), None);
    }

    #[test]
    fn test_label_split_over_two_cells() {
        let row = vec![Cell::from("ADR"), Cell::from("（円）")];
        assert_eq!(classify_row(&row), Some(MetricKind::AdrJpy));
    }

    #[test]
    fn test_property_marker() {
        assert!(is_property_marker(&[Cell::from("物件番号"), Cell::from("1")]));
        assert!(!is_property_marker(&[Cell::from("客室稼働率")]));
        assert!(!is_property_marker(&[]));
    }
}
