use crate::apex;
use crate::storage::models::DistributionRow;
use ahash::AHashMap;
use serde::Serialize;

/// Label used when the catalog has no value for a text dimension.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// A photo attribute that the catalog can be histogrammed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Date,
    Camera,
    Lens,
    FocalLength,
    Aperture,
    ExposureTime,
    EditCount,
    Keyword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortOrder {
    LabelAscending,
    CountDescending,
    ValueAscending,
}

impl Dimension {
    pub const ALL: [Dimension; 8] = [
        Dimension::Date,
        Dimension::Camera,
        Dimension::Lens,
        Dimension::FocalLength,
        Dimension::Aperture,
        Dimension::ExposureTime,
        Dimension::EditCount,
        Dimension::Keyword,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Date => "date",
            Dimension::Camera => "camera",
            Dimension::Lens => "lens",
            Dimension::FocalLength => "focal_length",
            Dimension::Aperture => "aperture",
            Dimension::ExposureTime => "exposure_time",
            Dimension::EditCount => "edit_count",
            Dimension::Keyword => "keyword",
        }
    }

    fn sort_order(&self) -> SortOrder {
        match self {
            Dimension::Date => SortOrder::LabelAscending,
            Dimension::Camera | Dimension::Lens | Dimension::FocalLength | Dimension::Keyword => {
                SortOrder::CountDescending
            }
            Dimension::Aperture | Dimension::ExposureTime | Dimension::EditCount => {
                SortOrder::ValueAscending
            }
        }
    }

    fn label_for(&self, row: &DistributionRow) -> String {
        match (self, row.value) {
            (Dimension::Aperture, Some(v)) => apex::format_f_number(v),
            (Dimension::ExposureTime, Some(v)) => apex::shutter_speed_to_exposure_time(v),
            (Dimension::FocalLength | Dimension::EditCount, Some(v)) => v.to_string(),
            _ => row
                .label
                .clone()
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionEntry {
    pub id: i64,
    pub label: String,
    pub count: i64,
}

/// A label → count histogram with at most one entry per label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Distribution(Vec<DistributionEntry>);

impl Distribution {
    /// Formats the grouped rows for `dimension` and puts them in that
    /// dimension's order: dates ascending, names and focal lengths by
    /// descending count, aperture, shutter speed and edit counts by ascending
    /// numeric value. Rows that format to the same label are folded together.
    /// Sorting is stable, so ties keep the row order.
    pub fn from_rows(dimension: Dimension, rows: Vec<DistributionRow>) -> Self {
        let mut index: AHashMap<String, usize> = AHashMap::with_capacity(rows.len());
        let mut entries: Vec<(DistributionEntry, f64)> = Vec::with_capacity(rows.len());

        for row in rows {
            let label = dimension.label_for(&row);
            match index.get(&label) {
                Some(&i) => entries[i].0.count += row.count,
                None => {
                    index.insert(label.clone(), entries.len());
                    entries.push((
                        DistributionEntry {
                            id: row.id,
                            label,
                            count: row.count,
                        },
                        row.value.unwrap_or(f64::INFINITY),
                    ));
                }
            }
        }

        match dimension.sort_order() {
            SortOrder::LabelAscending => entries.sort_by(|(a, _), (b, _)| a.label.cmp(&b.label)),
            SortOrder::CountDescending => entries.sort_by(|(a, _), (b, _)| b.count.cmp(&a.count)),
            SortOrder::ValueAscending => entries.sort_by(|(_, a), (_, b)| a.total_cmp(b)),
        }

        Distribution(entries.into_iter().map(|(entry, _)| entry).collect())
    }

    /// Sums the counts of both distributions per label. The id of the first
    /// entry seen for a label is kept.
    ///
    /// The result is sorted by label, not by the dimension's own order. For
    /// dates that is chronological; for the other dimensions callers that
    /// care must re-sort.
    pub fn merge(&self, other: &Distribution) -> Distribution {
        Distribution::merge_all([self, other])
    }

    pub fn merge_all<'a, I>(distributions: I) -> Distribution
    where
        I: IntoIterator<Item = &'a Distribution>,
    {
        let mut index: AHashMap<&str, usize> = AHashMap::new();
        let mut merged: Vec<DistributionEntry> = Vec::new();

        for distribution in distributions {
            for entry in &distribution.0 {
                match index.get(entry.label.as_str()) {
                    Some(&i) => merged[i].count += entry.count,
                    None => {
                        index.insert(entry.label.as_str(), merged.len());
                        merged.push(entry.clone());
                    }
                }
            }
        }

        let mut merged = Distribution(merged);
        merged.sort_by_label();
        merged
    }

    pub fn sort_by_label(&mut self) {
        self.0.sort_by(|a, b| a.label.cmp(&b.label));
    }

    pub fn get(&self, label: &str) -> Option<&DistributionEntry> {
        self.0.iter().find(|e| e.label == label)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn total(&self) -> i64 {
        self.0.iter().map(|e| e.count).sum()
    }

    pub fn entries(&self) -> &[DistributionEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<DistributionEntry>> for Distribution {
    fn from(entries: Vec<DistributionEntry>) -> Self {
        Distribution(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(entries: &[(&str, i64)]) -> Distribution {
        entries
            .iter()
            .map(|(label, count)| DistributionEntry {
                id: 0,
                label: label.to_string(),
                count: *count,
            })
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_dates_sort_ascending() {
        let rows = vec![
            DistributionRow::labeled(0, Some("2021-03-01"), 4),
            DistributionRow::labeled(0, Some("2020-12-31"), 9),
        ];
        let d = Distribution::from_rows(Dimension::Date, rows);
        assert_eq!(d.labels(), vec!["2020-12-31", "2021-03-01"]);
    }

    #[test]
    fn test_undated_photos_get_unknown_label_after_dates() {
        let rows = vec![
            DistributionRow::labeled(0, None, 2),
            DistributionRow::labeled(0, Some("2020-12-31"), 9),
        ];
        let d = Distribution::from_rows(Dimension::Date, rows);
        assert_eq!(d.labels(), vec!["2020-12-31", UNKNOWN_LABEL]);
        assert_eq!(d.get(UNKNOWN_LABEL).unwrap().count, 2);
    }

    #[test]
    fn test_cameras_sort_by_count_with_unknown_default() {
        let rows = vec![
            DistributionRow::labeled(1, Some("X100V"), 2),
            DistributionRow::labeled(2, None, 1),
            DistributionRow::labeled(3, Some("EOS R5"), 10),
        ];
        let d = Distribution::from_rows(Dimension::Camera, rows);
        assert_eq!(d.labels(), vec!["EOS R5", "X100V", UNKNOWN_LABEL]);
        assert_eq!(d.get("EOS R5").unwrap().id, 3);
    }

    #[test]
    fn test_count_ties_keep_row_order() {
        let rows = vec![
            DistributionRow::labeled(1, Some("b"), 5),
            DistributionRow::labeled(2, Some("a"), 5),
        ];
        let d = Distribution::from_rows(Dimension::Lens, rows);
        assert_eq!(d.labels(), vec!["b", "a"]);
    }

    #[test]
    fn test_aperture_sorts_by_value_not_label() {
        let rows = vec![
            DistributionRow::valued(0, 8.0, 1),
            DistributionRow::valued(0, 2.0, 3),
            DistributionRow::valued(0, 5.0, 2),
        ];
        let d = Distribution::from_rows(Dimension::Aperture, rows);
        // "16.0" would sort before "2.0" as a string
        assert_eq!(d.labels(), vec!["2.0", "5.7", "16.0"]);
    }

    #[test]
    fn test_exposure_time_labels() {
        let rows = vec![
            DistributionRow::valued(0, 8.0, 1),
            DistributionRow::valued(0, 0.0, 1),
            DistributionRow::valued(0, 7.0, 6),
        ];
        let d = Distribution::from_rows(Dimension::ExposureTime, rows);
        assert_eq!(d.labels(), vec!["1/1", "1/128", "1/256"]);
    }

    #[test]
    fn test_focal_length_label_is_raw_value() {
        let rows = vec![
            DistributionRow::valued(4, 18.5, 2),
            DistributionRow::valued(5, 50.0, 7),
        ];
        let d = Distribution::from_rows(Dimension::FocalLength, rows);
        assert_eq!(d.labels(), vec!["50", "18.5"]);
    }

    #[test]
    fn test_rows_with_same_label_are_folded() {
        let rows = vec![
            DistributionRow::valued(0, 5.02, 2),
            DistributionRow::valued(0, 5.0, 3),
        ];
        let d = Distribution::from_rows(Dimension::Aperture, rows);
        assert_eq!(d.len(), 1);
        assert_eq!(d.get("5.7").unwrap().count, 5);
    }

    #[test]
    fn test_merge_sums_shared_labels() {
        let a = dist(&[("2020-01-01", 3)]);
        let b = dist(&[("2020-01-01", 2), ("2020-01-02", 1)]);
        let merged = a.merge(&b);
        assert_eq!(merged.labels(), vec!["2020-01-01", "2020-01-02"]);
        assert_eq!(merged.get("2020-01-01").unwrap().count, 5);
        assert_eq!(merged.get("2020-01-02").unwrap().count, 1);
    }

    #[test]
    fn test_merge_preserves_total_for_disjoint_labels() {
        let a = dist(&[("x", 3), ("y", 4)]);
        let b = dist(&[("z", 10)]);
        assert_eq!(a.merge(&b).total(), a.total() + b.total());
    }

    #[test]
    fn test_merge_keeps_first_seen_id() {
        let a = Distribution::from(vec![DistributionEntry { id: 7, label: "L".into(), count: 1 }]);
        let b = Distribution::from(vec![DistributionEntry { id: 9, label: "L".into(), count: 1 }]);
        assert_eq!(a.merge(&b).get("L").unwrap().id, 7);
        assert_eq!(b.merge(&a).get("L").unwrap().id, 9);
    }

    #[test]
    fn test_merge_orders_by_label_not_count() {
        let a = dist(&[("zeiss", 100), ("canon", 1)]);
        let merged = a.merge(&Distribution::default());
        assert_eq!(merged.labels(), vec!["canon", "zeiss"]);
    }
}
