//! Filter matching and drag-selection resolution for data bins.

use crate::binning::PlotPoint;
use crate::model::{ActiveFilter, DataBin};

fn range_matches(bin: &DataBin, filter: &ActiveFilter) -> bool {
    match (bin.range(), filter.start.zip(filter.end)) {
        (Some(bin_range), Some(filter_range)) => bin_range == filter_range,
        _ => false,
    }
}

fn value_matches(bin: &DataBin, filter: &ActiveFilter) -> bool {
    match (&filter.value, &bin.special_value) {
        (Some(value), Some(special)) => value == special,
        _ => false,
    }
}

/// True when some filter has the bin's exact `(start, end)` or its special value.
pub fn is_selected(bin: &DataBin, filters: &[ActiveFilter]) -> bool {
    filters
        .iter()
        .any(|filter| range_matches(bin, filter) || value_matches(bin, filter))
}

/// Source bins of the points a drag touched, in order. Empty means "clear".
pub fn resolve_drag_selection(selected: &[PlotPoint]) -> Vec<DataBin> {
    selected.iter().map(|p| p.source_bin.clone()).collect()
}

/// Points whose bar `[position - half_width, position + half_width]` overlaps `[x0, x1]`.
pub fn points_in_x_range(
    points: &[PlotPoint],
    x0: f64,
    x1: f64,
    half_width: f64,
) -> Vec<PlotPoint> {
    let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
    points
        .iter()
        .filter(|p| {
            let center = p.position as f64;
            center + half_width >= lo && center - half_width <= hi
        })
        .cloned()
        .collect()
}

/// Toggles `value` in `current`, keeping the order of the remaining values.
pub fn toggle_value(current: &[String], value: &str) -> Vec<String> {
    if current.iter().any(|v| v == value) {
        current.iter().filter(|v| *v != value).cloned().collect()
    } else {
        let mut next = current.to_vec();
        next.push(value.to_string());
        next
    }
}

/// Category values named by a filter list.
pub fn filter_values(filters: &[ActiveFilter]) -> Vec<String> {
    filters.iter().filter_map(|f| f.value.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(position: usize, bin: DataBin) -> PlotPoint {
        PlotPoint {
            position,
            magnitude: bin.count as f64,
            source_bin: bin,
        }
    }

    #[test]
    fn range_filter_selects_exact_bin() {
        let filters = vec![ActiveFilter::range(0.0, 10.0)];
        assert!(is_selected(&DataBin::numeric(0.0, 10.0, 5), &filters));
        assert!(!is_selected(&DataBin::numeric(10.0, 20.0, 3), &filters));
    }

    #[test]
    fn value_filter_selects_special_bin() {
        let filters = vec![ActiveFilter::value("NA")];
        assert!(is_selected(&DataBin::special("NA", 2), &filters));
        assert!(!is_selected(&DataBin::special("Unknown", 2), &filters));
        assert!(!is_selected(&DataBin::numeric(0.0, 10.0, 5), &filters));
    }

    #[test]
    fn undefined_ranges_never_match() {
        let filters = vec![ActiveFilter::default()];
        assert!(!is_selected(&DataBin::special("NA", 2), &filters));
    }

    #[test]
    fn empty_filters_select_nothing() {
        assert!(!is_selected(&DataBin::numeric(0.0, 10.0, 5), &[]));
        assert!(!is_selected(&DataBin::special("NA", 1), &[]));
    }

    #[test]
    fn drag_keeps_order_and_allows_empty() {
        let points = vec![
            point(1, DataBin::numeric(0.0, 10.0, 5)),
            point(2, DataBin::special("NA", 2)),
        ];
        let bins = resolve_drag_selection(&points);
        assert_eq!(bins, vec![DataBin::numeric(0.0, 10.0, 5), DataBin::special("NA", 2)]);
        assert!(resolve_drag_selection(&[]).is_empty());
    }

    #[test]
    fn x_range_uses_bar_width() {
        let points: Vec<PlotPoint> = (1..=4)
            .map(|i| point(i, DataBin::numeric(i as f64, i as f64 + 1.0, 1)))
            .collect();
        let hit = points_in_x_range(&points, 2.8, 1.5, 0.3);
        let positions: Vec<usize> = hit.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![2, 3]);
        assert!(points_in_x_range(&points, 4.4, 5.0, 0.3).is_empty());
    }

    #[test]
    fn toggle_adds_and_removes() {
        let current = vec!["A".to_string(), "B".to_string()];
        assert_eq!(toggle_value(&current, "A"), vec!["B".to_string()]);
        assert_eq!(
            toggle_value(&current, "C"),
            vec!["A".to_string(), "B".to_string(), "C".to_string()]
        );
    }
}
