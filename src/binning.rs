//! Turns data-bin records into one ordered histogram axis: numeric bins by start, then special
//! categories, with tick labels index-aligned to the plotted positions.

use crate::config::TickConfig;
use crate::error::ChartError;
use crate::model::DataBin;

/// Rotation applied to tick labels once the axis gets crowded.
pub const ROTATED_TICK_ANGLE: f64 = 315.0;

/// Axis tick label. Scientific values are split so the exponent can be stacked above the mantissa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickLabel {
    Single(String),
    Stacked(String, String),
}

impl TickLabel {
    /// Flat text, with `^` between mantissa and exponent.
    pub fn text(&self) -> String {
        match self {
            Self::Single(s) => s.clone(),
            Self::Stacked(mantissa, exponent) => format!("{}^{}", mantissa, exponent),
        }
    }
}

/// One rendered bar.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotPoint {
    /// Dense 1-based rank on the x axis.
    pub position: usize,
    pub magnitude: f64,
    pub source_bin: DataBin,
}

enum BinShape {
    Numeric(f64),
    Categorical,
}

fn classify(index: usize, bin: &DataBin) -> Result<BinShape, ChartError> {
    match (bin.start, bin.end, bin.special_value.as_ref()) {
        (Some(_), Some(_), Some(_)) => Err(ChartError::invalid_bin(
            index,
            "has both a numeric range and a special value",
        )),
        (Some(start), Some(end), None) => {
            if start.is_finite() && end.is_finite() {
                Ok(BinShape::Numeric(start))
            } else {
                Err(ChartError::invalid_bin(
                    index,
                    format!("non-finite boundary [{}, {})", start, end),
                ))
            }
        }
        (None, None, Some(_)) => Ok(BinShape::Categorical),
        (None, None, None) => Err(ChartError::invalid_bin(
            index,
            "has neither a numeric range nor a special value",
        )),
        _ => Err(ChartError::invalid_bin(index, "has an incomplete numeric range")),
    }
}

/// Checks every record is exactly one of numeric or categorical.
pub fn validate_bins(records: &[DataBin]) -> Result<(), ChartError> {
    for (i, bin) in records.iter().enumerate() {
        classify(i, bin)?;
    }
    Ok(())
}

/// Numeric bins sorted ascending by start. Equal starts keep their input order.
pub fn partition_numeric(records: &[DataBin]) -> Result<Vec<DataBin>, ChartError> {
    let mut keyed = Vec::new();
    for (i, bin) in records.iter().enumerate() {
        if let BinShape::Numeric(start) = classify(i, bin)? {
            keyed.push((start, bin));
        }
    }
    // slice::sort_by is stable
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(keyed.into_iter().map(|(_, bin)| bin.clone()).collect())
}

/// Special-value bins in input order.
pub fn partition_categorical(records: &[DataBin]) -> Result<Vec<DataBin>, ChartError> {
    let mut out = Vec::new();
    for (i, bin) in records.iter().enumerate() {
        if let BinShape::Categorical = classify(i, bin)? {
            out.push(bin.clone());
        }
    }
    Ok(out)
}

/// Assigns positions 1..=N: numeric bins first, then categorical bins starting right after the
/// `tick_labels_len` numeric tick labels. Both inputs must come from the same numeric partition.
pub fn to_plot_points(
    numeric_bins: &[DataBin],
    categorical_bins: &[DataBin],
    tick_labels_len: usize,
) -> Vec<PlotPoint> {
    let numeric = numeric_bins.iter().enumerate().map(|(i, bin)| PlotPoint {
        position: i + 1,
        magnitude: bin.count as f64,
        source_bin: bin.clone(),
    });
    let categorical = categorical_bins
        .iter()
        .enumerate()
        .map(|(i, bin)| PlotPoint {
            position: tick_labels_len + i + 1,
            magnitude: bin.count as f64,
            source_bin: bin.clone(),
        });
    numeric.chain(categorical).collect()
}

fn significant_digits(v: f64) -> usize {
    let s = format!("{}", v.abs());
    let has_point = s.contains('.');
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    let digits = digits.trim_start_matches('0');
    let digits = if has_point {
        digits
    } else {
        digits.trim_end_matches('0')
    };
    digits.len().max(1)
}

fn trim_decimal(s: String) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

fn scientific_label(v: f64, digits: usize) -> TickLabel {
    let decimals = digits.saturating_sub(1);
    // LowerExp rounds and carries into the exponent, subnormals included.
    let formatted = format!("{:.*e}", decimals, v);
    let (coefficient, exponent) = formatted
        .split_once('e')
        .unwrap_or((formatted.as_str(), "0"));
    let rounded = trim_decimal(coefficient.to_string());
    let mantissa = match rounded.as_str() {
        "1" => "10".to_string(),
        "-1" => "-10".to_string(),
        other => format!("{}×10", other),
    };
    TickLabel::Stacked(mantissa, exponent.to_string())
}

/// Formats one boundary value. Large magnitudes and values needing more than
/// `max_significant_digits` digits get a stacked scientific label.
pub fn format_tick_value(v: f64, config: &TickConfig) -> Result<TickLabel, ChartError> {
    if !v.is_finite() {
        return Err(ChartError::invalid_bin(0, format!("non-finite tick value {}", v)));
    }
    if v == 0.0 {
        return Ok(TickLabel::Single("0".to_string()));
    }
    let max_digits = config.max_significant_digits.max(1);
    if v.abs() >= config.scientific_threshold || significant_digits(v) > max_digits {
        Ok(scientific_label(v, max_digits))
    } else {
        Ok(TickLabel::Single(format!("{}", v)))
    }
}

/// One label per numeric bin, taken from the bin's start.
pub fn format_numeric_ticks(
    numeric_bins: &[DataBin],
    config: &TickConfig,
) -> Result<Vec<TickLabel>, ChartError> {
    numeric_bins
        .iter()
        .enumerate()
        .map(|(i, bin)| match bin.range() {
            Some((start, end)) if start.is_finite() && end.is_finite() => {
                format_tick_value(start, config)
            }
            _ => Err(ChartError::invalid_bin(i, "numeric bin without a finite range")),
        })
        .collect()
}

/// Labels for categorical bins, copied as-is.
pub fn category_labels(categorical_bins: &[DataBin]) -> Vec<TickLabel> {
    categorical_bins
        .iter()
        .map(|bin| match (&bin.special_value, bin.start) {
            (Some(value), _) => TickLabel::Single(value.clone()),
            (None, Some(start)) => TickLabel::Single(format!("{}", start)),
            (None, None) => TickLabel::Single(String::new()),
        })
        .collect()
}

/// Tick label angle in degrees for a given tick count.
pub fn tick_label_angle(tick_count: usize, escape_tick_threshold: usize) -> f64 {
    if tick_count > escape_tick_threshold {
        ROTATED_TICK_ANGLE
    } else {
        0.0
    }
}

/// Histogram axis derived from one record array.
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedAxis {
    pub numeric_bins: Vec<DataBin>,
    pub categorical_bins: Vec<DataBin>,
    /// Numeric tick labels followed by category labels; label `i` sits at position `i + 1`.
    pub tick_labels: Vec<TickLabel>,
    pub plot_points: Vec<PlotPoint>,
}

impl BinnedAxis {
    pub fn from_records(records: &[DataBin], config: &TickConfig) -> Result<Self, ChartError> {
        let numeric_bins = partition_numeric(records)?;
        let categorical_bins = partition_categorical(records)?;
        let numeric_ticks = format_numeric_ticks(&numeric_bins, config)?;
        let plot_points = to_plot_points(&numeric_bins, &categorical_bins, numeric_ticks.len());
        let mut tick_labels = numeric_ticks;
        tick_labels.extend(category_labels(&categorical_bins));
        Ok(Self {
            numeric_bins,
            categorical_bins,
            tick_labels,
            plot_points,
        })
    }

    pub fn tick_count(&self) -> usize {
        self.tick_labels.len()
    }

    /// Tick positions 1..=tick_count.
    pub fn tick_values(&self) -> Vec<usize> {
        (1..=self.tick_count()).collect()
    }

    /// Label at a 1-based tick position.
    pub fn label_at(&self, position: usize) -> Option<&TickLabel> {
        position
            .checked_sub(1)
            .and_then(|i| self.tick_labels.get(i))
    }

    pub fn max_magnitude(&self) -> f64 {
        self.plot_points
            .iter()
            .map(|p| p.magnitude)
            .fold(0.0, f64::max)
    }
}

/// Generate "nice" tick values in [min, max] with roughly max_ticks steps.
pub fn nice_ticks(min: f64, max: f64, max_ticks: usize) -> Vec<f64> {
    let range = if max > min { max - min } else { 1.0 };
    if max_ticks == 0 {
        return vec![min];
    }
    let raw_step = range / (max_ticks as f64).max(1.0);
    let mag = 10.0_f64.powf(raw_step.log10().floor());
    let norm = if mag > 0.0 { raw_step / mag } else { raw_step };
    let step = if norm <= 1.0 {
        mag
    } else if norm <= 2.0 {
        2.0 * mag
    } else if norm <= 5.0 {
        5.0 * mag
    } else {
        10.0 * mag
    };
    let step = step.max(f64::EPSILON);
    let start = (min / step).floor() * step;
    let mut ticks = Vec::new();
    let mut v = start;
    while v <= max + step * 0.001 {
        if v >= min - step * 0.001 {
            ticks.push(v);
        }
        v += step;
        if ticks.len() > max_ticks + 2 {
            break;
        }
    }
    if ticks.is_empty() {
        ticks.push(min);
    }
    ticks
}

/// Count-axis label: whole numbers only, blank otherwise.
pub fn format_count_tick(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{:.0}", v)
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks() -> TickConfig {
        TickConfig::default()
    }

    #[test]
    fn partition_sorts_numeric_stably() {
        let records = vec![
            DataBin::numeric(10.0, 20.0, 1),
            DataBin::special("NA", 4),
            DataBin::numeric(0.0, 10.0, 2),
            DataBin::numeric(10.0, 15.0, 3),
        ];
        let numeric = partition_numeric(&records).unwrap();
        let counts: Vec<u64> = numeric.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 3]);
        let categorical = partition_categorical(&records).unwrap();
        assert_eq!(categorical, vec![DataBin::special("NA", 4)]);
    }

    #[test]
    fn malformed_records_are_rejected() {
        let neither = DataBin {
            count: 1,
            ..Default::default()
        };
        assert!(matches!(
            partition_numeric(&[neither]),
            Err(ChartError::InvalidBinRecord { index: 0, .. })
        ));

        let both = DataBin {
            special_value: Some("NA".into()),
            ..DataBin::numeric(0.0, 1.0, 1)
        };
        assert!(partition_categorical(&[DataBin::special("x", 1), both]).is_err());

        let half_open = DataBin {
            start: Some(1.0),
            ..Default::default()
        };
        assert!(validate_bins(&[half_open]).is_err());

        let infinite = DataBin::numeric(0.0, f64::INFINITY, 1);
        assert!(matches!(
            validate_bins(&[DataBin::numeric(0.0, 1.0, 1), infinite]),
            Err(ChartError::InvalidBinRecord { index: 1, .. })
        ));
        assert!(validate_bins(&[DataBin::numeric(f64::NAN, 1.0, 1)]).is_err());
    }

    #[test]
    fn numeric_then_categorical_positions() {
        let records = vec![
            DataBin::numeric(0.0, 10.0, 5),
            DataBin::numeric(10.0, 20.0, 3),
            DataBin::special("NA", 2),
        ];
        let axis = BinnedAxis::from_records(&records, &ticks()).unwrap();
        let positions: Vec<usize> = axis.plot_points.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(axis.tick_labels.len(), 3);
        assert_eq!(axis.label_at(3), Some(&TickLabel::Single("NA".into())));
        assert_eq!(axis.label_at(1), Some(&TickLabel::Single("0".into())));
        assert_eq!(axis.label_at(2), Some(&TickLabel::Single("10".into())));
        assert_eq!(axis.tick_values(), vec![1, 2, 3]);
        assert_eq!(axis.max_magnitude(), 5.0);
    }

    #[test]
    fn empty_input_is_an_empty_axis() {
        let axis = BinnedAxis::from_records(&[], &ticks()).unwrap();
        assert!(axis.plot_points.is_empty());
        assert!(axis.tick_labels.is_empty());
        assert_eq!(axis.label_at(1), None);
    }

    #[test]
    fn categorical_positions_follow_tick_hint() {
        let cats = vec![DataBin::special("NA", 1), DataBin::special("Unknown", 1)];
        let points = to_plot_points(&[], &cats, 4);
        let positions: Vec<usize> = points.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![5, 6]);
    }

    #[test]
    fn plain_tick_values() {
        let cfg = ticks();
        assert_eq!(
            format_tick_value(12.5, &cfg).unwrap(),
            TickLabel::Single("12.5".into())
        );
        assert_eq!(
            format_tick_value(-3.0, &cfg).unwrap(),
            TickLabel::Single("-3".into())
        );
        assert_eq!(
            format_tick_value(0.0001, &cfg).unwrap(),
            TickLabel::Single("0.0001".into())
        );
        assert_eq!(
            format_tick_value(999_999.0, &cfg).unwrap(),
            TickLabel::Single("999999".into())
        );
    }

    #[test]
    fn large_values_are_stacked() {
        let cfg = ticks();
        assert_eq!(
            format_tick_value(1_000_000.0, &cfg).unwrap(),
            TickLabel::Stacked("10".into(), "6".into())
        );
        assert_eq!(
            format_tick_value(2_500_000.0, &cfg).unwrap(),
            TickLabel::Stacked("2.5×10".into(), "6".into())
        );
        assert_eq!(
            format_tick_value(-1_500_000.0, &cfg).unwrap(),
            TickLabel::Stacked("-1.5×10".into(), "6".into())
        );
        assert_eq!(
            format_tick_value(2_500_000.0, &cfg).unwrap().text(),
            "2.5×10^6"
        );
    }

    #[test]
    fn too_many_digits_are_stacked() {
        let cfg = ticks();
        assert_eq!(
            format_tick_value(0.1 + 0.2, &cfg).unwrap(),
            TickLabel::Stacked("3×10".into(), "-1".into())
        );
        assert_eq!(
            format_tick_value(9.9999999, &cfg).unwrap(),
            TickLabel::Stacked("10".into(), "1".into())
        );
    }

    #[test]
    fn threshold_is_configurable() {
        let cfg = TickConfig {
            scientific_threshold: 1000.0,
            max_significant_digits: 3,
        };
        assert_eq!(
            format_tick_value(1000.0, &cfg).unwrap(),
            TickLabel::Stacked("10".into(), "3".into())
        );
        assert_eq!(
            format_tick_value(12.34, &cfg).unwrap(),
            TickLabel::Stacked("1.23×10".into(), "1".into())
        );
    }

    #[test]
    fn subnormal_values_are_stacked() {
        let cfg = ticks();
        assert_eq!(
            format_tick_value(1.234567e-310, &cfg).unwrap(),
            TickLabel::Stacked("1.23457×10".into(), "-310".into())
        );
        assert_eq!(
            format_tick_value(-4.5678912e-315, &cfg).unwrap(),
            TickLabel::Stacked("-4.56789×10".into(), "-315".into())
        );
        assert_eq!(
            format_tick_value(5e-324, &cfg).unwrap(),
            TickLabel::Stacked("4.94066×10".into(), "-324".into())
        );
        assert_eq!(
            format_tick_value(f64::MAX, &cfg).unwrap(),
            TickLabel::Stacked("1.79769×10".into(), "308".into())
        );
    }

    #[test]
    fn non_finite_ticks_fail() {
        assert!(format_tick_value(f64::NAN, &ticks()).is_err());
        assert!(format_tick_value(f64::NEG_INFINITY, &ticks()).is_err());
    }

    #[test]
    fn rotation_depends_on_tick_count() {
        assert_eq!(tick_label_angle(25, 20), ROTATED_TICK_ANGLE);
        assert_eq!(tick_label_angle(10, 20), 0.0);
        assert_eq!(tick_label_angle(20, 20), 0.0);
    }

    #[test]
    fn count_ticks_are_integers() {
        let ticks = nice_ticks(0.0, 5.0, 5);
        assert_eq!(ticks, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(format_count_tick(3.0), "3");
        assert_eq!(format_count_tick(2.5), "");
    }
}
