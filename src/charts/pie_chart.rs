//! Pie chart over clinical value counts; clicking a slice toggles its value.

use std::f64::consts::PI;

use crate::config::{ColorParser, Rgb};
use crate::model::ClinicalDataCount;
use crate::selection::{filter_values, toggle_value};
use crate::vector::{Shape, VectorDocument};

use super::{Interaction, Plottable, RenderContext, SelectionEvent};

/// Arc resolution for slice polygons, in degrees.
const ARC_STEP_DEG: f64 = 4.0;
const LABEL_FONT: f64 = 12.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub value: String,
    pub count: u64,
    pub color: Rgb,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    slices: Vec<Slice>,
    filter_values: Vec<String>,
    label: Option<String>,
    size: (f64, f64),
    unselected: Rgb,
    background: Rgb,
    text: Rgb,
}

/// Explicit slice color if it parses, NA gray, else the series palette.
pub(crate) fn value_color(
    count: &ClinicalDataCount,
    index: usize,
    ctx: &RenderContext<'_>,
) -> Rgb {
    let parser = ColorParser::new();
    if let Some(rgb) = count.color.as_deref().and_then(|c| parser.parse(c).ok()) {
        return rgb;
    }
    if count.value.eq_ignore_ascii_case("NA") {
        return ctx.theme.get("na_group");
    }
    ctx.theme.series_color(index)
}

impl PieChart {
    pub fn new(counts: &[ClinicalDataCount], ctx: &RenderContext<'_>) -> Self {
        let filter_values = filter_values(ctx.filters);
        let slices = counts
            .iter()
            .enumerate()
            .map(|(i, c)| Slice {
                value: c.value.clone(),
                count: c.count,
                color: value_color(c, i, ctx),
                selected: filter_values.contains(&c.value),
            })
            .collect();
        Self {
            slices,
            filter_values,
            label: (!ctx.hide_label).then(|| ctx.title.to_string()),
            size: (ctx.size.0 as f64, ctx.size.1 as f64),
            unselected: ctx.theme.get("unselected_group"),
            background: ctx.theme.get("background"),
            text: ctx.theme.get("text"),
        }
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    pub fn on_interaction(&self, interaction: &Interaction) -> Option<SelectionEvent> {
        match *interaction {
            Interaction::Click { index } => self.slices.get(index).map(|slice| {
                SelectionEvent::Values(toggle_value(&self.filter_values, &slice.value))
            }),
            Interaction::Drag { .. } => None,
        }
    }
}

impl Plottable for PieChart {
    fn to_vector_document(&self) -> VectorDocument {
        let (width, height) = self.size;
        let mut doc = VectorDocument::new(width, height);

        let label_space = if self.label.is_some() { 20.0 } else { 0.0 };
        let center = (width / 2.0, label_space + (height - label_space) / 2.0);
        let radius = ((width.min(height - label_space)) / 2.0 - 10.0).max(1.0);

        let total = self.slices.iter().map(|s| s.count).fold(0u64, u64::saturating_add);
        let dimmed = !self.filter_values.is_empty();
        if total > 0 {
            let mut start = -90.0_f64;
            for slice in &self.slices {
                let sweep = slice.count as f64 / total as f64 * 360.0;
                if sweep <= 0.0 {
                    continue;
                }
                let steps = (sweep / ARC_STEP_DEG).ceil().max(1.0) as usize;
                let mut points = vec![center];
                for k in 0..=steps {
                    let deg = start + sweep * k as f64 / steps as f64;
                    let rad = deg * PI / 180.0;
                    points.push((center.0 + radius * rad.cos(), center.1 + radius * rad.sin()));
                }
                doc.push(Shape::Polygon {
                    points,
                    fill: if dimmed && !slice.selected {
                        self.unselected
                    } else {
                        slice.color
                    },
                    stroke: Some(self.background),
                });
                start += sweep;
            }
        }

        if let Some(label) = &self.label {
            doc.push(Shape::text((width / 2.0, 14.0), label.clone(), LABEL_FONT, self.text));
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;
    use crate::model::ActiveFilter;

    fn counts() -> Vec<ClinicalDataCount> {
        vec![
            ClinicalDataCount {
                value: "Male".into(),
                count: 3,
                color: Some("#ff0000".into()),
            },
            ClinicalDataCount {
                value: "Female".into(),
                count: 1,
                color: None,
            },
            ClinicalDataCount {
                value: "NA".into(),
                count: 0,
                color: None,
            },
        ]
    }

    #[test]
    fn click_toggles_value() {
        let fx = Fixture::new();
        let filters = [ActiveFilter::value("Male")];
        let pie = PieChart::new(&counts(), &fx.ctx(&filters));
        assert!(pie.slices()[0].selected);
        assert_eq!(
            pie.on_interaction(&Interaction::Click { index: 1 }),
            Some(SelectionEvent::Values(vec!["Male".into(), "Female".into()]))
        );
        assert_eq!(
            pie.on_interaction(&Interaction::Click { index: 0 }),
            Some(SelectionEvent::Values(vec![]))
        );
        assert_eq!(pie.on_interaction(&Interaction::Click { index: 9 }), None);
    }

    #[test]
    fn slice_colors() {
        let fx = Fixture::new();
        let pie = PieChart::new(&counts(), &fx.ctx(&[]));
        assert_eq!(pie.slices()[0].color, Rgb(255, 0, 0));
        assert_eq!(pie.slices()[2].color, fx.theme.get("na_group"));
    }

    #[test]
    fn draws_non_empty_slices() {
        let fx = Fixture::new();
        let doc = PieChart::new(&counts(), &fx.ctx(&[])).to_vector_document();
        let slices = doc
            .elements
            .iter()
            .filter(|s| matches!(s, Shape::Polygon { .. }))
            .count();
        assert_eq!(slices, 2);
        assert_eq!(doc.texts().collect::<Vec<_>>(), vec!["Title"]);
    }

    #[test]
    fn overflowing_counts_still_draw() {
        let fx = Fixture::new();
        let mut huge = counts();
        huge[0].count = u64::MAX;
        huge[1].count = u64::MAX;
        let doc = PieChart::new(&huge, &fx.ctx(&[])).to_vector_document();
        let slices = doc
            .elements
            .iter()
            .filter(|s| matches!(s, Shape::Polygon { .. }))
            .count();
        assert_eq!(slices, 2);
    }
}
