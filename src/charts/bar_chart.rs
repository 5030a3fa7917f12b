//! Histogram over data bins: numeric bins then categories on one x axis, counts on y.

use crate::binning::{format_count_tick, nice_ticks, tick_label_angle, BinnedAxis, PlotPoint, TickLabel};
use crate::config::Rgb;
use crate::error::ChartError;
use crate::model::DataBin;
use crate::selection::{is_selected, points_in_x_range, resolve_drag_selection};
use crate::vector::{Anchor, Shape, VectorDocument};

use super::{Interaction, Plottable, RenderContext, SelectionEvent};

const PAD_LEFT: f64 = 40.0;
const PAD_RIGHT: f64 = 20.0;
const PAD_TOP: f64 = 10.0;
const PAD_BOTTOM: f64 = 24.0;
const PAD_BOTTOM_ROTATED: f64 = 50.0;
const TICK_FONT: f64 = 8.5;
const MAX_Y_TICKS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
struct BarColors {
    selected: Rgb,
    unselected: Rgb,
    axis: Rgb,
    text: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    axis: BinnedAxis,
    /// Highlight state per plot point.
    selected: Vec<bool>,
    tick_angle: f64,
    half_width: f64,
    size: (f64, f64),
    colors: BarColors,
}

impl BarChart {
    pub fn new(bins: &[DataBin], ctx: &RenderContext<'_>) -> Result<Self, ChartError> {
        let axis = BinnedAxis::from_records(bins, &ctx.config.ticks)?;
        let selected = axis
            .plot_points
            .iter()
            .map(|p| is_selected(&p.source_bin, ctx.filters))
            .collect();
        let tick_angle = tick_label_angle(axis.tick_count(), ctx.config.chart.escape_tick_threshold);
        Ok(Self {
            axis,
            selected,
            tick_angle,
            half_width: ctx.config.chart.bar_half_width,
            size: (ctx.size.0 as f64, ctx.size.1 as f64),
            colors: BarColors {
                selected: ctx.theme.get("selected_group"),
                unselected: ctx.theme.get("unselected_group"),
                axis: ctx.theme.get("axis"),
                text: ctx.theme.get("text"),
            },
        })
    }

    pub fn axis(&self) -> &BinnedAxis {
        &self.axis
    }

    pub fn plot_points(&self) -> &[PlotPoint] {
        &self.axis.plot_points
    }

    pub fn tick_angle(&self) -> f64 {
        self.tick_angle
    }

    pub fn is_point_selected(&self, index: usize) -> bool {
        self.selected.get(index).copied().unwrap_or(false)
    }

    pub fn on_interaction(&self, interaction: &Interaction) -> Option<SelectionEvent> {
        match *interaction {
            Interaction::Drag { x0, x1, .. } => {
                let hit = points_in_x_range(self.plot_points(), x0, x1, self.half_width);
                Some(SelectionEvent::DataBins(resolve_drag_selection(&hit)))
            }
            Interaction::Click { index } => self
                .plot_points()
                .get(index)
                .map(|p| SelectionEvent::DataBins(vec![p.source_bin.clone()])),
        }
    }
}

impl Plottable for BarChart {
    fn to_vector_document(&self) -> VectorDocument {
        let (width, height) = self.size;
        let rotated = self.tick_angle != 0.0;
        let bottom = if rotated { PAD_BOTTOM_ROTATED } else { PAD_BOTTOM };
        let plot_w = (width - PAD_LEFT - PAD_RIGHT).max(1.0);
        let plot_h = (height - PAD_TOP - bottom).max(1.0);
        let base_y = PAD_TOP + plot_h;

        let x_domain = (self.axis.tick_count() + 1) as f64;
        let x_px = |v: f64| PAD_LEFT + v / x_domain * plot_w;

        let y_ticks = nice_ticks(0.0, self.axis.max_magnitude().max(1.0), MAX_Y_TICKS);
        let y_top = y_ticks
            .last()
            .copied()
            .unwrap_or(1.0)
            .max(self.axis.max_magnitude())
            .max(1.0);
        let y_px = |v: f64| base_y - v / y_top * plot_h;

        let mut doc = VectorDocument::new(width, height);

        for (point, selected) in self.axis.plot_points.iter().zip(&self.selected) {
            let center = point.position as f64;
            let x0 = x_px(center - self.half_width);
            let x1 = x_px(center + self.half_width);
            let top = y_px(point.magnitude);
            doc.push(Shape::Rect {
                x: x0,
                y: top,
                width: x1 - x0,
                height: base_y - top,
                fill: if *selected {
                    self.colors.selected
                } else {
                    self.colors.unselected
                },
            });
        }

        doc.push(Shape::line((PAD_LEFT, base_y), (PAD_LEFT + plot_w, base_y), self.colors.axis));
        doc.push(Shape::line((PAD_LEFT, PAD_TOP), (PAD_LEFT, base_y), self.colors.axis));

        for v in y_ticks {
            let label = format_count_tick(v);
            if label.is_empty() {
                continue;
            }
            let y = y_px(v);
            doc.push(Shape::line((PAD_LEFT - 4.0, y), (PAD_LEFT, y), self.colors.axis));
            doc.push(Shape::Text {
                at: (PAD_LEFT - 6.0, y + 3.0),
                content: label,
                size: TICK_FONT,
                anchor: Anchor::End,
                angle: 0.0,
                fill: self.colors.text,
            });
        }

        let anchor = if rotated { Anchor::End } else { Anchor::Middle };
        for position in self.axis.tick_values() {
            let x = x_px(position as f64);
            let y = base_y + 12.0;
            doc.push(Shape::line((x, base_y), (x, base_y + 4.0), self.colors.axis));
            match self.axis.label_at(position) {
                Some(TickLabel::Single(text)) => doc.push(Shape::Text {
                    at: (x, y),
                    content: text.clone(),
                    size: TICK_FONT,
                    anchor,
                    angle: self.tick_angle,
                    fill: self.colors.text,
                }),
                Some(TickLabel::Stacked(mantissa, exponent)) => {
                    doc.push(Shape::Text {
                        at: (x, y),
                        content: mantissa.clone(),
                        size: TICK_FONT,
                        anchor,
                        angle: self.tick_angle,
                        fill: self.colors.text,
                    });
                    // exponent sits above the end of the mantissa
                    let shift = match anchor {
                        Anchor::Middle => mantissa.chars().count() as f64 * TICK_FONT * 0.3,
                        _ => 0.0,
                    };
                    doc.push(Shape::Text {
                        at: (x + shift + 1.0, y - 5.0),
                        content: exponent.clone(),
                        size: TICK_FONT * 0.7,
                        anchor: Anchor::Start,
                        angle: self.tick_angle,
                        fill: self.colors.text,
                    });
                }
                None => {}
            }
        }

        doc
    }
}
