//! Clinical value table, plus the row/column drawing shared with the gene tables.

use crate::config::Rgb;
use crate::model::ClinicalDataCount;
use crate::selection::{filter_values, toggle_value};
use crate::vector::{Anchor, Shape, VectorDocument};

use super::pie_chart::value_color;
use super::{Interaction, Plottable, RenderContext, SelectionEvent};

const HEADER_HEIGHT: f64 = 22.0;
const ROW_HEIGHT: f64 = 20.0;
const NUMERIC_COL_WIDTH: f64 = 56.0;
const FONT: f64 = 11.0;
const SWATCH: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TableRow {
    pub cells: Vec<String>,
    pub swatch: Option<Rgb>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TableStyle {
    pub highlight: Rgb,
    pub text: Rgb,
    pub rule: Rgb,
}

impl TableStyle {
    pub fn from_ctx(ctx: &RenderContext<'_>) -> Self {
        let selected = ctx.theme.get("selected_group");
        let background = ctx.theme.get("background");
        Self {
            highlight: blend(selected, background, 0.75),
            text: ctx.theme.get("text"),
            rule: ctx.theme.get("unselected_group"),
        }
    }
}

fn blend(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let mix = |x: u8, y: u8| (x as f64 * (1.0 - t) + y as f64 * t).round() as u8;
    Rgb(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

pub(crate) fn frequency(count: u64, total: u64) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", count as f64 / total as f64 * 100.0)
}

/// First column is text and takes the remaining width; the rest are right-aligned numbers.
/// Rows that do not fit the height are not drawn.
pub(crate) fn draw_table(
    size: (f64, f64),
    headers: &[&str],
    rows: &[TableRow],
    style: &TableStyle,
) -> VectorDocument {
    let (width, height) = size;
    let mut doc = VectorDocument::new(width, height);
    let numeric_cols = headers.len().saturating_sub(1) as f64;
    let first_col_right = (width - numeric_cols * NUMERIC_COL_WIDTH).max(NUMERIC_COL_WIDTH);

    let col_x = |col: usize| -> (f64, Anchor) {
        if col == 0 {
            (4.0 + SWATCH + 4.0, Anchor::Start)
        } else {
            (
                first_col_right + col as f64 * NUMERIC_COL_WIDTH - 4.0,
                Anchor::End,
            )
        }
    };

    for (col, header) in headers.iter().enumerate() {
        let (x, anchor) = col_x(col);
        doc.push(Shape::Text {
            at: (x, HEADER_HEIGHT - 7.0),
            content: header.to_string(),
            size: FONT,
            anchor,
            angle: 0.0,
            fill: style.text,
        });
    }
    doc.push(Shape::line((0.0, HEADER_HEIGHT), (width, HEADER_HEIGHT), style.rule));

    let visible = ((height - HEADER_HEIGHT) / ROW_HEIGHT).floor().max(0.0) as usize;
    for (i, row) in rows.iter().take(visible).enumerate() {
        let top = HEADER_HEIGHT + i as f64 * ROW_HEIGHT;
        if row.selected {
            doc.push(Shape::Rect {
                x: 0.0,
                y: top,
                width,
                height: ROW_HEIGHT,
                fill: style.highlight,
            });
        }
        if let Some(color) = row.swatch {
            doc.push(Shape::Rect {
                x: 4.0,
                y: top + (ROW_HEIGHT - SWATCH) / 2.0,
                width: SWATCH,
                height: SWATCH,
                fill: color,
            });
        }
        for (col, cell) in row.cells.iter().enumerate() {
            let (x, anchor) = col_x(col);
            doc.push(Shape::Text {
                at: (x, top + ROW_HEIGHT - 6.0),
                content: cell.clone(),
                size: FONT,
                anchor,
                angle: 0.0,
                fill: style.text,
            });
        }
    }
    doc
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClinicalTable {
    header: String,
    values: Vec<String>,
    rows: Vec<TableRow>,
    filter_values: Vec<String>,
    size: (f64, f64),
    style: TableStyle,
}

impl ClinicalTable {
    pub fn new(counts: &[ClinicalDataCount], ctx: &RenderContext<'_>) -> Self {
        let filter_values = filter_values(ctx.filters);
        let total = counts.iter().map(|c| c.count).fold(0u64, u64::saturating_add);
        let rows = counts
            .iter()
            .enumerate()
            .map(|(i, c)| TableRow {
                cells: vec![c.value.clone(), c.count.to_string(), frequency(c.count, total)],
                swatch: Some(value_color(c, i, ctx)),
                selected: filter_values.contains(&c.value),
            })
            .collect();
        Self {
            header: ctx.title.to_string(),
            values: counts.iter().map(|c| c.value.clone()).collect(),
            rows,
            filter_values,
            size: (ctx.size.0 as f64, ctx.size.1 as f64),
            style: TableStyle::from_ctx(ctx),
        }
    }

    pub fn selected_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.selected)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn on_interaction(&self, interaction: &Interaction) -> Option<SelectionEvent> {
        match *interaction {
            Interaction::Click { index } => self
                .values
                .get(index)
                .map(|value| SelectionEvent::Values(toggle_value(&self.filter_values, value))),
            Interaction::Drag { .. } => None,
        }
    }
}

impl Plottable for ClinicalTable {
    fn to_vector_document(&self) -> VectorDocument {
        draw_table(
            self.size,
            &[self.header.as_str(), "#", "Freq"],
            &self.rows,
            &self.style,
        )
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
                value: "Primary".into(),
                count: 3,
                color: None,
            },
            ClinicalDataCount {
                value: "Metastasis".into(),
                count: 1,
                color: None,
            },
        ]
    }

    #[test]
    fn rows_carry_frequency_and_selection() {
        let fx = Fixture::new();
        let filters = [ActiveFilter::value("Metastasis")];
        let table = ClinicalTable::new(&counts(), &fx.ctx(&filters));
        assert_eq!(table.selected_rows(), vec![1]);
        let doc = table.to_vector_document();
        let texts: Vec<&str> = doc.texts().collect();
        assert!(texts.contains(&"Title"));
        assert!(texts.contains(&"75.0%"));
        assert!(texts.contains(&"25.0%"));
    }

    #[test]
    fn row_click_toggles_value() {
        let fx = Fixture::new();
        let table = ClinicalTable::new(&counts(), &fx.ctx(&[]));
        assert_eq!(
            table.on_interaction(&Interaction::Click { index: 0 }),
            Some(SelectionEvent::Values(vec!["Primary".into()]))
        );
    }

    #[test]
    fn rows_past_height_are_clipped() {
        let rows: Vec<TableRow> = (0..100)
            .map(|i| TableRow {
                cells: vec![format!("v{i}")],
                swatch: None,
                selected: false,
            })
            .collect();
        let style = TableStyle {
            highlight: Rgb(1, 1, 1),
            text: Rgb::BLACK,
            rule: Rgb::BLACK,
        };
        let doc = draw_table((200.0, 102.0), &["Value"], &rows, &style);
        // header plus four rows
        assert_eq!(doc.texts().count(), 5);
    }

    #[test]
    fn frequency_handles_zero_total() {
        assert_eq!(frequency(0, 0), "0%");
        assert_eq!(frequency(1, 3), "33.3%");
    }

    #[test]
    fn overflowing_counts_saturate_total() {
        let fx = Fixture::new();
        let mut huge = counts();
        huge[0].count = u64::MAX;
        let table = ClinicalTable::new(&huge, &fx.ctx(&[]));
        let doc = table.to_vector_document();
        let texts: Vec<&str> = doc.texts().collect();
        assert!(texts.contains(&"100.0%"));
    }
}
