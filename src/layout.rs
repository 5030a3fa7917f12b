//! Chart slot sizing by kind.

use crate::config::LayoutConfig;
use crate::model::ChartKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    One,
    Two,
    Pixels(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: SizeClass,
    pub height: SizeClass,
}

pub const GENE_TABLE_SIZE: (u32, u32) = (380, 350);
pub const PLOT_SIZE: (u32, u32) = (400, 380);

pub fn chart_dimensions(kind: ChartKind) -> ChartSize {
    use SizeClass::*;
    match kind {
        ChartKind::Pie | ChartKind::Table => ChartSize {
            width: One,
            height: One,
        },
        ChartKind::Histogram => ChartSize {
            width: One,
            height: Two,
        },
        ChartKind::MutatedGenesTable | ChartKind::CnaGenesTable => ChartSize {
            width: Pixels(GENE_TABLE_SIZE.0),
            height: Pixels(GENE_TABLE_SIZE.1),
        },
        ChartKind::Survival | ChartKind::Scatter => ChartSize {
            width: Pixels(PLOT_SIZE.0),
            height: Pixels(PLOT_SIZE.1),
        },
    }
}

impl ChartSize {
    /// Pixel size under the configured size classes.
    pub fn resolve(&self, layout: &LayoutConfig) -> (u32, u32) {
        let width = match self.width {
            SizeClass::One => layout.width_one,
            SizeClass::Two => layout.width_two,
            SizeClass::Pixels(px) => px,
        };
        let height = match self.height {
            SizeClass::One => layout.height_one,
            SizeClass::Two => layout.height_two,
            SizeClass::Pixels(px) => px,
        };
        (width, height)
    }
}

/// Tables carry their own header row, so the chart title is hidden.
pub fn hide_label(kind: ChartKind) -> bool {
    kind == ChartKind::Table
}
