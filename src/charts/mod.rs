//! Chart kind dispatch: one view type per kind, built from a normalized payload, each able to
//! draw itself as a vector document and to turn raw interactions into selection events.

pub mod bar_chart;
pub mod clinical_table;
pub mod gene_table;
pub mod pie_chart;
pub mod scatter;
pub mod survival;

use crate::config::{AppConfig, Theme};
use crate::error::ChartError;
use crate::model::{
    ActiveFilter, AnalysisGroupsSettings, ChartKind, ChartPayload, DataBin, GroupMapping,
};
use crate::vector::VectorDocument;

pub use bar_chart::BarChart;
pub use clinical_table::ClinicalTable;
pub use gene_table::{CnaGenesTable, MutatedGenesTable};
pub use pie_chart::PieChart;
pub use scatter::ScatterPlot;
pub use survival::{make_survival_chart_data, SurvivalChart, SurvivalChartData};

/// Anything that can draw its current state for export.
pub trait Plottable {
    fn to_vector_document(&self) -> VectorDocument;
}

/// Raw user input reported by a rendered chart, in the chart's data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    /// Rectangle drawn by dragging. Histograms only look at the x range.
    Drag {
        x0: f64,
        x1: f64,
        y0: f64,
        y1: f64,
    },
    /// Slice or row at `index` was clicked.
    Click { index: usize },
}

/// Normalized selection, the only shape the container ever sees.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    Values(Vec<String>),
    DataBins(Vec<DataBin>),
}

/// Everything besides the payload that a view needs to draw.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub unique_key: &'a str,
    pub title: &'a str,
    pub filters: &'a [ActiveFilter],
    pub config: &'a AppConfig,
    pub theme: &'a Theme,
    pub size: (u32, u32),
    pub hide_label: bool,
    pub analysis_groups: &'a AnalysisGroupsSettings,
    pub patient_to_group: Option<&'a GroupMapping>,
    pub sample_to_group: Option<&'a GroupMapping>,
    pub na_patients_hidden: bool,
    pub patient_keys_with_na: Option<&'a [String]>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartView {
    Pie(PieChart),
    Histogram(BarChart),
    Table(ClinicalTable),
    MutatedGenes(MutatedGenesTable),
    CnaGenes(CnaGenesTable),
    Survival(SurvivalChart),
    Scatter(ScatterPlot),
}

fn mismatch(kind: ChartKind, payload: &ChartPayload) -> ChartError {
    ChartError::UnrenderableKind(format!("{} cannot draw {}", kind, payload.shape_name()))
}

impl ChartView {
    /// Builds the view for `kind`. `Ok(None)` means a required secondary input is not loaded
    /// yet, so nothing is drawn.
    pub fn build(
        kind: ChartKind,
        payload: &ChartPayload,
        ctx: &RenderContext<'_>,
    ) -> Result<Option<Self>, ChartError> {
        let view = match (kind, payload) {
            (ChartKind::Pie, ChartPayload::ClinicalCounts(counts)) => {
                Self::Pie(PieChart::new(counts, ctx))
            }
            (ChartKind::Table, ChartPayload::ClinicalCounts(counts)) => {
                Self::Table(ClinicalTable::new(counts, ctx))
            }
            (ChartKind::Histogram, ChartPayload::DataBins(bins)) => {
                Self::Histogram(BarChart::new(bins, ctx)?)
            }
            (ChartKind::MutatedGenesTable, ChartPayload::MutatedGenes(rows)) => {
                Self::MutatedGenes(MutatedGenesTable::new(rows, ctx))
            }
            (ChartKind::CnaGenesTable, ChartPayload::CnaGenes(rows)) => {
                Self::CnaGenes(CnaGenesTable::new(rows, ctx))
            }
            (ChartKind::Survival, ChartPayload::Survival(plots)) => {
                match SurvivalChart::new(plots, ctx) {
                    Some(chart) => Self::Survival(chart),
                    None => return Ok(None),
                }
            }
            (ChartKind::Scatter, ChartPayload::Scatter(points)) => {
                match ScatterPlot::new(points, ctx) {
                    Some(chart) => Self::Scatter(chart),
                    None => return Ok(None),
                }
            }
            (kind, payload) => return Err(mismatch(kind, payload)),
        };
        Ok(Some(view))
    }

    pub fn kind(&self) -> ChartKind {
        match self {
            Self::Pie(_) => ChartKind::Pie,
            Self::Histogram(_) => ChartKind::Histogram,
            Self::Table(_) => ChartKind::Table,
            Self::MutatedGenes(_) => ChartKind::MutatedGenesTable,
            Self::CnaGenes(_) => ChartKind::CnaGenesTable,
            Self::Survival(_) => ChartKind::Survival,
            Self::Scatter(_) => ChartKind::Scatter,
        }
    }

    /// Translates a raw interaction. `None` when the view has no selection for it.
    pub fn handle_interaction(&self, interaction: &Interaction) -> Option<SelectionEvent> {
        match self {
            Self::Pie(chart) => chart.on_interaction(interaction),
            Self::Histogram(chart) => chart.on_interaction(interaction),
            Self::Table(chart) => chart.on_interaction(interaction),
            Self::MutatedGenes(chart) => chart.on_interaction(interaction),
            Self::CnaGenes(chart) => chart.on_interaction(interaction),
            Self::Survival(_) => None,
            Self::Scatter(chart) => chart.on_interaction(interaction),
        }
    }
}

impl Plottable for ChartView {
    fn to_vector_document(&self) -> VectorDocument {
        match self {
            Self::Pie(chart) => chart.to_vector_document(),
            Self::Histogram(chart) => chart.to_vector_document(),
            Self::Table(chart) => chart.to_vector_document(),
            Self::MutatedGenes(chart) => chart.to_vector_document(),
            Self::CnaGenes(chart) => chart.to_vector_document(),
            Self::Survival(chart) => chart.to_vector_document(),
            Self::Scatter(chart) => chart.to_vector_document(),
        }
    }
}
