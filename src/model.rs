//! Records exchanged with the dashboard: data bins, filters, chart descriptors and payloads.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ChartError;

/// A pre-aggregated bin: either a numeric interval `[start, end)` or a named special category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataBin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_value: Option<String>,
    pub count: u64,
}

impl DataBin {
    pub fn numeric(start: f64, end: f64, count: u64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            special_value: None,
            count,
        }
    }

    pub fn special(value: impl Into<String>, count: u64) -> Self {
        Self {
            start: None,
            end: None,
            special_value: Some(value.into()),
            count,
        }
    }

    /// `(start, end)` when both boundaries are present.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.start.zip(self.end)
    }
}

/// A user-chosen constraint: a numeric range, a category value, or both.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ActiveFilter {
    pub fn range(start: f64, end: f64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            value: None,
        }
    }

    pub fn value(value: impl Into<String>) -> Self {
        Self {
            start: None,
            end: None,
            value: Some(value.into()),
        }
    }
}

/// Visualization strategy for a chart slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ChartKind {
    Pie,
    Histogram,
    Table,
    MutatedGenesTable,
    CnaGenesTable,
    Survival,
    Scatter,
}

impl ChartKind {
    pub const ALL: [Self; 7] = [
        Self::Pie,
        Self::Histogram,
        Self::Table,
        Self::MutatedGenesTable,
        Self::CnaGenesTable,
        Self::Survival,
        Self::Scatter,
    ];

    /// Wire tag used by the dashboard.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pie => "PIE_CHART",
            Self::Histogram => "BAR_CHART",
            Self::Table => "TABLE",
            Self::MutatedGenesTable => "MUTATED_GENES_TABLE",
            Self::CnaGenesTable => "CNA_GENES_TABLE",
            Self::Survival => "SURVIVAL",
            Self::Scatter => "SCATTER",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ChartError::UnrenderableKind(s.to_string()))
    }
}

impl TryFrom<String> for ChartKind {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChartKind> for String {
    fn from(kind: ChartKind) -> Self {
        kind.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalAttribute {
    pub clinical_attribute_id: String,
    pub display_name: String,
    #[serde(default)]
    pub patient_attribute: bool,
    #[serde(default)]
    pub datatype: String,
}

/// Grid footprint of a chart slot on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDimension {
    pub w: u32,
    pub h: u32,
}

impl Default for ChartDimension {
    fn default() -> Self {
        Self { w: 1, h: 1 }
    }
}

/// Static chart descriptor owned by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub unique_key: String,
    #[serde(default)]
    pub display_name: String,
    pub chart_type: ChartKind,
    #[serde(default)]
    pub dimension: ChartDimension,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_attribute: Option<ClinicalAttribute>,
}

/// Count of samples or patients per clinical value, as shown by pie charts and tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalDataCount {
    pub value: String,
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisGroup {
    pub value: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_text: Option<String>,
}

impl AnalysisGroup {
    pub fn label(&self) -> &str {
        self.legend_text.as_deref().unwrap_or(&self.value)
    }
}

/// Dashboard-wide analysis grouping: which attribute partitions the cohort, and its groups.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisGroupsSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_attribute: Option<ClinicalAttribute>,
    #[serde(default)]
    pub groups: Vec<AnalysisGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutatedGeneRow {
    pub entrez_gene_id: i64,
    pub hugo_gene_symbol: String,
    pub count_by_entity: u64,
    pub total_count: u64,
    pub frequency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CnaGeneRow {
    pub entrez_gene_id: i64,
    pub hugo_gene_symbol: String,
    /// -2 for deep deletion, 2 for amplification.
    pub alteration: i32,
    #[serde(default)]
    pub cytoband: String,
    pub count_by_entity: u64,
    pub frequency: f64,
}

impl CnaGeneRow {
    /// Selection key identifying a gene/alteration pair.
    pub fn filter_key(&self) -> String {
        format!("{}:{}", self.entrez_gene_id, self.alteration)
    }

    pub fn alteration_label(&self) -> &'static str {
        match self.alteration {
            -2 => "DEL",
            2 => "AMP",
            _ => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSurvival {
    pub unique_patient_key: String,
    pub months: f64,
    /// True when the event (death) was observed.
    pub status: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivalPlot {
    pub id: String,
    #[serde(default)]
    pub altered_group: Vec<PatientSurvival>,
    #[serde(default)]
    pub unaltered_group: Vec<PatientSurvival>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterDatum {
    pub unique_sample_key: String,
    #[serde(default)]
    pub sample_id: String,
    /// Fraction of copy number altered genome.
    pub x: f64,
    /// Mutation count.
    pub y: f64,
}

/// Result of a chart's primary data source, one shape per family of chart kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ChartPayload {
    ClinicalCounts(Vec<ClinicalDataCount>),
    DataBins(Vec<DataBin>),
    MutatedGenes(Vec<MutatedGeneRow>),
    CnaGenes(Vec<CnaGeneRow>),
    Survival(Vec<SurvivalPlot>),
    Scatter(Vec<ScatterDatum>),
}

impl ChartPayload {
    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::ClinicalCounts(_) => "clinical counts",
            Self::DataBins(_) => "data bins",
            Self::MutatedGenes(_) => "mutated genes",
            Self::CnaGenes(_) => "CNA genes",
            Self::Survival(_) => "survival plots",
            Self::Scatter(_) => "scatter points",
        }
    }
}

/// Unique patient or sample key to analysis group value.
pub type GroupMapping = HashMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_kind_round_trips_through_wire_tag() {
        for kind in ChartKind::ALL {
            assert_eq!(kind.as_str().parse::<ChartKind>(), Ok(kind));
        }
        assert_eq!("pie_chart".parse::<ChartKind>(), Ok(ChartKind::Pie));
    }

    #[test]
    fn unknown_kind_is_unrenderable() {
        let err = "DONUT".parse::<ChartKind>().unwrap_err();
        assert_eq!(err, ChartError::UnrenderableKind("DONUT".to_string()));
    }

    #[test]
    fn chart_meta_deserializes_from_dashboard_json() {
        let json = r#"{
            "uniqueKey": "AGE",
            "displayName": "Diagnosis Age",
            "chartType": "BAR_CHART",
            "dimension": {"w": 2, "h": 1}
        }"#;
        let meta: ChartMeta = serde_json::from_str(json).unwrap();
        assert_eq!(meta.chart_type, ChartKind::Histogram);
        assert_eq!(meta.dimension, ChartDimension { w: 2, h: 1 });
        assert!(meta.clinical_attribute.is_none());

        let bad = json.replace("BAR_CHART", "DONUT");
        assert!(serde_json::from_str::<ChartMeta>(&bad).is_err());
    }

    #[test]
    fn data_bin_json_omits_missing_fields() {
        let bin = DataBin::special("NA", 2);
        let json = serde_json::to_string(&bin).unwrap();
        assert_eq!(json, r#"{"specialValue":"NA","count":2}"#);
        let parsed: DataBin = serde_json::from_str(r#"{"start":0,"end":10,"count":5}"#).unwrap();
        assert_eq!(parsed, DataBin::numeric(0.0, 10.0, 5));
    }
}
