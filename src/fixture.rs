//! JSON description of one chart slot as the dashboard would hand it over, used by the CLI and
//! by tests to drive a container without a live dashboard.

use std::path::Path;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde::{Deserialize, Serialize};

use crate::chart_export::{
    clinical_counts_to_tsv, data_bins_to_tsv, ChartDownloadType, DownloadRequest,
};
use crate::container::ChartProps;
use crate::model::{ActiveFilter, AnalysisGroupsSettings, ChartMeta, ChartPayload, GroupMapping};
use crate::remote_data::RemoteData;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartFixture {
    pub chart_meta: ChartMeta,
    #[serde(default)]
    pub title: Option<String>,
    pub payload: ChartPayload,
    #[serde(default)]
    pub filters: Vec<ActiveFilter>,
    #[serde(default)]
    pub analysis_groups: AnalysisGroupsSettings,
    #[serde(default)]
    pub analysis_groups_possible: bool,
    #[serde(default)]
    pub show_log_scale_toggle: bool,
    #[serde(default)]
    pub patient_to_analysis_group: Option<GroupMapping>,
    #[serde(default)]
    pub sample_to_analysis_group: Option<GroupMapping>,
    #[serde(default)]
    pub patient_keys_with_na: Option<Vec<String>>,
}

impl ChartFixture {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read chart fixture {}", path.display()))?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Tab-separated rows for payloads that have a tabular form.
    pub fn payload_tsv(&self) -> Option<String> {
        match &self.payload {
            ChartPayload::ClinicalCounts(counts) => Some(clinical_counts_to_tsv(counts)),
            ChartPayload::DataBins(bins) => Some(data_bins_to_tsv(bins)),
            _ => None,
        }
    }

    /// Props with every input already resolved. SVG and EPS use the container's defaults; TSV
    /// is offered only when the payload has a tabular form.
    pub fn into_props(self) -> ChartProps {
        let mut download = vec![
            DownloadRequest::new(ChartDownloadType::Svg),
            DownloadRequest::new(ChartDownloadType::Eps),
        ];
        if let Some(tsv) = self.payload_tsv() {
            download.insert(
                0,
                DownloadRequest::with_generator(ChartDownloadType::Tsv, move || Ok(tsv.clone())),
            );
        }

        let title = self
            .title
            .unwrap_or_else(|| self.chart_meta.display_name.clone());
        ChartProps {
            filters: self.filters,
            download,
            show_log_scale_toggle: self.show_log_scale_toggle,
            analysis_groups_settings: self.analysis_groups,
            analysis_groups_possible: self.analysis_groups_possible,
            patient_keys_with_na: self.patient_keys_with_na.map(RemoteData::Complete),
            patient_to_analysis_group: self.patient_to_analysis_group.map(RemoteData::Complete),
            sample_to_analysis_group: self.sample_to_analysis_group.map(RemoteData::Complete),
            ..ChartProps::new(self.chart_meta, title, RemoteData::Complete(self.payload))
        }
    }
}
