//! The chart slot: aggregates loading state, owns transient UI state, dispatches to a chart view
//! and forwards normalized selections to the dashboard as `ChartEvent`s.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::Sender;

use color_eyre::Result;
use tracing::{debug, error, warn};

use crate::chart_controls::{analysis_groups_possible, chart_controls, ChartControls, ControlInputs};
use crate::chart_export::{
    document_to_eps, ChartDownload, ChartDownloadType, DownloadGenerator, DownloadRequest,
};
use crate::chart_state::{ChartUiState, Placement};
use crate::charts::{ChartView, Interaction, Plottable, RenderContext, SelectionEvent};
use crate::config::{AppConfig, Theme};
use crate::error::ChartError;
use crate::error_display::user_message;
use crate::layout::{chart_dimensions, hide_label};
use crate::model::{
    ActiveFilter, AnalysisGroup, AnalysisGroupsSettings, ChartKind, ChartMeta, ChartPayload,
    ClinicalAttribute, DataBin, GroupMapping,
};
use crate::remote_data::{aggregate_status, LoadStatus, RemoteData};
use crate::vector::VectorDocument;

/// Outward notifications to the filter model and dashboard shell.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    ValueSelection {
        meta: ChartMeta,
        values: Vec<String>,
    },
    DataBinSelection {
        meta: ChartMeta,
        bins: Vec<DataBin>,
    },
    ResetSelection {
        meta: ChartMeta,
    },
    DeleteChart(ChartMeta),
    ChangeChartType(ChartMeta, ChartKind),
    ToggleLogScale(ChartMeta),
    SetAnalysisGroups {
        attribute: ClinicalAttribute,
        groups: Vec<AnalysisGroup>,
    },
}

/// Inputs owned by the dashboard. The container reads them and never mutates them.
#[derive(Debug, Clone)]
pub struct ChartProps {
    pub chart_meta: ChartMeta,
    pub title: String,
    pub promise: RemoteData<ChartPayload>,
    pub filters: Vec<ActiveFilter>,
    pub download: Vec<DownloadRequest>,
    pub log_scale_checked: bool,
    pub show_log_scale_toggle: bool,
    pub analysis_groups_settings: AnalysisGroupsSettings,
    pub analysis_groups_possible: bool,
    /// Patients with NA values for the filtered clinical attributes (survival only).
    pub patient_keys_with_na: Option<RemoteData<Vec<String>>>,
    pub patient_to_analysis_group: Option<RemoteData<GroupMapping>>,
    pub sample_to_analysis_group: Option<RemoteData<GroupMapping>>,
}

impl ChartProps {
    pub fn new(
        chart_meta: ChartMeta,
        title: impl Into<String>,
        promise: RemoteData<ChartPayload>,
    ) -> Self {
        Self {
            chart_meta,
            title: title.into(),
            promise,
            filters: Vec::new(),
            download: Vec::new(),
            log_scale_checked: false,
            show_log_scale_toggle: false,
            analysis_groups_settings: AnalysisGroupsSettings::default(),
            analysis_groups_possible: false,
            patient_keys_with_na: None,
            patient_to_analysis_group: None,
            sample_to_analysis_group: None,
        }
    }
}

/// What the body of the slot shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    Loading,
    Error(String),
    /// Loaded, but a secondary input is missing; nothing is drawn.
    Empty,
    Chart(VectorDocument),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartHeader {
    pub title: String,
    pub hide_label: bool,
    pub active: bool,
    pub placement: Placement,
    pub controls: ChartControls,
    pub downloads: Vec<ChartDownloadType>,
    pub analysis_target: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    pub header: ChartHeader,
    pub body: ChartBody,
    pub size: (u32, u32),
}

pub struct ChartContainer {
    props: ChartProps,
    config: AppConfig,
    theme: Theme,
    state: ChartUiState,
    view: Option<ChartView>,
    body: ChartBody,
    /// Last drawn document, shared with the default download generators.
    scene: Rc<RefCell<VectorDocument>>,
    events: Sender<ChartEvent>,
    destroyed: bool,
}

impl ChartContainer {
    pub fn new(props: ChartProps, config: AppConfig, events: Sender<ChartEvent>) -> Result<Self> {
        let theme = Theme::from_config(&config.theme)?;
        let mut state = ChartUiState::new(props.chart_meta.chart_type);
        state.set_log_scale(props.log_scale_checked);
        let mut container = Self {
            props,
            config,
            theme,
            state,
            view: None,
            body: ChartBody::Loading,
            scene: Rc::new(RefCell::new(VectorDocument::empty())),
            events,
            destroyed: false,
        };
        container.refresh()?;
        Ok(container)
    }

    pub fn props(&self) -> &ChartProps {
        &self.props
    }

    pub fn state(&self) -> &ChartUiState {
        &self.state
    }

    pub fn chart_kind(&self) -> ChartKind {
        self.state.chart_kind()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Replaces the dashboard-owned inputs. A destroyed container ignores late updates.
    pub fn set_props(&mut self, props: ChartProps) -> Result<(), ChartError> {
        if self.destroyed {
            debug!(chart = %props.chart_meta.unique_key, "ignoring update for destroyed chart");
            return Ok(());
        }
        self.state.set_log_scale(props.log_scale_checked);
        self.props = props;
        self.refresh()
    }

    /// Statuses of every source the current kind waits on.
    fn loading_sources(&self) -> Vec<LoadStatus> {
        let mut sources = vec![self.props.promise.status()];
        match self.state.chart_kind() {
            ChartKind::Scatter => {
                sources.extend(self.props.sample_to_analysis_group.as_ref().map(|s| s.status()));
            }
            ChartKind::Survival => {
                sources.extend(self.props.patient_to_analysis_group.as_ref().map(|s| s.status()));
                sources.extend(self.props.patient_keys_with_na.as_ref().map(|s| s.status()));
            }
            _ => {}
        }
        sources
    }

    pub fn loading_status(&self) -> LoadStatus {
        aggregate_status(self.loading_sources())
    }

    fn load_error(&self) -> Option<ChartError> {
        let kind = self.state.chart_kind();
        self.props
            .promise
            .error()
            .or_else(|| match kind {
                ChartKind::Scatter => self
                    .props
                    .sample_to_analysis_group
                    .as_ref()
                    .and_then(|s| s.error()),
                ChartKind::Survival => self
                    .props
                    .patient_to_analysis_group
                    .as_ref()
                    .and_then(|s| s.error())
                    .or_else(|| self.props.patient_keys_with_na.as_ref().and_then(|s| s.error())),
                _ => None,
            })
    }

    fn render_context(&self) -> RenderContext<'_> {
        let kind = self.state.chart_kind();
        RenderContext {
            unique_key: &self.props.chart_meta.unique_key,
            title: &self.props.title,
            filters: &self.props.filters,
            config: &self.config,
            theme: &self.theme,
            size: chart_dimensions(kind).resolve(&self.config.layout),
            hide_label: hide_label(kind),
            analysis_groups: &self.props.analysis_groups_settings,
            patient_to_group: self
                .props
                .patient_to_analysis_group
                .as_ref()
                .and_then(|s| s.result()),
            sample_to_group: self
                .props
                .sample_to_analysis_group
                .as_ref()
                .and_then(|s| s.result()),
            na_patients_hidden: self.state.na_patients_hidden_in_survival(),
            patient_keys_with_na: self
                .props
                .patient_keys_with_na
                .as_ref()
                .and_then(|s| s.result())
                .map(Vec::as_slice),
        }
    }

    fn unmount(&mut self, body: ChartBody) {
        self.view = None;
        *self.scene.borrow_mut() = VectorDocument::empty();
        self.body = body;
    }

    /// Recomputes the body from current props and state. Only `UnrenderableKind` is returned as
    /// an error; malformed data and load failures become an error placeholder.
    pub fn refresh(&mut self) -> Result<(), ChartError> {
        if self.destroyed {
            return Ok(());
        }
        let kind = self.state.chart_kind();
        match self.loading_status() {
            LoadStatus::Pending => {
                self.unmount(ChartBody::Loading);
                return Ok(());
            }
            LoadStatus::Error => {
                let msg = self
                    .load_error()
                    .map(|e| user_message(&e))
                    .unwrap_or_default();
                warn!(chart = %self.props.chart_meta.unique_key, "chart data failed to load");
                self.unmount(ChartBody::Error(msg));
                return Ok(());
            }
            LoadStatus::Complete => {}
        }

        let built = match self.props.promise.result() {
            Some(payload) => ChartView::build(kind, payload, &self.render_context()),
            None => Ok(None),
        };

        match built {
            Ok(Some(view)) => {
                let doc = view.to_vector_document();
                *self.scene.borrow_mut() = doc.clone();
                self.view = Some(view);
                self.body = ChartBody::Chart(doc);
                debug!(chart = %self.props.chart_meta.unique_key, %kind, "chart rendered");
                Ok(())
            }
            Ok(None) => {
                self.unmount(ChartBody::Empty);
                Ok(())
            }
            Err(e @ ChartError::UnrenderableKind(_)) => {
                error!(chart = %self.props.chart_meta.unique_key, error = %e, "chart kind cannot be rendered");
                self.unmount(ChartBody::Error(user_message(&e)));
                Err(e)
            }
            Err(e) => {
                warn!(chart = %self.props.chart_meta.unique_key, error = %e, "chart data rejected");
                self.unmount(ChartBody::Error(user_message(&e)));
                Ok(())
            }
        }
    }

    pub fn body(&self) -> &ChartBody {
        &self.body
    }

    pub fn view(&self) -> Option<&ChartView> {
        self.view.as_ref()
    }

    /// Pixel size of the slot for the current kind.
    pub fn chart_size(&self) -> (u32, u32) {
        chart_dimensions(self.state.chart_kind()).resolve(&self.config.layout)
    }

    pub fn hide_label(&self) -> bool {
        hide_label(self.state.chart_kind())
    }

    pub fn analysis_groups_possible(&self) -> bool {
        analysis_groups_possible(
            self.props.analysis_groups_possible,
            self.state.chart_kind(),
            self.props.chart_meta.clinical_attribute.is_some(),
        )
    }

    pub fn chart_controls(&self) -> ChartControls {
        chart_controls(&ControlInputs {
            kind: self.state.chart_kind(),
            nominal_kind: self.props.chart_meta.chart_type,
            log_scale_available: self.props.show_log_scale_toggle,
            log_scale_checked: self.state.log_scale_checked(),
            has_filters: !self.props.filters.is_empty(),
            analysis_groups_declared: self.props.analysis_groups_possible,
            has_clinical_attribute: self.props.chart_meta.clinical_attribute.is_some(),
        })
    }

    /// The dashboard's analysis grouping is built from this chart's attribute.
    pub fn is_analysis_target(&self) -> bool {
        match (
            &self.props.analysis_groups_settings.clinical_attribute,
            &self.props.chart_meta.clinical_attribute,
        ) {
            (Some(target), Some(own)) => target.clinical_attribute_id == own.clinical_attribute_id,
            _ => false,
        }
    }

    pub fn header(&self) -> ChartHeader {
        ChartHeader {
            title: self.props.title.clone(),
            hide_label: self.hide_label(),
            active: self.state.mouse_in_chart(),
            placement: self.state.placement(),
            controls: self.chart_controls(),
            downloads: self.download_options().iter().map(|d| d.kind).collect(),
            analysis_target: self.is_analysis_target(),
        }
    }

    pub fn render(&self) -> RenderedChart {
        RenderedChart {
            header: self.header(),
            body: self.body.clone(),
            size: self.chart_size(),
        }
    }

    fn emit(&self, event: ChartEvent) {
        if self.destroyed {
            return;
        }
        if self.events.send(event).is_err() {
            warn!(chart = %self.props.chart_meta.unique_key, "chart event dropped: dashboard receiver is gone");
        }
    }

    pub fn mouse_enter(&mut self, x: f64) {
        if self.destroyed {
            return;
        }
        self.state
            .mouse_enter(x, self.config.chart.hover_placement_threshold_px);
    }

    pub fn mouse_leave(&mut self) {
        if self.destroyed {
            return;
        }
        self.state.mouse_leave();
    }

    /// Switches the rendered kind, tells the dashboard, and redraws from the data already loaded.
    /// Filters are left alone.
    pub fn change_chart_type(&mut self, kind: ChartKind) -> Result<(), ChartError> {
        if self.destroyed {
            return Ok(());
        }
        self.state.change_kind(kind);
        debug!(chart = %self.props.chart_meta.unique_key, %kind, "chart kind changed");
        self.emit(ChartEvent::ChangeChartType(
            self.props.chart_meta.clone(),
            kind,
        ));
        self.refresh()
    }

    pub fn toggle_log_scale(&mut self) {
        if self.destroyed {
            return;
        }
        self.state.toggle_log_scale();
        self.emit(ChartEvent::ToggleLogScale(self.props.chart_meta.clone()));
    }

    pub fn toggle_survival_hide_na_patients(&mut self) -> Result<(), ChartError> {
        if self.destroyed {
            return Ok(());
        }
        self.state.toggle_survival_hide_na();
        self.refresh()
    }

    /// Proposes this chart's values as the dashboard's analysis groups. Returns whether anything
    /// was sent.
    pub fn set_analysis_groups(&self) -> bool {
        if self.destroyed || !self.analysis_groups_possible() {
            return false;
        }
        let (Some(attribute), Some(ChartPayload::ClinicalCounts(counts))) = (
            self.props.chart_meta.clinical_attribute.clone(),
            self.props.promise.result(),
        ) else {
            return false;
        };
        let groups = counts
            .iter()
            .enumerate()
            .map(|(i, c)| AnalysisGroup {
                value: c.value.clone(),
                color: c
                    .color
                    .clone()
                    .unwrap_or_else(|| self.theme.series_color(i).to_hex()),
                legend_text: None,
            })
            .collect();
        self.emit(ChartEvent::SetAnalysisGroups { attribute, groups });
        true
    }

    pub fn reset_filters(&self) {
        self.emit(ChartEvent::ResetSelection {
            meta: self.props.chart_meta.clone(),
        });
    }

    pub fn delete_chart(&self) {
        self.emit(ChartEvent::DeleteChart(self.props.chart_meta.clone()));
    }

    /// Runs a raw interaction through the current view and forwards the resulting selection.
    pub fn handle_interaction(&self, interaction: &Interaction) -> Option<SelectionEvent> {
        if self.destroyed {
            return None;
        }
        let selection = self.view.as_ref()?.handle_interaction(interaction)?;
        let meta = self.props.chart_meta.clone();
        self.emit(match &selection {
            SelectionEvent::Values(values) => ChartEvent::ValueSelection {
                meta,
                values: values.clone(),
            },
            SelectionEvent::DataBins(bins) => ChartEvent::DataBinSelection {
                meta,
                bins: bins.clone(),
            },
        });
        Some(selection)
    }

    /// Current drawing; empty when nothing is mounted.
    pub fn to_vector_document(&self) -> VectorDocument {
        self.view
            .as_ref()
            .map(Plottable::to_vector_document)
            .unwrap_or_else(VectorDocument::empty)
    }

    fn default_download(&self, kind: ChartDownloadType) -> Option<DownloadGenerator> {
        let scene = Rc::clone(&self.scene);
        match kind {
            ChartDownloadType::Svg => Some(Rc::new(move || Ok(scene.borrow().to_svg_string()))),
            ChartDownloadType::Eps => Some(Rc::new(move || Ok(document_to_eps(&scene.borrow())))),
            ChartDownloadType::Tsv => None,
        }
    }

    /// One entry per requested format, custom generator first, then the default. Formats with
    /// neither are left out.
    pub fn download_options(&self) -> Vec<ChartDownload> {
        self.props
            .download
            .iter()
            .filter_map(|request| {
                let generator = request
                    .init_download
                    .clone()
                    .or_else(|| self.default_download(request.kind))?;
                Some(ChartDownload {
                    kind: request.kind,
                    init_download: generator,
                })
            })
            .collect()
    }

    /// Tears the slot down. Later updates and interactions do nothing and send nothing.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.unmount(ChartBody::Empty);
        self.destroyed = true;
        debug!(chart = %self.props.chart_meta.unique_key, "chart destroyed");
    }
}
