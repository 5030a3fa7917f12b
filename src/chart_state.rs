//! Chart slot UI state: hover, flyout placement, current kind and toggles.

use serde::{Deserialize, Serialize};

use crate::model::ChartKind;

/// Side a flyout (tooltip, legend) opens on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Left,
    #[default]
    Right,
}

/// Transient presentational state of one chart slot. Fields change only through the
/// transition methods below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartUiState {
    mouse_in_chart: bool,
    placement: Placement,
    chart_kind: ChartKind,
    log_scale_checked: bool,
    /// Survival only: whether patients with NA clinical values are left out.
    na_patients_hidden_in_survival: bool,
}

impl ChartUiState {
    pub fn new(chart_kind: ChartKind) -> Self {
        Self {
            mouse_in_chart: false,
            placement: Placement::Right,
            chart_kind,
            log_scale_checked: false,
            na_patients_hidden_in_survival: true,
        }
    }

    pub fn mouse_in_chart(&self) -> bool {
        self.mouse_in_chart
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn chart_kind(&self) -> ChartKind {
        self.chart_kind
    }

    pub fn log_scale_checked(&self) -> bool {
        self.log_scale_checked
    }

    pub fn na_patients_hidden_in_survival(&self) -> bool {
        self.na_patients_hidden_in_survival
    }

    /// Pointer entered at horizontal position `x`.
    pub fn mouse_enter(&mut self, x: f64, placement_threshold: f64) {
        self.placement = if x > placement_threshold {
            Placement::Left
        } else {
            Placement::Right
        };
        self.mouse_in_chart = true;
    }

    pub fn mouse_leave(&mut self) {
        self.placement = Placement::Right;
        self.mouse_in_chart = false;
    }

    /// Switches kind and clears hover. Returns false when the kind is unchanged.
    pub fn change_kind(&mut self, kind: ChartKind) -> bool {
        self.mouse_in_chart = false;
        if self.chart_kind == kind {
            return false;
        }
        self.chart_kind = kind;
        true
    }

    pub fn set_log_scale(&mut self, checked: bool) {
        self.log_scale_checked = checked;
    }

    pub fn toggle_log_scale(&mut self) {
        self.log_scale_checked = !self.log_scale_checked;
    }

    pub fn toggle_survival_hide_na(&mut self) {
        self.na_patients_hidden_in_survival = !self.na_patients_hidden_in_survival;
    }
}
