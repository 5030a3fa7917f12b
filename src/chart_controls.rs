//! Header control affordances per chart kind.

use serde::Serialize;

use crate::model::ChartKind;

/// Icons and toggles the chart header shows. Each flag is computed independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChartControls {
    pub show_log_scale_toggle: bool,
    pub log_scale_checked: bool,
    pub show_table_icon: bool,
    pub show_pie_icon: bool,
    pub show_reset_icon: bool,
    pub show_analysis_groups_icon: bool,
}

impl ChartControls {
    /// No affordance shown.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlInputs {
    pub kind: ChartKind,
    pub nominal_kind: ChartKind,
    pub log_scale_available: bool,
    pub log_scale_checked: bool,
    pub has_filters: bool,
    pub analysis_groups_declared: bool,
    pub has_clinical_attribute: bool,
}

/// Grouping needs the caller's go-ahead, a pie or table, and a clinical attribute.
pub fn analysis_groups_possible(
    declared: bool,
    kind: ChartKind,
    has_clinical_attribute: bool,
) -> bool {
    declared && matches!(kind, ChartKind::Pie | ChartKind::Table) && has_clinical_attribute
}

pub fn chart_controls(inputs: &ControlInputs) -> ChartControls {
    let mut controls = ChartControls::default();
    match inputs.kind {
        ChartKind::Histogram => {
            controls.show_log_scale_toggle = inputs.log_scale_available;
            controls.log_scale_checked = inputs.log_scale_available && inputs.log_scale_checked;
        }
        ChartKind::Pie => controls.show_table_icon = true,
        ChartKind::Table => controls.show_pie_icon = inputs.nominal_kind != ChartKind::Table,
        _ => {}
    }
    controls.show_reset_icon = inputs.has_filters;
    controls.show_analysis_groups_icon = analysis_groups_possible(
        inputs.analysis_groups_declared,
        inputs.kind,
        inputs.has_clinical_attribute,
    );
    controls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(kind: ChartKind) -> ControlInputs {
        ControlInputs {
            kind,
            nominal_kind: kind,
            log_scale_available: false,
            log_scale_checked: false,
            has_filters: false,
            analysis_groups_declared: false,
            has_clinical_attribute: false,
        }
    }

    #[test]
    fn nominal_table_shows_nothing() {
        assert!(chart_controls(&inputs(ChartKind::Table)).is_empty());
    }

    #[test]
    fn converted_table_offers_pie() {
        let c = chart_controls(&ControlInputs {
            nominal_kind: ChartKind::Pie,
            ..inputs(ChartKind::Table)
        });
        assert!(c.show_pie_icon);
        assert!(!c.show_table_icon);
    }

    #[test]
    fn pie_always_offers_table() {
        let c = chart_controls(&inputs(ChartKind::Pie));
        assert!(c.show_table_icon);
    }

    #[test]
    fn histogram_log_scale_only_when_available() {
        let hidden = chart_controls(&ControlInputs {
            log_scale_checked: true,
            ..inputs(ChartKind::Histogram)
        });
        assert!(!hidden.show_log_scale_toggle);
        assert!(!hidden.log_scale_checked);

        let shown = chart_controls(&ControlInputs {
            log_scale_available: true,
            log_scale_checked: true,
            ..inputs(ChartKind::Histogram)
        });
        assert!(shown.show_log_scale_toggle);
        assert!(shown.log_scale_checked);
    }

    #[test]
    fn reset_icon_for_any_kind_with_filters() {
        for kind in ChartKind::ALL {
            let c = chart_controls(&ControlInputs {
                has_filters: true,
                ..inputs(kind)
            });
            assert!(c.show_reset_icon, "{kind}");
        }
    }

    #[test]
    fn analysis_groups_need_all_conditions() {
        let base = ControlInputs {
            analysis_groups_declared: true,
            has_clinical_attribute: true,
            ..inputs(ChartKind::Pie)
        };
        assert!(chart_controls(&base).show_analysis_groups_icon);
        assert!(
            !chart_controls(&ControlInputs {
                has_clinical_attribute: false,
                ..base
            })
            .show_analysis_groups_icon
        );
        assert!(
            !chart_controls(&ControlInputs {
                kind: ChartKind::Histogram,
                ..base
            })
            .show_analysis_groups_icon
        );
        assert!(
            !chart_controls(&ControlInputs {
                analysis_groups_declared: false,
                ..base
            })
            .show_analysis_groups_icon
        );
    }

    #[test]
    fn controls_are_pure() {
        let i = ControlInputs {
            has_filters: true,
            ..inputs(ChartKind::Pie)
        };
        assert_eq!(chart_controls(&i), chart_controls(&i));
    }
}
