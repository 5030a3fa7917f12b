//! Survival chart data preparation and per-group case summary. Curve estimation happens
//! upstream; this view shows who is in each analysis group and how many events were observed.

use std::collections::HashSet;

use crate::config::{ColorParser, Rgb};
use crate::model::{AnalysisGroup, GroupMapping, PatientSurvival, SurvivalPlot};
use crate::vector::{Anchor, Shape, VectorDocument};

use super::{Plottable, RenderContext};

pub const X_AXIS_LABEL: &str = "Months Survival";
pub const Y_AXIS_LABEL: &str = "Surviving";
const FONT: f64 = 11.0;
const ROW_HEIGHT: f64 = 18.0;

/// Patients, their groups and the groups themselves, after group and NA filtering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SurvivalChartData {
    pub patient_survivals: Vec<PatientSurvival>,
    pub patient_to_analysis_group: GroupMapping,
    pub analysis_groups: Vec<AnalysisGroup>,
}

/// Keeps patients that belong to one of `groups`. With `na_patients_hidden`, patients listed in
/// `patient_keys_with_na` are dropped as well.
pub fn make_survival_chart_data(
    patients: &[PatientSurvival],
    groups: &[AnalysisGroup],
    patient_to_group: &GroupMapping,
    na_patients_hidden: bool,
    patient_keys_with_na: Option<&[String]>,
) -> SurvivalChartData {
    let group_values: HashSet<&str> = groups.iter().map(|g| g.value.as_str()).collect();
    let na: HashSet<&str> = match (na_patients_hidden, patient_keys_with_na) {
        (true, Some(keys)) => keys.iter().map(String::as_str).collect(),
        _ => HashSet::new(),
    };

    let mut data = SurvivalChartData {
        analysis_groups: groups.to_vec(),
        ..Default::default()
    };
    for patient in patients {
        let key = patient.unique_patient_key.as_str();
        if na.contains(key) {
            continue;
        }
        let Some(group) = patient_to_group.get(key) else {
            continue;
        };
        if !group_values.contains(group.as_str()) {
            continue;
        }
        data.patient_to_analysis_group
            .insert(key.to_string(), group.clone());
        data.patient_survivals.push(patient.clone());
    }
    data
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub label: String,
    pub color: Rgb,
    pub cases: usize,
    pub deceased: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurvivalChart {
    data: SurvivalChartData,
    summaries: Vec<GroupSummary>,
    title: String,
    na_patients_hidden: bool,
    size: (f64, f64),
    text: Rgb,
}

impl SurvivalChart {
    /// `None` until the patient to group mapping has loaded.
    pub fn new(plots: &[SurvivalPlot], ctx: &RenderContext<'_>) -> Option<Self> {
        let mapping = ctx.patient_to_group?;
        let patients: Vec<PatientSurvival> = plots
            .iter()
            .find(|p| p.id == ctx.unique_key)
            .map(|p| {
                p.altered_group
                    .iter()
                    .chain(&p.unaltered_group)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let data = make_survival_chart_data(
            &patients,
            &ctx.analysis_groups.groups,
            mapping,
            ctx.na_patients_hidden,
            ctx.patient_keys_with_na,
        );

        let parser = ColorParser::new();
        let summaries = data
            .analysis_groups
            .iter()
            .enumerate()
            .map(|(i, group)| {
                let members = data
                    .patient_survivals
                    .iter()
                    .filter(|p| {
                        data.patient_to_analysis_group
                            .get(&p.unique_patient_key)
                            .is_some_and(|g| *g == group.value)
                    });
                let (cases, deceased) =
                    members.fold((0, 0), |(n, d), p| (n + 1, d + usize::from(p.status)));
                GroupSummary {
                    label: group.label().to_string(),
                    color: parser
                        .parse(&group.color)
                        .unwrap_or_else(|_| ctx.theme.series_color(i)),
                    cases,
                    deceased,
                }
            })
            .collect();

        Some(Self {
            data,
            summaries,
            title: ctx.title.to_string(),
            na_patients_hidden: ctx.na_patients_hidden,
            size: (ctx.size.0 as f64, ctx.size.1 as f64),
            text: ctx.theme.get("text"),
        })
    }

    pub fn data(&self) -> &SurvivalChartData {
        &self.data
    }

    pub fn summaries(&self) -> &[GroupSummary] {
        &self.summaries
    }
}

impl Plottable for SurvivalChart {
    fn to_vector_document(&self) -> VectorDocument {
        let (width, height) = self.size;
        let mut doc = VectorDocument::new(width, height);
        doc.push(Shape::text((width / 2.0, 16.0), self.title.clone(), 13.0, self.text));

        let header_y = 44.0;
        for (x, anchor, label) in [
            (24.0, Anchor::Start, "Group"),
            (width - 90.0, Anchor::End, "Number of Cases, Total"),
            (width - 10.0, Anchor::End, "Deceased"),
        ] {
            doc.push(Shape::Text {
                at: (x, header_y),
                content: label.to_string(),
                size: FONT,
                anchor,
                angle: 0.0,
                fill: self.text,
            });
        }

        for (i, summary) in self.summaries.iter().enumerate() {
            let y = header_y + (i + 1) as f64 * ROW_HEIGHT;
            doc.push(Shape::Rect {
                x: 8.0,
                y: y - 9.0,
                width: 10.0,
                height: 10.0,
                fill: summary.color,
            });
            for (x, anchor, content) in [
                (24.0, Anchor::Start, summary.label.clone()),
                (width - 90.0, Anchor::End, summary.cases.to_string()),
                (width - 10.0, Anchor::End, summary.deceased.to_string()),
            ] {
                doc.push(Shape::Text {
                    at: (x, y),
                    content,
                    size: FONT,
                    anchor,
                    angle: 0.0,
                    fill: self.text,
                });
            }
        }

        let note = if self.na_patients_hidden {
            "Patients with NA values are hidden"
        } else {
            "Patients with NA values are shown"
        };
        doc.push(Shape::text((width / 2.0, height - 24.0), note, 9.0, self.text));
        doc.push(Shape::text(
            (width / 2.0, height - 8.0),
            format!("{} / {}", X_AXIS_LABEL, Y_AXIS_LABEL),
            9.0,
            self.text,
        ));
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;

    fn patient(key: &str, status: bool) -> PatientSurvival {
        PatientSurvival {
            unique_patient_key: key.to_string(),
            months: 12.0,
            status,
        }
    }

    fn groups() -> Vec<AnalysisGroup> {
        vec![
            AnalysisGroup {
                value: "Male".into(),
                color: "#2986e2".into(),
                legend_text: None,
            },
            AnalysisGroup {
                value: "Female".into(),
                color: "#dc3912".into(),
                legend_text: Some("F".into()),
            },
        ]
    }

    fn mapping() -> GroupMapping {
        [("p1", "Male"), ("p2", "Female"), ("p3", "Other"), ("p4", "Male")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn keeps_patients_in_configured_groups() {
        let patients = vec![
            patient("p1", true),
            patient("p2", false),
            patient("p3", true),
            patient("p5", true),
        ];
        let data = make_survival_chart_data(&patients, &groups(), &mapping(), true, None);
        let keys: Vec<&str> = data
            .patient_survivals
            .iter()
            .map(|p| p.unique_patient_key.as_str())
            .collect();
        assert_eq!(keys, vec!["p1", "p2"]);
        assert_eq!(data.patient_to_analysis_group.len(), 2);
    }

    #[test]
    fn na_patients_follow_toggle() {
        let patients = vec![patient("p1", true), patient("p4", false)];
        let na = vec!["p4".to_string()];
        let hidden = make_survival_chart_data(&patients, &groups(), &mapping(), true, Some(&na));
        assert_eq!(hidden.patient_survivals.len(), 1);
        let shown = make_survival_chart_data(&patients, &groups(), &mapping(), false, Some(&na));
        assert_eq!(shown.patient_survivals.len(), 2);
    }

    #[test]
    fn chart_needs_patient_mapping() {
        let mut fx = Fixture::new();
        fx.groups.groups = groups();
        let plots = vec![SurvivalPlot {
            id: "KEY".into(),
            altered_group: vec![patient("p1", true)],
            unaltered_group: vec![patient("p2", false), patient("p4", false)],
        }];
        assert!(SurvivalChart::new(&plots, &fx.ctx(&[])).is_none());

        let map = mapping();
        let mut ctx = fx.ctx(&[]);
        ctx.patient_to_group = Some(&map);
        let chart = SurvivalChart::new(&plots, &ctx).unwrap();
        let male = &chart.summaries()[0];
        assert_eq!((male.cases, male.deceased), (2, 1));
        assert_eq!(chart.summaries()[1].label, "F");
        assert!(chart.to_vector_document().texts().any(|t| t == "Deceased"));
    }
}
