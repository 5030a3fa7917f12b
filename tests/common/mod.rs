#![allow(dead_code)]

use chartslot::config::AppConfig;
use chartslot::model::{
    ChartDimension, ChartKind, ChartMeta, ChartPayload, ClinicalAttribute, ClinicalDataCount,
    DataBin,
};
use chartslot::{ChartContainer, ChartEvent, ChartProps, RemoteData};
use std::sync::mpsc::{channel, Receiver};

pub fn attribute(id: &str) -> ClinicalAttribute {
    ClinicalAttribute {
        clinical_attribute_id: id.to_string(),
        display_name: id.to_string(),
        patient_attribute: true,
        datatype: "STRING".to_string(),
    }
}

pub fn meta(key: &str, kind: ChartKind) -> ChartMeta {
    ChartMeta {
        unique_key: key.to_string(),
        display_name: key.to_string(),
        chart_type: kind,
        dimension: ChartDimension::default(),
        clinical_attribute: Some(attribute(key)),
    }
}

pub fn sex_counts() -> ChartPayload {
    ChartPayload::ClinicalCounts(vec![
        ClinicalDataCount {
            value: "Male".to_string(),
            count: 6,
            color: None,
        },
        ClinicalDataCount {
            value: "Female".to_string(),
            count: 4,
            color: None,
        },
        ClinicalDataCount {
            value: "NA".to_string(),
            count: 1,
            color: None,
        },
    ])
}

/// Two numeric bins and one NA bin.
pub fn age_bins() -> Vec<DataBin> {
    vec![
        DataBin::numeric(0.0, 10.0, 5),
        DataBin::numeric(10.0, 20.0, 3),
        DataBin::special("NA", 2),
    ]
}

/// `n` contiguous numeric bins of width 10.
pub fn many_bins(n: usize) -> Vec<DataBin> {
    (0..n)
        .map(|i| DataBin::numeric(i as f64 * 10.0, (i + 1) as f64 * 10.0, i as u64 + 1))
        .collect()
}

pub fn props(key: &str, kind: ChartKind, payload: ChartPayload) -> ChartProps {
    ChartProps::new(meta(key, kind), key, RemoteData::Complete(payload))
}

/// Mounts a container with default configuration and returns the event receiver.
pub fn mount(props: ChartProps) -> (ChartContainer, Receiver<ChartEvent>) {
    let (tx, rx) = channel();
    let container =
        ChartContainer::new(props, AppConfig::default(), tx).expect("container should mount");
    (container, rx)
}

pub fn drain(rx: &Receiver<ChartEvent>) -> Vec<ChartEvent> {
    rx.try_iter().collect()
}
