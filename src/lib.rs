//! Chart slot engine for analytical dashboards.
//!
//! A [`ChartContainer`] waits for its data sources, normalizes pre-aggregated bins into plot
//! points and tick labels, dispatches to one view per [`ChartKind`], and reports user selections
//! back to the dashboard as [`ChartEvent`]s.

pub mod binning;
pub mod chart_controls;
pub mod chart_export;
pub mod chart_state;
pub mod charts;
pub mod config;
pub mod container;
pub mod error;
pub mod error_display;
pub mod fixture;
pub mod layout;
pub mod model;
pub mod remote_data;
pub mod selection;
pub mod vector;

pub use binning::{BinnedAxis, PlotPoint, TickLabel};
pub use chart_export::{ChartDownload, ChartDownloadType, DownloadRequest};
pub use charts::{ChartView, Interaction, Plottable, SelectionEvent};
pub use config::{AppConfig, ColorParser, ConfigManager, Theme};
pub use container::{ChartBody, ChartContainer, ChartEvent, ChartProps, RenderedChart};
pub use error::ChartError;
pub use fixture::ChartFixture;
pub use model::{ActiveFilter, ChartKind, ChartMeta, ChartPayload, DataBin};
pub use remote_data::{LoadStatus, RemoteData};
pub use vector::VectorDocument;

/// Application name used for the config directory and other app-specific paths
pub const APP_NAME: &str = "chartslot";
