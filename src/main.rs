use std::io::Write;
use std::path::Path;
use std::sync::mpsc::channel;

use chartslot::chart_export::write_chart_png;
use chartslot::error_display::user_message_from_report;
use chartslot::{
    AppConfig, ChartBody, ChartContainer, ChartDownloadType, ChartEvent, ChartFixture, ChartKind,
    ConfigManager, APP_NAME,
};
use chartslot_cli::{Args, ExportFormat};
use clap::Parser;
use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// `--log-filter` wins over `RUST_LOG`, which wins over the config file.
fn init_tracing(args: &Args, config: &AppConfig) {
    let filter = args
        .log_filter
        .as_deref()
        .and_then(|f| EnvFilter::try_new(f).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.generate_config {
        let manager = ConfigManager::new(APP_NAME)?;
        let path = manager.write_default_config(args.force)?;
        println!("Configuration written to {}", path.display());
        return Ok(Some(()));
    }
    Ok(None)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, content)
            .map_err(|e| eyre!("Failed to write {}: {}", path.display(), e)),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn run(args: &Args, input: &Path, config: AppConfig) -> Result<()> {
    let fixture = ChartFixture::load(input)?;
    let override_kind = args
        .kind
        .as_deref()
        .map(str::parse::<ChartKind>)
        .transpose()?;

    let mut props = fixture.into_props();
    props.log_scale_checked = args.log_scale;

    let (tx, rx) = channel::<ChartEvent>();
    let mut container = ChartContainer::new(props, config, tx)?;
    if let Some(kind) = override_kind {
        container.change_chart_type(kind)?;
    }
    for event in rx.try_iter() {
        debug!(?event, "chart event");
    }

    match container.body() {
        ChartBody::Chart(_) => {}
        ChartBody::Error(msg) => bail!("{}", msg),
        ChartBody::Loading | ChartBody::Empty => {
            bail!("Nothing to render for {}", container.chart_kind())
        }
    }

    let format = args.export_format();
    info!(kind = %container.chart_kind(), format = format.extension(), "exporting chart");
    let download_kind = match format {
        ExportFormat::Png => {
            let Some(path) = args.output.as_deref() else {
                bail!("PNG export requires --output");
            };
            return write_chart_png(path, &container.to_vector_document(), container.chart_size());
        }
        ExportFormat::Svg => ChartDownloadType::Svg,
        ExportFormat::Eps => ChartDownloadType::Eps,
        ExportFormat::Tsv => ChartDownloadType::Tsv,
    };

    let download = container
        .download_options()
        .into_iter()
        .find(|d| d.kind == download_kind)
        .ok_or_else(|| {
            eyre!(
                "{} export is not available for {}",
                download_kind.as_str(),
                container.chart_kind()
            )
        })?;
    write_output(args.output.as_deref(), &download.generate()?)
}

fn main() -> Result<()> {
    let args = Args::parse();
    color_eyre::install()?;

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    let config = AppConfig::load(APP_NAME)?;
    init_tracing(&args, &config);

    let input = args
        .input
        .as_deref()
        .ok_or_else(|| eyre!("A chart fixture path is required"))?;
    if let Err(e) = run(&args, input, config) {
        eprintln!("Error: {}", user_message_from_report(&e, Some(input)));
        std::process::exit(1);
    }
    Ok(())
}
