//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and resolves settings
//! - loads curves from the data directory
//! - builds the requested comparison
//! - prints diagnostics, saves and/or shows the chart

use clap::Parser;

use crate::cli::{Cli, Command, CompareArgs, DescribeArgs, FitArgs, PlotArgs, RenderArgs};
use crate::config::Settings;
use crate::domain::SeriesName;
use crate::error::AppError;
use crate::io::CurveStore;
use crate::plot::{Comparison, ComparisonRequest, RenderOptions, Styling, render};
use crate::report::{self, FitDiagnostics};

/// Entry point for the `ycp` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    execute(cli, settings)
}

/// Run a parsed command line against resolved settings.
pub fn execute(cli: Cli, mut settings: Settings) -> Result<(), AppError> {
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }
    if let Some(dir) = cli.output_dir {
        settings.output_dir = dir;
    }
    log::debug!("settings: {settings:?}");

    let store = CurveStore::new(&settings.data_dir);
    match cli.command {
        Command::Describe(args) => handle_describe(&store, args),
        Command::Plot(args) => handle_plot(&store, &settings, args),
        Command::Compare(args) => handle_compare(&store, &settings, args),
        Command::Fit(args) => handle_fit(&store, &settings, args),
    }
}

fn handle_describe(store: &CurveStore, args: DescribeArgs) -> Result<(), AppError> {
    let mut summaries = Vec::with_capacity(args.names.len());
    for name in &args.names {
        let curve = store.load(name, args.shape)?;
        summaries.push(report::summarize(&curve));
    }

    if args.json {
        let json = serde_json::to_string_pretty(&summaries)
            .map_err(|e| AppError::new(1, format!("failed to serialize summary: {e}")))?;
        println!("{json}");
    } else {
        for summary in &summaries {
            println!("{}", report::format_summary(summary));
        }
    }
    Ok(())
}

fn handle_plot(store: &CurveStore, settings: &Settings, args: PlotArgs) -> Result<(), AppError> {
    let curve = store.load(&args.name, args.shape)?;
    let series: &[SeriesName] = if args.series.is_empty() {
        curve.shape().default_overlay()
    } else {
        &args.series
    };

    let chart = ComparisonRequest::new(Comparison::Overlay {
        curve: &curve,
        series,
    })
    .with_styling(styling(&args.render))
    .build()?;

    let diagnostics = report::overlay_diagnostics(&curve, series)?;
    deliver(&chart, settings, &args.render, &diagnostics)
}

fn handle_compare(store: &CurveStore, settings: &Settings, args: CompareArgs) -> Result<(), AppError> {
    let first = store.load(&args.first, None)?;
    let second = store.load(&args.second, None)?;

    let chart = ComparisonRequest::new(Comparison::Pairwise {
        first: &first,
        second: &second,
        series: args.series,
    })
    .with_styling(styling(&args.render))
    .build()?;

    let diagnostics = report::fit_diagnostics(&first, &second, &[args.series])?;
    deliver(&chart, settings, &args.render, &diagnostics)
}

fn handle_fit(store: &CurveStore, settings: &Settings, args: FitArgs) -> Result<(), AppError> {
    let observed = store.load(&args.observed, None)?;
    let fitted = store.load(&args.fitted, None)?;
    let series: &[SeriesName] = if args.series.is_empty() {
        observed.shape().default_fit()
    } else {
        &args.series
    };

    let chart = ComparisonRequest::new(Comparison::Fit {
        observed: &observed,
        fitted: &fitted,
        series,
    })
    .with_styling(styling(&args.render))
    .build()?;

    let diagnostics = report::fit_diagnostics(&observed, &fitted, series)?;
    deliver(&chart, settings, &args.render, &diagnostics)
}

/// Print diagnostics, then persist and/or present the chart.
fn deliver(
    chart: &crate::plot::ChartSpec,
    settings: &Settings,
    args: &RenderArgs,
    diagnostics: &FitDiagnostics,
) -> Result<(), AppError> {
    if !diagnostics.is_empty() {
        println!("{}", report::format_fit_diagnostics(diagnostics));
    }

    let options = render_options(settings, args);
    if !options.persist && !options.interactive {
        log::warn!("nothing to do for '{}': not saving and viewer disabled", chart.title);
    }

    let outcome = render(chart, &options)?;
    if let Some(path) = outcome.saved {
        println!("Saved {}", path.display());
    }
    Ok(())
}

fn styling(args: &RenderArgs) -> Styling {
    Styling {
        title: args.title.clone(),
        x_label: args.x_label.clone(),
        y_label: args.y_label.clone(),
        overrides: args.styles.clone(),
    }
}

fn render_options(settings: &Settings, args: &RenderArgs) -> RenderOptions {
    let mut options = RenderOptions::from_settings(settings);
    options.persist = args.save || args.output.is_some();
    options.output_path = args.output.clone();
    options.interactive = settings.interactive && !args.no_show;
    if let Some(w) = args.width {
        options.width = w;
    }
    if let Some(h) = args.height {
        options.height = h;
    }
    options
}
