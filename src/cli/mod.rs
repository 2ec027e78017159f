//! Command-line parsing for the yield-curve plotter.
//!
//! Argument parsing stays here; `app` owns dispatch and everything that touches
//! the filesystem or terminal.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{CurveShape, SeriesName};
use crate::plot::StyleOverride;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ycp", version, about = "Yield-curve CSV plotter")]
pub struct Cli {
    /// Directory holding `{name}.csv` curve files [env: YCP_DATA_DIR].
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory charts are saved to [env: YCP_OUTPUT_DIR].
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print what one or more curves contain.
    Describe(DescribeArgs),
    /// Overlay several series of one curve.
    Plot(PlotArgs),
    /// Compare one series across two curves.
    Compare(CompareArgs),
    /// Observed curve as markers against a fitted curve as lines.
    Fit(FitArgs),
}

#[derive(Debug, Args)]
pub struct DescribeArgs {
    /// Curve names (file stems under the data directory).
    #[arg(required = true, value_name = "NAME")]
    pub names: Vec<String>,

    /// Expected column layout; detected from the header when omitted.
    #[arg(long, value_enum)]
    pub shape: Option<CurveShape>,

    /// Emit JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Curve name.
    pub name: String,

    /// Series to draw (comma separated); defaults depend on the curve shape.
    #[arg(long, value_enum, value_delimiter = ',')]
    pub series: Vec<SeriesName>,

    #[arg(long, value_enum)]
    pub shape: Option<CurveShape>,

    #[command(flatten)]
    pub render: RenderArgs,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    pub first: String,
    pub second: String,

    /// Series taken from both curves.
    #[arg(long, value_enum, default_value = "simpleRate")]
    pub series: SeriesName,

    #[command(flatten)]
    pub render: RenderArgs,
}

#[derive(Debug, Args)]
pub struct FitArgs {
    /// Curve drawn as markers.
    pub observed: String,
    /// Curve drawn as lines.
    pub fitted: String,

    /// Series compared pairwise (comma separated, at least two); defaults depend
    /// on the observed curve's shape.
    #[arg(long, value_enum, value_delimiter = ',')]
    pub series: Vec<SeriesName>,

    #[command(flatten)]
    pub render: RenderArgs,
}

/// Options shared by every rendering command.
#[derive(Debug, Args, Clone, Default)]
pub struct RenderArgs {
    /// Save the chart as PNG.
    #[arg(long)]
    pub save: bool,

    /// Do not open the terminal viewer.
    #[arg(long)]
    pub no_show: bool,

    /// PNG path (implies --save); defaults to `{output-dir}/{stem}.png`.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Per-series style, e.g. `simpleRate:color=navy,line=dashed` (repeatable).
    #[arg(long = "style", value_name = "TARGET:KEY=VALUE,...")]
    pub styles: Vec<StyleOverride>,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, value_name = "LABEL")]
    pub x_label: Option<String>,

    #[arg(long, value_name = "LABEL")]
    pub y_label: Option<String>,

    /// PNG width in pixels [env: YCP_IMAGE_SIZE].
    #[arg(long, value_parser = clap::value_parser!(u32).range(100..))]
    pub width: Option<u32>,

    /// PNG height in pixels [env: YCP_IMAGE_SIZE].
    #[arg(long, value_parser = clap::value_parser!(u32).range(100..))]
    pub height: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::Rgb;

    #[test]
    fn plot_accepts_series_list_and_styles() {
        let cli = Cli::try_parse_from([
            "ycp",
            "--data-dir",
            "build/output-test4",
            "plot",
            "canadaZeroCurveSvensson",
            "--series",
            "obsSpotRate,nssSpotRate",
            "--style",
            "nssSpotRate:color=navy,line=dashed",
            "--save",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, Some(PathBuf::from("build/output-test4")));
        let Command::Plot(args) = cli.command else {
            panic!("expected plot");
        };
        assert_eq!(args.name, "canadaZeroCurveSvensson");
        assert_eq!(args.series, vec![SeriesName::ObservedSpotRate, SeriesName::NssSpotRate]);
        assert!(args.render.save);
        assert_eq!(args.render.styles.len(), 1);
        assert_eq!(args.render.styles[0].color, Some(Rgb::NAVY));
    }

    #[test]
    fn compare_defaults_to_simple_rate() {
        let cli = Cli::try_parse_from(["ycp", "compare", "A", "B", "--no-show"]).unwrap();
        let Command::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(args.series, SeriesName::SimpleRate);
        assert!(args.render.no_show);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["ycp", "describe", "A", "--shape", "nss", "--output-dir", "plots"]).unwrap();
        assert_eq!(cli.output_dir, Some(PathBuf::from("plots")));
        let Command::Describe(args) = cli.command else {
            panic!("expected describe");
        };
        assert_eq!(args.shape, Some(CurveShape::NelsonSiegel));
    }

    #[test]
    fn rejects_unknown_series_and_bad_style() {
        assert!(Cli::try_parse_from(["ycp", "plot", "A", "--series", "yield"]).is_err());
        assert!(Cli::try_parse_from(["ycp", "plot", "A", "--style", "nocolon"]).is_err());
        assert!(Cli::try_parse_from(["ycp", "fit", "A", "B", "--width", "10"]).is_err());
    }
}
