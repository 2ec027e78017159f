//! Plotters drawing shared by the PNG writer and the terminal viewer.

use plotters::chart::{ChartContext, SeriesAnno};
use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use crate::plot::chart::{ChartSpec, PlotSeries};
use crate::plot::style::{LineStyle, Marker, Rgb};

type Chart2d<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// What the target surface can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// Raster image. `text` is false when no font could be registered; the
    /// chart is then drawn without caption, tick labels and legend.
    Raster { text: bool },
    /// Terminal cells: no text (the viewer draws labels itself) and markers
    /// collapse to single pixels.
    Terminal,
}

impl DrawMode {
    fn text(self) -> bool {
        matches!(self, DrawMode::Raster { text: true })
    }
}

impl From<Rgb> for RGBColor {
    fn from(c: Rgb) -> Self {
        RGBColor(c.0, c.1, c.2)
    }
}

/// Draw every series of `chart` on `root`. The caller owns filling and presenting.
pub fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &ChartSpec,
    mode: DrawMode,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let [x0, x1] = chart.x_bounds;
    let [y0, y1] = chart.y_bounds;

    let mut builder = ChartBuilder::on(root);
    if mode.text() {
        builder
            .caption(&chart.title, ("sans-serif", 24))
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 80)
            .set_label_area_size(LabelAreaPosition::Bottom, 50);
    } else if mode == DrawMode::Terminal {
        builder.margin(1);
    } else {
        builder.margin(20);
    }
    let mut ctx = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    if mode.text() {
        ctx.configure_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_labels(10)
            .y_labels(10)
            .x_label_formatter(&|v| format!("{v:.1}"))
            .y_label_formatter(&|v| format!("{v:.4}"))
            .light_line_style(WHITE.mix(0.0))
            .bold_line_style(BLACK.mix(0.1))
            .draw()?;
    } else if mode == DrawMode::Terminal {
        // Bare axes; tick labels come from the viewer.
        ctx.draw_series(std::iter::once(PathElement::new(
            vec![(x0, y1), (x0, y0), (x1, y0)],
            WHITE,
        )))?;
    }

    for series in &chart.series {
        draw_series(&mut ctx, series, mode)?;
    }

    if mode.text() && !chart.series.is_empty() {
        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .draw()?;
    }

    Ok(())
}

fn draw_series<DB: DrawingBackend>(
    ctx: &mut Chart2d<'_, DB>,
    series: &PlotSeries,
    mode: DrawMode,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let points: Vec<(f64, f64)> = series
        .points
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    let color: RGBColor = series.style.color.into();
    let label = series.label.clone();

    // The legend glyph follows the line if there is one, otherwise the marker.
    if let Some(anno) = draw_line(ctx, &points, series, color)? {
        let style = color.stroke_width(series.style.line_width);
        anno.label(label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        draw_markers(ctx, &points, series, color, mode)?;
    } else if let Some(anno) = draw_markers(ctx, &points, series, color, mode)? {
        let style = color.filled();
        anno.label(label)
            .legend(move |(x, y)| Circle::new((x + 10, y), 4, style));
    }
    Ok(())
}

fn draw_line<'a, 'b, DB: DrawingBackend>(
    ctx: &'b mut Chart2d<'a, DB>,
    points: &[(f64, f64)],
    series: &PlotSeries,
    color: RGBColor,
) -> Result<Option<&'b mut SeriesAnno<'a, DB>>, DrawingAreaErrorKind<DB::ErrorType>> {
    let style = color.stroke_width(series.style.line_width);
    let pts = points.iter().copied();
    let anno = match series.style.line {
        LineStyle::None => return Ok(None),
        LineStyle::Solid => ctx.draw_series(LineSeries::new(pts, style))?,
        LineStyle::Dashed => ctx.draw_series(DashedLineSeries::new(pts, 10, 6, style))?,
        LineStyle::Dotted => ctx.draw_series(DashedLineSeries::new(pts, 2, 4, style))?,
    };
    Ok(Some(anno))
}

fn draw_markers<'a, 'b, DB: DrawingBackend>(
    ctx: &'b mut Chart2d<'a, DB>,
    points: &[(f64, f64)],
    series: &PlotSeries,
    color: RGBColor,
    mode: DrawMode,
) -> Result<Option<&'b mut SeriesAnno<'a, DB>>, DrawingAreaErrorKind<DB::ErrorType>> {
    let size = series.style.marker_size as i32;
    let filled = color.filled();
    let anno = match (series.style.marker, mode) {
        (Marker::None, _) => return Ok(None),
        // Circle radii don't map well onto terminal cells; a colored pixel reads
        // as a clean dot there.
        (_, DrawMode::Terminal) | (Marker::Point, _) => {
            ctx.draw_series(points.iter().map(|&p| Pixel::new(p, color)))?
        }
        (Marker::Circle, _) => ctx.draw_series(points.iter().map(|&p| Circle::new(p, size, filled)))?,
        (Marker::Cross, _) => ctx.draw_series(
            points
                .iter()
                .map(|&p| Cross::new(p, size.max(2), color.stroke_width(1))),
        )?,
        (Marker::Triangle, _) => {
            ctx.draw_series(points.iter().map(|&p| TriangleMarker::new(p, size.max(2), filled)))?
        }
    };
    Ok(Some(anno))
}
