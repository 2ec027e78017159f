//! Plotters-powered curve chart widget for Ratatui.
//!
//! Plotters output is rendered into the Ratatui buffer using
//! `plotters-ratatui-backend`. The widget draws lines, markers and bare axes
//! only; tick labels, axis titles and the legend are Ratatui text drawn around it.

use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::plot::ChartSpec;
use crate::plot::draw::{DrawMode, draw_chart};

pub const MIN_WIDTH: u16 = 20;
pub const MIN_HEIGHT: u16 = 8;

pub struct CurvePlottersChart<'a> {
    pub chart: &'a ChartSpec,
}

impl Widget for CurvePlottersChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area; show a hint instead.
        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let chart = self.chart;
        let widget = widget_fn(move |root| {
            draw_chart(&root, chart, DrawMode::Terminal)?;
            Ok(())
        });

        widget.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures;
    use crate::plot::{Comparison, ComparisonRequest};

    #[test]
    fn small_area_renders_hint() {
        let curve = fixtures::nss("N");
        let chart = ComparisonRequest::new(Comparison::Overlay {
            curve: &curve,
            series: curve.shape().default_overlay(),
        })
        .build()
        .unwrap();

        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        CurvePlottersChart { chart: &chart }.render(area, &mut buf);

        let first_row: String = (0..area.width).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert_eq!(first_row, "Chart area t");
    }
}
