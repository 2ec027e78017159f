//! Ratatui-based chart viewer.
//!
//! Shows one chart full-screen until the user closes it (`q`, `Esc` or `Enter`).
//! The plot itself is drawn by Plotters; tick labels, axis titles and the legend
//! are Ratatui text, so no font is needed in the terminal.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::error::CurveError;
use crate::plot::style::{LineStyle, SeriesStyle};
use crate::plot::{ChartSpec, Rgb};

mod plotters_chart;

use plotters_chart::CurvePlottersChart;

/// Show `chart` in the terminal and block until the viewer is closed.
pub fn present(chart: &ChartSpec) -> Result<(), CurveError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| CurveError::Terminal(format!("failed to initialize terminal: {e}")))?;

    log::debug!("presenting chart '{}'", chart.title);
    Viewer { chart }.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, CurveError> {
        enable_raw_mode().map_err(|e| CurveError::Terminal(format!("failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(CurveError::Terminal(format!("failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct Viewer<'a> {
    chart: &'a ChartSpec,
}

impl Viewer<'_> {
    fn event_loop<B: ratatui::backend::Backend>(&self, terminal: &mut Terminal<B>) -> Result<(), CurveError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| CurveError::Terminal(format!("draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| CurveError::Terminal(format!("event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| CurveError::Terminal(format!("event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press && closes_viewer(key.code) {
                        break;
                    }
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }
        Ok(())
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                self.chart.title.as_str(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({} series)", self.chart.series.len()),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let legend_width = self
            .chart
            .series
            .iter()
            .map(|s| s.label.chars().count() as u16 + 7)
            .max()
            .unwrap_or(0)
            .clamp(16, 40);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(legend_width)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_legend(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let (chart_rect, insets) = chart_layout(inner);
        frame.render_widget(CurvePlottersChart { chart: self.chart }, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, self.chart);
        }
    }

    fn draw_legend(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .chart
            .series
            .iter()
            .map(|s| {
                ListItem::new(Line::from(vec![
                    Span::styled(legend_glyph(&s.style), Style::default().fg(terminal_color(s.style.color))),
                    Span::raw(" "),
                    Span::raw(s.label.as_str()),
                ]))
            })
            .collect();

        let list = List::new(items).block(Block::default().title("Legend").borders(Borders::ALL));
        frame.render_widget(list, area);
    }
}

fn draw_footer(frame: &mut ratatui::Frame<'_>, area: Rect) {
    let help = Paragraph::new(Span::styled("q / Esc / Enter close", Style::default().fg(Color::Gray)))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}

fn closes_viewer(code: KeyCode) -> bool {
    matches!(code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter)
}

fn terminal_color(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

fn legend_glyph(style: &SeriesStyle) -> &'static str {
    if style.line == LineStyle::None {
        " • "
    } else {
        "───"
    }
}

/// Decimal places that resolve ticks spread over `span`.
fn tick_precision(span: f64) -> usize {
    if !span.is_finite() || span <= 0.0 {
        return 2;
    }
    (1 - span.log10().floor() as i32).clamp(0, 6) as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 10,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    area: Rect,
    insets: AxisInsets,
    chart: &ChartSpec,
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);
    let [x0, x1] = chart.x_bounds;
    let [y0, y1] = chart.y_bounds;
    let x_prec = tick_precision((x1 - x0) / (ticks as f64 - 1.0));
    let y_prec = tick_precision((y1 - y0) / (ticks as f64 - 1.0));

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x0 + u * (x1 - x0);
        let x = area.x + ((area.width - 1) as f64 * u).round() as u16;
        let label = format!("{x_val:.x_prec$}");
        let label_len = label.len() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = area.y + area.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len.min(inner.x + inner.width - start),
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y0 + u * (y1 - y0);
        let y = area.y + (area.height - 1) - ((area.height - 1) as f64 * u).round() as u16;
        let label = format!("{y_val:.y_prec$}");
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new(chart.x_label.as_str())
        .alignment(Alignment::Center)
        .style(style);
    let x_rect = Rect {
        x: area.x,
        y: area.y + area.height + 1,
        width: area.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(Text::from(chart.y_label.as_str()))
        .style(style.add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: inner.width.min(insets.left + insets.right + area.width),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures;
    use crate::plot::{Comparison, ComparisonRequest};
    use crate::plot::style::Rgb;
    use ratatui::backend::TestBackend;

    #[test]
    fn close_keys() {
        assert!(closes_viewer(KeyCode::Char('q')));
        assert!(closes_viewer(KeyCode::Esc));
        assert!(closes_viewer(KeyCode::Enter));
        assert!(!closes_viewer(KeyCode::Char('x')));
    }

    #[test]
    fn tick_precision_follows_span() {
        assert_eq!(tick_precision(7.5), 1);
        assert_eq!(tick_precision(0.005), 4);
        assert_eq!(tick_precision(250.0), 0);
        assert_eq!(tick_precision(0.0), 2);
    }

    #[test]
    fn legend_glyph_tracks_line_style() {
        assert_eq!(legend_glyph(&SeriesStyle::markers(Rgb::RED)), " • ");
        assert_eq!(legend_glyph(&SeriesStyle::line(Rgb::NAVY)), "───");
    }

    #[test]
    fn layout_reserves_axis_insets_only_when_room() {
        let (rect, insets) = chart_layout(Rect::new(0, 0, 80, 20));
        assert!(insets.is_some());
        assert_eq!(rect, Rect::new(10, 1, 68, 17));

        let small = Rect::new(0, 0, 15, 6);
        assert_eq!(chart_layout(small), (small, None));
    }

    #[test]
    fn viewer_draws_title_and_legend() {
        let curve = fixtures::nss("Curve2");
        let chart = ComparisonRequest::new(Comparison::Overlay {
            curve: &curve,
            series: curve.shape().default_overlay(),
        })
        .build()
        .unwrap();

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| Viewer { chart: &chart }.draw(f)).unwrap();

        let buf = terminal.backend().buffer();
        let text: String = (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("Curve2"));
        assert!(text.contains("Observed rates"));
        assert!(text.contains("Legend"));
    }
}
