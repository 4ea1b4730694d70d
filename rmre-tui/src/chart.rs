//! Line chart widget for a single RMRE series.
//!
//! Displays:
//! - The series as a Braille line, x = point index
//! - First, middle and last period labels on the x axis
//! - Min, mid and max values on the y axis
//! - Point count and last value in the title

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
};
use rmre_core::render::ChartSpec;

use crate::theme::Theme;

pub struct SeriesChart<'a> {
    spec: &'a ChartSpec,
    theme: &'a Theme,
}

impl<'a> SeriesChart<'a> {
    pub fn new(spec: &'a ChartSpec, theme: &'a Theme) -> Self {
        Self { spec, theme }
    }

    fn title(&self) -> Line<'a> {
        let mut spans = vec![Span::styled(
            format!(" {} ", self.spec.title),
            Style::default()
                .fg(self.theme.text_primary)
                .add_modifier(Modifier::BOLD),
        )];
        if let (Some(first), Some(last)) = (self.spec.values.first(), self.spec.values.last()) {
            spans.push(Span::styled(
                format!("| {} points | last {} ", self.spec.values.len(), format_value(*last)),
                Style::default().fg(self.theme.change_color(*first, *last)),
            ));
        }
        Line::from(spans)
    }

    fn block(&self) -> Block<'a> {
        Block::default()
            .title(self.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background))
    }
}

impl Widget for SeriesChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some((y_min, y_max)) = self.spec.value_bounds() else {
            Paragraph::new(Span::styled(
                "no data in the requested range",
                Style::default().fg(self.theme.warning),
            ))
            .block(self.block())
            .render(area, buf);
            return;
        };

        let data = self.spec.points();
        let x_max = (data.len().saturating_sub(1)).max(1) as f64;

        // Pad the y axis so a flat series does not sit on the border.
        let y_range = y_max - y_min;
        let y_pad = if y_range > 0.0 {
            y_range * 0.05
        } else {
            y_max.abs().max(1.0) * 0.01
        };
        let y_lower = y_min - y_pad;
        let y_upper = y_max + y_pad;

        let datasets = vec![Dataset::default()
            .name(self.spec.y_label.clone())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(self.theme.line_color(&self.spec.y_label)))
            .data(&data)];

        let labels = &self.spec.labels;
        let x_labels: Vec<Span> = match labels.len() {
            0 => Vec::new(),
            // ratatui skips axis labels unless there are at least two.
            1 => vec![Span::raw(labels[0].clone()), Span::raw("")],
            n => vec![
                Span::raw(labels[0].clone()),
                Span::raw(labels[n / 2].clone()),
                Span::raw(labels[n - 1].clone()),
            ],
        };
        let y_labels = vec![
            Span::raw(format_value(y_lower)),
            Span::raw(format_value((y_lower + y_upper) / 2.0)),
            Span::raw(format_value(y_upper)),
        ];

        let axis_title = |text: &str| {
            Span::styled(
                text.to_string(),
                Style::default().fg(self.theme.text_secondary),
            )
        };

        Chart::new(datasets)
            .block(self.block())
            .x_axis(
                Axis::default()
                    .title(axis_title(&self.spec.x_label))
                    .style(Style::default().fg(self.theme.muted))
                    .bounds([0.0, x_max])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title(axis_title(&self.spec.y_label))
                    .style(Style::default().fg(self.theme.muted))
                    .bounds([y_lower, y_upper])
                    .labels(y_labels),
            )
            .render(area, buf);
    }
}

/// Peso levels with two decimals; returns with six.
pub fn format_value(v: f64) -> String {
    if v.abs() >= 1.0 {
        format!("{v:.2}")
    } else {
        format!("{v:.6}")
    }
}

/// Draw `spec` into an off-screen buffer and return its text, row by row.
pub fn render_to_string(spec: &ChartSpec, theme: &Theme, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    SeriesChart::new(spec, theme).render(area, &mut buf);

    let mut out = String::with_capacity((width as usize + 1) * height as usize);
    for y in 0..area.height {
        for x in 0..area.width {
            if let Some(cell) = buf.cell((x, y)) {
                out.push_str(cell.symbol());
            }
        }
        out.push('\n');
    }
    out
}
