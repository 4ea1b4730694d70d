//! Interactive terminal renderer.
//!
//! Takes over the terminal (raw mode + alternate screen), draws the chart,
//! and blocks until the user presses `q`, `Esc` or `Enter`. The terminal is
//! restored on every exit path, including panics.

use std::io::{self, IsTerminal, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Terminal;
use rmre_core::render::{ChartSpec, RenderError, SeriesRenderer};

use crate::chart::SeriesChart;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalRenderer {
    theme: Theme,
}

impl TerminalRenderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    fn draw_loop(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        chart: &ChartSpec,
    ) -> io::Result<()> {
        loop {
            terminal.draw(|f| {
                let [plot, footer] =
                    Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(f.area());
                f.render_widget(SeriesChart::new(chart, &self.theme), plot);
                f.render_widget(
                    Paragraph::new(Span::styled(
                        " q / Esc / Enter: close",
                        Style::default().fg(self.theme.text_secondary),
                    )),
                    footer,
                );
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press
                        && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter)
                    {
                        return Ok(());
                    }
                }
            }
        }
    }
}

impl SeriesRenderer for TerminalRenderer {
    fn render(&self, chart: &ChartSpec) -> Result<(), RenderError> {
        if chart.is_empty() {
            return Err(RenderError::Empty);
        }
        if !io::stdout().is_terminal() {
            return Err(RenderError::NoDisplay("stdout is not a terminal".into()));
        }

        let _guard = TerminalGuard::enter()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        terminal.clear()?;
        tracing::debug!(title = %chart.title, points = chart.values.len(), "chart opened");

        self.draw_loop(&mut terminal, chart)?;
        terminal.show_cursor()?;
        Ok(())
    }
}

/// Raw mode + alternate screen for as long as it lives.
struct TerminalGuard {
    _hook: PanicHookGuard,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        let hook = PanicHookGuard::install();
        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(Self { _hook: hook })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Chains a terminal-restoring panic hook in front of the current one and
/// puts the previous hook back on drop.
struct PanicHookGuard {
    restore: Option<Box<dyn FnOnce()>>,
}

impl PanicHookGuard {
    fn install() -> Self {
        let previous = Arc::new(std::panic::take_hook());
        let chained = Arc::clone(&previous);
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stderr(), LeaveAlternateScreen);
            (*chained)(info);
        }));

        Self {
            restore: Some(Box::new(move || {
                let _ = std::panic::take_hook();
                std::panic::set_hook(Box::new(move |info| (*previous)(info)));
            })),
        }
    }
}

impl Drop for PanicHookGuard {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chart_is_rejected_before_touching_terminal() {
        let chart = ChartSpec {
            title: "RMRE".into(),
            x_label: "Date".into(),
            y_label: "rmre".into(),
            labels: Vec::new(),
            values: Vec::new(),
        };
        let err = TerminalRenderer::default().render(&chart).unwrap_err();
        assert!(matches!(err, RenderError::Empty));
    }

    #[test]
    fn previous_panic_hook_is_back_after_guard() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        std::panic::set_hook(Box::new(|_| {
            CALLS.fetch_add(1, Ordering::SeqCst);
        }));
        drop(PanicHookGuard::install());

        let _ = std::panic::catch_unwind(|| {
            panic!("after the guard");
        });
        let _ = std::panic::take_hook();
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }
}
