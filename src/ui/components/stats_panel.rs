use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::app::format_duration;
use crate::engine::DisplayStats;
use crate::ui::theme::Theme;

/// Played / win rate / streaks, plus the running time of the open puzzle.
pub struct StatsPanel<'a> {
    stats: DisplayStats,
    elapsed_secs: Option<u64>,
    average_secs: Option<u64>,
    theme: &'a Theme,
}

impl<'a> StatsPanel<'a> {
    pub fn new(stats: DisplayStats, theme: &'a Theme) -> Self {
        Self {
            stats,
            elapsed_secs: None,
            average_secs: None,
            theme,
        }
    }

    pub fn elapsed(mut self, secs: u64) -> Self {
        self.elapsed_secs = Some(secs);
        self
    }

    pub fn average(mut self, secs: Option<u64>) -> Self {
        self.average_secs = secs;
        self
    }
}

impl Widget for StatsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let label = Style::default().fg(colors.fg());
        let value = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);

        let row = |name: &'static str, text: String, style: Style| {
            Line::from(vec![Span::styled(name, label), Span::styled(text, style)])
        };

        let streak_style = if self.stats.current_streak > 0 {
            Style::default()
                .fg(colors.success())
                .add_modifier(Modifier::BOLD)
        } else {
            value
        };

        let mut lines = vec![
            row("Played:         ", self.stats.total_played.to_string(), value),
            row("Win rate:       ", format!("{}%", self.stats.win_rate), value),
            Line::from(""),
            row("Current streak: ", self.stats.current_streak.to_string(), streak_style),
            row("Max streak:     ", self.stats.max_streak.to_string(), value),
        ];
        if let Some(avg) = self.average_secs {
            lines.push(Line::from(""));
            lines.push(row("Average time:   ", format_duration(avg), value));
        }
        if let Some(elapsed) = self.elapsed_secs {
            lines.push(Line::from(""));
            lines.push(row("This puzzle:    ", format_duration(elapsed), value));
        }

        let block = Block::bordered()
            .title(" Statistics ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(lines).block(block).render(area, buf);
    }
}
