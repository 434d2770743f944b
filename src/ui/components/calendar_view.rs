use chrono::{Datelike, NaiveDate};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::catalog::calendar::CalendarDay;
use crate::ui::theme::Theme;

const CELL_WIDTH: u16 = 4;

/// Month grid, Monday first. Solved days are marked, future days dimmed.
pub struct CalendarView<'a> {
    days: &'a [CalendarDay],
    cursor: NaiveDate,
    theme: &'a Theme,
}

impl<'a> CalendarView<'a> {
    pub fn new(days: &'a [CalendarDay], cursor: NaiveDate, theme: &'a Theme) -> Self {
        Self {
            days,
            cursor,
            theme,
        }
    }
}

impl Widget for CalendarView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = match self.days.first() {
            Some(day) => format!(" {} ", day.date.format("%B %Y")),
            None => " Calendar ".to_string(),
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < CELL_WIDTH * 7 || inner.height < 8 {
            return;
        }

        let labels = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];
        for (col, label) in labels.iter().enumerate() {
            buf.set_string(
                inner.x + col as u16 * CELL_WIDTH,
                inner.y,
                label,
                Style::default().fg(colors.accent_dim()),
            );
        }

        let Some(first) = self.days.first() else {
            return;
        };
        let offset = first.date.weekday().num_days_from_monday() as usize;

        for (i, day) in self.days.iter().enumerate() {
            let cell = offset + i;
            let x = inner.x + (cell % 7) as u16 * CELL_WIDTH;
            let y = inner.y + 1 + (cell / 7) as u16;
            if y >= inner.y + inner.height {
                break;
            }

            let mut style = if day.is_future || !day.has_quote {
                Style::default().fg(colors.accent_dim())
            } else if day.solved {
                Style::default().fg(colors.success())
            } else {
                Style::default().fg(colors.fg())
            };
            if day.is_today {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            if day.date == self.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }

            let marker = if day.solved { "✓" } else { " " };
            buf.set_string(x, y, format!("{:>2}{marker}", day.date.day()), style);
        }
    }
}
