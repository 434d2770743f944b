use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::{Phase, PuzzleSession, Target, TargetKind};
use crate::ui::theme::{Theme, ThemeColors};

/// The quote with solved words in place, the letter tiles of the active
/// target, and what has been typed so far.
pub struct QuoteBoard<'a> {
    session: &'a PuzzleSession,
    theme: &'a Theme,
}

impl<'a> QuoteBoard<'a> {
    pub fn new(session: &'a PuzzleSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    fn quote_line(&self, colors: &ThemeColors) -> Line<'a> {
        let quote = self.session.quote();
        let active = self.session.active().map(|t| t.kind);
        let mut spans = Vec::new();

        for (index, display) in quote.display_words().into_iter().enumerate() {
            if index > 0 {
                spans.push(Span::raw(" "));
            }
            let span = match quote.word_at(index) {
                None => Span::styled(display, Style::default().fg(colors.fg())),
                Some((_, word)) if self.session.is_word_solved(word) => {
                    Span::styled(display, Style::default().fg(colors.word_solved()))
                }
                Some((p, word)) if active == Some(TargetKind::Word(p)) => Span::styled(
                    word.scrambled.to_uppercase(),
                    Style::default()
                        .fg(colors.word_active_fg())
                        .bg(colors.word_active_bg())
                        .add_modifier(Modifier::BOLD),
                ),
                Some((_, word)) => Span::styled(
                    word.scrambled.to_uppercase(),
                    Style::default().fg(colors.word_scrambled()),
                ),
            };
            spans.push(span);
        }
        Line::from(spans)
    }

    fn author_line(&self, colors: &ThemeColors) -> Line<'a> {
        let quote = self.session.quote();
        let author = if self.session.author_solved() {
            Span::styled(quote.author.clone(), Style::default().fg(colors.word_solved()))
        } else if self.session.active().is_some_and(Target::is_author) {
            Span::styled(
                quote.scrambled_author.to_uppercase(),
                Style::default()
                    .fg(colors.word_active_fg())
                    .bg(colors.word_active_bg())
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(
                quote.scrambled_author.to_uppercase(),
                Style::default().fg(colors.word_scrambled()),
            )
        };
        Line::from(vec![Span::raw("— "), author])
    }

    fn tiles_line(&self, target: &Target, colors: &ThemeColors) -> Line<'a> {
        let mut spans = Vec::new();
        for (slot, letter) in target.letters.iter().enumerate() {
            let style = if self.session.is_slot_used(slot) {
                Style::default().fg(colors.tile_used())
            } else {
                Style::default().fg(colors.tile()).add_modifier(Modifier::BOLD)
            };
            spans.push(Span::styled(
                format!("[{}]", letter.to_uppercase()),
                style,
            ));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }

    fn input_line(&self, target: &Target, colors: &ThemeColors) -> Line<'a> {
        let color = match self.session.phase() {
            Phase::Mismatched => colors.mismatch(),
            Phase::Solved => colors.word_solved(),
            _ => colors.input(),
        };
        let text = input_cells(&self.session.input(), target);
        Line::from(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
    }
}

/// Typed letters padded with `_` to the target length. Author input gets a
/// gap at each name-part boundary.
pub fn input_cells(input: &str, target: &Target) -> String {
    let typed: Vec<char> = input.chars().flat_map(char::to_uppercase).collect();
    let mut cells = (0..target.comparison_len()).map(|i| typed.get(i).copied().unwrap_or('_'));

    let groups = if target.word_structure.is_empty() {
        vec![target.comparison_len()]
    } else {
        target.word_structure.clone()
    };

    groups
        .iter()
        .map(|&len| {
            (&mut cells)
                .take(len)
                .map(String::from)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("   ")
}

impl Widget for QuoteBoard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = format!(" {} ", self.session.date().format("%A, %B %-d, %Y"));
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(4),
                Constraint::Length(2),
                Constraint::Length(2),
            ])
            .split(inner);

        let quote = Paragraph::new(vec![
            Line::default(),
            self.quote_line(colors),
            Line::default(),
            self.author_line(colors),
        ])
        .wrap(Wrap { trim: false });
        quote.render(layout[0], buf);

        if self.session.is_complete() {
            let done = Paragraph::new(Line::from(Span::styled(
                "Puzzle complete!",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )));
            done.render(layout[1], buf);
            return;
        }

        if let Some(target) = self.session.active() {
            Paragraph::new(self.tiles_line(target, colors)).render(layout[1], buf);
            Paragraph::new(self.input_line(target, colors)).render(layout[2], buf);
        }
    }
}
