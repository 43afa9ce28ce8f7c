use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Cell, Outcome, Snapshot};
use crate::input::CONTROL_LABELS;
use crate::metrics::GameMetrics;

/// Body colour per player, wrapping for larger games
const SNAKE_COLORS: [Color; 4] = [Color::Green, Color::Yellow, Color::Magenta, Color::Cyan];

/// Draws a [`Snapshot`]; never touches live engine state
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(snapshot, metrics);
        frame.render_widget(stats, chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match &snapshot.outcome {
            None => frame.render_widget(self.render_grid(snapshot), game_area),
            Some(outcome) => frame.render_widget(self.render_game_over(outcome), game_area),
        }

        let controls = self.render_controls(metrics.wins.len());
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let lines: Vec<Line> = snapshot
            .rows()
            .map(|row| Line::from(row.iter().map(|cell| cell_span(*cell)).collect::<Vec<_>>()))
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &Snapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("Tick: ", Style::default().fg(Color::Yellow)),
            Span::styled(snapshot.tick.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ];

        if metrics.wins.len() > 1 {
            for (player, wins) in metrics.wins.iter().enumerate() {
                spans.push(Span::raw("    "));
                spans.push(Span::styled(
                    format!("P{}: ", player + 1),
                    Style::default().fg(snake_color(player)),
                ));
                spans.push(Span::styled(
                    wins.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ));
            }
        } else {
            spans.push(Span::raw("    "));
            spans.push(Span::styled("Best: ", Style::default().fg(Color::Yellow)));
            spans.push(Span::styled(
                metrics.best_length.to_string(),
                Style::default().fg(Color::White),
            ));
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }

    fn render_game_over(&self, outcome: &Outcome) -> Paragraph<'_> {
        let headline = match outcome.winner {
            Some(winner) => Span::styled(
                format!("PLAYER {} WINS", winner + 1),
                Style::default()
                    .fg(snake_color(winner))
                    .add_modifier(Modifier::BOLD),
            ),
            None => Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
        };

        let mut text = vec![Line::from(""), Line::from(vec![headline]), Line::from("")];
        for (player, length) in outcome.final_lengths.iter().enumerate() {
            text.push(Line::from(vec![
                Span::styled(
                    format!("Player {} length: ", player + 1),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    length.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, players: usize) -> Paragraph<'_> {
        let mut spans = Vec::new();
        if players > 1 {
            for (player, label) in CONTROL_LABELS.iter().take(players).enumerate() {
                spans.push(Span::styled(*label, Style::default().fg(snake_color(player))));
                spans.push(Span::raw(format!(" P{} | ", player + 1)));
            }
        } else {
            spans.push(Span::styled(CONTROL_LABELS[0], Style::default().fg(Color::Cyan)));
            spans.push(Span::raw(" or "));
            spans.push(Span::styled(CONTROL_LABELS[1], Style::default().fg(Color::Cyan)));
            spans.push(Span::raw(" to move | "));
        }
        spans.push(Span::styled("Q", Style::default().fg(Color::Red)));
        spans.push(Span::raw(" to quit"));

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }
}

fn snake_color(player: usize) -> Color {
    SNAKE_COLORS[player % SNAKE_COLORS.len()]
}

fn cell_span(cell: Cell) -> Span<'static> {
    match cell {
        Cell::Snake(player) => Span::styled(
            "■ ",
            Style::default()
                .fg(snake_color(player))
                .add_modifier(Modifier::BOLD),
        ),
        Cell::Food => Span::styled(
            "O ",
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Cell::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
