use std::collections::HashMap;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{self, Scene};
use crate::metrics::{GameMetrics, format_duration};

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, scene: &Scene, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Scores
                Constraint::Min(0),    // Arena
                Constraint::Length(3), // Status line
            ])
            .split(frame.area());

        let scores = self.render_scores(chunks[0], scene, metrics);
        frame.render_widget(scores, chunks[0]);

        // Center the arena horizontally, two terminal columns per cell
        let arena_width = (scene.columns.max(0) as u16).saturating_mul(2).saturating_add(2);
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(arena_width),
                Constraint::Min(0),
            ])
            .split(chunks[1])[1];

        // Nothing to draw before the first round
        if scene.scores.is_empty() {
            let prompt = self.render_prompt(game_area, scene);
            frame.render_widget(prompt, game_area);
        } else {
            let arena = self.render_arena(game_area, scene);
            frame.render_widget(arena, game_area);
        }

        let status = self.render_status(chunks[2], scene);
        frame.render_widget(status, chunks[2]);
    }

    fn render_arena(&self, _area: Rect, scene: &Scene) -> Paragraph<'_> {
        let field_size = scene.field_size.max(1);
        let mut colors: HashMap<(i32, i32), game::Color> = HashMap::new();

        // later layers win: obstacles, then food, then snakes
        for tile in scene.obstacles.iter().chain(&scene.food).chain(&scene.snakes) {
            colors.insert((tile.cell.x / field_size, tile.cell.y / field_size), tile.color);
        }

        let background = tui_color(scene.background);
        let mut lines = Vec::with_capacity(scene.rows.max(0) as usize);
        for row in 0..scene.rows {
            let spans: Vec<Span> = (0..scene.columns)
                .map(|column| {
                    let bg = colors
                        .get(&(column, row))
                        .map_or(background, |color| tui_color(*color));
                    Span::styled("  ", Style::default().bg(bg))
                })
                .collect();
            lines.push(Line::from(spans));
        }

        let border_color = if scene.running {
            Color::White
        } else {
            Color::Red
        };

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(border_color))
                .title(" MultiSnake "),
        )
    }

    fn render_scores(&self, _area: Rect, scene: &Scene, metrics: &GameMetrics) -> Paragraph<'_> {
        let mut spans = Vec::new();

        for (player, line) in scene.scores.iter().enumerate() {
            let mut style = Style::default()
                .fg(tui_color(line.color))
                .add_modifier(Modifier::BOLD);
            if !line.alive {
                style = style.add_modifier(Modifier::CROSSED_OUT);
            }
            spans.push(Span::styled(format!("{} {}", line.name, line.score), style));
            spans.push(Span::styled(
                format!(" {}", format_duration(metrics.survival_time(player))),
                Style::default().fg(Color::DarkGray),
            ));
            spans.push(Span::raw("    "));
        }

        spans.push(Span::styled("Time: ", Style::default().fg(Color::Yellow)));
        spans.push(Span::styled(metrics.format_time(), Style::default().fg(Color::White)));
        spans.push(Span::raw("    "));
        spans.push(Span::styled("Best: ", Style::default().fg(Color::Yellow)));
        spans.push(Span::styled(
            metrics.high_score.to_string(),
            Style::default().fg(Color::White),
        ));

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_prompt(&self, _area: Rect, scene: &Scene) -> Paragraph<'_> {
        let message = scene.message.clone().unwrap_or_default();
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "MULTISNAKE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![Span::styled(
                message,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_status(&self, _area: Rect, scene: &Scene) -> Paragraph<'_> {
        let line = match (&scene.message, scene.running) {
            (Some(message), false) if !scene.scores.is_empty() => Line::from(vec![
                Span::styled(
                    message.clone(),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    " | press a key to play again, ",
                    Style::default().fg(Color::Gray),
                ),
                Span::styled("Esc", Style::default().fg(Color::Red)),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
            _ => Line::from(vec![
                Span::styled("Player keys", Style::default().fg(Color::Cyan)),
                Span::raw(" to steer | "),
                Span::styled("Esc", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
        };

        Paragraph::new(line).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn tui_color(color: game::Color) -> Color {
    Color::Rgb(color.r(), color.g(), color.b())
}
