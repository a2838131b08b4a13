use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{GameState, Position};
use crate::screen::{Button, Field, Screen, ScreenController};

const INSTRUCTIONS: [&str; 4] = [
    "New members: fill out all fields and click 'Play Game!'",
    "Returning members: enter your email and click 'Quick Login'",
    "Use WASD or arrow keys to control the snake",
    "Tab moves between fields, Enter submits",
];

/// Draws whichever screen the controller is on; holds no state of its own
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, ctl: &ScreenController) {
        match ctl.screen() {
            Screen::Registration => self.render_registration(frame, ctl),
            Screen::Playing => self.render_game(frame, ctl),
            Screen::Leaderboard => self.render_leaderboard(frame, ctl),
        }
    }

    fn render_registration(&self, frame: &mut Frame, ctl: &ScreenController) {
        let layout = ctl.layout();
        let config = ctl.config();

        let title = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                config.title.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                config.subtitle.clone(),
                Style::default().fg(Color::Blue),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(title, layout.title);

        let domain = format!("Only enter the part before @{}", config.email_domain);
        self.render_header(frame, layout.new_member_header, "New Member Registration:");
        self.render_header(frame, layout.returning_header, "Returning Member:");
        self.render_header(frame, layout.scores_header, "View Scores:");

        for (field, area) in layout.fields() {
            let input = self.render_field(ctl, field);
            frame.render_widget(input, area);
        }
        for (button, area) in layout.buttons() {
            frame.render_widget(self.render_button(button), area);
        }

        frame.render_widget(self.render_instructions(&domain), layout.instructions);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, text: &'static str) {
        let header = Paragraph::new(Line::from(Span::styled(
            format!("  {}", text),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(header, area);
    }

    fn render_field<'a>(&self, ctl: &'a ScreenController, field: Field) -> Paragraph<'a> {
        let focused = ctl.form().focus() == Some(field);
        let input = ctl.form().field(field);

        let content = if input.is_empty() {
            Span::styled(field.placeholder(), Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(input.text(), Style::default().fg(Color::White))
        };

        let (border_type, border_color) = if focused {
            (BorderType::Thick, Color::Blue)
        } else {
            (BorderType::Plain, Color::Gray)
        };

        Paragraph::new(Line::from(content)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(border_type)
                .border_style(Style::default().fg(border_color)),
        )
    }

    fn render_button(&self, button: Button) -> Paragraph<'static> {
        let color = match button {
            Button::Register => Color::Green,
            Button::QuickLogin => Color::Blue,
            Button::Leaderboard => Color::Gray,
        };

        Paragraph::new(Line::from(Span::styled(
            button.label(),
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_instructions(&self, domain: &str) -> Paragraph<'static> {
        let mut lines = vec![Line::from(Span::styled(
            "Instructions:",
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        lines.extend(
            INSTRUCTIONS
                .iter()
                .map(|text| Line::from(format!("  • {}", text))),
        );
        lines.push(Line::from(format!("  • {}", domain)));

        Paragraph::new(lines).block(Block::default().borders(Borders::TOP))
    }

    fn render_game(&self, frame: &mut Frame, ctl: &ScreenController) {
        let state = ctl.game();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Player and score
                Constraint::Min(0),    // Grid
                Constraint::Length(2), // Bests and controls
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(ctl), chunks[0]);

        let grid_area = centered(
            chunks[1],
            framed_extent(state.grid_width, 2),
            framed_extent(state.grid_height, 1),
        );
        frame.render_widget(self.render_grid(state), grid_area);

        if state.is_game_over() {
            let popup = centered(chunks[1], 36, 9);
            frame.render_widget(Clear, popup);
            frame.render_widget(self.render_game_over(state), popup);
        }

        frame.render_widget(self.render_footer(ctl), chunks[2]);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let mut lines = Vec::with_capacity(state.grid_height);

        for y in 0..state.grid_height {
            let mut spans = Vec::with_capacity(state.grid_width);

            for x in 0..state.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == state.snake.head() {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.occupies(pos) {
                    Span::styled("□ ", Style::default().fg(Color::LightGreen))
                } else if state.food == Some(pos) {
                    Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, ctl: &ScreenController) -> Paragraph<'static> {
        let player = ctl
            .session()
            .map(|s| s.display_name.clone())
            .unwrap_or_default();

        let text = vec![Line::from(vec![
            Span::styled("Player: ", Style::default().fg(Color::Yellow)),
            Span::styled(player, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                ctl.game().score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::raw(ctl.stats().format_round_time()),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_footer(&self, ctl: &ScreenController) -> Paragraph<'static> {
        let text = vec![
            Line::from(vec![
                Span::styled("Your Best: ", Style::default().fg(Color::Yellow)),
                Span::raw(ctl.player_best().to_string()),
                Span::raw("   |   "),
                Span::styled("All-Time Best: ", Style::default().fg(Color::Yellow)),
                Span::raw(ctl.all_time_best().to_string()),
                Span::raw("   |   "),
                Span::styled("Kiosk Best: ", Style::default().fg(Color::Yellow)),
                Span::raw(ctl.stats().kiosk_high_score.to_string()),
                Span::raw("   |   "),
                Span::styled("Games Today: ", Style::default().fg(Color::Yellow)),
                Span::raw(ctl.stats().games_played.to_string()),
            ]),
            Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move"),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Your Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                " Click to Continue ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Thick)
                .border_style(Style::default().fg(Color::White)),
        )
    }

    fn render_leaderboard(&self, frame: &mut Frame, ctl: &ScreenController) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Title
                Constraint::Min(0),    // Rows
                Constraint::Length(2), // Hint
            ])
            .split(frame.area());

        let title = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Leaderboard",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(title, chunks[0]);

        let rows = leaderboard_lines(ctl);
        frame.render_widget(Paragraph::new(rows).alignment(Alignment::Center), chunks[1]);

        let hint = Paragraph::new(Line::from(Span::styled(
            "Press any key or click to return",
            Style::default().fg(Color::Gray),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(hint, chunks[2]);
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn leaderboard_lines(ctl: &ScreenController) -> Vec<Line<'static>> {
    let entries = ctl.leaderboard();
    if entries.is_empty() {
        return vec![
            Line::from(""),
            Line::from(Span::styled(
                "No players yet! Be the first to play!",
                Style::default().fg(Color::Gray),
            )),
        ];
    }

    entries
        .iter()
        .enumerate()
        .flat_map(|(rank, member)| {
            let unit = if member.best_score == 1 { "point" } else { "points" };
            [
                Line::from(format!(
                    "{}. {} - {} {}",
                    rank + 1,
                    member.display_name(),
                    member.best_score,
                    unit
                )),
                Line::from(""),
            ]
        })
        .collect()
}

/// Terminal cells needed for `cells` grid cells of `cell_width` plus the border
fn framed_extent(cells: usize, cell_width: u16) -> u16 {
    u16::try_from(cells)
        .unwrap_or(u16::MAX)
        .saturating_mul(cell_width)
        .saturating_add(2)
}

/// `width` x `height` rect centred in `area`, clipped to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
