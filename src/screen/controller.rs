use anyhow::{Context, Result};
use ratatui::layout::Rect;
use tracing::{debug, info};

use crate::config::ExpoConfig;
use crate::game::{GameEngine, GameState, TickOutcome};
use crate::input::{InputMode, UiEvent};
use crate::members::{MemberRecord, MemberStore};
use crate::metrics::PlayStats;

use super::form::{Field, RegistrationForm};
use super::layout::{Button, RegistrationLayout};

/// Which screen the kiosk is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Registration,
    Playing,
    Leaderboard,
}

/// The player at the kiosk between login and game over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub display_name: String,
    pub email_local_part: String,
}

/// Top-level screen state machine
///
/// Owns the session, the registration form and the current round, and is the
/// only thing that talks to both the member store and the snake engine.
pub struct ScreenController {
    config: ExpoConfig,
    store: MemberStore,
    engine: GameEngine,
    game: GameState,
    screen: Screen,
    session: Option<Session>,
    form: RegistrationForm,
    viewport: Rect,
    stats: PlayStats,
}

impl ScreenController {
    pub fn new(config: ExpoConfig, store: MemberStore) -> Self {
        let engine = GameEngine::new(config.game.clone());
        Self::with_engine(config, store, engine)
    }

    pub fn with_engine(config: ExpoConfig, store: MemberStore, mut engine: GameEngine) -> Self {
        let game = engine.reset();
        let form = RegistrationForm::new(config.max_field_len);

        Self {
            config,
            store,
            engine,
            game,
            screen: Screen::Registration,
            session: None,
            form,
            viewport: Rect::default(),
            stats: PlayStats::new(),
        }
    }

    /// Terminal area the registration layout is computed for
    pub fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
    }

    pub fn input_mode(&self) -> InputMode {
        match self.screen {
            Screen::Registration => InputMode::Typing,
            Screen::Playing | Screen::Leaderboard => InputMode::Steering,
        }
    }

    /// Route one input event to the active screen
    ///
    /// Errors are member-store failures and are not recoverable.
    pub fn handle(&mut self, event: UiEvent) -> Result<()> {
        match self.screen {
            Screen::Registration => self.handle_registration(event),
            Screen::Playing => self.handle_playing(event),
            Screen::Leaderboard => {
                if matches!(event, UiEvent::AnyKey | UiEvent::Steer(_) | UiEvent::Click { .. }) {
                    self.screen = Screen::Registration;
                }
                Ok(())
            }
        }
    }

    /// Per-frame work: one simulation tick while a round is on screen
    pub fn on_frame(&mut self) -> Option<TickOutcome> {
        self.stats.update();
        if self.screen != Screen::Playing || self.game.is_game_over() {
            return None;
        }

        let outcome = self.engine.tick(&mut self.game);
        if outcome.terminated {
            self.stats.on_round_over(self.game.score);
            info!(
                score = self.game.score,
                steps = self.game.steps,
                collision = ?outcome.collision,
                "round over"
            );
        }
        Some(outcome)
    }

    fn handle_registration(&mut self, event: UiEvent) -> Result<()> {
        match event {
            UiEvent::Click { column, row } => {
                let layout = self.layout();
                self.form.set_focus(layout.field_at(column, row));
                match layout.button_at(column, row) {
                    Some(Button::Register) => self.register()?,
                    Some(Button::QuickLogin) => self.quick_login()?,
                    Some(Button::Leaderboard) => self.screen = Screen::Leaderboard,
                    None => {}
                }
            }
            UiEvent::Text(c) => self.form.push_char(c),
            UiEvent::Backspace => self.form.backspace(),
            UiEvent::NextField => self.form.focus_next(),
            UiEvent::PrevField => self.form.focus_prev(),
            UiEvent::Submit => match self.form.focus() {
                Some(Field::QuickLogin) => self.quick_login()?,
                _ => self.register()?,
            },
            _ => {}
        }
        Ok(())
    }

    fn handle_playing(&mut self, event: UiEvent) -> Result<()> {
        match event {
            UiEvent::Steer(direction) => {
                self.game.enqueue_move(direction);
            }
            UiEvent::Click { .. } if self.game.is_game_over() => self.finish_round()?,
            _ => {}
        }
        Ok(())
    }

    fn register(&mut self) -> Result<()> {
        let first_name = self.form.trimmed(Field::FirstName).to_string();
        let last_name = self.form.trimmed(Field::LastName).to_string();
        let email = self.form.trimmed(Field::Email).to_string();

        if first_name.is_empty() || last_name.is_empty() || email.is_empty() {
            debug!("registration form incomplete");
            return Ok(());
        }

        let display_name = self
            .store
            .upsert(&email, &first_name, &last_name, 0)
            .context("Failed to register member")?;
        self.start_round(Session {
            display_name,
            email_local_part: email,
        });
        Ok(())
    }

    fn quick_login(&mut self) -> Result<()> {
        let email = self.form.trimmed(Field::QuickLogin).to_string();
        if email.is_empty() {
            return Ok(());
        }

        let Some(member) = self.store.lookup(&email).cloned() else {
            debug!(%email, "quick login for unknown member ignored");
            return Ok(());
        };

        // Touch the record so last-played reflects this visit
        self.store
            .upsert(&email, &member.first_name, &member.last_name, member.best_score)
            .context("Failed to refresh member")?;
        self.start_round(Session {
            display_name: member.display_name(),
            email_local_part: email,
        });
        Ok(())
    }

    fn start_round(&mut self, session: Session) {
        info!(player = %session.display_name, "round started");
        self.game = self.engine.reset();
        self.stats.on_round_start();
        self.session = Some(session);
        self.screen = Screen::Playing;
    }

    fn finish_round(&mut self) -> Result<()> {
        let score = self.game.score;

        if let Some(session) = self.session.take() {
            if let Some(member) = self.store.lookup(&session.email_local_part).cloned() {
                self.store
                    .upsert(
                        &session.email_local_part,
                        &member.first_name,
                        &member.last_name,
                        score.max(member.best_score),
                    )
                    .context("Failed to record final score")?;
            }
        }

        self.form.clear();
        self.game = self.engine.reset();
        self.screen = Screen::Registration;
        Ok(())
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn stats(&self) -> &PlayStats {
        &self.stats
    }

    pub fn config(&self) -> &ExpoConfig {
        &self.config
    }

    pub fn store(&self) -> &MemberStore {
        &self.store
    }

    pub fn layout(&self) -> RegistrationLayout {
        RegistrationLayout::compute(self.viewport)
    }

    pub fn leaderboard(&self) -> Vec<&MemberRecord> {
        self.store.leaderboard(self.config.leaderboard_limit)
    }

    /// Active player's best, counting the round in progress
    pub fn player_best(&self) -> u32 {
        let stored = self
            .session
            .as_ref()
            .and_then(|s| self.store.lookup(&s.email_local_part))
            .map(|m| m.best_score)
            .unwrap_or(0);
        stored.max(self.game.score)
    }

    /// Best score on record anywhere, counting the round in progress
    pub fn all_time_best(&self) -> u32 {
        self.store.top_score().max(self.game.score)
    }
}
