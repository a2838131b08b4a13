use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use tokio::time::interval;
use tracing::info;

use crate::config::ExpoConfig;
use crate::input::{InputHandler, UiEvent};
use crate::members::MemberStore;
use crate::render::Renderer;
use crate::screen::ScreenController;

/// Full-screen kiosk: registration, play and leaderboard until Ctrl+C
pub struct KioskMode {
    controller: ScreenController,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl KioskMode {
    pub fn new(config: ExpoConfig, store: MemberStore) -> Self {
        Self::with_controller(ScreenController::new(config, store))
    }

    pub fn with_controller(controller: ScreenController) -> Self {
        Self {
            controller,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        info!("kiosk started");
        let result = self.run_frame_loop(&mut terminal).await;

        // Teardown runs even when the loop failed
        self.cleanup_terminal(&mut terminal)?;
        info!("kiosk stopped");

        result
    }

    async fn run_frame_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // One clock for both the simulation and the redraw
        let mut frame_timer = interval(self.controller.config().frame_interval());

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event)?,
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                _ = frame_timer.tick() => {
                    self.controller.on_frame();
                    terminal.draw(|frame| {
                        self.controller.set_viewport(frame.area());
                        self.renderer.render(frame, &self.controller);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        // Only process key press events, not release
        if let Event::Key(key) = &event {
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }
        }

        match self
            .input_handler
            .handle_event(&event, self.controller.input_mode())
        {
            UiEvent::Quit => self.should_quit = true,
            UiEvent::None => {}
            ui_event => self.controller.handle(ui_event)?,
        }

        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::{Field, Screen};
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};
    use tempfile::TempDir;

    fn kiosk(dir: &TempDir) -> KioskMode {
        let config = ExpoConfig {
            members_path: dir.path().join("member_info.csv"),
            ..ExpoConfig::default()
        };
        let store = MemberStore::open(&config.members_path, &config.email_domain).unwrap();
        KioskMode::new(config, store)
    }

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_kiosk_opens_on_registration() {
        let dir = TempDir::new().unwrap();
        let mode = kiosk(&dir);
        assert_eq!(mode.controller.screen(), Screen::Registration);
        assert!(!mode.should_quit);
    }

    #[test]
    fn test_ctrl_c_key_quits() {
        let dir = TempDir::new().unwrap();
        let mut mode = kiosk(&dir);

        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        mode.handle_event(ctrl_c).unwrap();
        assert!(mode.should_quit);
    }

    #[test]
    fn test_typing_reaches_the_form_and_releases_are_ignored() {
        let dir = TempDir::new().unwrap();
        let mut mode = kiosk(&dir);

        mode.handle_event(key(KeyCode::Tab, KeyEventKind::Press)).unwrap();
        mode.handle_event(key(KeyCode::Char('j'), KeyEventKind::Press)).unwrap();
        mode.handle_event(key(KeyCode::Char('k'), KeyEventKind::Release)).unwrap();

        assert_eq!(mode.controller.form().field(Field::FirstName).text(), "j");
    }
}
