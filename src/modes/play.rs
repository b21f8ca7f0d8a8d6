use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{info, warn};
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

use crate::game::{Command, GameConfig, GameController, Phase};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::{GameMetrics, format_duration};
use crate::render::Renderer;

/// Interactive session: one terminal, any number of rounds
pub struct PlayMode {
    controller: GameController<StdRng>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    tick_interval: Duration,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(
        config: GameConfig,
        input_handler: InputHandler,
        rng: StdRng,
        tick_interval: Duration,
    ) -> Self {
        Self {
            controller: GameController::new(config, rng),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler,
            tick_interval,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.tick_interval);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event)?,
                        Some(Err(err)) => warn!("terminal event error: {err}"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let scene = self.controller.scene();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &scene, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!("quit requested");
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }
            self.handle_key(key)?;
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let action = self.input_handler.handle_key_event(key);

        if action == KeyAction::Quit {
            self.should_quit = true;
            return Ok(());
        }

        // Between rounds any other key starts the next one
        if !self.controller.is_running() {
            self.controller
                .apply(Command::Start)
                .context("Failed to start a round")?;
            self.metrics.on_round_start(self.controller.config().players.len());
            return Ok(());
        }

        if let KeyAction::Steer(commands) = action {
            for command in commands {
                self.controller.apply(command)?;
            }
        }

        Ok(())
    }

    fn update_game(&mut self) {
        let Some(report) = self.controller.tick() else {
            return;
        };

        for (player, cause) in report.eliminations() {
            self.metrics.on_eliminated(player);
            info!(
                "player {} out ({:?}) after {}",
                player,
                cause,
                format_duration(self.metrics.survival_time(player))
            );
        }

        // Track round over
        if let Phase::Finished(_) = self.controller.phase() {
            let best = self
                .controller
                .round()
                .and_then(|round| round.snakes.iter().map(|snake| snake.score).max())
                .unwrap_or(0);
            self.metrics.on_round_over(best);
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
