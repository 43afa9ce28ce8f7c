use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, interval, interval_at};

use crate::game::{GameConfig, GameEngine, InboxSender, Snapshot};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Interactive terminal game
///
/// Key presses only ever reach the engine through its inbox; the engine
/// itself is touched solely by the tick timer branch of the loop.
pub struct HumanMode {
    config: GameConfig,
    engine: GameEngine,
    inbox: InboxSender,
    snapshot: Snapshot,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    restarted: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let engine = GameEngine::new(config.clone()).context("Failed to start game")?;
        let inbox = engine.inbox();
        let snapshot = engine.snapshot();

        Ok(Self {
            metrics: GameMetrics::new(config.players),
            input_handler: InputHandler::new(config.players),
            config,
            engine,
            inbox,
            snapshot,
            renderer: Renderer::new(),
            should_quit: false,
            restarted: false,
        })
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

        // First tick waits for the start delay so players can orient
        let tick_interval = self.config.tick_interval();
        let mut tick_timer = interval_at(Instant::now() + self.config.start_delay(), tick_interval);

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.snapshot, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if std::mem::take(&mut self.restarted) {
                tick_timer.reset_at(Instant::now() + self.config.start_delay());
            }

            if self.should_quit {
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

            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer { player, direction } => {
                    self.inbox.post(player, direction);
                }
                KeyAction::Restart => {
                    self.reset_game()?;
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn update_game(&mut self) {
        if self.engine.is_terminated() {
            return;
        }

        self.snapshot = self.engine.tick();

        if let Some(outcome) = &self.snapshot.outcome {
            self.metrics.on_game_over(outcome);
        }
    }

    /// Start a fresh game; a finished engine cannot be resumed
    fn reset_game(&mut self) -> Result<()> {
        self.engine = GameEngine::new(self.config.clone()).context("Failed to restart game")?;
        self.inbox = self.engine.inbox();
        self.snapshot = self.engine.snapshot();
        self.metrics.on_game_start();
        self.restarted = true;
        Ok(())
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
