//! Application core — event loop, action dispatch, controller wiring.

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use chainpulse_core::{RefreshController, Selection, SimulatedSource};

use crate::action::Action;
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::dashboard::DashboardScreen;
use crate::tui::Tui;

/// Top-level application state and event loop.
pub struct App {
    /// The single dashboard screen.
    screen: DashboardScreen,
    /// Whether the app should keep running.
    running: bool,
    /// Action sender — components can dispatch actions through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver — main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// The refresh controller driving all data.
    controller: RefreshController<SimulatedSource>,
    /// Cancellation token for the data bridge task.
    bridge_cancel: CancellationToken,
}

impl App {
    pub fn new(controller: RefreshController<SimulatedSource>, initial: Selection) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            screen: DashboardScreen::new(initial),
            running: true,
            action_tx,
            action_rx,
            controller,
            bridge_cancel: CancellationToken::new(),
        }
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.screen.init(self.action_tx.clone())?;

        // First fetch + periodic refresh, then bridge the watch channels
        // into the action loop.
        self.controller.start();
        {
            let controller = self.controller.clone();
            let tx = self.action_tx.clone();
            let cancel = self.bridge_cancel.clone();
            tokio::spawn(async move {
                crate::data_bridge::run_data_bridge(controller, tx, cancel).await;
            });
        }

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event → action(s)
            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // 3. Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| {
                        let area = frame.area();
                        self.screen.render(frame, area);
                    })?;
                }
            }
        }

        // Tear down: bridge first, then the controller's background tasks.
        self.bridge_cancel.cancel();
        self.controller.shutdown().await;
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// everything else is delegated to the dashboard screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => Ok(Some(Action::Quit)),
            _ => self.screen.handle_key_event(key),
        }
    }

    /// Process a single action — app-level intents go to the controller,
    /// everything is forwarded to the screen.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }
            Action::SelectNetwork(network) => {
                self.controller.select_network(*network);
            }
            Action::SelectTimeframe(timeframe) => {
                self.controller.select_timeframe(*timeframe);
            }
            Action::Retry => {
                self.controller.retry();
            }
            _ => {}
        }

        // The screen sees every action (state updates, ticks, cycling).
        if let Some(follow_up) = self.screen.update(action)? {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }
}
