use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::Frame;

use crate::api::{FetchError, FetchObserver, JokeService};
use crate::config::AppConfig;
use crate::internal::audio::AudioRegistry;
use crate::internal::models::JokeCollection;
use crate::internal::notification::Notification;
use crate::internal::screen::{Effect, FetchTicket, Screen};
use crate::internal::ui::keybindings::{KeyBindingContext, KeyBindingMap};
use crate::internal::ui::keybindings_default::create_default_keybindings;
use crate::utils::theme::Palette;

/// Actions/messages sent through the app action channel.
///
/// Only user-facing variants can appear in config; the rest are produced
/// at runtime by background tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Quit,
    RequestJoke,
    RevealBonus,
    DismissBonus,
    DismissError,
    ToggleSound,
    #[serde(skip)]
    FetchStarted,
    #[serde(skip)]
    FetchEnded,
    #[serde(skip)]
    JokesFetched(FetchTicket, JokeCollection),
}

impl Action {
    /// Whether the action may be bound to a key.
    pub fn is_bindable(&self) -> bool {
        matches!(
            self,
            Action::Quit
                | Action::RequestJoke
                | Action::RevealBonus
                | Action::DismissBonus
                | Action::DismissError
                | Action::ToggleSound
        )
    }
}

/// Forwards fetch lifecycle signals into the action channel.
struct ChannelObserver {
    tx: UnboundedSender<Action>,
}

impl FetchObserver for ChannelObserver {
    fn loading_started(&self) {
        let _ = self.tx.send(Action::FetchStarted);
    }

    fn loading_ended(&self) {
        let _ = self.tx.send(Action::FetchEnded);
    }

    fn failed(&self, error: &FetchError) {
        tracing::warn!("Joke fetch degraded to empty result: {}", error);
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub app_version: String,
    pub screen: Screen,
    pub config: AppConfig,
    pub palette: Palette,
    pub api_service: Arc<JokeService>,
    pub audio: Arc<AudioRegistry>,
    pub keybindings: KeyBindingMap,
    pub notification: Option<Notification>,
    pub spinner_state: usize,
    pub last_spinner_update: Option<Instant>,
    /// Set between the fetcher's start and end signals.
    pub fetch_started_at: Option<Instant>,
    pub action_tx: UnboundedSender<Action>,
    pub action_rx: UnboundedReceiver<Action>,
}

impl App {
    #[tracing::instrument(skip_all)]
    pub fn new(config: AppConfig, audio: Arc<AudioRegistry>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let api_service = Arc::new(JokeService::new(&config.api));

        let mut keybindings = create_default_keybindings();
        keybindings.merge_config(&config.keybindings);

        tracing::info!(
            "App config: base_url='{}', sound_enabled={}, backend={}",
            config.api.base_url,
            config.sound.enabled,
            config.sound.backend
        );

        let notification = match config.api.api_key.is_empty() {
            true => Some(Notification::warning("No API key configured (set API_KEY)")),
            false => None,
        };

        Self {
            running: true,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            screen: Screen::new(config.sound.enabled),
            palette: Palette::from_config(&config.theme),
            config,
            api_service,
            audio,
            keybindings,
            notification,
            spinner_state: 0,
            last_spinner_update: None,
            fetch_started_at: None,
            action_tx,
            action_rx,
        }
    }

    pub async fn run(&mut self, mut tui: crate::tui::Tui) -> Result<()> {
        // Load cues before the first frame so the first laugh is not delayed.
        self.audio.init();

        let mut event_interval = tokio::time::interval(std::time::Duration::from_millis(16));

        loop {
            self.tick_spinner(Instant::now());

            if let Some(notification) = &self.notification
                && notification.should_dismiss()
            {
                self.notification = None;
            }

            tui.draw(|f| self.ui(f))?;

            tokio::select! {
                _ = event_interval.tick() => {
                    if event::poll(std::time::Duration::from_millis(0))?
                        && let Event::Key(key) = event::read()?
                            && key.kind == KeyEventKind::Press {
                                self.handle_key_event(key);
                            }
                }
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action);
                }
            }

            if !self.running {
                break;
            }
        }
        Ok(())
    }

    fn tick_spinner(&mut self, now: Instant) {
        match self.last_spinner_update {
            Some(last_update) if now.duration_since(last_update).as_millis() >= 100 => {
                self.spinner_state = self.spinner_state.wrapping_add(1);
                self.last_spinner_update = Some(now);
            }
            Some(_) => {}
            None => self.last_spinner_update = Some(now),
        }
    }

    pub fn key_context(&self) -> KeyBindingContext {
        match self.screen.is_modal_open() {
            true => KeyBindingContext::Modal,
            false => KeyBindingContext::Global,
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if let Some(action) = self.keybindings.get_action(&key, self.key_context()) {
            self.handle_action(action);
        }
    }

    #[tracing::instrument(skip(self), fields(state = self.screen.state().name()))]
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::RequestJoke => {
                let effects = self.screen.request_joke();
                self.run_effects(effects);
            }
            Action::RevealBonus => {
                let effects = self.screen.reveal_bonus();
                self.run_effects(effects);
            }
            Action::DismissBonus => self.screen.dismiss_bonus(),
            Action::DismissError => self.screen.dismiss_error(),
            Action::ToggleSound => {
                // The toggle control is hidden behind the overlay.
                if self.screen.is_modal_open() {
                    return;
                }
                let sound_on = self.screen.toggle_sound();
                tracing::info!(sound_on, "Sound preference changed");
                self.notification = Some(Notification::info(match sound_on {
                    true => "Sound on",
                    false => "Sound off",
                }));
            }
            Action::FetchStarted => {
                self.fetch_started_at = Some(Instant::now());
            }
            Action::FetchEnded => {
                if let Some(started) = self.fetch_started_at.take() {
                    tracing::info!(elapsed = ?started.elapsed(), "Joke fetch finished");
                }
            }
            Action::JokesFetched(ticket, jokes) => {
                let effects = self.screen.fetch_resolved(ticket, jokes);
                self.run_effects(effects);
            }
        }
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Fetch(ticket) => self.spawn_fetch(ticket),
                Effect::PlayCue(cue) => self.audio.play(cue),
            }
        }
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let api = self.api_service.clone();
        let tx = self.action_tx.clone();

        tracing::debug!(ticket = ticket.id(), "Spawning joke fetch");
        tokio::spawn(async move {
            let observer = ChannelObserver { tx: tx.clone() };
            let jokes = api.fetch_random_joke(&observer).await;
            let _ = tx.send(Action::JokesFetched(ticket, jokes));
        });
    }

    pub fn get_spinner_char(&self) -> &'static str {
        const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
        SPINNER_FRAMES[self.spinner_state % SPINNER_FRAMES.len()]
    }

    pub fn ui(&mut self, f: &mut Frame) {
        super::view::draw(self, f);
    }
}
