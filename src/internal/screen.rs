//! The joke screen as a single state machine.
//!
//! Every user action goes through a transition method that mutates the
//! screen and returns the side effects the caller must run (start a fetch,
//! play a cue). Nothing here performs I/O, so the whole screen can be driven
//! from tests without a network or an audio device.

use crate::internal::audio::Cue;
use crate::internal::models::JokeCollection;

pub const REVEAL_MESSAGE: &str = "Made you look! 😂";
pub const BONUS_LABEL: &str = "Press me for a bonus joke!";
pub const ERROR_TITLE: &str = "Error";

/// Identifies one fetch. Results carrying any other ticket are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScreenState {
    /// No joke requested since the screen opened or the error was dismissed.
    #[default]
    Idle,
    Loading(FetchTicket),
    /// Always non-empty.
    Loaded(JokeCollection),
    Error,
}

impl ScreenState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ScreenState::Loading(_))
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ScreenState::Loaded(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ScreenState::Error)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScreenState::Idle => "idle",
            ScreenState::Loading(_) => "loading",
            ScreenState::Loaded(_) => "loaded",
            ScreenState::Error => "error",
        }
    }
}

/// Work requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Fetch(FetchTicket),
    PlayCue(Cue),
}

#[derive(Debug)]
pub struct Screen {
    state: ScreenState,
    modal_open: bool,
    sound_on: bool,
    has_requested: bool,
    next_ticket: u64,
}

impl Screen {
    pub fn new(sound_on: bool) -> Self {
        Self {
            state: ScreenState::Idle,
            modal_open: false,
            sound_on,
            has_requested: false,
            next_ticket: 0,
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn is_sound_on(&self) -> bool {
        self.sound_on
    }

    /// The ticket of the fetch currently in flight, if any.
    pub fn pending_ticket(&self) -> Option<FetchTicket> {
        match self.state {
            ScreenState::Loading(ticket) => Some(ticket),
            _ => None,
        }
    }

    /// Start a new fetch. Ignored while one is already in flight.
    pub fn request_joke(&mut self) -> Vec<Effect> {
        if self.state.is_loading() {
            tracing::debug!("request_joke ignored: fetch already in flight");
            return Vec::new();
        }

        let ticket = FetchTicket(self.next_ticket);
        self.next_ticket += 1;
        self.has_requested = true;
        self.modal_open = false;
        self.transition(ScreenState::Loading(ticket));

        vec![Effect::Fetch(ticket)]
    }

    /// Apply the outcome of the fetch identified by `ticket`.
    /// An empty collection is the fetcher's failure signal.
    pub fn fetch_resolved(&mut self, ticket: FetchTicket, jokes: JokeCollection) -> Vec<Effect> {
        if self.pending_ticket() != Some(ticket) {
            tracing::debug!(
                ticket = ticket.id(),
                state = self.state.name(),
                "Discarding stale fetch result"
            );
            return Vec::new();
        }

        if jokes.is_empty() {
            self.transition(ScreenState::Error);
            return Vec::new();
        }

        self.transition(ScreenState::Loaded(jokes));

        match self.sound_on {
            true => vec![Effect::PlayCue(Cue::Laugh)],
            false => Vec::new(),
        }
    }

    /// Open the bonus overlay. Only possible from `Loaded` with it closed.
    pub fn reveal_bonus(&mut self) -> Vec<Effect> {
        if !self.state.is_loaded() || self.modal_open {
            return Vec::new();
        }

        self.modal_open = true;
        match self.sound_on {
            true => vec![Effect::PlayCue(Cue::Trombone)],
            false => Vec::new(),
        }
    }

    pub fn dismiss_bonus(&mut self) {
        self.modal_open = false;
    }

    /// Close the error card without fetching.
    pub fn dismiss_error(&mut self) {
        if self.state.is_error() {
            self.transition(ScreenState::Idle);
        }
    }

    /// Flip the sound preference and return the new value. Affects only cues
    /// emitted after this call.
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_on = !self.sound_on;
        self.sound_on
    }

    fn transition(&mut self, next: ScreenState) {
        tracing::debug!(from = self.state.name(), to = next.name(), "screen transition");
        if !next.is_loaded() {
            self.modal_open = false;
        }
        self.state = next;
    }

    pub fn primary_label(&self) -> &'static str {
        match self.has_requested {
            true => "Press me for another dad joke!",
            false => "Press me for a dad joke!",
        }
    }

    /// The error card only exists after a request, so this reads "another"
    /// in practice, the same way the primary label does.
    pub fn error_message(&self) -> String {
        let article = match self.has_requested {
            true => "another",
            false => "a",
        };
        format!(
            "Uh oh! Doo-dun-diddly failed to fetch you {} dad joke. Please try again and text me if it still doesn't work.",
            article
        )
    }

    /// What the screen should show right now.
    pub fn view(&self) -> ScreenView {
        if self.state.is_loading() {
            return ScreenView::Spinner;
        }

        let loaded = match &self.state {
            ScreenState::Loaded(jokes) => Some(jokes),
            _ => None,
        };

        ScreenView::Content(ContentView {
            sound_toggle: (!self.modal_open).then_some(self.sound_on),
            error: self.state.is_error().then(|| ErrorBanner {
                title: ERROR_TITLE,
                message: self.error_message(),
            }),
            joke_text: loaded.map(|jokes| jokes.display_text()),
            primary_label: self.primary_label(),
            bonus_button: loaded.is_some() && !self.modal_open,
            illustration: loaded.is_some(),
            modal: (loaded.is_some() && self.modal_open).then_some(REVEAL_MESSAGE),
        })
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenView {
    /// Full-screen spinner and nothing else.
    Spinner,
    Content(ContentView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentView {
    /// Current sound preference; `None` hides the toggle.
    pub sound_toggle: Option<bool>,
    pub error: Option<ErrorBanner>,
    pub joke_text: Option<String>,
    pub primary_label: &'static str,
    pub bonus_button: bool,
    pub illustration: bool,
    pub modal: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub title: &'static str,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jokes(texts: &[&str]) -> JokeCollection {
        texts.iter().copied().collect()
    }

    fn fetch_ticket(effects: &[Effect]) -> FetchTicket {
        match effects {
            [Effect::Fetch(ticket)] => *ticket,
            other => panic!("expected a single fetch effect, got {:?}", other),
        }
    }

    fn loaded_screen() -> Screen {
        let mut screen = Screen::new(true);
        let ticket = fetch_ticket(&screen.request_joke());
        screen.fetch_resolved(ticket, jokes(&["Why did the chicken..."]));
        screen
    }

    #[test]
    fn test_starts_idle_without_fetching() {
        let screen = Screen::default();
        assert_eq!(screen.state(), &ScreenState::Idle);
        assert!(screen.is_sound_on());
        assert_eq!(screen.primary_label(), "Press me for a dad joke!");
    }

    #[test]
    fn test_request_enters_loading_before_result() {
        let mut screen = Screen::new(true);
        let effects = screen.request_joke();

        assert!(screen.state().is_loading());
        assert_eq!(screen.view(), ScreenView::Spinner);
        assert_eq!(screen.pending_ticket(), Some(fetch_ticket(&effects)));
    }

    #[test]
    fn test_request_while_loading_is_noop() {
        let mut screen = Screen::new(true);
        let first = fetch_ticket(&screen.request_joke());

        assert!(screen.request_joke().is_empty());
        assert_eq!(screen.pending_ticket(), Some(first));
    }

    #[test]
    fn test_success_loads_and_plays_laugh() {
        let mut screen = Screen::new(true);
        let ticket = fetch_ticket(&screen.request_joke());
        let effects = screen.fetch_resolved(ticket, jokes(&["Why did the chicken..."]));

        assert_eq!(effects, vec![Effect::PlayCue(Cue::Laugh)]);
        match screen.view() {
            ScreenView::Content(view) => {
                assert_eq!(view.joke_text.as_deref(), Some("Why did the chicken..."));
                assert_eq!(view.primary_label, "Press me for another dad joke!");
                assert!(view.bonus_button);
                assert!(view.illustration);
                assert!(view.error.is_none());
            }
            ScreenView::Spinner => panic!("expected content"),
        }
    }

    #[test]
    fn test_empty_result_is_error() {
        let mut screen = Screen::new(true);
        let ticket = fetch_ticket(&screen.request_joke());
        let effects = screen.fetch_resolved(ticket, JokeCollection::empty());

        assert!(effects.is_empty());
        assert!(screen.state().is_error());
        match screen.view() {
            ScreenView::Content(view) => {
                let banner = view.error.expect("error banner");
                assert_eq!(banner.title, "Error");
                assert!(banner.message.contains("fetch you another dad joke"));
                assert!(view.joke_text.is_none());
                assert!(!view.bonus_button);
            }
            ScreenView::Spinner => panic!("expected content"),
        }
    }

    #[test]
    fn test_error_hides_previous_joke_and_says_another() {
        let mut screen = loaded_screen();
        let ticket = fetch_ticket(&screen.request_joke());
        screen.fetch_resolved(ticket, JokeCollection::empty());

        match screen.view() {
            ScreenView::Content(view) => {
                assert!(view.joke_text.is_none());
                assert!(view.error.unwrap().message.contains("another dad joke"));
            }
            ScreenView::Spinner => panic!("expected content"),
        }
    }

    #[test]
    fn test_retry_from_error_reenters_loading() {
        let mut screen = Screen::new(true);
        let ticket = fetch_ticket(&screen.request_joke());
        screen.fetch_resolved(ticket, JokeCollection::empty());

        let retry = fetch_ticket(&screen.request_joke());
        assert_ne!(retry, ticket);
        assert!(screen.state().is_loading());
    }

    #[test]
    fn test_sound_off_suppresses_laugh() {
        let mut screen = Screen::new(true);
        assert!(!screen.toggle_sound());

        let ticket = fetch_ticket(&screen.request_joke());
        let effects = screen.fetch_resolved(ticket, jokes(&["pun"]));

        assert!(effects.is_empty());
        assert!(screen.state().is_loaded());
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut screen = Screen::new(true);
        let ticket = fetch_ticket(&screen.request_joke());
        screen.fetch_resolved(ticket, jokes(&["first"]));

        let effects = screen.fetch_resolved(ticket, jokes(&["late duplicate"]));
        assert!(effects.is_empty());
        assert_eq!(screen.state(), &ScreenState::Loaded(jokes(&["first"])));
    }

    #[test]
    fn test_reveal_bonus_only_from_loaded() {
        let mut screen = Screen::new(true);
        assert!(screen.reveal_bonus().is_empty());

        screen.request_joke();
        assert!(screen.reveal_bonus().is_empty());
        assert!(!screen.is_modal_open());

        let mut screen = loaded_screen();
        assert_eq!(screen.reveal_bonus(), vec![Effect::PlayCue(Cue::Trombone)]);
        assert!(screen.is_modal_open());
        assert!(screen.reveal_bonus().is_empty());
    }

    #[test]
    fn test_modal_hides_toggle_and_bonus() {
        let mut screen = loaded_screen();
        screen.reveal_bonus();

        match screen.view() {
            ScreenView::Content(view) => {
                assert_eq!(view.modal, Some(REVEAL_MESSAGE));
                assert_eq!(view.sound_toggle, None);
                assert!(!view.bonus_button);
            }
            ScreenView::Spinner => panic!("expected content"),
        }

        screen.dismiss_bonus();
        assert!(!screen.is_modal_open());
        assert!(screen.state().is_loaded());
    }

    #[test]
    fn test_dismiss_error_returns_to_idle() {
        let mut screen = Screen::new(true);
        let ticket = fetch_ticket(&screen.request_joke());
        screen.fetch_resolved(ticket, JokeCollection::empty());

        screen.dismiss_error();
        assert_eq!(screen.state(), &ScreenState::Idle);

        let mut loaded = loaded_screen();
        loaded.dismiss_error();
        assert!(loaded.state().is_loaded());
    }

    #[test]
    fn test_toggle_sound_does_not_change_state() {
        let mut screen = loaded_screen();
        let before = screen.state().clone();
        screen.toggle_sound();
        assert_eq!(screen.state(), &before);
    }
}
