use std::fmt;

use log::{debug, warn};
use parking_lot::Mutex;
use revmix_core::RoomId;
use thiserror::Error;

use crate::{CollabEvent, EventSender, Poller};

/// A screen of the app. A room screen can't exist without its room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Auth,
    Home,
    Room { room_id: RoomId },
    Leaderboard,
    CreateRoom,
    Profile,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    #[error("Sign in to continue")]
    SignedOut,
}

/// Holds the single current screen. There is no history, navigating replaces the screen.
///
/// Pollers attached to a screen are cancelled as soon as the screen is left.
pub struct Navigator {
    state: Mutex<NavigatorState>,
    events: EventSender,
}

struct NavigatorState {
    screen: Screen,
    signed_in: bool,
    /// Bumped on every navigation
    generation: u64,
    pollers: Vec<Poller>,
}

impl Navigator {
    pub fn new(events: EventSender) -> Self {
        Self {
            state: Mutex::new(NavigatorState {
                screen: Screen::Auth,
                signed_in: false,
                generation: 0,
                pollers: Vec::new(),
            }),
            events,
        }
    }

    pub fn current(&self) -> Screen {
        self.state.lock().screen.clone()
    }

    /// Returns the generation of the current screen
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Returns true if the screen of the given generation is still shown
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    pub fn is_signed_in(&self) -> bool {
        self.state.lock().signed_in
    }

    /// Replaces the current screen, returning the generation of the new one.
    ///
    /// Only the auth screen can be shown while signed out.
    pub fn navigate(&self, screen: Screen) -> Result<u64, RouterError> {
        let mut state = self.state.lock();

        if !state.signed_in && screen != Screen::Auth {
            warn!("Refusing to show {} while signed out", screen);
            return Err(RouterError::SignedOut);
        }

        Ok(self.replace(&mut state, screen))
    }

    /// Ties a poller to the screen of the given generation.
    /// If that screen is already gone, the poller is cancelled right away.
    pub fn attach(&self, generation: u64, poller: Poller) {
        let mut state = self.state.lock();

        if state.generation != generation {
            debug!("Screen {} is gone, cancelling poller", generation);
            poller.cancel();
            return;
        }

        state.pollers.push(poller);
    }

    pub(crate) fn sign_in(&self) -> u64 {
        let mut state = self.state.lock();
        state.signed_in = true;
        self.replace(&mut state, Screen::Home)
    }

    pub(crate) fn sign_out(&self) -> u64 {
        let mut state = self.state.lock();
        state.signed_in = false;
        self.replace(&mut state, Screen::Auth)
    }

    fn replace(&self, state: &mut NavigatorState, screen: Screen) -> u64 {
        // Dropping the pollers cancels them
        state.pollers.clear();
        state.generation += 1;
        state.screen = screen.clone();

        debug!("Navigated to {} ({})", screen, state.generation);
        self.events.send(CollabEvent::ScreenChanged { screen }).ok();

        state.generation
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Auth => write!(f, "auth"),
            Screen::Home => write!(f, "home"),
            Screen::Room { room_id } => write!(f, "room {}", room_id),
            Screen::Leaderboard => write!(f, "leaderboard"),
            Screen::CreateRoom => write!(f, "create room"),
            Screen::Profile => write!(f, "profile"),
        }
    }
}
