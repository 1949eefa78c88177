//! Ties the RevMix client together: the session, the screens, and the views shown on them.

mod auth;
mod battle;
mod create_room;
mod errors;
mod events;
mod feed;
mod leaderboard;
mod polling;
mod profile;
mod router;
mod session;
mod submission;

use std::sync::Arc;

use crossbeam::channel::unbounded;
use log::{error, info, warn};
use parking_lot::RwLock;
use revmix_api::{ApiClient, NewEffectSchema};
use revmix_core::{AudioEffectData, ClipLibrary, Config, RoomData, SessionData, UserData};
use revmix_impls::AudioFile;

pub use auth::*;
pub use battle::*;
pub use create_room::*;
pub use errors::*;
pub use events::*;
pub use feed::*;
pub use leaderboard::*;
pub use polling::*;
pub use profile::*;
pub use router::*;
pub use session::*;
pub use submission::*;

/// The RevMix client, keeping track of who is signed in and what they are looking at.
pub struct Collab {
    context: CollabContext,
    store: BoxedSessionStore,
}

/// A type passed to the views of the collab system, to reach the backend, read the user, and emit events.
#[derive(Clone)]
pub struct CollabContext {
    pub config: Arc<Config>,
    pub navigator: Arc<Navigator>,

    api: Arc<RwLock<ApiClient>>,
    user: Arc<RwLock<Option<UserData>>>,
    events: EventSender,
}

impl CollabContext {
    /// Returns a client carrying the current session's token
    pub fn api(&self) -> ApiClient {
        self.api.read().clone()
    }

    pub fn user(&self) -> Option<UserData> {
        self.user.read().clone()
    }

    pub(crate) fn require_user(&self) -> Result<UserData, CollabError> {
        self.user().ok_or(CollabError::SignedOut)
    }

    pub(crate) fn emit(&self, event: CollabEvent) {
        // Nobody listening is fine
        self.events.send(event).ok();
    }
}

impl Collab {
    /// Creates the client, returning it along with the receiving end of its events
    pub fn new(config: Config, store: BoxedSessionStore) -> Result<(Self, EventReceiver), CollabError> {
        let api = ApiClient::new(&config.backend_url)?;
        let (sender, receiver) = unbounded();

        let context = CollabContext {
            config: Arc::new(config),
            navigator: Arc::new(Navigator::new(sender.clone())),
            api: Arc::new(RwLock::new(api)),
            user: Default::default(),
            events: sender,
        };

        Ok((Self { context, store }, receiver))
    }

    pub fn context(&self) -> &CollabContext {
        &self.context
    }

    pub fn user(&self) -> Option<UserData> {
        self.context.user()
    }

    pub fn screen(&self) -> Screen {
        self.context.navigator.current()
    }

    /// Signs back in with the stored session, if it is still accepted.
    ///
    /// A session the backend refuses, or can't be checked, is discarded.
    pub async fn restore(&self) -> Option<UserData> {
        let session = self.store.load().await?;
        let api = self
            .context
            .api()
            .with_token(Some(session.access_token.clone()));

        match api.me().await {
            Ok(user) => {
                info!("Restored session of {}", user.username);
                self.sign_in(user.clone(), &session);
                Some(user)
            }
            Err(e) => {
                warn!("Discarding stored session: {}", e);
                self.clear_session().await;
                None
            }
        }
    }

    /// Sends the auth form and signs in with the session it returns
    pub async fn login(&self, form: &AuthForm) -> Result<UserData, CollabError> {
        let (user, session) = form.submit(&self.context.api()).await?;

        self.store.save(&session).await?;
        self.sign_in(user.clone(), &session);

        Ok(user)
    }

    /// Signs out. The session is cleared locally even if the backend can't be told.
    pub async fn logout(&self) {
        let api = self.context.api();

        if api.token().is_some() {
            if let Err(e) = api.logout().await {
                warn!("Backend logout failed: {}", e);
            }
        }

        self.clear_session().await;
    }

    pub fn navigate(&self, screen: Screen) -> Result<u64, CollabError> {
        Ok(self.context.navigator.navigate(screen)?)
    }

    pub fn home_feed(&self) -> HomeFeed {
        HomeFeed::new(&self.context)
    }

    /// Shows the home screen and refreshes its feed until the screen is left
    pub fn watch_feed(&self) -> Result<Arc<HomeFeed>, CollabError> {
        let generation = self.navigate(Screen::Home)?;
        let feed = Arc::new(self.home_feed());

        let context = self.context.clone();
        let polled = feed.clone();
        let poller = Poller::spawn(self.context.config.feed_poll_interval, move || {
            let feed = polled.clone();
            let context = context.clone();

            async move {
                if let Err(e) = feed.refresh().await {
                    error!("Error fetching feed: {}", e);
                    context.emit(CollabEvent::RefreshFailed {
                        message: CollabError::from(e).alert(),
                    });
                }
            }
        });

        self.context.navigator.attach(generation, poller);
        Ok(feed)
    }

    pub fn battle_room(&self, room_id: impl Into<String>) -> BattleRoom {
        BattleRoom::new(&self.context, room_id)
    }

    /// Shows a battle room and refreshes it until the screen is left
    pub fn watch_room(&self, room_id: impl Into<String>) -> Result<Arc<BattleRoom>, CollabError> {
        let room_id = room_id.into();
        let generation = self.navigate(Screen::Room {
            room_id: room_id.clone(),
        })?;

        let room = Arc::new(self.battle_room(room_id));

        let context = self.context.clone();
        let polled = room.clone();
        let poller = Poller::spawn(self.context.config.room_poll_interval, move || {
            let room = polled.clone();
            let context = context.clone();

            async move {
                if let Err(e) = room.refresh().await {
                    error!("Error fetching room: {}", e);
                    context.emit(CollabEvent::RefreshFailed { message: e.alert() });
                }
            }
        });

        self.context.navigator.attach(generation, poller);
        Ok(room)
    }

    /// Creates a room hosted by the user and moves into it
    pub async fn create_room(&self, form: &CreateRoomForm) -> Result<RoomData, CollabError> {
        let user = self.context.require_user()?;
        let room = form.submit(&self.context.api(), &user.id).await?;

        self.navigate(Screen::Room {
            room_id: room.id.clone(),
        })?;

        Ok(room)
    }

    pub async fn leaderboard(&self, limit: Option<u32>) -> Result<Vec<LeaderboardEntry>, CollabError> {
        self.navigate(Screen::Leaderboard)?;

        let users = self.context.api().leaderboard(limit).await?;
        let current = self.context.user();

        Ok(LeaderboardEntry::rank(
            users,
            current.as_ref().map(|u| u.id.as_str()),
        ))
    }

    /// Returns the profile of the given user, or of the signed in user when none is given
    pub async fn profile(&self, user_id: Option<&str>) -> Result<ProfileView, CollabError> {
        let current = self.context.require_user()?;
        self.navigate(Screen::Profile)?;

        let api = self.context.api();
        let user = match user_id {
            Some(id) if id != current.id => api.profile(id).await?,
            _ => {
                let user = api.me().await?;
                *self.context.user.write() = Some(user.clone());
                user
            }
        };

        Ok(ProfileView::new(user, Some(&current.id)))
    }

    /// Fetches the clip catalog the timeline is composed from
    pub async fn clip_library(&self) -> Result<ClipLibrary, CollabError> {
        let effects = self.context.api().effects().await?;

        let mut library = ClipLibrary::default();
        library.set_effects(&effects);

        Ok(library)
    }

    /// Adds an audio file to the clip catalog as a custom effect
    pub async fn upload_effect(&self, file: &AudioFile) -> Result<AudioEffectData, CollabError> {
        self.context.require_user()?;

        let body = NewEffectSchema {
            name: file.name.clone(),
            audio_data: file.blob.to_base64(),
            duration: self.context.config.custom_clip_duration,
        };

        Ok(self.context.api().create_effect(&body).await?)
    }

    fn sign_in(&self, user: UserData, session: &SessionData) {
        self.context
            .api
            .write()
            .set_token(Some(session.access_token.clone()));
        *self.context.user.write() = Some(user.clone());

        self.context.navigator.sign_in();
        self.context.emit(CollabEvent::SignedIn { user });
    }

    async fn clear_session(&self) {
        if let Err(e) = self.store.clear().await {
            error!("Could not clear stored session: {}", e);
        }

        self.context.api.write().set_token(None);
        self.context.user.write().take();

        self.context.navigator.sign_out();
        self.context.emit(CollabEvent::SignedOut);
    }
}
