//! The activity published to the presence service each tick.

use std::time::Duration;

use crate::presence::secret::encode_join_secret;

/// Client connection state, in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Challenging,
    Connected,
    Loading,
    Primed,
    Active,
    Cinematic,
}

impl ConnectionState {
    /// Loading through active: a server has been chosen.
    #[must_use]
    pub fn on_server(self) -> bool {
        (Self::Loading..=Self::Active).contains(&self)
    }
}

/// What the game knows about the current session.
///
/// The display strings are produced by the game's presence formatter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: ConnectionState,
    pub server_address: String,
    pub content_set: String,
    pub password: Option<String>,
    pub server_needs_password: bool,
    pub demo_playing: bool,
    pub hosting_locally: bool,
    /// Time since the level started.
    pub level_elapsed: Duration,
    pub player_count: u32,
    pub max_players: u32,
    pub state_text: String,
    pub details_text: String,
    pub large_image_key: String,
    pub large_image_text: String,
    pub small_image_key: String,
    pub small_image_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Activity {
    pub state: String,
    pub details: String,
    pub large_image_key: String,
    pub large_image_text: String,
    pub small_image_key: String,
    pub small_image_text: String,
    /// Unix seconds when the current level started.
    pub start_timestamp: Option<i64>,
    pub party_id: Option<String>,
    pub party_size: Option<u32>,
    pub party_max: Option<u32>,
    pub join_secret: Option<String>,
}

impl Activity {
    /// Build the activity for `session` at unix time `now`.
    #[must_use]
    pub fn from_session(session: &SessionSnapshot, now: i64, share_password: bool) -> Self {
        let mut activity = Self {
            state: session.state_text.clone(),
            details: session.details_text.clone(),
            large_image_key: session.large_image_key.clone(),
            large_image_text: session.large_image_text.clone(),
            small_image_key: session.small_image_key.clone(),
            small_image_text: session.small_image_text.clone(),
            ..Self::default()
        };

        if session.state == ConnectionState::Active {
            let elapsed = i64::try_from(session.level_elapsed.as_secs()).unwrap_or(i64::MAX);
            activity.start_timestamp = Some(now.saturating_sub(elapsed));
        }

        // joining a demo or a listen server from outside makes no sense
        if session.demo_playing || session.hosting_locally {
            return activity;
        }

        if session.state >= ConnectionState::Loading {
            activity.party_size = Some(session.player_count);
            activity.party_max = Some(session.max_players);
        }

        if session.state.on_server() {
            activity.party_id = Some(format!("{}x", session.server_address));
            activity.join_secret = Some(encode_join_secret(
                &session.server_address,
                &session.content_set,
                session.password.as_deref(),
                share_password,
                session.server_needs_password,
            ));
        }

        activity
    }
}
