//! Rich presence: publish what the player is doing and react to friends
//! joining through the presence service.

mod activity;
mod events;
mod secret;

pub use activity::{Activity, ConnectionState, SessionSnapshot};
pub use events::{EventQueue, PresenceEvent, PresenceUser, EVENT_QUEUE_CAPACITY};
pub use secret::{encode_join_secret, parse_join_secret, ClientAction, JoinSecretError, JoinTarget};

use crate::config::{self, Settings};

/// A presence service connection.
///
/// Implementations push service callbacks into the [`EventQueue`] they were
/// given; the client drains it once per tick.
pub trait PresenceProvider {
    /// Returns the name of this presence provider (for logging)
    fn name(&self) -> &'static str;

    fn update_activity(&mut self, activity: &Activity);

    /// Let the service deliver pending callbacks.
    fn run_callbacks(&mut self) {}

    fn shutdown(&mut self) {}
}

/// Drives one provider from the game loop.
pub struct PresenceClient {
    provider: Box<dyn PresenceProvider>,
    events: EventQueue,
}

impl PresenceClient {
    pub fn new(provider: Box<dyn PresenceProvider>, events: EventQueue) -> Self {
        log::info!("Adding presence provider: {}", provider.name());
        Self { provider, events }
    }

    /// Handle for the provider's callbacks.
    #[must_use]
    pub fn events(&self) -> EventQueue {
        self.events.clone()
    }

    /// Publish the current activity and process queued events.
    ///
    /// Returns the client commands to run, in order.
    pub fn tick(&mut self, session: &SessionSnapshot, settings: &Settings, now: i64) -> Vec<ClientAction> {
        let share_password = settings.boolean(config::CL_DISCORD_SHARE_PASSWORD);
        let activity = Activity::from_session(session, now, share_password);
        self.provider.update_activity(&activity);
        self.provider.run_callbacks();

        self.events
            .drain()
            .into_iter()
            .flat_map(|event| handle_event(&event))
            .collect()
    }

    pub fn shutdown(&mut self) {
        self.provider.shutdown();
    }
}

/// Log an event and return the commands it asks for.
pub fn handle_event(event: &PresenceEvent) -> Vec<ClientAction> {
    match event {
        PresenceEvent::Ready { user } => {
            log::info!("*Discord: connected to user {}", user);
            Vec::new()
        }
        PresenceEvent::Disconnected { code, message } => {
            log::info!("*Discord: disconnected ({}: {})", code, message);
            Vec::new()
        }
        PresenceEvent::Errored { code, message } => {
            log::error!("*Discord: Error - ({}: {})", code, message);
            Vec::new()
        }
        PresenceEvent::JoinGame { secret } => {
            log::info!("*Discord: joining ({})", secret);
            match parse_join_secret(secret) {
                Ok(target) => target.actions(),
                Err(e) => {
                    log::warn!("*Discord: Failed to parse server information from join secret: {}", e);
                    Vec::new()
                }
            }
        }
        PresenceEvent::SpectateGame { secret } => {
            log::debug!("*Discord: spectating ({})", secret);
            Vec::new()
        }
        PresenceEvent::JoinRequest { user } => {
            log::info!("*Discord: join request from {}", user);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorded {
        activities: Vec<Activity>,
        callbacks: usize,
        shut_down: bool,
    }

    struct FakeProvider {
        recorded: Arc<Mutex<Recorded>>,
        events: EventQueue,
        pending: Vec<PresenceEvent>,
    }

    impl PresenceProvider for FakeProvider {
        fn name(&self) -> &'static str {
            "Fake"
        }

        fn update_activity(&mut self, activity: &Activity) {
            self.recorded.lock().activities.push(activity.clone());
        }

        fn run_callbacks(&mut self) {
            self.recorded.lock().callbacks += 1;
            for event in self.pending.drain(..) {
                self.events.push(event);
            }
        }

        fn shutdown(&mut self) {
            self.recorded.lock().shut_down = true;
        }
    }

    fn client(pending: Vec<PresenceEvent>) -> (PresenceClient, Arc<Mutex<Recorded>>) {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let events = EventQueue::new();
        let provider = FakeProvider {
            recorded: Arc::clone(&recorded),
            events: events.clone(),
            pending,
        };
        (PresenceClient::new(Box::new(provider), events), recorded)
    }

    #[test]
    fn test_join_game_event_becomes_commands() {
        let (mut client, recorded) = client(vec![
            PresenceEvent::Ready {
                user: PresenceUser::default(),
            },
            PresenceEvent::JoinGame {
                secret: "10.0.0.5 basegame secretpw".into(),
            },
            PresenceEvent::SpectateGame {
                secret: "10.0.0.5 basegame".into(),
            },
        ]);
        let actions = client.tick(&SessionSnapshot::default(), &Settings::new(), 0);
        assert_eq!(
            actions,
            vec![
                ClientAction::SetPassword("secretpw".into()),
                ClientAction::Connect("10.0.0.5".into()),
            ]
        );
        assert_eq!(recorded.lock().callbacks, 1);
        assert!(client.events().is_empty());

        client.shutdown();
        assert!(recorded.lock().shut_down);
    }

    #[test]
    fn test_share_password_setting_reaches_activity() {
        let (mut client, recorded) = client(Vec::new());
        let session = SessionSnapshot {
            state: ConnectionState::Active,
            server_address: "srv".into(),
            content_set: "base".into(),
            password: Some("pw".into()),
            server_needs_password: true,
            ..SessionSnapshot::default()
        };

        client.tick(&session, &Settings::new(), 0);
        let mut settings = Settings::new();
        settings.set(config::CL_DISCORD_SHARE_PASSWORD, "1").unwrap();
        client.tick(&session, &settings, 0);

        let recorded = recorded.lock();
        assert_eq!(recorded.activities[0].join_secret.as_deref(), Some("srv base \"\""));
        assert_eq!(recorded.activities[1].join_secret.as_deref(), Some("srv base pw"));
    }

    #[test]
    fn test_events_that_produce_nothing() {
        let user = PresenceUser::default();
        for event in [
            PresenceEvent::Disconnected { code: 1, message: "bye".into() },
            PresenceEvent::Errored { code: 2, message: "oops".into() },
            PresenceEvent::JoinRequest { user },
            PresenceEvent::JoinGame { secret: "a b c d".into() },
            PresenceEvent::JoinGame { secret: String::new() },
        ] {
            assert!(handle_event(&event).is_empty());
        }
    }
}
