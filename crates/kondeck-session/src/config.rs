//! Hub configuration.

use std::time::Duration;

use kondeck_engine::{MAX_PLAYERS, MIN_PLAYERS};

/// Settings for the session hub.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum members per room. Bounded by the engine's roster cap.
    pub max_members: usize,

    /// Debounce before an all-ready room starts its match. Any member
    /// un-readying within this window cancels the start.
    pub start_delay: Duration,

    /// Grace between a match ending and its removal from the room, so
    /// clients can observe the final state.
    pub teardown_delay: Duration,

    /// Hub command channel capacity.
    pub channel_size: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_members: MAX_PLAYERS,
            start_delay: Duration::from_secs(5),
            teardown_delay: Duration::from_secs(5),
            channel_size: 64,
        }
    }
}

impl HubConfig {
    /// Clamps out-of-range values so the config is safe to use. Called by
    /// [`spawn_hub`](crate::spawn_hub).
    pub fn validated(mut self) -> Self {
        if self.max_members > MAX_PLAYERS {
            tracing::warn!(
                max_members = self.max_members,
                cap = MAX_PLAYERS,
                "max_members exceeds the engine roster cap — clamping"
            );
            self.max_members = MAX_PLAYERS;
        }
        if self.max_members < MIN_PLAYERS {
            self.max_members = MIN_PLAYERS;
        }
        if self.channel_size == 0 {
            self.channel_size = 1;
        }
        self
    }
}
