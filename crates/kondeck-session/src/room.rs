//! One room: ordered membership, ready flags, pending deferrals, and the
//! match it may own.

use kondeck_engine::Game;
use kondeck_protocol::{ClientId, MemberInfo, RoomId};
use kondeck_timer::Deferred;

/// A scheduled deferral plus the generation it was armed with. A fire whose
/// generation no longer matches the stored one is stale and must be ignored
/// — the deferral was superseded or cancelled while its message was already
/// in flight.
#[derive(Debug)]
pub(crate) struct PendingTimer {
    pub deferred: Deferred,
    pub generation: u64,
}

impl PendingTimer {
    /// Whether a fired notification belongs to this pending deferral.
    pub fn matches(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Member {
    pub id: ClientId,
    pub ready: bool,
}

/// Room state. Dropping a room drops its deferrals, which aborts them — a
/// destroyed room can never fire a stale start or teardown.
pub(crate) struct Room {
    pub name: RoomId,
    /// Present only on password-protected rooms; none of the current event
    /// surface sets one, but listings report its presence.
    pub password: Option<String>,
    /// Join order; also the seating order when a match starts.
    members: Vec<Member>,
    pub game: Option<Game>,
    pub pending_start: Option<PendingTimer>,
    pub pending_teardown: Option<PendingTimer>,
}

impl Room {
    pub fn new(name: RoomId) -> Self {
        Self {
            name,
            password: None,
            members: Vec::new(),
            game: None,
            pending_start: None,
            pending_teardown: None,
        }
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_member(&self, id: ClientId) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    /// Adds a member with `ready = false`. Callers check capacity first.
    pub fn add_member(&mut self, id: ClientId) {
        debug_assert!(!self.is_member(id));
        self.members.push(Member { id, ready: false });
    }

    /// Removes a member. Returns whether they were present.
    pub fn remove_member(&mut self, id: ClientId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m.id != id);
        self.members.len() != before
    }

    /// Sets a member's ready flag. Returns whether the member exists.
    pub fn set_ready(&mut self, id: ClientId, ready: bool) -> bool {
        match self.members.iter_mut().find(|m| m.id == id) {
            Some(member) => {
                member.ready = ready;
                true
            }
            None => false,
        }
    }

    /// Clears every ready flag (used when a finished match is torn down, so
    /// a rematch requires a fresh vote).
    pub fn reset_ready(&mut self) {
        for member in &mut self.members {
            member.ready = false;
        }
    }

    /// The readiness condition: at least two members, all of them ready.
    pub fn all_ready(&self) -> bool {
        self.members.len() >= 2 && self.members.iter().all(|m| m.ready)
    }

    pub fn member_ids(&self) -> Vec<ClientId> {
        self.members.iter().map(|m| m.id).collect()
    }

    pub fn member_infos(&self) -> Vec<MemberInfo> {
        self.members
            .iter()
            .map(|m| MemberInfo {
                id: m.id,
                ready: m.ready,
            })
            .collect()
    }
}
