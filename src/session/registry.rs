//! Session registry: participant identity → shared session.
//!
//! Both members of a pairing map to the *same* `SessionHandle`. The
//! registry enforces that itself: `insert` registers every member or none,
//! `remove` unregisters every member or none.
//!
//! Each session sits behind its own mutex so commit-and-resolve on one
//! pairing is serialized without blocking other pairings.

use std::sync::{Arc, Mutex, RwLock};

use rustc_hash::FxHashMap;

use super::error::{Result, SessionError};
use super::state::{Pairing, Session};
use crate::core::ParticipantId;

/// Shared, lockable session.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Storage for live sessions.
pub trait SessionRegistry: Send + Sync {
    /// Session a participant belongs to.
    fn get(&self, participant: ParticipantId) -> Result<Option<SessionHandle>>;

    /// Register a session under every member of its pairing.
    ///
    /// Fails with `Busy` (and registers nothing) if any member already
    /// has a session.
    fn insert(&self, session: Session) -> Result<SessionHandle>;

    /// Unregister every member of `pairing`.
    ///
    /// Members mapped to some other session are left alone.
    fn remove(&self, pairing: &Pairing) -> Result<Option<SessionHandle>>;

    /// Number of distinct live sessions.
    fn session_count(&self) -> Result<usize>;

    /// Check if a participant has a live session.
    fn contains(&self, participant: ParticipantId) -> Result<bool> {
        Ok(self.get(participant)?.is_some())
    }
}

/// In-memory registry for tests and single-process deployments.
#[derive(Default)]
pub struct InMemorySessionRegistry {
    sessions: RwLock<FxHashMap<ParticipantId, SessionHandle>>,
}

impl InMemorySessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRegistry for InMemorySessionRegistry {
    fn get(&self, participant: ParticipantId) -> Result<Option<SessionHandle>> {
        let sessions = self.sessions.read().map_err(|_| SessionError::LockPoisoned)?;
        Ok(sessions.get(&participant).cloned())
    }

    fn insert(&self, session: Session) -> Result<SessionHandle> {
        let members = session.pairing.members();
        let mut sessions = self.sessions.write().map_err(|_| SessionError::LockPoisoned)?;

        if let Some(busy) = members.iter().find(|m| sessions.contains_key(*m)) {
            return Err(SessionError::Busy(*busy));
        }

        let handle = Arc::new(Mutex::new(session));
        for member in members {
            sessions.insert(member, Arc::clone(&handle));
        }
        Ok(handle)
    }

    fn remove(&self, pairing: &Pairing) -> Result<Option<SessionHandle>> {
        let mut sessions = self.sessions.write().map_err(|_| SessionError::LockPoisoned)?;

        let Some(handle) = sessions.get(&pairing.challenger).cloned() else {
            return Ok(None);
        };
        for member in pairing.members() {
            if sessions
                .get(&member)
                .is_some_and(|h| Arc::ptr_eq(h, &handle))
            {
                sessions.remove(&member);
            }
        }
        Ok(Some(handle))
    }

    fn session_count(&self) -> Result<usize> {
        let sessions = self.sessions.read().map_err(|_| SessionError::LockPoisoned)?;
        let mut seen: Vec<*const Mutex<Session>> = sessions.values().map(Arc::as_ptr).collect();
        seen.sort_unstable();
        seen.dedup();
        Ok(seen.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::{Challenge, SessionState};

    fn challenge(a: u64, b: u64) -> Session {
        Session::new(
            Pairing::new(ParticipantId::new(a), ParticipantId::new(b)),
            SessionState::AwaitingChallengeResponse(Challenge::default()),
        )
    }

    #[test]
    fn test_insert_shares_handle() {
        let registry = InMemorySessionRegistry::new();
        registry.insert(challenge(1, 2)).unwrap();

        let a = registry.get(ParticipantId::new(1)).unwrap().unwrap();
        let b = registry.get(ParticipantId::new(2)).unwrap().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.session_count().unwrap(), 1);
    }

    #[test]
    fn test_insert_busy_registers_nothing() {
        let registry = InMemorySessionRegistry::new();
        registry.insert(challenge(1, 2)).unwrap();

        let err = registry.insert(challenge(3, 2)).unwrap_err();
        assert_eq!(err, SessionError::Busy(ParticipantId::new(2)));
        assert!(!registry.contains(ParticipantId::new(3)).unwrap());
        assert_eq!(registry.session_count().unwrap(), 1);
    }

    #[test]
    fn test_remove_both_members() {
        let registry = InMemorySessionRegistry::new();
        let pairing = Pairing::new(ParticipantId::new(1), ParticipantId::new(2));
        registry.insert(challenge(1, 2)).unwrap();

        assert!(registry.remove(&pairing).unwrap().is_some());
        assert!(!registry.contains(ParticipantId::new(1)).unwrap());
        assert!(!registry.contains(ParticipantId::new(2)).unwrap());
        assert!(registry.remove(&pairing).unwrap().is_none());
    }

    #[test]
    fn test_solo_registers_challenger_only() {
        let registry = InMemorySessionRegistry::new();
        let session = Session::new(
            Pairing::solo(ParticipantId::new(1), ParticipantId::new(99)),
            SessionState::AwaitingChallengeResponse(Challenge::default()),
        );
        registry.insert(session).unwrap();

        assert!(registry.contains(ParticipantId::new(1)).unwrap());
        assert!(!registry.contains(ParticipantId::new(99)).unwrap());
    }

    #[test]
    fn test_independent_pairings() {
        let registry = InMemorySessionRegistry::new();
        registry.insert(challenge(1, 2)).unwrap();
        registry.insert(challenge(3, 4)).unwrap();
        assert_eq!(registry.session_count().unwrap(), 2);

        registry
            .remove(&Pairing::new(ParticipantId::new(1), ParticipantId::new(2)))
            .unwrap();
        assert!(registry.contains(ParticipantId::new(3)).unwrap());
        assert_eq!(registry.session_count().unwrap(), 1);
    }
}
