use super::state::ChatState;
use std::{
    collections::HashMap,
    time::{Duration, Instant},
};
use uuid::Uuid;

struct Session {
    chat: ChatState,
    touched: Instant,
}

/// Chat sessions keyed by the id in the page url.
///
/// Only a send creates a session. Idle sessions are swept when a new one is
/// created, and the least recently used one is dropped once `capacity` is
/// reached. A session with a submission in flight is never dropped.
pub struct SessionStore {
    sessions: HashMap<Uuid, Session>,
    idle: Duration,
    capacity: usize,
}

impl SessionStore {
    pub fn new(idle: Duration, capacity: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            idle,
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn get(&self, id: &Uuid) -> Option<&ChatState> {
        self.sessions.get(id).map(|s| &s.chat)
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut ChatState> {
        self.sessions.get_mut(id).map(|s| {
            s.touched = Instant::now();
            &mut s.chat
        })
    }

    pub fn get_or_create(&mut self, id: Uuid) -> &mut ChatState {
        if !self.sessions.contains_key(&id) {
            self.sweep();
            if self.sessions.len() >= self.capacity {
                self.evict_least_recent();
            }
        }

        let session = self.sessions.entry(id).or_insert_with(|| Session {
            chat: ChatState::default(),
            touched: Instant::now(),
        });
        session.touched = Instant::now();
        &mut session.chat
    }

    fn sweep(&mut self) {
        let idle = self.idle;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, s| s.chat.in_flight() || s.touched.elapsed() < idle);

        let swept = before - self.sessions.len();
        if swept > 0 {
            tracing::debug!("Swept {} idle sessions", swept);
        }
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .sessions
            .iter()
            .filter(|(_, s)| !s.chat.in_flight())
            .min_by_key(|(_, s)| s.touched)
            .map(|(id, _)| *id);

        match oldest {
            Some(id) => {
                self.sessions.remove(&id);
                tracing::debug!("Evicted session {}", id);
            }
            None => tracing::warn!("Session capacity reached with every session in flight"),
        }
    }
}
