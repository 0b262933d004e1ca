//! Room names for live conversations.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

/// Generate a `room-xxxxxxxx` name not present in `existing`.
pub fn generate_room_name(existing: &HashSet<String>) -> String {
    loop {
        let name = random_room_name();
        if !existing.contains(&name) {
            return name;
        }
    }
}

fn random_room_name() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("room-{}", &id[..8])
}

/// The requested room already hosts a conversation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Room {0} is already in use")]
pub struct RoomTaken(pub String);

/// Set of rooms with a live conversation.
#[derive(Debug, Clone, Default)]
pub struct RoomRegistry {
    active: Arc<Mutex<HashSet<String>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `requested`, or a fresh generated name when `None`.
    ///
    /// The room is released when the returned lease is dropped.
    pub fn reserve(&self, requested: Option<&str>) -> Result<RoomLease, RoomTaken> {
        let mut active = self.lock();
        let name = match requested.map(str::trim).filter(|r| !r.is_empty()) {
            Some(room) if active.contains(room) => return Err(RoomTaken(room.to_string())),
            Some(room) => room.to_string(),
            None => generate_room_name(&active),
        };
        active.insert(name.clone());
        Ok(RoomLease {
            name,
            registry: self.clone(),
        })
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.lock().contains(name)
    }

    /// Number of live rooms.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A claimed room; releases its name on drop.
#[derive(Debug)]
pub struct RoomLease {
    name: String,
    registry: RoomRegistry,
}

impl RoomLease {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for RoomLease {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.name);
    }
}
