//! In-memory room store with optimistic concurrency.
//!
//! The reference [`RoomStore`] backend: a versioned map guarded by a mutex.
//! Used by the test suite and by embedders that don't need durability; a
//! remote document store implements the same trait.

use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use super::{RoomSnapshot, RoomStore, RoomWrite, StoreError, StoreResult, Version};
use crate::game::entities::{Player, Players, Room, RoomCode};

#[derive(Debug)]
struct VersionedRoom {
    version: Version,
    room: Room,
    players: Players,
}

/// In-memory [`RoomStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryRoomStore {
    rooms: Mutex<HashMap<RoomCode, VersionedRoom>>,
}

impl MemoryRoomStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a freshly created room with its host player.
    pub fn create_room(&self, mut room: Room, host: Player) -> StoreResult<()> {
        let mut rooms = self.lock();
        let code = room.code.clone();
        room.player_order.push(host.id.clone());
        let mut players = Players::new();
        players.insert(host.id.clone(), host);
        rooms.insert(
            code,
            VersionedRoom {
                version: 0,
                room,
                players,
            },
        );
        Ok(())
    }

    /// Add a player to an existing room. Re-joining with a known identity is
    /// a no-op; the original document survives.
    pub fn join_room(&self, code: &RoomCode, player: Player) -> StoreResult<()> {
        let mut rooms = self.lock();
        let entry = rooms.get_mut(code).ok_or(StoreError::RoomNotFound)?;
        if entry.players.contains_key(&player.id) {
            return Ok(());
        }
        entry.room.player_order.push(player.id.clone());
        entry.players.insert(player.id.clone(), player);
        entry.version += 1;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<RoomCode, VersionedRoom>> {
        // A poisoned lock only means another test panicked mid-write; the
        // map itself is still coherent for our whole-value swaps.
        self.rooms.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn snapshot(&self, code: &RoomCode) -> StoreResult<RoomSnapshot> {
        let rooms = self.lock();
        let entry = rooms.get(code).ok_or(StoreError::RoomNotFound)?;
        Ok(RoomSnapshot {
            room: entry.room.clone(),
            players: entry.players.clone(),
            version: entry.version,
        })
    }

    async fn commit(
        &self,
        code: &RoomCode,
        expected: Version,
        write: RoomWrite,
    ) -> StoreResult<()> {
        let mut rooms = self.lock();
        let entry = rooms.get_mut(code).ok_or(StoreError::RoomNotFound)?;
        if entry.version != expected {
            return Err(StoreError::Conflict);
        }
        entry.version += 1;
        entry.room = write.room;
        entry.players = write.players;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::{PlayerId, RoomSettings};

    fn seeded() -> (MemoryRoomStore, RoomCode) {
        let store = MemoryRoomStore::new();
        let code = RoomCode::new("ABCD23");
        let host_id = PlayerId::new("host");
        let room = Room::new(code.clone(), host_id.clone(), RoomSettings::default());
        let host = Player::host(host_id, "host", "🤖", 1000);
        store.create_room(room, host).unwrap();
        (store, code)
    }

    #[tokio::test]
    async fn snapshot_of_missing_room_fails() {
        let store = MemoryRoomStore::new();
        let err = store.snapshot(&RoomCode::new("NOPE22")).await;
        assert_eq!(err.unwrap_err(), StoreError::RoomNotFound);
    }

    #[tokio::test]
    async fn join_appends_to_player_order_once() {
        let (store, code) = seeded();
        let alice = Player::new(PlayerId::new("alice"), "alice", "🦊", 1000);
        store.join_room(&code, alice.clone()).unwrap();
        store.join_room(&code, alice).unwrap();

        let snap = store.snapshot(&code).await.unwrap();
        assert_eq!(snap.players.len(), 2);
        assert_eq!(
            snap.room.player_order,
            vec![PlayerId::new("host"), PlayerId::new("alice")]
        );
    }

    #[tokio::test]
    async fn stale_commit_conflicts() {
        let (store, code) = seeded();
        let snap = store.snapshot(&code).await.unwrap();

        let mut fresh = snap.room.clone();
        fresh.round_count = 7;
        store
            .commit(
                &code,
                snap.version,
                RoomWrite {
                    room: fresh,
                    players: snap.players.clone(),
                },
            )
            .await
            .unwrap();

        // Same expected version again: somebody else won the race.
        let err = store
            .commit(
                &code,
                snap.version,
                RoomWrite {
                    room: snap.room,
                    players: snap.players,
                },
            )
            .await;
        assert_eq!(err.unwrap_err(), StoreError::Conflict);

        let reread = store.snapshot(&code).await.unwrap();
        assert_eq!(reread.room.round_count, 7);
    }
}
