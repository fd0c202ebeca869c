//! Trait-based abstraction over the transactional room store.
//!
//! The backing store is an external collaborator assumed to provide atomic
//! read-modify-write transactions over a room document and its player
//! sub-documents. The contract here renders that as snapshot plus versioned
//! compare-and-swap: read the full document set with an opaque version,
//! compute the new values in memory, and commit them atomically iff the
//! version is unchanged. A moved version is a [`StoreError::Conflict`], which
//! callers retry against a fresh snapshot.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::entities::{Players, Room, RoomCode};

pub mod memory;

pub use memory::MemoryRoomStore;

/// Errors that can occur during store operations.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum StoreError {
    #[error("room does not exist")]
    RoomNotFound,
    #[error("concurrent write detected")]
    Conflict,
    #[error("too many concurrent writes; giving up")]
    RetriesExhausted,
    #[error("corrupt room document: {0}")]
    Corrupt(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Opaque document-set version used for optimistic concurrency.
pub type Version = u64;

/// A consistent read of a room and all of its player documents.
#[derive(Clone, Debug)]
pub struct RoomSnapshot {
    pub room: Room,
    pub players: Players,
    pub version: Version,
}

/// The full replacement value for a room's document set. Mutation is always
/// expressed as new values replacing old ones, never in-place patches.
#[derive(Clone, Debug)]
pub struct RoomWrite {
    pub room: Room,
    pub players: Players,
}

/// Transactional room storage.
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Read the room and all of its players consistently.
    async fn snapshot(&self, code: &RoomCode) -> StoreResult<RoomSnapshot>;

    /// Atomically replace the room's document set, iff no other write
    /// committed since the snapshot `expected` was taken.
    async fn commit(
        &self,
        code: &RoomCode,
        expected: Version,
        write: RoomWrite,
    ) -> StoreResult<()>;
}
