//! Game Events
//!
//! Observable things that happened during a frame, reported back to the host
//! loop. The demo binary logs them; tests assert on them.

use serde::{Deserialize, Serialize};

use crate::game::minigame::MinigameKind;

/// Event payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A walk was rejected by a wall or the room edge.
    MoveBlocked {
        /// Rejected candidate column
        tile_x: i32,
        /// Rejected candidate row
        tile_z: i32,
    },

    /// The player finished a walk onto a new cell.
    TileReached {
        /// New cell column
        tile_x: i32,
        /// New cell row
        tile_z: i32,
    },

    /// The security camera spotted the player.
    PlayerCaught,

    /// A minigame was entered.
    MinigameStarted {
        /// Which variant
        kind: MinigameKind,
    },

    /// The active minigame reached its goal and was exited.
    MinigameCompleted {
        /// Which variant
        kind: MinigameKind,
    },
}

/// A game event with the frame it occurred on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Frame when the event occurred
    pub frame: u32,
    /// What happened
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(frame: u32, data: GameEventData) -> Self {
        Self { frame, data }
    }
}
