//! Game Logic Module
//!
//! Everything that runs once per frame. Pure state transitions live in
//! `player`, `map`, `camera`, and `minigame`; the `session` module is the
//! only place that stitches them to the console capability traits.
//!
//! ## Module Structure
//!
//! - `input`: Key/stylus snapshots and delta-compressed recordings
//! - `map`: Tile grid, world projection, the room entity
//! - `player`: Grid movement state machine and model glue
//! - `camera`: Security camera sweep and line of sight
//! - `minigame`: Closed minigame variant set (valve)
//! - `events`: Per-frame events reported to the host
//! - `session`: Frame orchestration

pub mod camera;
pub mod events;
pub mod input;
pub mod map;
pub mod minigame;
pub mod player;
pub mod session;

// Re-export key types
pub use events::{GameEvent, GameEventData};
pub use input::{InputFrame, InputRecording, KeyState, StylusPos};
pub use map::{Tile, TileGrid};
pub use minigame::{Minigame, MinigameKind};
pub use player::{Direction, MoveOutcome, Player};
pub use session::{GameSession, SessionConfig};
