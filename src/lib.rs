//! # Boiler Caper
//!
//! Top-down movement demo for a handheld console: a fixed tile map, one
//! animated character, a sweeping security camera, and a valve-rotation
//! minigame.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       BOILER CAPER                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                 │
//! │  ├── fixed.rs    - Q16.16 fixed-point arithmetic            │
//! │  ├── angle.rs    - 512-unit angles, LUT sine/cosine         │
//! │  ├── vec3.rs     - Fixed-point 3D vector                    │
//! │  └── rng.rs      - Deterministic Xorshift128+ PRNG          │
//! │                                                             │
//! │  game/           - Game logic (pure, deterministic)         │
//! │  ├── input.rs    - Key/stylus snapshots, recordings         │
//! │  ├── map.rs      - Tile grid, projection, room entity       │
//! │  ├── player.rs   - Grid movement state machine              │
//! │  ├── camera.rs   - Security camera sweep                    │
//! │  ├── minigame.rs - Valve minigame variant                   │
//! │  └── session.rs  - Frame orchestration                      │
//! │                                                             │
//! │  console/        - Capability traits (external engine)      │
//! │  ├── mod.rs      - Gfx3d / Overlay2d / Rumble, AssetError   │
//! │  └── headless.rs - Recording backend for tests and demos    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! The `core/` and `game/` modules are 100% deterministic: no floating-point
//! arithmetic in game logic, no system time, and the only randomness (rumble
//! jitter) comes from a seeded Xorshift128+. Replaying a recorded input
//! script against the same seed reproduces the session bit for bit.
//!
//! The console's 3D engine, overlay, filesystem, and rumble pak are external
//! collaborators consumed through the `console` traits; the game never
//! implements them.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod console;
pub mod core;
pub mod game;

// Re-export commonly used types
pub use crate::console::{AssetError, Console, HeadlessConsole};
pub use crate::core::fixed::{Fixed, FIXED_HALF, FIXED_ONE, FIXED_SCALE};
pub use crate::core::rng::GameRng;
pub use crate::core::vec3::FixedVec3;
pub use crate::game::{GameEvent, GameSession, InputFrame, InputRecording, KeyState, SessionConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Display refresh rate the frame loop runs at (Hz)
pub const FRAME_RATE: u32 = 60;
