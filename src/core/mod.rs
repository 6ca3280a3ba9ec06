//! Core deterministic primitives.
//!
//! Integer-only building blocks shared by the game logic: fixed-point
//! arithmetic, hardware angle units, vectors, and a seeded PRNG. Nothing in
//! here knows about the console or the game rules.

pub mod angle;
pub mod fixed;
pub mod rng;
pub mod vec3;

// Re-export core types
pub use fixed::{Fixed, FIXED_HALF, FIXED_ONE, FIXED_SCALE};
pub use rng::GameRng;
pub use vec3::FixedVec3;
