//! Input Capture
//!
//! The host loop polls the console's digital keys and stylus once per frame
//! and hands the snapshot down; nothing in the game polls hardware itself.
//! A delta-compressed recording of those snapshots drives the demo
//! walkthrough and the determinism replay.

use serde::{Deserialize, Serialize};

// =============================================================================
// KEY STATE
// =============================================================================

/// Per-frame digital key bitmask, in the console's native bit layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState(pub u32);

impl KeyState {
    /// A button
    pub const A: u32 = 1 << 0;
    /// B button
    pub const B: u32 = 1 << 1;
    /// Select button
    pub const SELECT: u32 = 1 << 2;
    /// Start button
    pub const START: u32 = 1 << 3;
    /// D-pad right
    pub const RIGHT: u32 = 1 << 4;
    /// D-pad left
    pub const LEFT: u32 = 1 << 5;
    /// D-pad up
    pub const UP: u32 = 1 << 6;
    /// D-pad down
    pub const DOWN: u32 = 1 << 7;

    /// No keys held.
    pub const fn none() -> Self {
        Self(0)
    }

    /// Build a state from a raw mask.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Whether every key in `mask` is held.
    #[inline]
    pub const fn held(self, mask: u32) -> bool {
        self.0 & mask == mask
    }

    /// Whether no key at all is held.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// STYLUS
// =============================================================================

/// Touch screen sample in pixels. Present only while the stylus is down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylusPos {
    /// Horizontal pixel, 0 at the left edge
    pub x: u16,
    /// Vertical pixel, 0 at the top edge
    pub y: u16,
}

// =============================================================================
// INPUT FRAME
// =============================================================================

/// Everything the host polls in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Held digital keys
    pub keys: KeyState,
    /// Stylus sample, `None` while the pen is up
    pub stylus: Option<StylusPos>,
}

impl InputFrame {
    /// Frame with nothing held.
    pub const fn idle() -> Self {
        Self {
            keys: KeyState::none(),
            stylus: None,
        }
    }

    /// Frame with the given keys held.
    pub const fn with_keys(bits: u32) -> Self {
        Self {
            keys: KeyState::from_bits(bits),
            stylus: None,
        }
    }

    /// Frame with the stylus down at `(x, y)`.
    pub const fn with_stylus(x: u16, y: u16) -> Self {
        Self {
            keys: KeyState::none(),
            stylus: Some(StylusPos { x, y }),
        }
    }

    /// Whether nothing is held or touched.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.keys.is_empty() && self.stylus.is_none()
    }
}

// =============================================================================
// INPUT RECORDING
// =============================================================================

/// Input state change at a frame number.
///
/// Only stored when input CHANGES, not every frame.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct InputDelta {
    /// Frame when this input state began
    pub frame: u32,
    /// The new input state
    pub input: InputFrame,
}

/// Delta-compressed recording of a whole session's input.
///
/// Used by the demo binary to script a walkthrough and replay it bit-exactly
/// for the determinism check.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InputRecording {
    /// RNG seed the session ran with
    pub seed: u64,

    /// First recorded frame (usually 0)
    pub start_frame: u32,

    /// Last recorded frame
    pub end_frame: u32,

    /// Delta-compressed input data
    deltas: Vec<InputDelta>,

    /// Last recorded input (for delta comparison)
    #[serde(skip)]
    last_input: InputFrame,
}

impl InputRecording {
    /// Create an empty recording for a session seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Record input for a frame. Only stores it if it changed.
    pub fn record(&mut self, frame: u32, input: InputFrame) {
        self.end_frame = frame;
        if input != self.last_input || self.deltas.is_empty() {
            self.deltas.push(InputDelta { frame, input });
            self.last_input = input;
        }
    }

    /// Input in effect at a specific frame (binary search over deltas).
    pub fn input_at(&self, frame: u32) -> InputFrame {
        let idx = self.deltas.partition_point(|d| d.frame <= frame);
        if idx == 0 {
            InputFrame::idle()
        } else {
            self.deltas[idx - 1].input
        }
    }

    /// Number of stored deltas.
    pub fn delta_count(&self) -> usize {
        self.deltas.len()
    }

    /// Iterate `(frame, input)` over every frame of the recording.
    pub fn replay_iter(&self) -> ReplayIter<'_> {
        ReplayIter {
            recording: self,
            current_frame: self.start_frame,
            delta_idx: 0,
            current_input: InputFrame::idle(),
        }
    }
}

/// Iterator replaying a recording frame-by-frame.
pub struct ReplayIter<'a> {
    recording: &'a InputRecording,
    current_frame: u32,
    delta_idx: usize,
    current_input: InputFrame,
}

impl<'a> Iterator for ReplayIter<'a> {
    type Item = (u32, InputFrame);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_frame > self.recording.end_frame {
            return None;
        }

        while self.delta_idx < self.recording.deltas.len() {
            let delta = &self.recording.deltas[self.delta_idx];
            if delta.frame <= self.current_frame {
                self.current_input = delta.input;
                self.delta_idx += 1;
            } else {
                break;
            }
        }

        let result = (self.current_frame, self.current_input);
        self.current_frame += 1;
        Some(result)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_masks() {
        let keys = KeyState::from_bits(KeyState::LEFT | KeyState::A);
        assert!(keys.held(KeyState::LEFT));
        assert!(keys.held(KeyState::A));
        assert!(!keys.held(KeyState::RIGHT));
        assert!(!keys.held(KeyState::LEFT | KeyState::RIGHT));
        assert!(!keys.is_empty());
        assert!(KeyState::none().is_empty());
    }

    #[test]
    fn test_idle_frame() {
        assert!(InputFrame::idle().is_idle());
        assert!(!InputFrame::with_keys(KeyState::DOWN).is_idle());
        assert!(!InputFrame::with_stylus(10, 20).is_idle());
    }

    #[test]
    fn test_recording_delta_compression() {
        let mut rec = InputRecording::new(1);

        let held = InputFrame::with_keys(KeyState::RIGHT);
        rec.record(0, held);
        rec.record(1, held);
        rec.record(2, held);
        assert_eq!(rec.delta_count(), 1);

        rec.record(3, InputFrame::idle());
        assert_eq!(rec.delta_count(), 2);
    }

    #[test]
    fn test_input_at() {
        let mut rec = InputRecording::new(1);
        let right = InputFrame::with_keys(KeyState::RIGHT);
        let up = InputFrame::with_keys(KeyState::UP);

        rec.record(10, right);
        rec.record(20, up);

        assert!(rec.input_at(5).is_idle());
        assert_eq!(rec.input_at(10), right);
        assert_eq!(rec.input_at(15), right);
        assert_eq!(rec.input_at(20), up);
        assert_eq!(rec.input_at(99), up);
    }

    #[test]
    fn test_replay_iter() {
        let mut rec = InputRecording::new(1);
        rec.record(0, InputFrame::with_keys(KeyState::LEFT));
        rec.record(3, InputFrame::with_keys(KeyState::DOWN));
        rec.record(5, InputFrame::idle());

        let frames: Vec<_> = rec.replay_iter().collect();
        assert_eq!(frames.len(), 6);
        assert!(frames[0].1.keys.held(KeyState::LEFT));
        assert!(frames[2].1.keys.held(KeyState::LEFT));
        assert!(frames[3].1.keys.held(KeyState::DOWN));
        assert!(frames[4].1.keys.held(KeyState::DOWN));
        assert!(frames[5].1.is_idle());
    }

    #[test]
    fn test_idle_prefix_is_recorded() {
        let mut rec = InputRecording::new(1);
        // An explicitly recorded idle first frame still produces a delta
        rec.record(0, InputFrame::idle());
        assert_eq!(rec.delta_count(), 1);
        assert!(rec.input_at(0).is_idle());
    }
}
