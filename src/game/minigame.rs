//! Minigames
//!
//! A closed set of minigame variants dispatched by enum; the valve is the
//! only variant today. Each variant owns its overlay handles with strict
//! load/unload pairing, enforced for the host by [`MinigameSlot`]: at most
//! one variant is active, and its unload always runs before the next load.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::console::{AssetError, BackgroundId, Overlay2d, SpriteId};
use crate::core::angle;
use crate::game::input::{InputFrame, StylusPos};

// =============================================================================
// VALVE
// =============================================================================

pub(crate) const VALVE_SPRITE: &str = "sprite/valve";
pub(crate) const VALVE_BACKGROUND: &str = "bg/valve_minigame";
const VALVE_SPRITE_SLOT: u32 = 3;

/// Angle units the valve turns toward its target per frame.
const VALVE_ROTATION_SPEED: i32 = 4;

/// Net rotation (either direction) that opens the valve.
const VALVE_WIN_ROTATION: i32 = 2 * angle::TURN;

/// Stylus-driven valve wheel.
///
/// Dragging the stylus adjusts the target rotation; the wheel eases toward
/// it at a fixed rate. Completion latches once the wheel has made two net
/// full turns and never reverts while loaded.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ValveMinigame {
    rotation: i32,
    target_rotation: i32,
    complete: bool,
    last_stylus: Option<StylusPos>,

    #[serde(skip)]
    background: Option<BackgroundId>,
    #[serde(skip)]
    sprite: Option<SpriteId>,
}

impl ValveMinigame {
    /// Wheel angle wrapped into `[0, TURN)`, as shown on screen.
    pub fn rotation(&self) -> i32 {
        angle::wrap(self.rotation)
    }

    /// Whether the valve has been fully opened.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    fn load(&mut self, overlay: &mut impl Overlay2d) -> Result<(), AssetError> {
        let background = overlay.load_background(VALVE_BACKGROUND)?;
        let sprite = overlay.load_sprite(VALVE_SPRITE, VALVE_SPRITE_SLOT)?;
        self.background = Some(background);
        self.sprite = Some(sprite);
        debug!("valve minigame loaded");
        Ok(())
    }

    fn unload(&mut self, overlay: &mut impl Overlay2d) {
        if let Some(sprite) = self.sprite.take() {
            overlay.delete_sprite(sprite);
        }
        if let Some(background) = self.background.take() {
            overlay.delete_background(background);
        }
        debug!("valve minigame unloaded");
    }

    fn update(&mut self, _frame: u32, input: &InputFrame, overlay: &mut impl Overlay2d) {
        // The drag delta between consecutive stylus samples spins the target;
        // the first sample after pen-down contributes nothing.
        match input.stylus {
            Some(pos) => {
                if let Some(last) = self.last_stylus {
                    self.target_rotation += pos.x as i32 - last.x as i32;
                }
                self.last_stylus = Some(pos);
            }
            None => self.last_stylus = None,
        }

        // Ease the wheel toward the target at a bounded rate
        let diff = self.target_rotation - self.rotation;
        let step = diff.clamp(-VALVE_ROTATION_SPEED, VALVE_ROTATION_SPEED);
        self.rotation += step;

        if !self.complete && self.rotation.abs() >= VALVE_WIN_ROTATION {
            self.complete = true;
            debug!("valve fully open");
        }

        if let Some(sprite) = self.sprite {
            overlay.set_sprite_rotation(sprite, self.rotation());
        }
    }
}

// =============================================================================
// VARIANT DISPATCH
// =============================================================================

/// Names the available minigame variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinigameKind {
    /// The valve wheel on the boiler
    Valve,
}

/// One concrete minigame. The variant set is closed, so dispatch is a match
/// rather than a trait object.
#[derive(Debug, Serialize, Deserialize)]
pub enum Minigame {
    /// Stylus-driven valve wheel
    Valve(ValveMinigame),
}

impl Minigame {
    /// Fresh instance of the given variant.
    pub fn new(kind: MinigameKind) -> Self {
        match kind {
            MinigameKind::Valve => Minigame::Valve(ValveMinigame::default()),
        }
    }

    /// Which variant this is.
    pub fn kind(&self) -> MinigameKind {
        match self {
            Minigame::Valve(_) => MinigameKind::Valve,
        }
    }

    /// Load the variant's overlay assets.
    pub fn load(&mut self, overlay: &mut impl Overlay2d) -> Result<(), AssetError> {
        match self {
            Minigame::Valve(valve) => valve.load(overlay),
        }
    }

    /// Release the variant's overlay assets.
    pub fn unload(&mut self, overlay: &mut impl Overlay2d) {
        match self {
            Minigame::Valve(valve) => valve.unload(overlay),
        }
    }

    /// Advance one frame from raw input.
    pub fn update(&mut self, frame: u32, input: &InputFrame, overlay: &mut impl Overlay2d) {
        match self {
            Minigame::Valve(valve) => valve.update(frame, input, overlay),
        }
    }

    /// Whether the variant's goal has been reached.
    pub fn is_complete(&self) -> bool {
        match self {
            Minigame::Valve(valve) => valve.is_complete(),
        }
    }
}

// =============================================================================
// SLOT
// =============================================================================

/// Holds the at-most-one active minigame and guarantees pairing: every load
/// gets exactly one unload, before any other variant loads.
#[derive(Debug, Default)]
pub struct MinigameSlot {
    active: Option<Minigame>,
}

impl MinigameSlot {
    /// The active minigame, if any.
    pub fn active(&self) -> Option<&Minigame> {
        self.active.as_ref()
    }

    /// Mutable access to the active minigame.
    pub fn active_mut(&mut self) -> Option<&mut Minigame> {
        self.active.as_mut()
    }

    /// Advance the active minigame one frame.
    ///
    /// Returns the variant's kind once it reports completion, so the host
    /// can exit the slot and react.
    pub fn update_active(
        &mut self,
        frame: u32,
        input: &InputFrame,
        overlay: &mut impl Overlay2d,
    ) -> Option<MinigameKind> {
        let game = self.active.as_mut()?;
        game.update(frame, input, overlay);
        if game.is_complete() {
            Some(game.kind())
        } else {
            None
        }
    }

    /// Enter a minigame, unloading the previous one first.
    pub fn enter(
        &mut self,
        kind: MinigameKind,
        overlay: &mut impl Overlay2d,
    ) -> Result<(), AssetError> {
        self.exit(overlay);
        let mut game = Minigame::new(kind);
        game.load(overlay)?;
        self.active = Some(game);
        Ok(())
    }

    /// Leave the active minigame, releasing its assets.
    pub fn exit(&mut self, overlay: &mut impl Overlay2d) {
        if let Some(mut game) = self.active.take() {
            game.unload(overlay);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::HeadlessConsole;
    use proptest::prelude::*;

    fn loaded_valve(console: &mut HeadlessConsole) -> ValveMinigame {
        let mut valve = ValveMinigame::default();
        valve.load(console).unwrap();
        valve
    }

    fn valve_console() -> HeadlessConsole {
        HeadlessConsole::with_assets([VALVE_SPRITE, VALVE_BACKGROUND])
    }

    #[test]
    fn test_drag_spins_the_wheel() {
        let mut console = valve_console();
        let mut valve = loaded_valve(&mut console);

        // Pen down: first sample is a reference, not a delta
        valve.update(0, &InputFrame::with_stylus(100, 90), &mut console);
        assert_eq!(valve.rotation(), 0);

        // Dragging right builds target rotation; the wheel chases at 4/frame
        valve.update(1, &InputFrame::with_stylus(140, 90), &mut console);
        assert_eq!(valve.rotation(), VALVE_ROTATION_SPEED);

        valve.update(2, &InputFrame::with_stylus(140, 90), &mut console);
        assert_eq!(valve.rotation(), 2 * VALVE_ROTATION_SPEED);
    }

    #[test]
    fn test_pen_up_resets_reference() {
        let mut console = valve_console();
        let mut valve = loaded_valve(&mut console);

        valve.update(0, &InputFrame::with_stylus(200, 90), &mut console);
        valve.update(1, &InputFrame::idle(), &mut console);
        // New pen-down far from the old position must not register a jump
        valve.update(2, &InputFrame::with_stylus(10, 90), &mut console);
        valve.update(3, &InputFrame::with_stylus(10, 90), &mut console);
        assert_eq!(valve.rotation(), 0);
    }

    #[test]
    fn test_completion_latches() {
        let mut console = valve_console();
        let mut valve = loaded_valve(&mut console);

        // Repeated right swipes (pen down at 0, drag to 100, pen up) until
        // two full turns accumulate
        let mut frame = 0u32;
        while !valve.is_complete() && frame < 5000 {
            let input = match frame % 3 {
                0 => InputFrame::with_stylus(0, 90),
                1 => InputFrame::with_stylus(100, 90),
                _ => InputFrame::idle(),
            };
            valve.update(frame, &input, &mut console);
            frame += 1;
        }
        assert!(valve.is_complete(), "valve must open eventually");

        // Swiping backwards never un-completes it
        for i in 0..500u32 {
            let input = match i % 3 {
                0 => InputFrame::with_stylus(100, 90),
                1 => InputFrame::with_stylus(0, 90),
                _ => InputFrame::idle(),
            };
            valve.update(frame + i, &input, &mut console);
            assert!(valve.is_complete());
        }
    }

    proptest! {
        #[test]
        fn prop_displayed_rotation_stays_wrapped(xs in prop::collection::vec(0u16..256, 0..200)) {
            let mut console = valve_console();
            let mut valve = loaded_valve(&mut console);
            for (i, x) in xs.iter().enumerate() {
                valve.update(i as u32, &InputFrame::with_stylus(*x, 90), &mut console);
                prop_assert!(valve.rotation() >= 0 && valve.rotation() < angle::TURN);
            }
        }
    }

    #[test]
    fn test_slot_pairs_load_and_unload() {
        let mut console = valve_console();
        let mut slot = MinigameSlot::default();

        slot.enter(MinigameKind::Valve, &mut console).unwrap();
        assert_eq!(console.live_handles(), 2);
        assert_eq!(slot.active().unwrap().kind(), MinigameKind::Valve);

        // Entering again unloads the previous instance first
        slot.enter(MinigameKind::Valve, &mut console).unwrap();
        assert_eq!(console.live_handles(), 2);

        slot.exit(&mut console);
        assert_eq!(console.live_handles(), 0);
        assert!(slot.active().is_none());

        // Exit with nothing active is a no-op
        slot.exit(&mut console);
        assert_eq!(console.live_handles(), 0);
    }

    #[test]
    fn test_slot_load_failure_leaves_slot_empty() {
        let mut console = HeadlessConsole::with_assets([VALVE_SPRITE]); // background missing
        let mut slot = MinigameSlot::default();

        assert!(slot.enter(MinigameKind::Valve, &mut console).is_err());
        assert!(slot.active().is_none());
    }
}
