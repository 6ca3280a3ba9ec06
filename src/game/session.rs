//! Game Session
//!
//! One update-then-draw per rendered frame, fully synchronous. The session
//! owns the room, the player, the minigame slot, and the RNG, and runs the
//! fixed frame order: input -> move guard -> position update -> security
//! camera -> draw -> chase camera. While a minigame is active the world is
//! frozen and input goes to the variant instead.

use tracing::{debug, info};

use crate::console::{AssetError, Console};
use crate::core::rng::GameRng;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::input::InputFrame;
use crate::game::map::Room;
use crate::game::minigame::{MinigameKind, MinigameSlot};
use crate::game::player::{MoveOutcome, Player};

/// Session parameters fixed at startup.
#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    /// Seed for the session RNG (rumble jitter)
    pub seed: u64,
    /// Print the coordinate readout on the text overlay
    pub debug_overlay: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0xC0FFEE,
            debug_overlay: false,
        }
    }
}

/// The whole game: room, player, minigame slot, and frame loop state.
#[derive(Debug)]
pub struct GameSession {
    config: SessionConfig,
    room: Room,
    player: Player,
    minigame: MinigameSlot,
    rng: GameRng,
    frame: u32,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Create a session; nothing is loaded yet.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            room: Room::default(),
            player: Player::new(),
            minigame: MinigameSlot::default(),
            rng: GameRng::new(config.seed),
            frame: 0,
            events: Vec::new(),
        }
    }

    /// Every asset path the session loads from the packaged filesystem.
    ///
    /// The headless backend uses this as its manifest; a real card build
    /// packs these files into the ROM filesystem.
    pub fn packaged_assets() -> [&'static str; 6] {
        [
            crate::game::map::ROOM_MESH,
            crate::game::map::ROOM_TEXTURE,
            crate::game::player::MESH_PATH,
            crate::game::player::TEXTURE_PATH,
            crate::game::minigame::VALVE_SPRITE,
            crate::game::minigame::VALVE_BACKGROUND,
        ]
    }

    /// The player state (read-only).
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable player access for host-side placement.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// The room.
    pub fn room(&self) -> &Room {
        &self.room
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Whether a minigame is currently active.
    pub fn minigame_active(&self) -> bool {
        self.minigame.active().is_some()
    }

    /// Load all startup assets. On failure the caller aborts; no frame may
    /// run after a failed load.
    pub fn load(&mut self, console: &mut impl Console) -> Result<(), AssetError> {
        self.room.load(console)?;
        self.player.load(console)?;
        info!("session assets loaded");
        Ok(())
    }

    /// Enter a minigame. The world freezes until it completes.
    pub fn start_minigame(
        &mut self,
        kind: MinigameKind,
        console: &mut impl Console,
    ) -> Result<(), AssetError> {
        self.minigame.enter(kind, console)?;
        self.events
            .push(GameEvent::new(self.frame, GameEventData::MinigameStarted { kind }));
        info!(?kind, "minigame started");
        Ok(())
    }

    /// Run one frame of simulation and drawing. Returns the frame's events.
    pub fn advance_frame(
        &mut self,
        input: InputFrame,
        console: &mut impl Console,
    ) -> Vec<GameEvent> {
        self.frame += 1;
        let frame = self.frame;

        if self.minigame_active() {
            if let Some(kind) = self.minigame.update_active(frame, &input, console) {
                self.minigame.exit(console);
                self.events
                    .push(GameEvent::new(frame, GameEventData::MinigameCompleted { kind }));
                info!(?kind, "minigame completed");
            }
        } else {
            self.player.handle_input(input.keys);

            if let MoveOutcome::Blocked { x, z } = self.player.plan_move(self.room.grid()) {
                // Bump feedback; the jitter is the game's only randomness
                console.set_rumble(self.rng.next_bool());
                self.events.push(GameEvent::new(
                    frame,
                    GameEventData::MoveBlocked { tile_x: x, tile_z: z },
                ));
            }

            if self.player.update(frame) {
                debug!(tile_x = self.player.tile_x, tile_z = self.player.tile_z, "tile reached");
                self.events.push(GameEvent::new(
                    frame,
                    GameEventData::TileReached {
                        tile_x: self.player.tile_x,
                        tile_z: self.player.tile_z,
                    },
                ));
            }

            self.room.update();
            if !self.player.lying_down
                && self
                    .room
                    .security_camera()
                    .can_see(self.room.grid(), self.player.position)
            {
                self.player.set_lying_down();
                info!(frame, "player caught by the security camera");
                self.events
                    .push(GameEvent::new(frame, GameEventData::PlayerCaught));
            }
        }

        self.room.draw(console);
        self.player.draw(console);
        if self.config.debug_overlay {
            self.print_coords(console);
        }
        self.room
            .update_camera(self.player.position.x, self.player.position.z, console);

        std::mem::take(&mut self.events)
    }

    /// Release every loaded asset, exactly once each.
    pub fn unload(&mut self, console: &mut impl Console) {
        self.minigame.exit(console);
        self.player.unload(console);
        self.room.unload(console);
        info!("session unloaded");
    }

    /// Coordinate readout on the text overlay, one value per line.
    fn print_coords(&self, console: &mut impl Console) {
        let (x, y, z) = self.player.position.to_floats();
        console.print(1, 1, &format!("x: {:.1}, y: {:.1}, z: {:.1}", x, y, z));
        console.print(
            1,
            2,
            &format!(
                "tileX: {} ({}), tileZ: {} ({})",
                self.player.tile_x, self.player.target_x, self.player.tile_z, self.player.target_z
            ),
        );
        console.print(
            1,
            3,
            &format!("tileType: {:?}", self.player.current_tile(self.room.grid())),
        );
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{ConsoleCall, HeadlessConsole};
    use crate::game::input::{InputFrame, KeyState};

    fn demo_console() -> HeadlessConsole {
        HeadlessConsole::with_assets(GameSession::packaged_assets())
    }

    fn loaded_session() -> (GameSession, HeadlessConsole) {
        let mut console = demo_console();
        let mut session = GameSession::new(SessionConfig::default());
        session.load(&mut console).unwrap();
        (session, console)
    }

    #[test]
    fn test_load_failure_reports_asset() {
        let mut console = HeadlessConsole::with_assets(["model/boiler_room.dl"]);
        let mut session = GameSession::new(SessionConfig::default());
        assert!(matches!(
            session.load(&mut console),
            Err(AssetError::Missing { .. })
        ));
    }

    #[test]
    fn test_walk_emits_tile_reached() {
        let (mut session, mut console) = loaded_session();
        let right = InputFrame::with_keys(KeyState::RIGHT);

        let mut reached = None;
        for _ in 0..60 {
            let events = session.advance_frame(right, &mut console);
            if let Some(event) = events
                .iter()
                .find(|e| matches!(e.data, GameEventData::TileReached { .. }))
            {
                reached = Some(event.data);
                break;
            }
        }
        assert_eq!(
            reached,
            Some(GameEventData::TileReached { tile_x: 2, tile_z: 1 })
        );
    }

    #[test]
    fn test_bump_emits_block_and_rumble() {
        let (mut session, mut console) = loaded_session();
        let left = InputFrame::with_keys(KeyState::LEFT);

        let events = session.advance_frame(left, &mut console);
        assert!(events
            .iter()
            .any(|e| e.data == GameEventData::MoveBlocked { tile_x: 0, tile_z: 1 }));
        assert!(console
            .calls
            .iter()
            .any(|c| matches!(c, ConsoleCall::RumbleSet(_))));
    }

    #[test]
    fn test_minigame_freezes_world_and_completes() {
        let (mut session, mut console) = loaded_session();

        session
            .start_minigame(MinigameKind::Valve, &mut console)
            .unwrap();
        assert!(session.minigame_active());
        let tile_before = (session.player().tile_x, session.player().tile_z);

        // Held direction keys do nothing while the valve is up; swipes do
        let mut completed = false;
        let mut frame = 0u32;
        while !completed && frame < 5000 {
            let mut input = match frame % 3 {
                0 => InputFrame::with_stylus(0, 90),
                1 => InputFrame::with_stylus(100, 90),
                _ => InputFrame::idle(),
            };
            input.keys = KeyState::from_bits(KeyState::RIGHT);
            let events = session.advance_frame(input, &mut console);
            completed = events
                .iter()
                .any(|e| matches!(e.data, GameEventData::MinigameCompleted { .. }));
            frame += 1;
        }

        assert!(completed, "valve must complete");
        assert!(!session.minigame_active());
        assert_eq!(
            (session.player().tile_x, session.player().tile_z),
            tile_before,
            "world must stay frozen during the minigame"
        );

        // Valve overlay assets were released; room + player remain
        assert_eq!(console.live_handles(), 4);
    }

    #[test]
    fn test_camera_catches_exposed_player() {
        let (mut session, mut console) = loaded_session();

        // Stand in the sweep of the corner camera
        session.player_mut().tile_x = 5;
        session.player_mut().tile_z = 6;
        session.player_mut().target_x = 5;
        session.player_mut().target_z = 6;
        session.player_mut().position = crate::core::vec3::FixedVec3::new(
            crate::game::map::world_x(5),
            crate::core::fixed::to_fixed(0.4),
            crate::game::map::world_z(6),
        );

        let mut caught = false;
        for _ in 0..600 {
            let events = session.advance_frame(InputFrame::idle(), &mut console);
            if events.iter().any(|e| e.data == GameEventData::PlayerCaught) {
                caught = true;
                break;
            }
        }
        assert!(caught, "sweep must spot a player standing in the open");
        assert!(session.player().lying_down);

        // Once down, held keys no longer move the player
        let tile = (session.player().tile_x, session.player().tile_z);
        for _ in 0..30 {
            session.advance_frame(InputFrame::with_keys(KeyState::UP), &mut console);
        }
        assert_eq!((session.player().tile_x, session.player().tile_z), tile);
    }

    #[test]
    fn test_unload_releases_everything() {
        let (mut session, mut console) = loaded_session();
        session
            .start_minigame(MinigameKind::Valve, &mut console)
            .unwrap();

        session.unload(&mut console);
        assert_eq!(console.live_handles(), 0);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let script: Vec<InputFrame> = (0..120)
            .map(|i| {
                if i < 30 {
                    InputFrame::with_keys(KeyState::LEFT)
                } else if i < 90 {
                    InputFrame::with_keys(KeyState::RIGHT)
                } else {
                    InputFrame::with_keys(KeyState::UP)
                }
            })
            .collect();

        let run = |seed: u64| {
            let mut console = demo_console();
            let mut session = GameSession::new(SessionConfig {
                seed,
                ..SessionConfig::default()
            });
            session.load(&mut console).unwrap();
            for input in &script {
                session.advance_frame(*input, &mut console);
            }
            let rumbles: Vec<bool> = console
                .calls
                .iter()
                .filter_map(|c| match c {
                    ConsoleCall::RumbleSet(on) => Some(*on),
                    _ => None,
                })
                .collect();
            (
                session.player().tile_x,
                session.player().tile_z,
                session.player().position,
                rumbles,
            )
        };

        assert_eq!(run(42), run(42));
    }
}
