//! Player Movement State Machine
//!
//! Grid-cell movement with per-frame interpolation: input picks a facing,
//! the move guard validates the next cell against the grid, and the update
//! step walks the continuous position toward the target cell's world
//! projection until it snaps. The state machine is pure data; everything the
//! engine needs to see goes through [`Player::draw`].
//!
//! State invariant: when not walking, `(tile_x, tile_z) == (target_x,
//! target_z)`. While walking, exactly one axis differs by one cell.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::console::{
    AssetError, DrawState, Gfx3d, MaterialProps, MeshId, Rgb15, TextureFormat, TextureId,
};
use crate::core::angle::{self, QUARTER_TURN};
use crate::core::fixed::{
    fixed_div, fixed_min, fixed_mul, from_int, to_fixed, Fixed,
};
use crate::core::vec3::FixedVec3;
use crate::game::input::KeyState;
use crate::game::map::{world_x, world_z, Tile, TileGrid};

pub(crate) const MESH_PATH: &str = "model/janitor.dl";
pub(crate) const TEXTURE_PATH: &str = "model/janitor_tex.bin";

const MATERIAL: MaterialProps = MaterialProps {
    diffuse: Rgb15::new(20, 20, 20),
    ambient: Rgb15::new(11, 10, 9),
    specular: Rgb15::new(0, 0, 0),
    emission: Rgb15::new(0, 0, 0),
    vertex_color: false,
    shininess_table: false,
};

const MODEL_SCALE: Fixed = to_fixed(1.35);

/// Distance covered per frame while walking.
const WALK_SPEED: Fixed = to_fixed(0.125);

/// Arrival tolerance around a cell's projection. At least half a step: the
/// final frame can overshoot the projection by at most `WALK_SPEED / 2`.
const SNAP_TOLERANCE: Fixed = to_fixed(0.0625);

/// Model turn rate in angle units per frame.
const TURN_SPEED: i32 = 20;

/// Stop turning once within this many angle units of the facing angle.
const TURN_THRESHOLD: i32 = 10;

/// Walking bob amplitude.
const BOB_AMPLITUDE: Fixed = to_fixed(0.06);

/// Bob phase advance per frame (512 units per full bob cycle).
const BOB_PHASE_STEP: i32 = 27;

/// The bob keeps the model's height inside this band.
const BOB_MIN_Y: Fixed = to_fixed(0.4);
const BOB_MAX_Y: Fixed = to_fixed(0.8);

/// Standing height above the floor.
const STAND_Y: Fixed = to_fixed(0.4);

/// Starting cell (must be floor).
const START_TILE_X: i32 = 1;
const START_TILE_Z: i32 = 1;

/// One-time offset applied when the player goes down.
const LYING_OFFSET: FixedVec3 = FixedVec3::new(0, to_fixed(0.3), to_fixed(-2.0));

/// Shadow disc: segment count, base radius, ring height, lying-down shift.
const SHADOW_SEGMENTS: i32 = 12;
const SHADOW_RADIUS: Fixed = to_fixed(0.85);
const SHADOW_HEIGHT: Fixed = to_fixed(0.6);
const SHADOW_LYING_SHIFT: Fixed = to_fixed(1.5);

/// Frames for the lying-down shadow to grow one world unit.
const SHADOW_GROWTH_FRAMES: i32 = 500;

// =============================================================================
// DIRECTION
// =============================================================================

/// Axis-aligned facing, in input-priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Negative X axis (grid), decreasing column
    Left = 0,
    /// Negative Z axis, decreasing row
    Down = 1,
    /// Positive X axis, increasing column
    Right = 2,
    /// Positive Z axis, increasing row
    Up = 3,
}

impl Direction {
    /// Model yaw for this facing, in hardware angle units.
    #[inline]
    pub fn angle(self) -> i32 {
        (self as i32 + 1) * QUARTER_TURN
    }

    /// Grid step `(dx, dz)` for this facing.
    #[inline]
    pub fn step(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Down => (0, -1),
            Direction::Right => (1, 0),
            Direction::Up => (0, 1),
        }
    }
}

// =============================================================================
// MOVE OUTCOME
// =============================================================================

/// Result of the move guard for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Not walking; nothing to validate.
    Idle,
    /// Candidate cell is floor; it is now the target.
    Committed {
        /// Committed target column
        x: i32,
        /// Committed target row
        z: i32,
    },
    /// Candidate cell is wall or void; walk cancelled.
    Blocked {
        /// Rejected candidate column
        x: i32,
        /// Rejected candidate row
        z: i32,
    },
}

// =============================================================================
// PLAYER
// =============================================================================

/// The player: grid cell, interpolated position, facing, and model handles.
#[derive(Debug, Serialize, Deserialize)]
pub struct Player {
    /// Current cell column
    pub tile_x: i32,
    /// Current cell row
    pub tile_z: i32,
    /// Destination cell column
    pub target_x: i32,
    /// Destination cell row
    pub target_z: i32,
    /// Continuous world position
    pub position: FixedVec3,
    /// Current facing
    pub facing: Direction,
    /// Set while a walk is in progress this frame
    pub walking: bool,
    /// Terminal sub-state: face down on the floor
    pub lying_down: bool,
    /// Frames spent lying down
    pub lying_down_frames: u32,
    /// Model yaw in hardware angle units
    pub rotation: i32,

    #[serde(skip)]
    mesh: Option<MeshId>,
    #[serde(skip)]
    texture: Option<TextureId>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Player standing idle on the starting cell.
    pub fn new() -> Self {
        let facing = Direction::Down;
        Self {
            tile_x: START_TILE_X,
            tile_z: START_TILE_Z,
            target_x: START_TILE_X,
            target_z: START_TILE_Z,
            position: FixedVec3::new(world_x(START_TILE_X), STAND_Y, world_z(START_TILE_Z)),
            facing,
            walking: false,
            lying_down: false,
            lying_down_frames: 0,
            rotation: facing.angle(),
            mesh: None,
            texture: None,
        }
    }

    /// Apply one frame of held keys.
    ///
    /// Directions are checked in the fixed order LEFT, DOWN, RIGHT, UP and
    /// the last satisfied arm wins. A direction is taken only when the player
    /// is not mid-cell or it matches the current facing (which continues the
    /// walk).
    pub fn handle_input(&mut self, keys: KeyState) {
        let mid_cell = self.target_x != self.tile_x || self.target_z != self.tile_z;
        self.walking = false;

        if keys.held(KeyState::LEFT) && (!mid_cell || self.facing == Direction::Left) {
            self.facing = Direction::Left;
            self.walking = true;
        }
        if keys.held(KeyState::DOWN) && (!mid_cell || self.facing == Direction::Down) {
            self.facing = Direction::Down;
            self.walking = true;
        }
        if keys.held(KeyState::RIGHT) && (!mid_cell || self.facing == Direction::Right) {
            self.facing = Direction::Right;
            self.walking = true;
        }
        if keys.held(KeyState::UP) && (!mid_cell || self.facing == Direction::Up) {
            self.facing = Direction::Up;
            self.walking = true;
        }
    }

    /// Move guard: validate the cell one step along the facing axis.
    ///
    /// Runs before the position update. A wall or void candidate cancels the
    /// walk and leaves the target on the current cell; the caller decides
    /// what a bump feels like (rumble).
    pub fn plan_move(&mut self, grid: &TileGrid) -> MoveOutcome {
        if !self.walking {
            return MoveOutcome::Idle;
        }

        let (dx, dz) = self.facing.step();
        self.target_x = self.tile_x + dx;
        self.target_z = self.tile_z + dz;

        match grid.tile_at(self.target_x, self.target_z) {
            Tile::Wall | Tile::Void => {
                let (x, z) = (self.target_x, self.target_z);
                self.target_x = self.tile_x;
                self.target_z = self.tile_z;
                self.walking = false;
                debug!(x, z, "move blocked");
                MoveOutcome::Blocked { x, z }
            }
            Tile::Floor => MoveOutcome::Committed {
                x: self.target_x,
                z: self.target_z,
            },
        }
    }

    /// Advance one frame: ease the model yaw, then walk the continuous
    /// position toward the target cell's projection and snap on arrival.
    ///
    /// Returns true on the frame the player arrives on a new cell.
    pub fn update(&mut self, frame: u32) -> bool {
        // Ease the model toward its facing angle (cosmetic only)
        let target_angle = self.facing.angle();
        if (target_angle - self.rotation).abs() > TURN_THRESHOLD {
            self.rotation += if target_angle > self.rotation {
                TURN_SPEED
            } else {
                -TURN_SPEED
            };
        }

        if self.lying_down {
            self.lying_down_frames = self.lying_down_frames.saturating_add(1);
            return false;
        }

        let goal_x = world_x(self.target_x);
        let goal_z = world_z(self.target_z);

        // Bob up and down while walking, reversing at the band edges
        let phase = (frame as i32).wrapping_mul(BOB_PHASE_STEP);
        let mut dy = fixed_mul(angle::sin(phase), BOB_AMPLITUDE);
        let bobbed = self.position.y.wrapping_add(dy);
        if bobbed > BOB_MAX_Y || bobbed < BOB_MIN_Y {
            dy = -dy;
        }

        if goal_x > self.position.x.wrapping_add(SNAP_TOLERANCE) {
            self.translate(WALK_SPEED, dy, 0);
        } else if goal_x < self.position.x.wrapping_sub(SNAP_TOLERANCE) {
            self.translate(-WALK_SPEED, dy, 0);
        } else if goal_z > self.position.z.wrapping_add(SNAP_TOLERANCE) {
            self.translate(0, dy, WALK_SPEED);
        } else if goal_z < self.position.z.wrapping_sub(SNAP_TOLERANCE) {
            self.translate(0, dy, -WALK_SPEED);
        } else {
            let arrived = self.tile_x != self.target_x || self.tile_z != self.target_z;
            self.tile_x = self.target_x;
            self.tile_z = self.target_z;
            return arrived;
        }
        false
    }

    /// Put the player face down on the floor. Freezes grid movement and
    /// applies the position offset once; repeated calls are no-ops.
    pub fn set_lying_down(&mut self) {
        if self.lying_down {
            return;
        }
        self.lying_down = true;
        self.facing = Direction::Down;
        self.position = self.position.add(LYING_OFFSET);
        debug!("player is down");
    }

    /// Tile kind under the player's current cell.
    pub fn current_tile(&self, grid: &TileGrid) -> Tile {
        grid.tile_at(self.tile_x, self.tile_z)
    }

    fn translate(&mut self, dx: Fixed, dy: Fixed, dz: Fixed) {
        self.position = self.position.add(FixedVec3::new(dx, dy, dz));
    }

    // =========================================================================
    // RENDER GLUE
    // =========================================================================

    /// Load the model and texture from the packaged filesystem.
    pub fn load(&mut self, gfx: &mut impl Gfx3d) -> Result<(), AssetError> {
        let mesh = gfx.load_mesh(MESH_PATH)?;
        let texture = gfx.load_texture(TEXTURE_PATH, TextureFormat::A1Rgb5, 128, 128)?;

        gfx.set_mesh_material(mesh, texture);
        gfx.set_material_props(texture, MATERIAL);
        gfx.set_scale(mesh, MODEL_SCALE);
        gfx.set_rotation(mesh, 0, self.rotation, 0);
        gfx.set_position(mesh, self.position);

        self.mesh = Some(mesh);
        self.texture = Some(texture);
        debug!("player model loaded");
        Ok(())
    }

    /// Submit shadow and model for this frame.
    pub fn draw(&self, gfx: &mut impl Gfx3d) {
        let Some(mesh) = self.mesh else {
            return;
        };

        gfx.set_rotation(
            mesh,
            if self.lying_down { QUARTER_TURN } else { 0 },
            self.rotation,
            0,
        );
        gfx.set_position(mesh, self.position);

        gfx.set_draw_state(DrawState {
            alpha: if self.lying_down { 26 } else { 16 },
            poly_id: 8,
            fog: true,
            toon_highlight: false,
        });
        self.draw_shadow(gfx);

        gfx.set_draw_state(DrawState {
            alpha: 31,
            poly_id: 8,
            fog: true,
            toon_highlight: true,
        });
        gfx.draw_mesh(mesh);
    }

    /// Release the model handles.
    pub fn unload(&mut self, gfx: &mut impl Gfx3d) {
        if let Some(mesh) = self.mesh.take() {
            gfx.free_mesh(mesh);
        }
        if let Some(texture) = self.texture.take() {
            gfx.free_texture(texture);
        }
    }

    /// Current shadow radius; grows while lying down, capped at double.
    fn shadow_radius(&self) -> Fixed {
        if self.lying_down {
            let grown = fixed_div(
                from_int(self.lying_down_frames as i32),
                from_int(SHADOW_GROWTH_FRAMES),
            );
            SHADOW_RADIUS + fixed_min(SHADOW_RADIUS, grown)
        } else {
            SHADOW_RADIUS
        }
    }

    /// Fan of flat triangles approximating a circle under the model.
    fn draw_shadow(&self, gfx: &mut impl Gfx3d) {
        let radius = self.shadow_radius();
        let color = if self.lying_down {
            Rgb15::RED
        } else {
            Rgb15::BLACK
        };
        let center_z = if self.lying_down {
            self.position.z.wrapping_add(SHADOW_LYING_SHIFT)
        } else {
            self.position.z
        };

        let mut points = [FixedVec3::ZERO; SHADOW_SEGMENTS as usize];
        for (i, point) in points.iter_mut().enumerate() {
            let a = (i as i32 * angle::TURN) / SHADOW_SEGMENTS;
            *point = FixedVec3::new(
                self.position.x.wrapping_add(fixed_mul(radius, angle::cos(a))),
                SHADOW_HEIGHT,
                center_z.wrapping_add(fixed_mul(radius, angle::sin(a))),
            );
        }

        for i in 1..(SHADOW_SEGMENTS as usize - 1) {
            gfx.draw_triangle([points[0], points[i], points[i + 1]], color);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
