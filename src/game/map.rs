//! Boiler Room Map
//!
//! The static tile grid, its projection into engine world space, and the
//! room entity that owns the mesh, the security camera, and the chase-camera
//! framing. Grid lookups are total: any coordinate outside the room is
//! [`Tile::Void`], which is a defined answer, not an error.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::console::{
    AssetError, DrawState, Gfx3d, MaterialProps, MeshId, Rgb15, TextureFormat, TextureId,
};
use crate::core::fixed::{to_fixed, Fixed, FIXED_HALF, FIXED_SCALE};
use crate::core::vec3::FixedVec3;
use crate::game::camera::SecurityCamera;

/// Grid columns (X axis).
pub const GRID_COLS: i32 = 10;

/// Grid rows (Z axis).
pub const GRID_ROWS: i32 = 9;

/// Tile kind for one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    /// Traversable floor
    Floor,
    /// Blocking wall
    Wall,
    /// Outside the room bounds
    Void,
}

use Tile::{Floor as F, Wall as W};

/// The boiler room floor plan, row-major, indexed `[z][x]`.
const ROOM_TILES: [[Tile; GRID_COLS as usize]; GRID_ROWS as usize] = [
    [F, F, F, F, F, F, F, F, F, F],
    [W, F, F, F, F, F, F, F, F, W],
    [W, F, F, W, W, W, F, F, F, W],
    [W, F, F, W, W, W, W, F, F, W],
    [W, F, F, W, W, W, W, F, F, W],
    [W, F, F, F, F, F, F, F, F, W],
    [W, F, F, F, F, F, F, F, F, W],
    [W, W, F, F, F, F, F, W, W, W],
    [W, W, W, W, W, W, W, W, W, W],
];

// =============================================================================
// WORLD PROJECTION
// =============================================================================

// The room mesh was modelled with its origin off-center, so tile (0,0)
// projects to (-1.3, 1.9) and the X axis runs negative across columns.
const WORLD_X_ORIGIN: Fixed = to_fixed(-1.3);
const WORLD_X_STEP: Fixed = to_fixed(-2.6);
const WORLD_Z_ORIGIN: Fixed = to_fixed(1.9);
const WORLD_Z_STEP: Fixed = to_fixed(2.4);

/// World X of a tile column center.
#[inline]
pub fn world_x(tile_x: i32) -> Fixed {
    WORLD_X_ORIGIN.wrapping_add(WORLD_X_STEP.wrapping_mul(tile_x))
}

/// World Z of a tile row center.
#[inline]
pub fn world_z(tile_z: i32) -> Fixed {
    WORLD_Z_ORIGIN.wrapping_add(WORLD_Z_STEP.wrapping_mul(tile_z))
}

/// Nearest tile column for a world X.
#[inline]
pub fn tile_x_of(x: Fixed) -> i32 {
    nearest_step(x.wrapping_sub(WORLD_X_ORIGIN), WORLD_X_STEP)
}

/// Nearest tile row for a world Z.
#[inline]
pub fn tile_z_of(z: Fixed) -> i32 {
    nearest_step(z.wrapping_sub(WORLD_Z_ORIGIN), WORLD_Z_STEP)
}

/// Round `offset / step` to the nearest integer.
fn nearest_step(offset: Fixed, step: Fixed) -> i32 {
    let q = crate::core::fixed::fixed_div(offset, step);
    q.wrapping_add(FIXED_HALF) >> FIXED_SCALE
}

// =============================================================================
// TILE GRID
// =============================================================================

/// Immutable rectangular grid of tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    tiles: [[Tile; GRID_COLS as usize]; GRID_ROWS as usize],
}

impl Default for TileGrid {
    fn default() -> Self {
        Self { tiles: ROOM_TILES }
    }
}

impl TileGrid {
    /// Build a grid from explicit tile data (tests use custom layouts).
    pub const fn from_tiles(tiles: [[Tile; GRID_COLS as usize]; GRID_ROWS as usize]) -> Self {
        Self { tiles }
    }

    /// Tile at `(x, z)`. Out-of-bounds coordinates are [`Tile::Void`].
    #[inline]
    pub fn tile_at(&self, x: i32, z: i32) -> Tile {
        if x < 0 || x >= GRID_COLS || z < 0 || z >= GRID_ROWS {
            return Tile::Void;
        }
        self.tiles[z as usize][x as usize]
    }
}

// =============================================================================
// ROOM ENTITY
// =============================================================================

pub(crate) const ROOM_MESH: &str = "model/boiler_room.dl";
pub(crate) const ROOM_TEXTURE: &str = "model/boiler_room_tex.bin";

const ROOM_MATERIAL: MaterialProps = MaterialProps {
    diffuse: Rgb15::new(20, 20, 20),
    ambient: Rgb15::new(11, 10, 9),
    specular: Rgb15::new(0, 0, 0),
    emission: Rgb15::new(0, 0, 0),
    vertex_color: false,
    shininess_table: false,
};

const ROOM_DRAW_STATE: DrawState = DrawState {
    alpha: 31,
    poly_id: 0,
    fog: true,
    toon_highlight: false,
};

// Chase camera offsets relative to the player.
const CAMERA_HEIGHT: Fixed = to_fixed(6.5);
const CAMERA_BACK: Fixed = to_fixed(-4.0);

/// The room: grid, mesh, security camera, and chase-camera glue.
///
/// Owns its engine handles exclusively and releases them exactly once.
#[derive(Debug, Default)]
pub struct Room {
    grid: TileGrid,
    security_camera: SecurityCamera,
    mesh: Option<MeshId>,
    texture: Option<TextureId>,
}

impl Room {
    /// The room's tile grid.
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// The wall-mounted security camera.
    pub fn security_camera(&self) -> &SecurityCamera {
        &self.security_camera
    }

    /// Advance per-frame room state (the security camera sweep).
    pub fn update(&mut self) {
        self.security_camera.update();
    }

    /// Load the room mesh and texture from the packaged filesystem.
    pub fn load(&mut self, gfx: &mut impl Gfx3d) -> Result<(), AssetError> {
        let mesh = gfx.load_mesh(ROOM_MESH)?;
        let texture = gfx.load_texture(ROOM_TEXTURE, TextureFormat::A1Rgb5, 128, 128)?;

        gfx.set_mesh_material(mesh, texture);
        gfx.set_material_props(texture, ROOM_MATERIAL);
        gfx.set_position(mesh, FixedVec3::ZERO);

        self.mesh = Some(mesh);
        self.texture = Some(texture);
        debug!("room loaded");
        Ok(())
    }

    /// Submit the room mesh for this frame.
    pub fn draw(&self, gfx: &mut impl Gfx3d) {
        if let Some(mesh) = self.mesh {
            gfx.set_draw_state(ROOM_DRAW_STATE);
            gfx.draw_mesh(mesh);
        }
    }

    /// Re-frame the chase camera relative to the player.
    pub fn update_camera(&self, player_x: Fixed, player_z: Fixed, gfx: &mut impl Gfx3d) {
        let eye = FixedVec3::new(player_x, CAMERA_HEIGHT, player_z.wrapping_add(CAMERA_BACK));
        let target = FixedVec3::new(player_x, 0, player_z);
        gfx.set_camera(eye, target);
    }

    /// Release the room's engine handles.
    pub fn unload(&mut self, gfx: &mut impl Gfx3d) {
        if let Some(mesh) = self.mesh.take() {
            gfx.free_mesh(mesh);
        }
        if let Some(texture) = self.texture.take() {
            gfx.free_texture(texture);
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

    #[test]
    fn test_in_bounds_lookup() {
        let grid = TileGrid::default();

        // Row 0 is open floor, row 8 is solid wall
        for x in 0..GRID_COLS {
            assert_eq!(grid.tile_at(x, 0), Tile::Floor);
            assert_eq!(grid.tile_at(x, 8), Tile::Wall);
        }

        // Row 1 = {WALL, FLOOR x 8, WALL}
        assert_eq!(grid.tile_at(0, 1), Tile::Wall);
        for x in 1..9 {
            assert_eq!(grid.tile_at(x, 1), Tile::Floor);
        }
        assert_eq!(grid.tile_at(9, 1), Tile::Wall);
    }

    #[test]
    fn test_custom_layout() {
        // An all-wall room except one floor cell
        let mut tiles = [[Tile::Wall; GRID_COLS as usize]; GRID_ROWS as usize];
        tiles[4][5] = Tile::Floor;
        let grid = TileGrid::from_tiles(tiles);

        assert_eq!(grid.tile_at(5, 4), Tile::Floor);
        assert_eq!(grid.tile_at(4, 5), Tile::Wall);
        assert_eq!(grid.tile_at(-1, 4), Tile::Void);
    }

    #[test]
    fn test_lookup_idempotent() {
        let grid = TileGrid::default();
        for z in 0..GRID_ROWS {
            for x in 0..GRID_COLS {
                assert_eq!(grid.tile_at(x, z), grid.tile_at(x, z));
            }
        }
    }

    proptest! {
        #[test]
        fn prop_out_of_bounds_is_void(x in -1000i32..1000, z in -1000i32..1000) {
            prop_assume!(x < 0 || x >= GRID_COLS || z < 0 || z >= GRID_ROWS);
            let grid = TileGrid::default();
            prop_assert_eq!(grid.tile_at(x, z), Tile::Void);
        }

        #[test]
        fn prop_projection_round_trips(tx in -20i32..20, tz in -20i32..20) {
            prop_assert_eq!(tile_x_of(world_x(tx)), tx);
            prop_assert_eq!(tile_z_of(world_z(tz)), tz);
        }
    }

    #[test]
    fn test_projection_constants() {
        assert_eq!(world_x(0), to_fixed(-1.3));
        assert_eq!(world_z(0), to_fixed(1.9));
        // Columns run in negative X, rows in positive Z
        assert!(world_x(1) < world_x(0));
        assert!(world_z(1) > world_z(0));
    }

    #[test]
    fn test_room_load_unload_pairing() {
        let mut console = HeadlessConsole::with_assets([ROOM_MESH, ROOM_TEXTURE]);
        let mut room = Room::default();

        room.load(&mut console).unwrap();
        assert_eq!(console.live_handles(), 2);

        room.unload(&mut console);
        assert_eq!(console.live_handles(), 0);

        // A second unload must not double-free
        room.unload(&mut console);
        assert_eq!(console.live_handles(), 0);
    }

    #[test]
    fn test_room_load_failure() {
        let mut console = HeadlessConsole::with_assets([ROOM_MESH]); // texture missing
        let mut room = Room::default();

        let err = room.load(&mut console).unwrap_err();
        assert!(matches!(err, AssetError::Missing { .. }));
    }
}
