//! Security Camera
//!
//! A ceiling-mounted camera sweeping its view angle back and forth across
//! the room. Detection is pure geometry over the grid: the player must be
//! inside the view cone, within range, and not hidden behind a wall. The
//! session decides what a catch means (it puts the player on the floor).

use tracing::debug;

use crate::core::angle;
use crate::core::fixed::{fixed_mul, from_int, to_fixed, Fixed};
use crate::core::vec3::FixedVec3;
use crate::game::map::{tile_x_of, tile_z_of, world_x, world_z, Tile, TileGrid};

/// Sweep speed in angle units per frame.
const SWEEP_SPEED: i32 = 1;

/// Half of the view cone, in angle units (~22 degrees).
const HALF_FOV: i32 = 32;

/// Detection range in world units (~5 tiles).
const RANGE: Fixed = from_int(14);

/// Interior samples taken along the line of sight.
const LOS_STEPS: i32 = 8;

/// Mounting height above the floor.
const MOUNT_HEIGHT: Fixed = to_fixed(2.5);

/// The sweeping security camera.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecurityCamera {
    position: FixedVec3,
    yaw: i32,
    sweep_dir: i32,
    min_yaw: i32,
    max_yaw: i32,
}

impl Default for SecurityCamera {
    fn default() -> Self {
        // Mounted over the floor cell in the far right corner, sweeping the
        // open half of the room.
        Self::new(
            FixedVec3::new(world_x(8), MOUNT_HEIGHT, world_z(6)),
            -110,
            30,
        )
    }
}

impl SecurityCamera {
    /// Create a camera at `position` sweeping between the two yaw bounds.
    pub fn new(position: FixedVec3, min_yaw: i32, max_yaw: i32) -> Self {
        Self {
            position,
            yaw: min_yaw,
            sweep_dir: 1,
            min_yaw,
            max_yaw,
        }
    }

    /// Current view angle in hardware units.
    pub fn yaw(&self) -> i32 {
        self.yaw
    }

    /// Advance the sweep one frame, reversing at the bounds.
    pub fn update(&mut self) {
        self.yaw += self.sweep_dir * SWEEP_SPEED;
        if self.yaw >= self.max_yaw {
            self.yaw = self.max_yaw;
            self.sweep_dir = -1;
        } else if self.yaw <= self.min_yaw {
            self.yaw = self.min_yaw;
            self.sweep_dir = 1;
        }
    }

    /// Whether the camera sees a target standing at `target` on the grid.
    ///
    /// Cone membership is tested with a dot product against the squared
    /// cosine of the half-FOV, so no arc tangent is ever needed.
    pub fn can_see(&self, grid: &TileGrid, target: FixedVec3) -> bool {
        let dx = target.x.wrapping_sub(self.position.x);
        let dz = target.z.wrapping_sub(self.position.z);

        let dist_sq = fixed_mul(dx, dx).wrapping_add(fixed_mul(dz, dz));
        if dist_sq > fixed_mul(RANGE, RANGE) {
            return false;
        }

        // In front of the lens and inside the cone:
        // dot(dir, v) >= |v| * cos(half_fov)  <=>  dot^2 >= |v|^2 * cos^2
        let dot = fixed_mul(dx, angle::cos(self.yaw))
            .wrapping_add(fixed_mul(dz, angle::sin(self.yaw)));
        if dot <= 0 {
            return false;
        }
        let cos_fov = angle::cos(HALF_FOV);
        if fixed_mul(dot, dot) < fixed_mul(fixed_mul(cos_fov, cos_fov), dist_sq) {
            return false;
        }

        // Line of sight: sample the segment and reject if a wall intervenes
        for i in 1..LOS_STEPS {
            let sx = self.position.x.wrapping_add(dx.wrapping_mul(i) / LOS_STEPS);
            let sz = self.position.z.wrapping_add(dz.wrapping_mul(i) / LOS_STEPS);
            if grid.tile_at(tile_x_of(sx), tile_z_of(sz)) == Tile::Wall {
                return false;
            }
        }

        debug!(yaw = self.yaw, "security camera has line of sight");
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Camera pinned at a fixed view angle (min == max stops the sweep).
    fn camera_at(tile_x: i32, tile_z: i32, yaw: i32) -> SecurityCamera {
        SecurityCamera::new(
            FixedVec3::new(world_x(tile_x), MOUNT_HEIGHT, world_z(tile_z)),
            yaw,
            yaw,
        )
    }

    fn standing_at(tile_x: i32, tile_z: i32) -> FixedVec3 {
        FixedVec3::new(world_x(tile_x), to_fixed(0.4), world_z(tile_z))
    }

    #[test]
    fn test_sweep_reverses_at_bounds() {
        let mut cam = SecurityCamera::new(FixedVec3::ZERO, -10, 10);
        let mut seen_max = false;
        let mut seen_min_again = false;

        for _ in 0..60 {
            cam.update();
            assert!(cam.yaw() >= -10 && cam.yaw() <= 10);
            if cam.yaw() == 10 {
                seen_max = true;
            }
            if seen_max && cam.yaw() == -10 {
                seen_min_again = true;
            }
        }
        assert!(seen_max && seen_min_again, "sweep must reach both bounds");
    }

    #[test]
    fn test_sees_target_straight_ahead() {
        let grid = TileGrid::default();
        // Columns run in negative world X, so yaw 0 (+X) looks from higher
        // columns toward lower ones.
        let cam = camera_at(7, 5, 0);
        assert!(cam.can_see(&grid, standing_at(5, 5)));
    }

    #[test]
    fn test_does_not_see_behind() {
        let grid = TileGrid::default();
        let cam = camera_at(5, 5, 0);
        // Target at a higher column is behind a yaw-0 camera
        assert!(!cam.can_see(&grid, standing_at(7, 5)));
    }

    #[test]
    fn test_does_not_see_outside_cone() {
        let grid = TileGrid::default();
        let cam = camera_at(7, 1, 0);
        // Same distance but far off-axis (several rows up)
        assert!(!cam.can_see(&grid, standing_at(6, 6)));
    }

    #[test]
    fn test_wall_blocks_line_of_sight() {
        let grid = TileGrid::default();
        // Rows 2-4 have a wall block in columns 3-6. Looking from (2,3)
        // toward (7,3) crosses it (yaw TURN/2 = -X = toward higher columns).
        let cam = camera_at(2, 3, angle::TURN / 2);
        assert!(!cam.can_see(&grid, standing_at(7, 3)));
    }

    #[test]
    fn test_out_of_range() {
        let grid = TileGrid::default();
        let cam = camera_at(9, 0, 0);
        // Opposite corner is beyond RANGE
        assert!(!cam.can_see(&grid, standing_at(0, 7)));
    }
}
