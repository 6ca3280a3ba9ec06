//! Fixed-Point 3D Vector
//!
//! World-space positions and offsets for the room, the player, and the
//! ad-hoc shadow geometry. All components are Q16.16.

use std::fmt;
use serde::{Deserialize, Serialize};

use super::fixed::{to_float, Fixed};

/// 3D vector with fixed-point components.
///
/// Axis convention follows the engine: X across the room, Y up, Z into it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FixedVec3 {
    /// X component (Q16.16 fixed-point)
    pub x: Fixed,
    /// Y component (Q16.16 fixed-point)
    pub y: Fixed,
    /// Z component (Q16.16 fixed-point)
    pub z: Fixed,
}

impl FixedVec3 {
    /// Zero vector
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    /// Create a new vector from fixed-point components.
    #[inline]
    pub const fn new(x: Fixed, y: Fixed, z: Fixed) -> Self {
        Self { x, y, z }
    }

    /// Add another vector.
    #[inline]
    pub fn add(self, other: Self) -> Self {
        Self {
            x: self.x.wrapping_add(other.x),
            y: self.y.wrapping_add(other.y),
            z: self.z.wrapping_add(other.z),
        }
    }

    /// Subtract another vector.
    #[inline]
    pub fn sub(self, other: Self) -> Self {
        Self {
            x: self.x.wrapping_sub(other.x),
            y: self.y.wrapping_sub(other.y),
            z: self.z.wrapping_sub(other.z),
        }
    }

    /// Convert to floats for display/logging only.
    #[inline]
    pub fn to_floats(self) -> (f32, f32, f32) {
        (to_float(self.x), to_float(self.y), to_float(self.z))
    }
}

impl fmt::Debug for FixedVec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y, z) = self.to_floats();
        write!(f, "Vec3({:.4}, {:.4}, {:.4})", x, y, z)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::to_fixed;

    #[test]
    fn test_add_sub() {
        let a = FixedVec3::new(to_fixed(1.0), to_fixed(2.0), to_fixed(3.0));
        let b = FixedVec3::new(to_fixed(0.5), to_fixed(-2.0), to_fixed(1.0));

        let sum = a.add(b);
        assert_eq!(sum.x, to_fixed(1.5));
        assert_eq!(sum.y, 0);
        assert_eq!(sum.z, to_fixed(4.0));

        let diff = sum.sub(b);
        assert_eq!(diff, a);
    }

    #[test]
    fn test_zero_identity() {
        let a = FixedVec3::new(123, -456, 789);
        assert_eq!(a.add(FixedVec3::ZERO), a);
        assert_eq!(a.sub(FixedVec3::ZERO), a);
    }
}
