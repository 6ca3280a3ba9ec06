//! Console Capability Layer
//!
//! The handheld's fixed-function 3D engine, 2D overlay, packaged filesystem,
//! and rumble pak are external collaborators. The game core consumes them
//! through the narrow traits in this module and never owns an implementation;
//! a real build links the hardware bindings, tests and the demo binary use
//! [`headless::HeadlessConsole`].
//!
//! Handles are opaque ids issued by the backend. The game tracks them in
//! `Option`s so every load is released exactly once.

pub mod headless;

use thiserror::Error;

use crate::core::fixed::Fixed;
use crate::core::vec3::FixedVec3;

pub use headless::{ConsoleCall, HeadlessConsole};

// =============================================================================
// HANDLES
// =============================================================================

/// Handle to a static mesh owned by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeshId(pub u32);

/// Handle to a texture/material owned by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureId(pub u32);

/// Handle to a 2D background layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BackgroundId(pub u32);

/// Handle to a 2D sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpriteId(pub u32);

// =============================================================================
// DRAW TYPES
// =============================================================================

/// 15-bit color, 5 bits per channel (the engine's native format).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb15 {
    /// Red channel, 0-31
    pub r: u8,
    /// Green channel, 0-31
    pub g: u8,
    /// Blue channel, 0-31
    pub b: u8,
}

impl Rgb15 {
    /// Solid black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Solid red.
    pub const RED: Self = Self::new(31, 0, 0);

    /// Create a color from 5-bit channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Material lighting properties, set once after a texture is loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaterialProps {
    /// Diffuse reflection color
    pub diffuse: Rgb15,
    /// Ambient reflection color
    pub ambient: Rgb15,
    /// Specular reflection color
    pub specular: Rgb15,
    /// Emission color
    pub emission: Rgb15,
    /// Use per-vertex color instead of diffuse
    pub vertex_color: bool,
    /// Use the shininess table for specular
    pub shininess_table: bool,
}

/// Polygon state applied to subsequent draw calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawState {
    /// Polygon alpha, 0 (invisible) to 31 (opaque)
    pub alpha: u8,
    /// Polygon id, used by the engine for blending groups
    pub poly_id: u8,
    /// Apply fog to these polygons
    pub fog: bool,
    /// Toon highlight shading instead of plain modulation
    pub toon_highlight: bool,
}

/// Texture pixel formats supported by the loader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFormat {
    /// 1-bit alpha, 5 bits per color channel
    A1Rgb5,
    /// 8-bit paletted
    Pal8,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Asset lookup failure from the packaged read-only filesystem.
///
/// The only error the game ever surfaces: a named asset missing at load
/// time. Callers are expected to abort startup; there is no retry path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssetError {
    /// The named path does not exist in the packaged filesystem.
    #[error("asset not found in packaged filesystem: {path}")]
    Missing {
        /// Path that failed to resolve
        path: String,
    },
}

// =============================================================================
// CAPABILITY TRAITS
// =============================================================================

/// Fixed-function 3D engine operations the game emits each frame.
pub trait Gfx3d {
    /// Load a static mesh from the packaged filesystem.
    fn load_mesh(&mut self, path: &str) -> Result<MeshId, AssetError>;

    /// Load a texture from the packaged filesystem.
    fn load_texture(
        &mut self,
        path: &str,
        format: TextureFormat,
        width: u16,
        height: u16,
    ) -> Result<TextureId, AssetError>;

    /// Bind a texture to a mesh as its material.
    fn set_mesh_material(&mut self, mesh: MeshId, texture: TextureId);

    /// Set lighting properties on a material.
    fn set_material_props(&mut self, texture: TextureId, props: MaterialProps);

    /// Set a mesh's absolute world position.
    fn set_position(&mut self, mesh: MeshId, position: FixedVec3);

    /// Set a mesh's rotation, one angle (512 units per turn) per axis.
    fn set_rotation(&mut self, mesh: MeshId, x: i32, y: i32, z: i32);

    /// Set a mesh's uniform scale factor.
    fn set_scale(&mut self, mesh: MeshId, scale: Fixed);

    /// Set the polygon state used by subsequent draws.
    fn set_draw_state(&mut self, state: DrawState);

    /// Submit a mesh for this frame.
    fn draw_mesh(&mut self, mesh: MeshId);

    /// Submit one flat-colored triangle (ad-hoc geometry such as shadows).
    fn draw_triangle(&mut self, vertices: [FixedVec3; 3], color: Rgb15);

    /// Place the camera for this frame.
    fn set_camera(&mut self, eye: FixedVec3, target: FixedVec3);

    /// Release a mesh handle.
    fn free_mesh(&mut self, mesh: MeshId);

    /// Release a texture handle.
    fn free_texture(&mut self, texture: TextureId);
}

/// 2D overlay: backgrounds, sprites, and the debug text layer.
pub trait Overlay2d {
    /// Load a named background onto the sub screen.
    fn load_background(&mut self, name: &str) -> Result<BackgroundId, AssetError>;

    /// Delete a background, freeing its VRAM slot.
    fn delete_background(&mut self, background: BackgroundId);

    /// Load a named sprite into the given hardware slot.
    fn load_sprite(&mut self, name: &str, slot: u32) -> Result<SpriteId, AssetError>;

    /// Rotate a sprite (512 units per turn).
    fn set_sprite_rotation(&mut self, sprite: SpriteId, angle: i32);

    /// Delete a sprite, freeing its slot.
    fn delete_sprite(&mut self, sprite: SpriteId);

    /// Print a text line at a character cell on the text layer.
    fn print(&mut self, x: u32, y: u32, text: &str);
}

/// Rumble pak control.
pub trait Rumble {
    /// Switch the rumble motor on or off.
    fn set_rumble(&mut self, on: bool);
}

/// Everything the session needs from the console in one bound.
pub trait Console: Gfx3d + Overlay2d + Rumble {}

impl<T: Gfx3d + Overlay2d + Rumble> Console for T {}
