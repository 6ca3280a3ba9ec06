//! Headless Console Backend
//!
//! Implements the capability traits without any hardware: loads succeed only
//! for paths in a configured asset manifest, every call is recorded, and live
//! handle counts are tracked so tests can assert the load/unload pairing
//! invariant. The demo binary runs the whole game against this backend.

use std::collections::BTreeSet;

use tracing::debug;

use super::{
    AssetError, BackgroundId, DrawState, Gfx3d, MaterialProps, MeshId, Overlay2d, Rgb15, Rumble,
    SpriteId, TextureFormat, TextureId,
};
use crate::core::fixed::Fixed;
use crate::core::vec3::FixedVec3;

/// One recorded call, kept coarse on purpose: tests assert on the calls that
/// carry game-visible state, not on every engine interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsoleCall {
    /// A mesh was submitted for drawing.
    MeshDrawn(MeshId),
    /// A flat-colored triangle was submitted.
    TriangleDrawn {
        /// Triangle fill color
        color: Rgb15,
    },
    /// The camera was placed.
    CameraSet {
        /// Camera eye position
        eye: FixedVec3,
        /// Look-at target
        target: FixedVec3,
    },
    /// The rumble motor was switched.
    RumbleSet(bool),
    /// A sprite rotation was pushed.
    SpriteRotated {
        /// Sprite handle
        sprite: SpriteId,
        /// Angle in 512-unit turns
        angle: i32,
    },
    /// A text line was printed on the overlay.
    TextPrinted {
        /// Character cell column
        x: u32,
        /// Character cell row
        y: u32,
        /// Line content
        text: String,
    },
}

/// Recording console backend with a configurable asset manifest.
#[derive(Debug, Default)]
pub struct HeadlessConsole {
    assets: BTreeSet<String>,
    next_handle: u32,
    live_meshes: BTreeSet<u32>,
    live_textures: BTreeSet<u32>,
    live_backgrounds: BTreeSet<u32>,
    live_sprites: BTreeSet<u32>,
    /// Every recorded call, in emission order.
    pub calls: Vec<ConsoleCall>,
}

impl HeadlessConsole {
    /// Create a backend whose packaged filesystem contains `assets`.
    pub fn with_assets<I, S>(assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            assets: assets.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Total live handles across all handle kinds.
    ///
    /// Zero after a clean unload: every load had its matching release.
    pub fn live_handles(&self) -> usize {
        self.live_meshes.len()
            + self.live_textures.len()
            + self.live_backgrounds.len()
            + self.live_sprites.len()
    }

    /// Drop the recorded calls, keeping handles intact.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn resolve(&self, path: &str) -> Result<(), AssetError> {
        if self.assets.contains(path) {
            Ok(())
        } else {
            Err(AssetError::Missing {
                path: path.to_string(),
            })
        }
    }

    fn issue(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl Gfx3d for HeadlessConsole {
    fn load_mesh(&mut self, path: &str) -> Result<MeshId, AssetError> {
        self.resolve(path)?;
        let id = self.issue();
        self.live_meshes.insert(id);
        debug!(path, id, "mesh loaded");
        Ok(MeshId(id))
    }

    fn load_texture(
        &mut self,
        path: &str,
        _format: TextureFormat,
        _width: u16,
        _height: u16,
    ) -> Result<TextureId, AssetError> {
        self.resolve(path)?;
        let id = self.issue();
        self.live_textures.insert(id);
        debug!(path, id, "texture loaded");
        Ok(TextureId(id))
    }

    fn set_mesh_material(&mut self, _mesh: MeshId, _texture: TextureId) {}

    fn set_material_props(&mut self, _texture: TextureId, _props: MaterialProps) {}

    fn set_position(&mut self, _mesh: MeshId, _position: FixedVec3) {}

    fn set_rotation(&mut self, _mesh: MeshId, _x: i32, _y: i32, _z: i32) {}

    fn set_scale(&mut self, _mesh: MeshId, _scale: Fixed) {}

    fn set_draw_state(&mut self, _state: DrawState) {}

    fn draw_mesh(&mut self, mesh: MeshId) {
        self.calls.push(ConsoleCall::MeshDrawn(mesh));
    }

    fn draw_triangle(&mut self, _vertices: [FixedVec3; 3], color: Rgb15) {
        self.calls.push(ConsoleCall::TriangleDrawn { color });
    }

    fn set_camera(&mut self, eye: FixedVec3, target: FixedVec3) {
        self.calls.push(ConsoleCall::CameraSet { eye, target });
    }

    fn free_mesh(&mut self, mesh: MeshId) {
        self.live_meshes.remove(&mesh.0);
        debug!(id = mesh.0, "mesh freed");
    }

    fn free_texture(&mut self, texture: TextureId) {
        self.live_textures.remove(&texture.0);
        debug!(id = texture.0, "texture freed");
    }
}

impl Overlay2d for HeadlessConsole {
    fn load_background(&mut self, name: &str) -> Result<BackgroundId, AssetError> {
        self.resolve(name)?;
        let id = self.issue();
        self.live_backgrounds.insert(id);
        debug!(name, id, "background loaded");
        Ok(BackgroundId(id))
    }

    fn delete_background(&mut self, background: BackgroundId) {
        self.live_backgrounds.remove(&background.0);
        debug!(id = background.0, "background deleted");
    }

    fn load_sprite(&mut self, name: &str, _slot: u32) -> Result<SpriteId, AssetError> {
        self.resolve(name)?;
        let id = self.issue();
        self.live_sprites.insert(id);
        debug!(name, id, "sprite loaded");
        Ok(SpriteId(id))
    }

    fn set_sprite_rotation(&mut self, sprite: SpriteId, angle: i32) {
        self.calls.push(ConsoleCall::SpriteRotated { sprite, angle });
    }

    fn delete_sprite(&mut self, sprite: SpriteId) {
        self.live_sprites.remove(&sprite.0);
        debug!(id = sprite.0, "sprite deleted");
    }

    fn print(&mut self, x: u32, y: u32, text: &str) {
        self.calls.push(ConsoleCall::TextPrinted {
            x,
            y,
            text: text.to_string(),
        });
    }
}

impl Rumble for HeadlessConsole {
    fn set_rumble(&mut self, on: bool) {
        self.calls.push(ConsoleCall::RumbleSet(on));
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_asset_fails() {
        let mut console = HeadlessConsole::with_assets(["model/present.dl"]);
        assert!(console.load_mesh("model/present.dl").is_ok());

        let err = console.load_mesh("model/absent.dl").unwrap_err();
        assert_eq!(
            err,
            AssetError::Missing {
                path: "model/absent.dl".to_string()
            }
        );
    }

    #[test]
    fn test_handle_accounting() {
        let mut console = HeadlessConsole::with_assets(["a", "b", "c"]);
        let mesh = console.load_mesh("a").unwrap();
        let tex = console
            .load_texture("b", TextureFormat::A1Rgb5, 128, 128)
            .unwrap();
        let bg = console.load_background("c").unwrap();
        assert_eq!(console.live_handles(), 3);

        console.free_mesh(mesh);
        console.free_texture(tex);
        console.delete_background(bg);
        assert_eq!(console.live_handles(), 0);
    }

    #[test]
    fn test_calls_recorded_in_order() {
        let mut console = HeadlessConsole::with_assets(["m"]);
        let mesh = console.load_mesh("m").unwrap();
        console.set_rumble(true);
        console.draw_mesh(mesh);

        assert_eq!(
            console.calls,
            vec![
                ConsoleCall::RumbleSet(true),
                ConsoleCall::MeshDrawn(mesh),
            ]
        );
    }
}
