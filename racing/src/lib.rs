use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use image::RgbaImage;
use race_core::{SceneConfig, TrackGeometry};

pub mod camera;
pub mod model;
pub mod track;
pub mod vehicle;

/// The validated scene, shared by every startup system.
#[derive(Resource, Clone)]
pub struct SceneSetup {
    pub config: SceneConfig,
    pub geometry: TrackGeometry,
}

pub struct RacingScenePlugin {
    pub config: SceneConfig,
    /// Where the config came from, for the startup log.
    pub source: String,
}

impl Plugin for RacingScenePlugin {
    fn build(&self, app: &mut App) {
        let geometry = self
            .config
            .validate()
            .unwrap_or_else(|e| panic!("Invalid scene config: {e}"));
        info!(
            source = %self.source,
            radius = geometry.track_radius,
            width = geometry.track_width,
            arc_center_x = geometry.arc_center_x,
            "Track geometry ready"
        );

        app.insert_resource(ClearColor(Color::BLACK))
            .insert_resource(SceneSetup {
                config: self.config.clone(),
                geometry,
            })
            .insert_resource(vehicle::DriveSettings::from_config(&self.config))
            .add_systems(
                Startup,
                (
                    track::setup_track,
                    model::setup_vehicles,
                    camera::setup_camera,
                ),
            )
            .add_systems(
                Update,
                (vehicle::read_keyboard, vehicle::drive_player).chain(),
            )
            .add_systems(
                Update,
                (
                    camera::orbit_camera,
                    camera::draw_helpers.run_if(helpers_enabled),
                ),
            );
    }
}

fn helpers_enabled(scene: Res<SceneSetup>) -> bool {
    scene.config.scene.show_helpers
}

/// `0xRRGGBB` to an sRGB color.
pub fn hex_color(rgb: u32) -> Color {
    Color::srgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// Upload a painted raster as an sRGB texture.
pub fn texture_image(img: RgbaImage) -> Image {
    let (width, height) = img.dimensions();
    Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        img.into_raw(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_split_into_channels() {
        assert_eq!(
            hex_color(0xa52523).to_srgba(),
            Srgba::rgb_u8(0xa5, 0x25, 0x23)
        );
        assert_eq!(hex_color(0xffffff).to_srgba(), Srgba::WHITE);
    }

    #[test]
    fn texture_keeps_raster_size() {
        let image = texture_image(race_core::texture::car_side_texture());
        assert_eq!(image.width(), 128);
        assert_eq!(image.height(), 32);
    }
}
