use bevy::prelude::*;
use race_core::MapSize;
use race_core::extrude::{MeshData, extrude};
use race_core::shapes::TrackShapes;
use race_core::texture::paint_lane_markings;

use crate::{SceneSetup, hex_color, texture_image};

pub const FIELD_GREEN: u32 = 0x67_c2_40;
pub const ISLAND_GREEN: u32 = 0x23_31_1c;

/// Convert engine-neutral buffers into a triangle-list mesh.
pub fn create_mesh(data: &MeshData) -> Mesh {
    let mut mesh = Mesh::new(
        bevy::mesh::PrimitiveTopology::TriangleList,
        bevy::asset::RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, data.positions.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, data.normals.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, data.uvs.clone());
    mesh.insert_indices(bevy::mesh::Indices::U32(data.indices.clone()));
    mesh
}

/// Ground quad covering the map at `z = 0`, its texture upright when viewed
/// from above: the first raster row lies along `y = height / 2`.
pub fn lane_plane(map: MapSize) -> MeshData {
    let (hw, hh) = (map.width / 2.0, map.height / 2.0);
    MeshData {
        positions: vec![
            [-hw, hh, 0.0],
            [hw, hh, 0.0],
            [-hw, -hh, 0.0],
            [hw, -hh, 0.0],
        ],
        normals: vec![[0.0, 0.0, 1.0]; 4],
        uvs: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]],
        indices: vec![0, 2, 1, 1, 2, 3],
    }
}

pub fn setup_track(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    scene: Res<SceneSetup>,
) {
    let map = scene.config.map_size();
    let track = &scene.config.track;

    let shapes = TrackShapes::build(&scene.geometry, map)
        .unwrap_or_else(|e| panic!("Failed to build track outlines: {e}"));
    let field = extrude(&shapes.all(), track.extrude_depth, track.arc_divisions);
    info!(
        vertices = field.caps.vertex_count() + field.sides.vertex_count(),
        cap_triangles = field.caps.triangle_count(),
        side_triangles = field.sides.triangle_count(),
        "Extruded track field"
    );

    // Painted road surface under the field
    let lanes = images.add(texture_image(paint_lane_markings(map, &scene.geometry)));
    commands.spawn((
        Name::new("lanes"),
        Mesh3d(meshes.add(create_mesh(&lane_plane(map)))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color_texture: Some(lanes),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::default(),
    ));

    commands.spawn((
        Name::new("field caps"),
        Mesh3d(meshes.add(create_mesh(&field.caps))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: hex_color(FIELD_GREEN),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::default(),
    ));
    commands.spawn((
        Name::new("field sides"),
        Mesh3d(meshes.add(create_mesh(&field.sides))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: hex_color(ISLAND_GREEN),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::default(),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::mesh::VertexAttributeValues;

    #[test]
    fn mesh_keeps_all_buffers() {
        let data = lane_plane(MapSize::new(900.0, 700.0));
        let mesh = create_mesh(&data);
        assert_eq!(mesh.count_vertices(), 4);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(6));
        match mesh.attribute(Mesh::ATTRIBUTE_UV_0) {
            Some(VertexAttributeValues::Float32x2(uvs)) => assert_eq!(uvs, &data.uvs),
            other => panic!("unexpected uvs: {other:?}"),
        }
    }

    #[test]
    fn lane_plane_faces_up() {
        let plane = lane_plane(MapSize::new(900.0, 700.0));
        for tri in plane.triangles() {
            let u = [tri[1][0] - tri[0][0], tri[1][1] - tri[0][1]];
            let v = [tri[2][0] - tri[0][0], tri[2][1] - tri[0][1]];
            assert!(u[0] * v[1] - u[1] * v[0] > 0.0);
        }
    }

    #[test]
    fn lane_texture_top_row_is_the_far_edge() {
        let plane = lane_plane(MapSize::new(900.0, 700.0));
        for (p, uv) in plane.positions.iter().zip(&plane.uvs) {
            assert_eq!(uv[0], (p[0] + 450.0) / 900.0);
            assert_eq!(uv[1], (350.0 - p[1]) / 700.0);
        }
    }
}
