use std::collections::HashMap;

use bevy::prelude::*;
use race_core::config::VehicleKind;
use race_core::model::{
    Cuboid, FaceMaterials, FaceQuad, Material, SceneNode, TextureKind, car, cuboid_faces, truck,
};
use race_core::texture::{car_front_texture, car_side_texture};

use crate::vehicle::PlayerVehicle;
use crate::{SceneSetup, hex_color, texture_image};

/// Combine face quads into a single mesh.
pub fn create_faces_mesh(quads: &[FaceQuad]) -> Mesh {
    let mut positions = Vec::with_capacity(quads.len() * 4);
    let mut normals = Vec::with_capacity(quads.len() * 4);
    let mut uvs = Vec::with_capacity(quads.len() * 4);
    let mut indices = Vec::with_capacity(quads.len() * 6);

    for quad in quads {
        let base = positions.len() as u32;
        positions.extend(quad.positions);
        normals.extend([quad.normal; 4]);
        uvs.extend(quad.uvs);
        indices.extend(FaceQuad::INDICES.map(|i| base + i));
    }

    let mut mesh = Mesh::new(
        bevy::mesh::PrimitiveTopology::TriangleList,
        bevy::asset::RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(bevy::mesh::Indices::U32(indices));
    mesh
}

/// Group the faces of a box by material, keeping face order within a group.
pub fn face_groups(cuboid: &Cuboid) -> Vec<(Material, Vec<FaceQuad>)> {
    let quads = cuboid_faces(cuboid);
    match cuboid.faces {
        FaceMaterials::Uniform(material) => vec![(material, quads.to_vec())],
        FaceMaterials::PerFace(_) => {
            let mut groups: Vec<(Material, Vec<FaceQuad>)> = Vec::new();
            for (face, quad) in quads.into_iter().enumerate() {
                let material = cuboid.faces.face(face);
                match groups.iter_mut().find(|(m, _)| *m == material) {
                    Some((_, group)) => group.push(quad),
                    None => groups.push((material, vec![quad])),
                }
            }
            groups
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum MaterialKey {
    Color(u32),
    Texture(TextureKind),
}

/// Panel textures plus a cache of the materials built so far.
#[derive(Resource)]
pub struct VehicleMaterials {
    pub car_front: Handle<Image>,
    pub car_side: Handle<Image>,
    cache: HashMap<MaterialKey, Handle<StandardMaterial>>,
}

impl VehicleMaterials {
    pub fn new(images: &mut Assets<Image>) -> Self {
        Self {
            car_front: images.add(texture_image(car_front_texture())),
            car_side: images.add(texture_image(car_side_texture())),
            cache: HashMap::new(),
        }
    }

    /// Texture rotation is baked into the face uvs, so one material per
    /// texture is enough.
    pub fn get(
        &mut self,
        material: Material,
        materials: &mut Assets<StandardMaterial>,
    ) -> Handle<StandardMaterial> {
        let key = match material {
            Material::Color(rgb) => MaterialKey::Color(rgb),
            Material::Texture { kind, .. } => MaterialKey::Texture(kind),
        };
        if let Some(handle) = self.cache.get(&key) {
            return handle.clone();
        }

        let standard = match key {
            MaterialKey::Color(rgb) => StandardMaterial {
                base_color: hex_color(rgb),
                perceptual_roughness: 1.0,
                ..default()
            },
            MaterialKey::Texture(kind) => StandardMaterial {
                base_color_texture: Some(match kind {
                    TextureKind::CarFront => self.car_front.clone(),
                    TextureKind::CarSide => self.car_side.clone(),
                }),
                perceptual_roughness: 1.0,
                ..default()
            },
        };
        let handle = materials.add(standard);
        self.cache.insert(key, handle.clone());
        handle
    }
}

/// Spawn a model tree; returns the root entity.
pub fn spawn_model(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    vehicle_materials: &mut VehicleMaterials,
    node: &SceneNode,
) -> Entity {
    let [x, y, z] = node.translation;
    let entity = commands
        .spawn((
            Name::new(node.name),
            Transform::from_xyz(x, y, z).with_rotation(Quat::from_rotation_z(node.rotation_z)),
            Visibility::default(),
        ))
        .id();

    if let Some(cuboid) = &node.cuboid {
        for (material, quads) in face_groups(cuboid) {
            let part = commands
                .spawn((
                    Mesh3d(meshes.add(create_faces_mesh(&quads))),
                    MeshMaterial3d(vehicle_materials.get(material, materials)),
                    Transform::default(),
                ))
                .id();
            commands.entity(entity).add_child(part);
        }
    }

    for child in &node.children {
        let child = spawn_model(commands, meshes, materials, vehicle_materials, child);
        commands.entity(entity).add_child(child);
    }
    entity
}

pub fn setup_vehicles(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    scene: Res<SceneSetup>,
) {
    let mut vehicle_materials = VehicleMaterials::new(&mut images);
    let settings = &scene.config.vehicle;

    let player = spawn_model(
        &mut commands,
        &mut meshes,
        &mut materials,
        &mut vehicle_materials,
        &car(settings.body_color),
    );
    let [x, y] = settings.start_position;
    commands.entity(player).insert((
        PlayerVehicle::default(),
        Transform::from_xyz(x, y, 0.0).with_rotation(Quat::from_rotation_z(settings.start_heading)),
    ));
    info!(x, y, heading = settings.start_heading, "Spawned player car");

    for parked in &scene.config.parked {
        let node = match parked.kind {
            VehicleKind::Car => car(race_core::model::WHITE),
            VehicleKind::Truck => truck(),
        };
        let entity = spawn_model(
            &mut commands,
            &mut meshes,
            &mut materials,
            &mut vehicle_materials,
            &node,
        );
        let [x, y] = parked.position;
        commands.entity(entity).insert(
            Transform::from_xyz(x, y, 0.0).with_rotation(Quat::from_rotation_z(parked.heading)),
        );
        debug!(kind = ?parked.kind, x, y, "Parked vehicle");
    }

    commands.insert_resource(vehicle_materials);
}
