//! Box-built vehicle models as engine-neutral scene trees.
//!
//! Builders return [`SceneNode`] values; the renderer walks the tree and
//! creates one mesh per [`Cuboid`] face group. Sizes are `[x, y, z]` with z up
//! and the vehicle facing +x.

use std::f32::consts::{FRAC_PI_2, PI};

pub const PLAYER_RED: u32 = 0xa5_25_23;
pub const WHEEL_GREY: u32 = 0x33_33_33;
pub const WHITE: u32 = 0xff_ff_ff;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    CarFront,
    CarSide,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    Color(u32),
    /// Painted texture, its uvs rotated by `rotation` radians about the
    /// texture centre.
    Texture { kind: TextureKind, rotation: f32 },
}

impl Material {
    pub fn texture(kind: TextureKind, rotation: f32) -> Self {
        Material::Texture { kind, rotation }
    }
}

/// Face order: +x, -x, +y, -y, +z, -z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FaceMaterials {
    Uniform(Material),
    PerFace([Material; 6]),
}

impl FaceMaterials {
    pub fn face(&self, index: usize) -> Material {
        match self {
            FaceMaterials::Uniform(material) => *material,
            FaceMaterials::PerFace(materials) => materials[index],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    pub size: [f32; 3],
    pub faces: FaceMaterials,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: &'static str,
    pub translation: [f32; 3],
    pub rotation_z: f32,
    pub cuboid: Option<Cuboid>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn group(name: &'static str, children: Vec<SceneNode>) -> Self {
        Self {
            name,
            translation: [0.0; 3],
            rotation_z: 0.0,
            cuboid: None,
            children,
        }
    }

    pub fn cuboid(name: &'static str, size: [f32; 3], faces: FaceMaterials) -> Self {
        Self {
            name,
            translation: [0.0; 3],
            rotation_z: 0.0,
            cuboid: Some(Cuboid { size, faces }),
            children: Vec::new(),
        }
    }

    pub fn at(mut self, translation: [f32; 3]) -> Self {
        self.translation = translation;
        self
    }

    /// Depth-first walk over this node and its descendants.
    pub fn walk(&self) -> Vec<&SceneNode> {
        let mut nodes = vec![self];
        for child in &self.children {
            nodes.extend(child.walk());
        }
        nodes
    }

    pub fn child(&self, name: &str) -> Option<&SceneNode> {
        self.children.iter().find(|c| c.name == name)
    }
}

pub fn wheel() -> SceneNode {
    SceneNode::cuboid(
        "wheel",
        [12.0, 33.0, 12.0],
        FaceMaterials::Uniform(Material::Color(WHEEL_GREY)),
    )
}

pub fn car(body_color: u32) -> SceneNode {
    let body = SceneNode::cuboid(
        "body",
        [60.0, 30.0, 15.0],
        FaceMaterials::Uniform(Material::Color(body_color)),
    )
    .at([0.0, 0.0, 12.0]);

    let cabin = SceneNode::cuboid(
        "cabin",
        [33.0, 24.0, 12.0],
        FaceMaterials::PerFace([
            Material::texture(TextureKind::CarFront, FRAC_PI_2),
            Material::texture(TextureKind::CarFront, -FRAC_PI_2),
            Material::texture(TextureKind::CarSide, -PI),
            Material::texture(TextureKind::CarSide, 0.0),
            Material::Color(WHITE),
            Material::Color(WHITE),
        ]),
    )
    .at([-6.0, 0.0, 25.5]);

    SceneNode::group(
        "car",
        vec![
            wheel().at([-18.0, 0.0, 6.0]),
            wheel().at([18.0, 0.0, 6.0]),
            body,
            cabin,
        ],
    )
}

pub fn truck() -> SceneNode {
    let cargo = SceneNode::cuboid(
        "cargo",
        [60.0, 30.0, 40.0],
        FaceMaterials::Uniform(Material::Color(WHITE)),
    )
    .at([0.0, 0.0, 12.0]);

    SceneNode::group(
        "truck",
        vec![
            wheel().at([-18.0, 0.0, 6.0]),
            wheel().at([10.0, 0.0, 6.0]),
            wheel().at([38.0, 0.0, 6.0]),
            cargo,
        ],
    )
}

/// One side of a box: four corners with a shared normal, two triangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceQuad {
    pub positions: [[f32; 3]; 4],
    pub normal: [f32; 3],
    /// Image-space uvs: v = 0 is the top row of the texture.
    pub uvs: [[f32; 2]; 4],
}

impl FaceQuad {
    pub const INDICES: [u32; 6] = [0, 2, 1, 2, 3, 1];
}

// (u axis, v axis, w axis, u sign, v sign, w sign) per face, in face order
const FACE_AXES: [(usize, usize, usize, f32, f32, f32); 6] = [
    (2, 1, 0, -1.0, -1.0, 1.0),
    (2, 1, 0, 1.0, -1.0, -1.0),
    (0, 2, 1, 1.0, 1.0, 1.0),
    (0, 2, 1, 1.0, -1.0, -1.0),
    (0, 1, 2, 1.0, -1.0, 1.0),
    (0, 1, 2, -1.0, -1.0, -1.0),
];

/// Six face quads of a box centred on the origin.
///
/// Each face spans its texture once; a textured face's uvs are rotated about
/// `(0.5, 0.5)` by the material's rotation.
pub fn cuboid_faces(cuboid: &Cuboid) -> [FaceQuad; 6] {
    std::array::from_fn(|face| {
        let (u, v, w, u_dir, v_dir, w_dir) = FACE_AXES[face];
        let half = cuboid.size.map(|s| s / 2.0);
        let rotation = match cuboid.faces.face(face) {
            Material::Texture { rotation, .. } => rotation,
            Material::Color(_) => 0.0,
        };

        let mut positions = [[0.0; 3]; 4];
        let mut uvs = [[0.0; 2]; 4];
        for (corner, (iy, ix)) in [(0, 0), (0, 1), (1, 0), (1, 1)].into_iter().enumerate() {
            let a = ix as f32 * cuboid.size[u] - half[u];
            let b = iy as f32 * cuboid.size[v] - half[v];
            let mut p = [0.0; 3];
            p[u] = a * u_dir;
            p[v] = b * v_dir;
            p[w] = half[w] * w_dir;
            positions[corner] = p;

            let uv = rotate_uv([ix as f32, 1.0 - iy as f32], rotation);
            uvs[corner] = [uv[0], 1.0 - uv[1]];
        }

        let mut normal = [0.0; 3];
        normal[w] = w_dir;
        FaceQuad {
            positions,
            normal,
            uvs,
        }
    })
}

fn rotate_uv(uv: [f32; 2], rotation: f32) -> [f32; 2] {
    if rotation == 0.0 {
        return uv;
    }
    let (s, c) = rotation.sin_cos();
    let du = uv[0] - 0.5;
    let dv = uv[1] - 0.5;
    [c * du + s * dv + 0.5, -s * du + c * dv + 0.5]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    #[test]
    fn car_layout() {
        let car = car(PLAYER_RED);
        let wheels: Vec<_> = car.children.iter().filter(|c| c.name == "wheel").collect();
        assert_eq!(wheels.len(), 2);
        assert_eq!(wheels[0].translation, [-18.0, 0.0, 6.0]);
        assert_eq!(wheels[1].translation, [18.0, 0.0, 6.0]);

        let body = car.child("body").unwrap();
        assert_eq!(body.translation[2], 12.0);
        assert_eq!(
            body.cuboid.unwrap().faces,
            FaceMaterials::Uniform(Material::Color(PLAYER_RED))
        );

        let cabin = car.child("cabin").unwrap().cuboid.unwrap();
        assert_eq!(cabin.size, [33.0, 24.0, 12.0]);
        assert_eq!(
            cabin.faces.face(0),
            Material::texture(TextureKind::CarFront, FRAC_PI_2)
        );
        assert_eq!(cabin.faces.face(4), Material::Color(WHITE));
    }

    #[test]
    fn truck_has_three_wheels_and_cargo() {
        let truck = truck();
        let xs: Vec<f32> = truck
            .children
            .iter()
            .filter(|c| c.name == "wheel")
            .map(|c| c.translation[0])
            .collect();
        assert_eq!(xs, vec![-18.0, 10.0, 38.0]);
        assert_eq!(
            truck.child("cargo").unwrap().cuboid.unwrap().size,
            [60.0, 30.0, 40.0]
        );
        assert_eq!(truck.walk().iter().filter(|n| n.cuboid.is_some()).count(), 4);
    }

    #[test]
    fn faces_sit_on_the_box_surface_and_face_outward() {
        let cuboid = Cuboid {
            size: [60.0, 30.0, 15.0],
            faces: FaceMaterials::Uniform(Material::Color(WHITE)),
        };
        for quad in cuboid_faces(&cuboid) {
            let axis = quad.normal.iter().position(|&n| n != 0.0).unwrap();
            for p in quad.positions {
                assert_eq!(p[axis], quad.normal[axis] * cuboid.size[axis] / 2.0);
            }
            for tri in FaceQuad::INDICES.chunks_exact(3) {
                let [a, b, c] = [0, 1, 2].map(|i| quad.positions[tri[i] as usize]);
                let n = cross(sub(b, a), sub(c, a));
                assert!(dot(n, quad.normal) > 0.0);
            }
        }
    }

    #[test]
    fn untextured_faces_span_the_unit_square() {
        let cuboid = Cuboid {
            size: [1.0, 2.0, 3.0],
            faces: FaceMaterials::Uniform(Material::Color(WHITE)),
        };
        for quad in cuboid_faces(&cuboid) {
            let mut uvs = quad.uvs.to_vec();
            uvs.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert_eq!(uvs, vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]);
        }
    }

    #[test]
    fn quarter_turn_moves_corners_around_the_centre() {
        assert_eq!(rotate_uv([0.5, 0.5], FRAC_PI_2), [0.5, 0.5]);
        let [u, v] = rotate_uv([1.0, 0.5], FRAC_PI_2);
        assert!((u - 0.5).abs() < 1e-6);
        assert!((v - 0.0).abs() < 1e-6);
    }
}
