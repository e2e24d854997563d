//! Prism meshes from closed outlines.
//!
//! Each outline is triangulated once and emitted twice as caps (bottom at
//! `z = 0`, top at `z = depth`), then walled in with one quad per edge. Caps
//! and walls are kept in separate buffers so they can carry different
//! materials.

use geo::{Coord, LineString, Polygon, TriangulateEarcut};
use tracing::{debug, warn};

use crate::shapes::{ClosedShape, POINT_EPSILON, signed_area};

/// Plain triangle-list buffers, laid out the way GPU meshes expect them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
        index
    }

    /// Iterate over triangles as position triples.
    pub fn triangles(&self) -> impl Iterator<Item = [[f32; 3]; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }
}

/// Caps take the field material, walls the island material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtrudedShapes {
    pub caps: MeshData,
    pub sides: MeshData,
}

pub fn extrude(shapes: &[&ClosedShape], depth: f32, arc_divisions: usize) -> ExtrudedShapes {
    let mut out = ExtrudedShapes::default();
    for shape in shapes {
        let mut ring = shape.ring(arc_divisions);
        if ring.len() < 3 {
            warn!(shape = shape.name, "skipping outline with fewer than three points");
            continue;
        }
        if signed_area(&ring) < 0.0 {
            ring.reverse();
        }
        add_caps(&mut out.caps, &ring, depth);
        add_sides(&mut out.sides, &ring, depth);
        debug!(shape = shape.name, points = ring.len(), "extruded outline");
    }
    out
}

fn add_caps(mesh: &mut MeshData, ring: &[[f32; 2]], depth: f32) {
    let coords: Vec<Coord<f32>> = ring.iter().map(|&[x, y]| Coord { x, y }).collect();
    let polygon = Polygon::new(LineString::new(coords), vec![]);
    let triangulation = polygon.earcut_triangles_raw();
    let vertices = triangulation.vertices;

    for tri in triangulation.triangle_indices.chunks_exact(3) {
        let mut corners = [
            [vertices[2 * tri[0]], vertices[2 * tri[0] + 1]],
            [vertices[2 * tri[1]], vertices[2 * tri[1] + 1]],
            [vertices[2 * tri[2]], vertices[2 * tri[2] + 1]],
        ];
        if cross_z(corners[0], corners[1], corners[2]) < 0.0 {
            corners.swap(1, 2);
        }

        let top = corners.map(|[x, y]| mesh.push_vertex([x, y, depth], [0.0, 0.0, 1.0], [x, y]));
        mesh.indices.extend(top);

        let bottom = corners.map(|[x, y]| mesh.push_vertex([x, y, 0.0], [0.0, 0.0, -1.0], [x, y]));
        mesh.indices.extend([bottom[0], bottom[2], bottom[1]]);
    }
}

fn add_sides(mesh: &mut MeshData, ring: &[[f32; 2]], depth: f32) {
    let mut run = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        let dx = b[0] - a[0];
        let dy = b[1] - a[1];
        let len = (dx * dx + dy * dy).sqrt();
        if len <= POINT_EPSILON {
            continue;
        }

        // outward for a counter-clockwise ring
        let normal = [dy / len, -dx / len, 0.0];
        let a0 = mesh.push_vertex([a[0], a[1], 0.0], normal, [run, 0.0]);
        let b0 = mesh.push_vertex([b[0], b[1], 0.0], normal, [run + len, 0.0]);
        let b1 = mesh.push_vertex([b[0], b[1], depth], normal, [run + len, depth]);
        let a1 = mesh.push_vertex([a[0], a[1], depth], normal, [run, depth]);
        mesh.indices.extend([a0, b0, b1, a0, b1, a1]);
        run += len;
    }
}

fn cross_z(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{MapSize, TrackGeometry};
    use crate::shapes::{TrackShapes, middle_island};

    fn triangle_normal(t: [[f32; 3]; 3]) -> [f32; 3] {
        let u = [t[1][0] - t[0][0], t[1][1] - t[0][1], t[1][2] - t[0][2]];
        let v = [t[2][0] - t[0][0], t[2][1] - t[0][1], t[2][2] - t[0][2]];
        [
            u[1] * v[2] - u[2] * v[1],
            u[2] * v[0] - u[0] * v[2],
            u[0] * v[1] - u[1] * v[0],
        ]
    }

    #[test]
    fn caps_face_up_and_down() {
        let island = middle_island(&TrackGeometry::reference());
        let mesh = extrude(&[&island], 6.0, 8);

        let ring_len = island.ring(8).len();
        assert_eq!(mesh.caps.triangle_count(), 2 * (ring_len - 2));

        for (i, tri) in mesh.caps.triangles().enumerate() {
            let n = triangle_normal(tri);
            if tri[0][2] == 6.0 {
                assert!(n[2] > 0.0, "top triangle {i} faces down");
            } else {
                assert_eq!(tri[0][2], 0.0);
                assert!(n[2] < 0.0, "bottom triangle {i} faces up");
            }
        }
    }

    #[test]
    fn top_cap_covers_the_outline_area() {
        let shapes = TrackShapes::build(&TrackGeometry::reference(), MapSize::new(900.0, 700.0))
            .unwrap();
        for shape in shapes.all() {
            let mesh = extrude(&[shape], 6.0, 24);
            let covered: f32 = mesh
                .caps
                .triangles()
                .filter(|t| t[0][2] == 6.0)
                .map(|t| triangle_normal(t)[2] / 2.0)
                .sum();
            let expected = signed_area(&shape.ring(24)).abs();
            assert!(
                (covered - expected).abs() / expected < 1e-3,
                "{}: {covered} vs {expected}",
                shape.name
            );
        }
    }

    #[test]
    fn walls_point_outward() {
        let island = middle_island(&TrackGeometry::reference());
        let mesh = extrude(&[&island], 6.0, 8);
        assert_eq!(mesh.sides.triangle_count(), 2 * island.ring(8).len());
        assert_eq!(mesh.sides.vertex_count(), 4 * island.ring(8).len());
        assert_eq!(mesh.caps.vertex_count(), 3 * mesh.caps.triangle_count());

        // the lens is convex and centred on the origin
        let quads = mesh.sides.triangles().step_by(2);
        for (tri, normal) in quads.zip(mesh.sides.normals.iter().step_by(4)) {
            let mid = [(tri[0][0] + tri[1][0]) / 2.0, (tri[0][1] + tri[1][1]) / 2.0];
            assert!(mid[0] * normal[0] + mid[1] * normal[1] > 0.0);
            let n = triangle_normal(tri);
            assert!(n[0] * normal[0] + n[1] * normal[1] > 0.0);
        }
    }

    #[test]
    fn winding_of_input_does_not_matter() {
        let g = TrackGeometry::reference();
        let shapes = TrackShapes::build(&g, MapSize::new(900.0, 700.0)).unwrap();
        let left = extrude(&[&shapes.left_island], 6.0, 12);
        let right = extrude(&[&shapes.right_island], 6.0, 12);
        assert_eq!(left.caps.triangle_count(), right.caps.triangle_count());
        for tri in right.caps.triangles().filter(|t| t[0][2] == 6.0) {
            assert!(triangle_normal(tri)[2] > 0.0);
        }
    }
}
