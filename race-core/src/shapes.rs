use std::f32::consts::{PI, TAU};

use crate::geometry::{GeometryError, MapSize, TrackGeometry};

/// Points closer than this are treated as the same vertex.
pub const POINT_EPSILON: f32 = 1e-3;

/// Arc divisions used when no other resolution is configured.
pub const DEFAULT_ARC_DIVISIONS: usize = 24;

/// A segment of a circle.
///
/// The traversal always runs from `start_angle` to `end_angle`. The signed
/// difference is wrapped into `(0, 2π]`; a clockwise arc takes the other way
/// round, so its sweep is negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSpan {
    pub center: [f32; 2],
    pub radius: f32,
    pub start_angle: f32,
    pub end_angle: f32,
    pub clockwise: bool,
}

impl ArcSpan {
    pub fn new(
        center: [f32; 2],
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        clockwise: bool,
    ) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
            clockwise,
        }
    }

    /// Signed angle travelled from start to end.
    pub fn sweep(&self) -> f32 {
        let raw = self.end_angle - self.start_angle;
        let same_points = raw.abs() < f32::EPSILON;

        let mut delta = raw.rem_euclid(TAU);
        if delta < f32::EPSILON {
            delta = if same_points { 0.0 } else { TAU };
        }
        if self.clockwise && !same_points {
            delta -= TAU;
        }
        delta
    }

    /// Point at parameter `t` in `[0, 1]` along the arc.
    pub fn point_at(&self, t: f32) -> [f32; 2] {
        let angle = self.start_angle + t * self.sweep();
        [
            self.center[0] + self.radius * angle.cos(),
            self.center[1] + self.radius * angle.sin(),
        ]
    }

    pub fn start(&self) -> [f32; 2] {
        self.point_at(0.0)
    }

    pub fn end(&self) -> [f32; 2] {
        self.point_at(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line { from: [f32; 2], to: [f32; 2] },
    Arc(ArcSpan),
}

impl Segment {
    fn start(&self) -> [f32; 2] {
        match self {
            Segment::Line { from, .. } => *from,
            Segment::Arc(arc) => arc.start(),
        }
    }
}

/// Pen-style outline builder. Arcs that do not begin at the pen position are
/// joined to it with a straight line.
#[derive(Debug, Default)]
pub struct PathBuilder {
    segments: Vec<Segment>,
    current: Option<[f32; 2]>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, point: [f32; 2]) -> Self {
        self.current = Some(point);
        self
    }

    pub fn line_to(mut self, to: [f32; 2]) -> Self {
        if let Some(from) = self.current {
            if !same_point(from, to) {
                self.segments.push(Segment::Line { from, to });
            }
        }
        self.current = Some(to);
        self
    }

    pub fn arc(mut self, arc: ArcSpan) -> Self {
        let start = arc.start();
        if let Some(current) = self.current {
            if !same_point(current, start) {
                self.segments.push(Segment::Line {
                    from: current,
                    to: start,
                });
            }
        }
        self.segments.push(Segment::Arc(arc));
        self.current = Some(arc.end());
        self
    }

    pub fn close(self, name: &'static str) -> ClosedShape {
        ClosedShape {
            name,
            segments: self.segments,
        }
    }
}

/// Closed 2D outline made of lines and arc spans. The last segment is joined
/// back to the first one implicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedShape {
    pub name: &'static str,
    segments: Vec<Segment>,
}

impl ClosedShape {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Sampled outline. The last point repeats the first one and no two
    /// consecutive points coincide.
    pub fn points(&self, arc_divisions: usize) -> Vec<[f32; 2]> {
        let divisions = arc_divisions.max(1);
        let mut points: Vec<[f32; 2]> = Vec::new();

        let mut push = |p: [f32; 2]| {
            if points.last().is_none_or(|&last| !same_point(last, p)) {
                points.push(p);
            }
        };

        for segment in &self.segments {
            match segment {
                Segment::Line { from, to } => {
                    push(*from);
                    push(*to);
                }
                Segment::Arc(arc) => {
                    for i in 0..=divisions {
                        push(arc.point_at(i as f32 / divisions as f32));
                    }
                }
            }
        }

        let Some(&first) = points.first() else {
            return points;
        };
        let n = points.len();
        if n > 1 && same_point(points[n - 1], first) {
            points[n - 1] = first;
        } else {
            points.push(first);
        }
        points
    }

    /// Sampled outline without the repeated closing point.
    pub fn ring(&self, arc_divisions: usize) -> Vec<[f32; 2]> {
        let mut points = self.points(arc_divisions);
        points.pop();
        points
    }

    pub fn start(&self) -> Option<[f32; 2]> {
        self.segments.first().map(Segment::start)
    }
}

/// Shoelace area, positive for counter-clockwise rings.
pub fn signed_area(ring: &[[f32; 2]]) -> f32 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        let [x0, y0] = ring[i];
        let [x1, y1] = ring[(i + 1) % n];
        twice += x0 * y1 - x1 * y0;
    }
    twice / 2.0
}

pub fn same_point(a: [f32; 2], b: [f32; 2]) -> bool {
    (a[0] - b[0]).abs() <= POINT_EPSILON && (a[1] - b[1]).abs() <= POINT_EPSILON
}

/// Island enclosed by the left loop.
pub fn left_island(g: &TrackGeometry) -> ClosedShape {
    PathBuilder::new()
        .arc(ArcSpan::new(
            g.left_center(),
            g.inner_radius,
            g.arc_angle_1,
            -g.arc_angle_1,
            false,
        ))
        .arc(ArcSpan::new(
            g.right_center(),
            g.outer_radius,
            PI + g.arc_angle_2,
            PI - g.arc_angle_2,
            true,
        ))
        .close("left island")
}

/// Lens-shaped island where the two loops overlap.
pub fn middle_island(g: &TrackGeometry) -> ClosedShape {
    PathBuilder::new()
        .arc(ArcSpan::new(
            g.left_center(),
            g.inner_radius,
            g.arc_angle_3,
            -g.arc_angle_3,
            true,
        ))
        .arc(ArcSpan::new(
            g.right_center(),
            g.inner_radius,
            PI + g.arc_angle_3,
            PI - g.arc_angle_3,
            true,
        ))
        .close("middle island")
}

/// Island enclosed by the right loop, the mirror image of the left one.
pub fn right_island(g: &TrackGeometry) -> ClosedShape {
    PathBuilder::new()
        .arc(ArcSpan::new(
            g.right_center(),
            g.inner_radius,
            PI - g.arc_angle_1,
            PI + g.arc_angle_1,
            true,
        ))
        .arc(ArcSpan::new(
            g.left_center(),
            g.outer_radius,
            -g.arc_angle_2,
            g.arc_angle_2,
            false,
        ))
        .close("right island")
}

/// Everything between the outer track edge and the map border.
///
/// The outline leaves the bottom edge at its midpoint, runs around both outer
/// arcs and comes back down the same line before following the map border.
pub fn outer_field(g: &TrackGeometry, map: MapSize) -> Result<ClosedShape, GeometryError> {
    g.check_map(map)?;

    let half_w = map.width / 2.0;
    let half_h = map.height / 2.0;

    Ok(PathBuilder::new()
        .move_to([-half_w, -half_h])
        .line_to([0.0, -half_h])
        .arc(ArcSpan::new(
            g.left_center(),
            g.outer_radius,
            -g.arc_angle_4,
            g.arc_angle_4,
            true,
        ))
        .arc(ArcSpan::new(
            g.right_center(),
            g.outer_radius,
            PI - g.arc_angle_4,
            PI + g.arc_angle_4,
            true,
        ))
        .line_to([0.0, -half_h])
        .line_to([half_w, -half_h])
        .line_to([half_w, half_h])
        .line_to([-half_w, half_h])
        .close("outer field"))
}

/// The four outlines that make up the raised field around the track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackShapes {
    pub left_island: ClosedShape,
    pub middle_island: ClosedShape,
    pub right_island: ClosedShape,
    pub outer_field: ClosedShape,
}

impl TrackShapes {
    pub fn build(g: &TrackGeometry, map: MapSize) -> Result<Self, GeometryError> {
        Ok(Self {
            left_island: left_island(g),
            middle_island: middle_island(g),
            right_island: right_island(g),
            outer_field: outer_field(g, map)?,
        })
    }

    pub fn all(&self) -> [&ClosedShape; 4] {
        [
            &self.left_island,
            &self.right_island,
            &self.middle_island,
            &self.outer_field,
        ]
    }
}
