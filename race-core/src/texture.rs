//! Procedurally painted textures.
//!
//! Everything here is a pure function from a few sizes to an RGBA buffer.
//! Raster coordinates follow the usual image convention: origin in the top
//! left corner, y growing downwards.

use std::f32::consts::TAU;

use image::{Rgba, RgbaImage};

use crate::geometry::{MapSize, TrackGeometry};

pub const ROAD_GREY: Rgba<u8> = Rgba([0x6e, 0x6e, 0x6e, 0xff]);
pub const LANE_MARKING: Rgba<u8> = Rgba([0xe0, 0xff, 0xff, 0xff]);
pub const PANEL_WHITE: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);
pub const WINDOW_GREY: Rgba<u8> = Rgba([0x66, 0x66, 0x66, 0xff]);

/// On/off lengths of the lane marking dashes, in pixels along the circle.
pub const LANE_DASH: [f32; 2] = [10.0, 14.0];
pub const LANE_LINE_WIDTH: f32 = 2.0;

/// Stroke style for [`stroke_dashed_circle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashedStroke {
    pub color: Rgba<u8>,
    pub line_width: f32,
    pub dash: [f32; 2],
}

/// Road surface for the whole map with both lane centre lines painted on.
pub fn paint_lane_markings(map: MapSize, geometry: &TrackGeometry) -> RgbaImage {
    let width = map.width.round().max(1.0) as u32;
    let height = map.height.round().max(1.0) as u32;
    let mut img = RgbaImage::from_pixel(width, height, ROAD_GREY);

    let stroke = DashedStroke {
        color: LANE_MARKING,
        line_width: LANE_LINE_WIDTH,
        dash: LANE_DASH,
    };
    let cy = map.height / 2.0;
    for cx in [
        map.width / 2.0 - geometry.arc_center_x,
        map.width / 2.0 + geometry.arc_center_x,
    ] {
        stroke_dashed_circle(&mut img, [cx, cy], geometry.track_radius, &stroke);
    }
    img
}

/// Stroke a full circle with a dash pattern that starts at angle zero and
/// runs in the direction of increasing angle.
///
/// A pixel is painted when its centre lies within half the line width of the
/// circle and the arc length to its angle falls in an "on" part of the
/// pattern.
pub fn stroke_dashed_circle(
    img: &mut RgbaImage,
    center: [f32; 2],
    radius: f32,
    stroke: &DashedStroke,
) {
    let half = stroke.line_width / 2.0;
    let period = stroke.dash[0] + stroke.dash[1];
    if radius <= 0.0 || period <= 0.0 {
        return;
    }

    let reach = radius + half + 1.0;
    let x0 = (center[0] - reach).floor().max(0.0) as u32;
    let y0 = (center[1] - reach).floor().max(0.0) as u32;
    let x1 = ((center[0] + reach).ceil().max(0.0) as u32).min(img.width());
    let y1 = ((center[1] + reach).ceil().max(0.0) as u32).min(img.height());

    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f32 + 0.5 - center[0];
            let dy = y as f32 + 0.5 - center[1];
            let distance = (dx * dx + dy * dy).sqrt();
            if (distance - radius).abs() > half {
                continue;
            }
            let angle = dy.atan2(dx).rem_euclid(TAU);
            if (angle * radius) % period < stroke.dash[0] {
                img.put_pixel(x, y, stroke.color);
            }
        }
    }
}

/// Fill the axis-aligned rectangle `(x, y, width, height)`, clipped to the image.
pub fn fill_rect(img: &mut RgbaImage, rect: [u32; 4], color: Rgba<u8>) {
    let [x, y, w, h] = rect;
    for py in y..y.saturating_add(h).min(img.height()) {
        for px in x..x.saturating_add(w).min(img.width()) {
            img.put_pixel(px, py, color);
        }
    }
}

/// Windscreen panel for the car cabin's front and back.
pub fn car_front_texture() -> RgbaImage {
    let mut img = RgbaImage::from_pixel(64, 32, PANEL_WHITE);
    fill_rect(&mut img, [8, 8, 48, 24], WINDOW_GREY);
    img
}

/// Side panel with two windows for the car cabin's flanks.
pub fn car_side_texture() -> RgbaImage {
    let mut img = RgbaImage::from_pixel(128, 32, PANEL_WHITE);
    fill_rect(&mut img, [10, 8, 38, 24], WINDOW_GREY);
    fill_rect(&mut img, [58, 8, 60, 24], WINDOW_GREY);
    img
}
