use crate::error::PersistError;
use image::{Rgb, RgbImage};
use std::path::Path;

pub(crate) const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
pub(crate) const POINT_COLOR: Rgb<u8> = Rgb([31, 119, 180]);
pub(crate) const AXIS_COLOR: Rgb<u8> = Rgb([0x66, 0x62, 0x62]);

const HALF_SQRT_3: f64 = 0.866_025_403_784_438_6;
const POINT_RADIUS: i64 = 2;
const DASH_ON: f64 = 8.0;
const DASH_OFF: f64 = 5.0;

/// Maps the plot window `[-L, L] x [-(√3/2)L, (√3/2)L]` onto pixel space
#[derive(Debug, Clone, Copy)]
pub struct PlotFrame {
    pub width: u32,
    pub height: u32,
    half_width: f64,
    half_height: f64,
}

impl PlotFrame {
    /// Frame of `width` pixels for a hexagon of radius `mesh_length`; height keeps the aspect
    pub fn new(mesh_length: u32, width: u32) -> Self {
        let half_width = mesh_length.max(1) as f64;
        let width = width.max(2);
        let height = ((width as f64 * HALF_SQRT_3).round() as u32).max(2);
        Self {
            width,
            height,
            half_width,
            half_height: half_width * HALF_SQRT_3,
        }
    }

    /// Pixel position of a Cartesian point, or `None` outside the window
    pub fn to_pixel(&self, x: f64, y: f64) -> Option<(i64, i64)> {
        if x.abs() > self.half_width + 1e-9 || y.abs() > self.half_height + 1e-9 {
            return None;
        }
        let px = (x + self.half_width) / (2.0 * self.half_width) * (self.width - 1) as f64;
        let py = (self.half_height - y) / (2.0 * self.half_height) * (self.height - 1) as f64;
        Some((px.round() as i64, py.round() as i64))
    }

    fn pixels_per_unit(&self) -> f64 {
        (self.width - 1) as f64 / (2.0 * self.half_width)
    }
}

fn put(img: &mut RgbImage, px: i64, py: i64, color: Rgb<u8>) {
    if px >= 0 && py >= 0 && (px as u32) < img.width() && (py as u32) < img.height() {
        img.put_pixel(px as u32, py as u32, color);
    }
}

/// Dashed line through the origin with the given slope, clipped to the frame
fn draw_axis(img: &mut RgbImage, frame: &PlotFrame, slope: f64) {
    // Walk along the line in half-pixel increments, measuring arc length for the dash pattern
    let ppu = frame.pixels_per_unit();
    let unit_len = (1.0 + slope * slope).sqrt();
    let step = 0.5 / (ppu * unit_len);
    let mut x = -frame.half_width;
    while x <= frame.half_width {
        let y = slope * x;
        let travelled = (x + frame.half_width) * unit_len * ppu;
        if travelled % (DASH_ON + DASH_OFF) < DASH_ON {
            if let Some((px, py)) = frame.to_pixel(x, y) {
                put(img, px, py, AXIS_COLOR);
            }
        }
        x += step;
    }
}

fn draw_point(img: &mut RgbImage, cx: i64, cy: i64) {
    for dy in -POINT_RADIUS..=POINT_RADIUS {
        for dx in -POINT_RADIUS..=POINT_RADIUS {
            if dx * dx + dy * dy <= POINT_RADIUS * POINT_RADIUS {
                put(img, cx + dx, cy + dy, POINT_COLOR);
            }
        }
    }
}

/// Scatter plot of nucleus points over the lattice's three symmetry axes (0°, 60°, -60°)
pub fn render_plot(points: &[(f64, f64)], mesh_length: u32, width: u32) -> RgbImage {
    let frame = PlotFrame::new(mesh_length, width);
    let mut img = RgbImage::from_pixel(frame.width, frame.height, BACKGROUND);

    for slope in [0.0, 3f64.sqrt(), -(3f64.sqrt())] {
        draw_axis(&mut img, &frame, slope);
    }
    for &(x, y) in points {
        if let Some((px, py)) = frame.to_pixel(x, y) {
            draw_point(&mut img, px, py);
        }
    }
    img
}

/// Render and save as an image whose format follows the file extension (PNG recommended)
pub fn save_plot(
    points: &[(f64, f64)],
    mesh_length: u32,
    width: u32,
    path: &Path,
) -> Result<(), PersistError> {
    render_plot(points, mesh_length, width).save(path)?;
    Ok(())
}
