//! Drawing surfaces for signature capture

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::png;
use crate::config::SignatureConfig;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Encoded image ready for transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImagePayload {
    pub fn png(data: Vec<u8>) -> Self {
        Self {
            mime_type: "image/png".to_string(),
            data,
        }
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}

/// Something a signature can be drawn on
pub trait DrawingSurface {
    /// Map a pointer position into surface-local coordinates
    fn to_local(&self, client: Point) -> Point;

    fn draw_segment(&mut self, from: Point, to: Point);

    fn clear(&mut self);

    fn export(&self) -> Result<ImagePayload>;
}

/// In-memory canvas with a round-capped pen
#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    /// Top-left corner of the surface in client coordinates
    origin: Point,
    stroke_width: f64,
    ink: Vec<u8>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            origin: Point::new(0.0, 0.0),
            stroke_width: 2.0,
            ink: vec![0; width as usize * height as usize],
        }
    }

    pub fn from_config(config: &SignatureConfig) -> Self {
        Self::new(config.width, config.height).with_stroke_width(config.stroke_width)
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width.max(0.5);
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_blank(&self) -> bool {
        self.ink.iter().all(|&a| a == 0)
    }

    pub fn inked_pixels(&self) -> usize {
        self.ink.iter().filter(|&&a| a != 0).count()
    }

    pub fn is_inked(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.ink[(y * self.width + x) as usize] != 0
    }
}

/// Distance from `p` to the segment `a`-`b`
fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

impl DrawingSurface for RasterSurface {
    fn to_local(&self, client: Point) -> Point {
        Point::new(client.x - self.origin.x, client.y - self.origin.y)
    }

    fn draw_segment(&mut self, from: Point, to: Point) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let radius = self.stroke_width / 2.0;
        let max_x = (self.width - 1) as f64;
        let max_y = (self.height - 1) as f64;
        let x0 = (from.x.min(to.x) - radius).floor().clamp(0.0, max_x) as u32;
        let x1 = (from.x.max(to.x) + radius).ceil().clamp(0.0, max_x) as u32;
        let y0 = (from.y.min(to.y) - radius).floor().clamp(0.0, max_y) as u32;
        let y1 = (from.y.max(to.y) + radius).ceil().clamp(0.0, max_y) as u32;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let centre = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if distance_to_segment(centre, from, to) <= radius {
                    self.ink[(y * self.width + x) as usize] = 255;
                }
            }
        }
    }

    fn clear(&mut self) {
        self.ink.fill(0);
    }

    fn export(&self) -> Result<ImagePayload> {
        png::encode_ink(self.width, self.height, &self.ink).map(ImagePayload::png)
    }
}
