//! Icon rendering: opaque platform icon resources to transport-safe PNG.

use crate::error::IconError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{ImageOutputFormat, RgbaImage};
use log::debug;
use std::io::Cursor;

/// Canvas dimensions are capped before allocation.
const MAX_ICON_DIM: i32 = 4096;

/// A procedural or vector icon that paints itself onto a raster canvas.
pub trait DrawableIcon: Send + Sync {
    /// Intrinsic size in pixels. Non-positive or unknown dimensions get a
    /// 1px substitute from the renderer.
    fn intrinsic_size(&self) -> (i32, i32);

    /// Paint onto the full bounds of `canvas`.
    fn draw(&self, canvas: &mut RgbaImage) -> Result<(), IconError>;
}

/// An opaque platform icon: either a ready-made bitmap, used as-is, or
/// something that still has to be rasterized.
pub enum IconResource {
    Raster(RgbaImage),
    Drawable(Box<dyn DrawableIcon>),
}

/// Render an icon resource to a base64-encoded PNG (no line wrapping).
///
/// Any failure during sizing, drawing or encoding yields `None` so one bad
/// icon cannot take down catalog enumeration.
pub fn encode_icon(resource: &IconResource) -> Option<String> {
    match render(resource) {
        Ok(encoded) => Some(encoded),
        Err(err) => {
            debug!("icon rendering failed: {err}");
            None
        }
    }
}

fn render(resource: &IconResource) -> Result<String, IconError> {
    let png = match resource {
        IconResource::Raster(bitmap) => encode_png(bitmap)?,
        IconResource::Drawable(drawable) => {
            let (width, height) = drawable.intrinsic_size();
            // Fully transparent canvas at intrinsic bounds.
            let mut canvas = RgbaImage::new(clamp_dimension(width), clamp_dimension(height));
            drawable.draw(&mut canvas)?;
            encode_png(&canvas)?
        }
    };
    Ok(STANDARD.encode(png))
}

fn clamp_dimension(dim: i32) -> u32 {
    dim.clamp(1, MAX_ICON_DIM) as u32
}

fn encode_png(bitmap: &RgbaImage) -> Result<Vec<u8>, IconError> {
    let mut buf = Vec::new();
    bitmap.write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)?;
    Ok(buf)
}
