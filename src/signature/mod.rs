//! Signature capture for signed PDF export

mod capture;
mod png;
mod surface;

pub use capture::{CaptureState, SignatureCapture, SignedImage};
pub use surface::{DrawingSurface, ImagePayload, Point, RasterSurface};

use crate::error::Result;

/// Replay recorded strokes (surface-local points) into a capture session
pub fn replay<S: DrawingSurface>(capture: &mut SignatureCapture<S>, strokes: &[Vec<Point>]) -> Result<()> {
    for stroke in strokes {
        let Some((first, rest)) = stroke.split_first() else {
            continue;
        };
        capture.begin(*first)?;
        for point in rest {
            capture.extend(*point);
        }
        capture.end();
    }
    Ok(())
}
