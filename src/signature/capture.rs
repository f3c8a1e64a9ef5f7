//! Freehand signature capture state machine

use tracing::{debug, info};

use super::surface::{DrawingSurface, ImagePayload, Point};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    /// Pointer is down; moves extend the current stroke
    Capturing,
}

/// Exported signature for a todo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedImage {
    pub item_id: i64,
    pub image: ImagePayload,
}

/// Signature session for one item.
///
/// Moves outside an active pen-down gesture are ignored, so the surface
/// never receives stray segments. The session is consumed by
/// [`cancel`](Self::cancel) or [`finish`](Self::finish) and never persisted.
#[derive(Debug)]
pub struct SignatureCapture<S> {
    item_id: i64,
    surface: Option<S>,
    state: CaptureState,
    strokes: Vec<Vec<Point>>,
}

impl<S: DrawingSurface> SignatureCapture<S> {
    /// Start a signature session for `item_id` with no surface yet
    pub fn open(item_id: i64) -> Self {
        Self {
            item_id,
            surface: None,
            state: CaptureState::Idle,
            strokes: Vec::new(),
        }
    }

    pub fn with_surface(item_id: i64, surface: S) -> Self {
        let mut capture = Self::open(item_id);
        capture.attach(surface);
        capture
    }

    /// Attach a fresh surface; previously recorded strokes are discarded
    pub fn attach(&mut self, surface: S) {
        self.surface = Some(surface);
        self.state = CaptureState::Idle;
        self.strokes.clear();
    }

    pub fn detach(&mut self) -> Option<S> {
        self.state = CaptureState::Idle;
        self.surface.take()
    }

    pub fn item_id(&self) -> i64 {
        self.item_id
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_capturing(&self) -> bool {
        self.state == CaptureState::Capturing
    }

    pub fn strokes(&self) -> &[Vec<Point>] {
        &self.strokes
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Start a new stroke at a surface-local point
    pub fn begin(&mut self, point: Point) -> Result<()> {
        if self.surface.is_none() {
            return Err(Error::SurfaceDetached);
        }
        self.strokes.push(vec![point]);
        self.state = CaptureState::Capturing;
        debug!("Stroke {} started for item {}", self.strokes.len(), self.item_id);
        Ok(())
    }

    /// Append to the current stroke; ignored unless capturing
    pub fn extend(&mut self, point: Point) {
        if self.state != CaptureState::Capturing {
            return;
        }
        let (Some(surface), Some(stroke)) = (self.surface.as_mut(), self.strokes.last_mut()) else {
            return;
        };
        if let Some(&previous) = stroke.last() {
            surface.draw_segment(previous, point);
        }
        stroke.push(point);
    }

    pub fn end(&mut self) {
        self.state = CaptureState::Idle;
    }

    /// Pointer-down in client coordinates
    pub fn pointer_down(&mut self, client: Point) -> Result<()> {
        let local = self
            .surface
            .as_ref()
            .ok_or(Error::SurfaceDetached)?
            .to_local(client);
        self.begin(local)
    }

    /// Pointer-move in client coordinates
    pub fn pointer_move(&mut self, client: Point) {
        if let Some(local) = self.surface.as_ref().map(|s| s.to_local(client)) {
            self.extend(local);
        }
    }

    pub fn pointer_up(&mut self) {
        self.end();
    }

    /// Erase the surface and forget every stroke
    pub fn clear(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
        }
        self.strokes.clear();
        debug!("Signature cleared for item {}", self.item_id);
    }

    pub fn export(&self) -> Result<ImagePayload> {
        self.surface
            .as_ref()
            .ok_or(Error::SurfaceDetached)?
            .export()
    }

    /// Discard the session
    pub fn cancel(self) {
        debug!("Signature for item {} cancelled", self.item_id);
    }

    /// Export and discard the session
    pub fn finish(self) -> Result<SignedImage> {
        let image = self.export()?;
        info!(
            "Signature captured for item {} ({} strokes, {} bytes)",
            self.item_id,
            self.strokes.len(),
            image.data.len()
        );
        Ok(SignedImage {
            item_id: self.item_id,
            image,
        })
    }
}
