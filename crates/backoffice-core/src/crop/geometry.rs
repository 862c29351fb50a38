//! Crop-canvas geometry: fit, pan, zoom, and the screen-to-source mapping.
//!
//! The canvas shows the bitmap scaled by `zoom` and shifted by the pan
//! offset; the fixed-aspect crop rectangle floats above it. All state
//! transitions are pure mutations on [`CropGeometry`], and rendering is a
//! separate concern - the host reads the geometry back and draws it.
//!
//! # Invariants
//!
//! - The crop rectangle is always fully contained in the canvas.
//! - Its aspect ratio equals the active ratio (within float rounding).
//! - `zoom` stays within `[MIN_ZOOM, MAX_ZOOM]`.
//!
//! # Coordinate mapping
//!
//! With canvas `(w, h)`, zoom `z`, and pan `(ox, oy)`, the image is drawn
//! at `destW = w*z`, `destH = h*z`, positioned at
//! `destX = (w - destW)/2 + ox`, `destY = (h - destH)/2 + oy`. A screen
//! point `(x, y)` maps to source pixel
//! `((x - destX)/destW * bitmapW, (y - destY)/destH * bitmapH)`.

use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.3;
pub const MAX_ZOOM: f64 = 3.0;
/// Fixed wheel increment.
pub const ZOOM_STEP: f64 = 0.1;
/// Initial crop size as a fraction of the smaller canvas dimension.
pub const DEFAULT_SIZE_SCALE: f64 = 0.8;

/// Display canvas dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub w: f64,
    pub h: f64,
}

/// Pan offset of the displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

/// The fixed-aspect selection rectangle, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl CropRect {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }
}

/// Crop aspect ratio, e.g. 1:1, 16:9, 4:3.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub rw: f64,
    pub rh: f64,
}

impl AspectRatio {
    pub fn new(rw: f64, rh: f64) -> Self {
        // Degenerate ratios collapse to square rather than dividing by zero
        if rw <= 0.0 || rh <= 0.0 {
            return Self::square();
        }
        Self { rw, rh }
    }

    pub fn square() -> Self {
        Self { rw: 1.0, rh: 1.0 }
    }

    pub fn ratio(&self) -> f64 {
        self.rw / self.rh
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::square()
    }
}

/// A mapped rectangle in source-bitmap pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Fit a bitmap into a bounded display box, preserving its native aspect.
pub fn fit_canvas(bitmap_w: u32, bitmap_h: u32, max_w: f64, max_h: f64) -> CanvasSize {
    let bw = bitmap_w.max(1) as f64;
    let bh = bitmap_h.max(1) as f64;
    let scale = (max_w / bw).min(max_h / bh);
    CanvasSize {
        w: bw * scale,
        h: bh * scale,
    }
}

/// Interactive crop state over one canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropGeometry {
    pub canvas: CanvasSize,
    pub zoom: f64,
    pub pan: Offset,
    pub rect: CropRect,
    pub aspect: AspectRatio,
    pub size_scale: f64,
}

impl CropGeometry {
    /// Fresh geometry: zoom 1, no pan, rect centered at the default size.
    pub fn new(canvas: CanvasSize, aspect: AspectRatio) -> Self {
        Self {
            canvas,
            zoom: 1.0,
            pan: Offset::default(),
            rect: centered_rect(canvas, aspect, DEFAULT_SIZE_SCALE),
            aspect,
            size_scale: DEFAULT_SIZE_SCALE,
        }
    }

    /// Translate the crop rectangle, clamped inside the canvas.
    pub fn drag(&mut self, dx: f64, dy: f64) {
        self.rect.x = (self.rect.x + dx).clamp(0.0, (self.canvas.w - self.rect.w).max(0.0));
        self.rect.y = (self.rect.y + dy).clamp(0.0, (self.canvas.h - self.rect.h).max(0.0));
    }

    /// Shift the displayed image; the rectangle stays put.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan.x += dx;
        self.pan.y += dy;
    }

    /// Wheel zoom in fixed increments, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn zoom_steps(&mut self, steps: i32) {
        self.set_zoom(self.zoom + f64::from(steps) * ZOOM_STEP);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Switch aspect ratio; recomputes the centered rectangle from scratch,
    /// discarding any manual repositioning.
    pub fn set_aspect(&mut self, aspect: AspectRatio) {
        self.aspect = aspect;
        self.rect = centered_rect(self.canvas, aspect, self.size_scale);
    }

    /// Resize via the size slider; same recentering as at load.
    pub fn set_size_scale(&mut self, size_scale: f64) {
        self.size_scale = size_scale.clamp(0.1, 1.0);
        self.rect = centered_rect(self.canvas, self.aspect, self.size_scale);
    }

    /// Where the scaled image is drawn: `(destX, destY, destW, destH)`.
    pub fn image_dest(&self) -> (f64, f64, f64, f64) {
        let dest_w = self.canvas.w * self.zoom;
        let dest_h = self.canvas.h * self.zoom;
        let dest_x = (self.canvas.w - dest_w) / 2.0 + self.pan.x;
        let dest_y = (self.canvas.h - dest_h) / 2.0 + self.pan.y;
        (dest_x, dest_y, dest_w, dest_h)
    }

    /// Map the crop rectangle back into source-bitmap pixel coordinates,
    /// clamped to the bitmap bounds. Never reads out of bounds, even when
    /// the rectangle extends past the zoomed image; output is at least 1x1.
    pub fn map_to_source(&self, bitmap_w: u32, bitmap_h: u32) -> SourceRect {
        let (dest_x, dest_y, dest_w, dest_h) = self.image_dest();
        let bw = bitmap_w as f64;
        let bh = bitmap_h as f64;

        let to_src_x = |x: f64| ((x - dest_x) / dest_w * bw).clamp(0.0, bw);
        let to_src_y = |y: f64| ((y - dest_y) / dest_h * bh).clamp(0.0, bh);

        let x0 = to_src_x(self.rect.x).round() as u32;
        let y0 = to_src_y(self.rect.y).round() as u32;
        let x1 = to_src_x(self.rect.x + self.rect.w).round() as u32;
        let y1 = to_src_y(self.rect.y + self.rect.h).round() as u32;

        let x = x0.min(bitmap_w.saturating_sub(1));
        let y = y0.min(bitmap_h.saturating_sub(1));
        let w = x1.saturating_sub(x).max(1).min(bitmap_w - x);
        let h = y1.saturating_sub(y).max(1).min(bitmap_h - y);

        SourceRect { x, y, w, h }
    }
}

/// The centering formula used at load and on every aspect/size change:
/// the rectangle spans `size_scale` of the smaller canvas dimension,
/// shaped by the aspect ratio and shrunk if either side overflows.
pub fn centered_rect(canvas: CanvasSize, aspect: AspectRatio, size_scale: f64) -> CropRect {
    let base = size_scale.clamp(0.1, 1.0) * canvas.w.min(canvas.h);
    let ratio = aspect.ratio();

    let (mut w, mut h) = if ratio >= 1.0 {
        (base, base / ratio)
    } else {
        (base * ratio, base)
    };

    // A wide ratio on a narrow canvas (or vice versa) can still overflow
    let shrink = (canvas.w / w).min(canvas.h / h).min(1.0);
    w *= shrink;
    h *= shrink;

    CropRect {
        x: (canvas.w - w) / 2.0,
        y: (canvas.h - h) / 2.0,
        w,
        h,
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// One user interaction on the crop dialog.
    #[derive(Debug, Clone)]
    enum Op {
        Drag(f64, f64),
        Pan(f64, f64),
        Zoom(i32),
        Aspect(f64, f64),
        SizeScale(f64),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (-500.0f64..=500.0, -500.0f64..=500.0).prop_map(|(x, y)| Op::Drag(x, y)),
            (-500.0f64..=500.0, -500.0f64..=500.0).prop_map(|(x, y)| Op::Pan(x, y)),
            (-40i32..=40).prop_map(Op::Zoom),
            (1.0f64..=21.0, 1.0f64..=21.0).prop_map(|(w, h)| Op::Aspect(w, h)),
            (0.1f64..=1.0).prop_map(Op::SizeScale),
        ]
    }

    fn apply(g: &mut CropGeometry, op: &Op) {
        match *op {
            Op::Drag(x, y) => g.drag(x, y),
            Op::Pan(x, y) => g.pan_by(x, y),
            Op::Zoom(steps) => g.zoom_steps(steps),
            Op::Aspect(w, h) => g.set_aspect(AspectRatio::new(w, h)),
            Op::SizeScale(s) => g.set_size_scale(s),
        }
    }

    proptest! {
        /// Property: After any interaction sequence the rectangle stays
        /// inside the canvas and keeps the active aspect ratio.
        #[test]
        fn prop_rect_contained_and_aspect_held(
            (cw, ch) in (50.0f64..=1000.0, 50.0f64..=1000.0),
            ops in prop::collection::vec(arb_op(), 0..30),
        ) {
            let canvas = CanvasSize { w: cw, h: ch };
            let mut g = CropGeometry::new(canvas, AspectRatio::square());

            for op in &ops {
                apply(&mut g, op);

                prop_assert!(g.rect.x >= -1e-6);
                prop_assert!(g.rect.y >= -1e-6);
                prop_assert!(g.rect.x + g.rect.w <= cw + 1e-6);
                prop_assert!(g.rect.y + g.rect.h <= ch + 1e-6);

                // Aspect within 1px of rounding at the rect's scale
                let expected_h = g.rect.w / g.aspect.ratio();
                prop_assert!((g.rect.h - expected_h).abs() <= 1.0,
                    "aspect drifted: w={} h={} ratio={}", g.rect.w, g.rect.h, g.aspect.ratio());
            }
        }

        /// Property: Zoom never leaves its bounds.
        #[test]
        fn prop_zoom_bounded(ops in prop::collection::vec(arb_op(), 0..50)) {
            let mut g = CropGeometry::new(CanvasSize { w: 400.0, h: 300.0 }, AspectRatio::square());
            for op in &ops {
                apply(&mut g, op);
                prop_assert!(g.zoom >= MIN_ZOOM && g.zoom <= MAX_ZOOM);
            }
        }

        /// Property: The mapped source rectangle is always a valid,
        /// at-least-1x1 region of the bitmap.
        #[test]
        fn prop_source_rect_in_bounds(
            (bw, bh) in (1u32..=4000, 1u32..=4000),
            ops in prop::collection::vec(arb_op(), 0..20),
        ) {
            let canvas = fit_canvas(bw, bh, 640.0, 480.0);
            let mut g = CropGeometry::new(canvas, AspectRatio::square());
            for op in &ops {
                apply(&mut g, op);
            }

            let src = g.map_to_source(bw, bh);
            prop_assert!(src.w >= 1 && src.h >= 1);
            prop_assert!(src.x + src.w <= bw, "x={} w={} bw={}", src.x, src.w, bw);
            prop_assert!(src.y + src.h <= bh, "y={} h={} bh={}", src.y, src.h, bh);
        }
    }
}
