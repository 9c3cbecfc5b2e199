use egui::{Pos2, Rect, Vec2};

use crate::viewport::ViewportTransform;

/// On-screen layout of the video surface: where the widget sits, the remote
/// source resolution, and the aspect-fit size the media occupies inside the
/// widget (everything outside `view` is letterbox).
#[derive(Debug, Clone, Copy)]
pub struct VideoGeometry {
    pub surface: Rect,
    pub source: Vec2,
    pub view: Vec2,
}

impl VideoGeometry {
    pub fn new(surface: Rect, source: Vec2) -> Self {
        let view = fit_view(source, surface.size());
        Self {
            surface,
            source,
            view,
        }
    }

    /// Convert a raw screen position into content space: the coordinate frame
    /// of the unzoomed surface, relative to its bounding-box origin. Content
    /// coordinates stay stable while the viewport transform changes, so the
    /// absolute-mode remote mapping is unaffected by zoom/pan.
    pub fn to_content_space(&self, screen: Pos2, transform: &ViewportTransform) -> Pos2 {
        let center = self.surface.center();
        let unzoomed = center + (screen - center - transform.translate) / transform.scale;
        (unzoomed - self.surface.min).to_pos2()
    }

    /// Inverse of `to_content_space`, used to place overlays on screen.
    pub fn to_screen_space(&self, content: Pos2, transform: &ViewportTransform) -> Pos2 {
        let center = self.surface.center();
        let unzoomed = self.surface.min + content.to_vec2();
        center + (unzoomed - center) * transform.scale + transform.translate
    }

    /// Remap a content-space position onto the remote screen axes. The
    /// position within the displayed media rectangle is linearly remapped to
    /// the full signed 16-bit span, independently per axis, clamped.
    pub fn to_remote(&self, content: Pos2) -> (i16, i16) {
        let offset = (self.surface.size() - self.view) / 2.0;
        let x = remap(
            content.x - offset.x,
            0.0,
            self.view.x - 1.0,
            i16::MIN as f32,
            i16::MAX as f32,
        );
        let y = remap(
            content.y - offset.y,
            0.0,
            self.view.y - 1.0,
            i16::MIN as f32,
            i16::MAX as f32,
        );
        (clamp_i16(x), clamp_i16(y))
    }

    /// Scale at which one content pixel covers one screen pixel, i.e. the
    /// inverse of the fit-to-screen scale.
    pub fn native_scale(&self) -> f32 {
        if self.view.x <= 0.0 {
            return 1.0;
        }
        self.source.x / self.view.x
    }
}

/// Aspect-fit the source into the available area; centered, upscaling
/// allowed.
pub fn fit_view(source: Vec2, available: Vec2) -> Vec2 {
    if source.x <= 0.0 || source.y <= 0.0 {
        return Vec2::ZERO;
    }
    let ratio_available = available.x / available.y;
    let ratio_source = source.x / source.y;

    let scale = if ratio_available > ratio_source {
        available.y / source.y
    } else {
        available.x / source.x
    };
    source * scale
}

pub fn remap(value: f32, from_lo: f32, from_hi: f32, to_lo: f32, to_hi: f32) -> f32 {
    if from_hi <= from_lo {
        return to_lo;
    }
    to_lo + (value - from_lo) * (to_hi - to_lo) / (from_hi - from_lo)
}

fn clamp_i16(value: f32) -> i16 {
    value.round().clamp(i16::MIN as f32, i16::MAX as f32) as i16
}
