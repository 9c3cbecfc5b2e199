use egui::{Color32, FontId, Painter, Pos2, Rect, Stroke, StrokeKind, Vec2};

use crate::geometry::VideoGeometry;
use crate::viewport::ViewportTransform;

pub const ACCENT: Color32 = Color32::from_rgb(0, 213, 255);
pub const SURFACE_BG: Color32 = Color32::from_rgb(16, 18, 22);
pub const MEDIA_BG: Color32 = Color32::from_rgb(28, 32, 40);
pub const OK_GREEN: Color32 = Color32::from_rgb(0, 200, 83);
pub const ERR_RED: Color32 = Color32::from_rgb(229, 57, 53);
pub const TRACK_GRAY: Color32 = Color32::from_rgb(60, 64, 72);

fn fade(color: Color32, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (255.0 * alpha) as u8)
}

/// Screen rectangle the media occupies under the current transform.
pub fn media_rect(geo: &VideoGeometry, transform: &ViewportTransform) -> Rect {
    let center = geo.surface.center();
    let unzoomed = Rect::from_center_size(center, geo.view);
    let min = center + (unzoomed.min - center) * transform.scale + transform.translate;
    let max = center + (unzoomed.max - center) * transform.scale + transform.translate;
    Rect::from_min_max(min, max)
}

/// Letterboxed video area. The stream itself is painted by the streaming
/// collaborator; this draws the backdrop and the media bounds.
pub fn draw_video_surface(painter: &Painter, geo: &VideoGeometry, transform: &ViewportTransform) {
    painter.rect_filled(geo.surface, 0.0, SURFACE_BG);
    let media = media_rect(geo, transform);
    painter.rect_filled(media, 2.0, MEDIA_BG);
    painter.rect_stroke(media, 2.0, Stroke::new(1.0, TRACK_GRAY), StrokeKind::Inside);
    painter.text(
        media.center(),
        egui::Align2::CENTER_CENTER,
        format!("{:.0}x{:.0}", geo.source.x, geo.source.y),
        FontId::proportional(14.0),
        fade(TRACK_GRAY, 0.8),
    );
}

pub fn draw_ring(
    painter: &Painter,
    center: Pos2,
    inner_radius: f32,
    outer_radius: f32,
    color: Color32,
) {
    let mid_radius = (inner_radius + outer_radius) / 2.0;
    let thickness = outer_radius - inner_radius;
    painter.circle_stroke(center, mid_radius, Stroke::new(thickness, color));
}

/// Marker for an active contact on the surface; filled while a drag owns it.
pub fn draw_touch_marker(painter: &Painter, pos: Pos2, dragging: bool) {
    if dragging {
        painter.circle_filled(pos, 14.0, fade(ACCENT, 0.5));
    }
    draw_ring(painter, pos, 10.0, 13.0, fade(ACCENT, 0.8));
}

/// Vertical jog-shuttle track with dead-zone band and thumb.
pub fn draw_shuttle(
    painter: &Painter,
    track: Rect,
    displacement: f32,
    dead_zone: f32,
    active: bool,
) {
    painter.rect_filled(track, 6.0, fade(TRACK_GRAY, 0.35));
    painter.rect_stroke(track, 6.0, Stroke::new(1.0, TRACK_GRAY), StrokeKind::Inside);

    let center = track.center();
    let dead = Rect::from_center_size(center, Vec2::new(track.width(), dead_zone * 2.0));
    painter.rect_filled(dead, 0.0, fade(TRACK_GRAY, 0.5));

    let half = track.height() / 2.0 - 10.0;
    let thumb = Pos2::new(center.x, center.y + displacement.clamp(-half, half));
    let color = if active { ACCENT } else { fade(ACCENT, 0.6) };
    painter.circle_filled(thumb, track.width() / 2.0 - 4.0, color);
}

pub fn draw_connection_dot(painter: &Painter, pos: Pos2, connected: bool) {
    let color = if connected { OK_GREEN } else { ERR_RED };
    painter.circle_filled(pos, 5.0, color);
}

pub fn draw_zoom_badge(painter: &Painter, corner: Pos2, scale: f32) {
    painter.text(
        corner,
        egui::Align2::RIGHT_TOP,
        format!("{:.1}x", scale),
        FontId::monospace(14.0),
        ACCENT,
    );
}
