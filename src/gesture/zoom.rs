//! Pinch-zoom and multi-finger pan on the video surface, and the classifier
//! that decides whether a two-finger sequence belongs here or to the pointer
//! recognizer's scroll path. Classification is monotonic: once decided it
//! stays decided until the finger count changes.

use egui::{Pos2, Rect, Vec2};

use crate::geometry::VideoGeometry;
use crate::viewport::{ViewportTransform, ZOOMED_EPSILON};

/// Inter-finger distance change that classifies a sequence as a pinch.
pub const PINCH_DISTANCE_THRESHOLD: f32 = 15.0;

/// Midpoint displacement that classifies a sequence as scroll-or-pan.
pub const MIDPOINT_DECIDE_THRESHOLD: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoFingerClaim {
    Undecided,
    Pinch,
    Pan,
    /// Not acted on here: handed off to the pointer recognizer.
    Scroll,
}

impl TwoFingerClaim {
    pub fn is_zoom(&self) -> bool {
        matches!(self, TwoFingerClaim::Pinch | TwoFingerClaim::Pan)
    }
}

#[derive(Debug)]
struct TwoFingerSession {
    start_mid: Pos2,
    start_dist: f32,
    start_scale: f32,
    start_translate: Vec2,
    /// Focal point relative to the surface center in unzoomed screen units;
    /// kept visually stationary while the scale changes.
    focal_rel: Vec2,
    last_mid: Pos2,
    claim: TwoFingerClaim,
}

pub struct ZoomPanController {
    transform: ViewportTransform,
    session: Option<TwoFingerSession>,
    three_last_mid: Option<Pos2>,
    zoomed: bool,
    on_zoom_change: Option<Box<dyn FnMut(bool)>>,
}

impl ZoomPanController {
    pub fn new() -> Self {
        Self {
            transform: ViewportTransform::default(),
            session: None,
            three_last_mid: None,
            zoomed: false,
            on_zoom_change: None,
        }
    }

    pub fn transform(&self) -> ViewportTransform {
        self.transform
    }

    pub fn is_zoomed(&self) -> bool {
        self.zoomed
    }

    /// Single-assignment notification slot; fired whenever the zoomed state
    /// flips, so surrounding chrome can reflect it.
    pub fn set_zoom_listener(&mut self, listener: Box<dyn FnMut(bool)>) {
        self.on_zoom_change = Some(listener);
    }

    pub fn two_begin(&mut self, a: Pos2, b: Pos2, surface: Rect) {
        let mid = midpoint(a, b);
        let center = surface.center();
        self.session = Some(TwoFingerSession {
            start_mid: mid,
            start_dist: a.distance(b),
            start_scale: self.transform.scale,
            start_translate: self.transform.translate,
            focal_rel: (mid - center - self.transform.translate) / self.transform.scale,
            last_mid: mid,
            claim: TwoFingerClaim::Undecided,
        });
    }

    /// Feed the current two contacts; classifies once, then executes the
    /// claimed gesture. Returns the (possibly fresh) classification so the
    /// engine can route scroll sequences to the pointer recognizer.
    pub fn two_update(&mut self, a: Pos2, b: Pos2, surface: Rect) -> TwoFingerClaim {
        let zoomed = self.zoomed;
        let Some(session) = self.session.as_mut() else {
            return TwoFingerClaim::Undecided;
        };
        let dist = a.distance(b);
        let mid = midpoint(a, b);

        if session.claim == TwoFingerClaim::Undecided {
            if (dist - session.start_dist).abs() > PINCH_DISTANCE_THRESHOLD {
                session.claim = TwoFingerClaim::Pinch;
            } else if (mid - session.start_mid).length() > MIDPOINT_DECIDE_THRESHOLD {
                session.claim = if zoomed {
                    TwoFingerClaim::Pan
                } else {
                    TwoFingerClaim::Scroll
                };
            }
        }

        match session.claim {
            TwoFingerClaim::Pinch => {
                let ratio = if session.start_dist > 0.0 {
                    dist / session.start_dist
                } else {
                    1.0
                };
                self.transform.set_scale(session.start_scale * ratio);
                // Keep the initial midpoint visually stationary under the
                // scale change.
                self.transform.translate = session.start_translate
                    + session.focal_rel * (session.start_scale - self.transform.scale);
                self.transform.clamp_translate(surface.size());
            }
            TwoFingerClaim::Pan => {
                self.transform.translate += mid - session.last_mid;
                self.transform.clamp_translate(surface.size());
            }
            TwoFingerClaim::Scroll | TwoFingerClaim::Undecided => {}
        }
        session.last_mid = mid;
        let claim = session.claim;
        self.sync_zoomed();
        claim
    }

    /// Finger count left two. Returns the final claim; a sequence that ended
    /// still undecided was a no-op. Ending barely above identity snaps back
    /// to fit.
    pub fn two_end(&mut self) -> TwoFingerClaim {
        let claim = match self.session.take() {
            Some(s) => s.claim,
            None => TwoFingerClaim::Undecided,
        };
        if !self.transform.is_zoomed() && !self.transform.is_identity() {
            self.transform.reset();
        }
        self.sync_zoomed();
        claim
    }

    pub fn three_begin(&mut self, mid: Pos2) {
        self.three_last_mid = Some(mid);
    }

    pub fn three_update(&mut self, mid: Pos2, surface: Rect) {
        let Some(last) = self.three_last_mid else {
            return;
        };
        self.transform.translate += mid - last;
        self.transform.clamp_translate(surface.size());
        self.three_last_mid = Some(mid);
    }

    pub fn three_end(&mut self) {
        self.three_last_mid = None;
    }

    pub fn abort(&mut self) {
        self.session = None;
        self.three_last_mid = None;
    }

    /// Jump to the scale where one content pixel equals one screen pixel,
    /// centered. Ignored when the content already fits 1:1.
    pub fn zoom_to_native(&mut self, geo: &VideoGeometry) {
        let native = geo.native_scale();
        if native <= ZOOMED_EPSILON {
            return;
        }
        self.transform.set_scale(native);
        self.transform.translate = Vec2::ZERO;
        self.sync_zoomed();
    }

    pub fn reset_zoom(&mut self) {
        self.transform.reset();
        self.sync_zoomed();
    }

    fn sync_zoomed(&mut self) {
        let zoomed = self.transform.is_zoomed();
        if zoomed != self.zoomed {
            self.zoomed = zoomed;
            if let Some(listener) = self.on_zoom_change.as_mut() {
                listener(zoomed);
            }
        }
    }
}

impl Default for ZoomPanController {
    fn default() -> Self {
        Self::new()
    }
}

fn midpoint(a: Pos2, b: Pos2) -> Pos2 {
    Pos2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use approx::assert_relative_eq;
    use egui::{pos2, vec2};

    use super::*;

    fn surface() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0))
    }

    #[test]
    fn distance_change_classifies_pinch_and_scales() {
        let mut z = ZoomPanController::new();
        // 100 px apart -> 130 px apart, midpoint stationary.
        z.two_begin(pos2(350.0, 300.0), pos2(450.0, 300.0), surface());
        let claim = z.two_update(pos2(335.0, 300.0), pos2(465.0, 300.0), surface());
        assert_eq!(claim, TwoFingerClaim::Pinch);
        assert_relative_eq!(z.transform().scale, 1.3, epsilon = 1e-4);
    }

    #[test]
    fn classification_is_frozen_once_decided() {
        let mut z = ZoomPanController::new();
        z.two_begin(pos2(350.0, 300.0), pos2(450.0, 300.0), surface());
        z.two_update(pos2(335.0, 300.0), pos2(465.0, 300.0), surface());
        // A later large midpoint displacement stays a pinch.
        let claim = z.two_update(pos2(435.0, 400.0), pos2(565.0, 400.0), surface());
        assert_eq!(claim, TwoFingerClaim::Pinch);
    }

    #[test]
    fn midpoint_motion_without_zoom_hands_off_scroll() {
        let mut z = ZoomPanController::new();
        z.two_begin(pos2(350.0, 300.0), pos2(450.0, 300.0), surface());
        let claim = z.two_update(pos2(350.0, 312.0), pos2(450.0, 312.0), surface());
        assert_eq!(claim, TwoFingerClaim::Scroll);
        // Handed off, not acted on.
        assert_eq!(z.transform(), ViewportTransform::default());
    }

    #[test]
    fn scale_clamps_at_four() {
        let mut z = ZoomPanController::new();
        z.two_begin(pos2(390.0, 300.0), pos2(410.0, 300.0), surface());
        z.two_update(pos2(200.0, 300.0), pos2(600.0, 300.0), surface());
        assert_eq!(z.transform().scale, 4.0);
    }

    #[test]
    fn pinch_keeps_focal_point_stationary() {
        let mut z = ZoomPanController::new();
        // Focal midpoint at (600, 300), 200 px right of center.
        z.two_begin(pos2(550.0, 300.0), pos2(650.0, 300.0), surface());
        z.two_update(pos2(500.0, 300.0), pos2(700.0, 300.0), surface());
        let t = z.transform();
        assert_relative_eq!(t.scale, 2.0, epsilon = 1e-4);
        assert_relative_eq!(t.translate.x, -200.0, epsilon = 1e-3);
        assert_relative_eq!(t.translate.y, 0.0, epsilon = 1e-3);
        // Screen position of the focal point: center + focal_rel*scale + t.
        let screen_x = 400.0 + 200.0 * t.scale + t.translate.x;
        assert_relative_eq!(screen_x, 600.0, epsilon = 1e-3);
    }

    #[test]
    fn pan_when_zoomed_follows_fingers_and_clamps() {
        let mut z = ZoomPanController::new();
        z.two_begin(pos2(350.0, 300.0), pos2(450.0, 300.0), surface());
        z.two_update(pos2(300.0, 300.0), pos2(500.0, 300.0), surface());
        z.two_end();
        assert!(z.is_zoomed());

        z.two_begin(pos2(390.0, 300.0), pos2(410.0, 300.0), surface());
        let claim = z.two_update(pos2(390.0, 340.0), pos2(410.0, 340.0), surface());
        assert_eq!(claim, TwoFingerClaim::Pan);
        let before = z.transform().translate;
        z.two_update(pos2(390.0, 380.0), pos2(410.0, 380.0), surface());
        let after = z.transform().translate;
        assert_relative_eq!(after.y - before.y, 40.0, epsilon = 1e-3);

        // A huge pan cannot pull the content edge inside the viewport.
        z.two_update(pos2(390.0, 5000.0), pos2(410.0, 5000.0), surface());
        let t = z.transform();
        assert!(t.translate.y <= 600.0 * (t.scale - 1.0) / 2.0 + 1e-3);
    }

    #[test]
    fn undecided_sequence_ends_as_noop() {
        let mut z = ZoomPanController::new();
        z.two_begin(pos2(350.0, 300.0), pos2(450.0, 300.0), surface());
        z.two_update(pos2(352.0, 301.0), pos2(452.0, 301.0), surface());
        let claim = z.two_end();
        assert_eq!(claim, TwoFingerClaim::Undecided);
        assert_eq!(z.transform(), ViewportTransform::default());
    }

    #[test]
    fn ending_near_identity_snaps_back() {
        let mut z = ZoomPanController::new();
        z.two_begin(pos2(350.0, 300.0), pos2(450.0, 300.0), surface());
        // Classify as pinch, then settle at a scale barely above 1.
        z.two_update(pos2(335.0, 300.0), pos2(465.0, 300.0), surface());
        z.two_update(pos2(348.0, 300.0), pos2(452.0, 300.0), surface());
        assert!(z.transform().scale < ZOOMED_EPSILON);
        z.two_end();
        assert_eq!(z.transform(), ViewportTransform::default());
        assert!(!z.is_zoomed());
    }

    #[test]
    fn three_finger_drag_pans() {
        let mut z = ZoomPanController::new();
        z.two_begin(pos2(350.0, 300.0), pos2(450.0, 300.0), surface());
        z.two_update(pos2(300.0, 300.0), pos2(500.0, 300.0), surface());
        z.two_end();

        z.three_begin(pos2(400.0, 300.0));
        z.three_update(pos2(420.0, 330.0), surface());
        let t = z.transform();
        assert_relative_eq!(t.translate.x, 20.0, epsilon = 1e-3);
        assert_relative_eq!(t.translate.y, 30.0, epsilon = 1e-3);
    }

    #[test]
    fn zoom_to_native_ignores_near_fit() {
        let mut z = ZoomPanController::new();
        // Displayed at 96% of native: within the epsilon, no jump.
        let geo = VideoGeometry {
            surface: surface(),
            source: vec2(820.0, 615.0),
            view: vec2(800.0, 600.0),
        };
        z.zoom_to_native(&geo);
        assert_eq!(z.transform(), ViewportTransform::default());

        let geo = VideoGeometry {
            surface: surface(),
            source: vec2(1920.0, 1440.0),
            view: vec2(800.0, 600.0),
        };
        z.zoom_to_native(&geo);
        assert_relative_eq!(z.transform().scale, 2.4, epsilon = 1e-4);
        assert_eq!(z.transform().translate, Vec2::ZERO);
        assert!(z.is_zoomed());
    }

    #[test]
    fn listener_fires_on_zoom_state_changes() {
        let seen: Rc<RefCell<Vec<bool>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut z = ZoomPanController::new();
        z.set_zoom_listener(Box::new(move |zoomed| sink.borrow_mut().push(zoomed)));

        z.two_begin(pos2(350.0, 300.0), pos2(450.0, 300.0), surface());
        z.two_update(pos2(300.0, 300.0), pos2(500.0, 300.0), surface());
        z.two_end();
        z.reset_zoom();
        assert_eq!(*seen.borrow(), vec![true, false]);
    }
}
