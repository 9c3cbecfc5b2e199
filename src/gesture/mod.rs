//! Gesture engine: owns the pointer recognizer and the zoom/pan controller,
//! diffs per-frame contact snapshots into touch transitions, and enforces the
//! exclusive-claim rule so a two-finger sequence is acted on by exactly one
//! recognizer. The shuttle is input-isolated on its own widget surface and is
//! not routed through here.

pub mod pointer;
pub mod shuttle;
pub mod zoom;

use std::time::{Duration, Instant};

use egui::Pos2;

use crate::geometry::VideoGeometry;
use crate::hid::{HidEvent, HidSink, PointerMode};
use crate::input::Contact;
use crate::viewport::ViewportTransform;
use self::pointer::PointerRecognizer;
use self::zoom::{TwoFingerClaim, ZoomPanController};

/// Period of the absolute-move flush timer. Bounds how often absolute frames
/// go out regardless of how fast the platform delivers touch moves.
pub const ABS_FLUSH_PERIOD: Duration = Duration::from_millis(10);

/// Emission seam handed to the pointer recognizer. `move_abs` takes a
/// screen-space position; the engine remaps it through the viewport
/// transform and letterbox before it reaches the wire.
pub trait GestureSink {
    fn hid(&mut self, event: HidEvent);
    fn move_abs(&mut self, screen: Pos2);
}

struct RemapSink<'a> {
    sink: &'a mut dyn HidSink,
    geo: &'a VideoGeometry,
    transform: ViewportTransform,
}

impl GestureSink for RemapSink<'_> {
    fn hid(&mut self, event: HidEvent) {
        self.sink.send(event);
    }

    fn move_abs(&mut self, screen: Pos2) {
        let content = self.geo.to_content_space(screen, &self.transform);
        let (x, y) = self.geo.to_remote(content);
        self.sink.send(HidEvent::MoveAbs { x, y });
    }
}

pub struct GestureEngine {
    pointer: PointerRecognizer,
    zoom: ZoomPanController,
    pointer_enabled: bool,
    zoom_enabled: bool,
    prev_count: usize,
    next_flush: Option<Instant>,
}

impl GestureEngine {
    pub fn new(mode: PointerMode) -> Self {
        Self {
            pointer: PointerRecognizer::new(mode),
            zoom: ZoomPanController::new(),
            pointer_enabled: true,
            zoom_enabled: true,
            prev_count: 0,
            next_flush: None,
        }
    }

    pub fn mode(&self) -> PointerMode {
        self.pointer.mode()
    }

    pub fn set_mode(&mut self, mode: PointerMode) {
        self.pointer.set_mode(mode);
        self.prev_count = 0;
    }

    pub fn set_pointer_sensitivity(&mut self, sensitivity: f32) {
        self.pointer.set_sensitivity(sensitivity);
    }

    pub fn set_scroll_sensitivity(&mut self, sensitivity: f32) {
        self.pointer.set_scroll_sensitivity(sensitivity);
    }

    /// Master switch for touch processing on the video surface, e.g. while a
    /// panel or on-screen keyboard has focus. Disabling abandons all live
    /// sessions; pending click-pulse halves still drain.
    pub fn set_pointer_enabled(&mut self, enabled: bool) {
        self.pointer_enabled = enabled;
        if !enabled {
            self.pointer.reset();
            self.zoom.abort();
            self.prev_count = 0;
        }
    }

    /// Switch for the pinch/pan class only; with it off, every two-finger
    /// sequence classifies as scroll.
    pub fn set_zoom_enabled(&mut self, enabled: bool) {
        self.zoom_enabled = enabled;
        if !enabled {
            self.zoom.abort();
        }
    }

    pub fn transform(&self) -> ViewportTransform {
        self.zoom.transform()
    }

    pub fn is_zoomed(&self) -> bool {
        self.zoom.is_zoomed()
    }

    pub fn is_dragging(&self) -> bool {
        self.pointer.is_dragging()
    }

    pub fn set_zoom_listener(&mut self, listener: Box<dyn FnMut(bool)>) {
        self.zoom.set_zoom_listener(listener);
    }

    pub fn zoom_to_native(&mut self, geo: &VideoGeometry) {
        self.zoom.zoom_to_native(geo);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom.reset_zoom();
    }

    pub fn toggle_zoom(&mut self, geo: &VideoGeometry) {
        if self.zoom.is_zoomed() {
            self.zoom.reset_zoom();
        } else {
            self.zoom.zoom_to_native(geo);
        }
    }

    /// Feed one contact snapshot. Finger-count transitions are derived by
    /// diffing against the previous snapshot; more than three contacts are
    /// treated as three.
    pub fn update(
        &mut self,
        contacts: &[Contact],
        geo: &VideoGeometry,
        now: Instant,
        sink: &mut dyn HidSink,
    ) {
        if !self.pointer_enabled {
            return;
        }
        let count = contacts.len().min(3);
        let prev = self.prev_count;
        self.prev_count = count;

        let mut rs = RemapSink {
            sink,
            geo,
            transform: self.zoom.transform(),
        };

        match (prev, count) {
            (0, 1) => self.pointer.touch_start(contacts[0].pos, now),
            (1, 1) => self.pointer.touch_move(contacts[0].pos, &mut rs),
            (1, 0) => self.pointer.touch_end(now, &mut rs),

            (2, 2) => {
                let (a, b) = (contacts[0].pos, contacts[1].pos);
                let claim = if self.zoom_enabled {
                    self.zoom.two_update(a, b, geo.surface)
                } else {
                    TwoFingerClaim::Scroll
                };
                self.pointer
                    .two_move(midpoint(a, b), claim == TwoFingerClaim::Scroll, &mut rs);
            }
            (_, 2) => {
                // Entering a two-finger sequence from 0, 1, or 3 fingers.
                if prev == 3 {
                    self.zoom.three_end();
                }
                let (a, b) = (contacts[0].pos, contacts[1].pos);
                let mid = midpoint(a, b);
                if self.pointer.mode() == PointerMode::Absolute {
                    // Snap the cursor to the midpoint so the scroll context
                    // matches the cursor position.
                    rs.move_abs(mid);
                }
                self.pointer.two_begin(mid, now, &mut rs);
                if self.zoom_enabled {
                    self.zoom.two_begin(a, b, geo.surface);
                }
            }
            (2, 1) | (2, 0) => {
                let claim = if self.zoom_enabled {
                    self.zoom.two_end()
                } else {
                    TwoFingerClaim::Scroll
                };
                self.pointer.two_end(now, claim.is_zoom(), &mut rs);
                if count == 1 {
                    // 2 -> 1 reclassifies the remaining finger as a fresh
                    // session that can only stream movement.
                    self.pointer.resume_single(contacts[0].pos, now);
                }
            }

            (3, 3) => {
                if self.zoom_enabled {
                    self.zoom.three_update(centroid(contacts), geo.surface);
                }
            }
            (_, 3) => {
                match prev {
                    2 => {
                        if self.zoom_enabled {
                            self.zoom.two_end();
                        }
                        self.pointer.two_abort();
                    }
                    1 => self.pointer.reset(),
                    _ => {}
                }
                if self.zoom_enabled {
                    self.zoom.three_begin(centroid(contacts));
                }
            }
            (3, 1) => {
                self.zoom.three_end();
                self.pointer.resume_single(contacts[0].pos, now);
            }
            (3, 0) => self.zoom.three_end(),

            _ => {}
        }
    }

    /// Poll all engine deadlines: pointer timers plus the periodic
    /// absolute-move flush. Call once per frame.
    pub fn tick(&mut self, geo: &VideoGeometry, now: Instant, sink: &mut dyn HidSink) {
        let mut rs = RemapSink {
            sink,
            geo,
            transform: self.zoom.transform(),
        };
        self.pointer.tick(now, &mut rs);

        if self.next_flush.is_none_or(|t| t <= now) {
            if let Some(target) = self.pointer.take_abs_target() {
                rs.move_abs(target);
            }
            self.next_flush = Some(now + ABS_FLUSH_PERIOD);
        }
    }
}

fn midpoint(a: Pos2, b: Pos2) -> Pos2 {
    Pos2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

fn centroid(contacts: &[Contact]) -> Pos2 {
    let n = contacts.len().min(3).max(1) as f32;
    let sum = contacts
        .iter()
        .take(3)
        .fold(egui::Vec2::ZERO, |acc, c| acc + c.pos.to_vec2());
    (sum / n).to_pos2()
}
