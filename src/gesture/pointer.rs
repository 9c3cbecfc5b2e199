//! Single-finger pointer state machine (tap, double-tap, long-press, drag)
//! plus the two-finger scroll / right-click-tap path. All positions are in
//! screen space; the engine owns the content-space remap, so absolute cursor
//! placement goes through [`GestureSink::move_abs`].
//!
//! Every deadline is stored and polled; each firing re-checks that its
//! triggering condition still holds, since the touch state may have changed
//! between scheduling and the poll.

use std::time::{Duration, Instant};

use egui::Pos2;

use super::GestureSink;
use crate::hid::{HidEvent, MouseButton, PointerMode};

pub const TAP_MAX_DURATION: Duration = Duration::from_millis(200);
pub const TAP_MAX_DISTANCE: f32 = 10.0;
pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(300);
pub const LONG_PRESS_DELAY: Duration = Duration::from_millis(500);
pub const DRAG_ENGAGE_DELAY: Duration = Duration::from_millis(200);
pub const CLICK_PULSE_GAP: Duration = Duration::from_millis(50);
pub const TWO_FINGER_DEAD_ZONE: f32 = 5.0;

#[derive(Debug)]
struct SingleSession {
    start_pos: Pos2,
    start_time: Instant,
    /// Relative-mode movement anchor, reset after each delta emission.
    anchor: Pos2,
    moved: bool,
    long_press_fired: bool,
    /// This touch landed as the second tap of a double-tap pair.
    second_tap: bool,
    dragging: bool,
}

#[derive(Debug)]
struct TwoFingerSession {
    anchor_mid: Pos2,
    start_time: Instant,
    moved: bool,
}

pub struct PointerRecognizer {
    mode: PointerMode,
    sensitivity: f32,
    scroll_sensitivity: f32,
    single: Option<SingleSession>,
    two: Option<TwoFingerSession>,
    last_tap: Option<(Instant, Pos2)>,
    long_press_at: Option<Instant>,
    drag_engage_at: Option<Instant>,
    deferred_click_at: Option<Instant>,
    /// Scheduled second halves of click pulses.
    pending: Vec<(Instant, HidEvent)>,
    /// Latest absolute-mode position, drained by the engine's flush timer.
    abs_target: Option<Pos2>,
}

impl PointerRecognizer {
    pub fn new(mode: PointerMode) -> Self {
        Self {
            mode,
            sensitivity: 1.0,
            scroll_sensitivity: 0.3,
            single: None,
            two: None,
            last_tap: None,
            long_press_at: None,
            drag_engage_at: None,
            deferred_click_at: None,
            pending: Vec::new(),
            abs_target: None,
        }
    }

    pub fn mode(&self) -> PointerMode {
        self.mode
    }

    /// Switching modes mid-gesture abandons the current sessions; pending
    /// pulse halves still drain so no button is left stuck.
    pub fn set_mode(&mut self, mode: PointerMode) {
        self.mode = mode;
        self.reset();
    }

    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.sensitivity = sensitivity.max(0.01);
    }

    pub fn set_scroll_sensitivity(&mut self, sensitivity: f32) {
        self.scroll_sensitivity = sensitivity.max(0.01);
    }

    pub fn reset(&mut self) {
        self.single = None;
        self.two = None;
        self.long_press_at = None;
        self.drag_engage_at = None;
        self.deferred_click_at = None;
        self.abs_target = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.single.as_ref().is_some_and(|s| s.dragging)
    }

    pub fn take_abs_target(&mut self) -> Option<Pos2> {
        self.abs_target.take()
    }

    /// First contact of a single-finger sequence.
    pub fn touch_start(&mut self, pos: Pos2, now: Instant) {
        let mut session = SingleSession {
            start_pos: pos,
            start_time: now,
            anchor: pos,
            moved: false,
            long_press_fired: false,
            second_tap: false,
            dragging: false,
        };

        let is_second = self.last_tap.is_some_and(|(t, p)| {
            now.saturating_duration_since(t) <= DOUBLE_TAP_WINDOW
                && pos.distance(p) <= 2.0 * TAP_MAX_DISTANCE
        });

        if is_second {
            // Second tap of a double-tap: the deferred single click is off,
            // and the hold timer arms a drag instead of a long press.
            session.second_tap = true;
            self.deferred_click_at = None;
            self.drag_engage_at = Some(now + DRAG_ENGAGE_DELAY);
            self.long_press_at = None;
        } else {
            self.long_press_at = Some(now + LONG_PRESS_DELAY);
        }

        self.single = Some(session);
    }

    /// A finger carried over from a two-finger sequence: streams movement
    /// but can never tap, long-press, or drag-engage.
    pub fn resume_single(&mut self, pos: Pos2, now: Instant) {
        self.single = Some(SingleSession {
            start_pos: pos,
            start_time: now,
            anchor: pos,
            moved: true,
            long_press_fired: false,
            second_tap: false,
            dragging: false,
        });
        self.long_press_at = None;
        self.drag_engage_at = None;
    }

    pub fn touch_move(&mut self, pos: Pos2, sink: &mut dyn GestureSink) {
        let mode = self.mode;
        let sensitivity = self.sensitivity;
        let Some(session) = self.single.as_mut() else {
            return;
        };

        if !session.moved && pos.distance(session.start_pos) > TAP_MAX_DISTANCE {
            session.moved = true;
            self.long_press_at = None;
            if session.second_tap && !session.dragging {
                // Finger moved before the engage timer: drag starts now.
                session.dragging = true;
                self.drag_engage_at = None;
                if mode == PointerMode::Absolute {
                    sink.move_abs(pos);
                }
                sink.hid(HidEvent::Button {
                    button: MouseButton::Left,
                    pressed: true,
                });
            }
        }
        if !session.moved {
            return;
        }

        match mode {
            PointerMode::Absolute => {
                self.abs_target = Some(pos);
            }
            PointerMode::Relative => {
                let delta = pos - session.anchor;
                let dx = scale_delta(delta.x, sensitivity);
                let dy = scale_delta(delta.y, sensitivity);
                if dx != 0 || dy != 0 {
                    sink.hid(HidEvent::MoveRel { dx, dy });
                    session.anchor = pos;
                }
            }
        }
    }

    /// Last finger lifted from a single-finger sequence.
    pub fn touch_end(&mut self, now: Instant, sink: &mut dyn GestureSink) {
        self.long_press_at = None;
        self.drag_engage_at = None;
        let Some(session) = self.single.take() else {
            return;
        };

        if session.dragging {
            sink.hid(HidEvent::Button {
                button: MouseButton::Left,
                pressed: false,
            });
            self.last_tap = None;
            return;
        }

        if session.second_tap {
            // Held second tap that never engaged the drag: a plain click.
            self.pulse(MouseButton::Left, now, sink);
            self.last_tap = None;
            return;
        }

        if session.long_press_fired {
            return;
        }

        let duration = now.saturating_duration_since(session.start_time);
        if duration < TAP_MAX_DURATION && !session.moved {
            self.last_tap = Some((now, session.start_pos));
            if self.mode == PointerMode::Relative {
                self.deferred_click_at = Some(now + DOUBLE_TAP_WINDOW);
            }
            // Absolute mode records the tap for double-tap matching only.
        }
    }

    /// A second finger landed: no right-click or drag may fire from the
    /// single-finger machine once this happens.
    pub fn two_begin(&mut self, mid: Pos2, now: Instant, sink: &mut dyn GestureSink) {
        self.long_press_at = None;
        self.drag_engage_at = None;
        if let Some(session) = self.single.take() {
            if session.dragging {
                sink.hid(HidEvent::Button {
                    button: MouseButton::Left,
                    pressed: false,
                });
                self.last_tap = None;
            }
        }
        self.two = Some(TwoFingerSession {
            anchor_mid: mid,
            start_time: now,
            moved: false,
        });
    }

    /// Track the midpoint of an ongoing two-finger sequence. Emits scroll
    /// wheel events only when the sequence is classified as a scroll
    /// (`scroll_active`); otherwise it just maintains the moved flag for the
    /// two-finger tap check.
    pub fn two_move(&mut self, mid: Pos2, scroll_active: bool, sink: &mut dyn GestureSink) {
        let scroll_sensitivity = self.scroll_sensitivity;
        let Some(session) = self.two.as_mut() else {
            return;
        };
        let delta = mid - session.anchor_mid;
        if delta.x.abs() <= TWO_FINGER_DEAD_ZONE && delta.y.abs() <= TWO_FINGER_DEAD_ZONE {
            return;
        }
        session.moved = true;
        if !scroll_active {
            return;
        }
        // Content follows the finger: positive finger delta, positive wheel.
        let dx = scale_delta(delta.x, scroll_sensitivity);
        let dy = scale_delta(delta.y, scroll_sensitivity);
        if dx != 0 || dy != 0 {
            sink.hid(HidEvent::Wheel { dx, dy });
            session.anchor_mid = mid;
        }
    }

    /// The two-finger sequence ended with the fingers lifting. A short,
    /// unmoved, unclaimed sequence is a two-finger tap: right click in
    /// relative mode, nothing in absolute or scroll context.
    pub fn two_end(&mut self, now: Instant, claimed_by_zoom: bool, sink: &mut dyn GestureSink) {
        let Some(session) = self.two.take() else {
            return;
        };
        let duration = now.saturating_duration_since(session.start_time);
        if !claimed_by_zoom
            && !session.moved
            && duration < TAP_MAX_DURATION
            && self.mode == PointerMode::Relative
        {
            self.pulse(MouseButton::Right, now, sink);
        }
    }

    /// The sequence grew past two fingers: drop it without a tap check.
    pub fn two_abort(&mut self) {
        self.two = None;
    }

    /// Poll all deadlines. Safe to call every frame.
    pub fn tick(&mut self, now: Instant, sink: &mut dyn GestureSink) {
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].0 <= now {
                let (_, ev) = self.pending.remove(i);
                sink.hid(ev);
            } else {
                i += 1;
            }
        }

        if self.long_press_at.is_some_and(|t| t <= now) {
            self.long_press_at = None;
            // Still down, unmoved, single finger: fire the right-click pulse
            // and suppress the tap classification for this touch.
            let fire = self.single.as_mut().and_then(|session| {
                if !session.moved && !session.dragging && !session.second_tap {
                    session.long_press_fired = true;
                    Some(session.start_pos)
                } else {
                    None
                }
            });
            if let Some(pos) = fire {
                if self.mode == PointerMode::Absolute {
                    sink.move_abs(pos);
                }
                self.pulse(MouseButton::Right, now, sink);
            }
        }

        if self.drag_engage_at.is_some_and(|t| t <= now) {
            self.drag_engage_at = None;
            let engage = self.single.as_mut().and_then(|session| {
                if session.second_tap && !session.dragging {
                    session.dragging = true;
                    Some(session.start_pos)
                } else {
                    None
                }
            });
            if let Some(pos) = engage {
                if self.mode == PointerMode::Absolute {
                    sink.move_abs(pos);
                }
                sink.hid(HidEvent::Button {
                    button: MouseButton::Left,
                    pressed: true,
                });
            }
        }

        if self.deferred_click_at.is_some_and(|t| t <= now) {
            self.deferred_click_at = None;
            // The double-tap window elapsed with no second tap: the deferred
            // single click fires.
            self.pulse(MouseButton::Left, now, sink);
        }
    }

    fn pulse(&mut self, button: MouseButton, now: Instant, sink: &mut dyn GestureSink) {
        sink.hid(HidEvent::Button {
            button,
            pressed: true,
        });
        self.pending.push((
            now + CLICK_PULSE_GAP,
            HidEvent::Button {
                button,
                pressed: false,
            },
        ));
    }
}

fn scale_delta(delta: f32, sensitivity: f32) -> i8 {
    (delta * sensitivity)
        .round()
        .clamp(i8::MIN as f32, i8::MAX as f32) as i8
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[derive(Default)]
    struct TestSink {
        events: Vec<HidEvent>,
        abs: Vec<Pos2>,
    }

    impl GestureSink for TestSink {
        fn hid(&mut self, event: HidEvent) {
            self.events.push(event);
        }

        fn move_abs(&mut self, screen: Pos2) {
            self.abs.push(screen);
        }
    }

    fn base() -> Instant {
        Instant::now()
    }

    fn at(t0: Instant, ms: u64) -> Instant {
        t0 + Duration::from_millis(ms)
    }

    fn down(b: MouseButton) -> HidEvent {
        HidEvent::Button {
            button: b,
            pressed: true,
        }
    }

    fn up(b: MouseButton) -> HidEvent {
        HidEvent::Button {
            button: b,
            pressed: false,
        }
    }

    /// Drive a full tap: start at t0, end at t0+dur.
    fn tap(p: &mut PointerRecognizer, pos: Pos2, t0: Instant, dur: u64, sink: &mut TestSink) {
        p.touch_start(pos, t0);
        p.touch_end(at(t0, dur), sink);
    }

    #[test]
    fn relative_tap_defers_a_single_click() {
        let t0 = base();
        let mut p = PointerRecognizer::new(PointerMode::Relative);
        let mut sink = TestSink::default();
        tap(&mut p, pos2(50.0, 50.0), t0, 100, &mut sink);
        assert!(sink.events.is_empty());
        // Nothing before the double-tap window closes (tap ended at 100 ms).
        p.tick(at(t0, 350), &mut sink);
        assert!(sink.events.is_empty());
        p.tick(at(t0, 420), &mut sink);
        assert_eq!(sink.events, vec![down(MouseButton::Left)]);
        p.tick(at(t0, 480), &mut sink);
        assert_eq!(
            sink.events,
            vec![down(MouseButton::Left), up(MouseButton::Left)]
        );
    }

    #[test]
    fn absolute_tap_emits_no_click() {
        let t0 = base();
        let mut p = PointerRecognizer::new(PointerMode::Absolute);
        let mut sink = TestSink::default();
        tap(&mut p, pos2(50.0, 50.0), t0, 100, &mut sink);
        p.tick(at(t0, 1000), &mut sink);
        assert!(sink.events.is_empty());
    }

    #[test]
    fn double_tap_hold_engages_drag_exactly_once() {
        let t0 = base();
        let mut p = PointerRecognizer::new(PointerMode::Absolute);
        let mut sink = TestSink::default();
        tap(&mut p, pos2(50.0, 50.0), t0, 100, &mut sink);
        // Second tap lands inside the window, close to the first.
        p.touch_start(pos2(55.0, 50.0), at(t0, 250));
        p.tick(at(t0, 460), &mut sink);
        // Cursor snaps to the press point before the button goes down.
        assert_eq!(sink.abs, vec![pos2(55.0, 50.0)]);
        assert_eq!(sink.events, vec![down(MouseButton::Left)]);
        // Extra polls must not re-engage.
        p.tick(at(t0, 470), &mut sink);
        assert!(p.is_dragging());
        p.touch_end(at(t0, 800), &mut sink);
        assert_eq!(
            sink.events,
            vec![down(MouseButton::Left), up(MouseButton::Left)]
        );
    }

    #[test]
    fn second_tap_movement_engages_drag_immediately() {
        let t0 = base();
        let mut p = PointerRecognizer::new(PointerMode::Relative);
        let mut sink = TestSink::default();
        tap(&mut p, pos2(50.0, 50.0), t0, 100, &mut sink);
        p.touch_start(pos2(52.0, 50.0), at(t0, 250));
        p.touch_move(pos2(70.0, 50.0), &mut sink);
        assert!(p.is_dragging());
        assert_eq!(sink.events[0], down(MouseButton::Left));
    }

    #[test]
    fn quick_double_tap_is_a_plain_click() {
        let t0 = base();
        let mut p = PointerRecognizer::new(PointerMode::Relative);
        let mut sink = TestSink::default();
        tap(&mut p, pos2(50.0, 50.0), t0, 100, &mut sink);
        tap(&mut p, pos2(52.0, 50.0), at(t0, 250), 80, &mut sink);
        assert_eq!(sink.events, vec![down(MouseButton::Left)]);
        p.tick(at(t0, 1000), &mut sink);
        assert_eq!(
            sink.events,
            vec![down(MouseButton::Left), up(MouseButton::Left)]
        );
    }

    #[test]
    fn long_press_fires_one_right_click_pulse() {
        let t0 = base();
        let mut p = PointerRecognizer::new(PointerMode::Relative);
        let mut sink = TestSink::default();
        p.touch_start(pos2(50.0, 50.0), t0);
        p.tick(at(t0, 510), &mut sink);
        p.tick(at(t0, 600), &mut sink);
        assert_eq!(
            sink.events,
            vec![down(MouseButton::Right), up(MouseButton::Right)]
        );
        // Release afterwards classifies no tap.
        p.touch_end(at(t0, 700), &mut sink);
        p.tick(at(t0, 1200), &mut sink);
        assert_eq!(sink.events.len(), 2);
    }

    #[test]
    fn movement_cancels_long_press() {
        let t0 = base();
        let mut p = PointerRecognizer::new(PointerMode::Relative);
        let mut sink = TestSink::default();
        p.touch_start(pos2(50.0, 50.0), t0);
        p.touch_move(pos2(80.0, 50.0), &mut sink);
        p.tick(at(t0, 600), &mut sink);
        assert!(sink
            .events
            .iter()
            .all(|e| !matches!(e, HidEvent::Button { .. })));
    }

    #[test]
    fn relative_move_scales_and_clamps() {
        let t0 = base();
        let mut p = PointerRecognizer::new(PointerMode::Relative);
        let mut sink = TestSink::default();
        p.set_sensitivity(2.0);
        p.touch_start(pos2(0.0, 0.0), t0);
        p.touch_move(pos2(100.0, 0.0), &mut sink);
        // 100 px * 2.0 exceeds the signed 8-bit range.
        assert_eq!(sink.events, vec![HidEvent::MoveRel { dx: 127, dy: 0 }]);
        // Anchor reset: a further small move emits just its own delta.
        p.touch_move(pos2(104.0, 0.0), &mut sink);
        assert_eq!(sink.events[1], HidEvent::MoveRel { dx: 8, dy: 0 });
    }

    #[test]
    fn absolute_move_tracks_latest_target_only() {
        let t0 = base();
        let mut p = PointerRecognizer::new(PointerMode::Absolute);
        let mut sink = TestSink::default();
        p.touch_start(pos2(0.0, 0.0), t0);
        p.touch_move(pos2(30.0, 0.0), &mut sink);
        p.touch_move(pos2(60.0, 10.0), &mut sink);
        assert!(sink.events.is_empty());
        assert_eq!(p.take_abs_target(), Some(pos2(60.0, 10.0)));
        assert_eq!(p.take_abs_target(), None);
    }

    #[test]
    fn two_finger_tap_right_clicks_in_relative_mode() {
        let t0 = base();
        let mut p = PointerRecognizer::new(PointerMode::Relative);
        let mut sink = TestSink::default();
        p.touch_start(pos2(50.0, 50.0), t0);
        p.two_begin(pos2(60.0, 50.0), at(t0, 30), &mut sink);
        p.two_end(at(t0, 120), false, &mut sink);
        p.tick(at(t0, 200), &mut sink);
        assert_eq!(
            sink.events,
            vec![down(MouseButton::Right), up(MouseButton::Right)]
        );
    }

    #[test]
    fn two_finger_tap_is_silent_in_absolute_mode() {
        let t0 = base();
        let mut p = PointerRecognizer::new(PointerMode::Absolute);
        let mut sink = TestSink::default();
        p.touch_start(pos2(50.0, 50.0), t0);
        p.two_begin(pos2(60.0, 50.0), at(t0, 30), &mut sink);
        p.two_end(at(t0, 120), false, &mut sink);
        p.tick(at(t0, 300), &mut sink);
        assert!(sink.events.is_empty());
    }

    #[test]
    fn zoom_claimed_sequence_never_taps() {
        let t0 = base();
        let mut p = PointerRecognizer::new(PointerMode::Relative);
        let mut sink = TestSink::default();
        p.touch_start(pos2(50.0, 50.0), t0);
        p.two_begin(pos2(60.0, 50.0), at(t0, 30), &mut sink);
        p.two_end(at(t0, 120), true, &mut sink);
        p.tick(at(t0, 300), &mut sink);
        assert!(sink.events.is_empty());
    }

    #[test]
    fn moved_two_finger_sequence_never_taps() {
        let t0 = base();
        let mut p = PointerRecognizer::new(PointerMode::Relative);
        let mut sink = TestSink::default();
        p.touch_start(pos2(50.0, 50.0), t0);
        p.two_begin(pos2(60.0, 50.0), at(t0, 30), &mut sink);
        p.two_move(pos2(60.0, 58.0), true, &mut sink);
        p.two_end(at(t0, 120), false, &mut sink);
        p.tick(at(t0, 300), &mut sink);
        assert!(sink
            .events
            .iter()
            .all(|e| matches!(e, HidEvent::Wheel { .. })));
    }

    #[test]
    fn scroll_follows_finger_sign_convention() {
        let t0 = base();
        let mut p = PointerRecognizer::new(PointerMode::Relative);
        let mut sink = TestSink::default();
        p.set_scroll_sensitivity(0.5);
        p.touch_start(pos2(50.0, 50.0), t0);
        p.two_begin(pos2(60.0, 50.0), at(t0, 30), &mut sink);
        // Fingers dragged down by 12 px: positive wheel dy.
        p.two_move(pos2(60.0, 62.0), true, &mut sink);
        assert_eq!(sink.events, vec![HidEvent::Wheel { dx: 0, dy: 6 }]);
        // Re-anchored: an equal drag emits the same value again.
        p.two_move(pos2(60.0, 74.0), true, &mut sink);
        assert_eq!(sink.events[1], HidEvent::Wheel { dx: 0, dy: 6 });
    }

    #[test]
    fn undecided_sequence_accumulates_into_first_scroll() {
        let t0 = base();
        let mut p = PointerRecognizer::new(PointerMode::Relative);
        let mut sink = TestSink::default();
        p.set_scroll_sensitivity(0.5);
        p.touch_start(pos2(50.0, 50.0), t0);
        p.two_begin(pos2(60.0, 50.0), at(t0, 30), &mut sink);
        // Still unclassified: marks moved, emits nothing.
        p.two_move(pos2(60.0, 58.0), false, &mut sink);
        assert!(sink.events.is_empty());
        // Classification arrives: the accumulated displacement scrolls.
        p.two_move(pos2(60.0, 62.0), true, &mut sink);
        assert_eq!(sink.events, vec![HidEvent::Wheel { dx: 0, dy: 6 }]);
    }

    #[test]
    fn second_finger_cancels_pending_long_press() {
        let t0 = base();
        let mut p = PointerRecognizer::new(PointerMode::Relative);
        let mut sink = TestSink::default();
        p.touch_start(pos2(50.0, 50.0), t0);
        p.two_begin(pos2(60.0, 50.0), at(t0, 100), &mut sink);
        p.tick(at(t0, 800), &mut sink);
        assert!(sink.events.is_empty());
    }

    #[test]
    fn long_press_snaps_absolute_cursor_before_pulse() {
        let t0 = base();
        let mut p = PointerRecognizer::new(PointerMode::Absolute);
        let mut sink = TestSink::default();
        p.touch_start(pos2(77.0, 33.0), t0);
        p.tick(at(t0, 520), &mut sink);
        assert_eq!(sink.abs, vec![pos2(77.0, 33.0)]);
        assert_eq!(sink.events, vec![down(MouseButton::Right)]);
    }

    #[test]
    fn resumed_finger_streams_but_never_taps() {
        let t0 = base();
        let mut p = PointerRecognizer::new(PointerMode::Relative);
        let mut sink = TestSink::default();
        p.resume_single(pos2(50.0, 50.0), t0);
        p.touch_move(pos2(54.0, 50.0), &mut sink);
        assert_eq!(sink.events, vec![HidEvent::MoveRel { dx: 4, dy: 0 }]);
        p.touch_end(at(t0, 80), &mut sink);
        p.tick(at(t0, 1000), &mut sink);
        assert_eq!(sink.events.len(), 1);
    }

    #[test]
    fn drag_release_resets_double_tap_linkage() {
        let t0 = base();
        let mut p = PointerRecognizer::new(PointerMode::Relative);
        let mut sink = TestSink::default();
        tap(&mut p, pos2(50.0, 50.0), t0, 100, &mut sink);
        p.touch_start(pos2(52.0, 50.0), at(t0, 250));
        p.tick(at(t0, 460), &mut sink);
        p.touch_end(at(t0, 600), &mut sink);
        sink.events.clear();
        // A third touch right after the drag must not chain into another
        // double-tap drag.
        p.touch_start(pos2(52.0, 50.0), at(t0, 700));
        p.tick(at(t0, 920), &mut sink);
        assert!(sink.events.is_empty());
    }
}
