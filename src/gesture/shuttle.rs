//! Jog-shuttle scroll control: one-dimensional displacement from a fixed
//! center maps to an accelerating stream of discrete wheel events. Two
//! independent quadratic ramps (displacement and hold time) each propose a
//! repeat interval; the shorter one wins. All timing is deadline-based and
//! polled from the frame loop.

use std::time::{Duration, Instant};

use crate::hid::{HidEvent, HidSink};

/// Slowest auto-repeat interval, at the first-tick threshold with no hold.
pub const MAX_INTERVAL: Duration = Duration::from_millis(300);

/// The hold ramp reaches the preset minimum after this long in one direction.
pub const HOLD_RAMP: Duration = Duration::from_millis(1000);

/// Host compensation: units multiplier plus a short burst of identical
/// events, for hosts with aggressive scroll deceleration curves.
pub const COMP_UNIT_FACTOR: i8 = 2;
pub const COMP_BURST_EXTRA: u32 = 2;
pub const COMP_BURST_SPACING: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPreset {
    Fine,
    Normal,
    Fast,
}

#[derive(Debug, Clone, Copy)]
pub struct PresetParams {
    pub dead_zone: f32,
    pub first_tick: f32,
    pub min_interval: Duration,
    pub units_per_tick: i8,
}

impl ScrollPreset {
    pub fn params(&self) -> PresetParams {
        match self {
            ScrollPreset::Fine => PresetParams {
                dead_zone: 8.0,
                first_tick: 18.0,
                min_interval: Duration::from_millis(150),
                units_per_tick: 1,
            },
            ScrollPreset::Normal => PresetParams {
                dead_zone: 8.0,
                first_tick: 16.0,
                min_interval: Duration::from_millis(80),
                units_per_tick: 2,
            },
            ScrollPreset::Fast => PresetParams {
                dead_zone: 6.0,
                first_tick: 12.0,
                min_interval: Duration::from_millis(40),
                units_per_tick: 3,
            },
        }
    }
}

pub struct ScrollShuttle {
    preset: ScrollPreset,
    compensation: bool,
    track_half: f32,
    displacement: f32,
    direction: i8,
    active: bool,
    hold_since: Option<Instant>,
    next_tick: Option<Instant>,
    tick_count: u32,
    burst: Vec<(Instant, HidEvent)>,
}

impl ScrollShuttle {
    pub fn new(preset: ScrollPreset) -> Self {
        Self {
            preset,
            compensation: false,
            track_half: 120.0,
            displacement: 0.0,
            direction: 0,
            active: false,
            hold_since: None,
            next_tick: None,
            tick_count: 0,
            burst: Vec::new(),
        }
    }

    pub fn set_preset(&mut self, preset: ScrollPreset) {
        self.preset = preset;
    }

    pub fn preset(&self) -> ScrollPreset {
        self.preset
    }

    pub fn set_compensation(&mut self, on: bool) {
        self.compensation = on;
    }

    /// Physical track half-length in px; displacement is clamped to it.
    pub fn set_track_half(&mut self, half: f32) {
        self.track_half = half.max(1.0);
    }

    pub fn displacement(&self) -> f32 {
        self.displacement
    }

    pub fn direction(&self) -> i8 {
        self.direction
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn tick_count(&self) -> u32 {
        self.tick_count
    }

    /// Finger landed on the track.
    pub fn engage(&mut self) {
        self.active = true;
    }

    pub fn update_displacement(&mut self, displacement: f32, now: Instant) {
        if !self.active {
            return;
        }
        let p = self.preset.params();
        let d = displacement.clamp(-self.track_half, self.track_half);
        let dir = if d.abs() < p.dead_zone {
            0
        } else if d > 0.0 {
            1
        } else {
            -1
        };

        if dir != self.direction {
            self.tick_count = 0;
            if dir == 0 {
                // Entering the dead zone cancels the repeat without emitting.
                self.next_tick = None;
                self.hold_since = None;
            } else {
                // New direction: restart the hold ramp, first tick immediate
                // once over the threshold.
                self.hold_since = Some(now);
                self.next_tick = None;
            }
        }
        self.displacement = d;
        self.direction = dir;

        if dir != 0 && d.abs() >= p.first_tick {
            if self.next_tick.is_none() {
                self.next_tick = Some(now);
            }
        } else {
            self.next_tick = None;
        }
    }

    /// All-fingers-up: spring back to center. No terminal event; already
    /// scheduled compensation bursts still drain.
    pub fn release(&mut self) {
        self.displacement = 0.0;
        self.direction = 0;
        self.active = false;
        self.hold_since = None;
        self.next_tick = None;
        self.tick_count = 0;
    }

    /// Poll deadlines; emits due ticks and compensation bursts.
    pub fn tick(&mut self, now: Instant, sink: &mut dyn HidSink) {
        let mut i = 0;
        while i < self.burst.len() {
            if self.burst[i].0 <= now {
                let (_, ev) = self.burst.remove(i);
                sink.send(ev);
            } else {
                i += 1;
            }
        }

        let Some(due) = self.next_tick else {
            return;
        };
        if now < due {
            return;
        }
        let p = self.preset.params();
        // The touch state may have changed since this deadline was scheduled.
        if !self.active || self.direction == 0 || self.displacement.abs() < p.first_tick {
            self.next_tick = None;
            return;
        }

        let mut units = self.direction * p.units_per_tick;
        if self.compensation {
            units = units.saturating_mul(COMP_UNIT_FACTOR);
        }
        let event = HidEvent::Wheel { dx: 0, dy: units };
        sink.send(event);
        if self.compensation {
            for n in 1..=COMP_BURST_EXTRA {
                self.burst.push((now + COMP_BURST_SPACING * n, event));
            }
        }
        self.tick_count += 1;
        self.next_tick = Some(now + self.interval(now));
    }

    /// Repeat interval from the displacement and hold ramps; the faster
    /// (shorter) of the two wins, floored at the preset minimum.
    fn interval(&self, now: Instant) -> Duration {
        let p = self.preset.params();
        let max_s = MAX_INTERVAL.as_secs_f32();
        let min_s = p.min_interval.as_secs_f32();

        let span = (self.track_half - p.first_tick).max(1.0);
        let df = ((self.displacement.abs() - p.first_tick) / span).clamp(0.0, 1.0);
        let dist_s = max_s - (max_s - min_s) * df * df;

        let held = self
            .hold_since
            .map(|t| now.saturating_duration_since(t))
            .unwrap_or(Duration::ZERO);
        let hf = (held.as_secs_f32() / HOLD_RAMP.as_secs_f32()).clamp(0.0, 1.0);
        let hold_s = max_s - (max_s - min_s) * hf * hf;

        // Floor on the Duration itself: the f32 round-trip can land a
        // nanosecond under the preset minimum.
        Duration::from_secs_f32(dist_s.min(hold_s)).max(p.min_interval)
    }
}
