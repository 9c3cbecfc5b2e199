use std::collections::{BTreeMap, BTreeSet};
use std::sync::mpsc;
use std::time::Instant;

use egui::{Pos2, Rect, Vec2};

use crate::geometry::VideoGeometry;
use crate::gesture::shuttle::{ScrollPreset, ScrollShuttle};
use crate::gesture::GestureEngine;
use crate::hid::channel::WireSink;
use crate::hid::{HidEvent, HidSink, PointerMode};
use crate::input::{Contact, TouchFrame};
use crate::keymap;
use crate::render;

const SHUTTLE_WIDTH: f32 = 44.0;
const SHUTTLE_MARGIN: f32 = 10.0;

pub struct AppConfig {
    pub mode: PointerMode,
    pub source: Vec2,
    pub sensitivity: f32,
    pub scroll_sensitivity: f32,
    pub preset: ScrollPreset,
    pub compensation: bool,
}

pub struct TapkvmApp {
    /// Present in kiosk mode: contact frames from the evdev input thread.
    touch_rx: Option<mpsc::Receiver<TouchFrame>>,
    sink: WireSink,
    engine: GestureEngine,
    shuttle: ScrollShuttle,
    source: Vec2,
    /// Active contacts on the video surface, by contact id.
    touches: BTreeMap<u64, Pos2>,
    /// Contact ids captured by the shuttle track.
    shuttle_owned: BTreeSet<u64>,
    prev_contacts: Vec<Contact>,
    last_modifiers: egui::Modifiers,
}

impl TapkvmApp {
    pub fn new(
        touch_rx: Option<mpsc::Receiver<TouchFrame>>,
        sink: WireSink,
        config: AppConfig,
    ) -> Self {
        let mut engine = GestureEngine::new(config.mode);
        engine.set_pointer_sensitivity(config.sensitivity);
        engine.set_scroll_sensitivity(config.scroll_sensitivity);
        engine.set_zoom_listener(Box::new(|zoomed| {
            log::info!("zoom {}", if zoomed { "engaged" } else { "reset" });
        }));

        let mut shuttle = ScrollShuttle::new(config.preset);
        shuttle.set_compensation(config.compensation);

        Self {
            touch_rx,
            sink,
            engine,
            shuttle,
            source: config.source,
            touches: BTreeMap::new(),
            shuttle_owned: BTreeSet::new(),
            prev_contacts: Vec::new(),
            last_modifiers: egui::Modifiers::default(),
        }
    }

    fn handle_window_touches(
        &mut self,
        events: &[egui::Event],
        video: Rect,
        track: Rect,
        now: Instant,
    ) {
        for event in events {
            let egui::Event::Touch { id, phase, pos, .. } = event else {
                continue;
            };
            let id = id.0;
            match phase {
                egui::TouchPhase::Start => {
                    // Routed by start position; touches on surrounding chrome
                    // belong to neither recognizer.
                    if track.contains(*pos) {
                        self.shuttle_owned.insert(id);
                        self.shuttle.engage();
                        self.shuttle
                            .update_displacement(pos.y - track.center().y, now);
                    } else if video.contains(*pos) {
                        self.touches.insert(id, *pos);
                    }
                }
                egui::TouchPhase::Move => {
                    if self.shuttle_owned.contains(&id) {
                        self.shuttle
                            .update_displacement(pos.y - track.center().y, now);
                    } else if let Some(p) = self.touches.get_mut(&id) {
                        *p = *pos;
                    }
                }
                egui::TouchPhase::End | egui::TouchPhase::Cancel => {
                    if self.shuttle_owned.remove(&id) {
                        if self.shuttle_owned.is_empty() {
                            self.shuttle.release();
                        }
                    } else {
                        self.touches.remove(&id);
                    }
                }
            }
        }
    }

    /// Kiosk mode: map normalized device contacts onto the window and route
    /// them the same way window touches are routed.
    fn handle_device_frame(
        &mut self,
        frame: TouchFrame,
        screen: Rect,
        video: Rect,
        track: Rect,
        now: Instant,
    ) {
        let mut seen = BTreeSet::new();
        for c in &frame.contacts {
            let pos = screen.min + Vec2::new(c.pos.x * screen.width(), c.pos.y * screen.height());
            seen.insert(c.id);
            if self.shuttle_owned.contains(&c.id) {
                self.shuttle
                    .update_displacement(pos.y - track.center().y, now);
            } else if self.touches.contains_key(&c.id) {
                self.touches.insert(c.id, pos);
            } else if track.contains(pos) {
                self.shuttle_owned.insert(c.id);
                self.shuttle.engage();
                self.shuttle
                    .update_displacement(pos.y - track.center().y, now);
            } else if video.contains(pos) {
                self.touches.insert(c.id, pos);
            }
        }
        let had_shuttle = !self.shuttle_owned.is_empty();
        self.shuttle_owned.retain(|id| seen.contains(id));
        if had_shuttle && self.shuttle_owned.is_empty() {
            self.shuttle.release();
        }
        self.touches.retain(|id, _| seen.contains(id));
    }

    fn forward_keyboard(&mut self, events: &[egui::Event], modifiers: egui::Modifiers) {
        keymap::send_modifier_diff(self.last_modifiers, modifiers, &mut self.sink);
        self.last_modifiers = modifiers;

        for event in events {
            let egui::Event::Key {
                key,
                pressed,
                repeat,
                ..
            } = event
            else {
                continue;
            };
            if *repeat {
                continue;
            }
            if let Some(name) = keymap::wire_key_name(*key) {
                self.sink.send(HidEvent::Key {
                    name,
                    pressed: *pressed,
                });
            }
        }
    }
}

impl eframe::App for TapkvmApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Status bar first so the remaining rect is known for the surface.
        let mut toggle_mode = false;
        let mut toggle_zoom = false;
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let connected = self.sink.channel.is_connected();
                let (color, label) = if connected {
                    (render::OK_GREEN, "connected")
                } else {
                    (render::ERR_RED, "offline")
                };
                ui.colored_label(color, "\u{25cf}");
                ui.label(label);
                ui.separator();

                let mode_label = match self.engine.mode() {
                    PointerMode::Absolute => "mode: absolute",
                    PointerMode::Relative => "mode: relative",
                };
                if ui.button(mode_label).clicked() {
                    toggle_mode = true;
                }
                let zoom_label = if self.engine.is_zoomed() { "fit" } else { "1:1" };
                if ui.button(zoom_label).clicked() {
                    toggle_zoom = true;
                }
            });
        });

        let avail = ctx.available_rect();
        let track = Rect::from_min_max(
            Pos2::new(
                avail.max.x - SHUTTLE_WIDTH - SHUTTLE_MARGIN,
                avail.min.y + 40.0,
            ),
            Pos2::new(avail.max.x - SHUTTLE_MARGIN, avail.max.y - 40.0),
        );
        let video_rect = Rect::from_min_max(
            avail.min,
            Pos2::new(
                avail.max.x - SHUTTLE_WIDTH - SHUTTLE_MARGIN * 2.0,
                avail.max.y,
            ),
        );
        let geo = VideoGeometry::new(video_rect, self.source);
        self.shuttle.set_track_half(track.height() / 2.0 - 10.0);

        if toggle_mode {
            let next = match self.engine.mode() {
                PointerMode::Absolute => PointerMode::Relative,
                PointerMode::Relative => PointerMode::Absolute,
            };
            self.engine.set_mode(next);
        }
        if toggle_zoom {
            self.engine.toggle_zoom(&geo);
        }

        let (events, modifiers) = ctx.input(|i| (i.events.clone(), i.modifiers));
        self.forward_keyboard(&events, modifiers);

        if self.touch_rx.is_some() {
            let mut frames = Vec::new();
            if let Some(rx) = self.touch_rx.as_ref() {
                while let Ok(frame) = rx.try_recv() {
                    frames.push(frame);
                }
            }
            let screen = ctx.screen_rect();
            for frame in frames {
                self.handle_device_frame(frame, screen, video_rect, track, now);
            }
        } else {
            self.handle_window_touches(&events, video_rect, track, now);
        }

        let contacts: Vec<Contact> = self
            .touches
            .iter()
            .map(|(id, pos)| Contact { id: *id, pos: *pos })
            .collect();
        if contacts != self.prev_contacts {
            self.engine.update(&contacts, &geo, now, &mut self.sink);
            self.prev_contacts = contacts;
        }
        self.engine.tick(&geo, now, &mut self.sink);
        self.shuttle.tick(now, &mut self.sink);

        let transform = self.engine.transform();
        let dragging = self.engine.is_dragging();
        let preset = self.shuttle.preset().params();
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(render::SURFACE_BG))
            .show(ctx, |ui| {
                // Mouse fallback so the shuttle stays usable on a desktop.
                let response = ui.interact(track, ui.id().with("shuttle"), egui::Sense::drag());
                if response.drag_started() {
                    self.shuttle.engage();
                }
                if response.dragged() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        self.shuttle
                            .update_displacement(pos.y - track.center().y, now);
                    }
                }
                if response.drag_stopped() && self.shuttle_owned.is_empty() {
                    self.shuttle.release();
                }

                let painter = ui.painter();
                render::draw_video_surface(painter, &geo, &transform);
                for contact in &self.prev_contacts {
                    render::draw_touch_marker(painter, contact.pos, dragging);
                }

                // Spring back to center when released.
                let visual = ctx.animate_value_with_time(
                    egui::Id::new("shuttle_thumb"),
                    self.shuttle.displacement(),
                    0.12,
                );
                render::draw_shuttle(
                    painter,
                    track,
                    visual,
                    preset.dead_zone,
                    self.shuttle.is_active(),
                );

                if transform.is_zoomed() {
                    render::draw_zoom_badge(
                        painter,
                        Pos2::new(video_rect.max.x - 8.0, video_rect.min.y + 8.0),
                        transform.scale,
                    );
                }
                render::draw_connection_dot(
                    painter,
                    Pos2::new(video_rect.min.x + 14.0, video_rect.min.y + 14.0),
                    self.sink.channel.is_connected(),
                );
            });

        // Timers keep running between touch events.
        ctx.request_repaint();
    }
}
