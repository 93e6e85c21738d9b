use std::path::{Path, PathBuf};

use egui::{Align2, CentralPanel, Color32, Context, FontId, SidePanel, TextureHandle, TextureOptions, TopBottomPanel};
use eframe::Frame;
use tracing::{info, warn};

use zoomies::assets::{FIGURE_ASSET, ResolvedTexture, TextureCache};
use zoomies::draw::paint;
use zoomies::history::{MAX_UPDATE_PERIOD, MIN_UPDATE_PERIOD, SpeedProbe};
use zoomies::settings::Settings;
use zoomies::{ConfigField, FrameContext, ModeMachine, VisualizationKind};

use crate::subject::{DemoSubject, MoveInput};

pub struct AppContext {
    settings: Settings,
    settings_dirty: bool,
    machine: ModeMachine,
    probe: SpeedProbe,
    textures: TextureCache,
    // Keeps uploaded textures alive while their ids sit in `textures`
    texture_handles: Vec<TextureHandle>,
    assets_resolved: bool,
    subject: DemoSubject,
    show_debug: bool,
}

impl AppContext {
    pub fn new(settings: Settings) -> Self {
        let machine = ModeMachine::new(
            &settings.instrument_config(),
            settings.selected_kind,
            settings.show_on_startup,
        );

        Self {
            settings,
            settings_dirty: false,
            machine,
            probe: SpeedProbe::new(),
            textures: TextureCache::new(),
            texture_handles: Vec::new(),
            assets_resolved: false,
            subject: DemoSubject::new(),
            show_debug: false,
        }
    }

    /// Looks for the figure image once; a user override in `images/` wins.
    fn resolve_assets(&mut self, ctx: &Context) {
        if self.assets_resolved {
            return;
        }
        self.assets_resolved = true;

        let base = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        let candidates: [PathBuf; 2] = [base.join("images").join(FIGURE_ASSET), base.join(FIGURE_ASSET)];

        for path in candidates.iter() {
            info!("Looking for {} at: {}", FIGURE_ASSET, path.display());
            if !path.exists() {
                continue;
            }

            match load_texture(ctx, path) {
                Ok(handle) => {
                    self.textures.insert(FIGURE_ASSET, ResolvedTexture {
                        id: handle.id(),
                        size: handle.size_vec2(),
                    });
                    self.texture_handles.push(handle);
                    info!("Loaded figure texture from {}", path.display());
                    return;
                }
                Err(error) => warn!("Could not load {}: {:?}", path.display(), error),
            }
        }

        info!("Using drawn figure as fallback");
    }

    fn set_config(&mut self, field: ConfigField, value: f32) {
        match field {
            ConfigField::MaxSpeed => {
                self.settings.max_speed = value;
                self.settings.redline_start = self.settings.redline_start.min(value);
            }
            ConfigField::RedlineStart => self.settings.redline_start = value,
            ConfigField::Damping => self.settings.damping = value,
        }
        self.machine.update_config(field, value);
        self.settings_dirty = true;
    }

    /// Mirrors the selection into the settings and saves once the pointer is released.
    fn persist(&mut self, ctx: &Context) {
        let show_on_startup = self.machine.is_visible();
        let selected_kind = self.machine.last_selected();
        if self.settings.show_on_startup != show_on_startup || self.settings.selected_kind != selected_kind {
            self.settings.show_on_startup = show_on_startup;
            self.settings.selected_kind = selected_kind;
            self.settings_dirty = true;
        }

        if self.settings_dirty && !ctx.input(|i| i.pointer.any_down()) {
            self.settings_dirty = false;
            if let Err(error) = self.settings.save() {
                warn!("Failed to save settings: {:?}", error);
            }
        }
    }

    fn draw_settings(&mut self, ui: &mut egui::Ui) {
        ui.checkbox(&mut self.subject.present, "Subject present");
        ui.add_space(10.0);

        let mut max_speed = self.settings.max_speed;
        if ui.add(egui::Slider::new(&mut max_speed, 5.0..=50.0).text("Max speed")).changed() {
            self.set_config(ConfigField::MaxSpeed, max_speed);
        }

        let mut redline_start = self.settings.redline_start;
        let redline_max = self.settings.max_speed;
        if ui.add(egui::Slider::new(&mut redline_start, 0.0..=redline_max).text("Redline")).changed() {
            self.set_config(ConfigField::RedlineStart, redline_start);
        }

        let mut damping = self.settings.damping;
        if ui.add(egui::Slider::new(&mut damping, 0.01..=1.0).text("Damping")).changed() {
            self.set_config(ConfigField::Damping, damping);
        }

        ui.add_space(10.0);
        ui.label("WASD / arrows to move, Shift to sprint, Space to jump.");
    }

    fn draw_debug(&mut self, ctx: &Context, now: f64) {
        let mut open = self.show_debug;
        egui::Window::new("Speed calculation")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                if !self.subject.present {
                    ui.label("Subject not available");
                    return;
                }

                ui.horizontal(|ui| {
                    let label = if self.probe.is_paused() { "Resume updates" } else { "Pause updates" };
                    if ui.button(label).clicked() {
                        self.probe.set_paused(!self.probe.is_paused());
                    }

                    let mut period = self.probe.update_period();
                    if ui.add(egui::Slider::new(&mut period, MIN_UPDATE_PERIOD..=MAX_UPDATE_PERIOD).text("sec")).changed() {
                        self.probe.set_update_period(period);
                    }

                    let label = if self.settings.show_history_table { "Hide history" } else { "Show history" };
                    if ui.button(label).clicked() {
                        self.settings.show_history_table = !self.settings.show_history_table;
                        self.settings_dirty = true;
                    }
                });

                ui.separator();

                match self.machine.active() {
                    Some(active) => {
                        let filter = active.filter();
                        ui.colored_label(Color32::YELLOW, format!("Displayed speed: {:.2} yalms/second", filter.display_speed()));
                        ui.colored_label(Color32::LIGHT_GREEN, format!("Filter raw speed: {:.2} yalms/second", filter.raw_speed()));
                        if let (Some(position), Some(time)) = (filter.previous_position(), filter.previous_time()) {
                            ui.label(format!("Filter sample: ({:.2}, {:.2}, {:.2}) at {:.3}s", position.x, position.y, position.z, time));
                        }
                        ui.label(format!("Damping: {:.2}", filter.damping()));
                    }
                    None => {
                        ui.label("No visualization active");
                    }
                }

                ui.label(format!("Probe raw speed: {:.2} yalms/second", self.probe.raw_speed()));
                ui.label(format!(
                    "Calculation: {:.3} ÷ {:.3} = {:.3}",
                    self.probe.distance(),
                    self.probe.delta_time(),
                    self.probe.raw_speed()
                ));
                if let Some(position) = self.probe.current_position() {
                    ui.label(format!("Position: ({:.2}, {:.2}, {:.2})", position.x, position.y, position.z));
                }
                if let Some(previous) = self.probe.previous_position() {
                    ui.label(format!("Previous: ({:.2}, {:.2}, {:.2})", previous.x, previous.y, previous.z));
                }
                if let (Some(current), Some(previous)) = (self.probe.current_position(), self.probe.previous_position()) {
                    let dx = current.x - previous.x;
                    let dz = current.z - previous.z;
                    ui.label(format!("ΔX: {:.3}  ΔZ: {:.3}", dx, dz));
                    ui.label(format!("√({:.3}² + {:.3}²) = {:.3}", dx, dz, self.probe.distance()));
                }
                if let Some(last) = self.probe.last_sample_time() {
                    ui.label(format!("Since last update: {:.2}s", now - last));
                }

                if self.settings.show_history_table {
                    ui.separator();
                    egui::Grid::new("history_table").striped(true).show(ui, |ui| {
                        ui.strong("Time");
                        ui.strong("Distance");
                        ui.strong("Delta");
                        ui.strong("Speed");
                        ui.end_row();

                        for entry in self.probe.history().iter() {
                            ui.label(format!("{:.2}", entry.timestamp));
                            ui.label(format!("{:.3}", entry.distance));
                            ui.label(format!("{:.3}", entry.delta_time));
                            ui.label(format!("{:.2}", entry.speed));
                            ui.end_row();
                        }
                    });

                    if ui.button("Clear history").clicked() {
                        self.probe.clear_history();
                    }
                }
            });
        self.show_debug = open;
    }
}

impl eframe::App for AppContext {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        self.resolve_assets(ctx);

        let (now, delta_time) = ctx.input(|i| (i.time, i.stable_dt));
        let input = MoveInput::read(ctx);
        self.subject.step(&input, delta_time);

        let sample = self.subject.present.then(|| self.subject.position());
        if let Some(position) = sample {
            self.probe.sample(position, now);
        }

        // Draw top bar
        TopBottomPanel::top("title_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Zoomies");
                ui.add_space(10.0);

                let toggle_label = if self.machine.is_visible() { "Hide" } else { "Show" };
                if ui.button(toggle_label).clicked() {
                    self.machine.toggle();
                }
                for kind in VisualizationKind::ALL {
                    let selected = self.machine.active().is_some_and(|active| active.kind() == kind);
                    if ui.selectable_label(selected, kind.name()).clicked() {
                        self.machine.select(kind);
                    }
                }
                if ui.selectable_label(self.show_debug, "Debug").clicked() {
                    self.show_debug = !self.show_debug;
                }
            });
        });

        // Draw settings panel
        SidePanel::left("settings_panel")
            .resizable(false)
            .default_width(220.0)
            .show(ctx, |ui| self.draw_settings(ui));

        // Draw the active instrument
        CentralPanel::default().show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::hover());
            let (pointer, primary_clicked) = ctx.input(|i| (i.pointer.hover_pos(), i.pointer.primary_clicked()));

            let frame = FrameContext {
                rect: response.rect,
                delta_time,
                pointer,
                primary_clicked,
                textures: &self.textures,
            };
            let primitives = self.machine.frame(sample, now, &frame);
            paint(&painter, &primitives);

            if !self.machine.is_visible() {
                painter.text(
                    response.rect.center(),
                    Align2::CENTER_CENTER,
                    "Speedometer hidden",
                    FontId::proportional(16.0),
                    Color32::GRAY,
                );
            }
        });

        if self.machine.take_dismiss() {
            info!("Visualization dismissed");
        }

        if self.show_debug {
            self.draw_debug(ctx, now);
        }

        self.persist(ctx);
        ctx.request_repaint();
    }
}

fn load_texture(ctx: &Context, path: &Path) -> anyhow::Result<TextureHandle> {
    let image = image::open(path)?.to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    let pixels = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
    Ok(ctx.load_texture(path.display().to_string(), pixels, TextureOptions::default()))
}
