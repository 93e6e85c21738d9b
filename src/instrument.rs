use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};

use crate::assets::TextureCache;
use crate::draw::Primitive;
use crate::gauge::GaugeRenderer;
use crate::speed_filter::{Position, VelocityFilter};
use crate::trail::TrailRenderer;

/// Per-frame inputs a renderer may consume besides the speed itself.
pub struct FrameContext<'a> {
    pub rect: Rect,
    pub delta_time: f32,
    pub pointer: Option<Pos2>,
    pub primary_clicked: bool,
    pub textures: &'a TextureCache,
}

pub trait Instrument {
    fn render(&mut self, frame: &FrameContext<'_>, display_speed: f32) -> Vec<Primitive>;

    fn set_max_speed(&mut self, max_speed: f32);

    fn set_redline_start(&mut self, _redline_start: f32) {}

    /// Read-and-clear: returns true once per registered dismiss click.
    fn was_dismiss_clicked(&mut self) -> bool {
        false
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisualizationKind {
    #[default]
    Gauge,
    Trail,
}

impl VisualizationKind {
    pub const ALL: [VisualizationKind; 2] = [VisualizationKind::Gauge, VisualizationKind::Trail];

    pub fn index(self) -> usize {
        match self {
            VisualizationKind::Gauge => 0,
            VisualizationKind::Trail => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            VisualizationKind::Gauge => "Classic gauge",
            VisualizationKind::Trail => "Nyan trail",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigField {
    MaxSpeed,
    RedlineStart,
    Damping,
}

/// Settings shared by every visualization at construction time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstrumentConfig {
    pub max_speed: f32,
    pub redline_start: f32,
    pub damping: f32,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            max_speed: crate::gauge::DEFAULT_MAX_SPEED,
            redline_start: crate::gauge::DEFAULT_REDLINE_START,
            damping: crate::speed_filter::DEFAULT_DAMPING,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Renderer {
    Gauge(GaugeRenderer),
    Trail(TrailRenderer),
}

impl Instrument for Renderer {
    fn render(&mut self, frame: &FrameContext<'_>, display_speed: f32) -> Vec<Primitive> {
        match self {
            Renderer::Gauge(gauge) => gauge.render(frame, display_speed),
            Renderer::Trail(trail) => trail.render(frame, display_speed),
        }
    }

    fn set_max_speed(&mut self, max_speed: f32) {
        match self {
            Renderer::Gauge(gauge) => gauge.set_max_speed(max_speed),
            Renderer::Trail(trail) => trail.set_max_speed(max_speed),
        }
    }

    fn set_redline_start(&mut self, redline_start: f32) {
        match self {
            Renderer::Gauge(gauge) => gauge.set_redline_start(redline_start),
            Renderer::Trail(trail) => trail.set_redline_start(redline_start),
        }
    }

    fn was_dismiss_clicked(&mut self) -> bool {
        match self {
            Renderer::Gauge(gauge) => gauge.was_dismiss_clicked(),
            Renderer::Trail(trail) => trail.was_dismiss_clicked(),
        }
    }
}

/// A velocity filter paired with the renderer that displays its output.
#[derive(Debug, Clone)]
pub struct Visualization {
    kind: VisualizationKind,
    filter: VelocityFilter,
    renderer: Renderer,
}

impl Visualization {
    pub fn new(kind: VisualizationKind, config: &InstrumentConfig) -> Self {
        let renderer = match kind {
            VisualizationKind::Gauge => Renderer::Gauge(GaugeRenderer::new(config.max_speed, config.redline_start)),
            VisualizationKind::Trail => Renderer::Trail(TrailRenderer::new(config.max_speed)),
        };

        Self {
            kind,
            filter: VelocityFilter::new(config.damping),
            renderer,
        }
    }

    pub fn kind(&self) -> VisualizationKind {
        self.kind
    }

    /// Feeds the subject's position, or resets the filter when the subject is absent.
    pub fn update(&mut self, sample: Option<Position>, now: f64) {
        match sample {
            Some(position) => {
                self.filter.update(position, now);
            }
            None => self.filter.reset(),
        }
    }

    pub fn render(&mut self, frame: &FrameContext<'_>) -> Vec<Primitive> {
        let display_speed = self.filter.display_speed();
        self.renderer.render(frame, display_speed)
    }

    pub fn apply(&mut self, field: ConfigField, value: f32) {
        match field {
            ConfigField::MaxSpeed => self.renderer.set_max_speed(value),
            ConfigField::RedlineStart => self.renderer.set_redline_start(value),
            ConfigField::Damping => self.filter.set_damping(value),
        }
    }

    pub fn was_dismiss_clicked(&mut self) -> bool {
        self.renderer.was_dismiss_clicked()
    }

    pub fn filter(&self) -> &VelocityFilter {
        &self.filter
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }
}
