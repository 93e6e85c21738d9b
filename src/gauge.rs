use std::f32::consts::TAU;

use egui::{Color32, Pos2, Rect, pos2, vec2};

use crate::draw::{Primitive, rgba};
use crate::instrument::{FrameContext, Instrument};

pub const DEFAULT_MAX_SPEED: f32 = 20.0;
pub const DEFAULT_REDLINE_START: f32 = 16.0;
/// Lowest full-scale value the gauge accepts.
pub const MIN_MAX_SPEED: f32 = 5.0;

/// Angle of the zero mark, in screen space (y grows downwards so positive angles turn clockwise).
pub const START_ANGLE: f32 = 120.0 * TAU / 360.0;
pub const END_ANGLE: f32 = 60.0 * TAU / 360.0;

pub const MAJOR_TICKS: usize = 5;
pub const MINOR_TICKS_PER_MAJOR: usize = 4;

const REDLINE_SEGMENTS_FULL_SWEEP: f32 = 40.0;
const MIN_REDLINE_SEGMENTS: usize = 12;
const REDLINE_HALF_WIDTH: f32 = 5.0;
const NEEDLE_INSET: f32 = 20.0;
const HUB_RADIUS: f32 = 10.0;
const HUB_INNER_RADIUS: f32 = 6.0;

pub const SPEED_UNIT: &str = "yalms/s";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeConfig {
    max_speed: f32,
    redline_start: f32,
}

impl GaugeConfig {
    pub fn new(max_speed: f32, redline_start: f32) -> Self {
        let mut config = Self {
            max_speed: DEFAULT_MAX_SPEED,
            redline_start: DEFAULT_REDLINE_START,
        };
        config.set_max_speed(max_speed);
        config.set_redline_start(redline_start);
        config
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn redline_start(&self) -> f32 {
        self.redline_start
    }

    pub fn set_max_speed(&mut self, max_speed: f32) {
        self.max_speed = max_speed.max(MIN_MAX_SPEED);
        self.redline_start = self.redline_start.clamp(0.0, self.max_speed);
    }

    pub fn set_redline_start(&mut self, redline_start: f32) {
        self.redline_start = redline_start.clamp(0.0, self.max_speed);
    }

    /// `speed / max_speed`, clamped to [0, 1].
    pub fn speed_ratio(&self, speed: f32) -> f32 {
        (speed / self.max_speed).clamp(0.0, 1.0)
    }

    pub fn is_warning(&self, value: f32) -> bool {
        value >= self.redline_start && value <= self.max_speed
    }
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SPEED, DEFAULT_REDLINE_START)
    }
}

/// Clockwise sweep from the zero mark to the full-scale mark, in radians.
pub fn total_sweep() -> f32 {
    (END_ANGLE - START_ANGLE + TAU).rem_euclid(TAU)
}

/// Maps a full-scale fraction onto the dial; values outside [0, 1] are clamped.
pub fn angle_for_fraction(fraction: f32) -> f32 {
    START_ANGLE + total_sweep() * fraction.clamp(0.0, 1.0)
}

pub fn point_on_circle(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    pos2(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

pub fn redline_segment_count(start_fraction: f32, end_fraction: f32) -> usize {
    let span = (end_fraction - start_fraction).max(0.0);
    ((REDLINE_SEGMENTS_FULL_SWEEP * span) as usize).max(MIN_REDLINE_SEGMENTS)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub value: f32,
    pub fraction: f32,
    pub major: bool,
    pub warning: bool,
}

/// Major ticks at every `max / MAJOR_TICKS`, with minor ticks subdividing each interval.
pub fn ticks(config: &GaugeConfig) -> Vec<Tick> {
    let divisions = MAJOR_TICKS * MINOR_TICKS_PER_MAJOR;
    let step = config.max_speed / divisions as f32;

    (0..=divisions)
        .map(|i| {
            let value = step * i as f32;
            Tick {
                value,
                fraction: i as f32 / divisions as f32,
                major: i % MINOR_TICKS_PER_MAJOR == 0,
                warning: config.is_warning(value),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugePalette {
    pub background: Color32,
    pub dial: Color32,
    pub needle: Color32,
    pub markings: Color32,
    pub warning: Color32,
    pub redline_band: Color32,
    pub text: Color32,
    pub readout_background: Color32,
}

impl Default for GaugePalette {
    fn default() -> Self {
        Self {
            background: rgba(0.05, 0.05, 0.05, 1.0),
            dial: rgba(0.2, 0.2, 0.2, 1.0),
            needle: rgba(0.9, 0.3, 0.3, 1.0),
            markings: rgba(0.8, 0.8, 0.8, 1.0),
            warning: rgba(0.9, 0.1, 0.1, 1.0),
            redline_band: rgba(0.9, 0.1, 0.1, 0.7),
            text: rgba(0.9, 0.9, 0.9, 1.0),
            readout_background: rgba(0.1, 0.1, 0.1, 1.0),
        }
    }
}

pub fn redline_band(center: Pos2, radius: f32, config: &GaugeConfig, color: Color32) -> Vec<Primitive> {
    let start_fraction = config.speed_ratio(config.redline_start);
    let end_fraction = 1.0;
    let start_angle = angle_for_fraction(start_fraction);
    let end_angle = angle_for_fraction(end_fraction);
    let segments = redline_segment_count(start_fraction, end_fraction);

    let inner = radius - REDLINE_HALF_WIDTH;
    let outer = radius + REDLINE_HALF_WIDTH;

    (0..segments)
        .map(|i| {
            let a1 = start_angle + (end_angle - start_angle) * i as f32 / segments as f32;
            let a2 = start_angle + (end_angle - start_angle) * (i + 1) as f32 / segments as f32;
            Primitive::QuadFilled {
                points: [
                    point_on_circle(center, inner, a1),
                    point_on_circle(center, outer, a1),
                    point_on_circle(center, outer, a2),
                    point_on_circle(center, inner, a2),
                ],
                color,
            }
        })
        .collect()
}

pub fn tick_marks(center: Pos2, radius: f32, config: &GaugeConfig, palette: &GaugePalette) -> Vec<Primitive> {
    let mut primitives = Vec::new();

    for tick in ticks(config) {
        let angle = angle_for_fraction(tick.fraction);
        let color = if tick.warning { palette.warning } else { palette.markings };
        let (inset, thickness) = if tick.major { (15.0, 2.0) } else { (10.0, 1.0) };

        primitives.push(Primitive::Line {
            from: point_on_circle(center, radius - inset, angle),
            to: point_on_circle(center, radius - 2.0, angle),
            color,
            thickness,
        });

        if tick.major {
            let label = point_on_circle(center, radius - 30.0, angle);
            primitives.push(Primitive::Text {
                pos: label - vec2(10.0, 10.0),
                color,
                text: format!("{:.0}", tick.value),
            });
        }
    }

    primitives
}

pub fn needle_angle(config: &GaugeConfig, display_speed: f32) -> f32 {
    angle_for_fraction(config.speed_ratio(display_speed))
}

pub fn needle(center: Pos2, radius: f32, config: &GaugeConfig, display_speed: f32, palette: &GaugePalette) -> Vec<Primitive> {
    let tip = point_on_circle(center, radius - NEEDLE_INSET, needle_angle(config, display_speed));

    vec![
        Primitive::Line {
            from: center,
            to: tip,
            color: palette.needle,
            thickness: 2.0,
        },
        Primitive::CircleFilled {
            center,
            radius: HUB_RADIUS,
            color: palette.needle,
        },
        Primitive::CircleFilled {
            center,
            radius: HUB_INNER_RADIUS,
            color: palette.dial,
        },
    ]
}

pub fn readout_text(display_speed: f32) -> String {
    format!("{:.1} {}", display_speed, SPEED_UNIT)
}

pub fn digital_readout(center: Pos2, radius: f32, display_speed: f32, palette: &GaugePalette) -> Vec<Primitive> {
    let text_pos = pos2(center.x - 40.0, center.y + radius / 2.0);

    vec![
        Primitive::RectFilled {
            rect: Rect::from_min_max(text_pos - vec2(5.0, 5.0), text_pos + vec2(85.0, 25.0)),
            color: palette.readout_background,
        },
        Primitive::Text {
            pos: text_pos,
            color: palette.text,
            text: readout_text(display_speed),
        },
    ]
}

/// Analog dial with redline band, tick marks, needle and a digital readout.
#[derive(Debug, Clone, Default)]
pub struct GaugeRenderer {
    config: GaugeConfig,
    palette: GaugePalette,
}

impl GaugeRenderer {
    pub fn new(max_speed: f32, redline_start: f32) -> Self {
        Self {
            config: GaugeConfig::new(max_speed, redline_start),
            palette: GaugePalette::default(),
        }
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn draw(&self, rect: Rect, display_speed: f32) -> Vec<Primitive> {
        let center = rect.center();
        let radius = rect.width().min(rect.height()) * 0.4;
        let palette = &self.palette;

        let mut primitives = vec![
            Primitive::CircleFilled {
                center,
                radius: radius + 20.0,
                color: palette.background,
            },
            Primitive::Circle {
                center,
                radius: radius + 10.0,
                color: palette.dial,
                thickness: 2.0,
            },
            Primitive::CircleFilled {
                center,
                radius,
                color: palette.dial,
            },
        ];

        primitives.extend(redline_band(center, radius, &self.config, palette.redline_band));
        primitives.extend(tick_marks(center, radius, &self.config, palette));
        primitives.extend(needle(center, radius, &self.config, display_speed, palette));
        primitives.extend(digital_readout(center, radius, display_speed, palette));
        primitives
    }
}

impl Instrument for GaugeRenderer {
    fn render(&mut self, frame: &FrameContext<'_>, display_speed: f32) -> Vec<Primitive> {
        self.draw(frame.rect, display_speed)
    }

    fn set_max_speed(&mut self, max_speed: f32) {
        self.config.set_max_speed(max_speed);
    }

    fn set_redline_start(&mut self, redline_start: f32) {
        self.config.set_redline_start(redline_start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_is_three_hundred_degrees() {
        assert!((total_sweep().to_degrees() - 300.0).abs() < 1e-3);
        assert!((angle_for_fraction(0.0) - START_ANGLE).abs() < 1e-6);
        assert!((angle_for_fraction(1.0) - (START_ANGLE + total_sweep())).abs() < 1e-6);
        // Full scale lands on the end angle, one turn later
        assert!(((angle_for_fraction(1.0) - TAU) - END_ANGLE).abs() < 1e-5);
    }

    #[test]
    fn max_speed_has_floor_and_reclamps_redline() {
        let mut config = GaugeConfig::new(20.0, 16.0);
        config.set_max_speed(1.0);
        assert_eq!(config.max_speed(), MIN_MAX_SPEED);
        assert_eq!(config.redline_start(), MIN_MAX_SPEED);

        config.set_redline_start(-3.0);
        assert_eq!(config.redline_start(), 0.0);
    }

    #[test]
    fn tick_layout() {
        let config = GaugeConfig::new(20.0, 16.0);
        let ticks = ticks(&config);
        assert_eq!(ticks.len(), MAJOR_TICKS * MINOR_TICKS_PER_MAJOR + 1);
        let majors: Vec<f32> = ticks.iter().filter(|t| t.major).map(|t| t.value).collect();
        assert_eq!(majors, vec![0.0, 4.0, 8.0, 12.0, 16.0, 20.0]);
    }

    #[test]
    fn redline_segments_have_floor() {
        assert_eq!(redline_segment_count(0.8, 1.0), MIN_REDLINE_SEGMENTS);
        assert_eq!(redline_segment_count(0.0, 1.0), 40);
        assert_eq!(redline_segment_count(1.0, 1.0), MIN_REDLINE_SEGMENTS);
    }

    #[test]
    fn readout_has_one_decimal() {
        assert_eq!(readout_text(7.26), "7.3 yalms/s");
        assert_eq!(readout_text(0.0), "0.0 yalms/s");
    }
}
