use std::f32::consts::PI;

use egui::{Color32, Pos2, Rect, Vec2, pos2, vec2};

use crate::assets::FIGURE_ASSET;
use crate::draw::{Primitive, rgba};
use crate::gauge::{DEFAULT_MAX_SPEED, MIN_MAX_SPEED};
use crate::instrument::{FrameContext, Instrument};

pub const MAX_TRAIL_SEGMENTS: usize = 50;
pub const NEAR_ZERO_SPEED: f32 = 0.5;
pub const FRAME_COUNT: u8 = 6;

const CLOCK_RATE: f32 = 5.0;
const CLOCK_PERIOD: f32 = 1.0;
const FADE_RATE: f32 = 2.0;
const SEGMENT_WIDTH: f32 = 15.0;
const STRIPES: usize = 6;
const FIGURE_SIZE: Vec2 = Vec2::new(160.0, 80.0);
const EDGE_MARGIN: f32 = 20.0;
const BOUNCE_AMPLITUDE: f32 = 2.0;
const BOUNCE_FULL_SPEED: f32 = 5.0;
const DISMISS_RADIUS: f32 = 10.0;
const DISMISS_INSET: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationState {
    clock: f32,
    frame_index: u8,
    fade_timer: f32,
}

impl AnimationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the animation clock and fade timer by `delta_time` seconds.
    pub fn advance(&mut self, delta_time: f32, display_speed: f32) {
        let delta_time = delta_time.max(0.0);

        self.clock += delta_time * CLOCK_RATE;
        if self.clock >= CLOCK_PERIOD {
            let wraps = ((self.clock / CLOCK_PERIOD).floor() as u64 % FRAME_COUNT as u64) as u8;
            self.frame_index = (self.frame_index + wraps) % FRAME_COUNT;
            self.clock %= CLOCK_PERIOD;
        }

        if display_speed < NEAR_ZERO_SPEED {
            self.fade_timer = (self.fade_timer + delta_time * FADE_RATE).min(1.0);
        } else {
            self.fade_timer = 0.0;
        }
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn frame_index(&self) -> u8 {
        self.frame_index
    }

    pub fn fade_timer(&self) -> f32 {
        self.fade_timer
    }

    pub fn fade_factor(&self) -> f32 {
        1.0 - self.fade_timer
    }
}

pub fn trail_segment_count(speed_ratio: f32, fade_factor: f32) -> usize {
    let count = (speed_ratio.clamp(0.0, 1.0) * MAX_TRAIL_SEGMENTS as f32 * fade_factor.clamp(0.0, 1.0)).round();
    (count as usize).min(MAX_TRAIL_SEGMENTS)
}

pub fn bounce_offset(clock: f32, display_speed: f32) -> f32 {
    if display_speed <= NEAR_ZERO_SPEED {
        return 0.0;
    }
    let scale = (display_speed / BOUNCE_FULL_SPEED).min(1.0);
    (clock * PI * 2.0).sin() * BOUNCE_AMPLITUDE * scale
}

pub fn wave_offset(clock: f32, segment: usize) -> f32 {
    (clock * PI + segment as f32 * 0.2).sin() * 1.5
}

pub fn rainbow() -> [Color32; STRIPES] {
    [
        rgba(1.0, 0.0, 0.0, 0.8),
        rgba(1.0, 0.5, 0.0, 0.8),
        rgba(1.0, 1.0, 0.0, 0.8),
        rgba(0.0, 1.0, 0.0, 0.8),
        rgba(0.0, 0.5, 1.0, 0.8),
        rgba(0.5, 0.0, 1.0, 0.8),
    ]
}

/// Lays out `segments` rainbow columns right-to-left behind the figure at `figure_pos`.
/// Columns that start left of `left_bound` are skipped.
pub fn rainbow_trail(figure_pos: Pos2, segments: usize, clock: f32, left_bound: f32) -> Vec<Primitive> {
    let colors = rainbow();
    let trail_height = FIGURE_SIZE.y * 0.6;
    let stripe_height = trail_height / STRIPES as f32;
    let y_offset = FIGURE_SIZE.y / 2.0 - trail_height / 2.0;
    // Overlap the trail into the pastry body
    let anchor_x = figure_pos.x + 25.0;

    let mut primitives = Vec::with_capacity(segments * STRIPES);
    for i in 0..segments {
        let x = anchor_x - (i + 1) as f32 * SEGMENT_WIDTH;
        if x < left_bound - SEGMENT_WIDTH {
            continue;
        }

        let wave = wave_offset(clock, i);
        for (j, color) in colors.iter().enumerate() {
            let y = figure_pos.y + y_offset + j as f32 * stripe_height + wave;
            primitives.push(Primitive::RectFilled {
                rect: Rect::from_min_size(pos2(x, y), vec2(SEGMENT_WIDTH, stripe_height)),
                color: *color,
            });
        }
    }
    primitives
}

pub fn procedural_figure(pos: Pos2, animation: &AnimationState) -> Vec<Primitive> {
    let pink = rgba(0.95, 0.6, 0.8, 1.0);
    let dark_pink = rgba(0.8, 0.4, 0.6, 1.0);
    let black = rgba(0.0, 0.0, 0.0, 1.0);
    let white = rgba(1.0, 1.0, 1.0, 1.0);
    let tan = rgba(0.95, 0.85, 0.65, 1.0);

    let size = FIGURE_SIZE;
    let mut primitives = vec![Primitive::RectFilled {
        rect: Rect::from_min_size(pos, size),
        color: pink,
    }];

    // Head
    let head_size = size.y * 0.9;
    let head_pos = pos2(pos.x + size.x - head_size - 5.0, pos.y + (size.y - head_size) / 2.0);
    primitives.push(Primitive::RectFilled {
        rect: Rect::from_min_size(head_pos, Vec2::splat(head_size)),
        color: dark_pink,
    });
    primitives.push(Primitive::RectFilled {
        rect: Rect::from_min_size(head_pos + vec2(1.0, 1.0), Vec2::splat(head_size - 2.0)),
        color: pink,
    });

    let eye_radius = head_size * 0.15;
    for eye in [
        pos2(head_pos.x + head_size * 0.25, head_pos.y + head_size * 0.3),
        pos2(head_pos.x + head_size * 0.25, head_pos.y + head_size * 0.7),
    ] {
        primitives.push(Primitive::CircleFilled {
            center: eye,
            radius: eye_radius,
            color: black,
        });
        primitives.push(Primitive::CircleFilled {
            center: eye - Vec2::splat(eye_radius * 0.3),
            radius: eye_radius * 0.4,
            color: white,
        });
    }

    let mouth = pos2(head_pos.x + head_size * 0.6, head_pos.y + head_size * 0.5);
    primitives.push(Primitive::Bezier {
        points: [
            mouth,
            mouth + vec2(head_size * 0.2, -head_size * 0.1),
            mouth + vec2(head_size * 0.3, head_size * 0.1),
            mouth + vec2(head_size * 0.4, 0.0),
        ],
        color: black,
        thickness: 2.0,
    });

    // Pastry body
    let toast_size = vec2(size.x * 0.65, size.y * 0.75);
    let toast_pos = pos2(pos.x + 10.0, pos.y + (size.y - toast_size.y) / 2.0);
    primitives.push(Primitive::RectFilled {
        rect: Rect::from_min_size(toast_pos, toast_size),
        color: tan,
    });

    // Legs alternate with the frame parity
    let leg_offset = if animation.frame_index() % 2 == 0 { 2.0 } else { -2.0 };
    let leg_size = vec2(8.0, 6.0);
    let leg_spacing = toast_size.y / 3.0;
    for i in 0..2 {
        let y = toast_pos.y + leg_spacing * (i + 1) as f32 - leg_size.y / 2.0;
        let shift = if i % 2 == 0 { leg_offset } else { -leg_offset };

        primitives.push(Primitive::RectFilled {
            rect: Rect::from_min_size(pos2(toast_pos.x - leg_size.x + shift, y), leg_size),
            color: pink,
        });
        primitives.push(Primitive::RectFilled {
            rect: Rect::from_min_size(pos2(toast_pos.x + toast_size.x - shift, y), leg_size),
            color: pink,
        });
    }

    let tail_start = pos2(toast_pos.x + toast_size.x + 2.0, toast_pos.y + toast_size.y / 2.0);
    let tail_end = pos2(
        tail_start.x + size.x * 0.15,
        tail_start.y + (animation.clock() * PI * 3.0).sin() * 5.0,
    );
    primitives.push(Primitive::Bezier {
        points: [
            tail_start,
            tail_start + vec2(10.0, -10.0),
            tail_end + vec2(-10.0, 10.0),
            tail_end,
        ],
        color: pink,
        thickness: 4.0,
    });

    primitives
}

/// Edge-triggered event that is consumed by reading it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneShot(bool);

impl OneShot {
    pub fn fire(&mut self) {
        self.0 = true;
    }

    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DismissButton {
    pub center: Pos2,
    pub radius: f32,
}

impl DismissButton {
    pub fn for_rect(rect: Rect) -> Self {
        Self {
            center: pos2(rect.max.x - DISMISS_INSET, rect.min.y + DISMISS_INSET),
            radius: DISMISS_RADIUS,
        }
    }

    pub fn contains(&self, pointer: Pos2) -> bool {
        pointer.distance_sq(self.center) <= self.radius * self.radius
    }

    pub fn primitives(&self, hovered: bool) -> Vec<Primitive> {
        let fill = if hovered {
            rgba(1.0, 0.3, 0.3, 1.0)
        } else {
            rgba(0.7, 0.1, 0.1, 0.8)
        };
        let cross = rgba(1.0, 1.0, 1.0, 0.8);
        let half = self.radius * 0.7 / 2.0;
        let c = self.center;

        vec![
            Primitive::CircleFilled {
                center: c,
                radius: self.radius,
                color: fill,
            },
            Primitive::Line {
                from: c - vec2(half, half),
                to: c + vec2(half, half),
                color: cross,
                thickness: 1.5,
            },
            Primitive::Line {
                from: c + vec2(half, -half),
                to: c + vec2(-half, half),
                color: cross,
                thickness: 1.5,
            },
        ]
    }
}

/// Scrolling rainbow trail with a bouncing figure and a dismiss button.
#[derive(Debug, Clone)]
pub struct TrailRenderer {
    max_speed: f32,
    animation: AnimationState,
    segments: usize,
    dismissed: OneShot,
}

impl TrailRenderer {
    pub fn new(max_speed: f32) -> Self {
        Self {
            max_speed: max_speed.max(MIN_MAX_SPEED),
            animation: AnimationState::new(),
            segments: 0,
            dismissed: OneShot::default(),
        }
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn step(&mut self, delta_time: f32, display_speed: f32) -> usize {
        self.animation.advance(delta_time, display_speed);
        let speed_ratio = (display_speed / self.max_speed).clamp(0.0, 1.0);
        self.segments = trail_segment_count(speed_ratio, self.animation.fade_factor());
        self.segments
    }
}

impl Default for TrailRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SPEED)
    }
}

impl Instrument for TrailRenderer {
    fn render(&mut self, frame: &FrameContext<'_>, display_speed: f32) -> Vec<Primitive> {
        let segments = self.step(frame.delta_time, display_speed);
        let rect = frame.rect;

        let figure_pos = pos2(
            rect.max.x - FIGURE_SIZE.x - EDGE_MARGIN,
            rect.min.y + rect.height() / 2.0 - FIGURE_SIZE.y / 2.0,
        );
        let bounced = figure_pos + vec2(0.0, bounce_offset(self.animation.clock(), display_speed));

        let mut primitives = rainbow_trail(figure_pos, segments, self.animation.clock(), rect.min.x);

        match frame.textures.get(FIGURE_ASSET) {
            Some(texture) => {
                let draw_size = vec2(FIGURE_SIZE.y * texture.aspect_ratio(), FIGURE_SIZE.y);
                primitives.push(Primitive::Image {
                    texture: texture.id,
                    rect: Rect::from_min_size(bounced, draw_size),
                });
            }
            None => primitives.extend(procedural_figure(bounced, &self.animation)),
        }

        let button = DismissButton::for_rect(rect);
        let hovered = frame.pointer.is_some_and(|pointer| button.contains(pointer));
        if hovered && frame.primary_clicked {
            self.dismissed.fire();
        }
        primitives.extend(button.primitives(hovered));

        primitives
    }

    fn set_max_speed(&mut self, max_speed: f32) {
        self.max_speed = max_speed.max(MIN_MAX_SPEED);
    }

    fn was_dismiss_clicked(&mut self) -> bool {
        self.dismissed.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_wraps_and_advances_frame() {
        let mut animation = AnimationState::new();
        animation.advance(0.1, 3.0);
        assert!((animation.clock() - 0.5).abs() < 1e-5);
        assert_eq!(animation.frame_index(), 0);

        animation.advance(0.1, 3.0);
        assert!(animation.clock() < CLOCK_PERIOD);
        assert_eq!(animation.frame_index(), 1);
    }

    #[test]
    fn long_frame_counts_every_wrap() {
        let mut animation = AnimationState::new();
        animation.advance(0.5, 3.0);
        assert!((animation.clock() - 0.5).abs() < 1e-5);
        assert_eq!(animation.frame_index(), 2);

        // 7 wraps from 2 lands on 3
        animation.advance(1.4, 3.0);
        assert_eq!(animation.frame_index(), 3);
    }

    #[test]
    fn frame_index_is_modular() {
        let mut animation = AnimationState::new();
        for _ in 0..FRAME_COUNT {
            animation.advance(0.2, 3.0);
        }
        assert_eq!(animation.frame_index(), 0);
    }

    #[test]
    fn fade_timer_rises_when_stopped_and_resets_on_motion() {
        let mut animation = AnimationState::new();
        animation.advance(0.25, 0.0);
        assert!((animation.fade_timer() - 0.5).abs() < 1e-5);
        animation.advance(5.0, 0.0);
        assert_eq!(animation.fade_timer(), 1.0);
        animation.advance(0.01, 2.0);
        assert_eq!(animation.fade_timer(), 0.0);
    }

    #[test]
    fn negative_delta_time_is_ignored() {
        let mut animation = AnimationState::new();
        animation.advance(-1.0, 0.0);
        assert_eq!(animation, AnimationState::new());
    }

    #[test]
    fn no_bounce_when_idle() {
        assert_eq!(bounce_offset(0.25, 0.4), 0.0);
        assert!((bounce_offset(0.25, 10.0) - BOUNCE_AMPLITUDE).abs() < 1e-5);
        assert!((bounce_offset(0.25, 2.5) - BOUNCE_AMPLITUDE * 0.5).abs() < 1e-5);
    }

    #[test]
    fn segments_left_of_bound_are_culled() {
        let figure = pos2(100.0, 0.0);
        // anchor at 125: columns start at 110, 95, 80, ... and anything below 85 is culled
        let all = rainbow_trail(figure, 10, 0.0, f32::MIN);
        let culled = rainbow_trail(figure, 10, 0.0, 100.0);
        assert_eq!(all.len(), 10 * STRIPES);
        assert_eq!(culled.len(), 2 * STRIPES);
    }

    #[test]
    fn one_shot_fires_once() {
        let mut flag = OneShot::default();
        assert!(!flag.take());
        flag.fire();
        assert!(flag.take());
        assert!(!flag.take());
    }
}
