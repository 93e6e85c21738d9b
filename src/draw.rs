use egui::epaint::CubicBezierShape;
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, TextureId, pos2};

pub const TEXT_SIZE: f32 = 14.0;

/// Backend-agnostic drawing command emitted by the instrument renderers.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    CircleFilled {
        center: Pos2,
        radius: f32,
        color: Color32,
    },
    Circle {
        center: Pos2,
        radius: f32,
        color: Color32,
        thickness: f32,
    },
    QuadFilled {
        points: [Pos2; 4],
        color: Color32,
    },
    RectFilled {
        rect: Rect,
        color: Color32,
    },
    Line {
        from: Pos2,
        to: Pos2,
        color: Color32,
        thickness: f32,
    },
    Bezier {
        points: [Pos2; 4],
        color: Color32,
        thickness: f32,
    },
    Text {
        pos: Pos2,
        color: Color32,
        text: String,
    },
    Image {
        texture: TextureId,
        rect: Rect,
    },
}

pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Color32 {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(channel(r), channel(g), channel(b), channel(a))
}

/// Replays `primitives` onto an egui painter in order.
pub fn paint(painter: &Painter, primitives: &[Primitive]) {
    for primitive in primitives {
        match primitive {
            Primitive::CircleFilled { center, radius, color } => {
                painter.circle_filled(*center, *radius, *color);
            }
            Primitive::Circle { center, radius, color, thickness } => {
                painter.circle_stroke(*center, *radius, Stroke::new(*thickness, *color));
            }
            Primitive::QuadFilled { points, color } => {
                painter.add(Shape::convex_polygon(points.to_vec(), *color, Stroke::NONE));
            }
            Primitive::RectFilled { rect, color } => {
                painter.rect_filled(*rect, 0.0, *color);
            }
            Primitive::Line { from, to, color, thickness } => {
                painter.line_segment([*from, *to], Stroke::new(*thickness, *color));
            }
            Primitive::Bezier { points, color, thickness } => {
                painter.add(CubicBezierShape::from_points_stroke(
                    *points,
                    false,
                    Color32::TRANSPARENT,
                    Stroke::new(*thickness, *color),
                ));
            }
            Primitive::Text { pos, color, text } => {
                painter.text(*pos, Align2::LEFT_TOP, text, FontId::proportional(TEXT_SIZE), *color);
            }
            Primitive::Image { texture, rect } => {
                let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
                painter.image(*texture, *rect, uv, Color32::WHITE);
            }
        }
    }
}
