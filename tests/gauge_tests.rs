//! Integration tests for the gauge geometry

use egui::{Rect, pos2, vec2};
use zoomies::Primitive;
use zoomies::gauge::{GaugeConfig, GaugeRenderer, needle_angle, redline_band, ticks};

#[test]
fn needle_angle_is_monotonic_and_clamped() {
    let config = GaugeConfig::new(20.0, 16.0);
    let mut last = needle_angle(&config, 0.0);
    for step in 1..=200 {
        let angle = needle_angle(&config, step as f32 * 0.1);
        assert!(angle >= last);
        last = angle;
    }

    let full = needle_angle(&config, 20.0);
    assert_eq!(needle_angle(&config, 35.0), full);
    assert_eq!(needle_angle(&config, -4.0), needle_angle(&config, 0.0));
}

#[test]
fn warning_ticks_follow_redline() {
    let config = GaugeConfig::new(20.0, 16.0);
    let ticks = ticks(&config);

    let at = |value: f32| ticks.iter().find(|t| (t.value - value).abs() < 1e-4).copied().unwrap();
    assert!(at(18.0).warning);
    assert!(at(16.0).warning);
    assert!(at(20.0).warning);
    assert!(!at(15.0).warning);
    assert!(!at(0.0).warning);
}

#[test]
fn redline_band_is_made_of_quads() {
    let config = GaugeConfig::new(20.0, 16.0);
    let band = redline_band(pos2(100.0, 100.0), 80.0, &config, egui::Color32::RED);
    assert_eq!(band.len(), 12);
    assert!(band.iter().all(|p| matches!(p, Primitive::QuadFilled { .. })));

    let wide = GaugeConfig::new(20.0, 0.0);
    assert_eq!(redline_band(pos2(100.0, 100.0), 80.0, &wide, egui::Color32::RED).len(), 40);
}

#[test]
fn draw_includes_readout_and_needle() {
    let gauge = GaugeRenderer::new(20.0, 16.0);
    let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(350.0, 350.0));
    let primitives = gauge.draw(rect, 12.34);

    assert!(primitives.iter().any(|p| matches!(p, Primitive::Text { text, .. } if text == "12.3 yalms/s")));

    // Needle runs from the center to radius - 20
    let center = rect.center();
    let radius = 350.0 * 0.4;
    let needle = primitives
        .iter()
        .find_map(|p| match p {
            Primitive::Line { from, to, thickness, .. } if *from == center && *thickness == 2.0 => Some(*to),
            _ => None,
        })
        .unwrap();
    assert!((needle.distance(center) - (radius - 20.0)).abs() < 1e-3);
}

#[test]
fn major_labels_are_rounded_values() {
    let gauge = GaugeRenderer::new(25.0, 20.0);
    let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(300.0, 300.0));
    let labels: Vec<String> = gauge
        .draw(rect, 0.0)
        .into_iter()
        .filter_map(|p| match p {
            Primitive::Text { text, .. } if !text.contains("yalms") => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["0", "5", "10", "15", "20", "25"]);
}
