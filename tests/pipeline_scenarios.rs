//! End-to-end checks across the analysis driver, shaper and render pipeline.

use std::sync::Arc;

use pulseviz::audio::{AnalysisDriver, MediaElement};
use pulseviz::render::commands::DrawCommand;
use pulseviz::render::shaper::{shape_bars, smooth};
use pulseviz::render::theme::{color_for, theme};
use pulseviz::render::{
    format_time, DrawMode, FrameBuffer, PipelineState, RenderPipeline, TickInput, TickOutcome,
};
use pulseviz::VizError;

fn tick(pipeline: &RenderPipeline, state: &PipelineState, freq: &[u8], time: &[u8]) -> (FrameBuffer, TickOutcome) {
    let mut frame = FrameBuffer::new();
    let outcome = pipeline.tick(
        &mut frame,
        TickInput {
            frequency: freq,
            time,
            elapsed: 1.0,
        },
        state,
    );
    (frame, outcome)
}

fn is_bar(c: &DrawCommand) -> bool {
    matches!(c, DrawCommand::Bar { .. })
}

#[test]
fn test_full_scale_bins_shape_to_weighted_bars() {
    let values = shape_bars(&[255, 255, 255, 255], 2, 1.0);
    assert_eq!(values.len(), 2);
    assert!((values[0] - 0.7).abs() < 1e-6);
    assert!((values[1] - 1.0).abs() < 1e-6);
}

#[test]
fn test_silent_buffer_draws_placeholder_only() {
    let mut pipeline = RenderPipeline::new(60);
    pipeline.resize(320, 200, 1.0);
    let state = PipelineState::default();

    let (frame, outcome) = tick(&pipeline, &state, &[0u8; 1024], &[128u8; 1024]);
    assert_eq!(outcome, TickOutcome::Placeholder);
    assert_eq!(frame.count(is_bar), 0);
    assert!(frame.count(|c| matches!(c, DrawCommand::Text { .. })) == 1);
}

#[test]
fn test_loud_buffer_draws_bars() {
    let mut pipeline = RenderPipeline::new(60);
    pipeline.resize(320, 200, 1.0);
    let state = PipelineState::default();

    let (frame, outcome) = tick(&pipeline, &state, &[180u8; 1024], &[128u8; 1024]);
    assert_eq!(outcome, TickOutcome::Drawn(DrawMode::Bars));
    assert_eq!(frame.count(is_bar), 40);
}

#[test]
fn test_every_mode_draws_with_signal() {
    let mut pipeline = RenderPipeline::new(60);
    pipeline.resize(400, 300, 2.0);
    let time: Vec<u8> = (0..1024).map(|i| (128.0 + 60.0 * (i as f32 * 0.05).sin()) as u8).collect();

    for mode in DrawMode::ALL {
        let mut state = PipelineState::default();
        state.set_mode(mode);
        let (frame, outcome) = tick(&pipeline, &state, &[120u8; 1024], &time);
        assert_eq!(outcome, TickOutcome::Drawn(mode));
        assert!(frame.commands().len() > 1, "{} drew nothing", mode);
    }
}

#[test]
fn test_zero_sized_canvas_is_skipped() {
    let pipeline = RenderPipeline::new(60);
    let (frame, outcome) = tick(&pipeline, &PipelineState::default(), &[200u8; 64], &[128u8; 64]);
    assert_eq!(outcome, TickOutcome::Skipped);
    assert_eq!(frame.commands().len(), 1);
}

#[test]
fn test_resize_scales_backing_store() {
    let mut pipeline = RenderPipeline::new(60);
    pipeline.resize(300, 150, 2.0);
    let g = pipeline.geometry();
    assert_eq!((g.backing_width, g.backing_height), (600, 300));
    assert_eq!((g.width, g.height), (300.0, 150.0));
}

#[test]
fn test_second_driver_on_same_element_fails() {
    let media = Arc::new(MediaElement::headless());
    let mut first = AnalysisDriver::new();
    first.initialize(media.clone(), 2048).unwrap();

    let mut second = AnalysisDriver::new();
    let err = second.initialize(media.clone(), 2048).unwrap_err();
    assert!(matches!(err, VizError::GraphAlreadyConnected));

    first.teardown();
    second.initialize(media, 2048).unwrap();
}

#[test]
fn test_smooth_with_full_factor_averages() {
    let out = smooth(&[0.0, 0.5, 1.0], 1.0);
    assert!(out.iter().all(|v| (v - 0.5).abs() < 1e-6));
}

#[test]
fn test_rainbow_wraps_hue() {
    let rainbow = theme("rainbow");
    assert_eq!(
        color_for(rainbow, 0.0, 0.5).to_rgb8(),
        color_for(rainbow, 1.0, 0.5).to_rgb8()
    );
}

#[test]
fn test_time_labels() {
    assert_eq!(format_time(f64::NAN), "00:00");
    assert_eq!(format_time(f64::INFINITY), "00:00");
    assert_eq!(format_time(65.0), "01:05");
    assert_eq!(format_time(0.0), "00:00");
}
