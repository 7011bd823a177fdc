//! Built-in frame callbacks

use std::f32::consts::PI;

use clap::ValueEnum;
use flick_paint::{Color, Point, RecordingContext, RenderingContext, SurfaceInfo};

/// Drawings available to `flick run`
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Demo {
    /// A hand turning about the surface center
    SpinningHand,
    /// Layered sine waves drifting over time
    SineField,
}

impl Demo {
    pub fn parse(name: &str) -> Option<Demo> {
        Demo::from_str(name.trim(), true).ok()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Demo::SpinningHand => "spinning-hand",
            Demo::SineField => "sine-field",
        }
    }

    pub fn draw(&self, surface: &SurfaceInfo, ctx: &mut RecordingContext, t: f64) {
        match self {
            Demo::SpinningHand => spinning_hand(surface, ctx, t),
            Demo::SineField => sine_field(surface, ctx, t),
        }
    }
}

/// One line from the center, three radians per second
pub fn spinning_hand(surface: &SurfaceInfo, ctx: &mut impl RenderingContext, t: f64) {
    let center = surface.bounds().center();
    let radius = surface.width().min(surface.height()) / 3.0;
    let angle = (t * 3.0) as f32;

    let tip = Point::new(
        center.x + radius * angle.sin(),
        center.y + radius * angle.cos(),
    );

    ctx.stroke_polyline(&[center, tip], 3.0, Color::RED);
    ctx.fill_circle(center, 4.0, Color::from_hex(0xFFC0CB));
}

const WAVES: usize = 3;
const SAMPLES: usize = 48;

pub fn sine_field(surface: &SurfaceInfo, ctx: &mut impl RenderingContext, t: f64) {
    let width = surface.width();
    let height = surface.height();
    if width <= 0.0 || height <= 0.0 {
        return;
    }

    let phase = t as f32;
    let colors = [Color::CYAN, Color::MAGENTA, Color::YELLOW];

    for (i, color) in colors.iter().enumerate().take(WAVES) {
        let layer = i as f32;
        let baseline = height * (layer + 1.0) / (WAVES as f32 + 1.0);
        let amplitude = height / (WAVES as f32 * 3.0);
        let frequency = 2.0 + layer;

        let points: Vec<Point> = (0..=SAMPLES)
            .map(|s| {
                let x = width * s as f32 / SAMPLES as f32;
                let theta = frequency * PI * x / width + phase * (1.0 + layer * 0.5);
                Point::new(x, baseline + amplitude * theta.sin())
            })
            .collect();

        ctx.stroke_polyline(&points, 1.5, color.with_alpha(0.8));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flick_paint::{ContextType, DrawCommand, Size, SurfaceId};

    fn surface() -> (SurfaceInfo, RecordingContext) {
        let size = Size::new(300.0, 150.0);
        let info = SurfaceInfo {
            id: SurfaceId::default(),
            size,
        };
        (info, RecordingContext::new(ContextType::TwoD, size))
    }

    #[test]
    fn test_demo_names_round_trip_through_parse() {
        for demo in [Demo::SpinningHand, Demo::SineField] {
            assert_eq!(Demo::parse(demo.name()), Some(demo));
        }
        assert_eq!(Demo::parse(" Sine-Field "), Some(Demo::SineField));
        assert_eq!(Demo::parse("teapot"), None);
    }

    #[test]
    fn test_spinning_hand_points_down_at_zero() {
        let (info, mut ctx) = surface();
        spinning_hand(&info, &mut ctx, 0.0);

        let commands = ctx.take_commands();
        assert_eq!(commands.len(), 2);
        match &commands[0] {
            DrawCommand::Polyline { points, .. } => {
                assert_eq!(points[0], Point::new(150.0, 75.0));
                assert!((points[1].x - 150.0).abs() < 1e-4);
                assert!((points[1].y - 125.0).abs() < 1e-4);
            }
            other => panic!("expected polyline, got {:?}", other),
        }
    }

    #[test]
    fn test_sine_field_draws_one_polyline_per_wave() {
        let (info, mut ctx) = surface();
        sine_field(&info, &mut ctx, 1.25);

        let commands = ctx.take_commands();
        assert_eq!(commands.len(), WAVES);
        assert!(commands.iter().all(|c| matches!(
            c,
            DrawCommand::Polyline { points, .. } if points.len() == SAMPLES + 1
        )));
    }
}
