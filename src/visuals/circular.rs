use std::f32::consts::{FRAC_PI_2, TAU};

use crate::theme::Rgba;

use super::{FrameConsumer, FrameInput, Scene, ScenePrimitive};

const BAR_COUNT: usize = 120;
const BAR_WIDTH: f32 = 4.0;
/// Longest bar relative to the disc radius.
const MAX_BAR_FRACTION: f32 = 0.8;

/// Ring of spectrum bars around the disc. Bar lengths track raw bin
/// magnitudes; colors run the theme primary from translucent at the rim to
/// solid at the tip. Emits nothing while paused, clearing the ring.
pub struct CircularVisualizer {
    radius: f32,
}

impl CircularVisualizer {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl FrameConsumer for CircularVisualizer {
    fn render(&mut self, frame: &FrameInput<'_>, scene: &mut Scene) {
        if !frame.is_playing {
            return;
        }
        let spectrum = &frame.snapshot.spectrum;
        if spectrum.is_empty() {
            return;
        }

        let from = Rgba::from_rgb(frame.theme.primary_rgb, 0.2);
        let to = Rgba::from_rgb(frame.theme.primary_rgb, 0.8);

        let step = (spectrum.len() / BAR_COUNT).max(1);
        let angle_step = TAU / BAR_COUNT as f32;

        for i in 0..BAR_COUNT {
            let value = spectrum.get(i * step).copied().unwrap_or(0);
            let length = f32::from(value) / 255.0 * self.radius * MAX_BAR_FRACTION;

            // Start from 12 o'clock.
            let angle = i as f32 * angle_step - FRAC_PI_2;
            let (sin, cos) = angle.sin_cos();

            scene.push(ScenePrimitive::SpectrumBar {
                x1: cos * self.radius,
                y1: sin * self.radius,
                x2: cos * (self.radius + length),
                y2: sin * (self.radius + length),
                from,
                to,
                width: BAR_WIDTH,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::audio::BandEnergySnapshot;

    fn frame<'a>(
        snapshot: &'a BandEnergySnapshot,
        theme: &'a crate::theme::ThemeColor,
        is_playing: bool,
    ) -> FrameInput<'a> {
        FrameInput {
            snapshot,
            version: 1,
            theme,
            elapsed: 0.0,
            delta: 0.016,
            is_playing,
        }
    }

    #[test]
    fn paused_ring_is_empty() {
        let theme = test_theme();
        let snapshot = snapshot_with(200.0, 200.0, 200.0, 200.0);
        let mut visualizer = CircularVisualizer::new(140.0);
        let mut scene = Scene::new();

        visualizer.render(&frame(&snapshot, &theme, false), &mut scene);
        assert!(scene.is_empty());
    }

    #[test]
    fn emits_one_bar_per_slot() {
        let theme = test_theme();
        let snapshot = snapshot_with(255.0, 255.0, 255.0, 255.0);
        let mut visualizer = CircularVisualizer::new(140.0);
        let mut scene = Scene::new();

        visualizer.render(&frame(&snapshot, &theme, true), &mut scene);
        assert_eq!(scene.len(), 120);
    }

    #[test]
    fn saturated_bins_reach_the_maximum_length() {
        let theme = test_theme();
        let snapshot = snapshot_with(255.0, 255.0, 255.0, 255.0);
        let mut visualizer = CircularVisualizer::new(100.0);
        let mut scene = Scene::new();

        visualizer.render(&frame(&snapshot, &theme, true), &mut scene);
        for primitive in scene.iter() {
            if let ScenePrimitive::SpectrumBar { x1, y1, x2, y2, .. } = primitive {
                let length = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
                assert!((length - 80.0).abs() < 0.01);
            }
        }
    }

    #[test]
    fn silent_bins_collapse_to_the_rim() {
        let theme = test_theme();
        let mut snapshot = snapshot_with(0.0, 0.0, 0.0, 0.0);
        snapshot.spectrum = vec![0; 256];
        let mut visualizer = CircularVisualizer::new(100.0);
        let mut scene = Scene::new();

        visualizer.render(&frame(&snapshot, &theme, true), &mut scene);
        for primitive in scene.iter() {
            if let ScenePrimitive::SpectrumBar { x1, y1, x2, y2, .. } = primitive {
                assert!((x2 - x1).abs() < 1e-4);
                assert!((y2 - y1).abs() < 1e-4);
            }
        }
    }
}
