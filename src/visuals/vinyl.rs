use super::{FrameConsumer, FrameInput, Scene, ScenePrimitive};

/// Seconds for one full revolution.
const ROTATION_PERIOD: f32 = 20.0;

/// The spinning record. Rotation accumulates only while playing, so a pause
/// freezes the disc at its current angle instead of snapping back to zero.
pub struct VinylDisc {
    angle_deg: f32,
}

impl VinylDisc {
    pub fn new() -> Self {
        Self { angle_deg: 0.0 }
    }

    pub fn angle_deg(&self) -> f32 {
        self.angle_deg
    }
}

impl Default for VinylDisc {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameConsumer for VinylDisc {
    fn render(&mut self, frame: &FrameInput<'_>, scene: &mut Scene) {
        if frame.is_playing {
            self.angle_deg =
                (self.angle_deg + frame.delta / ROTATION_PERIOD * 360.0).rem_euclid(360.0);
        }

        let (_, bass, _) = frame.levels();
        let mut glow = frame.theme.glow_strong;
        let glow_scale = if frame.is_playing {
            1.0 + bass / 255.0 * 0.5
        } else {
            glow.a *= 0.4;
            1.0
        };

        scene.push(ScenePrimitive::Disc {
            angle_deg: self.angle_deg,
            glow,
            glow_scale,
            shine: frame.is_playing,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::audio::BandEnergySnapshot;
    use crate::theme::ThemeColor;

    fn frame<'a>(
        snapshot: &'a BandEnergySnapshot,
        theme: &'a ThemeColor,
        is_playing: bool,
        delta: f32,
    ) -> FrameInput<'a> {
        FrameInput {
            snapshot,
            version: 1,
            theme,
            elapsed: 0.0,
            delta,
            is_playing,
        }
    }

    #[test]
    fn one_period_is_one_revolution() {
        let theme = test_theme();
        let snapshot = snapshot_with(0.0, 0.0, 0.0, 0.0);
        let mut disc = VinylDisc::new();
        let mut scene = Scene::new();

        // 20s in quarter-second steps wraps back to the start.
        for _ in 0..80 {
            scene.clear();
            disc.render(&frame(&snapshot, &theme, true, 0.25), &mut scene);
        }
        assert!(disc.angle_deg().abs() < 1e-3 || (disc.angle_deg() - 360.0).abs() < 1e-3);
    }

    #[test]
    fn pause_freezes_the_angle() {
        let theme = test_theme();
        let snapshot = snapshot_with(0.0, 0.0, 0.0, 0.0);
        let mut disc = VinylDisc::new();
        let mut scene = Scene::new();

        disc.render(&frame(&snapshot, &theme, true, 1.0), &mut scene);
        let angle = disc.angle_deg();
        assert!((angle - 18.0).abs() < 1e-4);

        for _ in 0..10 {
            scene.clear();
            disc.render(&frame(&snapshot, &theme, false, 1.0), &mut scene);
        }
        assert_eq!(disc.angle_deg(), angle);
    }

    #[test]
    fn bass_drives_the_glow_while_playing() {
        let theme = test_theme();
        let snapshot = snapshot_with(100.0, 255.0, 0.0, 0.0);
        let mut disc = VinylDisc::new();
        let mut scene = Scene::new();

        disc.render(&frame(&snapshot, &theme, true, 0.016), &mut scene);
        let first = scene.iter().next();
        match first {
            Some(ScenePrimitive::Disc {
                glow_scale, shine, ..
            }) => {
                assert_eq!(*glow_scale, 1.5);
                assert!(shine);
            }
            other => panic!("expected a disc primitive, got {other:?}"),
        }
    }

    #[test]
    fn paused_disc_dims_and_stops_shining() {
        let theme = test_theme();
        let snapshot = snapshot_with(100.0, 255.0, 0.0, 0.0);
        let mut disc = VinylDisc::new();
        let mut scene = Scene::new();

        disc.render(&frame(&snapshot, &theme, false, 0.016), &mut scene);
        let first = scene.iter().next();
        match first {
            Some(ScenePrimitive::Disc {
                glow,
                glow_scale,
                shine,
                ..
            }) => {
                assert_eq!(*glow_scale, 1.0);
                assert!(!shine);
                assert!(glow.a < theme.glow_strong.a);
            }
            other => panic!("expected a disc primitive, got {other:?}"),
        }
    }
}
