//! Visual consumers of the analysis pipeline.
//!
//! Each consumer is a render function of the latest band-energy snapshot,
//! the current theme, and elapsed time. Consumers never touch the analyser
//! or mutate the snapshot; they emit typed scene primitives and leave
//! rasterization to whatever surface hosts the player.

pub mod background;
pub mod circular;
pub mod vinyl;

use crate::audio::BandEnergySnapshot;
use crate::theme::{Rgba, ThemeColor};

pub use background::DynamicBackground;
pub use circular::CircularVisualizer;
pub use vinyl::VinylDisc;

/// Synthetic mid-range levels used when no analyser is attached. Constant,
/// so degraded output is distinguishable from live data only by the absence
/// of variation.
pub const FALLBACK_INTENSITY: f32 = 128.0;
pub const FALLBACK_BASS: f32 = 100.0;
pub const FALLBACK_HIGH: f32 = 100.0;

/// Read-only per-tick input shared by every consumer.
pub struct FrameInput<'a> {
    pub snapshot: &'a BandEnergySnapshot,
    /// Publication counter of the snapshot, for staleness checks by
    /// consumers driven from an external loop.
    pub version: u64,
    pub theme: &'a ThemeColor,
    /// Seconds of accumulated scheduler run time.
    pub elapsed: f32,
    /// Seconds since the previous tick.
    pub delta: f32,
    pub is_playing: bool,
}

impl FrameInput<'_> {
    /// (intensity, bass, high) with the synthetic fallback applied when the
    /// analyser has never published.
    pub fn levels(&self) -> (f32, f32, f32) {
        if self.snapshot.spectrum.is_empty() {
            (FALLBACK_INTENSITY, FALLBACK_BASS, FALLBACK_HIGH)
        } else {
            (self.snapshot.intensity, self.snapshot.bass, self.snapshot.high)
        }
    }
}

/// One drawable element. Coordinates are either percentages of the viewport
/// (background layers) or logical units centred on the disc (bars, disc).
#[derive(Debug, Clone, PartialEq)]
pub enum ScenePrimitive {
    /// Full-viewport radial wash of the theme color over the dark backdrop.
    RadialBackdrop { tint: Rgba },
    /// Blurred light orb that breathes with a band energy.
    AmbientOrb {
        color: Rgba,
        x_percent: f32,
        y_percent: f32,
        scale: f32,
        opacity: f32,
    },
    /// One radial spectrum bar, from the disc rim outward.
    SpectrumBar {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        from: Rgba,
        to: Rgba,
        width: f32,
    },
    /// A note glyph in flight from the disc toward its landing point.
    NoteSprite {
        symbol: char,
        color: Rgba,
        x_percent: f32,
        y_percent: f32,
        scale: f32,
        opacity: f32,
    },
    /// One expanding layer of a landed note's ripple.
    RippleLayer {
        symbol: char,
        color: Rgba,
        x_percent: f32,
        y_percent: f32,
        scale: f32,
        opacity: f32,
    },
    /// The vinyl disc itself: rotation plus theme glow.
    Disc {
        angle_deg: f32,
        glow: Rgba,
        glow_scale: f32,
        shine: bool,
    },
}

/// Reusable draw list; cleared by the scheduler at the top of every tick.
#[derive(Default)]
pub struct Scene {
    primitives: Vec<ScenePrimitive>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.primitives.clear();
    }

    pub fn push(&mut self, primitive: ScenePrimitive) {
        self.primitives.push(primitive);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenePrimitive> {
        self.primitives.iter()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

/// A visual consumer driven by the frame scheduler. Called after the
/// sampler on every tick, in registration order.
pub trait FrameConsumer {
    fn render(&mut self, frame: &FrameInput<'_>, scene: &mut Scene);
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::audio::BandEnergySnapshot;

    #[test]
    fn fallback_levels_apply_only_before_first_publish() {
        let theme = test_theme();
        let empty = BandEnergySnapshot::default();
        let frame = FrameInput {
            snapshot: &empty,
            version: 0,
            theme: &theme,
            elapsed: 0.0,
            delta: 0.016,
            is_playing: true,
        };
        assert_eq!(
            frame.levels(),
            (FALLBACK_INTENSITY, FALLBACK_BASS, FALLBACK_HIGH)
        );

        let live = snapshot_with(40.0, 90.0, 30.0, 10.0);
        let frame = FrameInput {
            snapshot: &live,
            version: 1,
            theme: &theme,
            elapsed: 0.0,
            delta: 0.016,
            is_playing: true,
        };
        assert_eq!(frame.levels(), (40.0, 90.0, 10.0));
    }

    #[test]
    fn scene_reuse_clears_without_shrinking() {
        let mut scene = Scene::new();
        for _ in 0..32 {
            scene.push(ScenePrimitive::RadialBackdrop {
                tint: Rgba {
                    r: 0,
                    g: 0,
                    b: 0,
                    a: 0.1,
                },
            });
        }
        let capacity_before = scene.primitives.capacity();
        scene.clear();
        assert!(scene.is_empty());
        assert_eq!(scene.primitives.capacity(), capacity_before);
    }
}
