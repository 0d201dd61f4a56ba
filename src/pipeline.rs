//! Top-level wiring of playback, analysis, and theming.
//!
//! `PlayerPipeline` owns one audio graph, one frame scheduler, and the
//! theme cache, and exposes the small control surface a player UI needs:
//! set a track, toggle playback, feed decoded samples, tick.

use log::info;

use crate::audio::{AudioElement, AudioGraph, BandRanges, GraphConfig, GraphInitError};
use crate::scheduler::FrameScheduler;
use crate::theme::{ThemeCache, ThemeColor, ThemeMode};
use crate::visuals::{FrameConsumer, Scene};

pub struct PlayerPipeline {
    graph: AudioGraph,
    scheduler: FrameScheduler,
    themes: ThemeCache,
    theme_mode: ThemeMode,
    theme: ThemeColor,
    is_playing: bool,
}

impl PlayerPipeline {
    pub fn new(config: GraphConfig, ranges: BandRanges, theme_mode: ThemeMode) -> Self {
        let mut themes = ThemeCache::new();
        let theme = themes.get("default", theme_mode).clone();
        Self {
            graph: AudioGraph::new(config),
            scheduler: FrameScheduler::new(ranges),
            themes,
            theme_mode,
            theme,
            is_playing: false,
        }
    }

    pub fn add_consumer(&mut self, consumer: Box<dyn FrameConsumer>) {
        self.scheduler.add_consumer(consumer);
    }

    /// Switch tracks. The seed is the track identity ("artist-title");
    /// the theme changes immediately, analysis state carries over.
    pub fn set_track(&mut self, seed: &str) {
        self.theme = self.themes.get(seed, self.theme_mode).clone();
        info!("track set to {seed:?}, theme {}", self.theme.primary);
    }

    pub fn theme(&self) -> &ThemeColor {
        &self.theme
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn graph_error(&self) -> Option<GraphInitError> {
        self.graph.error()
    }

    /// Toggle playback. The first play gesture lazily builds the audio
    /// graph around `element` and starts the frame loop; pausing suspends
    /// both, freezing the published snapshot in place.
    pub fn set_playing(&mut self, playing: bool, element: &mut dyn AudioElement, now: f32) {
        if playing == self.is_playing {
            return;
        }
        self.is_playing = playing;

        if playing {
            self.graph.initialize(element);
            self.graph.resume();
            self.scheduler.start(now);
        } else {
            self.graph.suspend();
            // One last paused frame before ticking halts, so the host's
            // scene shows the resting styling rather than the final
            // playing frame.
            let Self {
                graph,
                scheduler,
                theme,
                ..
            } = self;
            let source = graph
                .analyser_mut()
                .map(|a| a as &mut dyn crate::audio::FrequencySource);
            scheduler.tick(now, source, theme, false);
            scheduler.stop();
        }
    }

    /// Push decoded mono samples into the analyser. Dropped while paused.
    pub fn feed_samples(&mut self, samples: &[f32]) {
        self.graph.feed(samples);
    }

    /// Run one frame at time `now` (seconds). `None` while the scheduler
    /// is stopped.
    pub fn tick(&mut self, now: f32) -> Option<&Scene> {
        let Self {
            graph,
            scheduler,
            theme,
            is_playing,
            ..
        } = self;
        let source = graph
            .analyser_mut()
            .map(|a| a as &mut dyn crate::audio::FrequencySource);
        scheduler.tick(now, source, theme, *is_playing)
    }

    /// Band energies seen by the latest tick.
    pub fn snapshot(&self) -> &crate::audio::BandEnergySnapshot {
        self.scheduler.snapshot()
    }

    /// The scene most recently rendered, including the final paused frame
    /// emitted on a pause transition.
    pub fn scene(&self) -> &Scene {
        self.scheduler.scene()
    }

    /// Tear down the audio graph, releasing the element. The pipeline can
    /// keep rendering afterwards on fallback levels.
    pub fn close(&mut self) {
        self.graph.close();
        self.scheduler.stop();
        self.is_playing = false;
    }
}
