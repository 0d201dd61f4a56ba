//! Single frame loop shared by the sampler and every visual consumer.
//!
//! One tick reads the analyser exactly once, publishes the reduced bands,
//! then drives the consumers in registration order against that same
//! snapshot. Consumers therefore never observe a half-updated frame, and
//! the analyser is never polled more than once per tick no matter how many
//! visuals are attached.

use log::debug;

use crate::audio::{BandEnergySnapshot, BandRanges, FrequencySource, SharedSnapshot, SpectrumSampler};
use crate::theme::ThemeColor;
use crate::visuals::{FrameConsumer, FrameInput, Scene};

pub struct FrameScheduler {
    sampler: SpectrumSampler,
    consumers: Vec<Box<dyn FrameConsumer>>,
    scene: Scene,
    latest: BandEnergySnapshot,
    running: bool,
    last_tick: f32,
    elapsed: f32,
}

impl FrameScheduler {
    pub fn new(ranges: BandRanges) -> Self {
        Self {
            sampler: SpectrumSampler::new(ranges),
            consumers: Vec::new(),
            scene: Scene::new(),
            latest: BandEnergySnapshot::default(),
            running: false,
            last_tick: 0.0,
            elapsed: 0.0,
        }
    }

    /// Attach a consumer to the end of the per-tick render order.
    pub fn add_consumer(&mut self, consumer: Box<dyn FrameConsumer>) {
        self.consumers.push(consumer);
    }

    /// Shared handle to the sampler's published snapshot, for readers
    /// outside this loop.
    pub fn shared_snapshot(&self) -> SharedSnapshot {
        self.sampler.snapshot()
    }

    /// The snapshot most recently seen by a tick.
    pub fn snapshot(&self) -> &BandEnergySnapshot {
        &self.latest
    }

    /// The scene most recently rendered by a tick.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin ticking. Idempotent: a second start while running changes
    /// nothing, so there is never more than one logical frame chain.
    pub fn start(&mut self, now: f32) {
        if self.running {
            return;
        }
        self.running = true;
        self.last_tick = now;
        debug!("frame scheduler started at t={now:.3}");
    }

    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            debug!("frame scheduler stopped");
        }
    }

    /// Run one frame. Returns the scene to draw, or `None` while stopped.
    pub fn tick(
        &mut self,
        now: f32,
        source: Option<&mut dyn FrequencySource>,
        theme: &ThemeColor,
        is_playing: bool,
    ) -> Option<&Scene> {
        if !self.running {
            return None;
        }

        let delta = (now - self.last_tick).max(0.0);
        self.last_tick = now;
        self.elapsed += delta;

        // Producer first, then every consumer sees the same publication.
        self.sampler.sample(source, is_playing);
        let version = self.sampler.snapshot().copy_into(&mut self.latest);

        self.scene.clear();
        let frame = FrameInput {
            snapshot: &self.latest,
            version,
            theme,
            elapsed: self.elapsed,
            delta,
            is_playing,
        };
        for consumer in &mut self.consumers {
            consumer.render(&frame, &mut self.scene);
        }

        Some(&self.scene)
    }
}
