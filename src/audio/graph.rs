use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{info, warn};
use thiserror::Error;

use super::analyser::Analyser;

/// Lifecycle of the processing graph attached to one playable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphState {
    Uninitialized,
    Active,
    Suspended,
    Closed,
}

/// Initialization failures are captured into the graph's `error` field
/// rather than propagated; playback proceeds without analysis and the
/// visual consumers fall back to synthetic values.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GraphInitError {
    #[error("transform size {0} is not a power of two")]
    InvalidFftSize(usize),
    #[error("element is already connected to another graph")]
    ElementInUse,
}

#[derive(Debug, Clone, Copy)]
pub struct GraphConfig {
    /// FFT transform size, a power of two.
    pub fft_size: usize,
    /// Time smoothing constant in [0,1].
    pub smoothing: f32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            fft_size: 512,
            smoothing: 0.8,
        }
    }
}

/// Exclusive connection token handed out by a playable element. Holding it
/// marks the element as wrapped by a source node; dropping it releases the
/// element for a future graph. The token never owns the element itself.
pub struct SourceHandle {
    connected: Arc<AtomicBool>,
}

impl SourceHandle {
    pub(crate) fn new(connected: Arc<AtomicBool>) -> Self {
        Self { connected }
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        self.connected.store(false, Ordering::Release);
    }
}

/// The media-element boundary: anything seekable and playable that can be
/// wrapped once by a processing-graph source node.
pub trait AudioElement {
    /// Hand out the element's single source connection, or `None` if a
    /// graph already holds it.
    fn connect_source(&mut self) -> Option<SourceHandle>;
}

/// Owns the source -> analyser wiring for one playable element.
///
/// Construction is lazy and idempotent: the graph is built on the first
/// playback intent, a second `initialize` is a no-op, and all failures are
/// absorbed into `error()`. After `close()` every method is a no-op.
pub struct AudioGraph {
    config: GraphConfig,
    state: GraphState,
    analyser: Option<Analyser>,
    source: Option<SourceHandle>,
    error: Option<GraphInitError>,
}

impl AudioGraph {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            state: GraphState::Uninitialized,
            analyser: None,
            source: None,
            error: None,
        }
    }

    pub fn state(&self) -> GraphState {
        self.state
    }

    pub fn error(&self) -> Option<GraphInitError> {
        self.error
    }

    pub fn is_initialized(&self) -> bool {
        self.analyser.is_some()
    }

    /// Build the graph for `element` if none exists yet. Starts suspended;
    /// callers pair this with `resume()` inside the first play gesture.
    pub fn initialize(&mut self, element: &mut dyn AudioElement) {
        if self.state == GraphState::Closed || self.analyser.is_some() {
            return;
        }

        if !self.config.fft_size.is_power_of_two() {
            warn!(
                "audio graph init failed: fft size {} not a power of two",
                self.config.fft_size
            );
            self.error = Some(GraphInitError::InvalidFftSize(self.config.fft_size));
            return;
        }

        match element.connect_source() {
            Some(handle) => {
                self.source = Some(handle);
                self.analyser = Some(Analyser::new(self.config.fft_size, self.config.smoothing));
                self.state = GraphState::Suspended;
                self.error = None;
                info!(
                    "audio graph initialized (fft size {}, smoothing {:.2})",
                    self.config.fft_size, self.config.smoothing
                );
            }
            None => {
                warn!("audio graph init failed: element already connected");
                self.error = Some(GraphInitError::ElementInUse);
            }
        }
    }

    /// No-op unless suspended.
    pub fn resume(&mut self) {
        if self.state == GraphState::Suspended {
            self.state = GraphState::Active;
        }
    }

    /// No-op unless active.
    pub fn suspend(&mut self) {
        if self.state == GraphState::Active {
            self.state = GraphState::Suspended;
        }
    }

    /// Feed decoded mono samples through the graph. Dropped while suspended,
    /// mirroring a suspended audio context not running its processing chain.
    pub fn feed(&mut self, samples: &[f32]) {
        if self.state != GraphState::Active {
            return;
        }
        if let Some(analyser) = &mut self.analyser {
            analyser.push_samples(samples);
        }
    }

    /// Read-side analyser handle for the sampler. `None` until initialized
    /// and after close.
    pub fn analyser_mut(&mut self) -> Option<&mut Analyser> {
        match self.state {
            GraphState::Active | GraphState::Suspended => self.analyser.as_mut(),
            _ => None,
        }
    }

    /// Disconnect everything and release the element. Terminal.
    pub fn close(&mut self) {
        if self.state == GraphState::Closed {
            return;
        }
        self.analyser = None;
        self.source = None;
        self.state = GraphState::Closed;
        info!("audio graph closed");
    }
}

impl Drop for AudioGraph {
    fn drop(&mut self) {
        self.close();
    }
}
