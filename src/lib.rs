//! Real-time audio analysis and reactive theming for a music player.
//!
//! The crate splits into four layers:
//! - [`audio`]: the analyser, the per-element audio graph, and the sampler
//!   that reduces the spectrum into band energies.
//! - [`theme`]: deterministic seed-to-color theming with preset, mood, and
//!   hash-derived dynamic palettes.
//! - [`visuals`]: frame consumers that turn the latest band snapshot into
//!   typed scene primitives.
//! - [`scheduler`] / [`pipeline`]: the single frame loop and the top-level
//!   wiring a player embeds.

pub mod audio;
pub mod pipeline;
pub mod scheduler;
pub mod theme;
pub mod visuals;

pub use audio::{
    Analyser, AudioElement, AudioGraph, BandEnergySnapshot, BandRanges, FrequencySource,
    GraphConfig, GraphInitError, GraphState, SharedSnapshot, SourceHandle, SpectrumSampler,
    TrackPlayback,
};
pub use pipeline::PlayerPipeline;
pub use scheduler::FrameScheduler;
pub use theme::{generate, hash_seed, ThemeCache, ThemeColor, ThemeMode};
pub use visuals::{
    CircularVisualizer, DynamicBackground, FrameConsumer, FrameInput, Scene, ScenePrimitive,
    VinylDisc,
};
