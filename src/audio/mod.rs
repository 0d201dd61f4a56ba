pub mod analyser;
pub mod graph;
pub mod playback;
pub mod sampler;

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

pub use analyser::{Analyser, FrequencySource};
pub use graph::{AudioElement, AudioGraph, GraphConfig, GraphInitError, GraphState, SourceHandle};
pub use playback::TrackPlayback;
pub use sampler::SpectrumSampler;

/// The latest frequency-band analysis result. All magnitudes are in the
/// analyser's byte scale, 0-255; band values are arithmetic means over their
/// partition of `spectrum`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandEnergySnapshot {
    /// Mean magnitude over the full analysed spectrum.
    pub intensity: f32,
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
    /// Raw byte magnitudes, one per frequency bin. Empty until the first
    /// sample has been taken.
    pub spectrum: Vec<u8>,
}

impl Default for BandEnergySnapshot {
    fn default() -> Self {
        Self {
            intensity: 0.0,
            bass: 0.0,
            mid: 0.0,
            high: 0.0,
            spectrum: Vec::new(),
        }
    }
}

/// Band partition of the spectrum, as fractions of the bin count.
/// `0 <= bass_end <= mid_end <= 1`; bass is the lowest fraction, high the
/// remainder above `mid_end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandRanges {
    pub bass_end: f32,
    pub mid_end: f32,
}

impl Default for BandRanges {
    fn default() -> Self {
        // Lowest 10% of bins is bass, 10-70% mid, the rest high.
        Self {
            bass_end: 0.1,
            mid_end: 0.7,
        }
    }
}

impl BandRanges {
    /// Bin indices of the partition boundaries for a given bin count,
    /// clamped so the three regions stay contiguous and in order.
    pub fn indices(&self, bins: usize) -> (usize, usize) {
        let bass_end = ((bins as f32 * self.bass_end).floor() as usize).min(bins);
        let mid_end = ((bins as f32 * self.mid_end).floor() as usize).clamp(bass_end, bins);
        (bass_end, mid_end)
    }
}

struct SnapshotCell {
    data: BandEnergySnapshot,
    version: u64,
}

/// Single-writer / multi-reader snapshot storage. The sampler writes in
/// place once per tick and bumps the version counter; consumers on an
/// independent loop compare versions to detect staleness instead of relying
/// on reference identity.
#[derive(Clone)]
pub struct SharedSnapshot {
    inner: Arc<Mutex<SnapshotCell>>,
}

impl Default for SharedSnapshot {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SnapshotCell {
                data: BandEnergySnapshot::default(),
                version: 0,
            })),
        }
    }
}

impl SharedSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the next snapshot in place. Last write wins; there is no queue.
    pub(crate) fn publish(&self, write: impl FnOnce(&mut BandEnergySnapshot)) {
        if let Ok(mut cell) = self.inner.lock() {
            write(&mut cell.data);
            cell.version += 1;
        }
    }

    pub fn version(&self) -> u64 {
        self.inner.lock().map(|cell| cell.version).unwrap_or(0)
    }

    /// Read the current snapshot without copying it out.
    pub fn with<R>(&self, read: impl FnOnce(&BandEnergySnapshot, u64) -> R) -> Option<R> {
        self.inner
            .lock()
            .ok()
            .map(|cell| read(&cell.data, cell.version))
    }

    /// Copy the current snapshot into `out`, reusing its spectrum storage.
    pub fn copy_into(&self, out: &mut BandEnergySnapshot) -> u64 {
        self.inner
            .lock()
            .map(|cell| {
                out.clone_from(&cell.data);
                cell.version
            })
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_indices_partition_the_bin_range() {
        let ranges = BandRanges::default();
        let (bass_end, mid_end) = ranges.indices(256);
        assert_eq!(bass_end, 25);
        assert_eq!(mid_end, 179);
        assert!(bass_end <= mid_end && mid_end <= 256);
    }

    #[test]
    fn band_indices_clamp_inverted_config() {
        let ranges = BandRanges {
            bass_end: 0.9,
            mid_end: 0.2,
        };
        let (bass_end, mid_end) = ranges.indices(100);
        assert_eq!(bass_end, 90);
        assert_eq!(mid_end, 90);
    }

    #[test]
    fn publish_bumps_version_and_freezes_between_writes() {
        let shared = SharedSnapshot::new();
        assert_eq!(shared.version(), 0);

        shared.publish(|snap| snap.intensity = 42.0);
        assert_eq!(shared.version(), 1);
        assert_eq!(shared.with(|snap, _| snap.intensity), Some(42.0));

        // No writes, no version movement.
        assert_eq!(shared.version(), 1);
    }

    #[test]
    fn copy_into_reuses_spectrum_storage() {
        let shared = SharedSnapshot::new();
        shared.publish(|snap| {
            snap.spectrum = vec![7; 256];
            snap.bass = 7.0;
        });

        let mut local = BandEnergySnapshot::default();
        local.spectrum.reserve(256);
        let version = shared.copy_into(&mut local);
        assert_eq!(version, 1);
        assert_eq!(local.spectrum.len(), 256);
        assert_eq!(local.bass, 7.0);
    }
}
