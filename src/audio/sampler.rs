use super::analyser::FrequencySource;
use super::{BandEnergySnapshot, BandRanges, SharedSnapshot};

/// Per-tick producer: pulls byte magnitudes from the analyser into a reused
/// buffer, reduces them into band energies, and publishes the result to the
/// shared snapshot. Runs before any consumer on the same tick.
pub struct SpectrumSampler {
    ranges: BandRanges,
    buffer: Vec<u8>,
    snapshot: SharedSnapshot,
}

impl SpectrumSampler {
    pub fn new(ranges: BandRanges) -> Self {
        Self {
            ranges,
            buffer: Vec::new(),
            snapshot: SharedSnapshot::new(),
        }
    }

    /// Handle to the published snapshot for consumers on other loops.
    pub fn snapshot(&self) -> SharedSnapshot {
        self.snapshot.clone()
    }

    pub fn ranges(&self) -> BandRanges {
        self.ranges
    }

    /// Take one sample. When inactive or without a source, the read
    /// primitive is never touched and the last snapshot stays frozen;
    /// pausing freezes the visual state rather than blanking it.
    pub fn sample(&mut self, source: Option<&mut dyn FrequencySource>, active: bool) {
        if !active {
            return;
        }
        let Some(source) = source else {
            return;
        };

        let bins = source.frequency_bin_count();
        if bins == 0 {
            return;
        }
        // Reused across ticks; resized only when the bin count changes.
        if self.buffer.len() != bins {
            self.buffer.resize(bins, 0);
        }
        source.byte_frequency_data(&mut self.buffer);

        let (bass_end, mid_end) = self.ranges.indices(bins);

        let mut total: u64 = 0;
        let mut bass_total: u64 = 0;
        let mut mid_total: u64 = 0;
        let mut high_total: u64 = 0;
        for (i, &value) in self.buffer.iter().enumerate() {
            let value = u64::from(value);
            total += value;
            if i < bass_end {
                bass_total += value;
            } else if i < mid_end {
                mid_total += value;
            } else {
                high_total += value;
            }
        }

        let mean = |sum: u64, count: usize| {
            if count > 0 {
                sum as f32 / count as f32
            } else {
                0.0
            }
        };
        let intensity = mean(total, bins);
        let bass = mean(bass_total, bass_end);
        let mid = mean(mid_total, mid_end - bass_end);
        let high = mean(high_total, bins - mid_end);

        let buffer = &self.buffer;
        self.snapshot.publish(|snap: &mut BandEnergySnapshot| {
            snap.intensity = intensity;
            snap.bass = bass;
            snap.mid = mid;
            snap.high = high;
            if snap.spectrum.len() != bins {
                snap.spectrum.resize(bins, 0);
            }
            snap.spectrum.copy_from_slice(buffer);
        });
    }
}
