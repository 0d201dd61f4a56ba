use criterion::{black_box, criterion_group, criterion_main, Criterion};

use spindle_visualizer::audio::{Analyser, BandRanges, FrequencySource, SpectrumSampler};

struct StaticSource {
    data: Vec<u8>,
}

impl FrequencySource for StaticSource {
    fn frequency_bin_count(&self) -> usize {
        self.data.len()
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        out.copy_from_slice(&self.data);
    }
}

fn bench_sampler(c: &mut Criterion) {
    let mut source = StaticSource {
        data: (0..256).map(|i| (i % 256) as u8).collect(),
    };
    let mut sampler = SpectrumSampler::new(BandRanges::default());

    c.bench_function("sample_256_bins", |b| {
        b.iter(|| {
            sampler.sample(Some(black_box(&mut source)), true);
        })
    });
}

fn bench_analyser(c: &mut Criterion) {
    let mut analyser = Analyser::new(512, 0.8);
    let samples: Vec<f32> = (0..512)
        .map(|i| (i as f32 * 0.1).sin() * 0.5)
        .collect();
    let mut out = vec![0u8; 256];

    c.bench_function("analyse_512_fft", |b| {
        b.iter(|| {
            analyser.push_samples(black_box(&samples));
            analyser.byte_frequency_data(black_box(&mut out));
        })
    });
}

criterion_group!(benches, bench_sampler, bench_analyser);
criterion_main!(benches);
