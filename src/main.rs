use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use log::info;

use spindle_visualizer::{
    BandRanges, CircularVisualizer, DynamicBackground, GraphConfig, PlayerPipeline, ThemeMode,
    TrackPlayback, VinylDisc,
};

#[derive(Parser)]
#[command(name = "spindle")]
#[command(about = "Audio-reactive theming and visualization demo")]
struct Args {
    /// Audio file to play and analyse
    input_file: PathBuf,

    /// Track seed for theming, "artist-title"; defaults to the file stem
    #[arg(long)]
    seed: Option<String>,

    /// FFT transform size (power of two)
    #[arg(long, default_value = "512")]
    fft_size: usize,

    /// Spectrum smoothing constant, 0..1
    #[arg(long, default_value = "0.8")]
    smoothing: f32,

    /// Derive the theme from the seed hash instead of the preset palettes
    #[arg(long)]
    dynamic_theme: bool,

    /// Print the resolved theme as JSON and exit
    #[arg(long)]
    dump_theme: bool,

    /// Playback volume, 0..1
    #[arg(long, default_value = "0.8")]
    volume: f32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let seed = args.seed.clone().unwrap_or_else(|| {
        args.input_file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "default".to_string())
    });
    let mode = if args.dynamic_theme {
        ThemeMode::Dynamic
    } else {
        ThemeMode::Preset
    };

    let mut pipeline = PlayerPipeline::new(
        GraphConfig {
            fft_size: args.fft_size,
            smoothing: args.smoothing,
        },
        BandRanges::default(),
        mode,
    );
    pipeline.set_track(&seed);

    if args.dump_theme {
        println!("{}", serde_json::to_string_pretty(pipeline.theme())?);
        return Ok(());
    }

    pipeline.add_consumer(Box::new(DynamicBackground::new()));
    pipeline.add_consumer(Box::new(CircularVisualizer::new(140.0)));
    pipeline.add_consumer(Box::new(VinylDisc::new()));

    let mut playback = TrackPlayback::new()?;
    playback.load_file(&args.input_file)?;
    playback.set_volume(args.volume);
    info!(
        "seed {:?}, theme {}, {:.1}s of audio",
        seed,
        pipeline.theme().primary,
        playback.duration_seconds()
    );

    playback.play();
    let started = Instant::now();
    pipeline.set_playing(true, &mut playback, 0.0);
    if let Some(error) = pipeline.graph_error() {
        log::warn!("analysis disabled: {error}");
    }

    let frame = Duration::from_millis(16);
    let mut last_report = 0u64;
    let mut last_now = 0.0f32;
    loop {
        let now = started.elapsed().as_secs_f32();
        let chunk = playback.next_chunk(now - last_now);
        pipeline.feed_samples(chunk);
        last_now = now;

        if let Some(scene) = pipeline.tick(now) {
            let primitives = scene.len();
            let second = now as u64;
            if second > last_report {
                last_report = second;
                let snapshot = pipeline.snapshot();
                info!(
                    "t={second}s intensity={:.0} bass={:.0} mid={:.0} high={:.0} primitives={}",
                    snapshot.intensity,
                    snapshot.bass,
                    snapshot.mid,
                    snapshot.high,
                    primitives
                );
            }
        }

        if playback.is_finished() {
            info!("track finished");
            break;
        }
        thread::sleep(frame);
    }

    pipeline.close();
    Ok(())
}
