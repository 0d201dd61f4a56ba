use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use log::info;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::graph::{AudioElement, SourceHandle};

/// Playable track: a rodio sink for audible output plus a decoded mono copy
/// of the signal for analysis. Stands in for the seekable media element at
/// the source boundary; the audio graph wraps it at most once.
pub struct TrackPlayback {
    #[allow(dead_code)]
    stream: OutputStream,
    stream_handle: OutputStreamHandle,
    sink: Option<Sink>,
    samples: Vec<f32>,
    sample_rate: u32,
    position: usize,
    connected: Arc<AtomicBool>,
}

impl TrackPlayback {
    pub fn new() -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()?;

        Ok(Self {
            stream,
            stream_handle,
            sink: None,
            samples: Vec::new(),
            sample_rate: 44100,
            position: 0,
            connected: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Decode a file for playback and keep a mono f32 copy for the analyser.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let file = BufReader::new(File::open(&path)?);
        let source = Decoder::new(file)?;

        self.sample_rate = source.sample_rate();
        let channels = source.channels();

        // Mix to mono for analysis.
        let interleaved: Vec<i16> = source.convert_samples().collect();
        self.samples = interleaved
            .chunks_exact(channels as usize)
            .map(|frame| {
                let sum: f32 = frame.iter().map(|&s| s as f32 / 32768.0).sum();
                sum / channels as f32
            })
            .collect();
        self.position = 0;

        // The decoder above was consumed; open the file again for the sink.
        let file = BufReader::new(File::open(&path)?);
        let source = Decoder::new(file)?;
        let sink = Sink::try_new(&self.stream_handle)?;
        sink.append(source);
        sink.pause();

        info!(
            "loaded {:?} ({}Hz, {} mono samples)",
            path.as_ref(),
            self.sample_rate,
            self.samples.len()
        );
        self.sink = Some(sink);

        Ok(())
    }

    pub fn play(&self) {
        if let Some(sink) = &self.sink {
            sink.play();
            info!("playback started");
        }
    }

    pub fn pause(&self) {
        if let Some(sink) = &self.sink {
            sink.pause();
            info!("playback paused");
        }
    }

    pub fn stop(&self) {
        if let Some(sink) = &self.sink {
            sink.stop();
            info!("playback stopped");
        }
    }

    pub fn set_volume(&self, volume: f32) {
        if let Some(sink) = &self.sink {
            sink.set_volume(volume.clamp(0.0, 1.0));
        }
    }

    pub fn is_playing(&self) -> bool {
        self.sink.as_ref().map_or(false, |sink| !sink.is_paused())
    }

    pub fn is_finished(&self) -> bool {
        self.sink.as_ref().map_or(true, |sink| sink.empty())
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Mono samples covering roughly `frame_seconds` of the track at the
    /// playback rate, advancing the analysis cursor. Empty while paused or
    /// once the track runs out.
    pub fn next_chunk(&mut self, frame_seconds: f32) -> &[f32] {
        if !self.is_playing() || self.samples.is_empty() {
            return &[];
        }
        let per_frame = (self.sample_rate as f32 * frame_seconds) as usize;
        let start = self.position.min(self.samples.len());
        let end = (start + per_frame).min(self.samples.len());
        self.position = end;
        &self.samples[start..end]
    }
}

impl AudioElement for TrackPlayback {
    fn connect_source(&mut self) -> Option<SourceHandle> {
        if self
            .connected
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            Some(SourceHandle::new(Arc::clone(&self.connected)))
        } else {
            None
        }
    }
}
