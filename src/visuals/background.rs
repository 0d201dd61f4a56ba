use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::theme::{Rgb, Rgba};

use super::{FrameConsumer, FrameInput, Scene, ScenePrimitive};

/// Hard caps on ephemeral entities; oldest are evicted first so per-tick
/// work stays bounded regardless of run duration.
pub const MAX_FLYING_NOTES: usize = 8;
pub const MAX_RIPPLES: usize = 6;

/// Percent coordinates of the disc centre, where notes take off.
const DEFAULT_VINYL_POSITION: (f32, f32) = (50.0, 30.0);

/// A ripple starts slightly before its note lands so the hand-off reads as
/// one motion.
const LANDING_LEAD: f32 = 0.05;

struct MusicalNote {
    name: &'static str,
    frequency: f32,
    color: Rgba,
}

const fn note_color(r: u8, g: u8, b: u8) -> Rgba {
    Rgba { r, g, b, a: 0.6 }
}

/// One octave of the chromatic scale, warm to cool across the circle of
/// rising pitch.
const NOTE_TABLE: &[MusicalNote] = &[
    MusicalNote { name: "C", frequency: 261.63, color: note_color(255, 99, 71) },
    MusicalNote { name: "C#", frequency: 277.18, color: note_color(255, 140, 0) },
    MusicalNote { name: "D", frequency: 293.66, color: note_color(255, 215, 0) },
    MusicalNote { name: "D#", frequency: 311.13, color: note_color(173, 255, 47) },
    MusicalNote { name: "E", frequency: 329.63, color: note_color(50, 205, 50) },
    MusicalNote { name: "F", frequency: 349.23, color: note_color(0, 255, 255) },
    MusicalNote { name: "F#", frequency: 369.99, color: note_color(0, 191, 255) },
    MusicalNote { name: "G", frequency: 392.00, color: note_color(65, 105, 225) },
    MusicalNote { name: "G#", frequency: 415.30, color: note_color(138, 43, 226) },
    MusicalNote { name: "A", frequency: 440.00, color: note_color(186, 85, 211) },
    MusicalNote { name: "A#", frequency: 466.16, color: note_color(255, 0, 255) },
    MusicalNote { name: "B", frequency: 493.88, color: note_color(255, 105, 180) },
];

fn symbol_for(name: &str) -> char {
    if name.contains('#') {
        return '♯';
    }
    match name {
        "C" | "D" | "E" => '♩',
        "A" | "B" => '♬',
        _ => '♫',
    }
}

/// Map the dominant band to a nearby chromatic note. Bass maps into
/// 100-300 Hz, highs into 350-550 Hz, everything else rides the overall
/// intensity through the middle of the scale.
fn dominant_note(intensity: f32, bass: f32, high: f32) -> &'static MusicalNote {
    let frequency = if bass > high && bass > intensity * 0.7 {
        100.0 + bass / 255.0 * 200.0
    } else if high > bass && high > intensity * 0.7 {
        350.0 + high / 255.0 * 200.0
    } else {
        250.0 + intensity / 255.0 * 200.0
    };

    let mut closest = &NOTE_TABLE[0];
    let mut min_diff = (frequency - closest.frequency).abs();
    for note in NOTE_TABLE {
        let diff = (frequency - note.frequency).abs();
        if diff < min_diff {
            min_diff = diff;
            closest = note;
        }
    }
    closest
}

#[derive(Debug, Clone)]
struct FlyingNote {
    spawned_at: f32,
    duration: f32,
    symbol: char,
    color: Rgba,
    start: (f32, f32),
    end: (f32, f32),
    frequency: f32,
    landed: bool,
}

#[derive(Debug, Clone)]
struct Ripple {
    spawned_at: f32,
    lifetime: f32,
    symbol: char,
    color: Rgba,
    x: f32,
    y: f32,
    base_scale: f32,
}

/// Ambient backdrop: theme wash, two breathing orbs, and a stream of note
/// glyphs flying off the disc that ripple where they land.
///
/// Runs its own clock that only advances while playing, so a paused frame
/// freezes every entity in place: no spawning, no aging, no eviction.
pub struct DynamicBackground {
    notes: Vec<FlyingNote>,
    ripples: Vec<Ripple>,
    clock: f32,
    last_spawn: f32,
    vinyl_position: (f32, f32),
    rng: StdRng,
}

impl DynamicBackground {
    pub fn new() -> Self {
        Self::with_seed(rand::thread_rng().gen())
    }

    /// Deterministic variant for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            notes: Vec::with_capacity(MAX_FLYING_NOTES),
            ripples: Vec::with_capacity(MAX_RIPPLES),
            clock: 0.0,
            last_spawn: f32::NEG_INFINITY,
            vinyl_position: DEFAULT_VINYL_POSITION,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Where notes take off from, in viewport percent.
    pub fn set_vinyl_position(&mut self, x_percent: f32, y_percent: f32) {
        self.vinyl_position = (x_percent, y_percent);
    }

    fn spawn_note(&mut self, intensity: f32, bass: f32, high: f32) {
        let note = dominant_note(intensity, bass, high);
        let duration = if note.frequency > 400.0 {
            0.6
        } else if note.frequency < 300.0 {
            1.2
        } else {
            0.9
        };
        let end = (
            10.0 + self.rng.gen::<f32>() * 80.0,
            10.0 + self.rng.gen::<f32>() * 80.0,
        );

        self.notes.push(FlyingNote {
            spawned_at: self.clock,
            duration,
            symbol: symbol_for(note.name),
            color: note.color,
            start: self.vinyl_position,
            end,
            frequency: note.frequency,
            landed: false,
        });
        if self.notes.len() > MAX_FLYING_NOTES {
            let overflow = self.notes.len() - MAX_FLYING_NOTES;
            self.notes.drain(..overflow);
        }
        self.last_spawn = self.clock;
    }

    fn land_notes(&mut self) {
        let clock = self.clock;
        let mut landed = Vec::new();
        for note in &mut self.notes {
            if !note.landed && clock - note.spawned_at >= note.duration - LANDING_LEAD {
                note.landed = true;
                let low = note.frequency < 300.0;
                let high = note.frequency > 400.0;
                landed.push(Ripple {
                    spawned_at: clock,
                    lifetime: if low { 3.0 } else if high { 1.5 } else { 2.0 },
                    symbol: note.symbol,
                    color: note.color,
                    x: note.end.0,
                    y: note.end.1,
                    base_scale: if low { 200.0 } else if high { 100.0 } else { 150.0 } / 150.0,
                });
            }
        }
        self.ripples.extend(landed);
        if self.ripples.len() > MAX_RIPPLES {
            let overflow = self.ripples.len() - MAX_RIPPLES;
            self.ripples.drain(..overflow);
        }
    }

    fn collect_garbage(&mut self) {
        let clock = self.clock;
        self.notes
            .retain(|note| clock - note.spawned_at < note.duration + 0.1);
        self.ripples
            .retain(|ripple| clock - ripple.spawned_at < ripple.lifetime);
    }

    fn emit_entities(&self, scene: &mut Scene) {
        for note in &self.notes {
            let t = ((self.clock - note.spawned_at) / note.duration).clamp(0.0, 1.0);
            // Rise toward the midpoint, sink into the landing.
            let lift = -5.0 * (std::f32::consts::PI * t).sin();
            let (scale, opacity) = if t < 0.5 {
                (1.0 + 0.6 * t, 1.0 - 0.2 * t)
            } else {
                (1.3 - (t - 0.5), 0.9 - 1.8 * (t - 0.5))
            };
            scene.push(ScenePrimitive::NoteSprite {
                symbol: note.symbol,
                color: note.color,
                x_percent: note.start.0 + (note.end.0 - note.start.0) * t,
                y_percent: note.start.1 + (note.end.1 - note.start.1) * t + lift,
                scale,
                opacity: opacity.max(0.0),
            });
        }

        for ripple in &self.ripples {
            let age = self.clock - ripple.spawned_at;
            for layer in 0..3u32 {
                let progress = (age - layer as f32 * 0.08) / 0.32;
                if !(0.0..=1.0).contains(&progress) {
                    continue;
                }
                let max_scale = (10 - layer * 5) as f32;
                scene.push(ScenePrimitive::RippleLayer {
                    symbol: ripple.symbol,
                    color: ripple.color,
                    x_percent: ripple.x,
                    y_percent: ripple.y,
                    scale: ripple.base_scale * (1.0 + (max_scale - 1.0) * progress),
                    opacity: 0.8 * (1.0 - progress),
                });
            }
        }
    }
}

impl Default for DynamicBackground {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameConsumer for DynamicBackground {
    fn render(&mut self, frame: &FrameInput<'_>, scene: &mut Scene) {
        let (intensity, bass, high) = frame.levels();
        let normalized = intensity / 255.0;

        scene.push(ScenePrimitive::RadialBackdrop {
            tint: Rgba::from_rgb(frame.theme.primary_rgb, 0.15),
        });

        let secondary = Rgb::from_hex(&frame.theme.secondary).unwrap_or(frame.theme.primary_rgb);
        if frame.is_playing {
            scene.push(ScenePrimitive::AmbientOrb {
                color: Rgba::from_rgb(frame.theme.primary_rgb, 0.2),
                x_percent: -10.0,
                y_percent: -10.0,
                scale: 1.0 + bass / 255.0 * 0.5,
                opacity: 0.6,
            });
            scene.push(ScenePrimitive::AmbientOrb {
                color: Rgba::from_rgb(secondary, 1.0),
                x_percent: 110.0,
                y_percent: 110.0,
                scale: 1.0 + intensity / 255.0 * 0.4,
                opacity: 0.5,
            });
        } else {
            // Dimmed, unscaled resting state.
            scene.push(ScenePrimitive::AmbientOrb {
                color: Rgba::from_rgb(frame.theme.primary_rgb, 0.2),
                x_percent: -10.0,
                y_percent: -10.0,
                scale: 1.0,
                opacity: 0.3,
            });
            scene.push(ScenePrimitive::AmbientOrb {
                color: Rgba::from_rgb(secondary, 1.0),
                x_percent: 110.0,
                y_percent: 110.0,
                scale: 1.0,
                opacity: 0.2,
            });
        }

        if frame.is_playing {
            self.clock += frame.delta;

            let threshold = (600.0 - normalized * 400.0) / 1000.0;
            if self.clock - self.last_spawn > threshold {
                self.spawn_note(intensity, bass, high);
            }
            self.land_notes();
            self.collect_garbage();
        }

        self.emit_entities(scene);
    }
}
