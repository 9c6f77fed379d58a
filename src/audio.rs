//! Sound effects. Real output needs the `sound` feature; without it every
//! call is a no-op.

use crate::physics::StepEvents;

// ── Tones ───────────────────────────────────────────────────────────────────

/// (frequency Hz, duration ms)
type Note = (f32, u64);

const FLAP: &[Note] = &[(660.0, 40), (880.0, 40)];
const SCORE: &[Note] = &[(988.0, 60), (1319.0, 120)];
// Falling sweep, 400 Hz down to 80 Hz
const CRASH: &[Note] = &[
    (400.0, 60),
    (320.0, 60),
    (250.0, 70),
    (190.0, 80),
    (140.0, 90),
    (100.0, 100),
    (80.0, 120),
];

pub struct Sounds {
    out: Option<imp::Output>,
}

impl Sounds {
    pub fn open(enabled: bool) -> Self {
        if !enabled {
            return Self::silent();
        }
        Self {
            out: imp::Output::open(),
        }
    }

    fn silent() -> Self {
        Self { out: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.out.is_some()
    }

    pub fn flap(&self) {
        self.play(FLAP, 0.10);
    }

    pub fn step(&self, events: &StepEvents) {
        if events.crashed {
            self.play(CRASH, 0.15);
        } else if events.scored > 0 {
            self.play(SCORE, 0.10);
        }
    }

    fn play(&self, notes: &[Note], gain: f32) {
        if let Some(out) = &self.out {
            out.play(notes, gain);
        }
    }
}

#[cfg(feature = "sound")]
mod imp {
    use super::Note;
    use log::warn;
    use rodio::source::SineWave;
    use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
    use std::time::Duration;

    pub struct Output {
        // Dropping the stream stops playback
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl Output {
        pub fn open() -> Option<Self> {
            match OutputStream::try_default() {
                Ok((stream, handle)) => Some(Self {
                    _stream: stream,
                    handle,
                }),
                Err(e) => {
                    warn!("no audio output, continuing silently: {}", e);
                    None
                }
            }
        }

        pub fn play(&self, notes: &[Note], gain: f32) {
            let sink = match Sink::try_new(&self.handle) {
                Ok(sink) => sink,
                Err(e) => {
                    warn!("failed to start sound: {}", e);
                    return;
                }
            };
            for &(freq, ms) in notes {
                sink.append(
                    SineWave::new(freq)
                        .take_duration(Duration::from_millis(ms))
                        .amplify(gain),
                );
            }
            sink.detach(); // Play in background
        }
    }
}

#[cfg(not(feature = "sound"))]
mod imp {
    use super::Note;

    pub struct Output;

    impl Output {
        pub fn open() -> Option<Self> {
            log::debug!("built without the sound feature");
            None
        }

        pub fn play(&self, _notes: &[Note], _gain: f32) {}
    }
}
