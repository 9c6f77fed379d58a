//! Bird sprite: a text pixel-map decoded off the game thread.
//!
//! One character per pixel, one line per row. `.` is transparent; every
//! other character must have a [`palette`] entry.

use crate::error::SpriteError;
use crate::pixels::Rgb;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

pub const BIRD_Y: Rgb = Rgb(245, 200, 66);
pub const BIRD_HI: Rgb = Rgb(255, 225, 100);
pub const BIRD_WING: Rgb = Rgb(215, 165, 35);
pub const BIRD_EYE: Rgb = Rgb(255, 255, 255);
pub const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
pub const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
pub const BIRD_BEAK_HI: Rgb = Rgb(240, 110, 50);
pub const OUTLINE: Rgb = Rgb(40, 30, 20);

#[rustfmt::skip]
pub const BUILTIN_BIRD: &str = "\
......KKKKKK......
....KKHHHHKEEK....
...KHYYYYKEEEEK...
..KYYYYYYKEEEPEK..
.KKKKYYYYKEEEPEK..
KWWWWKYYYKEEEEEK..
KWWWWWKYYYKKKKKKK.
KYWWWKYYYKbbbbbbbK
.KKKKYYYKBKKKKKKK.
..KYYYYYYKBBBBBK..
...KKYYYYYKKKKK...
.....KKKKKK.......
";

pub fn palette(ch: char) -> Option<Rgb> {
    match ch {
        'Y' => Some(BIRD_Y),
        'H' => Some(BIRD_HI),
        'W' => Some(BIRD_WING),
        'E' => Some(BIRD_EYE),
        'P' => Some(BIRD_PUPIL),
        'B' => Some(BIRD_BEAK),
        'b' => Some(BIRD_BEAK_HI),
        'K' => Some(OUTLINE),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    width: usize,
    height: usize,
    px: Vec<Option<Rgb>>,
}

impl Sprite {
    pub fn parse(text: &str) -> Result<Self, SpriteError> {
        let mut width = 0;
        let mut px = Vec::new();
        let mut height = 0;

        for line in text.lines().map(str::trim_end).filter(|l| !l.is_empty()) {
            let row_len = line.chars().count();
            if height == 0 {
                width = row_len;
            } else if row_len != width {
                return Err(SpriteError::Ragged {
                    row: height,
                    expected: width,
                    found: row_len,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                if ch == '.' {
                    px.push(None);
                    continue;
                }
                match palette(ch) {
                    Some(c) => px.push(Some(c)),
                    None => {
                        return Err(SpriteError::UnknownPixel {
                            row: height,
                            col,
                            ch,
                        });
                    }
                }
            }
            height += 1;
        }

        if height == 0 || width == 0 {
            return Err(SpriteError::Empty);
        }
        Ok(Sprite { width, height, px })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Color at (x, y), `None` for transparent or out of range.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        self.px[y as usize * self.width + x as usize]
    }
}

/// Where the bird sprite comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum SpriteSource {
    Builtin,
    File(PathBuf),
}

impl SpriteSource {
    fn load(&self) -> Result<Sprite, SpriteError> {
        match self {
            SpriteSource::Builtin => Sprite::parse(BUILTIN_BIRD),
            SpriteSource::File(path) => Sprite::parse(&fs::read_to_string(path)?),
        }
    }
}

/// Why the loader gave up on the sprite.
#[derive(Debug)]
pub enum FallbackReason {
    Failed(SpriteError),
    TimedOut,
    LoaderGone,
}

/// Result of a finished load, reported exactly once by [`AssetLoader::poll`].
#[derive(Debug)]
pub enum AssetOutcome {
    Loaded(Sprite),
    /// The game continues with the placeholder rectangle.
    Fallback(FallbackReason),
}

/// Loads the sprite on a worker thread; the game thread polls without
/// blocking.
pub struct AssetLoader {
    rx: Receiver<Result<Sprite, SpriteError>>,
    started: Instant,
    timeout: Duration,
    finished: bool,
}

impl AssetLoader {
    pub fn spawn(source: SpriteSource, timeout: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // Receiver may already be gone after a timeout.
            let _ = tx.send(source.load());
        });
        Self::from_receiver(rx, timeout)
    }

    fn from_receiver(rx: Receiver<Result<Sprite, SpriteError>>, timeout: Duration) -> Self {
        Self {
            rx,
            started: Instant::now(),
            timeout,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn poll(&mut self) -> Option<AssetOutcome> {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> Option<AssetOutcome> {
        if self.finished {
            return None;
        }
        let outcome = match self.rx.try_recv() {
            Ok(Ok(sprite)) => AssetOutcome::Loaded(sprite),
            Ok(Err(e)) => AssetOutcome::Fallback(FallbackReason::Failed(e)),
            Err(TryRecvError::Disconnected) => AssetOutcome::Fallback(FallbackReason::LoaderGone),
            Err(TryRecvError::Empty) => {
                if now.duration_since(self.started) < self.timeout {
                    return None;
                }
                AssetOutcome::Fallback(FallbackReason::TimedOut)
            }
        };
        self.finished = true;
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wait_for(loader: &mut AssetLoader) -> AssetOutcome {
        for _ in 0..500 {
            if let Some(outcome) = loader.poll() {
                return outcome;
            }
            thread::sleep(Duration::from_millis(2));
        }
        panic!("loader never finished");
    }

    #[test]
    fn test_builtin_sprite_parses() {
        let sprite = Sprite::parse(BUILTIN_BIRD).unwrap();
        assert_eq!(sprite.width(), 18);
        assert_eq!(sprite.height(), 12);
        assert_eq!(sprite.aspect(), 1.5);
        assert_eq!(sprite.pixel(0, 0), None, "Corner is transparent");
        assert_eq!(sprite.pixel(6, 0), Some(OUTLINE));
        assert_eq!(sprite.pixel(18, 0), None);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Sprite::parse("YY\nY\n").unwrap_err();
        assert!(matches!(
            err,
            SpriteError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_unknown_pixel_rejected() {
        let err = Sprite::parse("Y#").unwrap_err();
        assert!(matches!(err, SpriteError::UnknownPixel { row: 0, col: 1, ch: '#' }));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(Sprite::parse("\n\n"), Err(SpriteError::Empty)));
    }

    #[test]
    fn test_loader_delivers_builtin() {
        let mut loader = AssetLoader::spawn(SpriteSource::Builtin, Duration::from_secs(5));
        match wait_for(&mut loader) {
            AssetOutcome::Loaded(sprite) => assert_eq!(sprite.width(), 18),
            other => panic!("expected sprite, got {:?}", other),
        }
        assert!(loader.is_finished());
        assert!(loader.poll().is_none(), "Outcome is reported once");
    }

    #[test]
    fn test_loader_falls_back_on_missing_file() {
        let path = std::env::temp_dir().join("flappy-canvas-no-such-sprite.txt");
        let mut loader = AssetLoader::spawn(SpriteSource::File(path), Duration::from_secs(5));
        match wait_for(&mut loader) {
            AssetOutcome::Fallback(FallbackReason::Failed(SpriteError::Io(_))) => {}
            other => panic!("expected io fallback, got {:?}", other),
        }
    }

    #[test]
    fn test_loader_times_out() {
        let (_tx, rx) = mpsc::channel();
        let mut loader = AssetLoader::from_receiver(rx, Duration::from_millis(100));
        let start = loader.started;
        assert!(loader.poll_at(start).is_none());
        match loader.poll_at(start + Duration::from_millis(100)) {
            Some(AssetOutcome::Fallback(FallbackReason::TimedOut)) => {}
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
