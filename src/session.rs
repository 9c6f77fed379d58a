use crate::config::Config;
use crate::spawner::{Pipe, Spawner};
use crate::sprite::{AssetOutcome, FallbackReason, Sprite};
use log::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub vy: f64,
}

impl Bird {
    /// Bird with placeholder dimensions, vertically centered.
    fn new(config: &Config) -> Self {
        Self {
            x: config.bird_x,
            y: config.field_height / 2.0,
            w: config.placeholder_width,
            h: config.placeholder_height,
            vy: 0.0,
        }
    }

    /// Pitch in radians for drawing, clamped to about ±30°.
    pub fn tilt(&self) -> f64 {
        (self.vy * 0.08).clamp(-0.5, 0.5)
    }
}

/// Whether the bird sprite is usable yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetState {
    Loading,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    GameOver,
}

/// What a flap did, depending on the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlapOutcome {
    /// Asset still loading
    Ignored,
    /// Upward impulse applied
    Flapped,
    /// Game over screen dismissed; fresh session, no impulse
    Restarted,
}

/// One play-through plus the state that outlives it (best score, RNG).
pub struct Session {
    config: Config,
    pub bird: Bird,
    pub pipes: Vec<Pipe>,
    pub score: u32,
    pub best: u32,
    /// Milliseconds of simulated time since the last spawn.
    pub spawn_timer: f64,
    phase: Phase,
    asset: AssetState,
    spawner: Spawner,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let spawner = Spawner::new(&config);
        Self::with_spawner(config, spawner)
    }

    pub fn with_spawner(config: Config, spawner: Spawner) -> Self {
        Self {
            bird: Bird::new(&config),
            pipes: Vec::new(),
            score: 0,
            best: 0,
            spawn_timer: 0.0,
            phase: Phase::Running,
            asset: AssetState::Loading,
            spawner,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn sprite_ready(&self) -> bool {
        self.asset == AssetState::Ready
    }

    /// The one gate for the physics step.
    pub fn is_simulating(&self) -> bool {
        self.sprite_ready() && self.is_running()
    }

    /// Finalize the bird's size from the sprite's aspect ratio. Only the
    /// first call has an effect; returns whether it did.
    pub fn asset_ready(&mut self, aspect: f64) -> bool {
        if self.asset == AssetState::Ready {
            return false;
        }
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            self.config.placeholder_aspect()
        };
        self.bird.h = self.config.bird_height;
        self.bird.w = self.bird.h * aspect;
        self.asset = AssetState::Ready;
        info!("bird ready at {:.1}x{:.1}", self.bird.w, self.bird.h);
        true
    }

    /// Finish loading from the loader's report. A failed, timed-out or
    /// abandoned load still readies the session, sized by the placeholder;
    /// only a loaded sprite is handed back for drawing.
    pub fn apply_asset(&mut self, outcome: AssetOutcome) -> Option<Sprite> {
        match outcome {
            AssetOutcome::Loaded(sprite) => {
                self.asset_ready(sprite.aspect());
                Some(sprite)
            }
            AssetOutcome::Fallback(reason) => {
                match reason {
                    FallbackReason::Failed(e) => warn!("sprite unavailable: {}", e),
                    FallbackReason::TimedOut => warn!("sprite load timed out"),
                    FallbackReason::LoaderGone => warn!("sprite loader stopped"),
                }
                let aspect = self.config.placeholder_aspect();
                self.asset_ready(aspect);
                None
            }
        }
    }

    pub fn flap(&mut self) -> FlapOutcome {
        match (self.asset, self.phase) {
            (AssetState::Loading, _) => FlapOutcome::Ignored,
            (AssetState::Ready, Phase::GameOver) => {
                self.reset();
                FlapOutcome::Restarted
            }
            (AssetState::Ready, Phase::Running) => {
                self.bird.vy = self.config.jump;
                FlapOutcome::Flapped
            }
        }
    }

    /// Start a new session. Keeps the best score and the bird's size.
    pub fn reset(&mut self) {
        self.pipes.clear();
        self.score = 0;
        self.spawn_timer = 0.0;
        self.bird.y = self.config.field_height / 2.0;
        self.bird.vy = 0.0;
        self.phase = Phase::Running;
        info!("new session, best {}", self.best);
    }

    /// Enter game over. Returns `true` only on the transition itself.
    pub fn end(&mut self) -> bool {
        if self.phase == Phase::GameOver {
            return false;
        }
        self.phase = Phase::GameOver;
        info!("game over, score {} best {}", self.score, self.best);
        true
    }

    pub(crate) fn spawn_pipe(&mut self) {
        let pipe = self.spawner.spawn_pipe(self.config.field_width);
        debug!("pipe spawned, top {:.1}", pipe.top_h);
        self.pipes.push(pipe);
    }

    pub(crate) fn record_pass(&mut self) {
        self.score += 1;
        if self.score > self.best {
            self.best = self.score;
        }
    }
}
