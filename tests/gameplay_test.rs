//! Integration test: full sessions driven through the public API
//!
//! Covers the flap -> step -> score -> crash -> restart cycle and the
//! frame-rate independence of the loop.

use flappy_canvas::pixels::PixelBuf;
use flappy_canvas::render;
use flappy_canvas::{
    Config, FlapOutcome, LoopDriver, Phase, Pipe, Session, Spawner, StepEvents, step,
};
use std::convert::Infallible;

const SCALE: f64 = 0.06;

fn ready_session(seed: u64) -> Session {
    let config = Config::new();
    let spawner = Spawner::seeded(&config, seed);
    let mut session = Session::with_spawner(config, spawner);
    session.asset_ready(1.5);
    session
}

/// Keep the bird parked mid-field so only pipes move.
fn park(session: &mut Session) {
    session.bird.y = 220.0;
    session.bird.vy = 0.0;
}

// =============================================================================
// Physics Scenarios
// =============================================================================

#[test]
fn test_flap_then_one_second() {
    let mut session = ready_session(1);
    assert_eq!(session.score, 0);
    assert_eq!(session.best, 0);
    assert!(session.pipes.is_empty());
    let y0 = session.bird.y;
    assert_eq!(y0, 300.0);

    assert_eq!(session.flap(), FlapOutcome::Flapped);
    assert_eq!(session.bird.vy, -6.5);
    assert_eq!(session.bird.y, y0, "Position unchanged by the flap itself");

    step(&mut session, 1000.0);
    let vy_after = -6.5 + 0.35 * 1000.0 * SCALE;
    let y_after = y0 + vy_after * 1000.0 * SCALE;
    assert!((session.bird.vy - vy_after).abs() < 1e-9);
    assert!((session.bird.y - y_after).abs() < 1e-9);
}

#[test]
fn test_pipe_removed_on_the_step_it_leaves() {
    let mut session = ready_session(2);
    let pipe_w = session.config().pipe_width;
    let field_w = session.config().field_width;
    session.pipes.push(Pipe {
        x: field_w,
        top_h: 200.0,
        passed: false,
    });

    let mut steps = 0;
    loop {
        park(&mut session);
        session.spawn_timer = 0.0;
        let before = session.pipes[0].x;
        step(&mut session, 16.0);
        steps += 1;
        let after = before - 2.0 * (16.0 * SCALE);
        if after + pipe_w < 0.0 {
            assert!(session.pipes.is_empty(), "Removed on step {}", steps);
            break;
        }
        assert_eq!(session.pipes.len(), 1, "Still present at x = {}", after);
        assert!(steps < 10_000);
    }
}

#[test]
fn test_ground_freezes_until_restart() {
    let mut session = ready_session(3);
    let cfg = session.config().clone();
    session.bird.y = cfg.field_height - cfg.ground_height - session.bird.h + 0.5;

    let events = step(&mut session, 16.0);
    assert!(events.crashed);
    assert_eq!(session.phase(), Phase::GameOver);

    let snapshot = (session.bird.clone(), session.pipes.clone(), session.score);
    for _ in 0..5 {
        assert_eq!(step(&mut session, 16.0), StepEvents::default());
    }
    assert_eq!(
        (session.bird.clone(), session.pipes.clone(), session.score),
        snapshot
    );

    assert_eq!(session.flap(), FlapOutcome::Restarted);
    assert_eq!(session.phase(), Phase::Running);
    assert_eq!(session.bird.y, 300.0);
}

// =============================================================================
// Scoring
// =============================================================================

#[test]
fn test_scores_each_pipe_once() {
    let mut session = ready_session(4);
    session.pipes.push(Pipe {
        x: 100.0,
        top_h: 200.0,
        passed: false,
    });
    session.pipes.push(Pipe {
        x: 300.0,
        top_h: 200.0,
        passed: false,
    });

    let mut last_score = 0;
    for _ in 0..400 {
        park(&mut session);
        session.spawn_timer = 0.0;
        step(&mut session, 16.0);
        assert!(session.score >= last_score, "Score never decreases");
        assert!(session.score - last_score <= 1);
        last_score = session.score;
    }
    assert!(session.is_running(), "Parked bird fits the gap");
    assert_eq!(session.score, 2);
    assert!(session.pipes.is_empty());
}

#[test]
fn test_best_survives_sessions() {
    let mut session = ready_session(5);
    let mut best_seen: u32 = 0;
    for round in 1..=3u32 {
        for _ in 0..round {
            session.pipes.push(Pipe {
                x: -30.0,
                top_h: 200.0,
                passed: false,
            });
        }
        park(&mut session);
        step(&mut session, 1.0);
        best_seen = best_seen.max(session.score);
        assert_eq!(session.best, best_seen);

        session.end();
        session.flap();
        assert_eq!(session.score, 0);
        assert_eq!(session.best, best_seen, "Reset never lowers best");
    }
    assert_eq!(session.best, 3);
}

// =============================================================================
// Spawning
// =============================================================================

#[test]
fn test_spawned_pipes_stay_in_range() {
    let mut session = ready_session(42);
    let cfg = session.config().clone();
    let mut spawned = 0;
    for _ in 0..2000 {
        park(&mut session);
        // Keep pipes away from the bird so the run never ends
        session.pipes.retain(|p| p.x > 200.0);
        if step(&mut session, 100.0).spawned {
            spawned += 1;
            let pipe = session.pipes.last().unwrap();
            assert!(pipe.top_h >= cfg.min_top);
            assert!(pipe.top_h <= cfg.field_height - cfg.pipe_gap - cfg.ground_margin);
        }
    }
    assert!(spawned > 100);
}

#[test]
fn test_spawn_cadence_ignores_frame_rate() {
    let mut fast = ready_session(6);
    let mut slow = ready_session(6);
    let mut fast_spawns = 0;
    let mut slow_spawns = 0;

    // 6 simulated seconds at 250 fps and at 20 fps
    for _ in 0..1500 {
        park(&mut fast);
        fast.pipes.clear();
        if step(&mut fast, 4.0).spawned {
            fast_spawns += 1;
        }
    }
    for _ in 0..120 {
        park(&mut slow);
        slow.pipes.clear();
        if step(&mut slow, 50.0).spawned {
            slow_spawns += 1;
        }
    }
    assert_eq!(fast_spawns, 4);
    assert_eq!(slow_spawns, 4);
}

// =============================================================================
// Loop Driver
// =============================================================================

#[test]
fn test_driver_runs_and_renders_frames() {
    let mut session = ready_session(7);
    let mut driver = LoopDriver::new(session.config().fallback_delta_ms);
    let mut buf = PixelBuf::new(80, 60);
    let mut frames = 0;

    let mut t = 1000.0;
    while session.is_running() {
        driver
            .frame(t, &mut session, |s| {
                render::draw(&mut buf, s, None);
                frames += 1;
                Ok::<(), Infallible>(())
            })
            .unwrap();
        t += 16.0;
        assert!(frames < 10_000, "Unflapped bird must hit the ground");
    }
    assert!(session.is_game_over());

    let before = frames;
    driver
        .frame(t, &mut session, |s| {
            render::draw(&mut buf, s, None);
            frames += 1;
            Ok::<(), Infallible>(())
        })
        .unwrap();
    assert_eq!(frames, before + 1, "Frozen sessions still render");
}
