use crate::session::Session;

/// What happened during one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepEvents {
    pub spawned: bool,
    /// Pipes cleared this step
    pub scored: u32,
    /// This step ended the session
    pub crashed: bool,
}

/// Advance the session by `delta` milliseconds of wall-clock time.
///
/// Semi-implicit Euler with a single pass: velocity first, then position.
/// Collision is a plain box overlap at the end position, so a very large
/// `delta` can carry the bird through a pipe.
pub fn step(session: &mut Session, delta: f64) -> StepEvents {
    let mut events = StepEvents::default();
    if !session.is_simulating() {
        return events;
    }

    let cfg = session.config();
    let dt = delta * cfg.time_scale;
    let gravity = cfg.gravity;
    let speed = cfg.pipe_speed;
    let pipe_w = cfg.pipe_width;
    let gap = cfg.pipe_gap;
    let interval = cfg.spawn_interval_ms;
    let ground_y = cfg.ground_y();

    session.bird.vy += gravity * dt;
    session.bird.y += session.bird.vy * dt;

    session.spawn_timer += delta;
    if session.spawn_timer >= interval {
        session.spawn_pipe();
        session.spawn_timer = 0.0;
        events.spawned = true;
    }

    let mut hit = false;
    let mut passed = 0;
    let bird = session.bird.clone();
    // Back to front so removal does not shift unvisited pipes.
    for i in (0..session.pipes.len()).rev() {
        let pipe = &mut session.pipes[i];
        pipe.x -= speed * dt;

        let in_x = bird.x + bird.w > pipe.x && bird.x < pipe.x + pipe_w;
        let hit_top = bird.y < pipe.top_h;
        let hit_bottom = bird.y + bird.h > pipe.top_h + gap;
        if in_x && (hit_top || hit_bottom) {
            hit = true;
        }

        if pipe.x + pipe_w < 0.0 {
            session.pipes.remove(i);
            continue;
        }

        if !pipe.passed && pipe.x + pipe_w < bird.x {
            pipe.passed = true;
            passed += 1;
        }
    }
    for _ in 0..passed {
        session.record_pass();
    }
    events.scored = passed;

    if bird.y + bird.h >= ground_y || bird.y <= 0.0 {
        hit = true;
    }
    if hit {
        events.crashed = session.end();
    }
    events
}
