use crate::font::{self, GLYPH_H};
use crate::pixels::{PixelBuf, Rgb};
use crate::session::Session;
use crate::sprite::Sprite;

// ── Colors ──────────────────────────────────────────────────────────────────

pub const LETTERBOX: Rgb = Rgb(18, 22, 30);
pub const SKY_TOP: Rgb = Rgb::hex(0x70c5ce);
pub const SKY_BOT: Rgb = Rgb::hex(0xf0f9ff);
pub const GROUND: Rgb = Rgb::hex(0xded895);
pub const GROUND_EDGE: Rgb = Rgb::hex(0xc8c06a);
pub const PIPE: Rgb = Rgb::hex(0x4ec04e);
pub const PIPE_LIP: Rgb = Rgb::hex(0x3a9a3a);
pub const PLACEHOLDER: Rgb = Rgb::hex(0xffff00);
pub const WHITE: Rgb = Rgb(255, 255, 255);

const GROUND_EDGE_H: f64 = 5.0;
const LIP_H: f64 = 10.0;
const LIP_OVERHANG: f64 = 2.0;

/// Where the logical field lands in the pixel buffer: uniformly scaled and
/// centered, the rest is letterbox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Viewport {
    pub fn fit(field_w: f64, field_h: f64, buf_w: usize, buf_h: usize) -> Self {
        let scale = (buf_w as f64 / field_w).min(buf_h as f64 / field_h);
        let w = (field_w * scale).floor() as i32;
        let h = (field_h * scale).floor() as i32;
        Self {
            scale,
            x: (buf_w as i32 - w) / 2,
            y: (buf_h as i32 - h) / 2,
            w,
            h,
        }
    }

    fn to_buf_x(&self, fx: f64) -> i32 {
        self.x + (fx * self.scale).round() as i32
    }

    fn to_buf_y(&self, fy: f64) -> i32 {
        self.y + (fy * self.scale).round() as i32
    }

    fn contains(&self, bx: i32, by: i32) -> bool {
        bx >= self.x && by >= self.y && bx < self.x + self.w && by < self.y + self.h
    }

    /// Fill a field-space rectangle, clipped to the viewport.
    fn fill(&self, buf: &mut PixelBuf, x: f64, y: f64, w: f64, h: f64, c: Rgb) {
        let x0 = self.to_buf_x(x).max(self.x);
        let y0 = self.to_buf_y(y).max(self.y);
        let x1 = self.to_buf_x(x + w).min(self.x + self.w);
        let y1 = self.to_buf_y(y + h).min(self.y + self.h);
        if x1 > x0 && y1 > y0 {
            buf.fill_rect(x0, y0, x1 - x0, y1 - y0, c);
        }
    }
}

/// Draw one frame of `session` into `buf`. `sprite` is only used once the
/// session reports the asset ready; otherwise the bird is a placeholder box.
pub fn draw(buf: &mut PixelBuf, session: &Session, sprite: Option<&Sprite>) {
    let cfg = session.config();
    let view = Viewport::fit(cfg.field_width, cfg.field_height, buf.width(), buf.height());

    buf.clear(LETTERBOX);
    if view.w <= 0 || view.h <= 0 {
        return;
    }
    draw_background(buf, &view, session);
    draw_pipes(buf, &view, session);
    let sprite = if session.sprite_ready() { sprite } else { None };
    draw_bird(buf, &view, session, sprite);
    draw_hud(buf, &view, session);
}

fn draw_background(buf: &mut PixelBuf, view: &Viewport, session: &Session) {
    let cfg = session.config();
    for row in 0..view.h {
        let t = (row as u32 * 256 / view.h.max(1) as u32) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        buf.fill_rect(view.x, view.y + row, view.w, 1, c);
    }

    let ground_y = cfg.ground_y();
    view.fill(buf, 0.0, ground_y, cfg.field_width, cfg.ground_height, GROUND);
    view.fill(
        buf,
        0.0,
        ground_y - GROUND_EDGE_H,
        cfg.field_width,
        GROUND_EDGE_H,
        GROUND_EDGE,
    );
}

fn draw_pipes(buf: &mut PixelBuf, view: &Viewport, session: &Session) {
    let cfg = session.config();
    let pw = cfg.pipe_width;
    let lip_w = pw + LIP_OVERHANG * 2.0;

    for pipe in &session.pipes {
        // Top segment, lip at its lower end
        view.fill(buf, pipe.x, 0.0, pw, pipe.top_h, PIPE);
        view.fill(buf, pipe.x - LIP_OVERHANG, pipe.top_h - LIP_H, lip_w, LIP_H, PIPE_LIP);

        // Bottom segment down to the ground, lip at its upper end
        let bottom_y = pipe.top_h + cfg.pipe_gap;
        view.fill(buf, pipe.x, bottom_y, pw, cfg.ground_y() - bottom_y, PIPE);
        view.fill(buf, pipe.x - LIP_OVERHANG, bottom_y, lip_w, LIP_H, PIPE_LIP);
    }
}

fn draw_bird(buf: &mut PixelBuf, view: &Viewport, session: &Session, sprite: Option<&Sprite>) {
    let bird = &session.bird;
    let (half_w, half_h) = (bird.w / 2.0, bird.h / 2.0);
    let (cx, cy) = (bird.x + half_w, bird.y + half_h);
    let (sin, cos) = bird.tilt().sin_cos();

    // Bounding circle of the rotated box, in buffer pixels
    let radius = half_w.hypot(half_h);
    let bx0 = view.to_buf_x(cx - radius) - 1;
    let bx1 = view.to_buf_x(cx + radius) + 1;
    let by0 = view.to_buf_y(cy - radius) - 1;
    let by1 = view.to_buf_y(cy + radius) + 1;

    for by in by0..=by1 {
        for bx in bx0..=bx1 {
            if !view.contains(bx, by) {
                continue;
            }
            // Pixel center back into field space, then into the bird's frame
            let fx = (bx as f64 + 0.5 - view.x as f64) / view.scale - cx;
            let fy = (by as f64 + 0.5 - view.y as f64) / view.scale - cy;
            let lx = fx * cos + fy * sin;
            let ly = -fx * sin + fy * cos;
            if lx.abs() > half_w || ly.abs() > half_h {
                continue;
            }

            let color = match sprite {
                Some(sprite) => {
                    let sx = ((lx + half_w) / bird.w * sprite.width() as f64).floor() as i32;
                    let sy = ((ly + half_h) / bird.h * sprite.height() as f64).floor() as i32;
                    // Edge samples land exactly on width/height
                    let sx = sx.min(sprite.width() as i32 - 1);
                    let sy = sy.min(sprite.height() as i32 - 1);
                    match sprite.pixel(sx, sy) {
                        Some(c) => c,
                        None => continue,
                    }
                }
                None => PLACEHOLDER,
            };
            buf.set(bx, by, color);
        }
    }
}

fn draw_hud(buf: &mut PixelBuf, view: &Viewport, session: &Session) {
    let text_scale = (view.h / 100).max(1);
    let line_h = (GLYPH_H + 2) * text_scale;
    let left = view.x + 2 * text_scale;
    let top = view.y + 2 * text_scale;

    font::draw_text(buf, left, top, &format!("SCORE:{}", session.score), WHITE, text_scale);
    font::draw_text(buf, left, top + line_h, &format!("BEST:{}", session.best), WHITE, text_scale);

    if session.is_game_over() {
        buf.darken_rect(view.x, view.y, view.w, view.h);

        let cx = view.x + view.w / 2;
        let cy = view.y + view.h / 2;
        let title_scale = if font::text_width("GAME OVER", text_scale * 2) <= view.w {
            text_scale * 2
        } else {
            text_scale
        };
        font::draw_text_centered(
            buf,
            cx,
            cy - (GLYPH_H + 2) * title_scale,
            "GAME OVER",
            WHITE,
            title_scale,
        );
        font::draw_text_centered(buf, cx, cy + text_scale, "PRESS SPACE", WHITE, text_scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::spawner::{Pipe, Spawner};
    use crate::sprite::{BUILTIN_BIRD, Sprite};

    fn session() -> Session {
        let config = Config::new();
        let spawner = Spawner::seeded(&config, 5);
        Session::with_spawner(config, spawner)
    }

    fn snapshot(buf: &PixelBuf) -> Vec<Rgb> {
        let mut px = Vec::new();
        for y in 0..buf.height() {
            for x in 0..buf.width() {
                px.push(buf.get(x, y));
            }
        }
        px
    }

    #[test]
    fn test_viewport_fit_letterboxes() {
        let view = Viewport::fit(400.0, 600.0, 200, 120);
        assert_eq!(view.scale, 0.2);
        assert_eq!((view.w, view.h), (80, 120));
        assert_eq!((view.x, view.y), (60, 0));
    }

    #[test]
    fn test_background_and_ground() {
        // 1:1 scale keeps coordinates readable
        let mut buf = PixelBuf::new(400, 600);
        let s = session();
        draw(&mut buf, &s, None);
        assert_eq!(buf.get(399, 0), SKY_TOP);
        assert_eq!(buf.get(200, 590), GROUND);
        assert_eq!(buf.get(200, 557), GROUND_EDGE);
    }

    #[test]
    fn test_pipes_and_lips() {
        let mut buf = PixelBuf::new(400, 600);
        let mut s = session();
        s.pipes.push(Pipe {
            x: 300.0,
            top_h: 200.0,
            passed: false,
        });
        draw(&mut buf, &s, None);
        assert_eq!(buf.get(320, 100), PIPE, "Top segment body");
        assert_eq!(buf.get(299, 195), PIPE_LIP, "Top lip overhangs");
        assert_ne!(buf.get(320, 250), PIPE, "Gap is open");
        assert_eq!(buf.get(320, 315), PIPE_LIP, "Bottom lip");
        assert_eq!(buf.get(320, 400), PIPE, "Bottom segment body");
        assert_eq!(buf.get(320, 580), GROUND, "Pipe stops at the ground");
    }

    #[test]
    fn test_placeholder_while_loading() {
        let mut buf = PixelBuf::new(400, 600);
        let s = session();
        draw(&mut buf, &s, None);
        // Placeholder is 34x24 at (40, 300), vy = 0 so no tilt
        assert_eq!(buf.get(57, 312), PLACEHOLDER);
        assert_ne!(buf.get(80, 312), PLACEHOLDER);
    }

    #[test]
    fn test_sprite_when_ready() {
        let sprite = Sprite::parse(BUILTIN_BIRD).unwrap();
        let mut buf = PixelBuf::new(400, 600);
        let mut s = session();
        s.asset_ready(sprite.aspect());
        draw(&mut buf, &s, Some(&sprite));
        // Bird box is 90x60 at (40, 300); its middle row is wing or body
        let mid = buf.get(85, 330);
        assert_ne!(mid, PLACEHOLDER);
        assert_ne!(mid, Rgb::lerp(SKY_TOP, SKY_BOT, (330 * 256 / 600) as u16));
        // Transparent corner shows the sky
        assert_eq!(buf.get(41, 301), Rgb::lerp(SKY_TOP, SKY_BOT, (301 * 256 / 600) as u16));
    }

    #[test]
    fn test_game_over_overlay_darkens() {
        let mut buf = PixelBuf::new(400, 600);
        let mut s = session();
        draw(&mut buf, &s, None);
        let before = buf.get(399, 599);
        s.end();
        draw(&mut buf, &s, None);
        assert_eq!(buf.get(399, 599), before.halve());
    }

    #[test]
    fn test_draw_is_repeatable() {
        let mut buf = PixelBuf::new(120, 90);
        let mut s = session();
        s.asset_ready(1.5);
        s.pipes.push(Pipe {
            x: 150.0,
            top_h: 120.0,
            passed: false,
        });
        s.bird.vy = 5.0;
        draw(&mut buf, &s, None);
        let first = snapshot(&buf);
        draw(&mut buf, &s, None);
        assert_eq!(snapshot(&buf), first);
    }

    #[test]
    fn test_tiny_buffer_does_not_panic() {
        let mut buf = PixelBuf::new(1, 1);
        draw(&mut buf, &session(), None);
        let mut buf = PixelBuf::new(0, 0);
        draw(&mut buf, &session(), None);
    }
}
