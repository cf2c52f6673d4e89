//! The particle network: simulation step plus the draw calls for one frame.
//!
//! Particles drift with a damped, jittered velocity held inside a speed band,
//! bounce off the surface edges, and get pushed away from the pointer. Every
//! pair closer than a distance threshold is joined by a line whose opacity
//! falls off with distance; near the pointer the threshold and the opacity
//! both grow, so the network "lights up" around the cursor.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand::rngs::StdRng;

use crate::config::{DOT_RGB, FieldConfig, LINK_RGB, LINK_WIDTH};
use crate::surface::Surface;
use crate::types::{FrameStats, Particle, PointerState, Rgba};

/// Largest device pixel ratio we render at.
pub const MAX_DPR: f32 = 2.0;

/// Sanitize a host-reported device pixel ratio.
pub fn clamp_dpr(dpr: f32) -> f32 {
    if !dpr.is_finite() || dpr <= 0.0 { 1.0 } else { dpr.min(MAX_DPR) }
}

/// Owned simulation state for one mounted background.
pub struct ParticleField {
    config: FieldConfig,
    particles: Vec<Particle>,
    pointer: PointerState,
    width: f32,  // logical units
    height: f32, // logical units
    dpr: f32,
    rng: StdRng,
}

impl ParticleField {
    /// Empty field; nothing moves until `init` sizes it.
    pub fn new(config: FieldConfig, rng: StdRng) -> Self {
        Self {
            config,
            particles: Vec::new(),
            pointer: PointerState::default(),
            width: 0.0,
            height: 0.0,
            dpr: 1.0,
            rng,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[cfg(test)]
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Logical size the particles currently live in.
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn dpr(&self) -> f32 {
        self.dpr
    }

    /// Size the surface for `width x height` logical units and scatter a
    /// brand new particle set over it. Called on mount and on every resize;
    /// the previous set is dropped wholesale.
    pub fn init<S: Surface>(&mut self, surface: &mut S, width: f32, height: f32, dpr: f32) {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        let dpr = clamp_dpr(dpr);

        self.width = width;
        self.height = height;
        self.dpr = dpr;
        surface.resize((width * dpr).floor() as usize, (height * dpr).floor() as usize);

        let count = self.config.particle_count(width, height);
        let speed = self.config.speed;
        let rng = &mut self.rng;
        self.particles = (0..count)
            .map(|_| Particle {
                pos: Vec2::new(rng.r#gen::<f32>() * width, rng.r#gen::<f32>() * height),
                vel: Vec2::new(
                    (rng.r#gen::<f32>() - 0.5) * speed,
                    (rng.r#gen::<f32>() - 0.5) * speed,
                ),
            })
            .collect();
    }

    /// Pointer moved to `local` (surface coordinates). Ignored unless the
    /// field is interactive.
    pub fn pointer_moved(&mut self, local: Vec2) {
        if !self.config.interactive {
            self.pointer.inside = false;
            return;
        }
        self.pointer.pos = local;
        self.pointer.inside =
            (0.0..=self.width).contains(&local.x) && (0.0..=self.height).contains(&local.y);
    }

    pub fn pointer_left(&mut self) {
        self.pointer.inside = false;
    }

    /// Advance every particle one frame and draw the frame onto `surface`.
    pub fn step<S: Surface>(&mut self, surface: &mut S) -> FrameStats {
        surface.clear();
        surface.save();
        surface.scale(self.dpr);

        let cfg = &self.config;
        let threshold = self.width.min(self.height) / cfg.threshold_div;
        let max_v = cfg.max_speed();
        let min_v = cfg.min_speed();
        let pointer = (cfg.interactive && self.pointer.inside).then_some(self.pointer.pos);
        let dot = Rgba::new(DOT_RGB.0, DOT_RGB.1, DOT_RGB.2, cfg.dot_alpha);

        let mut stats = FrameStats { particles: self.particles.len(), ..FrameStats::default() };

        for i in 0..self.particles.len() {
            let p = &mut self.particles[i];

            if let Some(m) = pointer {
                push_away(p, m, cfg.mouse_radius, cfg.mouse_strength);
            }
            p.vel *= cfg.friction;
            p.vel = lift_to_floor(p.vel, min_v, max_v, &mut self.rng);
            p.vel += Vec2::new(
                (self.rng.r#gen::<f32>() - 0.5) * cfg.noise,
                (self.rng.r#gen::<f32>() - 0.5) * cfg.noise,
            );
            p.vel = hold_in_band(p.vel, min_v, max_v, &mut self.rng);

            p.pos += p.vel;
            if p.pos.x < 0.0 || p.pos.x > self.width {
                p.vel.x = -p.vel.x;
            }
            if p.pos.y < 0.0 || p.pos.y > self.height {
                p.vel.y = -p.vel.y;
            }

            surface.set_shadow(cfg.glow_blur, cfg.glow_color);
            surface.fill_circle(p.pos, cfg.point_radius, dot);
            surface.set_shadow(0.0, Rgba::TRANSPARENT);

            // Later particles haven't moved yet this frame; that matches the
            // single forward pass the look was tuned with.
            let p = self.particles[i];
            for q in &self.particles[i + 1..] {
                stats.pairs += 1;
                let dist = p.pos.distance(q.pos);

                let (local_threshold, factor) = match pointer {
                    Some(m) => {
                        let closest = p.pos.distance(m).min(q.pos.distance(m));
                        let near = (1.0 - closest / (cfg.mouse_radius * 1.2)).max(0.0);
                        (threshold * (1.0 + 0.35 * near), cfg.link_alpha + 0.4 * near)
                    }
                    None => (threshold, cfg.link_alpha),
                };

                if dist < local_threshold {
                    stats.links += 1;
                    let alpha = (1.0 - dist / local_threshold) * factor;
                    if cfg.glow_lines {
                        surface.set_shadow(cfg.glow_blur * 0.6, cfg.glow_color);
                    }
                    let color = Rgba::new(LINK_RGB.0, LINK_RGB.1, LINK_RGB.2, 0.0).with_alpha(alpha);
                    surface.stroke_line(p.pos, q.pos, LINK_WIDTH, color);
                    if cfg.glow_lines {
                        surface.set_shadow(0.0, Rgba::TRANSPARENT);
                    }
                }
            }
        }

        surface.restore();
        stats
    }

    #[cfg(test)]
    pub(crate) fn set_particles(&mut self, particles: Vec<Particle>) {
        self.particles = particles;
    }
}

/// Add a push pointing from the pointer `m` to the particle, fading linearly
/// to nothing at `radius`.
fn push_away(p: &mut Particle, m: Vec2, radius: f32, strength: f32) {
    let away = p.pos - m;
    let d = away.length();
    if d > 0.0 && d < radius {
        let f = (1.0 - d / radius) * strength;
        p.vel += away / d * f;
    }
}

/// Keep slow particles moving: anything under `min_v` is rescaled to a
/// random speed in [min_v, 1.3*min_v) (never past `max_v`); a dead stop
/// gets a random heading at exactly `min_v`.
fn lift_to_floor(vel: Vec2, min_v: f32, max_v: f32, rng: &mut StdRng) -> Vec2 {
    let mag = vel.length();
    if mag >= min_v {
        return vel;
    }
    if mag > 0.0 {
        let hi = (min_v * 1.3).min(max_v);
        let target = if hi > min_v { rng.gen_range(min_v..hi) } else { min_v };
        vel * (target / mag)
    } else {
        Vec2::from_angle(rng.gen_range(0.0..TAU)) * min_v
    }
}

/// Cap at `max_v`, then catch anything the jitter dragged back under `min_v`.
fn hold_in_band(vel: Vec2, min_v: f32, max_v: f32, rng: &mut StdRng) -> Vec2 {
    let mag = vel.length();
    if mag > max_v {
        return vel * (max_v / mag);
    }
    if mag < min_v {
        return if mag > 0.0 {
            vel * (min_v / mag)
        } else {
            Vec2::from_angle(rng.gen_range(0.0..TAU)) * min_v
        };
    }
    vel
}
