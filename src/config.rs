//! Tunables for the particle field.
//!
//! Every knob the background exposes lives here with its default, so the
//! animator itself never carries a magic number that a caller might want to
//! change. A config is fixed for the lifetime of an animator; to change it,
//! mount a fresh one.

use crate::types::Rgba;
use thiserror::Error;

/// Fill color of the dots (sky-500); only the alpha comes from the config.
pub const DOT_RGB: (u8, u8, u8) = (14, 165, 233);
/// Stroke color of the links (slate-400).
pub const LINK_RGB: (u8, u8, u8) = (148, 163, 184);
/// Stroke width of a link, in logical units.
pub const LINK_WIDTH: f32 = 1.2;
/// Fewest particles a surface ever gets, even a zero-area one.
pub const MIN_PARTICLES: usize = 40;

/// Particle field configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    /// Density divisor: `N = max(40, floor(sqrt(W*H) / divisor))`.
    /// Smaller means more particles.
    pub divisor: f32,

    /// Dot fill opacity (0..1)
    pub dot_alpha: f32,

    /// Dot radius (logical units)
    pub point_radius: f32,

    /// Base link opacity factor
    pub link_alpha: f32,

    /// Base link distance is `min(W, H) / threshold_div`
    pub threshold_div: f32,

    /// Base velocity scale (units/frame)
    pub speed: f32,

    /// Pointer pushes particles away and boosts nearby links
    pub interactive: bool,

    /// Pointer influence radius (logical units)
    pub mouse_radius: f32,

    /// Peak push added to a velocity at the pointer, fading to 0 at `mouse_radius`
    pub mouse_strength: f32,

    /// Per-frame velocity damping, in (0, 1)
    pub friction: f32,

    /// Explicit speed cap; `None` means `speed * 1.2`
    pub max_speed: Option<f32>,

    /// Per-frame jitter; each velocity axis gets uniform [-noise/2, noise/2]
    pub noise: f32,

    /// Speed floor as a fraction of `speed`
    pub min_speed_factor: f32,

    /// Glow (shadow) blur radius around dots
    pub glow_blur: f32,

    /// Glow color
    pub glow_color: Rgba,

    /// Also glow the links (at 60% of `glow_blur`)
    pub glow_lines: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            divisor: 14.0,
            dot_alpha: 0.45,
            point_radius: 2.0,
            link_alpha: 0.25,
            threshold_div: 5.0,
            speed: 0.4,
            interactive: false,
            mouse_radius: 200.0,
            mouse_strength: 0.12,
            friction: 0.96,
            max_speed: None,
            noise: 0.015,
            min_speed_factor: 0.22,
            glow_blur: 6.0,
            glow_color: Rgba::new(56, 189, 248, 0.25), // translucent sky-400
            glow_lines: false,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be finite and greater than zero (got {value})")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} must be finite and non-negative (got {value})")]
    Negative { name: &'static str, value: f32 },
    #[error("friction must lie strictly between 0 and 1 (got {0})")]
    Friction(f32),
    #[error("max speed {max} is below the minimum speed {min}")]
    SpeedBand { min: f32, max: f32 },
}

impl FieldConfig {
    /// Speed floor every particle is held above.
    pub fn min_speed(&self) -> f32 {
        self.speed * self.min_speed_factor
    }

    /// Speed cap: the explicit one, else 1.2x the base speed.
    pub fn max_speed(&self) -> f32 {
        self.max_speed.unwrap_or(self.speed * 1.2)
    }

    /// Particle count for a `width x height` logical surface.
    pub fn particle_count(&self, width: f32, height: f32) -> usize {
        let area = (width.max(0.0) * height.max(0.0)) as f64;
        let n = (area.sqrt() / self.divisor as f64).floor();
        (n as usize).max(MIN_PARTICLES)
    }

    /// Reject configs that would make the simulation divide by zero or let
    /// the speed band collapse.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("divisor", self.divisor),
            ("threshold_div", self.threshold_div),
            ("mouse_radius", self.mouse_radius),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        let non_negative = [
            ("speed", self.speed),
            ("noise", self.noise),
            ("min_speed_factor", self.min_speed_factor),
            ("point_radius", self.point_radius),
            ("dot_alpha", self.dot_alpha),
            ("link_alpha", self.link_alpha),
            ("mouse_strength", self.mouse_strength),
            ("glow_blur", self.glow_blur),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }
        if let Some(value) = self.max_speed {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { name: "max_speed", value });
            }
        }

        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(ConfigError::Friction(self.friction));
        }
        if self.max_speed() < self.min_speed() {
            return Err(ConfigError::SpeedBand { min: self.min_speed(), max: self.max_speed() });
        }
        Ok(())
    }
}

/// Page background behind most sections (slate-900).
pub const BG_MAIN: Rgba = Rgba::new(15, 23, 42, 1.0);
/// Darker background behind the hero banner (slate-950).
pub const BG_ALT: Rgba = Rgba::new(2, 6, 23, 1.0);

/// Named looks from the portfolio page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    /// Fixed backdrop behind the whole page: sparse, dim, reacts to the pointer
    Page,
    /// Hero banner: denser, brighter, pushes away from the pointer
    Hero,
    /// The bare component with every default and no pointer interaction
    Ambient,
}

impl Preset {
    pub fn field_config(self) -> FieldConfig {
        match self {
            Preset::Page => FieldConfig {
                interactive: true,
                friction: 0.97,
                max_speed: Some(0.6),
                noise: 0.008,
                glow_blur: 4.0,
                glow_color: Rgba::new(56, 189, 248, 0.2),
                divisor: 16.0,
                dot_alpha: 0.35,
                point_radius: 1.8,
                link_alpha: 0.22,
                threshold_div: 5.0,
                speed: 0.3,
                ..FieldConfig::default()
            },
            Preset::Hero => FieldConfig {
                interactive: true,
                mouse_radius: 240.0,
                mouse_strength: 0.14,
                friction: 0.95,
                max_speed: Some(0.7),
                noise: 0.012,
                glow_blur: 10.0,
                glow_color: Rgba::new(56, 189, 248, 0.3),
                divisor: 12.0,
                dot_alpha: 0.6,
                point_radius: 2.4,
                link_alpha: 0.4,
                threshold_div: 4.0,
                speed: 0.45,
                ..FieldConfig::default()
            },
            Preset::Ambient => FieldConfig::default(),
        }
    }

    /// Layer opacity the page puts on the canvas for this look.
    pub fn layer_opacity(self) -> f32 {
        match self {
            Preset::Page => 0.35,
            Preset::Hero => 0.7,
            Preset::Ambient => 0.6,
        }
    }

    /// Page color showing through behind the layer.
    pub fn background(self) -> Rgba {
        match self {
            Preset::Hero => BG_ALT,
            Preset::Page | Preset::Ambient => BG_MAIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        FieldConfig::default().validate().unwrap();
        for preset in [Preset::Page, Preset::Hero, Preset::Ambient] {
            preset.field_config().validate().unwrap();
        }
    }

    #[test]
    fn page_backdrop_matches_the_site() {
        let page = Preset::Page.field_config();
        assert!(page.interactive);
        assert_eq!(page.divisor, 16.0);
        assert_eq!(page.max_speed(), 0.6);
        assert_eq!(page.glow_color, Rgba::new(56, 189, 248, 0.2));
        // pointer radius/strength stay at the component defaults
        assert_eq!(page.mouse_radius, 200.0);
        assert_eq!(page.mouse_strength, 0.12);
        assert_eq!(Preset::Page.layer_opacity(), 0.35);
        assert_eq!(Preset::Page.background(), BG_MAIN);
    }

    #[test]
    fn each_preset_picks_its_own_page_color() {
        assert_eq!(Preset::Hero.background(), BG_ALT);
        assert_eq!(Preset::Ambient.background(), BG_MAIN);
        assert_ne!(Preset::Hero.background(), Preset::Page.background());
    }

    #[test]
    fn particle_count_follows_density_rule() {
        let cfg = FieldConfig::default();
        // sqrt(800*600) = 692.8; / 14 = 49.48
        assert_eq!(cfg.particle_count(800.0, 600.0), 49);
        assert_eq!(cfg.particle_count(1920.0, 1080.0), 102);
    }

    #[test]
    fn particle_count_never_drops_below_floor() {
        let cfg = FieldConfig::default();
        assert_eq!(cfg.particle_count(0.0, 0.0), MIN_PARTICLES);
        assert_eq!(cfg.particle_count(100.0, 100.0), MIN_PARTICLES);
        assert_eq!(cfg.particle_count(-5.0, 300.0), MIN_PARTICLES);
    }

    #[test]
    fn speed_band_derives_from_speed() {
        let cfg = FieldConfig::default();
        assert!((cfg.min_speed() - 0.088).abs() < 1e-6);
        assert!((cfg.max_speed() - 0.48).abs() < 1e-6);

        let hero = Preset::Hero.field_config();
        assert_eq!(hero.max_speed(), 0.7);
    }

    #[test]
    fn rejects_bad_configs() {
        let bad = FieldConfig { divisor: 0.0, ..FieldConfig::default() };
        assert!(matches!(bad.validate(), Err(ConfigError::NotPositive { name: "divisor", .. })));

        let bad = FieldConfig { friction: 1.0, ..FieldConfig::default() };
        assert_eq!(bad.validate(), Err(ConfigError::Friction(1.0)));

        let bad = FieldConfig { noise: -0.1, ..FieldConfig::default() };
        assert!(matches!(bad.validate(), Err(ConfigError::Negative { name: "noise", .. })));

        let bad = FieldConfig { max_speed: Some(0.01), ..FieldConfig::default() };
        assert!(matches!(bad.validate(), Err(ConfigError::SpeedBand { .. })));
    }
}
