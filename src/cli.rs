//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{ConfigError, FieldConfig, Preset};
use crate::types::Rgba;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "network-field")]
#[command(about = "Animated particle-network background", long_about = None)]
pub struct Args {
    /// Starting look: page (site-wide backdrop), hero (banner) or ambient (bare defaults)
    #[arg(long, value_enum, default_value_t = Preset::Page)]
    pub preset: Preset,

    /// Window width (pixels)
    #[arg(long, default_value_t = 1280)]
    pub width: usize,

    /// Window height (pixels)
    #[arg(long, default_value_t = 720)]
    pub height: usize,

    /// Device pixel ratio (capped at 2)
    #[arg(long, default_value_t = 1.0)]
    pub dpr: f32,

    /// Layer opacity over the page background (default: preset's)
    #[arg(long)]
    pub opacity: Option<f32>,

    /// Page background color, CSS rgb/rgba or #hex (default: preset's)
    #[arg(long, value_name = "COLOR")]
    pub background: Option<Rgba>,

    /// Seed the RNG for a repeatable field
    #[arg(long)]
    pub seed: Option<u64>,

    /// Render headless and write the last frame to this PNG instead of opening a window
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Frames to simulate before writing the snapshot
    #[arg(long, default_value_t = 120)]
    pub frames: u32,

    #[command(flatten)]
    pub field: FieldOverrides,
}

/// Per-option overrides layered on top of the preset.
#[derive(clap::Args, Debug, Default)]
pub struct FieldOverrides {
    /// Density divisor (smaller = more particles)
    #[arg(long)]
    pub divisor: Option<f32>,

    /// Dot opacity
    #[arg(long)]
    pub dot_alpha: Option<f32>,

    /// Dot radius
    #[arg(long)]
    pub point_radius: Option<f32>,

    /// Base link opacity factor
    #[arg(long)]
    pub link_alpha: Option<f32>,

    /// Link distance = min(W, H) / threshold-div
    #[arg(long)]
    pub threshold_div: Option<f32>,

    /// Base speed (units/frame)
    #[arg(long)]
    pub speed: Option<f32>,

    /// React to the pointer (`--interactive=false` to switch a preset's off)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub interactive: Option<bool>,

    /// Pointer influence radius
    #[arg(long)]
    pub mouse_radius: Option<f32>,

    /// Pointer push strength
    #[arg(long)]
    pub mouse_strength: Option<f32>,

    /// Per-frame velocity damping, in (0, 1)
    #[arg(long)]
    pub friction: Option<f32>,

    /// Explicit speed cap (default: 1.2 x speed)
    #[arg(long)]
    pub max_speed: Option<f32>,

    /// Per-frame velocity jitter
    #[arg(long)]
    pub noise: Option<f32>,

    /// Minimum speed as a fraction of speed
    #[arg(long)]
    pub min_speed_factor: Option<f32>,

    /// Glow blur radius
    #[arg(long)]
    pub glow_blur: Option<f32>,

    /// Glow color (CSS rgb/rgba or #hex)
    #[arg(long, value_name = "COLOR")]
    pub glow_color: Option<Rgba>,

    /// Glow the links too
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub glow_lines: Option<bool>,
}

impl FieldOverrides {
    /// Apply every given override to `base`.
    pub fn apply(&self, mut base: FieldConfig) -> FieldConfig {
        macro_rules! take {
            ($($field:ident),*) => {
                $( if let Some(v) = self.$field { base.$field = v; } )*
            };
        }
        take!(
            divisor, dot_alpha, point_radius, link_alpha, threshold_div, speed,
            mouse_radius, mouse_strength, friction, noise, min_speed_factor,
            glow_blur, glow_color, interactive, glow_lines
        );
        if self.max_speed.is_some() {
            base.max_speed = self.max_speed;
        }
        base
    }
}

/// Host-side settings: the page's job, not the field's.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub width: usize,
    pub height: usize,
    pub dpr: f32,
    pub opacity: f32,
    pub background: Rgba,
}

impl Args {
    /// The validated field config: preset, then overrides.
    pub fn field_config(&self) -> Result<FieldConfig, ConfigError> {
        let config = self.field.apply(self.preset.field_config());
        config.validate()?;
        Ok(config)
    }

    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            width: self.width,
            height: self.height,
            dpr: self.dpr,
            opacity: self.opacity.unwrap_or_else(|| self.preset.layer_opacity()).clamp(0.0, 1.0),
            background: self.background.unwrap_or_else(|| self.preset.background()),
        }
    }
}
