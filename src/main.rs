// What you SEE now:
// • A dark window filled with a slowly drifting network of glowing dots.
// • Dots closer than a threshold are joined by faint lines that fade with distance.
// • Default --preset page: a sparse, dim backdrop whose dots flee the cursor.
// • --preset hero: denser and brighter; --interactive=false keeps it still under the cursor.
// • Resize the window: the network is rebuilt to fit. ESC quits.
// • --snapshot out.png: no window, just render --frames frames and save the last one.

mod animator;
mod canvas;
mod cli;
mod config;
mod draw;
mod error;
mod field;
mod gamma;
mod host;
mod snapshot;
mod surface;
mod types;

use std::time::{Duration, Instant};

use clap::Parser;
use glam::Vec2;
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use animator::{Animator, Mount};
use canvas::Canvas;
use cli::{AppConfig, Args};
use config::FieldConfig;
use draw::Drawer;
use error::Error;
use field::clamp_dpr;
use host::{Event, Host};
use types::FrameBuffer;

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let field_config = args.field_config()?;
    let app = args.app_config();
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match &args.snapshot {
        Some(path) => {
            let frame = render_headless(field_config, &app, rng, args.frames);
            snapshot::save(&frame, path)?;
            Ok(())
        }
        None => run_window(field_config, &app, rng),
    }
}

/// Mount the field on a host with no window, tick it `frames` times, and
/// return the composited last frame.
fn render_headless(config: FieldConfig, app: &AppConfig, rng: StdRng, frames: u32) -> FrameBuffer {
    let dpr = clamp_dpr(app.dpr);
    let (w, h) = (app.width as f32 / dpr, app.height as f32 / dpr);
    let interactive = config.interactive;

    let mut host = Host::new();
    let mut animator = Animator::mount(
        &mut host,
        config,
        Some(Canvas::new(0, 0)),
        Mount { origin: Vec2::ZERO, width: w, height: h, dpr },
        rng,
    );

    // Park a virtual cursor mid-screen so interactive looks show their effect.
    if interactive {
        host.dispatch(Event::PointerMove { pos: Vec2::new(w * 0.5, h * 0.5) });
    }
    for _ in 0..frames {
        host.tick();
    }
    if let (Some(stats), Some((fw, fh))) = (animator.last_stats(), animator.with_field(|f| f.size())) {
        info!(
            "rendered {} frames on {}x{}: {} particles, {} links",
            animator.frames(),
            fw,
            fh,
            stats.particles,
            stats.links
        );
    }

    let frame = animator
        .with_surface(|c| c.composite(app.background, app.opacity))
        .unwrap_or_else(|| FrameBuffer::new(0, 0));
    animator.teardown(&mut host);
    debug!("headless animator {:?}", animator.state());
    frame
}

fn run_window(config: FieldConfig, app: &AppConfig, rng: StdRng) -> Result<(), Error> {
    /* --- Window + host setup ---
       Visual: window opens, network starts drifting immediately. */
    let mut drawer = Drawer::new("Network Field", app.width, app.height)?;
    let dpr = clamp_dpr(app.dpr);
    let mut last_size = drawer.size();
    let logical = |(w, h): (usize, usize)| (w as f32 / dpr, h as f32 / dpr);
    let (w, h) = logical(last_size);

    let mut host = Host::new();
    let mut animator = Animator::mount(
        &mut host,
        config,
        Some(Canvas::new(0, 0)),
        Mount { origin: Vec2::ZERO, width: w, height: h, dpr },
        rng,
    );

    /* --- Reusable screen buffer ---
       Visual: this is the image you actually see each frame. */
    let mut screen = FrameBuffer::new(0, 0);
    let mut last_pointer: Option<(f32, f32)> = None;

    /* --- FPS ---
       Visual: none; logged once per second. */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Window resized? The field rebuilds for the new size. */
        let size = drawer.size();
        if size != last_size {
            last_size = size;
            let (width, height) = logical(size);
            host.dispatch(Event::Resize { width, height });
        }

        /* 2) Pointer: move while over the window, leave once it exits. */
        let pointer = drawer.mouse_pos();
        match pointer {
            Some((x, y)) if pointer != last_pointer => {
                host.dispatch(Event::PointerMove { pos: Vec2::new(x, y) / dpr });
            }
            None if last_pointer.is_some() => host.dispatch(Event::PointerLeave),
            _ => {}
        }
        last_pointer = pointer;

        /* 3) One display refresh: step + draw the field. */
        host.tick();

        /* 4) Flatten over the page background and present. */
        animator.with_surface(|c| c.composite_into(&mut screen, app.background, app.opacity));
        if screen.width > 0 && screen.height > 0 {
            drawer.present(&screen)?;
        } else {
            drawer.idle(); // minimized: keep pumping window events
        }

        /* 5) FPS + network size, once per second */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            if let Some(stats) = animator.last_stats() {
                info!("FPS: {:.1} | {} particles, {} links", fps, stats.particles, stats.links);
            }
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    animator.teardown(&mut host);
    info!("window closed; particle field {:?}", animator.state());
    Ok(())
}
