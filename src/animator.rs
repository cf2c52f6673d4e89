//! Mounting a particle field on a host.
//!
//! An [`Animator`] wires one [`ParticleField`] and its drawing surface into a
//! [`Host`]: a repeating frame callback steps the field, a resize listener
//! re-initializes it, and (when interactive) pointer listeners feed it the
//! cursor. The field and surface sit behind one `Rc<RefCell<..>>` that every
//! callback shares; nothing here is meant to cross threads.
//!
//! Lifecycle is one-way: `Running` after `mount`, `Stopped` after `teardown`.
//! Mount a new animator to start again.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use log::{debug, info, warn};
use rand::rngs::StdRng;

use crate::config::FieldConfig;
use crate::field::ParticleField;
use crate::host::{Event, EventKind, FrameHandle, Host, ListenerId};
use crate::surface::Surface;
use crate::types::FrameStats;

/// Where the surface sits in the host and how big it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mount {
    pub origin: Vec2, // top-left corner in client coordinates
    pub width: f32,   // logical units
    pub height: f32,  // logical units
    pub dpr: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    Running,
    Stopped,
}

struct Shared<S> {
    field: ParticleField,
    surface: S,
    origin: Vec2,
    frames: u64,
    last: FrameStats,
}

/// Handle to a mounted field.
///
/// The host owns the callbacks, and the callbacks own the field. Dropping an
/// animator without calling [`Animator::teardown`] therefore leaves the field
/// stepping on every tick for as long as the host lives; a warning is logged
/// when that happens.
pub struct Animator<S> {
    shared: Option<Rc<RefCell<Shared<S>>>>,
    listeners: Vec<ListenerId>,
    frame: Option<FrameHandle>,
    state: AnimatorState,
}

impl<S: Surface + 'static> Animator<S> {
    /// Size the field, start the frame loop, and attach listeners.
    ///
    /// With no surface there is nothing to draw on; the animator comes back
    /// already stopped and the host is left untouched.
    pub fn mount(host: &mut Host, config: FieldConfig, surface: Option<S>, mount: Mount, rng: StdRng) -> Self {
        let Some(mut surface) = surface else {
            warn!("no drawing surface available; particle field not started");
            return Self { shared: None, listeners: Vec::new(), frame: None, state: AnimatorState::Stopped };
        };

        let mut field = ParticleField::new(config, rng);
        let interactive = field.config().interactive;
        field.init(&mut surface, mount.width, mount.height, mount.dpr);
        let (pw, ph) = surface.pixel_size();
        info!(
            "particle field mounted: {} particles on {}x{} logical ({}x{} px), interactive={}",
            field.particles().len(),
            mount.width,
            mount.height,
            pw,
            ph,
            interactive
        );

        let shared = Rc::new(RefCell::new(Shared {
            field,
            surface,
            origin: mount.origin,
            frames: 0,
            last: FrameStats::default(),
        }));

        let frame = {
            let shared = Rc::clone(&shared);
            host.request_frames(move || {
                let s = &mut *shared.borrow_mut();
                s.last = s.field.step(&mut s.surface);
                s.frames += 1;
            })
        };

        let mut listeners = Vec::with_capacity(3);
        {
            let shared = Rc::clone(&shared);
            listeners.push(host.add_listener(EventKind::Resize, move |event| {
                if let Event::Resize { width, height } = *event {
                    let s = &mut *shared.borrow_mut();
                    let dpr = s.field.dpr();
                    s.field.init(&mut s.surface, width, height, dpr);
                    info!("resized to {}x{}: {} particles", width, height, s.field.particles().len());
                }
            }));
        }
        if interactive {
            let shared_move = Rc::clone(&shared);
            listeners.push(host.add_listener(EventKind::PointerMove, move |event| {
                if let Event::PointerMove { pos } = *event {
                    let s = &mut *shared_move.borrow_mut();
                    let local = pos - s.origin;
                    s.field.pointer_moved(local);
                }
            }));
            let shared_leave = Rc::clone(&shared);
            listeners.push(host.add_listener(EventKind::PointerLeave, move |_| {
                shared_leave.borrow_mut().field.pointer_left();
            }));
        }
        debug!("attached {} listeners and 1 frame callback", listeners.len());

        Self { shared: Some(shared), listeners, frame: Some(frame), state: AnimatorState::Running }
    }

    /// Stop the frame loop and detach every listener. Safe to call again.
    pub fn teardown(&mut self, host: &mut Host) {
        if let Some(handle) = self.frame.take() {
            host.cancel_frames(handle);
        }
        let detached = self.listeners.len();
        for id in self.listeners.drain(..) {
            host.remove_listener(id);
        }
        if self.state == AnimatorState::Running {
            debug!(
                "particle field torn down ({detached} listeners detached; host now has {} listeners, {} frame callbacks)",
                host.listener_count(),
                host.frame_callback_count()
            );
        }
        self.state = AnimatorState::Stopped;
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    /// Read the surface (e.g. to present it). `None` when mounted without one.
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> Option<R> {
        self.shared.as_ref().map(|s| f(&s.borrow().surface))
    }

    pub fn with_field<R>(&self, f: impl FnOnce(&ParticleField) -> R) -> Option<R> {
        self.shared.as_ref().map(|s| f(&s.borrow().field))
    }

    /// Stats of the most recent frame.
    pub fn last_stats(&self) -> Option<FrameStats> {
        self.shared.as_ref().map(|s| s.borrow().last)
    }

    /// Frames stepped since mount.
    pub fn frames(&self) -> u64 {
        self.shared.as_ref().map_or(0, |s| s.borrow().frames)
    }
}

impl<S> Drop for Animator<S> {
    fn drop(&mut self) {
        if self.state == AnimatorState::Running {
            warn!(
                "animator dropped while running; {} listeners and its frame callback stay on the host",
                self.listeners.len()
            );
        }
    }
}
