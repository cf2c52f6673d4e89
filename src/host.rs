// The environment an animator is mounted on.
// It plays the part a browser window plays for a canvas: it delivers resize
// and pointer events to whoever listens, and calls frame callbacks once per
// display refresh. main.rs feeds it from the native window; tests feed it by hand.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Viewport changed size (logical units).
    Resize { width: f32, height: f32 },
    /// Pointer moved; client coordinates, not surface-local.
    PointerMove { pos: Vec2 },
    /// Pointer left the viewport.
    PointerLeave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Resize,
    PointerMove,
    PointerLeave,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Resize { .. } => EventKind::Resize,
            Event::PointerMove { .. } => EventKind::PointerMove,
            Event::PointerLeave => EventKind::PointerLeave,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

type Handler = Box<dyn FnMut(&Event)>;
type FrameCallback = Box<dyn FnMut()>;

/// Single-threaded event + frame dispatcher.
#[derive(Default)]
pub struct Host {
    next_id: u64,
    listeners: Vec<(ListenerId, EventKind, Handler)>,
    frames: Vec<(FrameHandle, FrameCallback)>,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Call `handler` for every future event of `kind`.
    pub fn add_listener(&mut self, kind: EventKind, handler: impl FnMut(&Event) + 'static) -> ListenerId {
        let id = ListenerId(self.fresh_id());
        self.listeners.push((id, kind, Box::new(handler)));
        id
    }

    /// Returns false if `id` was not registered (already removed).
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Call `callback` once per `tick` until cancelled.
    pub fn request_frames(&mut self, callback: impl FnMut() + 'static) -> FrameHandle {
        let handle = FrameHandle(self.fresh_id());
        self.frames.push((handle, Box::new(callback)));
        handle
    }

    /// Returns false if `handle` was not scheduled.
    pub fn cancel_frames(&mut self, handle: FrameHandle) -> bool {
        let before = self.frames.len();
        self.frames.retain(|(h, _)| *h != handle);
        self.frames.len() != before
    }

    /// Deliver `event` to its listeners in registration order.
    pub fn dispatch(&mut self, event: Event) {
        let kind = event.kind();
        for (_, k, handler) in self.listeners.iter_mut() {
            if *k == kind {
                handler(&event);
            }
        }
    }

    /// One display refresh: run every scheduled frame callback once.
    pub fn tick(&mut self) {
        for (_, callback) in self.frames.iter_mut() {
            callback();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn frame_callback_count(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn dispatch_reaches_matching_listeners_in_order() {
        let mut host = Host::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&seen);
        host.add_listener(EventKind::Resize, move |e| log.borrow_mut().push(("a", *e)));
        let log = Rc::clone(&seen);
        host.add_listener(EventKind::PointerLeave, move |e| log.borrow_mut().push(("b", *e)));
        let log = Rc::clone(&seen);
        host.add_listener(EventKind::Resize, move |e| log.borrow_mut().push(("c", *e)));

        let resize = Event::Resize { width: 10.0, height: 20.0 };
        host.dispatch(resize);
        assert_eq!(*seen.borrow(), vec![("a", resize), ("c", resize)]);
    }

    #[test]
    fn removed_listener_stops_hearing() {
        let mut host = Host::new();
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        let id = host.add_listener(EventKind::PointerLeave, move |_| *h.borrow_mut() += 1);

        host.dispatch(Event::PointerLeave);
        assert!(host.remove_listener(id));
        assert!(!host.remove_listener(id));
        host.dispatch(Event::PointerLeave);

        assert_eq!(*hits.borrow(), 1);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn frames_repeat_until_cancelled() {
        let mut host = Host::new();
        let frames = Rc::new(RefCell::new(0));
        let f = Rc::clone(&frames);
        let handle = host.request_frames(move || *f.borrow_mut() += 1);

        host.tick();
        host.tick();
        assert!(host.cancel_frames(handle));
        host.tick();

        assert_eq!(*frames.borrow(), 2);
        assert_eq!(host.frame_callback_count(), 0);
        assert!(!host.cancel_frames(handle));
    }
}
