use std::io;
use std::path::PathBuf;

use super::{Reactor, Record};
use crate::actor::input::{PointerEvent, PointerTarget};
use crate::common::config::Config;
use crate::model::store::{LayoutStore, MemoryStore, StoreError};
use crate::model::window::WindowId;
use crate::sys::geometry::{Rect, Size};

pub fn viewport() -> Size { Size::new(1200.0, 800.0) }

pub fn reactor() -> Reactor { reactor_with_store(Box::new(MemoryStore::new())) }

pub fn reactor_with_store(store: Box<dyn LayoutStore>) -> Reactor {
    Reactor::new(Config::default(), viewport(), store, Record::disabled())
}

pub fn frame(reactor: &Reactor, id: WindowId) -> Rect {
    reactor.registry().get(id).map(|w| w.frame).unwrap()
}

/// Presses on `window`'s header at `(x, y)`, moves through `path` one event
/// per 60ms, and releases at the last point.
pub fn drag(reactor: &mut Reactor, window: WindowId, (x, y): (f64, f64), path: &[(f64, f64)]) {
    let mut t = 0;
    reactor.pointer(PointerEvent::down(PointerTarget::Header(window), x, y, t));
    let mut last = (x, y);
    for &(px, py) in path {
        t += 60;
        reactor.pointer(PointerEvent::moved(px, py, t));
        last = (px, py);
    }
    reactor.pointer(PointerEvent::up(last.0, last.1, t + 60));
}

/// Reads fine, refuses every write.
pub struct FailingStore;

impl LayoutStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> { Ok(None) }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Io {
            path: PathBuf::from("/quota"),
            source: io::Error::other("quota exceeded"),
        })
    }

    fn remove(&mut self, _key: &str) -> Result<(), StoreError> { Ok(()) }
}
