use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::scope::Scope;

thread_local! {
    static CURRENT: RefCell<Vec<Composition>> = const { RefCell::new(Vec::new()) };
}

#[derive(Default)]
pub struct Composer {
    pub slots: Vec<Box<dyn Any>>,
    pub cursor: usize,
    pub keyed_slots: HashMap<String, Box<dyn Any>>,
}

/// One component instance: its remembered slots plus the scope that owns its
/// cleanups. `compose` is a mount or an update; `dispose` is the unmount.
#[derive(Clone)]
pub struct Composition {
    inner: Rc<CompositionInner>,
}

struct CompositionInner {
    composer: RefCell<Composer>,
    scope: RefCell<Scope>,
    passes: Cell<u64>,
}

impl Default for Composition {
    fn default() -> Self {
        Self::new()
    }
}

impl Composition {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(CompositionInner {
                composer: RefCell::new(Composer::default()),
                scope: RefCell::new(Scope::new()),
                passes: Cell::new(0),
            }),
        }
    }

    /// Runs one composition pass. Order-based `remember` calls line up with the
    /// same calls of the previous pass.
    pub fn compose<R>(&self, f: impl FnOnce() -> R) -> R {
        let guard = ComposeGuard::begin(self);
        let scope = self.scope();
        let result = scope.run(f);
        drop(guard);
        self.inner.passes.set(self.inner.passes.get() + 1);
        result
    }

    /// Number of completed `compose` passes since creation or the last dispose.
    pub fn passes(&self) -> u64 {
        self.inner.passes.get()
    }

    pub fn scope(&self) -> Scope {
        self.inner.scope.borrow().clone()
    }

    /// Runs every cleanup registered during composition and forgets all
    /// remembered state. A later `compose` starts over as a fresh mount.
    pub fn dispose(&self) {
        let scope = std::mem::take(&mut *self.inner.scope.borrow_mut());
        scope.dispose();

        let composer = std::mem::take(&mut *self.inner.composer.borrow_mut());
        log::trace!(
            "composition: dropping {} slot(s), {} keyed slot(s)",
            composer.slots.len(),
            composer.keyed_slots.len()
        );
        drop(composer);
        self.inner.passes.set(0);
    }
}

/// Marks a composition as current for the duration of a pass.
pub struct ComposeGuard {
    _private: (),
}

impl ComposeGuard {
    pub fn begin(composition: &Composition) -> Self {
        composition.inner.composer.borrow_mut().cursor = 0;
        CURRENT.with(|c| c.borrow_mut().push(composition.clone()));
        ComposeGuard { _private: () }
    }
}

impl Drop for ComposeGuard {
    fn drop(&mut self) {
        CURRENT.with(|c| {
            c.borrow_mut().pop();
        });
    }
}

pub fn current_composition() -> Option<Composition> {
    CURRENT.with(|c| c.borrow().last().cloned())
}

/// Slot-based remember (sequential composition only)
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    let Some(composition) = current_composition() else {
        log::warn!("remember: called outside of a composition; value will not be kept");
        return Rc::new(init());
    };
    let inner = &composition.inner;

    let cursor = {
        let mut c = inner.composer.borrow_mut();
        let cursor = c.cursor;
        c.cursor += 1;

        if let Some(slot) = c.slots.get(cursor) {
            if let Some(rc) = slot.downcast_ref::<Rc<T>>() {
                return rc.clone();
            }
            log::warn!(
                "remember: slot {} type changed; replacing. \
                 If this is due to conditional composition, prefer remember_with_key.",
                cursor
            );
        }
        cursor
    };

    // `init` may itself touch the composition, so no borrow is held here.
    let rc: Rc<T> = Rc::new(init());
    let mut c = inner.composer.borrow_mut();
    if cursor < c.slots.len() {
        let old = std::mem::replace(&mut c.slots[cursor], Box::new(rc.clone()));
        drop(c);
        drop(old);
    } else {
        c.slots.push(Box::new(rc.clone()));
    }
    rc
}

/// Key-based remember
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    let key = key.into();
    let Some(composition) = current_composition() else {
        log::warn!("remember_with_key: '{key}' used outside of a composition; value will not be kept");
        return Rc::new(init());
    };
    let inner = &composition.inner;

    if let Some(existing) = inner.composer.borrow().keyed_slots.get(&key) {
        if let Some(rc) = existing.downcast_ref::<Rc<T>>() {
            return rc.clone();
        }
        log::warn!(
            "remember_with_key: key '{}' reused with a different type; replacing.",
            key
        );
    }

    let rc: Rc<T> = Rc::new(init());
    let old = inner
        .composer
        .borrow_mut()
        .keyed_slots
        .insert(key, Box::new(rc.clone()));
    drop(old);
    rc
}

pub fn remember_state<T: 'static>(init: impl FnOnce() -> T) -> Rc<RefCell<T>> {
    remember(|| RefCell::new(init()))
}

pub fn remember_state_with_key<T: 'static>(
    key: impl Into<String>,
    init: impl FnOnce() -> T,
) -> Rc<RefCell<T>> {
    remember_with_key(key, || RefCell::new(init()))
}
