use crate::{Dispose, on_unmount, remember, scoped_effect};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Runs `effect` on the first composition and again whenever `key` changes,
/// running the previous cleanup first. The last cleanup runs on unmount.
pub fn disposable_effect<K: PartialEq + Clone + 'static>(
    key: K,
    effect: impl FnOnce() -> Dispose + 'static,
) {
    // Slot-based (like Compose). For branch-stability use `remember_with_key` variants later.
    let last_key = remember(|| RefCell::new(None::<K>));
    let cleanup_slot = remember(|| RefCell::new(None::<Dispose>));
    let installed = remember(|| Cell::new(false));

    install_unmount_cleanup(&installed, &cleanup_slot);

    // Key change: cleanup previous + run new effect
    let changed = last_key.borrow().as_ref() != Some(&key);
    if changed {
        *last_key.borrow_mut() = Some(key);
        replace_cleanup(&cleanup_slot, move || Some(effect()));
    }
}

/// Installs a single unmount disposer for a callsite's cleanup slot.
pub(crate) fn install_unmount_cleanup(
    installed: &Cell<bool>,
    cleanup_slot: &Rc<RefCell<Option<Dispose>>>,
) {
    if installed.replace(true) {
        return;
    }
    let cleanup_slot = cleanup_slot.clone();
    scoped_effect(move || {
        on_unmount(move || {
            let d = cleanup_slot.borrow_mut().take();
            if let Some(d) = d {
                d.run();
            }
        })
    });
}

/// Runs the stored cleanup, then `effect`, storing whatever cleanup it returns.
pub(crate) fn replace_cleanup(
    cleanup_slot: &RefCell<Option<Dispose>>,
    effect: impl FnOnce() -> Option<Dispose>,
) {
    let previous = cleanup_slot.borrow_mut().take();
    if let Some(d) = previous {
        d.run();
    }

    let d = effect();
    *cleanup_slot.borrow_mut() = d;
}

/// Like `disposable_effect`, but skips the first composition of the callsite:
/// `effect` only runs on later compositions where `deps` differs from the
/// previous snapshot. Its optional cleanup runs before the next invocation
/// and on unmount.
pub fn update_effect<K: PartialEq + Clone + 'static>(
    deps: K,
    effect: impl FnOnce() -> Option<Dispose> + 'static,
) {
    let last_deps = remember(|| RefCell::new(None::<K>));
    let cleanup_slot = remember(|| RefCell::new(None::<Dispose>));
    let installed = remember(|| Cell::new(false));

    install_unmount_cleanup(&installed, &cleanup_slot);

    let first = last_deps.borrow().is_none();
    let changed = !first && last_deps.borrow().as_ref() != Some(&deps);
    if first || changed {
        *last_deps.borrow_mut() = Some(deps);
    }
    if changed {
        replace_cleanup(&cleanup_slot, effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Composition;

    fn counter() -> (Rc<Cell<u32>>, Rc<Cell<u32>>) {
        (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)))
    }

    #[test]
    fn disposable_effect_reruns_on_key_change() {
        let (runs, cleanups) = counter();
        let comp = Composition::new();
        let frame = |key: u8| {
            let (runs, cleanups) = (runs.clone(), cleanups.clone());
            comp.compose(move || {
                disposable_effect(key, move || {
                    runs.set(runs.get() + 1);
                    Dispose::new(move || cleanups.set(cleanups.get() + 1))
                })
            });
        };

        frame(1);
        frame(1);
        assert_eq!((runs.get(), cleanups.get()), (1, 0));
        frame(2);
        assert_eq!((runs.get(), cleanups.get()), (2, 1));
        comp.dispose();
        assert_eq!((runs.get(), cleanups.get()), (2, 2));
    }

    #[test]
    fn update_effect_skips_mount() {
        let (runs, cleanups) = counter();
        let comp = Composition::new();
        let frame = |deps: &'static str| {
            let (runs, cleanups) = (runs.clone(), cleanups.clone());
            comp.compose(move || {
                update_effect(deps, move || {
                    runs.set(runs.get() + 1);
                    Some(Dispose::new(move || cleanups.set(cleanups.get() + 1)))
                })
            });
        };

        frame("a");
        assert_eq!(runs.get(), 0);
        frame("a");
        assert_eq!(runs.get(), 0);
        frame("b");
        assert_eq!((runs.get(), cleanups.get()), (1, 0));
        frame("c");
        assert_eq!((runs.get(), cleanups.get()), (2, 1));
        comp.dispose();
        assert_eq!((runs.get(), cleanups.get()), (2, 2));
    }

    #[test]
    fn update_effect_without_cleanup() {
        let runs = Rc::new(Cell::new(0));
        let comp = Composition::new();
        for deps in [1, 2, 2, 3] {
            let runs = runs.clone();
            comp.compose(move || update_effect(deps, move || {
                runs.set(runs.get() + 1);
                None
            }));
        }
        assert_eq!(runs.get(), 2);
        comp.dispose();
        assert_eq!(runs.get(), 2);
    }
}
