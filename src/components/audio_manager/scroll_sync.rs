// Keeps the verse that is being recited in view.
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::trace;

/// Something on the render surface that can be scrolled to the middle of the viewport.
pub trait ScrollTarget {
    fn scroll_into_center(&self);
}

/// Verse id -> mounted element. Entries appear as verses mount and vanish on reset.
///
/// Registration only needs a shared reference, so mounting a verse never
/// counts as a change to the playback state.
pub struct ScrollSynchronizer<T: ScrollTarget> {
    targets: RefCell<HashMap<u32, T>>,
}

impl<T: ScrollTarget> Default for ScrollSynchronizer<T> {
    fn default() -> Self {
        Self {
            targets: RefCell::new(HashMap::new()),
        }
    }
}

impl<T: ScrollTarget> ScrollSynchronizer<T> {
    pub fn register(&self, verse_id: u32, target: T) {
        self.targets.borrow_mut().insert(verse_id, target);
    }

    pub fn clear(&self) {
        self.targets.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.targets.borrow().len()
    }

    /// Returns whether a target was found. A missing target is not an error:
    /// the verse may simply not be mounted yet.
    pub fn bring_into_view(&self, verse_id: u32) -> bool {
        match self.targets.borrow().get(&verse_id) {
            Some(target) => {
                target.scroll_into_center();
                true
            }
            None => {
                trace!(verse_id, "no scroll target registered");
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::ScrollTarget;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts how often it was asked to scroll.
    #[derive(Clone, Default)]
    pub struct CountingTarget {
        pub scrolls: Rc<Cell<u32>>,
    }

    impl CountingTarget {
        pub fn count(&self) -> u32 {
            self.scrolls.get()
        }
    }

    impl ScrollTarget for CountingTarget {
        fn scroll_into_center(&self) {
            self.scrolls.set(self.scrolls.get() + 1);
        }
    }
}
