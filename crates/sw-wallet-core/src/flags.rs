use std::cell::Cell;

/// Persistence for the one flag that survives a page reload.
pub trait FlagStore {
    fn manually_disconnected(&self) -> bool;
    fn set_manually_disconnected(&self, value: bool);
}

#[derive(Debug, Default)]
pub struct InMemoryFlagStore {
    manually_disconnected: Cell<bool>,
}

impl InMemoryFlagStore {
    pub fn new(manually_disconnected: bool) -> Self {
        Self {
            manually_disconnected: Cell::new(manually_disconnected),
        }
    }
}

impl FlagStore for InMemoryFlagStore {
    fn manually_disconnected(&self) -> bool {
        self.manually_disconnected.get()
    }

    fn set_manually_disconnected(&self, value: bool) {
        self.manually_disconnected.set(value);
    }
}

impl<T: FlagStore + ?Sized> FlagStore for std::rc::Rc<T> {
    fn manually_disconnected(&self) -> bool {
        (**self).manually_disconnected()
    }

    fn set_manually_disconnected(&self, value: bool) {
        (**self).set_manually_disconnected(value)
    }
}
