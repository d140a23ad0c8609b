use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct FlagCell {
    value: Cell<bool>,
    revision: Cell<u64>,
}

/// Boolean owned by the host and observed by an overlay.
///
/// Clones share the same cell. Every change bumps a revision counter so an
/// overlay holding a [`ModeWatch`] can tell that the flag moved since it last
/// looked, even if it was toggled off and on again in between.
#[derive(Debug, Clone, Default)]
pub struct ModeFlag {
    cell: Rc<FlagCell>,
}

impl ModeFlag {
    pub fn new(value: bool) -> Self {
        let flag = Self::default();
        flag.cell.value.set(value);
        flag
    }

    pub fn get(&self) -> bool {
        self.cell.value.get()
    }

    /// Returns `true` when the stored value changed.
    pub fn set(&self, value: bool) -> bool {
        if self.cell.value.get() == value {
            return false;
        }
        self.cell.value.set(value);
        self.cell.revision.set(self.cell.revision.get().wrapping_add(1));
        true
    }

    pub fn toggle(&self) -> bool {
        let next = !self.get();
        self.set(next);
        next
    }

    pub fn revision(&self) -> u64 {
        self.cell.revision.get()
    }

    pub fn watch(&self) -> ModeWatch {
        ModeWatch {
            seen_revision: self.revision(),
            seen_value: self.get(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    Unchanged,
    TurnedOn,
    TurnedOff,
    /// Toggled at least twice since the last check and ended where it was.
    Cycled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeWatch {
    seen_revision: u64,
    seen_value: bool,
}

impl ModeWatch {
    pub fn poll(&mut self, flag: &ModeFlag) -> ModeChange {
        let revision = flag.revision();
        if revision == self.seen_revision {
            return ModeChange::Unchanged;
        }
        let value = flag.get();
        let change = match (self.seen_value, value) {
            (false, true) => ModeChange::TurnedOn,
            (true, false) => ModeChange::TurnedOff,
            _ => ModeChange::Cycled,
        };
        self.seen_revision = revision;
        self.seen_value = value;
        change
    }
}
