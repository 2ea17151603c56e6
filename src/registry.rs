use core::fmt::Write;

use heapless::{String, Vec};

use crate::{DEFAULT_NAME_CAPACITY, DEFAULT_TABLE_CAPACITY, Error, NEWLINE};

/// A zero-argument action bound to a command name.
///
/// Implemented for every `FnMut()`, so plain `fn` items, closures and
/// `&mut dyn FnMut()` trait objects can all be registered.
pub trait Handler {
    fn call(&mut self);
}

impl<F: FnMut()> Handler for F {
    fn call(&mut self) {
        self()
    }
}

/// One live slot of the command table. Never changes once registered.
pub struct CommandEntry<H, const L: usize> {
    name: String<L>,
    handler: H,
}

impl<H, const L: usize> CommandEntry<H, L> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}

/// Append-only table of up to `M` commands with names of at most `L` bytes.
///
/// Entries fill slots `0..len()` with no gaps and are kept for the lifetime
/// of the registry; there is no way to remove or replace one.
pub struct CommandRegistry<
    H,
    const M: usize = { DEFAULT_TABLE_CAPACITY },
    const L: usize = { DEFAULT_NAME_CAPACITY },
> {
    entries: Vec<CommandEntry<H, L>, M>,
}

impl<H: Handler, const M: usize, const L: usize> CommandRegistry<H, M, L> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add `name` to the next free slot.
    ///
    /// Fails without touching the table if the name is empty, longer than
    /// `L`, already registered, or if every slot is taken.
    pub fn register(&mut self, name: &str, handler: H) -> Result<(), Error> {
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        if self.position(name).is_some() {
            return Err(Error::DuplicateName);
        }
        if self.entries.is_full() {
            return Err(Error::TableFull);
        }

        let mut owned = String::new();
        owned.push_str(name).map_err(|_| Error::NameTooLong)?;

        self.entries
            .push(CommandEntry {
                name: owned,
                handler,
            })
            .map_err(|_| Error::TableFull)?;
        debug!("registered command {} in slot {}", name, self.entries.len() - 1);
        Ok(())
    }

    /// Slot index of the command named exactly `name`.
    pub fn position<K: AsRef<[u8]> + ?Sized>(&self, name: &K) -> Option<usize> {
        let name = name.as_ref();
        self.entries
            .iter()
            .position(|entry| entry.name.as_bytes() == name)
    }

    /// Handler of the command named exactly `name`. No prefix matching, no
    /// case folding.
    pub fn lookup<K: AsRef<[u8]> + ?Sized>(&self, name: &K) -> Option<&H> {
        self.position(name).map(|ndx| &self.entries[ndx].handler)
    }

    /// Run the handler in slot `ndx`. Returns false for an empty slot.
    pub fn call(&mut self, ndx: usize) -> bool {
        match self.entries.get_mut(ndx) {
            Some(entry) => {
                entry.handler.call();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, ndx: usize) -> Option<&CommandEntry<H, L>> {
        self.entries.get(ndx)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(CommandEntry::name)
    }

    /// Write every registered name on its own line.
    pub fn list<W: Write + ?Sized>(&self, out: &mut W) -> core::fmt::Result {
        for name in self.names() {
            out.write_str(name)?;
            out.write_str(NEWLINE)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.is_full()
    }

    pub const fn capacity(&self) -> usize {
        M
    }
}

impl<H: Handler, const M: usize, const L: usize> Default for CommandRegistry<H, M, L> {
    fn default() -> Self {
        Self::new()
    }
}
