//! Write policy: when mutations reach the disk.

/// Controls when the mapping gets written to disk.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlushPolicy {
    /// Write the whole document after every `set`/`delete` that asks for it.
    /// Safest, but most I/O.
    #[default]
    Immediate,
    /// Only write when you call `save()` yourself.
    Manual,
}

impl FlushPolicy {
    /// Whether a mutation made with `auto_persist` should write now.
    #[must_use]
    pub fn writes_on_mutation(self, auto_persist: bool) -> bool {
        auto_persist && self == FlushPolicy::Immediate
    }
}
