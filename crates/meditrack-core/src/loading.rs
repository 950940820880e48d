//! `loading` flag shared by a container's actions.
//!
//! Each action holds a `LoadingGuard` for its whole duration; the flag reads true
//! while any guard is alive and is released on every exit path, including `?`.

use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct LoadingFlag {
    active: AtomicUsize,
}

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.active.load(Ordering::Acquire) > 0
    }

    pub fn begin(&self) -> LoadingGuard<'_> {
        self.active.fetch_add(1, Ordering::AcqRel);
        LoadingGuard { flag: self }
    }
}

/// Marks one in-progress action; dropping it releases the mark.
pub struct LoadingGuard<'a> {
    flag: &'a LoadingFlag,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.active.fetch_sub(1, Ordering::AcqRel);
    }
}
