//! # Hook Registry
//!
//! Application callbacks run from the line interrupt.
//!
//! | Hook       | Runs                                   | Budget                      |
//! |------------|----------------------------------------|-----------------------------|
//! | vertical   | once per frame, at the first sync line | the vertical sync lines     |
//! | horizontal | once per line, before the line's work  | until the first pixel       |
//!
//! A hook that overruns its budget shifts or tears the picture; the engine
//! only counts late active lines (`ScanState::hook_overruns`). Hooks must not
//! set or clear hooks themselves.

use alloc::boxed::Box;
use spin::Mutex;

use crate::hal::interrupt_free;

/// A registered callback.
pub type Hook = Box<dyn FnMut() + Send>;

/// Single-slot storage for the vertical and horizontal blanking hooks.
pub struct HookRegistry {
    vertical: Mutex<Option<Hook>>,
    horizontal: Mutex<Option<Hook>>,
}

impl HookRegistry {
    pub const fn new() -> Self {
        Self {
            vertical: Mutex::new(None),
            horizontal: Mutex::new(None),
        }
    }

    pub fn set_vertical(&self, hook: Option<Hook>) {
        let previous = interrupt_free(|| core::mem::replace(&mut *self.vertical.lock(), hook));
        drop(previous);
    }

    pub fn set_horizontal(&self, hook: Option<Hook>) {
        let previous = interrupt_free(|| core::mem::replace(&mut *self.horizontal.lock(), hook));
        drop(previous);
    }

    pub fn clear(&self) {
        self.set_vertical(None);
        self.set_horizontal(None);
    }

    pub fn has_vertical(&self) -> bool {
        interrupt_free(|| self.vertical.lock().is_some())
    }

    pub fn has_horizontal(&self) -> bool {
        interrupt_free(|| self.horizontal.lock().is_some())
    }

    /// Interrupt context only.
    pub(crate) fn run_vertical(&self) {
        if let Some(hook) = self.vertical.lock().as_mut() {
            hook();
        }
    }

    /// Interrupt context only.
    pub(crate) fn run_horizontal(&self) {
        if let Some(hook) = self.horizontal.lock().as_mut() {
            hook();
        }
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}
