//! Process-wide design state and scoped emulation.
//!
//! # Lifecycle
//!
//! ```text
//! DesignState::emulate(area) ──► Emulation (lock held, area switched)
//!                                    │
//!                                    ├── set_theme(theme)
//!                                    ├── context()  ──► passed to materializers
//!                                    │
//!                                    └── Drop ──► previous context restored, lock released
//! ```
//!
//! The lock is held for the whole emulated block, so concurrent requests never
//! observe an emulated context and never enter the block at the same time.
//! Re-entering `emulate` or calling `current` on the same thread while an
//! `Emulation` is alive deadlocks; code inside the block must use `context()`.

use super::{Area, RenderContext, Theme};
use crate::log;
use parking_lot::{Mutex, MutexGuard};
use std::mem;

/// The active rendering context shared by all requests of a process.
#[derive(Debug, Default)]
pub struct DesignState {
    current: Mutex<RenderContext>,
}

impl DesignState {
    pub fn new(context: RenderContext) -> Self {
        Self {
            current: Mutex::new(context),
        }
    }

    /// Copy of the active context. Blocks while an emulation is running.
    pub fn current(&self) -> RenderContext {
        self.current.lock().clone()
    }

    /// Copy of the active context, or `None` if an emulation holds it.
    pub fn try_current(&self) -> Option<RenderContext> {
        self.current.try_lock().map(|context| context.clone())
    }

    /// Replace the active context outside of any emulation.
    pub fn set(&self, context: RenderContext) {
        *self.current.lock() = context;
    }

    /// Switch to `area` until the returned guard is dropped.
    pub fn emulate(&self, area: Area) -> Emulation<'_> {
        let mut guard = self.current.lock();
        let previous = guard.clone();
        guard.area = area;
        log!("design"; "emulating {} area (was {})", area, previous.area);
        Emulation { guard, previous }
    }
}

/// Scoped emulation of a rendering context.
///
/// Restores the context that was active before [`DesignState::emulate`] when
/// dropped, including during unwinding.
#[must_use = "the previous context is restored as soon as the emulation is dropped"]
pub struct Emulation<'a> {
    guard: MutexGuard<'a, RenderContext>,
    previous: RenderContext,
}

impl Emulation<'_> {
    /// Install `theme` as the design of the emulated area.
    pub fn set_theme(&mut self, theme: Theme) {
        log!("design"; "installing theme {} for {}", theme.code, self.guard.area);
        self.guard.theme = Some(theme);
    }

    /// The emulated context.
    pub fn context(&self) -> &RenderContext {
        &self.guard
    }
}

impl Drop for Emulation<'_> {
    fn drop(&mut self) {
        *self.guard = mem::take(&mut self.previous);
        log!("design"; "restored {} area", self.guard.area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    fn graphql_state() -> DesignState {
        DesignState::new(RenderContext::new(Area::Graphql))
    }

    #[test]
    fn test_emulation_switches_area_and_theme() {
        let state = graphql_state();
        let mut emulation = state.emulate(Area::Frontend);
        emulation.set_theme(Theme::new("3", "Magento/luma"));

        let context = emulation.context();
        assert_eq!(context.area, Area::Frontend);
        assert_eq!(context.theme.as_ref().unwrap().code, "Magento/luma");
    }

    #[test]
    fn test_drop_restores_previous_context() {
        let state = graphql_state();
        let before = state.current();

        {
            let mut emulation = state.emulate(Area::Frontend);
            emulation.set_theme(Theme::new("3", "Magento/luma"));
        }

        assert_eq!(state.current(), before);
    }

    #[test]
    fn test_restores_after_early_error_return() {
        fn run(state: &DesignState) -> Result<(), &'static str> {
            let mut emulation = state.emulate(Area::Frontend);
            emulation.set_theme(Theme::new("3", "Magento/luma"));
            Err("filter failed")
        }

        let state = graphql_state();
        let before = state.current();
        assert!(run(&state).is_err());
        assert_eq!(state.current(), before);
    }

    #[test]
    fn test_restores_after_panic() {
        let state = graphql_state();
        let before = state.current();

        let result = catch_unwind(AssertUnwindSafe(|| {
            let mut emulation = state.emulate(Area::Frontend);
            emulation.set_theme(Theme::new("3", "Magento/luma"));
            panic!("renderer crashed");
        }));

        assert!(result.is_err());
        assert_eq!(state.current(), before);
    }

    #[test]
    fn test_context_is_locked_during_emulation() {
        let state = graphql_state();

        let emulation = state.emulate(Area::Frontend);
        assert!(state.try_current().is_none());
        drop(emulation);

        assert_eq!(state.try_current(), Some(RenderContext::new(Area::Graphql)));
    }

    #[test]
    fn test_existing_theme_is_restored() {
        let original = RenderContext::new(Area::Adminhtml).with_theme(Theme::new("1", "Magento/backend"));
        let state = DesignState::new(original.clone());

        {
            let mut emulation = state.emulate(Area::Frontend);
            emulation.set_theme(Theme::new("3", "Magento/luma"));
        }

        assert_eq!(state.current(), original);
    }
}
