//! Resource lifecycle guard.
//!
//! Handles returned by engine "open" calls are owned by the engine and
//! must be released back to it exactly once. Freeing them from arbitrary
//! cleanup order (or more than once) corrupts engine state, so every
//! handle is wrapped in a guard that tracks an explicit lifecycle state
//! and refuses operations after disposal.
//!
//! State machine:
//!
//! ```text
//! Unallocated --mark_allocated--> Allocated --release--> Released
//!                                     |                      |
//!                                     +-------dispose--------+--> Disposed
//! ```
//!
//! Not safe for concurrent use from multiple threads without external
//! synchronization.

use crate::error::{InteropError, InteropResult};

/// Lifecycle state of a guarded handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// No handle has been acquired yet.
    Unallocated,
    /// A handle is held and live.
    Allocated,
    /// The handle was released back to the engine.
    Released,
    /// The guard is finished; all further operations fail.
    Disposed,
}

/// Guard owning an engine handle and its release action.
pub struct ResourceGuard<H> {
    label: &'static str,
    state: ResourceState,
    slot: Option<(H, Box<dyn FnOnce(H)>)>,
}

impl<H> ResourceGuard<H> {
    /// Creates an unallocated guard. `label` names the resource in
    /// errors and logs.
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        ResourceGuard {
            label,
            state: ResourceState::Unallocated,
            slot: None,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ResourceState {
        self.state
    }

    /// Stores a freshly acquired handle and the action that releases it.
    ///
    /// Call exactly once, immediately after a successful engine
    /// acquisition. Calling twice is a programming error and panics;
    /// calling after [`dispose`](Self::dispose) fails with
    /// [`InteropError::UseAfterDispose`].
    pub fn mark_allocated(
        &mut self,
        handle: H,
        release: impl FnOnce(H) + 'static,
    ) -> InteropResult<()> {
        self.ensure_not_disposed()?;
        assert!(
            self.state == ResourceState::Unallocated,
            "{} allocated twice",
            self.label
        );
        self.slot = Some((handle, Box::new(release)));
        self.state = ResourceState::Allocated;
        Ok(())
    }

    /// Borrows the live handle.
    ///
    /// Fails with [`InteropError::UseAfterDispose`] whenever the guard no
    /// longer (or does not yet) own a live handle.
    pub fn handle(&self) -> InteropResult<&H> {
        match (&self.state, &self.slot) {
            (ResourceState::Allocated, Some((handle, _))) => Ok(handle),
            _ => Err(InteropError::disposed(self.label)),
        }
    }

    /// Releases the handle back to the engine.
    ///
    /// Invokes the stored release action exactly once over the guard's
    /// lifetime. A guard that never allocated, or already released, is a
    /// no-op returning `Ok(false)`. After disposal this fails with
    /// [`InteropError::UseAfterDispose`].
    pub fn release(&mut self) -> InteropResult<bool> {
        self.ensure_not_disposed()?;
        Ok(self.release_if_allocated())
    }

    /// Finishes the guard, releasing the handle first when still live.
    ///
    /// Safe to call any number of times; at most one underlying release
    /// happens in total.
    pub fn dispose(&mut self) {
        if self.state == ResourceState::Disposed {
            return;
        }
        self.release_if_allocated();
        self.state = ResourceState::Disposed;
    }

    fn release_if_allocated(&mut self) -> bool {
        if self.state != ResourceState::Allocated {
            return false;
        }
        if let Some((handle, release)) = self.slot.take() {
            release(handle);
        }
        self.state = ResourceState::Released;
        true
    }

    fn ensure_not_disposed(&self) -> InteropResult<()> {
        if self.state == ResourceState::Disposed {
            return Err(InteropError::disposed(self.label));
        }
        Ok(())
    }
}

impl<H> Drop for ResourceGuard<H> {
    fn drop(&mut self) {
        if self.state == ResourceState::Allocated {
            tracing::warn!(
                resource = self.label,
                "guard dropped while holding a live handle; releasing"
            );
        }
        self.dispose();
    }
}

impl<H> std::fmt::Debug for ResourceGuard<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceGuard")
            .field("label", &self.label)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_guard(releases: &Rc<Cell<u32>>) -> ResourceGuard<u32> {
        let mut guard = ResourceGuard::new("test resource");
        let releases = Rc::clone(releases);
        guard
            .mark_allocated(7, move |handle| {
                assert_eq!(handle, 7);
                releases.set(releases.get() + 1);
            })
            .unwrap();
        guard
    }

    #[test]
    fn dispose_releases_exactly_once() {
        let releases = Rc::new(Cell::new(0));
        let mut guard = counting_guard(&releases);
        guard.dispose();
        assert_eq!(releases.get(), 1);
        assert_eq!(guard.state(), ResourceState::Disposed);
    }

    #[test]
    fn double_dispose_releases_exactly_once() {
        let releases = Rc::new(Cell::new(0));
        let mut guard = counting_guard(&releases);
        guard.dispose();
        guard.dispose();
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn explicit_release_then_dispose_releases_exactly_once() {
        let releases = Rc::new(Cell::new(0));
        let mut guard = counting_guard(&releases);
        assert!(guard.release().unwrap());
        assert_eq!(guard.state(), ResourceState::Released);
        guard.dispose();
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn release_without_allocation_is_a_no_op() {
        let mut guard: ResourceGuard<u32> = ResourceGuard::new("test resource");
        assert!(!guard.release().unwrap());
        guard.dispose();
        assert_eq!(guard.state(), ResourceState::Disposed);
    }

    #[test]
    fn operations_after_dispose_fail() {
        let releases = Rc::new(Cell::new(0));
        let mut guard = counting_guard(&releases);
        guard.dispose();

        assert!(matches!(
            guard.release(),
            Err(InteropError::UseAfterDispose { .. })
        ));
        assert!(matches!(
            guard.handle(),
            Err(InteropError::UseAfterDispose { .. })
        ));
        assert!(matches!(
            guard.mark_allocated(9, |_| {}),
            Err(InteropError::UseAfterDispose { .. })
        ));
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn handle_is_borrowable_while_allocated() {
        let releases = Rc::new(Cell::new(0));
        let mut guard = counting_guard(&releases);
        assert_eq!(*guard.handle().unwrap(), 7);
        guard.release().unwrap();
        assert!(guard.handle().is_err());
    }

    #[test]
    fn repeated_release_is_a_no_op() {
        let releases = Rc::new(Cell::new(0));
        let mut guard = counting_guard(&releases);
        assert!(guard.release().unwrap());
        assert!(!guard.release().unwrap());
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn drop_disposes_a_live_handle() {
        let releases = Rc::new(Cell::new(0));
        {
            let _guard = counting_guard(&releases);
        }
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn drop_does_not_release_an_unopened_guard() {
        let releases = Rc::new(Cell::new(0));
        {
            let _guard: ResourceGuard<u32> = ResourceGuard::new("test resource");
        }
        assert_eq!(releases.get(), 0);
    }

    #[test]
    #[should_panic(expected = "allocated twice")]
    fn double_allocation_is_a_programming_error() {
        let mut guard = ResourceGuard::new("test resource");
        guard.mark_allocated(1u32, |_| {}).unwrap();
        let _ = guard.mark_allocated(2u32, |_| {});
    }
}
