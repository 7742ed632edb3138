//! Scoped pinning arena.
//!
//! The engine reads variable-length payloads through raw addresses that
//! must stay valid for the whole call. The arena owns a moved-in copy of
//! every payload, so each address it hands out is stable and its referent
//! stays alive until the arena is closed, no matter what the caller does
//! with its own copy.
//!
//! A null or absent value yields the designated null address without
//! allocating a pin. Closing releases every pin together; `close` is
//! idempotent and also runs on drop, including on error paths.
//!
//! Not safe for concurrent use from multiple threads without external
//! synchronization.

use std::any::Any;
use std::ffi::c_void;
use std::ptr;

use silt_abi::TextVariant;

/// A collection of pinned payloads scoped to one engine call.
#[derive(Default)]
pub struct PinningArena {
    pins: Vec<Box<dyn Any>>,
    closed: bool,
}

impl PinningArena {
    /// Opens an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins a value and returns its stable address.
    ///
    /// `None` returns the null address without allocating. The address is
    /// valid until [`close`](Self::close); distinct added values never
    /// share an address.
    pub fn add<T: 'static>(&mut self, value: Option<T>) -> *const T {
        debug_assert!(!self.closed, "add on a closed arena");
        match value {
            None => ptr::null(),
            Some(value) => {
                let boxed = Box::new(value);
                let address: *const T = &*boxed;
                self.pins.push(boxed);
                address
            }
        }
    }

    /// Pins a copy of a slice and returns the address of its first
    /// element, or the null address for an empty slice.
    pub fn add_slice<T: Copy + 'static>(&mut self, values: &[T]) -> *const T {
        debug_assert!(!self.closed, "add on a closed arena");
        if values.is_empty() {
            return ptr::null();
        }
        let boxed: Box<[T]> = values.into();
        let address = boxed.as_ptr();
        self.pins.push(Box::new(boxed));
        address
    }

    /// Pins a copy of a byte buffer.
    pub fn add_bytes(&mut self, bytes: Option<&[u8]>) -> *const c_void {
        match bytes {
            None => ptr::null(),
            Some(bytes) => self.add_slice(bytes).cast(),
        }
    }

    /// Encodes a string in the given text variant, pins the
    /// zero-terminated buffer, and returns its address.
    pub fn add_text(&mut self, s: Option<&str>, variant: TextVariant) -> *const c_void {
        match s {
            None => ptr::null(),
            Some(s) => {
                let encoded = silt_abi::encode(s, variant);
                self.add_slice(&encoded).cast()
            }
        }
    }

    /// Number of live pins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// True when nothing is pinned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Releases every pin. Every address the arena issued becomes
    /// invalid; callers must not retain them past this point.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        tracing::trace!(pins = self.pins.len(), "releasing pinned payloads");
        self.pins.clear();
        self.closed = true;
    }
}

impl Drop for PinningArena {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for PinningArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinningArena")
            .field("pins", &self.pins.len())
            .field("closed", &self.closed)
            .finish()
    }
}
