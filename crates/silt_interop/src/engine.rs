//! Engine entry points and the call bridge.
//!
//! The engine is an opaque collaborator: this module knows its call
//! signatures (raw structures in, status codes out) and nothing about
//! its behavior. The bridge functions run one strict sequence per call:
//! validate and encode the logical values, pin variable-length payloads,
//! invoke the entry point, decode results, release the pins. The arena
//! is dropped on every path, including errors.

use std::ffi::c_void;
use std::sync::Arc;

use silt_abi::{
    RawIndexCreate2, RawRecordPosition, RawSession, RawSetColumn, RawTable, RawThreadStats,
    RawThreadStats2, Status, TextVariant,
};

use crate::arena::PinningArena;
use crate::error::InteropResult;
use crate::index::IndexDefinition;
use crate::position::RecordPosition;
use crate::resource::ResourceGuard;
use crate::setcolumn::SetColumnRequest;
use crate::stats::{decode_thread_stats, ThreadStatsReading};

/// The engine's entry points.
///
/// Implementations wrap the loaded engine library; tests substitute a
/// mock. Every call is synchronous and may block; none is cancelable.
pub trait EngineApi {
    /// Creates `count` indexes described at `definitions`.
    ///
    /// # Safety
    ///
    /// `definitions` must point at `count` valid descriptors whose
    /// pinned payloads stay live for the whole call.
    unsafe fn create_indexes(
        &self,
        session: RawSession,
        table: RawTable,
        definitions: *mut RawIndexCreate2,
        count: u32,
    ) -> Status;

    /// Applies `count` column assignments at `columns` to the current
    /// row.
    ///
    /// # Safety
    ///
    /// `columns` must point at `count` valid assignments whose pinned
    /// value buffers stay live for the whole call.
    unsafe fn set_columns(
        &self,
        session: RawSession,
        table: RawTable,
        columns: *mut RawSetColumn,
        count: u32,
    ) -> Status;

    /// Reports the fractional position of the current record.
    fn get_record_position(
        &self,
        session: RawSession,
        table: RawTable,
        out: &mut RawRecordPosition,
    ) -> Status;

    /// Fills in activity counters for the calling thread. The engine
    /// reports how much of the buffer it wrote through the leading size
    /// member.
    fn get_thread_stats(&self, out: &mut RawThreadStats2) -> Status;

    /// Opens the named table.
    ///
    /// # Safety
    ///
    /// `name` must point at a zero-terminated name that stays live for
    /// the whole call.
    unsafe fn open_table(
        &self,
        session: RawSession,
        name: *const c_void,
        out: &mut RawTable,
    ) -> Status;

    /// Closes a table previously opened by
    /// [`open_table`](Self::open_table).
    fn close_table(&self, session: RawSession, table: RawTable) -> Status;
}

/// Creates every index in `definitions` over one engine call.
///
/// Per-index creation statuses are written back into the definitions;
/// the returned status is the call's own.
pub fn create_indexes<E: EngineApi>(
    api: &E,
    session: RawSession,
    table: RawTable,
    definitions: &mut [IndexDefinition],
    variant: TextVariant,
) -> InteropResult<Status> {
    for definition in definitions.iter() {
        definition.validate()?;
    }

    let mut arena = PinningArena::new();
    let mut raws = definitions
        .iter()
        .map(|definition| definition.to_raw(&mut arena, variant))
        .collect::<InteropResult<Vec<RawIndexCreate2>>>()?;

    tracing::debug!(indexes = raws.len(), "creating indexes");
    // Safety: every pointer in `raws` was pinned in `arena`, which stays
    // open across the call.
    let status = unsafe {
        api.create_indexes(session, table, raws.as_mut_ptr(), raws.len() as u32)
    };

    for (definition, raw) in definitions.iter_mut().zip(&raws) {
        definition.absorb_raw(raw);
    }
    arena.close();
    Ok(status)
}

/// Applies every assignment in `requests` to the current row over one
/// engine call.
///
/// Per-column statuses are written back into the requests; the returned
/// status is the call's own.
pub fn set_columns<E: EngineApi>(
    api: &E,
    session: RawSession,
    table: RawTable,
    requests: &mut [SetColumnRequest],
) -> InteropResult<Status> {
    for request in requests.iter() {
        request.validate()?;
    }

    let mut arena = PinningArena::new();
    let mut raws = Vec::with_capacity(requests.len());
    for request in requests.iter() {
        let mut raw = request.to_raw()?;
        raw.data = arena.add_bytes(request.data.as_deref());
        raws.push(raw);
    }

    tracing::debug!(columns = raws.len(), "setting columns");
    // Safety: every value buffer was pinned in `arena`, which stays open
    // across the call.
    let status =
        unsafe { api.set_columns(session, table, raws.as_mut_ptr(), raws.len() as u32) };

    for (request, raw) in requests.iter_mut().zip(&raws) {
        request.absorb_raw(raw);
    }
    arena.close();
    Ok(status)
}

/// Reads the fractional position of the current record.
///
/// On an engine error the raw output is not decoded and `None` is
/// returned alongside the status.
pub fn get_record_position<E: EngineApi>(
    api: &E,
    session: RawSession,
    table: RawTable,
) -> InteropResult<(Status, Option<RecordPosition>)> {
    let mut raw = RawRecordPosition {
        struct_size: RawRecordPosition::SIZE,
        ..Default::default()
    };
    let status = api.get_record_position(session, table, &mut raw);
    if status.is_err() {
        return Ok((status, None));
    }
    Ok((status, Some(RecordPosition::from_raw(&raw)?)))
}

/// Reads activity counters for the calling thread, decoding whichever
/// revision the engine filled in.
pub fn get_thread_stats<E: EngineApi>(
    api: &E,
) -> InteropResult<(Status, Option<ThreadStatsReading>)> {
    let mut raw = RawThreadStats2 {
        base: RawThreadStats {
            struct_size: RawThreadStats2::SIZE,
            ..Default::default()
        },
        ..Default::default()
    };
    let status = api.get_thread_stats(&mut raw);
    if status.is_err() {
        return Ok((status, None));
    }
    Ok((status, Some(decode_thread_stats(&raw)?)))
}

/// A table handle wrapped in a lifecycle guard.
///
/// Closing happens exactly once: explicitly through
/// [`close`](Table::close) or [`dispose`](Table::dispose), or implicitly
/// on drop.
pub struct Table {
    guard: ResourceGuard<RawTable>,
}

impl Table {
    /// The live raw handle, for composing further engine calls.
    pub fn handle(&self) -> InteropResult<RawTable> {
        self.guard.handle().map(|table| *table)
    }

    /// Releases the table back to the engine. A no-op when already
    /// closed; an error after [`dispose`](Table::dispose).
    pub fn close(&mut self) -> InteropResult<bool> {
        self.guard.release()
    }

    /// Finishes the wrapper; safe to call repeatedly.
    pub fn dispose(&mut self) {
        self.guard.dispose();
    }

    /// Current lifecycle state, for diagnostics.
    #[must_use]
    pub fn state(&self) -> crate::resource::ResourceState {
        self.guard.state()
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table").field("guard", &self.guard).finish()
    }
}

/// Opens the named table and wraps the handle in a lifecycle guard that
/// closes it through the engine exactly once.
///
/// On an engine error no handle was acquired and `None` is returned
/// alongside the status.
pub fn open_table<E: EngineApi + 'static>(
    api: &Arc<E>,
    session: RawSession,
    name: &str,
    variant: TextVariant,
) -> InteropResult<(Status, Option<Table>)> {
    let mut arena = PinningArena::new();
    let pinned_name = arena.add_text(Some(name), variant);

    let mut raw = RawTable::default();
    // Safety: the name is pinned in `arena`, which stays open across the
    // call.
    let status = unsafe { api.open_table(session, pinned_name, &mut raw) };
    arena.close();

    if status.is_err() {
        return Ok((status, None));
    }

    let mut guard = ResourceGuard::new("table");
    let releaser_api = Arc::clone(api);
    guard.mark_allocated(raw, move |table| {
        let status = releaser_api.close_table(session, table);
        if status.is_err() {
            tracing::warn!(%status, "table close reported an error");
        }
    })?;
    Ok((status, Some(Table { guard })))
}
