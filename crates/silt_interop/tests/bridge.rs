//! End-to-end tests of the call bridge against a mock engine.
//!
//! The mock stands in for the loaded engine library: it reads every
//! pinned payload back through the raw addresses it is handed, exactly
//! the way the real engine would, so these tests fail if pinning,
//! encoding, or the call sequence is wrong.

use std::cell::{Cell, RefCell};
use std::ffi::c_void;
use std::sync::Arc;

use silt_abi::{
    RawIndexCreate2, RawRecordPosition, RawSession, RawSetColumn, RawTable, RawThreadStats,
    RawThreadStats2, Status, TextVariant,
};
use silt_interop::{
    create_indexes, get_record_position, get_thread_stats, open_table, set_columns, ColumnId,
    Collation, ConditionalColumn, ConditionalOptions, EngineApi, IndexDefinition, InteropError,
    ResourceState, SetColumnRequest, ThreadStatsReading,
};

const SESSION: RawSession = RawSession(0x5e55);
const TABLE: RawTable = RawTable(0x7ab1);

/// What the mock engine observed of one index descriptor.
#[derive(Debug, PartialEq, Eq)]
struct SeenIndex {
    name: String,
    key_bytes: Vec<u8>,
    key_length: u32,
    density: u32,
    conditional_names: Vec<String>,
    locale_id: Option<u32>,
}

/// What the mock engine observed of one column assignment.
#[derive(Debug, PartialEq, Eq)]
struct SeenColumn {
    column_id: u32,
    data: Option<Vec<u8>>,
}

#[derive(Default)]
struct MockEngine {
    calls: Cell<u32>,
    seen_indexes: RefCell<Vec<SeenIndex>>,
    seen_columns: RefCell<Vec<SeenColumn>>,
    stats_revision: Cell<u32>,
    open_tables: Cell<u32>,
    closed_tables: Cell<u32>,
}

unsafe fn read_narrow(ptr: *const c_void) -> String {
    assert!(!ptr.is_null());
    let mut bytes = Vec::new();
    let mut cursor = ptr.cast::<u8>();
    loop {
        let byte = *cursor;
        if byte == 0 {
            break;
        }
        bytes.push(byte);
        cursor = cursor.add(1);
    }
    String::from_utf8(bytes).unwrap()
}

impl EngineApi for MockEngine {
    unsafe fn create_indexes(
        &self,
        session: RawSession,
        table: RawTable,
        definitions: *mut RawIndexCreate2,
        count: u32,
    ) -> Status {
        assert_eq!(session, SESSION);
        assert_eq!(table, TABLE);
        self.calls.set(self.calls.get() + 1);

        let raws = std::slice::from_raw_parts_mut(definitions, count as usize);
        for (i, raw) in raws.iter_mut().enumerate() {
            assert_eq!(raw.base.struct_size, RawIndexCreate2::SIZE);
            assert!(raw.data_pointer_invariants());

            let key_units = raw.base.key_length as usize;
            let key_bytes =
                std::slice::from_raw_parts(raw.base.key.cast::<u8>(), key_units).to_vec();

            let conditional_names = if raw.base.conditional_columns.is_null() {
                Vec::new()
            } else {
                std::slice::from_raw_parts(
                    raw.base.conditional_columns,
                    raw.base.conditional_count as usize,
                )
                .iter()
                .map(|c| read_narrow(c.column_name))
                .collect()
            };

            let locale_id = if raw.base.collation.is_null() {
                None
            } else {
                Some((*raw.base.collation.cast::<silt_abi::RawCollation>()).locale_id)
            };

            self.seen_indexes.borrow_mut().push(SeenIndex {
                name: read_narrow(raw.base.name),
                key_bytes,
                key_length: raw.base.key_length,
                density: raw.base.density,
                conditional_names,
                locale_id,
            });
            raw.base.error = -(1000 + i as i32);
        }
        Status::OK
    }

    unsafe fn set_columns(
        &self,
        session: RawSession,
        table: RawTable,
        columns: *mut RawSetColumn,
        count: u32,
    ) -> Status {
        assert_eq!(session, SESSION);
        assert_eq!(table, TABLE);
        self.calls.set(self.calls.get() + 1);

        let raws = std::slice::from_raw_parts_mut(columns, count as usize);
        for (i, raw) in raws.iter_mut().enumerate() {
            let data = if raw.data.is_null() {
                assert_eq!(raw.data_length, 0);
                None
            } else {
                Some(
                    std::slice::from_raw_parts(raw.data.cast::<u8>(), raw.data_length as usize)
                        .to_vec(),
                )
            };
            self.seen_columns.borrow_mut().push(SeenColumn {
                column_id: raw.column_id,
                data,
            });
            raw.error = 1400 + i as i32;
        }
        Status::OK
    }

    fn get_record_position(
        &self,
        _session: RawSession,
        _table: RawTable,
        out: &mut RawRecordPosition,
    ) -> Status {
        self.calls.set(self.calls.get() + 1);
        *out = RawRecordPosition {
            struct_size: RawRecordPosition::SIZE,
            entries_before: 250,
            entries_in_range: 1,
            entries_total: 1000,
        };
        Status::OK
    }

    fn get_thread_stats(&self, out: &mut RawThreadStats2) -> Status {
        self.calls.set(self.calls.get() + 1);
        assert_eq!(out.base.struct_size, RawThreadStats2::SIZE);
        let filled = if self.stats_revision.get() == 1 {
            RawThreadStats::SIZE
        } else {
            RawThreadStats2::SIZE
        };
        *out = RawThreadStats2 {
            base: RawThreadStats {
                struct_size: filled,
                pages_referenced: 1,
                pages_read: 2,
                pages_preread: 3,
                pages_dirtied: 4,
                pages_redirtied: 5,
                log_records: 6,
                log_bytes: 7,
            },
            cache_miss_microseconds: 8,
            cache_misses: 9,
        };
        Status::OK
    }

    unsafe fn open_table(
        &self,
        session: RawSession,
        name: *const c_void,
        out: &mut RawTable,
    ) -> Status {
        assert_eq!(session, SESSION);
        self.calls.set(self.calls.get() + 1);
        if read_narrow(name) == "missing" {
            return Status(-1305);
        }
        self.open_tables.set(self.open_tables.get() + 1);
        *out = TABLE;
        Status::OK
    }

    fn close_table(&self, session: RawSession, table: RawTable) -> Status {
        assert_eq!(session, SESSION);
        assert_eq!(table, TABLE);
        self.closed_tables.set(self.closed_tables.get() + 1);
        Status::OK
    }
}

/// Pointer sanity shared by the index assertions.
trait PointerInvariants {
    fn data_pointer_invariants(&self) -> bool;
}

impl PointerInvariants for RawIndexCreate2 {
    fn data_pointer_invariants(&self) -> bool {
        !self.base.name.is_null() && !self.base.key.is_null()
    }
}

#[test]
fn create_indexes_pins_everything_the_engine_reads() {
    let api = MockEngine::default();

    let mut plain = IndexDefinition::new("by_name", "+name\0");
    plain.max_key_length = 255;

    let mut filtered = IndexDefinition::new("by_state", "+state\0-when\0");
    filtered.collation = Some(Collation::from_locale_id(1033, 0x400));
    filtered.conditional_columns = Some(vec![
        ConditionalColumn::new("deleted", ConditionalOptions::MUST_BE_NULL),
        ConditionalColumn::new("state", ConditionalOptions::MUST_BE_NON_NULL),
    ]);
    filtered.conditional_count = 2;

    let mut definitions = [plain, filtered];
    let status = create_indexes(&api, SESSION, TABLE, &mut definitions, TextVariant::Narrow)
        .unwrap();
    assert_eq!(status, Status::OK);

    let seen = api.seen_indexes.borrow();
    assert_eq!(seen.len(), 2);

    assert_eq!(seen[0].name, "by_name");
    assert_eq!(seen[0].key_bytes, b"+name\0\0");
    assert_eq!(seen[0].key_length, 7);
    assert_eq!(seen[0].density, 100);
    assert!(seen[0].conditional_names.is_empty());
    assert_eq!(seen[0].locale_id, None);

    assert_eq!(seen[1].name, "by_state");
    assert_eq!(seen[1].key_bytes, b"+state\0-when\0\0");
    assert_eq!(seen[1].conditional_names, vec!["deleted", "state"]);
    assert_eq!(seen[1].locale_id, Some(1033));

    // Per-index statuses came back through the raw error members.
    assert_eq!(definitions[0].error, Status(-1000));
    assert_eq!(definitions[1].error, Status(-1001));
}

#[test]
fn validation_failures_never_reach_the_engine() {
    let api = MockEngine::default();
    let mut invalid = IndexDefinition::new("broken", "+x\0");
    invalid.density = -1;

    let result = create_indexes(
        &api,
        SESSION,
        TABLE,
        std::slice::from_mut(&mut invalid),
        TextVariant::Narrow,
    );
    assert!(matches!(result, Err(InteropError::OutOfRange { .. })));
    assert_eq!(api.calls.get(), 0);
}

#[test]
fn set_columns_pins_value_buffers_and_reports_per_column_status() {
    let api = MockEngine::default();
    let mut requests = [
        SetColumnRequest::new(ColumnId(7), b"payload".to_vec()),
        SetColumnRequest::null(ColumnId(8)),
    ];

    let status = set_columns(&api, SESSION, TABLE, &mut requests).unwrap();
    assert_eq!(status, Status::OK);

    let seen = api.seen_columns.borrow();
    assert_eq!(
        seen[0],
        SeenColumn {
            column_id: 7,
            data: Some(b"payload".to_vec()),
        }
    );
    assert_eq!(
        seen[1],
        SeenColumn {
            column_id: 8,
            data: None,
        }
    );

    assert_eq!(requests[0].error, Status(1400));
    assert_eq!(requests[1].error, Status(1401));
}

#[test]
fn record_position_decodes_the_engine_output() {
    let api = MockEngine::default();
    let (status, position) = get_record_position(&api, SESSION, TABLE).unwrap();
    assert_eq!(status, Status::OK);
    let position = position.unwrap();
    assert_eq!(position.entries_before, 250);
    assert_eq!(position.entries_total, 1000);
}

#[test]
fn thread_stats_decode_keys_off_the_reported_size() {
    let api = MockEngine::default();

    let (_, reading) = get_thread_stats(&api).unwrap();
    match reading.unwrap() {
        ThreadStatsReading::V2(stats) => {
            assert_eq!(stats.stats.pages_read, 2);
            assert_eq!(stats.cache_misses, 9);
        }
        ThreadStatsReading::V1(_) => panic!("expected the grown revision"),
    }

    api.stats_revision.set(1);
    let (_, reading) = get_thread_stats(&api).unwrap();
    match reading.unwrap() {
        ThreadStatsReading::V1(stats) => assert_eq!(stats.log_bytes, 7),
        ThreadStatsReading::V2(_) => panic!("expected the first revision"),
    }
}

#[test]
fn open_table_wraps_the_handle_in_a_single_release_guard() {
    let api = Arc::new(MockEngine::default());
    let (status, table) =
        open_table(&api, SESSION, "accounts", TextVariant::Narrow).unwrap();
    assert_eq!(status, Status::OK);

    let mut table = table.unwrap();
    assert_eq!(table.handle().unwrap(), TABLE);
    assert_eq!(table.state(), ResourceState::Allocated);

    table.dispose();
    table.dispose();
    assert_eq!(api.closed_tables.get(), 1);
    assert!(matches!(
        table.handle(),
        Err(InteropError::UseAfterDispose { .. })
    ));
    assert!(matches!(
        table.close(),
        Err(InteropError::UseAfterDispose { .. })
    ));
}

#[test]
fn dropping_an_open_table_closes_it_once() {
    let api = Arc::new(MockEngine::default());
    {
        let (_, table) = open_table(&api, SESSION, "accounts", TextVariant::Narrow).unwrap();
        let _table = table.unwrap();
    }
    assert_eq!(api.closed_tables.get(), 1);
}

#[test]
fn explicit_close_then_drop_releases_exactly_once() {
    let api = Arc::new(MockEngine::default());
    {
        let (_, table) = open_table(&api, SESSION, "accounts", TextVariant::Narrow).unwrap();
        let mut table = table.unwrap();
        assert!(table.close().unwrap());
        assert!(!table.close().unwrap());
    }
    assert_eq!(api.closed_tables.get(), 1);
}

#[test]
fn failed_open_acquires_nothing() {
    let api = Arc::new(MockEngine::default());
    let (status, table) = open_table(&api, SESSION, "missing", TextVariant::Narrow).unwrap();
    assert_eq!(status, Status(-1305));
    assert!(table.is_none());
    assert_eq!(api.open_tables.get(), 0);
    assert_eq!(api.closed_tables.get(), 0);
}
