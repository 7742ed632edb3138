//! Per-thread engine activity counters.
//!
//! The counter structure grew a second revision; which one the engine
//! filled in is keyed off the reported size, so decoding returns a
//! tagged [`ThreadStatsReading`].

use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

use silt_abi::{negotiated_size, RawThreadStats, RawThreadStats2};

use crate::error::{into_signed, InteropError, InteropResult};

/// Engine activity of the calling thread, first revision.
///
/// Counters are cumulative for the thread; subtract two snapshots to
/// measure the work between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThreadStats {
    /// Pages referenced.
    pub pages_referenced: i32,
    /// Pages read from disk.
    pub pages_read: i32,
    /// Pages preread.
    pub pages_preread: i32,
    /// Pages dirtied.
    pub pages_dirtied: i32,
    /// Clean pages dirtied again.
    pub pages_redirtied: i32,
    /// Log records generated.
    pub log_records: i32,
    /// Bytes of log generated.
    pub log_bytes: i32,
}

impl ThreadStats {
    /// Decodes from the raw layout; the reported size must cover it.
    pub fn from_raw(raw: &RawThreadStats) -> InteropResult<Self> {
        let reported = negotiated_size(raw.struct_size)?;
        if reported < RawThreadStats::SIZE as usize {
            return Err(InteropError::out_of_range(
                "thread stats size",
                format!("{reported} below the {} byte layout", RawThreadStats::SIZE),
            ));
        }
        Ok(ThreadStats {
            pages_referenced: into_signed("pages_referenced", raw.pages_referenced)?,
            pages_read: into_signed("pages_read", raw.pages_read)?,
            pages_preread: into_signed("pages_preread", raw.pages_preread)?,
            pages_dirtied: into_signed("pages_dirtied", raw.pages_dirtied)?,
            pages_redirtied: into_signed("pages_redirtied", raw.pages_redirtied)?,
            log_records: into_signed("log_records", raw.log_records)?,
            log_bytes: into_signed("log_bytes", raw.log_bytes)?,
        })
    }
}

impl Add for ThreadStats {
    type Output = ThreadStats;

    fn add(self, rhs: ThreadStats) -> ThreadStats {
        ThreadStats {
            pages_referenced: self.pages_referenced + rhs.pages_referenced,
            pages_read: self.pages_read + rhs.pages_read,
            pages_preread: self.pages_preread + rhs.pages_preread,
            pages_dirtied: self.pages_dirtied + rhs.pages_dirtied,
            pages_redirtied: self.pages_redirtied + rhs.pages_redirtied,
            log_records: self.log_records + rhs.log_records,
            log_bytes: self.log_bytes + rhs.log_bytes,
        }
    }
}

impl AddAssign for ThreadStats {
    fn add_assign(&mut self, rhs: ThreadStats) {
        *self = *self + rhs;
    }
}

impl Sub for ThreadStats {
    type Output = ThreadStats;

    fn sub(self, rhs: ThreadStats) -> ThreadStats {
        ThreadStats {
            pages_referenced: self.pages_referenced - rhs.pages_referenced,
            pages_read: self.pages_read - rhs.pages_read,
            pages_preread: self.pages_preread - rhs.pages_preread,
            pages_dirtied: self.pages_dirtied - rhs.pages_dirtied,
            pages_redirtied: self.pages_redirtied - rhs.pages_redirtied,
            log_records: self.log_records - rhs.log_records,
            log_bytes: self.log_bytes - rhs.log_bytes,
        }
    }
}

/// Engine activity of the calling thread, second revision, adding
/// page-cache-miss accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThreadStats2 {
    /// The first-revision counters.
    pub stats: ThreadStats,
    /// Microseconds spent waiting on page-cache misses.
    pub cache_miss_microseconds: i64,
    /// Page-cache misses.
    pub cache_misses: i32,
}

impl ThreadStats2 {
    /// Decodes from the raw layout; the reported size must cover the
    /// grown revision.
    pub fn from_raw(raw: &RawThreadStats2) -> InteropResult<Self> {
        let reported = negotiated_size(raw.base.struct_size)?;
        if reported < RawThreadStats2::SIZE as usize {
            return Err(InteropError::out_of_range(
                "thread stats size",
                format!("{reported} below the {} byte layout", RawThreadStats2::SIZE),
            ));
        }
        Ok(ThreadStats2 {
            stats: ThreadStats {
                pages_referenced: into_signed("pages_referenced", raw.base.pages_referenced)?,
                pages_read: into_signed("pages_read", raw.base.pages_read)?,
                pages_preread: into_signed("pages_preread", raw.base.pages_preread)?,
                pages_dirtied: into_signed("pages_dirtied", raw.base.pages_dirtied)?,
                pages_redirtied: into_signed("pages_redirtied", raw.base.pages_redirtied)?,
                log_records: into_signed("log_records", raw.base.log_records)?,
                log_bytes: into_signed("log_bytes", raw.base.log_bytes)?,
            },
            cache_miss_microseconds: i64::try_from(raw.cache_miss_microseconds).map_err(|_| {
                InteropError::out_of_range("cache_miss_microseconds", "exceeds i64::MAX")
            })?,
            cache_misses: into_signed("cache_misses", raw.cache_misses)?,
        })
    }
}

impl Add for ThreadStats2 {
    type Output = ThreadStats2;

    fn add(self, rhs: ThreadStats2) -> ThreadStats2 {
        ThreadStats2 {
            stats: self.stats + rhs.stats,
            cache_miss_microseconds: self.cache_miss_microseconds + rhs.cache_miss_microseconds,
            cache_misses: self.cache_misses + rhs.cache_misses,
        }
    }
}

impl AddAssign for ThreadStats2 {
    fn add_assign(&mut self, rhs: ThreadStats2) {
        *self = *self + rhs;
    }
}

impl Sub for ThreadStats2 {
    type Output = ThreadStats2;

    fn sub(self, rhs: ThreadStats2) -> ThreadStats2 {
        ThreadStats2 {
            stats: self.stats - rhs.stats,
            cache_miss_microseconds: self.cache_miss_microseconds - rhs.cache_miss_microseconds,
            cache_misses: self.cache_misses - rhs.cache_misses,
        }
    }
}

/// Which revision of the counters the engine actually filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreadStatsReading {
    /// First revision.
    V1(ThreadStats),
    /// Second revision.
    V2(ThreadStats2),
}

impl ThreadStatsReading {
    /// The first-revision counters, present in either reading.
    #[must_use]
    pub fn stats(&self) -> ThreadStats {
        match self {
            ThreadStatsReading::V1(stats) => *stats,
            ThreadStatsReading::V2(stats2) => stats2.stats,
        }
    }
}

/// Decodes a counter buffer the engine filled in, keyed by the size it
/// reported back.
pub fn decode_thread_stats(raw: &RawThreadStats2) -> InteropResult<ThreadStatsReading> {
    let reported = negotiated_size(raw.base.struct_size)?;
    if reported >= RawThreadStats2::SIZE as usize {
        return Ok(ThreadStatsReading::V2(ThreadStats2::from_raw(raw)?));
    }
    if reported >= RawThreadStats::SIZE as usize {
        return Ok(ThreadStatsReading::V1(ThreadStats::from_raw(&raw.base)?));
    }
    Err(InteropError::out_of_range(
        "thread stats size",
        format!("{reported} below the {} byte layout", RawThreadStats::SIZE),
    ))
}
