//! Marker-framed record persistence with wear spreading.
//!
//! Each stored record is framed by a 4-byte marker constant. Writing
//! invalidates the previous frame's marker (overwriting it with a distinct
//! "erased" constant) and appends the new frame after the old one, wrapping
//! to address 0 when insufficient room remains before the end of the
//! medium — so repeated writes walk across the EEPROM instead of wearing
//! one cell. A scan at startup finds the single live marker.
//!
//! Writes are normally deferred: [`RecordStore::schedule`] arms a delay that
//! restarts on every further change, coalescing rapid settings toggles into
//! one write, and [`RecordStore::tick`] — called every main-loop
//! iteration — flushes the pending record once the delay expires.

use log::debug;
use ratchet_hal::storage::Storage;
use ratchet_hal::HalError;
use thiserror::Error;

/// Marks the live record frame.
pub const MARKER: u32 = 0x6666_6666;

/// Overwrites a stale frame's marker.
pub const ERASED_MARKER: u32 = 0x3333_3333;

/// Size of a marker on the medium.
pub const MARKER_LEN: usize = core::mem::size_of::<u32>();

/// Delay between the last settings change and the flush to the medium.
pub const WRITE_DELAY_MS: u64 = 2_000;

/// Errors that can occur while persisting records.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// One framed record does not fit the medium at all. The write is
    /// aborted; the caller keeps operating from RAM.
    #[error("framed record ({0} bytes) does not fit the medium")]
    Full(usize),
    /// No valid marker on the medium; treated as a first run.
    #[error("no valid record marker found")]
    Empty,
    #[error("storage fault: {0}")]
    Storage(#[from] HalError),
}

#[derive(Debug, Clone, Copy)]
struct Pending<const N: usize> {
    record: [u8; N],
    due_ms: u64,
}

/// A store of `N`-byte records over a byte-addressed medium.
pub struct RecordStore<S: Storage, const N: usize> {
    storage: S,
    read_addr: usize,
    write_addr: usize,
    pending: Option<Pending<N>>,
}

impl<S: Storage, const N: usize> RecordStore<S, N> {
    /// Bytes one frame occupies: the marker plus the record rounded up to
    /// the marker stride, so every frame stays marker-aligned.
    pub const FRAME_LEN: usize = MARKER_LEN + N.div_ceil(MARKER_LEN) * MARKER_LEN;

    /// Opens the store, scanning the medium for the live marker.
    pub fn open(storage: S) -> Result<Self, StoreError> {
        let mut store = Self {
            storage,
            read_addr: 0,
            write_addr: 0,
            pending: None,
        };
        store.scan()?;
        Ok(store)
    }

    fn scan(&mut self) -> Result<(), StoreError> {
        let len = self.storage.len();
        let mut addr = 0;
        while addr + MARKER_LEN <= len {
            if self.read_marker(addr)? == MARKER {
                self.read_addr = addr;
                self.write_addr = addr + Self::FRAME_LEN;
                debug!("store: live marker at {addr}");
                return Ok(());
            }
            addr += MARKER_LEN;
        }
        self.read_addr = 0;
        self.write_addr = 0;
        debug!("store: no marker found, medium is empty");
        Ok(())
    }

    fn read_marker(&self, addr: usize) -> Result<u32, StoreError> {
        let mut bytes = [0u8; MARKER_LEN];
        self.storage.read(addr, &mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Whether the scan found no live record.
    pub fn is_empty(&self) -> bool {
        self.read_addr == self.write_addr
    }

    /// Address the live record frame starts at.
    pub fn read_addr(&self) -> usize {
        self.read_addr
    }

    /// Address the next frame will be written to.
    pub fn write_addr(&self) -> usize {
        self.write_addr
    }

    /// Writes a record immediately. Returns the bytes written including the
    /// marker.
    pub fn write(&mut self, record: &[u8; N]) -> Result<usize, StoreError> {
        let len = self.storage.len();
        if Self::FRAME_LEN > len {
            return Err(StoreError::Full(Self::FRAME_LEN));
        }
        // Invalidate the previous frame first; a torn write then loses one
        // settings change, never yields two live markers.
        self.storage
            .write(self.read_addr, &ERASED_MARKER.to_le_bytes())?;
        if self.write_addr + Self::FRAME_LEN > len - Self::FRAME_LEN {
            debug!("store: wrapping to address 0");
            self.write_addr = 0;
        }
        self.storage.write(self.write_addr, &MARKER.to_le_bytes())?;
        // Padding up to the frame stride is never read back; only the
        // record bytes are written.
        self.storage.write(self.write_addr + MARKER_LEN, record)?;
        self.read_addr = self.write_addr;
        self.write_addr += Self::FRAME_LEN;
        debug!(
            "store: record written, read_addr={} write_addr={}",
            self.read_addr, self.write_addr
        );
        Ok(Self::FRAME_LEN)
    }

    /// Reads the live record.
    pub fn read(&self) -> Result<[u8; N], StoreError> {
        if self.read_marker(self.read_addr)? != MARKER {
            return Err(StoreError::Empty);
        }
        let mut record = [0u8; N];
        self.storage.read(self.read_addr + MARKER_LEN, &mut record)?;
        Ok(record)
    }

    /// Defers a write of `record` by [`WRITE_DELAY_MS`]. Calling again
    /// before the delay expires replaces the record and restarts the delay.
    pub fn schedule(&mut self, record: [u8; N], now_ms: u64) {
        debug!("store: write deferred");
        self.pending = Some(Pending {
            record,
            due_ms: now_ms + WRITE_DELAY_MS,
        });
    }

    /// Flushes a due pending write. Returns the bytes written, if any.
    pub fn tick(&mut self, now_ms: u64) -> Result<Option<usize>, StoreError> {
        match self.pending {
            Some(pending) if now_ms > pending.due_ms => {
                self.pending = None;
                self.write(&pending.record).map(Some)
            }
            _ => Ok(None),
        }
    }
}
