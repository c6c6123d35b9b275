//! The mode's persisted record format.

use ratchet_core::Mode;
use ratchet_store::RecordStore;

/// Record length on the medium: the raw mode byte padded to the marker
/// stride.
pub const SETTINGS_RECORD_LEN: usize = 4;

/// Mode written on a first run or when the live record fails to decode.
pub const DEFAULT_MODE: Mode = Mode::Mult;

/// The settings store: one 4-byte mode record.
pub type SettingsStore<S> = RecordStore<S, SETTINGS_RECORD_LEN>;

pub fn encode_mode(mode: Mode) -> [u8; SETTINGS_RECORD_LEN] {
    [mode.as_raw(), 0, 0, 0]
}

pub fn decode_mode(record: [u8; SETTINGS_RECORD_LEN]) -> Option<Mode> {
    Mode::from_raw(record[0])
}
