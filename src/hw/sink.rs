//! Debug sink over RTT.

use ble_sensor::DebugSink;

/// Echoes text written by the peer to the defmt log.
pub struct DefmtSink;

impl DebugSink for DefmtSink {
    fn write_line(&mut self, line: &[u8]) {
        defmt::println!("{=[u8]:a}", line);
    }
}
