//! Snowflake ID Generator
//!
//! Twitter-style distributed unique ID generation. Layout of the 63 usable bits:
//! 41 bits of milliseconds since [`EPOCH`], 5 bits machine id, 5 bits node id
//! and a 12 bit per-millisecond sequence.

use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Custom epoch (2020-01-01T00:00:00.000Z)
pub const EPOCH: u64 = 1_577_836_800_000;

const MAX_SEQUENCE: u64 = 0xFFF;

/// Snowflake ID generator
#[derive(Debug)]
pub struct SnowflakeGenerator {
    machine_id: u64,
    node_id: u64,
    /// Last timestamp and the sequence used within it.
    state: Mutex<(u64, u64)>,
}

impl SnowflakeGenerator {
    /// Create a new snowflake generator. Both ids are truncated to 5 bits.
    pub fn new(machine_id: u64, node_id: u64) -> Self {
        Self {
            machine_id: machine_id & 0x1F,
            node_id: node_id & 0x1F,
            state: Mutex::new((0, 0)),
        }
    }

    pub fn machine_id(&self) -> u64 {
        self.machine_id
    }

    pub fn node_id(&self) -> u64 {
        self.node_id
    }

    /// Generate a new snowflake ID, strictly increasing per generator.
    pub fn generate(&self) -> i64 {
        let mut state = self.state.lock();
        let (last, sequence) = *state;

        let mut timestamp = current_timestamp().max(last);
        let sequence = if timestamp == last {
            let next = (sequence + 1) & MAX_SEQUENCE;
            if next == 0 {
                // Sequence exhausted for this millisecond
                while timestamp <= last {
                    timestamp = current_timestamp();
                }
            }
            next
        } else {
            0
        };
        *state = (timestamp, sequence);

        let id = ((timestamp.saturating_sub(EPOCH)) << 22)
            | (self.machine_id << 17)
            | (self.node_id << 12)
            | sequence;

        id as i64
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Extract timestamp from snowflake ID
pub fn extract_timestamp(snowflake: i64) -> u64 {
    ((snowflake as u64) >> 22) + EPOCH
}

/// Extract the machine and node id from a snowflake ID
pub fn extract_origin(snowflake: i64) -> (u64, u64) {
    let snowflake = snowflake as u64;
    ((snowflake >> 17) & 0x1F, (snowflake >> 12) & 0x1F)
}
