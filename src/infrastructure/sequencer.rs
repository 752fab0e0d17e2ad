//! Sequencer implementations backed by configuration.

use std::sync::Arc;

use crate::config::{SequencerStrategy, Settings};
use crate::domain::sequencing::{EntityId, EntityKind, InMemorySequencer, Sequencer};
use crate::shared::snowflake::SnowflakeGenerator;

/// Hands out snowflake ids. Ids are unique across all kinds, so one
/// generator serves every table.
#[derive(Debug)]
pub struct SnowflakeSequencer {
    generator: SnowflakeGenerator,
}

impl SnowflakeSequencer {
    pub fn new(machine_id: u64, node_id: u64) -> Self {
        Self {
            generator: SnowflakeGenerator::new(machine_id, node_id),
        }
    }
}

impl Sequencer for SnowflakeSequencer {
    fn next_val(&self, _kind: EntityKind) -> EntityId {
        self.generator.generate()
    }
}

/// The sequencer selected by `sequencer.strategy`.
pub fn create_sequencer(settings: &Settings) -> Arc<dyn Sequencer> {
    match settings.sequencer.strategy {
        SequencerStrategy::InMemory => {
            tracing::info!(
                initial_value = settings.sequencer.initial_value,
                "Using in-memory sequencer"
            );
            Arc::new(InMemorySequencer::new(settings.sequencer.initial_value))
        }
        SequencerStrategy::Snowflake => {
            tracing::info!(
                machine_id = settings.snowflake.machine_id,
                node_id = settings.snowflake.node_id,
                "Using snowflake sequencer"
            );
            Arc::new(SnowflakeSequencer::new(
                settings.snowflake.machine_id,
                settings.snowflake.node_id,
            ))
        }
    }
}
