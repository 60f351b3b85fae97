//! Declarative call lifecycle transitions
//!
//! Every legal `(phase, event)` pair maps to an ordered list of candidate
//! transitions. The first candidate whose guards pass is taken; a pair with no
//! entry is an illegal command.

pub mod types;
pub mod builder;
pub mod tables;

pub use types::*;
pub use builder::StateTableBuilder;

use lazy_static::lazy_static;
use std::sync::Arc;

lazy_static! {
    /// The default lifecycle table, shared by every controller
    pub static ref DEFAULT_TABLE: Arc<TransitionTable> = Arc::new(build_default_table());
}

/// Build the default lifecycle table
pub fn build_default_table() -> TransitionTable {
    let mut builder = StateTableBuilder::new();
    tables::add_lifecycle_transitions(&mut builder);

    match builder.build() {
        Ok(table) => {
            tracing::debug!("Built lifecycle table with {} transitions", table.transition_count());
            table
        }
        Err(errors) => panic!("Invalid default lifecycle table: {:?}", errors),
    }
}
