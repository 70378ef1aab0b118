//! Background loops.

pub mod incident_sync_loop;
