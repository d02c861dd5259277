//! Inspection commands: clients, locations, check

pub mod handler;

pub use handler::handle_inspect_command;

/// What to inspect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectTarget {
    Clients,
    Locations,
    Check,
}
