//! Utility modules for actionsgate

pub mod prerequisites;
