//! Infrastructure layer - persistence, services and process plumbing

pub mod ledger;
pub mod logging;
pub mod team;
