//! Haulage operations board.
//!
//! Reconciles allocation records with per-site journey events to answer
//! two questions: "where is each truck right now?" and "which allocation
//! does the plate at the gate belong to?"

pub mod board;
pub mod domain;
pub mod feed;
pub mod identify;
pub mod journeys;
pub mod names;
pub mod poller;
pub mod stage;
pub mod timeline;
