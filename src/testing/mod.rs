//! Shared test doubles for hardware and broker seams.

pub mod mocks;
