//! UI-independent client core: the state machine a front end drives.
//!
//! Nothing here touches the network directly; [`sync::SyncController`]
//! talks through the [`sync::BoardApi`] trait so a UI shell supplies
//! whatever HTTP client it likes and tests supply mocks.

pub mod confirm;
pub mod ordering;
pub mod session;
pub mod state;
pub mod sync;
