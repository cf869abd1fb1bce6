//! Drag mechanism - per-gesture state and the pointer-move decision logic.
//!
//! - [`Threshold`] - edge-crossing regions keyed by element or branch
//! - [`Draggable`] - transient state of the lifted element
//! - [`MechanismController`] - decision tree driven per pointer-move sample

mod controller;
mod draggable;
mod threshold;

pub use controller::{MechanismController, PendingMigration};
pub use draggable::{Draggable, ScrollSample};
pub use threshold::{Threshold, ThresholdPercentages};
