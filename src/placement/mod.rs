//! Placement interaction: placed objects, the store and the state machine.
//!
//! ## Key Types
//!
//! - `PlacedObject`: an object standing on the grid
//! - `PlacementStore`: authoritative placed list, occupancy and session
//! - `Session`: Idle / Placing / Lifted
//! - `PlacementController`: the only writer of the store
//! - `InputEvent`: the closed set of inputs the controller accepts
//! - `Outcome`: what an input did (or why it was refused)

pub mod object;
pub mod session;
pub mod events;
pub mod store;
pub mod controller;

pub use object::PlacedObject;
pub use session::{Outcome, Preview, Rejection, Session};
pub use events::{InputEvent, KeySignal, PointerButton};
pub use store::{PlacementStore, StoreSnapshot};
pub use controller::{InvariantViolation, PlacementController, SeedError};
