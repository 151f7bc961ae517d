//! Collision group filtering and the per-tick contact ledger

pub mod ledger;
pub mod policy;

pub use ledger::{ContactLedger, ContactPair};
pub use policy::{CollisionPolicy, Verdict, ALWAYS_COLLIDE};
