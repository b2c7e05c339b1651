//! Eligibility filters
//!
//! Two stages: a casualty must first be an eligible kill ([`kill`]), then
//! each of the victim's equipped items must pass the item filter ([`item`]).
//! The victim class filter ([`victim`]) sits between them and is applied by
//! the tracker when it records the kill.

pub mod item;
pub mod kill;
pub mod victim;


pub use item::{ItemRejection, check_item, is_eligible_item};
pub use kill::{KillRejection, KillVerdict, is_eligible_kill};
pub use victim::{VictimClass, is_lootable_victim};
