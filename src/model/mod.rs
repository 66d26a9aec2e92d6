//! # Directory Model
//!
//! Pure DTOs for the address-book graph. These types cross every boundary:
//! directory ↔ search ↔ export ↔ user.
//!
//! Design rule: no storage state, no I/O here. A [`Person`] carries identity
//! and attributes plus its outgoing relation list — never any search state.

pub mod person;
pub mod address;
pub mod relation;

pub use person::{Person, PersonDetails, PersonId};
pub use address::{Address, PostalCode};
pub use relation::{Relation, Strength};
