//! # knowbook — Address-Book Social Graph
//!
//! An in-memory directory of people connected by weighted, direction-asymmetric
//! acquaintance relations, with two path searches over the resulting graph:
//! the *fastest* chain (fewest intermediaries) and the *strongest* chain
//! (through the people who know each other best).
//!
//! ## Design Principles
//!
//! 1. **Arena-owned records**: the [`Directory`] exclusively owns every
//!    [`Person`]; relations and predecessor chains reference persons by
//!    [`PersonId`], never by pointer.
//! 2. **Paired edges**: a relation A→B exists iff B→A exists. The two are
//!    created and destroyed together, but carry independent strengths.
//! 3. **Total operations**: every mutation and query returns a [`Result`];
//!    a rejected operation leaves the directory untouched.
//! 4. **Run-local search state**: distance, hop count, and predecessor live
//!    in scratch maps owned by one [`find_path`] call, never on the records.
//!
//! ## Quick Start
//!
//! ```rust
//! use knowbook::{CostModel, Directory, PersonDetails};
//!
//! let mut directory = Directory::new();
//! let ada = directory.add_person(PersonDetails::named("Ada", "Lovelace"));
//! let bob = directory.add_person(PersonDetails::named("Bob", "Babbage"));
//! let eva = directory.add_person(PersonDetails::named("Eva", "Noether"));
//!
//! // Ada knows Bob at strength 9; Bob knows Ada at strength 7.
//! directory.add_relation(ada, bob, 9, 7)?;
//! directory.add_relation(bob, eva, 8, 8)?;
//!
//! let route = knowbook::find_path(&directory, ada, eva, CostModel::Fastest)?;
//! assert_eq!(route.stops, vec![ada, bob, eva]);
//! # Ok::<(), knowbook::Error>(())
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod directory;
pub mod search;
pub mod order;
pub mod export;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{Address, Person, PersonDetails, PersonId, PostalCode, Relation, Strength};

// ============================================================================
// Re-exports: Directory and operations
// ============================================================================

pub use directory::{Directory, Upsert};
pub use order::SortKey;
pub use search::{CostModel, Route, find_path};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no person with id {0}")]
    NotFound(PersonId),

    #[error("acquaintance strength {0} is outside the valid range 1..=10")]
    InvalidStrength(u8),

    #[error("persons {0} and {1} are already acquainted")]
    DuplicateRelation(PersonId, PersonId),

    #[error("persons {0} and {1} are not acquainted")]
    NoRelation(PersonId, PersonId),

    #[error("no chain of acquaintances connects {0} to {1}")]
    Unreachable(PersonId, PersonId),

    #[error("operation needs two distinct persons, got {0} twice")]
    SelfReference(PersonId),

    #[error("malformed directory file at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
