//! Person record — one individual in the directory.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{Address, Relation};

/// Opaque person identifier. Assigned once by the directory, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonId(pub u64);

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The attributes of a person, as supplied by the caller when creating or
/// updating a record. Identity (the id) and the relation list are managed by
/// the directory and are deliberately absent here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDetails {
    pub given_name: String,
    pub middle_name: Option<String>,
    pub surname: String,
    pub address: Address,
    pub phone: u64,
}

impl PersonDetails {
    /// Minimal record: names only, empty address, no phone. Convenient for
    /// callers that only care about the graph side of the directory.
    pub fn named(given_name: &str, surname: &str) -> PersonDetails {
        PersonDetails {
            given_name: given_name.to_string(),
            middle_name: None,
            surname: surname.to_string(),
            address: Address::default(),
            phone: 0,
        }
    }
}

/// A person in the directory: identity, attributes, and the outgoing
/// acquaintance list (in edge-creation order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    id: PersonId,
    pub given_name: String,
    pub middle_name: Option<String>,
    pub surname: String,
    pub address: Address,
    pub phone: u64,
    pub(crate) relations: SmallVec<[Relation; 4]>,
}

impl Person {
    pub(crate) fn new(id: PersonId, details: PersonDetails) -> Person {
        Person {
            id,
            given_name: details.given_name,
            middle_name: details.middle_name,
            surname: details.surname,
            address: details.address,
            phone: details.phone,
            relations: SmallVec::new(),
        }
    }

    pub fn id(&self) -> PersonId {
        self.id
    }

    /// Outgoing relations, oldest first.
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn knows(&self, other: PersonId) -> bool {
        self.relations.iter().any(|r| r.target == other)
    }
}
