//! The Directory — the address-book graph as a whole.
//!
//! Persons live in an arena of slots and are addressed by [`PersonId`]
//! through a side index, so removing one record never invalidates another.
//! The presentation order of the book is a separate id vector: creation
//! order at first, re-linkable by [`Directory::sort_by`].
//!
//! ## Invariants
//!
//! - A relation A→B exists iff B→A exists (paired edges, independent
//!   strengths).
//! - Every relation target names a live person; removal cascades through
//!   both edge directions before the record is reclaimed.
//! - Ids grow monotonically and are never reused, even after removal.
//! - A rejected mutation leaves no partial state.

use std::cmp::Ordering;

use hashbrown::HashMap;
use tracing::debug;

use crate::model::{Person, PersonDetails, PersonId, Relation, Strength};
use crate::order::{self, SortKey};
use crate::{Error, Result};

// ============================================================================
// Directory
// ============================================================================

/// The full collection of persons and their acquaintance relations.
#[derive(Debug, Default)]
pub struct Directory {
    /// Arena of person records. A slot is `None` once its person is removed;
    /// slots are never reused, ids never repeat.
    slots: Vec<Option<Person>>,
    /// id → arena slot.
    index: HashMap<PersonId, usize>,
    /// Presentation order of the book. Only ever holds live ids.
    order: Vec<PersonId>,
    /// Next id to hand out; strictly increasing.
    next_id: u64,
}

/// Outcome of [`Directory::upsert_person`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created(PersonId),
    Updated(PersonId),
}

impl Directory {
    pub fn new() -> Directory {
        Directory {
            slots: Vec::new(),
            index: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        }
    }

    /// Number of live persons.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The id the next created person will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Live persons in current presentation order.
    pub fn persons(&self) -> impl Iterator<Item = &Person> {
        self.order
            .iter()
            .filter_map(|id| self.index.get(id).and_then(|&slot| self.slots[slot].as_ref()))
    }

    /// Ids of live persons in current presentation order.
    pub fn ids(&self) -> impl Iterator<Item = PersonId> {
        self.order.iter().copied()
    }

    // ========================================================================
    // Person operations
    // ========================================================================

    /// Creates a person with the next id and appends it to the book.
    pub fn add_person(&mut self, details: PersonDetails) -> PersonId {
        let id = PersonId(self.next_id);
        self.next_id += 1;

        let slot = self.slots.len();
        self.slots.push(Some(Person::new(id, details)));
        self.index.insert(id, slot);
        self.order.push(id);

        debug!(%id, "person added");
        id
    }

    /// Adds a person, unless one with the same given name and surname already
    /// exists — in that case the existing record's address and phone are
    /// refreshed instead and no new id is assigned.
    pub fn upsert_person(&mut self, details: PersonDetails) -> Upsert {
        let existing = self
            .persons()
            .find(|p| p.given_name == details.given_name && p.surname == details.surname)
            .map(Person::id);

        match existing {
            Some(id) => {
                // the id lookup just came from a live record
                if let Ok(person) = self.person_mut(id) {
                    person.address = details.address;
                    person.phone = details.phone;
                }
                debug!(%id, "person updated in place");
                Upsert::Updated(id)
            }
            None => Upsert::Created(self.add_person(details)),
        }
    }

    /// Looks up a person by id.
    pub fn find(&self, id: PersonId) -> Option<&Person> {
        self.index
            .get(&id)
            .and_then(|&slot| self.slots[slot].as_ref())
    }

    /// Removes a person and every relation touching it, in both directions.
    pub fn remove(&mut self, id: PersonId) -> Result<()> {
        let slot = *self.index.get(&id).ok_or(Error::NotFound(id))?;
        let Some(person) = self.slots[slot].take() else {
            return Err(Error::NotFound(id));
        };

        // The outgoing list names exactly the persons holding a reverse
        // entry, so there is no need to rescan the whole book.
        for relation in person.relations() {
            if let Ok(neighbor) = self.person_mut(relation.target) {
                neighbor.relations.retain(|r| r.target != id);
            }
        }

        self.index.remove(&id);
        self.order.retain(|&pid| pid != id);
        debug!(%id, "person removed");
        Ok(())
    }

    // ========================================================================
    // Relation operations
    // ========================================================================

    /// Creates the paired relation between two distinct persons.
    ///
    /// `a_knows_b` and `b_knows_a` are the two independent strengths; both
    /// must be within 1..=10. Each side's entry is appended at the tail of
    /// its list, preserving edge-creation order.
    pub fn add_relation(
        &mut self,
        a: PersonId,
        b: PersonId,
        a_knows_b: u8,
        b_knows_a: u8,
    ) -> Result<()> {
        if a == b {
            return Err(Error::SelfReference(a));
        }
        let ab = Strength::new(a_knows_b).ok_or(Error::InvalidStrength(a_knows_b))?;
        let ba = Strength::new(b_knows_a).ok_or(Error::InvalidStrength(b_knows_a))?;

        // All checks run before either list is touched.
        self.person(b)?;
        if self.person(a)?.knows(b) {
            // Entries only ever come in pairs, so scanning a's list alone
            // also rules out a reverse entry on b's side.
            return Err(Error::DuplicateRelation(a, b));
        }

        self.person_mut(a)?.relations.push(Relation { target: b, strength: ab });
        self.person_mut(b)?.relations.push(Relation { target: a, strength: ba });
        debug!(%a, %b, "relation added");
        Ok(())
    }

    /// Destroys both directions of the relation between two persons.
    pub fn remove_relation(&mut self, a: PersonId, b: PersonId) -> Result<()> {
        if a == b {
            return Err(Error::SelfReference(a));
        }
        self.person(b)?;

        let side_a = self.person_mut(a)?;
        let Some(position) = side_a.relations.iter().position(|r| r.target == b) else {
            return Err(Error::NoRelation(a, b));
        };
        side_a.relations.remove(position);

        let side_b = self.person_mut(b)?;
        if let Some(position) = side_b.relations.iter().position(|r| r.target == a) {
            // always present, by the pairing invariant
            side_b.relations.remove(position);
        }

        debug!(%a, %b, "relation removed");
        Ok(())
    }

    /// Overwrites how well `a` knows `b`. The reverse direction keeps its
    /// strength — the two are independent.
    pub fn update_strength(&mut self, a: PersonId, b: PersonId, new_strength: u8) -> Result<()> {
        if a == b {
            return Err(Error::SelfReference(a));
        }
        let strength = Strength::new(new_strength).ok_or(Error::InvalidStrength(new_strength))?;

        self.person(b)?;
        let person = self.person_mut(a)?;
        let relation = person
            .relations
            .iter_mut()
            .find(|r| r.target == b)
            .ok_or(Error::NoRelation(a, b))?;
        relation.strength = strength;
        Ok(())
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    /// Re-links the presentation order by the chosen key. Stable: persons
    /// comparing equal keep their current relative order.
    pub fn sort_by(&mut self, key: SortKey) {
        let ids = std::mem::take(&mut self.order);
        self.order = order::merge_sort(ids, &|a, b| self.compare(*a, *b, key));
        debug!(?key, "directory re-ordered");
    }

    fn compare(&self, a: PersonId, b: PersonId, key: SortKey) -> Ordering {
        if key == SortKey::Id {
            return a.cmp(&b);
        }
        // `order` only holds live ids; an empty fallback keeps this total.
        let field = |id: PersonId| {
            self.find(id)
                .map(|p| match key {
                    SortKey::GivenName => p.given_name.as_str(),
                    _ => p.surname.as_str(),
                })
                .unwrap_or("")
        };
        order::cmp_case_insensitive(field(a), field(b))
    }

    // ========================================================================
    // Internal access and file restoration
    // ========================================================================

    pub(crate) fn person(&self, id: PersonId) -> Result<&Person> {
        self.find(id).ok_or(Error::NotFound(id))
    }

    fn person_mut(&mut self, id: PersonId) -> Result<&mut Person> {
        let slot = *self.index.get(&id).ok_or(Error::NotFound(id))?;
        self.slots[slot].as_mut().ok_or(Error::NotFound(id))
    }

    /// Empty directory with an explicit id counter, as read from a file
    /// header.
    pub(crate) fn restore(next_id: u64) -> Directory {
        Directory {
            next_id,
            ..Directory::new()
        }
    }

    /// Re-inserts a person under its persisted id, in file order.
    pub(crate) fn restore_person(&mut self, person: Person) {
        let id = person.id();
        let slot = self.slots.len();
        self.slots.push(Some(person));
        self.index.insert(id, slot);
        self.order.push(id);
    }

    /// Re-attaches one persisted outgoing relation. Returns `false` if
    /// either endpoint is unknown or the owner already lists the target;
    /// the file is corrupt in either case.
    pub(crate) fn restore_relation(&mut self, owner: PersonId, relation: Relation) -> bool {
        if self.find(relation.target).is_none() {
            return false;
        }
        match self.person_mut(owner) {
            Ok(person) if !person.knows(relation.target) => {
                person.relations.push(relation);
                true
            }
            _ => false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn person(directory: &mut Directory, given: &str, surname: &str) -> PersonId {
        directory.add_person(PersonDetails::named(given, surname))
    }

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let mut directory = Directory::new();
        let a = person(&mut directory, "Ada", "Lovelace");
        let b = person(&mut directory, "Bob", "Babbage");
        assert_eq!((a, b), (PersonId(1), PersonId(2)));

        directory.remove(b).unwrap();
        let c = person(&mut directory, "Cyd", "Cantor");
        assert_eq!(c, PersonId(3));
        assert_eq!(directory.len(), 2);
    }

    #[test]
    fn find_and_remove_unknown_id() {
        let mut directory = Directory::new();
        assert!(directory.find(PersonId(9)).is_none());
        assert!(matches!(directory.remove(PersonId(9)), Err(Error::NotFound(_))));
    }

    #[test]
    fn remove_cascades_through_both_edge_directions() {
        let mut directory = Directory::new();
        let a = person(&mut directory, "Ada", "Lovelace");
        let b = person(&mut directory, "Bob", "Babbage");
        let c = person(&mut directory, "Cyd", "Cantor");
        directory.add_relation(a, b, 5, 5).unwrap();
        directory.add_relation(a, c, 3, 8).unwrap();

        directory.remove(a).unwrap();

        assert!(directory.find(a).is_none());
        assert!(directory.find(b).unwrap().relations().is_empty());
        assert!(directory.find(c).unwrap().relations().is_empty());
        assert_eq!(directory.len(), 2);
    }

    #[test]
    fn strength_boundaries() {
        let mut directory = Directory::new();
        let a = person(&mut directory, "Ada", "Lovelace");
        let b = person(&mut directory, "Bob", "Babbage");

        assert!(matches!(
            directory.add_relation(a, b, 0, 5),
            Err(Error::InvalidStrength(0))
        ));
        assert!(matches!(
            directory.add_relation(a, b, 5, 11),
            Err(Error::InvalidStrength(11))
        ));
        // a rejected add must leave both lists untouched
        assert!(directory.find(a).unwrap().relations().is_empty());
        assert!(directory.find(b).unwrap().relations().is_empty());

        directory.add_relation(a, b, 1, 10).unwrap();
        assert_eq!(directory.find(a).unwrap().relations()[0].strength.get(), 1);
        assert_eq!(directory.find(b).unwrap().relations()[0].strength.get(), 10);
    }

    #[test]
    fn duplicate_relation_is_rejected_in_either_direction() {
        let mut directory = Directory::new();
        let a = person(&mut directory, "Ada", "Lovelace");
        let b = person(&mut directory, "Bob", "Babbage");
        directory.add_relation(a, b, 5, 5).unwrap();

        assert!(matches!(
            directory.add_relation(a, b, 6, 6),
            Err(Error::DuplicateRelation(_, _))
        ));
        assert!(matches!(
            directory.add_relation(b, a, 6, 6),
            Err(Error::DuplicateRelation(_, _))
        ));
        assert_eq!(directory.find(a).unwrap().relations().len(), 1);
        assert_eq!(directory.find(b).unwrap().relations().len(), 1);
    }

    #[test]
    fn add_relation_with_missing_person_mutates_nothing() {
        let mut directory = Directory::new();
        let a = person(&mut directory, "Ada", "Lovelace");

        assert!(matches!(
            directory.add_relation(a, PersonId(42), 5, 5),
            Err(Error::NotFound(_))
        ));
        assert!(directory.find(a).unwrap().relations().is_empty());
    }

    #[test]
    fn remove_relation_is_ok_then_no_relation() {
        let mut directory = Directory::new();
        let a = person(&mut directory, "Ada", "Lovelace");
        let b = person(&mut directory, "Bob", "Babbage");
        directory.add_relation(a, b, 5, 5).unwrap();

        directory.remove_relation(a, b).unwrap();
        assert!(directory.find(a).unwrap().relations().is_empty());
        assert!(directory.find(b).unwrap().relations().is_empty());

        assert!(matches!(
            directory.remove_relation(a, b),
            Err(Error::NoRelation(_, _))
        ));
    }

    #[test]
    fn update_strength_touches_one_direction_only() {
        let mut directory = Directory::new();
        let a = person(&mut directory, "Ada", "Lovelace");
        let b = person(&mut directory, "Bob", "Babbage");
        directory.add_relation(a, b, 5, 6).unwrap();

        directory.update_strength(a, b, 9).unwrap();
        assert_eq!(directory.find(a).unwrap().relations()[0].strength.get(), 9);
        assert_eq!(directory.find(b).unwrap().relations()[0].strength.get(), 6);

        assert!(matches!(
            directory.update_strength(a, b, 0),
            Err(Error::InvalidStrength(0))
        ));
        let c = person(&mut directory, "Cyd", "Cantor");
        assert!(matches!(
            directory.update_strength(a, c, 4),
            Err(Error::NoRelation(_, _))
        ));
    }

    #[test]
    fn self_reference_is_rejected_everywhere() {
        let mut directory = Directory::new();
        let a = person(&mut directory, "Ada", "Lovelace");

        assert!(matches!(directory.add_relation(a, a, 5, 5), Err(Error::SelfReference(_))));
        assert!(matches!(directory.remove_relation(a, a), Err(Error::SelfReference(_))));
        assert!(matches!(directory.update_strength(a, a, 5), Err(Error::SelfReference(_))));
    }

    #[test]
    fn upsert_refreshes_existing_record() {
        let mut directory = Directory::new();
        let a = person(&mut directory, "Ada", "Lovelace");

        let mut details = PersonDetails::named("Ada", "Lovelace");
        details.phone = 555_0100;
        assert_eq!(directory.upsert_person(details), Upsert::Updated(a));
        assert_eq!(directory.find(a).unwrap().phone, 555_0100);
        assert_eq!(directory.len(), 1);

        let other = directory.upsert_person(PersonDetails::named("Ada", "Byron"));
        assert!(matches!(other, Upsert::Created(_)));
        assert_eq!(directory.len(), 2);
    }

    #[test]
    fn upsert_leaves_the_middle_name_alone() {
        let mut directory = Directory::new();
        let mut details = PersonDetails::named("Anna", "Nowak");
        details.middle_name = Some("Maria".to_string());
        let anna = directory.add_person(details);

        // a refresh without a middle name must not erase the stored one
        let mut refresh = PersonDetails::named("Anna", "Nowak");
        refresh.phone = 555_0200;
        assert_eq!(directory.upsert_person(refresh), Upsert::Updated(anna));

        let person = directory.find(anna).unwrap();
        assert_eq!(person.middle_name.as_deref(), Some("Maria"));
        assert_eq!(person.phone, 555_0200);
    }

    #[test]
    fn sort_by_id_restores_creation_order() {
        let mut directory = Directory::new();
        let a = person(&mut directory, "Zoe", "Zephyr");
        let b = person(&mut directory, "Ada", "Abacki");
        directory.sort_by(SortKey::GivenName);
        assert_eq!(directory.ids().collect::<Vec<_>>(), vec![b, a]);

        directory.sort_by(SortKey::Id);
        assert_eq!(directory.ids().collect::<Vec<_>>(), vec![a, b]);
    }
}
