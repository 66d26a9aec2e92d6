//! End-to-end directory scenarios: mutations, cascading removal, ordering.

use knowbook::{CostModel, Directory, Error, PersonDetails, PersonId, SortKey, find_path};

fn add(directory: &mut Directory, given: &str, surname: &str) -> PersonId {
    directory.add_person(PersonDetails::named(given, surname))
}

/// Every relation must have a reverse entry, and every target must be live.
fn assert_well_formed(directory: &Directory) {
    for person in directory.persons() {
        for relation in person.relations() {
            let target = directory
                .find(relation.target)
                .unwrap_or_else(|| panic!("{} -> {} dangles", person.id(), relation.target));
            assert!(
                target.knows(person.id()),
                "{} -> {} has no reverse entry",
                person.id(),
                relation.target
            );
        }
    }
}

// ============================================================================
// 1. A long mutation session keeps the graph well formed
// ============================================================================

#[test]
fn mutation_session_preserves_invariants() {
    let mut directory = Directory::new();
    let a = add(&mut directory, "Ada", "Abacki");
    let b = add(&mut directory, "Bob", "Babbage");
    let c = add(&mut directory, "Cyd", "Cantor");
    let d = add(&mut directory, "Dag", "Dedekind");

    directory.add_relation(a, b, 5, 5).unwrap();
    directory.add_relation(a, c, 2, 9).unwrap();
    directory.add_relation(b, c, 7, 7).unwrap();
    directory.add_relation(c, d, 1, 10).unwrap();
    assert_well_formed(&directory);

    directory.remove_relation(a, c).unwrap();
    assert_well_formed(&directory);

    directory.update_strength(b, c, 10).unwrap();
    assert_well_formed(&directory);

    directory.remove(c).unwrap();
    assert_well_formed(&directory);
    assert_eq!(directory.len(), 3);
    assert!(directory.find(b).unwrap().relations().iter().all(|r| r.target != c));
    assert!(directory.find(d).unwrap().relations().is_empty());
}

// ============================================================================
// 2. Removing an intermediary breaks the only route
// ============================================================================

#[test]
fn removing_the_intermediary_disconnects_the_chain() {
    let mut directory = Directory::new();
    let a = add(&mut directory, "Ada", "Abacki");
    let b = add(&mut directory, "Bob", "Babbage");
    let c = add(&mut directory, "Cyd", "Cantor");
    directory.add_relation(a, b, 5, 5).unwrap();
    directory.add_relation(b, c, 5, 5).unwrap();

    assert!(find_path(&directory, a, c, CostModel::Fastest).is_ok());

    directory.remove(b).unwrap();
    assert_well_formed(&directory);
    assert!(matches!(
        find_path(&directory, a, c, CostModel::Fastest),
        Err(Error::Unreachable(_, _))
    ));
}

// ============================================================================
// 3. Sorting by surname is case-insensitive
// ============================================================================

#[test]
fn sort_by_surname_ignores_case() {
    let mut directory = Directory::new();
    let kowalski = add(&mut directory, "Jan", "kowalski");
    let abacki = add(&mut directory, "Ewa", "Abacki");
    let nowicki = add(&mut directory, "Ola", "Nowicki");
    let glowacki = add(&mut directory, "Tom", "glowacki");

    directory.sort_by(SortKey::Surname);
    assert_eq!(
        directory.ids().collect::<Vec<_>>(),
        vec![abacki, glowacki, kowalski, nowicki]
    );
}

// ============================================================================
// 4. Sorting is stable under repeated keys
// ============================================================================

#[test]
fn sort_is_stable_for_equal_surnames() {
    let mut directory = Directory::new();
    let first = add(&mut directory, "Anna", "Nowak");
    let zofia = add(&mut directory, "Zofia", "Abacki");
    let second = add(&mut directory, "Ewa", "Nowak");
    let third = add(&mut directory, "Jan", "NOWAK");

    directory.sort_by(SortKey::Surname);
    assert_eq!(
        directory.ids().collect::<Vec<_>>(),
        vec![zofia, first, second, third]
    );

    // sorting an already sorted book changes nothing
    let before: Vec<_> = directory.ids().collect();
    directory.sort_by(SortKey::Surname);
    assert_eq!(directory.ids().collect::<Vec<_>>(), before);
}

// ============================================================================
// 5. Sorting by given name, then back by id
// ============================================================================

#[test]
fn sort_by_given_name_and_back_by_id() {
    let mut directory = Directory::new();
    let zoe = add(&mut directory, "Zoe", "Abacki");
    let ada = add(&mut directory, "ada", "Babbage");
    let mia = add(&mut directory, "Mia", "Cantor");

    directory.sort_by(SortKey::GivenName);
    assert_eq!(directory.ids().collect::<Vec<_>>(), vec![ada, mia, zoe]);

    directory.sort_by(SortKey::Id);
    assert_eq!(directory.ids().collect::<Vec<_>>(), vec![zoe, ada, mia]);
}

// ============================================================================
// 6. Sorting never disturbs the graph itself
// ============================================================================

#[test]
fn sorting_keeps_relations_intact() {
    let mut directory = Directory::new();
    let a = add(&mut directory, "Zoe", "Zephyr");
    let b = add(&mut directory, "Ada", "Abacki");
    directory.add_relation(a, b, 6, 3).unwrap();

    directory.sort_by(SortKey::Surname);
    assert_well_formed(&directory);
    assert_eq!(directory.find(a).unwrap().relations()[0].strength.get(), 6);
    assert_eq!(directory.find(b).unwrap().relations()[0].strength.get(), 3);

    let route = find_path(&directory, a, b, CostModel::Fastest).unwrap();
    assert_eq!(route.stops, vec![a, b]);
}
