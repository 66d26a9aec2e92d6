//! Path search — Dijkstra over the acquaintance graph, under one of two
//! cost models.
//!
//! All run state (distance, hop count, predecessor) is local to one
//! [`find_path`] call; nothing leaks between runs and nothing is stored on
//! the person records.

mod heap;

use hashbrown::HashMap;
use tracing::debug;

use crate::directory::Directory;
use crate::model::PersonId;
use crate::{Error, Result};

use heap::{MinHeap, UNREACHED};

/// How traversing one relation is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostModel {
    /// Every relation costs 1: minimizes the number of intermediaries.
    Fastest,
    /// A relation of strength `s`, crossed after `h` hops, costs
    /// `(h + 1) * (11 − s)`: close acquaintances are cheap, and long chains
    /// of weak links are penalized harder than short ones.
    Strongest,
}

/// A found chain of acquaintances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Persons along the chain, source first, target last.
    pub stops: Vec<PersonId>,
    /// Total cost under the model the search ran with.
    pub cost: u64,
}

impl Route {
    /// Number of relations traversed.
    pub fn hops(&self) -> usize {
        self.stops.len().saturating_sub(1)
    }
}

/// Finds the best chain of acquaintances from `source` to `target`.
///
/// Fastest mode stops the instant the target turns up as a neighbor of the
/// extracted minimum — with unit edge costs the first relaxation reaching
/// the target is already optimal. Strongest mode has no such shortcut and
/// runs until the heap is exhausted or only unreachable persons remain.
pub fn find_path(
    directory: &Directory,
    source: PersonId,
    target: PersonId,
    model: CostModel,
) -> Result<Route> {
    if source == target {
        return Err(Error::SelfReference(source));
    }
    directory.person(source)?;
    directory.person(target)?;

    let mut scratch = Scratch::new(source);
    let mut heap = MinHeap::build(directory.ids(), source);
    debug!(%source, %target, ?model, "path search started");

    while let Some(min) = heap.extract_min() {
        if min.distance == UNREACHED {
            // everyone reachable from the source has been settled; the rest
            // of the heap is a different component
            break;
        }

        for relation in directory.person(min.person)?.relations() {
            let cost = match model {
                CostModel::Fastest => min.distance + 1,
                CostModel::Strongest => {
                    let hops = u64::from(scratch.hops_of(min.person)) + 1;
                    min.distance + hops * u64::from(11 - relation.strength.get())
                }
            };

            if cost < scratch.distance_of(relation.target) {
                heap.decrease_distance(relation.target, cost);
                scratch.distance.insert(relation.target, cost);
                scratch.predecessor.insert(relation.target, min.person);
                if model == CostModel::Strongest {
                    scratch
                        .hops
                        .insert(relation.target, scratch.hops_of(min.person) + 1);
                }
            }

            if model == CostModel::Fastest && relation.target == target {
                return scratch.reconstruct(source, target);
            }
        }
    }

    scratch.reconstruct(source, target)
}

// ============================================================================
// Run-local scratch state
// ============================================================================

struct Scratch {
    /// Best known distance per reached person; absent means [`UNREACHED`].
    distance: HashMap<PersonId, u64>,
    /// Hops from the source on the current best path (strongest mode only).
    hops: HashMap<PersonId, u32>,
    /// Back-reference chain; the source has none.
    predecessor: HashMap<PersonId, PersonId>,
}

impl Scratch {
    fn new(source: PersonId) -> Scratch {
        let mut distance = HashMap::new();
        distance.insert(source, 0);
        Scratch {
            distance,
            hops: HashMap::new(),
            predecessor: HashMap::new(),
        }
    }

    fn distance_of(&self, person: PersonId) -> u64 {
        self.distance.get(&person).copied().unwrap_or(UNREACHED)
    }

    fn hops_of(&self, person: PersonId) -> u32 {
        self.hops.get(&person).copied().unwrap_or(0)
    }

    /// Walks the predecessor chain back from the target and reverses it
    /// into presentation order.
    fn reconstruct(&self, source: PersonId, target: PersonId) -> Result<Route> {
        let cost = self.distance_of(target);
        if cost == UNREACHED {
            debug!(%source, %target, "no chain of acquaintances found");
            return Err(Error::Unreachable(source, target));
        }

        let mut stops = vec![target];
        let mut current = target;
        while let Some(&previous) = self.predecessor.get(&current) {
            stops.push(previous);
            current = previous;
        }
        stops.reverse();

        debug!(%source, %target, cost, hops = stops.len() - 1, "chain found");
        Ok(Route { stops, cost })
    }
}
