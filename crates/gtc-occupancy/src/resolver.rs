//! Deterministic right-of-way for requests made in the same tick.
//!
//! The resolver holds no state between ticks.  It orders a tick's batch by
//!
//! 1. priority class (emergency, then arrival, then departure),
//! 2. earlier spawn tick,
//! 3. lower aircraft id,
//!
//! and submits each request to the [`OccupancyManager`] in that order.  A
//! request refused on an element granted earlier in the same batch is
//! reported as [`DenyReason::LostTieBreak`].  Refusals caused by standing
//! reservations keep their own reason, even when the blocker also won
//! something else this tick.

use std::collections::{BTreeMap, BTreeSet};

use log::trace;

use gtc_core::{AircraftId, PriorityClass, Tick, TimeWindow};

use crate::element::{Claim, Decision, Denial, DenyReason, Element};
use crate::manager::OccupancyManager;

/// One aircraft's claims for this tick.
#[derive(Clone, Debug)]
pub struct ClaimRequest {
    pub aircraft:   AircraftId,
    pub priority:   PriorityClass,
    pub spawn_tick: Tick,
    pub claims:     Vec<Claim>,
}

impl ClaimRequest {
    /// Sort key; lower wins.
    #[inline]
    pub fn key(&self) -> (PriorityClass, Tick, AircraftId) {
        (self.priority, self.spawn_tick, self.aircraft)
    }
}

/// Outcome of one batch.
#[derive(Clone, Debug, Default)]
pub struct Resolution {
    /// Decisions in the order they were made (highest right of way first).
    pub outcomes:  Vec<(AircraftId, Decision)>,
    /// Elements named by two or more requests in the batch, ascending.
    pub contested: Vec<Element>,
}

impl Resolution {
    pub fn decision_for(&self, aircraft: AircraftId) -> Option<&Decision> {
        self.outcomes.iter().find(|(a, _)| *a == aircraft).map(|(_, d)| d)
    }

    pub fn granted(&self) -> impl Iterator<Item = AircraftId> + '_ {
        self.outcomes.iter().filter(|(_, d)| d.is_granted()).map(|(a, _)| *a)
    }

    pub fn denied_count(&self) -> usize {
        self.outcomes.iter().filter(|(_, d)| !d.is_granted()).count()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictResolver;

impl ConflictResolver {
    pub fn new() -> Self {
        ConflictResolver
    }

    /// Resolve and commit one tick's batch.
    pub fn resolve(
        &self,
        mut requests: Vec<ClaimRequest>,
        manager:      &mut OccupancyManager,
        window:       TimeWindow,
    ) -> Resolution {
        requests.sort_by_key(ClaimRequest::key);

        let mut seen: BTreeMap<Element, usize> = BTreeMap::new();
        for req in &requests {
            let distinct: BTreeSet<Element> = req.claims.iter().map(|c| c.element).collect();
            for el in distinct {
                *seen.entry(el).or_default() += 1;
            }
        }
        let contested = seen.into_iter().filter(|&(_, n)| n > 1).map(|(el, _)| el).collect();

        // element -> aircraft granted it in this batch
        let mut granted: BTreeMap<Element, AircraftId> = BTreeMap::new();
        let mut outcomes = Vec::with_capacity(requests.len());
        for req in requests {
            let decision = match manager.request_all(req.aircraft, &req.claims, window) {
                Decision::Granted => {
                    for c in &req.claims {
                        granted.entry(c.element).or_insert(req.aircraft);
                    }
                    Decision::Granted
                }
                Decision::Denied(d) if granted.get(&d.element) == Some(&d.reason.blocker()) => {
                    let winner = d.reason.blocker();
                    trace!("{} yields {} to {winner}", req.aircraft, d.element);
                    Decision::Denied(Denial {
                        element: d.element,
                        reason:  DenyReason::LostTieBreak { winner },
                    })
                }
                denied => denied,
            };
            outcomes.push((req.aircraft, decision));
        }

        Resolution { outcomes, contested }
    }
}
