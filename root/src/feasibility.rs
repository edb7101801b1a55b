//! The loop-avoidance gate. An update is only accepted if it carries fresher authority from its
//! origin (a newer seqno), or a strictly better claim at equal authority.

use crate::concepts::route::Route;
use crate::concepts::source::{Source, SourceTable};
use crate::framework::RoutingSystem;
use crate::router::{Router, INF};
use crate::util::{older_than, seqno_less_than};

/// Decides whether an update (seqno, refmetric) is safe to accept given what we know of its source
pub fn is_feasible<T: RoutingSystem + ?Sized>(
    source: Option<&Source<T>>,
    now: u64,
    stale_delay: u64,
    seqno: u16,
    refmetric: u16,
) -> bool {
    let Some(src) = source else {
        return true;
    };
    if older_than(src.time, now, stale_delay) {
        // never mind what is probably stale data
        return true;
    }
    if refmetric >= INF {
        // retractions are always feasible
        return true;
    }
    seqno_less_than(src.seqno, seqno) || (src.seqno == seqno && refmetric < src.metric)
}

impl<T: RoutingSystem> Router<T> {
    pub fn update_feasible(
        &self,
        now: u64,
        origin: &T::NodeAddress,
        prefix: &T::Prefix,
        seqno: u16,
        refmetric: u16,
    ) -> bool {
        is_feasible(
            self.sources.find(origin, prefix),
            now,
            self.params.source_stale_delay,
            seqno,
            refmetric,
        )
    }

    pub fn route_feasible(&self, now: u64, route: &Route<T>) -> bool {
        self.update_feasible(now, &route.origin, &route.prefix, route.seqno, route.refmetric)
    }
}
