use crate::concepts::packet::Packet;
use crate::concepts::policy::RequestTracker;
use crate::concepts::route::RouteId;
use crate::concepts::source::SourceTable;
use crate::framework::RoutingSystem;
use crate::router::{Router, INF};
use crate::selection::SWITCH_ROUTE_MARGIN;
use log::debug;

impl<T: RoutingSystem> Router<T> {
    // region Outbound
    pub(crate) fn send_update(&mut self, prefix: T::Prefix, urgent: bool) {
        self.write_packet(None, Packet::RouteUpdate { prefix, urgent });
    }

    /// Broadcast request for a routine update, no new seqno needed
    pub(crate) fn send_request(&mut self, prefix: T::Prefix) {
        self.write_packet(None, Packet::RouteRequest { prefix });
    }

    pub(crate) fn send_unicast_request(&mut self, neigh: T::NeighbourId, prefix: T::Prefix) {
        self.write_packet(Some(neigh), Packet::RouteRequest { prefix });
    }

    /// Asks the origin for a fresher seqno than the one we know of
    pub(crate) fn send_request_resend(&mut self, origin: &T::NodeAddress, prefix: &T::Prefix) {
        let Some(seqno) = self.sources.find(origin, prefix).map(|src| src.wanted_seqno()) else {
            debug!("No source for {:?} from {:?}, not requesting a seqno.", prefix, origin);
            return;
        };
        self.write_packet(
            None,
            Packet::SeqnoRequest {
                prefix: prefix.clone(),
                origin: origin.clone(),
                seqno,
            },
        );
    }
    // endregion

    /// We just lost the installed route to a given destination
    pub fn route_lost(&mut self, now: u64, origin: &T::NodeAddress, prefix: &T::Prefix, old_metric: u16) {
        if let Some(new_route) = self.find_best_route(now, prefix, true, None) {
            self.consider_route(now, new_route);
        } else {
            // complain loudly
            self.send_update(prefix.clone(), true);
            if old_metric < INF {
                self.send_request_resend(origin, prefix);
            }
        }
    }

    /// A route has just changed. Decide whether to switch to a different route or send an update.
    pub fn trigger_route_change(
        &mut self,
        now: u64,
        id: RouteId,
        old_origin: &T::NodeAddress,
        old_metric: u16,
    ) {
        let Some(route) = self.table.get(id) else {
            return;
        };
        if route.installed {
            if route.metric > old_metric {
                let metric = route.metric as u32;
                let prefix = route.prefix.clone();
                if let Some(better) = self.find_best_route(now, &prefix, true, None) {
                    let better_metric = self.table.get(better).map_or(INF, |r| r.metric) as u32;
                    if better_metric + SWITCH_ROUTE_MARGIN <= metric {
                        self.consider_route(now, better);
                    }
                }
            }
            if self.is_installed(id) {
                self.send_triggered_update(id, old_origin, old_metric);
            }
        } else {
            // reconsider routes even when their metric didn't decrease,
            // they may not have been feasible before
            self.consider_route(now, id);
        }
    }

    /// Sends an update for an installed route if it changed enough to matter, and asks for a new
    /// seqno if it got much worse.
    pub fn send_triggered_update(&mut self, id: RouteId, old_origin: &T::NodeAddress, old_metric: u16) {
        let Some(route) = self.table.get(id) else {
            return;
        };
        if !route.installed {
            return;
        }
        let prefix = route.prefix.clone();
        let origin = route.origin.clone();
        let new = route.metric as u32;
        let old = old_metric as u32;
        let inf = INF as u32;

        // switching sources can cause transient routing loops, and losing or regaining
        // reachability must be heard quickly
        let mut urgent = origin != *old_origin || ((old < inf) != (new < inf));
        if new >= old + 512 || old >= new + 512 {
            urgent = true;
        }
        // make sure that requests are satisfied speedily
        if self.requests.unsatisfied(&prefix, route.seqno, &origin) {
            urgent = true;
        }

        if urgent || new >= old + 256 || old >= new + 256 {
            self.send_update(prefix.clone(), urgent);
        }

        if old < inf {
            if new >= inf || new >= old + 384 {
                self.send_request_resend(&origin, &prefix);
            } else if new >= old + 288 {
                self.send_request(prefix);
            }
        }
    }

    /// We just received an unfeasible update. If it's any good, send a request for a new seqno.
    pub fn send_unfeasible_request(&mut self, metric: u16, origin: &T::NodeAddress, prefix: &T::Prefix) {
        if self.sources.find(origin, prefix).is_none() {
            return;
        }
        let installed_metric = self
            .table
            .find_installed_route(prefix)
            .and_then(|id| self.table.get(id))
            .map(|r| r.metric);

        if installed_metric.map_or(true, |m| m as u32 >= metric as u32 + 256) {
            self.send_request_resend(origin, prefix);
        }
    }
}
