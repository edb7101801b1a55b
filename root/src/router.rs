use crate::concepts::kernel::KernelEntry;
use crate::concepts::packet::{OutboundPacket, Packet};
use crate::concepts::route::{Route, RouteId};
use crate::concepts::neighbour::NeighbourTable;
use crate::concepts::policy::InputFilter;
use crate::concepts::source::SourceTable;
use crate::feedback::UpdateRejected;
use crate::framework::{ProtocolParams, RoutingSystem};
use crate::table::RouteTable;
use crate::util::{older_than, sum_inf};
use log::{debug, trace, warn};
use std::collections::HashMap;

pub const INF: u16 = 0xFFFF;

/// The route table of one router, together with the collaborators it drives.
///
/// Every operation runs to completion before returning. Outgoing advertisements and requests
/// are queued on `outbound_packets` for the caller to send.
pub struct Router<T: RoutingSystem + ?Sized> {
    pub params: ProtocolParams,
    pub table: RouteTable<T>,
    pub outbound_packets: Vec<OutboundPacket<T>>,
    pub sources: T::Sources,
    pub neighbours: T::Neighbours,
    pub kernel: T::Kernel,
    pub exports: T::Exports,
    pub requests: T::Requests,
    pub filter: T::Filter,
    /// Kernel entries of routes that left the table while the kernel refused to flush them
    pub stale_kernel: HashMap<T::Prefix, KernelEntry<T>>,
}

impl<T: RoutingSystem> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RoutingSystem> Router<T> {
    pub fn new() -> Self {
        Self::with_config(T::config())
    }

    pub fn with_config(params: ProtocolParams) -> Self {
        Self {
            table: RouteTable::new(params.max_routes),
            params,
            outbound_packets: Vec::new(),
            sources: Default::default(),
            neighbours: Default::default(),
            kernel: Default::default(),
            exports: Default::default(),
            requests: Default::default(),
            filter: Default::default(),
            stale_kernel: HashMap::new(),
        }
    }

    // region Queries
    pub fn get(&self, id: RouteId) -> Option<&Route<T>> {
        self.table.get(id)
    }

    pub fn is_installed(&self, id: RouteId) -> bool {
        self.table.get(id).is_some_and(|r| r.installed)
    }

    pub fn find_installed_route(&self, prefix: &T::Prefix) -> Option<RouteId> {
        self.table.find_installed_route(prefix)
    }

    pub fn installed_routes(&self) -> impl Iterator<Item = (RouteId, &Route<T>)> {
        self.table.iter().filter(|(_, r)| r.installed)
    }

    /// Returns the route with the smallest metric for this prefix. Routes that have timed out are
    /// never returned, nor unfeasible ones if `feasible` is set. Ties go to the oldest route.
    pub fn find_best_route(
        &self,
        now: u64,
        prefix: &T::Prefix,
        feasible: bool,
        exclude: Option<&T::NeighbourId>,
    ) -> Option<RouteId> {
        let mut best: Option<(RouteId, u16)> = None;
        for (id, route) in self.table.routes_for(prefix) {
            if older_than(route.time, now, self.params.route_timeout_delay) {
                continue;
            }
            if feasible && !self.route_feasible(now, route) {
                continue;
            }
            if exclude.is_some_and(|n| *n == route.neigh) {
                continue;
            }
            if best.is_some_and(|(_, metric)| metric <= route.metric) {
                continue;
            }
            best = Some((id, route.metric));
        }
        best.map(|(id, _)| id)
    }

    /// JSON dump of the table, for diagnostics
    #[cfg(feature = "serde")]
    pub fn snapshot(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(&self.table)?)
    }
    // endregion

    // region Interface
    pub(crate) fn write_packet(&mut self, neigh: Option<T::NeighbourId>, packet: Packet<T>) {
        trace!("Queueing {:?} for {:?}", packet, neigh);
        self.outbound_packets.push(OutboundPacket { neigh, packet });
    }

    pub fn drain_packets(&mut self) -> Vec<OutboundPacket<T>> {
        std::mem::take(&mut self.outbound_packets)
    }
    // endregion

    /// This is called whenever we receive an update. Returns the route that now holds the update.
    ///
    /// An unfeasible update to a route we already have is still applied, so that a successor
    /// switching sources can break a loop. An unfeasible update for a new route is dropped.
    #[allow(clippy::too_many_arguments)]
    pub fn update_route(
        &mut self,
        now: u64,
        origin: &T::NodeAddress,
        prefix: &T::Prefix,
        seqno: u16,
        refmetric: u16,
        neigh: &T::NeighbourId,
        nexthop: &T::NextHop,
    ) -> Result<RouteId, UpdateRejected> {
        if self.filter.martian(prefix) {
            warn!("Rejecting martian route to {:?} through {:?}.", prefix, origin);
            return Err(UpdateRejected::Martian);
        }

        let Some(itf) = self.neighbours.interface(neigh) else {
            debug!("Ignoring update for {:?} from unknown neighbour {:?}.", prefix, neigh);
            return Err(UpdateRejected::UnknownNeighbour);
        };

        let add_metric = self.filter.penalty(origin, prefix, neigh, &itf);
        if add_metric >= INF {
            debug!("Filtered update for {:?} from {:?}.", prefix, neigh);
            return Err(UpdateRejected::Filtered);
        }

        if self.sources.find_or_create(origin, prefix, seqno, now).is_none() {
            return Err(UpdateRejected::NoSource);
        }

        let feasible = self.update_feasible(now, origin, prefix, seqno, refmetric);
        let metric = sum_inf(sum_inf(refmetric, self.neighbours.cost(neigh)), add_metric);

        let existing = self
            .table
            .find_route(prefix, neigh, nexthop)
            .and_then(|id| self.table.get(id).map(|r| (id, r.origin.clone(), r.metric, r.installed)));

        if let Some((id, old_origin, old_metric, installed)) = existing {
            let mut lost = false;

            if !feasible && installed {
                debug!(
                    "Unfeasible update for installed route to {:?} ({:?} -> {:?} {} {}).",
                    prefix, old_origin, origin, seqno, refmetric
                );
                lost = self.uninstall_route(id);
            }

            if let Some(route) = self.table.get_mut(id) {
                route.origin = origin.clone();
                if feasible && refmetric < INF {
                    route.time = now;
                    if route.refmetric >= INF {
                        route.origtime = now;
                    }
                }
                route.seqno = seqno;
                route.refmetric = refmetric;
            }
            self.change_route_metric(id, metric);

            if feasible {
                self.trigger_route_change(now, id, &old_origin, old_metric);
            } else {
                self.send_unfeasible_request(metric, origin, prefix);
            }

            if lost {
                self.route_lost(now, &old_origin, prefix, old_metric);
            }
            Ok(id)
        } else {
            if !feasible {
                self.send_unfeasible_request(metric, origin, prefix);
                return Err(UpdateRejected::Unfeasible);
            }
            if refmetric >= INF {
                // somebody is retracting a route we never saw
                return Err(UpdateRejected::UnknownRetraction);
            }
            if self.table.is_full() {
                self.drop_some_routes(now);
            }
            let Some(id) = self.table.insert(Route {
                prefix: prefix.clone(),
                origin: origin.clone(),
                neigh: neigh.clone(),
                nexthop: nexthop.clone(),
                itf,
                seqno,
                refmetric,
                metric,
                time: now,
                origtime: now,
                installed: false,
            }) else {
                warn!(
                    "Too many routes ({}) -- ignoring update for {:?} from {:?}.",
                    self.table.capacity(),
                    prefix,
                    neigh
                );
                return Err(UpdateRejected::TableFull);
            };
            self.consider_route(now, id);
            Ok(id)
        }
    }

    /// Removes a route. If it was installed, it is uninstalled first and a replacement is sought.
    pub fn flush_route(&mut self, now: u64, id: RouteId) {
        let Some(route) = self.table.get(id) else {
            return;
        };
        let lost = route.installed;
        if lost {
            // the route leaves the table even if the kernel refuses to let go of it
            self.release_route(id);
        }
        let Some(route) = self.table.remove(id) else {
            return;
        };
        if lost {
            self.route_lost(now, &route.origin, &route.prefix, route.metric);
        }
    }

    /// Removes every route learned from a neighbour, typically because it went away
    pub fn flush_neighbour_routes(&mut self, now: u64, neigh: &T::NeighbourId) {
        for id in self.table.ids_for_neighbour(neigh) {
            self.flush_route(now, id);
        }
    }

    /// Recomputes a route's metric from its advertised metric and the current link cost, or
    /// retracts it if it has not been refreshed in time.
    pub fn update_route_metric(&mut self, now: u64, id: RouteId) {
        let Some(route) = self.table.get(id) else {
            return;
        };
        let old_origin = route.origin.clone();
        let old_metric = route.metric;

        let new_metric = if older_than(route.time, now, self.params.route_timeout_delay) {
            if route.refmetric < INF {
                let next_seqno = self
                    .sources
                    .find(&route.origin, &route.prefix)
                    .map(|src| crate::util::increment_by(src.seqno, 1));
                if let Some(route) = self.table.get_mut(id) {
                    if let Some(seqno) = next_seqno {
                        route.seqno = seqno;
                    }
                    route.refmetric = INF;
                }
            }
            INF
        } else {
            let penalty = self
                .filter
                .penalty(&route.origin, &route.prefix, &route.neigh, &route.itf);
            sum_inf(sum_inf(route.refmetric, self.neighbours.cost(&route.neigh)), penalty)
        };

        self.change_route_metric(id, new_metric);
        self.trigger_route_change(now, id, &old_origin, old_metric);
    }

    /// Call after a neighbour's link cost changed
    pub fn update_neighbour_metric(&mut self, now: u64, neigh: &T::NeighbourId) {
        for id in self.table.ids_for_neighbour(neigh) {
            self.update_route_metric(now, id);
        }
    }

    /// Call after the cost of every link on an interface changed
    pub fn update_network_metric(&mut self, now: u64, itf: &T::InterfaceId) {
        for id in self.table.ids_for_interface(itf) {
            self.update_route_metric(now, id);
        }
    }
}
