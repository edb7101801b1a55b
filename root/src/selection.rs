use crate::concepts::policy::ExportedRoutes;
use crate::concepts::route::RouteId;
use crate::framework::RoutingSystem;
use crate::router::{Router, INF};
use log::debug;

/// Improvement needed before switching to a route from a different origin
pub const SWITCH_SOURCE_MARGIN: u32 = 192;
/// Improvement needed before switching to another route from the same origin
pub const SWITCH_ROUTE_MARGIN: u32 = 96;

/// Whether a candidate should replace the installed route for its destination
pub fn should_switch(installed_metric: u16, candidate_metric: u16, same_origin: bool) -> bool {
    if candidate_metric >= INF {
        return false;
    }
    let installed = installed_metric as u32;
    let candidate = candidate_metric as u32;
    if installed_metric >= INF || installed >= candidate + SWITCH_SOURCE_MARGIN {
        return true;
    }
    // avoid switching sources
    same_origin && installed >= candidate + SWITCH_ROUTE_MARGIN
}

impl<T: RoutingSystem> Router<T> {
    /// Takes a feasible route and decides whether to install it
    pub fn consider_route(&mut self, now: u64, id: RouteId) {
        let Some(route) = self.table.get(id) else {
            return;
        };
        if route.installed || !self.route_feasible(now, route) || self.exports.covers(&route.prefix) {
            return;
        }
        let prefix = route.prefix.clone();

        let installed = self
            .table
            .find_installed_route(&prefix)
            .and_then(|iid| self.table.get(iid).map(|r| (iid, r.origin.clone(), r.metric)));

        if let Some((_, installed_origin, installed_metric)) = &installed {
            if !should_switch(*installed_metric, route.metric, *installed_origin == route.origin) {
                return;
            }
        }
        debug!(
            "Switching route to {:?} to {} via {:?} (metric {}).",
            prefix, id, route.neigh, route.metric
        );

        self.change_route(installed.as_ref().map(|(iid, _, _)| *iid), id);
        match installed {
            Some((_, old_origin, old_metric)) if self.is_installed(id) => {
                self.send_triggered_update(id, &old_origin, old_metric);
            }
            _ => self.send_update(prefix, true),
        }
    }
}
