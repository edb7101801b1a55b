use crate::framework::RoutingSystem;
use crate::router::{Router, INF};
use crate::util::older_than;
use log::debug;

impl<T: RoutingSystem> Router<T> {
    /// Periodic sweep. Removes routes past the GC delay, retracts routes past the timeout delay,
    /// recomputes every other metric, and asks for a refresh of installed routes about to time out.
    pub fn expire_routes(&mut self, now: u64) {
        debug!("Expiring old routes.");
        self.flush_stale_kernel_routes();

        for id in self.table.ids() {
            let Some(route) = self.table.get(id) else {
                continue;
            };
            if older_than(route.time, now, self.params.route_gc_delay) {
                self.flush_route(now, id);
                continue;
            }

            self.update_route_metric(now, id);

            let Some(route) = self.table.get(id) else {
                continue;
            };
            if route.installed
                && route.refmetric < INF
                && older_than(route.time, now, self.params.route_refresh_delay())
            {
                let (neigh, prefix) = (route.neigh.clone(), route.prefix.clone());
                self.send_unicast_request(neigh, prefix);
            }
        }
    }

    /// We're overflowing the route table. Find some hopefully useless routes and drop them.
    pub fn drop_some_routes(&mut self, now: u64) {
        for id in self.table.ids() {
            let Some(route) = self.table.get(id) else {
                continue;
            };
            if older_than(route.time, now, self.params.route_drop_delay)
                && (!route.installed || !route.is_reachable())
            {
                self.flush_route(now, id);
            }
        }

        if !self.table.is_full() {
            return;
        }

        // We didn't manage to free a table entry just by dropping useless routes.
        // Let's take more drastic action, one route at a time.
        let victim = self
            .table
            .iter()
            .find(|(_, r)| !self.route_feasible(now, r))
            .or_else(|| self.table.iter().find(|(_, r)| !r.installed))
            .map(|(id, _)| id);

        if let Some(id) = victim {
            debug!("Evicting route {} to make room.", id);
            self.flush_route(now, id);
        }
    }
}
