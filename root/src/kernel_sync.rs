use crate::concepts::kernel::{KernelEntry, KernelOp, KernelRoutes};
use crate::concepts::route::{Route, RouteId};
use crate::feedback::KernelError;
use crate::framework::RoutingSystem;
use crate::router::Router;
use crate::util::metric_to_kernel;
use log::{error, warn};

impl<T: RoutingSystem> Router<T> {
    fn kernel_entry(&self, route: &Route<T>, metric: u16) -> KernelEntry<T> {
        KernelEntry {
            prefix: route.prefix.clone(),
            nexthop: route.nexthop.clone(),
            itf: route.itf.clone(),
            metric: metric_to_kernel(metric, self.params.kernel_metric, self.params.kernel_infinity),
        }
    }

    fn set_installed(&mut self, id: RouteId, installed: bool) {
        if let Some(route) = self.table.get_mut(id) {
            route.installed = installed;
        }
    }

    /// Programs a route into the kernel. Does nothing if it is already installed.
    pub fn install_route(&mut self, id: RouteId) {
        let Some(route) = self.table.get(id) else {
            return;
        };
        if route.installed {
            return;
        }
        let entry = self.kernel_entry(route, route.metric);
        // a leftover entry for this prefix is overwritten rather than added next to
        let stale = self.stale_kernel.get(&entry.prefix).cloned();
        let op = match stale {
            Some(old) => KernelOp::Modify { old, new: entry },
            None => KernelOp::Add(entry),
        };

        match self.kernel.kernel_route(&op) {
            Ok(()) => {}
            Err(KernelError::AlreadyExists) => {
                warn!("kernel_route({}) for {:?}: route already exists", op.name(), route_prefix(&op));
            }
            Err(err) => {
                error!("kernel_route({}) failed for {:?}: {err}", op.name(), route_prefix(&op));
                return;
            }
        }
        self.stale_kernel.remove(route_prefix(&op));
        self.set_installed(id, true);
    }

    /// Removes a route from the kernel. Returns whether the route is no longer installed.
    pub fn uninstall_route(&mut self, id: RouteId) -> bool {
        let Some(route) = self.table.get(id) else {
            return true;
        };
        if !route.installed {
            return true;
        }
        let op = KernelOp::Flush(self.kernel_entry(route, route.metric));

        match self.kernel.kernel_route(&op) {
            Ok(()) | Err(KernelError::NotFound) => {}
            Err(err) => {
                error!("kernel_route({}) failed for {:?}: {err}", op.name(), route_prefix(&op));
                return false;
            }
        }
        self.set_installed(id, false);
        true
    }

    /// Uninstalls a route that is about to leave the table. If the kernel refuses, its entry is
    /// remembered so that the next route installed for the prefix replaces it.
    pub(crate) fn release_route(&mut self, id: RouteId) {
        if self.uninstall_route(id) {
            return;
        }
        if let Some(route) = self.table.get(id) {
            let entry = self.kernel_entry(route, route.metric);
            self.stale_kernel.insert(entry.prefix.clone(), entry);
        }
    }

    /// Retries the removal of kernel entries left behind by refused flushes
    pub fn flush_stale_kernel_routes(&mut self) {
        let prefixes: Vec<T::Prefix> = self.stale_kernel.keys().cloned().collect();
        for prefix in prefixes {
            let Some(entry) = self.stale_kernel.get(&prefix) else {
                continue;
            };
            let op = KernelOp::Flush(entry.clone());
            match self.kernel.kernel_route(&op) {
                Ok(()) | Err(KernelError::NotFound) => {
                    self.stale_kernel.remove(&prefix);
                }
                Err(err) => {
                    error!("kernel_route({}) failed for {:?}: {err}", op.name(), prefix);
                }
            }
        }
    }

    /// Equivalent to uninstalling `old` and installing `new`, without leaving the destination
    /// unreachable in between. Both routes must be for the same prefix.
    pub fn change_route(&mut self, old: Option<RouteId>, new: RouteId) {
        let Some(old) = old else {
            self.install_route(new);
            return;
        };
        let (Some(old_route), Some(new_route)) = (self.table.get(old), self.table.get(new)) else {
            return;
        };
        if !old_route.installed {
            return;
        }
        debug_assert!(old_route.prefix == new_route.prefix);

        let op = KernelOp::Modify {
            old: self.kernel_entry(old_route, old_route.metric),
            new: self.kernel_entry(new_route, new_route.metric),
        };
        match self.kernel.kernel_route(&op) {
            Ok(()) => {
                self.set_installed(old, false);
                self.set_installed(new, true);
            }
            Err(err) => {
                error!("kernel_route({}) failed for {:?}: {err}", op.name(), route_prefix(&op));
            }
        }
    }

    /// Sets a route's metric, updating the kernel first if the route is installed.
    /// Returns false, leaving the old metric in place, if the kernel refused the change.
    pub fn change_route_metric(&mut self, id: RouteId, new_metric: u16) -> bool {
        let Some(route) = self.table.get(id) else {
            return false;
        };
        if route.installed {
            let op = KernelOp::Modify {
                old: self.kernel_entry(route, route.metric),
                new: self.kernel_entry(route, new_metric),
            };
            if let Err(err) = self.kernel.kernel_route(&op) {
                error!("kernel_route({}) failed for {:?}: {err}", op.name(), route_prefix(&op));
                return false;
            }
        }
        if let Some(route) = self.table.get_mut(id) {
            route.metric = new_metric;
        }
        true
    }
}

fn route_prefix<T: RoutingSystem + ?Sized>(op: &KernelOp<T>) -> &T::Prefix {
    match op {
        KernelOp::Add(entry) | KernelOp::Flush(entry) => &entry.prefix,
        KernelOp::Modify { new, .. } => &new.prefix,
    }
}
