use std::collections::HashSet;

use crate::framework::RoutingSystem;

/// Routes this node originates itself
pub trait ExportedRoutes<T: RoutingSystem + ?Sized> {
    /// Whether a local route already covers this prefix
    fn covers(&self, prefix: &T::Prefix) -> bool;
}

impl<T: RoutingSystem + ?Sized> ExportedRoutes<T> for HashSet<T::Prefix> {
    fn covers(&self, prefix: &T::Prefix) -> bool {
        self.contains(prefix)
    }
}

/// Pending request tracking
pub trait RequestTracker<T: RoutingSystem + ?Sized> {
    /// Whether a request for this prefix at this seqno from this origin is still outstanding
    fn unsatisfied(&self, prefix: &T::Prefix, seqno: u16, origin: &T::NodeAddress) -> bool;
}

impl<T: RoutingSystem + ?Sized> RequestTracker<T> for HashSet<(T::Prefix, u16, T::NodeAddress)> {
    fn unsatisfied(&self, prefix: &T::Prefix, seqno: u16, origin: &T::NodeAddress) -> bool {
        self.contains(&(prefix.clone(), seqno, origin.clone()))
    }
}

/// Administrative filtering of incoming advertisements
pub trait InputFilter<T: RoutingSystem + ?Sized> {
    /// Destinations that must never be routed, checked before anything else
    fn martian(&self, prefix: &T::Prefix) -> bool;
    /// Extra metric for an advertisement, INF or more rejects it outright
    fn penalty(
        &self,
        origin: &T::NodeAddress,
        prefix: &T::Prefix,
        neigh: &T::NeighbourId,
        itf: &T::InterfaceId,
    ) -> u16;
}
