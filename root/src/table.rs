use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use serde_with::serde_as;

use crate::concepts::route::{Route, RouteId};
use crate::framework::RoutingSystem;

/// Owns every candidate route. Routes are keyed by an id that grows with each insertion,
/// iteration is therefore in insertion order.
#[cfg_attr(feature = "serde", serde_as)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct RouteTable<T: RoutingSystem + ?Sized> {
    #[cfg_attr(feature = "serde", serde_as(as = "Vec<(_, _)>"))]
    routes: BTreeMap<RouteId, Route<T>>,
    next_id: u64,
    capacity: usize,
}

impl<T: RoutingSystem + ?Sized> RouteTable<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            routes: BTreeMap::new(),
            next_id: 0,
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.routes.len() >= self.capacity
    }

    pub fn get(&self, id: RouteId) -> Option<&Route<T>> {
        self.routes.get(&id)
    }

    pub fn get_mut(&mut self, id: RouteId) -> Option<&mut Route<T>> {
        self.routes.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RouteId, &Route<T>)> {
        self.routes.iter().map(|(id, route)| (*id, route))
    }

    /// Snapshot of the current ids, for sweeps that may flush routes as they go
    pub fn ids(&self) -> Vec<RouteId> {
        self.routes.keys().copied().collect()
    }

    /// Exact match: the candidate for this prefix learned from this neighbour through this next hop
    pub fn find_route(
        &self,
        prefix: &T::Prefix,
        neigh: &T::NeighbourId,
        nexthop: &T::NextHop,
    ) -> Option<RouteId> {
        self.iter()
            .find(|(_, r)| r.neigh == *neigh && r.nexthop == *nexthop && r.prefix == *prefix)
            .map(|(id, _)| id)
    }

    /// The route currently programmed into the kernel for this prefix
    pub fn find_installed_route(&self, prefix: &T::Prefix) -> Option<RouteId> {
        self.iter()
            .find(|(_, r)| r.installed && r.prefix == *prefix)
            .map(|(id, _)| id)
    }

    pub fn routes_for<'a>(
        &'a self,
        prefix: &'a T::Prefix,
    ) -> impl Iterator<Item = (RouteId, &'a Route<T>)> + 'a {
        self.iter().filter(move |(_, r)| r.prefix == *prefix)
    }

    pub fn ids_for_neighbour(&self, neigh: &T::NeighbourId) -> Vec<RouteId> {
        self.iter()
            .filter(|(_, r)| r.neigh == *neigh)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn ids_for_interface(&self, itf: &T::InterfaceId) -> Vec<RouteId> {
        self.iter()
            .filter(|(_, r)| r.itf == *itf)
            .map(|(id, _)| id)
            .collect()
    }

    /// Stores a new route, returns None if the table is at capacity
    pub fn insert(&mut self, route: Route<T>) -> Option<RouteId> {
        if self.is_full() {
            return None;
        }
        let id = RouteId(self.next_id);
        self.next_id += 1;
        self.routes.insert(id, route);
        Some(id)
    }

    /// Drops a route from storage. This does not touch the kernel, see `Router::flush_route`.
    pub fn remove(&mut self, id: RouteId) -> Option<Route<T>> {
        self.routes.remove(&id)
    }
}
