use std::collections::HashMap;

use educe::Educe;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::framework::RoutingSystem;
use crate::router::INF;

#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct Neighbour<T: RoutingSystem + ?Sized> {
    /// the local interface over which this neighbour is reachable
    pub itf: T::InterfaceId,
    /// Direct link-cost to this neighbour, INF if the link is down. Lower is better.
    pub link_cost: u16,
}

/// Neighbour and link discovery, as seen by the route table
pub trait NeighbourTable<T: RoutingSystem + ?Sized> {
    /// Current cost of the link to a neighbour, INF if the neighbour is unknown or unreachable
    fn cost(&self, neigh: &T::NeighbourId) -> u16;
    fn interface(&self, neigh: &T::NeighbourId) -> Option<T::InterfaceId>;
}

impl<T: RoutingSystem + ?Sized> NeighbourTable<T> for HashMap<T::NeighbourId, Neighbour<T>> {
    fn cost(&self, neigh: &T::NeighbourId) -> u16 {
        self.get(neigh).map_or(INF, |n| n.link_cost)
    }

    fn interface(&self, neigh: &T::NeighbourId) -> Option<T::InterfaceId> {
        self.get(neigh).map(|n| n.itf.clone())
    }
}
