use crate::framework::RoutingSystem;
use educe::Educe;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable handle to a route in the table. Ids are never reused, so a stale handle simply stops
/// resolving once its route is flushed. Lower ids were inserted earlier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteId(pub u64);

impl Display for RouteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A candidate path to a destination through one neighbour
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct Route<T: RoutingSystem + ?Sized> {
    /// the destination of this route
    pub prefix: T::Prefix,
    /// the router that originated this route, together with `prefix` this names the source
    pub origin: T::NodeAddress,
    /// the neighbour that advertised this route
    pub neigh: T::NeighbourId,
    /// the next-hop address of this route
    pub nexthop: T::NextHop,
    /// the interface the neighbour is reachable over
    pub itf: T::InterfaceId,
    /// the origin's seqno, as advertised
    pub seqno: u16,
    /// the metric with which this route was advertised by the neighbour, or FFFF hexadecimal (infinity) for a retracted route
    pub refmetric: u16,
    /// refmetric + link cost + filter penalty, INF if unreachable
    pub metric: u16,
    /// last time this route was refreshed by a feasible update
    pub time: u64,
    /// last time this route became reachable
    pub origtime: u64,
    /// whether this route is programmed into the kernel
    pub installed: bool,
}

impl<T: RoutingSystem + ?Sized> Route<T> {
    pub fn is_reachable(&self) -> bool {
        self.metric < crate::router::INF
    }
}
