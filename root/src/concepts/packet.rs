use crate::framework::RoutingSystem;
use educe::Educe;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub enum Packet<T: RoutingSystem + ?Sized> {
    /// advertise our current route to this prefix, an urgent update should be sent immediately
    /// rather than folded into the next periodic update
    RouteUpdate { prefix: T::Prefix, urgent: bool },
    /// ask for a routine update of this prefix
    RouteRequest { prefix: T::Prefix },
    /// ask the origin for an update carrying at least this seqno, resent until satisfied
    SeqnoRequest {
        prefix: T::Prefix,
        origin: T::NodeAddress,
        seqno: u16,
    },
}

#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct OutboundPacket<T: RoutingSystem + ?Sized> {
    /// send only to this neighbour, or to every neighbour if None
    pub neigh: Option<T::NeighbourId>,
    pub packet: Packet<T>,
}
