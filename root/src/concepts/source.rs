use crate::framework::RoutingSystem;
use crate::router::INF;
use educe::Educe;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What we know about an origin's announcements of one prefix. The table only reads these
/// records, they are owned and kept current by whoever sends our own updates.
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct Source<T: RoutingSystem + ?Sized> {
    pub addr: T::NodeAddress,
    pub prefix: T::Prefix,
    /// best seqno known for this source
    pub seqno: u16,
    /// best metric advertised at `seqno`, the feasibility distance
    pub metric: u16,
    pub time: u64,
}

impl<T: RoutingSystem + ?Sized> Source<T> {
    /// The seqno to ask for when we need fresher information from this origin
    pub fn wanted_seqno(&self) -> u16 {
        if self.metric >= INF {
            self.seqno
        } else {
            crate::util::increment_by(self.seqno, 1)
        }
    }
}

pub trait SourceTable<T: RoutingSystem + ?Sized> {
    fn find(&self, addr: &T::NodeAddress, prefix: &T::Prefix) -> Option<&Source<T>>;
    /// Looks up a source, creating it with the observed seqno, an infinite metric and the time `now`
    /// if it does not exist yet. Returns None if no record could be created.
    fn find_or_create(
        &mut self,
        addr: &T::NodeAddress,
        prefix: &T::Prefix,
        seqno: u16,
        now: u64,
    ) -> Option<&Source<T>>;
}

impl<T: RoutingSystem + ?Sized> SourceTable<T> for HashMap<(T::NodeAddress, T::Prefix), Source<T>> {
    fn find(&self, addr: &T::NodeAddress, prefix: &T::Prefix) -> Option<&Source<T>> {
        self.get(&(addr.clone(), prefix.clone()))
    }

    fn find_or_create(
        &mut self,
        addr: &T::NodeAddress,
        prefix: &T::Prefix,
        seqno: u16,
        now: u64,
    ) -> Option<&Source<T>> {
        let source = self
            .entry((addr.clone(), prefix.clone()))
            .or_insert_with(|| Source {
                addr: addr.clone(),
                prefix: prefix.clone(),
                seqno,
                metric: INF,
                time: now,
            });
        Some(&*source)
    }
}
