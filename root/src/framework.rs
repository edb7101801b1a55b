use std::fmt::Debug;
use std::hash::Hash;

#[cfg(feature = "serde")]
use anyhow::Context;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::concepts::kernel::KernelRoutes;
use crate::concepts::neighbour::NeighbourTable;
use crate::concepts::policy::{ExportedRoutes, InputFilter, RequestTracker};
use crate::concepts::source::SourceTable;

/// Describes one deployment of the route table: the identities it routes on, and the
/// collaborators that own everything the table only refers to.
pub trait RoutingSystem {
    /// Identity of the router originating a route, MUST be globally unique
    type NodeAddress: RootData + RootKey;
    /// A destination (prefix and length)
    type Prefix: RootData + RootKey;
    type NeighbourId: RootData + RootKey;
    /// Address of the next hop on the physical network, may not be globally unique
    type NextHop: RootData + RootKey;
    type InterfaceId: RootData + RootKey;

    /// Per-origin seqno/metric bookkeeping
    type Sources: SourceTable<Self> + Default;
    /// Link costs and the interface each neighbour sits on
    type Neighbours: NeighbourTable<Self> + Default;
    /// The operating system's forwarding table
    type Kernel: KernelRoutes<Self> + Default;
    /// Locally originated routes, which take precedence over learned ones
    type Exports: ExportedRoutes<Self> + Default;
    type Requests: RequestTracker<Self> + Default;
    type Filter: InputFilter<Self> + Default;

    fn config() -> ProtocolParams {
        Default::default()
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "serde")] {
        use serde::de::DeserializeOwned;

        pub trait RootData: Clone + Debug + Serialize + DeserializeOwned + Sized {}
        impl<T: Clone + Debug + Serialize + DeserializeOwned + Sized> RootData for T {}
    } else {
        pub trait RootData: Clone + Debug + Sized {}
        impl<T: Clone + Debug + Sized> RootData for T {}
    }
}

pub trait RootKey: Eq + PartialEq + Hash {}
impl<T: Eq + PartialEq + Hash> RootKey for T {}

/// Route table tunables. All delays are in seconds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ProtocolParams {
    /// maximum number of candidate routes held at once
    pub max_routes: usize,
    /// a route not refreshed for this long is unreachable
    pub route_timeout_delay: u64,
    /// a route not refreshed for this long is removed
    pub route_gc_delay: u64,
    /// a source record older than this is not trusted by the feasibility check
    pub source_stale_delay: u64,
    /// under capacity pressure, uninstalled or unreachable routes older than this are dropped
    pub route_drop_delay: u64,
    /// installed routes get a refresh request this long before they time out
    pub route_refresh_margin: u64,
    /// added to every metric programmed into the kernel
    pub kernel_metric: u32,
    /// the kernel's notion of an unreachable metric
    pub kernel_infinity: u32,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            max_routes: 1024,
            route_timeout_delay: 160,
            route_gc_delay: 180,
            source_stale_delay: 200,
            route_drop_delay: 90,
            route_refresh_margin: 25,
            kernel_metric: 0,
            kernel_infinity: 0xFFFF,
        }
    }
}

impl ProtocolParams {
    /// Age after which an installed route is refreshed with a unicast request
    pub fn route_refresh_delay(&self) -> u64 {
        self.route_timeout_delay
            .saturating_sub(self.route_refresh_margin)
            .max(10)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.max_routes > 0, "max_routes must be at least 1");
        anyhow::ensure!(
            self.route_gc_delay >= self.route_timeout_delay,
            "route_gc_delay ({}) is shorter than route_timeout_delay ({})",
            self.route_gc_delay,
            self.route_timeout_delay
        );
        anyhow::ensure!(self.kernel_infinity > 0, "kernel_infinity must be non-zero");
        Ok(())
    }

    /// Parses and validates parameters from JSON, missing fields take their default value
    #[cfg(feature = "serde")]
    pub fn from_json(data: &str) -> anyhow::Result<Self> {
        let params: ProtocolParams =
            serde_json::from_str(data).context("Failed to parse protocol parameters")?;
        params.validate().context("Invalid protocol parameters")?;
        Ok(params)
    }
}
