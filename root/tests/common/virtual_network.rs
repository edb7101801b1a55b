use std::collections::{HashMap, HashSet, VecDeque};

use log::LevelFilter;
use root_rib::concepts::kernel::{KernelEntry, KernelOp, KernelRoutes};
use root_rib::concepts::neighbour::Neighbour;
use root_rib::concepts::packet::{OutboundPacket, Packet};
use root_rib::concepts::policy::InputFilter;
use root_rib::concepts::route::RouteId;
use root_rib::concepts::source::Source;
use root_rib::feedback::{KernelError, UpdateRejected};
use root_rib::framework::{ProtocolParams, RoutingSystem};
use root_rib::router::Router;
use simplelog::{Config, TestLogger};

pub const PREFIX: &str = "10.0.0.0/24";
pub const T0: u64 = 1_000;

pub struct VirtualSystem;

impl RoutingSystem for VirtualSystem {
    type NodeAddress = String;
    type Prefix = String;
    type NeighbourId = String;
    type NextHop = String;
    type InterfaceId = u32;
    type Sources = HashMap<(String, String), Source<Self>>;
    type Neighbours = HashMap<String, Neighbour<Self>>;
    type Kernel = VirtualKernel;
    type Exports = HashSet<String>;
    type Requests = HashSet<(String, u16, String)>;
    type Filter = VirtualFilter;
}

/// Records every kernel call and keeps a forwarding table. Queued failures are returned, in
/// order, by the next kernel calls instead of applying them.
#[derive(Default)]
pub struct VirtualKernel {
    pub ops: Vec<KernelOp<VirtualSystem>>,
    pub fib: HashMap<String, KernelEntry<VirtualSystem>>,
    pub failures: VecDeque<KernelError>,
}

impl KernelRoutes<VirtualSystem> for VirtualKernel {
    fn kernel_route(&mut self, op: &KernelOp<VirtualSystem>) -> Result<(), KernelError> {
        self.ops.push(op.clone());
        if let Some(err) = self.failures.pop_front() {
            return Err(err);
        }
        match op {
            KernelOp::Add(entry) => {
                if self.fib.contains_key(&entry.prefix) {
                    return Err(KernelError::AlreadyExists);
                }
                self.fib.insert(entry.prefix.clone(), entry.clone());
            }
            KernelOp::Flush(entry) => {
                if self.fib.remove(&entry.prefix).is_none() {
                    return Err(KernelError::NotFound);
                }
            }
            KernelOp::Modify { new, .. } => {
                self.fib.insert(new.prefix.clone(), new.clone());
            }
        }
        Ok(())
    }
}

impl VirtualKernel {
    pub fn count(&self, name: &str) -> usize {
        self.ops.iter().filter(|op| op.name() == name).count()
    }
}

#[derive(Default)]
pub struct VirtualFilter {
    pub martians: HashSet<String>,
    /// penalty per neighbour
    pub penalties: HashMap<String, u16>,
}

impl InputFilter<VirtualSystem> for VirtualFilter {
    fn martian(&self, prefix: &String) -> bool {
        self.martians.contains(prefix)
    }

    fn penalty(&self, _origin: &String, _prefix: &String, neigh: &String, _itf: &u32) -> u16 {
        self.penalties.get(neigh).copied().unwrap_or(0)
    }
}

pub fn init_logging() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}

pub fn router() -> Router<VirtualSystem> {
    router_with(ProtocolParams::default())
}

pub fn router_with(params: ProtocolParams) -> Router<VirtualSystem> {
    init_logging();
    Router::with_config(params)
}

pub fn add_neighbour(router: &mut Router<VirtualSystem>, neigh: &str, itf: u32, link_cost: u16) {
    router
        .neighbours
        .insert(neigh.to_string(), Neighbour { itf, link_cost });
}

pub fn set_link_cost(router: &mut Router<VirtualSystem>, neigh: &str, link_cost: u16) {
    if let Some(n) = router.neighbours.get_mut(neigh) {
        n.link_cost = link_cost;
    }
}

pub fn nexthop(neigh: &str) -> String {
    format!("fe80::{neigh}")
}

/// Delivers an advertisement for `prefix` from `neigh`, through the neighbour's own address
pub fn advertise(
    router: &mut Router<VirtualSystem>,
    now: u64,
    origin: &str,
    prefix: &str,
    seqno: u16,
    refmetric: u16,
    neigh: &str,
) -> Result<RouteId, UpdateRejected> {
    router.update_route(
        now,
        &origin.to_string(),
        &prefix.to_string(),
        seqno,
        refmetric,
        &neigh.to_string(),
        &nexthop(neigh),
    )
}

pub fn set_source(
    router: &mut Router<VirtualSystem>,
    origin: &str,
    prefix: &str,
    seqno: u16,
    metric: u16,
    time: u64,
) {
    router.sources.insert(
        (origin.to_string(), prefix.to_string()),
        Source {
            addr: origin.to_string(),
            prefix: prefix.to_string(),
            seqno,
            metric,
            time,
        },
    );
}

pub fn installed(router: &Router<VirtualSystem>, prefix: &str) -> Option<RouteId> {
    router.find_installed_route(&prefix.to_string())
}

pub fn metric_of(router: &Router<VirtualSystem>, id: RouteId) -> u16 {
    router.get(id).unwrap_or_else(|| panic!("No route {id}")).metric
}

/// At most one installed route per destination, and the kernel agrees with the installed flags
pub fn assert_consistent(router: &Router<VirtualSystem>) {
    let mut seen = HashSet::new();
    for (id, route) in router.installed_routes() {
        assert!(
            seen.insert(route.prefix.clone()),
            "more than one installed route to {}",
            route.prefix
        );
        let entry = router
            .kernel
            .fib
            .get(&route.prefix)
            .unwrap_or_else(|| panic!("installed route {id} missing from the kernel"));
        assert_eq!(entry.nexthop, route.nexthop);
    }
}

pub fn drain(router: &mut Router<VirtualSystem>) -> Vec<OutboundPacket<VirtualSystem>> {
    router.drain_packets()
}

pub fn update(prefix: &str, urgent: bool) -> OutboundPacket<VirtualSystem> {
    OutboundPacket {
        neigh: None,
        packet: Packet::RouteUpdate {
            prefix: prefix.to_string(),
            urgent,
        },
    }
}

pub fn seqno_request(prefix: &str, origin: &str, seqno: u16) -> OutboundPacket<VirtualSystem> {
    OutboundPacket {
        neigh: None,
        packet: Packet::SeqnoRequest {
            prefix: prefix.to_string(),
            origin: origin.to_string(),
            seqno,
        },
    }
}

pub fn request(prefix: &str, neigh: Option<&str>) -> OutboundPacket<VirtualSystem> {
    OutboundPacket {
        neigh: neigh.map(str::to_string),
        packet: Packet::RouteRequest {
            prefix: prefix.to_string(),
        },
    }
}
