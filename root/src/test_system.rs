//! A minimal deployment for unit tests: string identities, a kernel that always succeeds, and
//! no filtering.

use std::collections::{HashMap, HashSet};

use crate::concepts::kernel::{KernelOp, KernelRoutes};
use crate::concepts::neighbour::Neighbour;
use crate::concepts::policy::InputFilter;
use crate::concepts::source::Source;
use crate::feedback::KernelError;
use crate::framework::RoutingSystem;

pub struct TestSystem;

#[derive(Default)]
pub struct NullKernel;

impl KernelRoutes<TestSystem> for NullKernel {
    fn kernel_route(&mut self, _op: &KernelOp<TestSystem>) -> Result<(), KernelError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct NoFilter;

impl InputFilter<TestSystem> for NoFilter {
    fn martian(&self, _prefix: &String) -> bool {
        false
    }

    fn penalty(&self, _origin: &String, _prefix: &String, _neigh: &String, _itf: &u32) -> u16 {
        0
    }
}

impl RoutingSystem for TestSystem {
    type NodeAddress = String;
    type Prefix = String;
    type NeighbourId = String;
    type NextHop = String;
    type InterfaceId = u32;
    type Sources = HashMap<(String, String), Source<Self>>;
    type Neighbours = HashMap<String, Neighbour<Self>>;
    type Kernel = NullKernel;
    type Exports = HashSet<String>;
    type Requests = HashSet<(String, u16, String)>;
    type Filter = NoFilter;
}
