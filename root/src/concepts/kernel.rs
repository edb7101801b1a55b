use crate::feedback::KernelError;
use crate::framework::RoutingSystem;
use educe::Educe;

/// A forwarding entry as the kernel sees it
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
pub struct KernelEntry<T: RoutingSystem + ?Sized> {
    pub prefix: T::Prefix,
    pub nexthop: T::NextHop,
    pub itf: T::InterfaceId,
    /// metric on the kernel's scale
    pub metric: u32,
}

#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
pub enum KernelOp<T: RoutingSystem + ?Sized> {
    Add(KernelEntry<T>),
    Flush(KernelEntry<T>),
    /// Replaces `old` with `new` in a single operation. Both entries are for the same prefix.
    Modify {
        old: KernelEntry<T>,
        new: KernelEntry<T>,
    },
}

impl<T: RoutingSystem + ?Sized> KernelOp<T> {
    pub fn name(&self) -> &'static str {
        match self {
            KernelOp::Add(_) => "ADD",
            KernelOp::Flush(_) => "FLUSH",
            KernelOp::Modify { .. } => "MODIFY",
        }
    }
}

/// The operating system's route syscall layer
pub trait KernelRoutes<T: RoutingSystem + ?Sized> {
    fn kernel_route(&mut self, op: &KernelOp<T>) -> Result<(), KernelError>;
}
