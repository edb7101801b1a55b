//! The route table of a distance-vector routing daemon.
//!
//! [`router::Router`] holds every candidate route learned from neighbours, decides which one to
//! use per destination, keeps the kernel's forwarding table in sync with that choice, and queues
//! the advertisements and requests that drive convergence. It performs no I/O of its own beyond
//! the kernel calls: the caller feeds it updates and periodic ticks, and drains its outbound queue.

pub mod concepts;
pub mod feasibility;
pub mod feedback;
pub mod framework;
pub mod kernel_sync;
pub mod maintenance;
pub mod propagation;
pub mod router;
pub mod selection;
pub mod table;
pub mod util;

#[cfg(test)]
mod test_system;
