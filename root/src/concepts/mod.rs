pub mod kernel;
pub mod neighbour;
pub mod packet;
pub mod policy;
pub mod route;
pub mod source;
