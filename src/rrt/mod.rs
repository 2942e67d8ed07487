mod node;
pub mod pareto;
pub mod reactor;
mod rrt_star;
mod sampler;
mod tree;

pub use self::node::{NodeId, RRTNode};
pub use self::reactor::{Reactor, Rejection};
pub use self::rrt_star::{Extension, Growth, RRTStar};
pub use self::sampler::Sampler;
pub use self::tree::{COST_TOLERANCE, Tree};
