//! Clay simulation
//!
//! Kinematics and bookkeeping only. Nothing in here knows about timers; the
//! exercise layer decides when to launch and when to tick.

pub mod clay;
pub mod registry;
pub mod sampler;
pub mod score;

pub use clay::{Clay, ClayContext, ClayId};
pub use registry::ClayRegistry;
pub use sampler::{Direction, Flight, VelocitySampler};
pub use score::ScoreTracker;
