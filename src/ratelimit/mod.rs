//! Rate limiting logic and state management.

mod counter;
mod limiter;
mod policy;

pub use counter::{CounterStore, WindowState};
pub use limiter::{Decision, RateLimiter};
pub use policy::RateLimitPolicy;
