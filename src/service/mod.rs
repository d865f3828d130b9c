//! Remote services consumed by the battle core
//!
//! Both services are optional: every call site has a local fallback.

pub mod client;
pub mod decision;
pub mod generation;

pub use client::ServiceClient;
pub use decision::DecisionService;
pub use generation::MonsterService;
