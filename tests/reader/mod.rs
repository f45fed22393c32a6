#[path = "../common/support.rs"]
mod support;

mod properties;
mod resilience;
