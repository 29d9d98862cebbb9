pub mod config;
pub mod core;
pub mod host;
pub mod instancing;
pub mod placement;
pub mod plugin;
pub mod queue;
pub mod registry;
pub mod runner;
pub mod shapes;
pub mod stack;

pub use stack::ScatterStackPlugin;
