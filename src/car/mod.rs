pub mod registry;

#[allow(clippy::module_inception)]
pub mod car;
pub mod cars;
pub mod types;
