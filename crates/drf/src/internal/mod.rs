#[macro_use]
pub(crate) mod common;
pub(crate) mod application;
pub(crate) mod ledger;
pub(crate) mod manager;
pub(crate) mod priority;
pub(crate) mod queue;
pub(crate) mod registry;
pub mod resources;

#[cfg(test)]
pub(crate) mod tests;
