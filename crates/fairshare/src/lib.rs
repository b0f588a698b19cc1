pub mod common;
pub mod config;
pub mod replay;

pub type Error = common::error::FairShareError;
pub type Result<T> = std::result::Result<T, Error>;
