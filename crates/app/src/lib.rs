//! Rootcraft application wiring: configuration, logging, the HTTP orders client, file-backed
//! storage and the storefront context handed to front-ends.

pub mod config;
pub mod context;
pub mod navigation;
pub mod observability;
pub mod orders;
pub mod storage;
