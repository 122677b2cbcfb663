//! FibLab HTTP Server - Binary Entry Point
//!
//! This is the main entry point for the fiblab-server binary.
//! The core implementation is in the library crate.

use fiblab_core::TrackingAllocator;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fiblab_server::run().await
}
