pub mod allocator;
pub mod autosave;
pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod registry;
pub mod serial;
pub mod server;
pub mod session;
pub mod store;
pub mod world;

pub use allocator::{AllocatorConfig, SerialAllocator};
pub use error::{AllocError, WorldError};
pub use message::{Directive, Notification};
pub use registry::Registry;
pub use serial::Serial;
pub use server::serve;
pub use world::{Entity, SharedWorld, World};
