// acslink-api: Async Rust client for the northbound REST interface of a TR-069 ACS

pub mod client;
pub mod devices;
pub mod error;
pub mod models;
pub mod tasks;
pub mod transport;

pub use client::{AcsClient, BasicAuth};
pub use error::Error;
pub use models::{AcsDevice, DeviceIdentity, Task, TaskReceipt};
pub use transport::{TlsMode, TransportConfig};
