// --- File: crates/audiencelab_common/src/lib.rs ---

pub mod error; // Error taxonomy shared by every crate
pub mod http; // HTTP client construction and status mapping
pub mod logging; // Tracing subscriber setup
pub mod models; // Shared data structures
pub mod services; // Collaborator traits

pub use error::{config_error, HttpStatusCode, SdkError};

pub use http::{create_client, map_status};

pub use logging::{init, init_from_config, init_with_level, log_error};

pub use models::DeviceMetrics;

pub use services::{Clock, DeviceProbe, SystemClock};
