//! Local key-value persistence for the AudienceLab SDK
//!
//! The SDK keeps a handful of small string values between runs: the cached
//! creative token, retention bookkeeping and running totals. This crate
//! defines the storage seam and two backends:
//!
//! - [`MemoryStore`], a process-local map for tests and ephemeral hosts
//! - [`FileStore`], a JSON file that plays the role browser local storage
//!   plays for the web SDK
//!
//! # Example
//!
//! ```rust,no_run
//! use audiencelab_config::StorageConfig;
//! use audiencelab_storage::StoreFactory;
//!
//! async fn open_store() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = StoreFactory::new().from_storage_config(&StorageConfig::default());
//!     store.set("creativeToken", "abc").await?;
//!     assert_eq!(store.get("creativeToken").await?.as_deref(), Some("abc"));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod factory;
pub mod file;
pub mod memory;
pub mod repository;

pub use error::StorageError;
pub use factory::StoreFactory;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use repository::KeyValueStore;
