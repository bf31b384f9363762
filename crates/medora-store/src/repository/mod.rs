//! # Repository Module
//!
//! Handles onto the shared store state.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command                                                                │
//! │       │                                                                 │
//! │       │  store.tables().query(Query::table("health_files"))            │
//! │       ▼                                                                 │
//! │  TableRepository                    StorageRepository                  │
//! │  ├── query / query_single           ├── upload_file                    │
//! │  ├── insert                         ├── public_url                     │
//! │  ├── update                         └── object                         │
//! │  ├── delete                                                             │
//! │  └── count                                                              │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  RwLock<tables>                      RwLock<objects>                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`TableRepository`](table::TableRepository) - Row operations
//! - [`StorageRepository`](storage::StorageRepository) - Bucket operations

pub mod storage;
pub mod table;
