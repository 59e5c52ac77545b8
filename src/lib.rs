//! Fixture Catalog
//!
//! A contract fixture engine: loads catalogs of recorded HTTP interactions
//! from JSON documents, answers live requests with deterministic stub
//! responses, and captures live exchanges into the same representation.
//!
//! # Features
//!
//! - **Suffix Matching**: A recorded path matches any URL ending with it
//! - **Consume Once**: Repeated requests walk through matching interactions,
//!   then keep returning the last one
//! - **Templates**: `idReference` clones an earlier interaction and overlays it
//! - **File References**: `fileReference` pulls a JSON fragment from disk
//! - **Shared Variables**: Consumer and provider variables across documents
//! - **Capture**: Record a live request/response pair as a fixture
//!
//! # Example Document
//!
//! ```json
//! {
//!   "consumer": { "baseUrl": "https://api.example.com" },
//!   "interactions": [
//!     {
//!       "id": "list-users",
//!       "request": { "method": "GET", "path": "https://api.example.com/v1/users" },
//!       "response": { "status": 200, "body": { "users": [] } }
//!     },
//!     {
//!       "idReference": "list-users",
//!       "response": { "status": 503 }
//!     }
//!   ]
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod exchange;
pub mod interaction;
pub mod merge;
pub mod reference;

pub use catalog::{InteractionCatalog, MatchDelegate};
pub use config::CatalogConfig;
pub use error::FixtureError;
pub use exchange::{HttpRequest, HttpResponse, ResponseArtifact};
pub use interaction::Interaction;
pub use reference::{FileProvider, FsFileProvider, MemoryFileProvider};
