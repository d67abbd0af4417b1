//! # HTTP Adapters
//!
//! reqwest-backed implementations of the indexer and backend ports.
//!
//! | Adapter | Port | Endpoint |
//! |---------|------|----------|
//! | [`HttpIndexer`] | `IndexerReader` | `GET /projects/{ref}`, `GET /v2/funding-applications/{ref}`, `GET /communities/{uid}/admins` |
//! | [`HttpApplicationStatusGateway`] | `ApplicationStatusGateway` | `PUT /v2/funding-applications/{ref}/status` |
//! | [`HttpPermissionChecker`] | `PermissionChecker` | `GET /v2/programs/{id}/permissions` |
//! | [`HttpOffChainRevoker`] | `OffChainRevoker` | `POST /attestations/revoke-offchain` |

mod api;
mod backend;
mod indexer;

pub use api::ApiClient;
pub use backend::{HttpApplicationStatusGateway, HttpOffChainRevoker, HttpPermissionChecker};
pub use indexer::HttpIndexer;
