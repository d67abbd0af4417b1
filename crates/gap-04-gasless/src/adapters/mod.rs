//! # Adapters
//!
//! Provider strategies, the sponsored signer and the HTTP bundler transport.

pub mod alchemy;
pub mod http;
pub mod memory;
pub mod signer;
pub mod zerodev;

pub use alchemy::AlchemyProvider;
pub use http::HttpBundlerTransport;
pub use memory::{MockBundler, MockLocalSigner};
pub use signer::SponsoredSigner;
pub use zerodev::ZeroDevProvider;
