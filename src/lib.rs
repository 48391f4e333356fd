//! # Secrets-Kit: Pluggable Secret Management
//!
//! `secrets-kit` 提供一个可插拔的密钥管理层：调用方按名称注册若干加密引擎
//! （非对称 RSA-OAEP、对称 Fernet 令牌），选择其中一个作为活动引擎，
//! 随后的加密与解密调用都会分派到该活动引擎。
//!
//! ## Core Concepts
//!
//! - **`SecretsEngine`**: 所有引擎共同实现的能力契约 (`encrypt` / `decrypt`)。
//! - **`Engine`**: 封闭的引擎变体集合 `{Asymmetric, Symmetric}`。
//! - **`SecretsRegistry`**: 名称到引擎的映射，并记录当前活动引擎的名称。
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use secrets_kit::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let mut registry = SecretsRegistry::new();
//!     registry.register_symmetric("Fernet", Some(Path::new("fernet.key")))?;
//!
//!     let token = registry.encrypt("top-secret")?;
//!     assert_eq!(registry.decrypt(&token)?, "top-secret");
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "asymmetric", feature = "symmetric")))]
compile_error!("at least one of the `asymmetric` or `symmetric` features must be enabled");

pub mod common;
pub mod engine;
pub mod registry;

#[cfg(feature = "asymmetric")]
pub mod asymmetric;
#[cfg(feature = "symmetric")]
pub mod symmetric;

#[cfg(test)]
mod test_support;

pub use common::errors::{ConfigurationError, Error, ErrorKind, KeyRole, Result};
pub use common::traits::{EngineKind, SecretsEngine};
pub use engine::Engine;
pub use registry::SecretsRegistry;

#[cfg(feature = "asymmetric")]
pub use asymmetric::engines::AsymmetricEngine;
#[cfg(feature = "symmetric")]
pub use symmetric::engines::SymmetricEngine;

// --- Prelude ---
// A collection of the most commonly used traits, structs, and enums.
pub mod prelude {
    pub use crate::common::config::{ConfigFile, CryptoConfig, EngineConfig};
    pub use crate::{
        ConfigurationError, Engine, EngineKind, Error, ErrorKind, KeyRole, Result,
        SecretsEngine, SecretsRegistry,
    };

    #[cfg(feature = "asymmetric")]
    pub use crate::AsymmetricEngine;
    #[cfg(feature = "symmetric")]
    pub use crate::SymmetricEngine;
}

/// The version of the `secrets-kit` crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
