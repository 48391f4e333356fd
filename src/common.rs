//! 通用模块，包含错误处理、配置、工具函数和引擎契约

pub mod config;
pub mod errors;
pub mod traits;
pub mod utils;

pub use self::config::{ConfigFile, CryptoConfig, EngineConfig};
pub use self::errors::{ConfigurationError, Error, ErrorKind, KeyRole};
pub use self::traits::{EngineKind, SecretsEngine};
