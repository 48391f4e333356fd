//! 非对称加密核心模块 (RSA-OAEP)

pub mod engines;
pub mod systems;
pub mod traits;

pub use self::engines::AsymmetricEngine;
pub use self::systems::traditional::RsaOaepSystem;
