//! 对称加密核心模块 (Fernet 认证令牌)

pub mod engines;
pub mod systems;
pub mod traits;

pub use self::engines::SymmetricEngine;
pub use self::systems::fernet::{FernetKey, FernetSystem};
