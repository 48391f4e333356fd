//! # 传统加密算法模块
//!
//! 本模块包含 RSA 等传统加密算法的实现，
//! 并提供符合 `AsymmetricCryptographicSystem` 特征的接口。

pub mod rsa;

// 重新导出RSA系统，方便其他模块调用。
pub use self::rsa::{RsaOaepSystem, RsaSystemError};
