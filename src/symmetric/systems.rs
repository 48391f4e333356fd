//! # 对称加密系统模块
//!
//! 本模块是本库支持的对称加密算法的"门面"(façade)。
//! 每个对称加密系统都应实现 `SymmetricCryptographicSystem` 特征。

pub mod fernet;
