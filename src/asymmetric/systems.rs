//! 非对称算法系统集合
//!
//! 目前只包含传统的 RSA-OAEP 实现。
pub mod traditional;
