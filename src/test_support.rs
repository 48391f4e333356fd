//! 单元测试共享的夹具

#[cfg(feature = "asymmetric")]
use crate::asymmetric::{RsaOaepSystem, traits::AsymmetricCryptographicSystem};
#[cfg(feature = "asymmetric")]
use rsa::{RsaPrivateKey, RsaPublicKey};
#[cfg(feature = "asymmetric")]
use std::sync::OnceLock;

/// RSA 密钥生成较慢，整个测试进程复用同一对 2048 位密钥
#[cfg(feature = "asymmetric")]
pub(crate) fn rsa_keys() -> &'static (RsaPublicKey, RsaPrivateKey) {
    static KEYS: OnceLock<(RsaPublicKey, RsaPrivateKey)> = OnceLock::new();
    KEYS.get_or_init(|| RsaOaepSystem::generate_keypair(&Default::default()).unwrap())
}

/// 与 [`rsa_keys`] 不同的另一对密钥
#[cfg(feature = "asymmetric")]
pub(crate) fn other_rsa_keys() -> &'static (RsaPublicKey, RsaPrivateKey) {
    static KEYS: OnceLock<(RsaPublicKey, RsaPrivateKey)> = OnceLock::new();
    KEYS.get_or_init(|| RsaOaepSystem::generate_keypair(&Default::default()).unwrap())
}
