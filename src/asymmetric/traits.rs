//! 定义了非对称加密系统的核心 Trait。
use crate::common::config::CryptoConfig;
use secrecy::SecretString;
use std::fmt::Debug;

/// `AsymmetricCryptographicSystem` 定义了非对称加密算法必须实现的核心功能。
///
/// 实现者是无状态的：密钥由调用方（通常是引擎）持有，并在每次调用时传入。
pub trait AsymmetricCryptographicSystem: Sized {
    /// 公钥类型
    type PublicKey: Clone + Debug + Send + Sync;

    /// 私钥类型
    type PrivateKey: Clone + Debug + Send + Sync;

    /// 错误类型
    type Error: std::error::Error + Send + Sync + 'static;

    /// 生成密钥对
    fn generate_keypair(
        config: &CryptoConfig,
    ) -> Result<(Self::PublicKey, Self::PrivateKey), Self::Error>;

    /// 使用公钥加密单个数据块。
    fn encrypt(public_key: &Self::PublicKey, plaintext: &[u8]) -> Result<Vec<u8>, Self::Error>;

    /// 使用私钥解密单个数据块。
    fn decrypt(private_key: &Self::PrivateKey, ciphertext: &[u8])
    -> Result<Vec<u8>, Self::Error>;

    /// 将公钥导出为标准 PEM 格式
    fn export_public_key(public_key: &Self::PublicKey) -> Result<String, Self::Error>;

    /// 将私钥导出为标准 PEM 格式，提供密码时导出为加密格式
    fn export_private_key(
        private_key: &Self::PrivateKey,
        password: Option<&SecretString>,
    ) -> Result<String, Self::Error>;

    /// 从 PEM 格式导入公钥
    fn import_public_key(pem: &str) -> Result<Self::PublicKey, Self::Error>;

    /// 从 PEM 格式导入私钥，加密的私钥需要提供正确的密码
    fn import_private_key(
        pem: &str,
        password: Option<&SecretString>,
    ) -> Result<Self::PrivateKey, Self::Error>;
}
