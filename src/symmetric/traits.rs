use crate::common::config::CryptoConfig;
use std::fmt::Debug;

/// 对称加密系统的公共特征
pub trait SymmetricCryptographicSystem: Sized {
    /// 密钥的期望长度（以字节为单位）。
    const KEY_SIZE: usize;

    /// 用于加密和解密的单一密钥。
    type Key: Clone + Debug + Send + Sync;

    /// 该系统的错误类型。
    type Error: std::error::Error + Send + Sync + 'static;

    /// 生成一个新的密钥。
    fn generate_key(config: &CryptoConfig) -> Result<Self::Key, Self::Error>;

    /// 使用密钥加密数据。
    fn encrypt(key: &Self::Key, plaintext: &[u8]) -> Result<Vec<u8>, Self::Error>;

    /// 使用密钥解密数据。
    fn decrypt(key: &Self::Key, ciphertext: &[u8]) -> Result<Vec<u8>, Self::Error>;

    /// 导出密钥为字符串
    fn export_key(key: &Self::Key) -> Result<String, Self::Error>;

    /// 从字符串导入密钥
    fn import_key(key_data: &str) -> Result<Self::Key, Self::Error>;
}
