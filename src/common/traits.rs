//! 定义了所有加密引擎共同遵循的能力契约。
use crate::common::errors::Result;
use std::fmt;

/// 引擎所属的算法族
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    /// RSA-OAEP 公钥/私钥加密
    Asymmetric,
    /// Fernet 共享密钥认证加密
    Symmetric,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Asymmetric => f.write_str("Asymmetric"),
            EngineKind::Symmetric => f.write_str("Symmetric"),
        }
    }
}

/// `SecretsEngine` 定义了一个带密钥的加解密变换。
///
/// 引擎在构造时加载并校验密钥，之后不再改变。两个操作都要求相应的密钥已经存在；
/// 若密钥缺失，调用会返回 [`ConfigurationError::KeyNotConfigured`]，
/// 而不会以空的或默认的状态继续执行。
///
/// [`ConfigurationError::KeyNotConfigured`]: crate::ConfigurationError::KeyNotConfigured
pub trait SecretsEngine: Send + Sync {
    /// 引擎的算法族
    fn kind(&self) -> EngineKind;

    /// 将 UTF-8 明文加密为不透明的字节序列。
    ///
    /// 输出不保证确定性：同一明文的两次加密通常得到不同的密文。
    fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>>;

    /// 解密由对应密钥的 `encrypt` 产生的密文。
    fn decrypt(&self, ciphertext: &[u8]) -> Result<String>;
}
