//! 对称加密引擎 `SymmetricEngine`
use crate::common::errors::{ConfigurationError, KeyRole, Result};
use crate::common::traits::{EngineKind, SecretsEngine};
use crate::common::utils::read_key_file;
use crate::symmetric::systems::fernet::{
    FernetKey, FernetSystem, FernetSystemError, current_timestamp,
};
use crate::symmetric::traits::SymmetricCryptographicSystem;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// `SymmetricEngine`：基于 Fernet 令牌的认证加密引擎。
///
/// 密文即 Fernet 令牌的 base64 文本字节，可以直接作为 UTF-8 文本存储或传输。
/// 解密会先校验签名，任何篡改或使用了不同的密钥都会以认证错误失败。
#[derive(Clone, Debug, Default)]
pub struct SymmetricEngine {
    key: Option<FernetKey>,
    ttl: Option<Duration>,
}

impl SymmetricEngine {
    /// 从密钥文件创建引擎。
    ///
    /// 密钥文件包含一行 URL-safe base64 编码的 32 字节密钥。路径省略或文件不存在时
    /// 密钥保持缺失，第一次加解密时返回“密钥未配置”错误；文件内容无效时立即报错。
    pub fn new(key_path: Option<&Path>) -> Result<Self> {
        let key = match key_path {
            Some(path) => load_key(path)?,
            None => None,
        };
        Ok(Self { key, ttl: None })
    }

    /// 使用内存中的密钥创建引擎
    pub fn from_key(key: FernetKey) -> Self {
        Self {
            key: Some(key),
            ttl: None,
        }
    }

    /// 生成一个带有新随机密钥的引擎
    pub fn generate() -> Result<Self> {
        let key = FernetSystem::generate_key(&Default::default())?;
        Ok(Self::from_key(key))
    }

    /// 设置令牌的最长有效期，超过有效期的令牌解密失败。
    ///
    /// 令牌时间戳精确到秒，不足一秒的部分向上取整。
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
        self.ttl = Some(Duration::from_secs(secs));
        self
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    /// 获取密钥，未加载时返回配置错误
    pub fn key(&self) -> Result<&FernetKey> {
        self.key
            .as_ref()
            .ok_or_else(|| ConfigurationError::KeyNotConfigured(KeyRole::Shared).into())
    }

    /// 导出密钥为 URL-safe base64 文本，可直接写入密钥文件
    pub fn export_key(&self) -> Result<String> {
        Ok(FernetSystem::export_key(self.key()?)?)
    }

    /// 以指定时间戳生成令牌
    pub fn encrypt_at_time(&self, plaintext: &str, timestamp: u64) -> Result<Vec<u8>> {
        Ok(FernetSystem::encrypt_at_time(
            self.key()?,
            plaintext.as_bytes(),
            timestamp,
        )?)
    }

    /// 在给定的当前时间下解密令牌
    pub fn decrypt_at_time(&self, ciphertext: &[u8], now: u64) -> Result<String> {
        let ttl = self.ttl.map(|ttl| ttl.as_secs());
        let plaintext = FernetSystem::decrypt_at_time(self.key()?, ciphertext, ttl, now)?;
        Ok(String::from_utf8(plaintext)?)
    }
}

impl SecretsEngine for SymmetricEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Symmetric
    }

    fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>> {
        Ok(FernetSystem::encrypt(self.key()?, plaintext.as_bytes())?)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<String> {
        self.decrypt_at_time(ciphertext, current_timestamp())
    }
}

impl From<FernetKey> for SymmetricEngine {
    fn from(key: FernetKey) -> Self {
        Self::from_key(key)
    }
}

fn load_key(path: &Path) -> Result<Option<FernetKey>> {
    let Some(bytes) = read_key_file(path)? else {
        warn!(path = %path.display(), "Fernet key file does not exist, key left unset");
        return Ok(None);
    };
    let text = std::str::from_utf8(&bytes)
        .map_err(|_| FernetSystemError::InvalidKey("key file is not valid UTF-8".to_string()))?;
    let key = FernetSystem::import_key(text)?;
    debug!(path = %path.display(), "loaded Fernet key file");
    Ok(Some(key))
}
