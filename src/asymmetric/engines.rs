//! 非对称加密引擎 `AsymmetricEngine`
use crate::asymmetric::systems::traditional::rsa::{RsaOaepSystem, max_message_len};
use crate::asymmetric::traits::AsymmetricCryptographicSystem;
use crate::common::errors::{ConfigurationError, KeyRole, Result};
use crate::common::traits::{EngineKind, SecretsEngine};
use crate::common::utils::read_key_file;
use rsa::{RsaPrivateKey, RsaPublicKey};
use secrecy::SecretString;
use std::path::Path;
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// `AsymmetricEngine`：使用 RSA 密钥对的 OAEP 加解密引擎。
///
/// 公钥和私钥相互独立，任意一侧都可以缺失：只有公钥的引擎只能加密，
/// 只有私钥的引擎只能解密。访问缺失的一侧会返回
/// [`ConfigurationError::KeyNotConfigured`]。
#[derive(Clone, Debug, Default)]
pub struct AsymmetricEngine {
    private_key: Option<RsaPrivateKey>,
    public_key: Option<RsaPublicKey>,
}

impl AsymmetricEngine {
    /// 从 PEM 文件加载密钥并创建引擎。
    ///
    /// **宽松加载：** 省略的路径、不存在的路径、或无法读取的文件都不会报错，
    /// 只是让对应一侧的密钥保持缺失，失败被推迟到第一次使用该密钥时。
    /// 这意味着路径拼写错误不会在构造时暴露，而是在 `encrypt`/`decrypt` 时以
    /// “密钥未配置”的错误出现。
    ///
    /// 文件存在但内容无效（PEM 格式错误、加密私钥缺少密码或密码错误、
    /// 为未加密私钥提供了密码）时立即返回错误。
    pub fn new(
        private_key_path: Option<&Path>,
        public_key_path: Option<&Path>,
        password: Option<&SecretString>,
    ) -> Result<Self> {
        let private_key = match private_key_path.and_then(|p| read_pem(p, KeyRole::Private)) {
            Some(pem) => Some(RsaOaepSystem::import_private_key(&pem, password)?),
            None => None,
        };
        let public_key = match public_key_path.and_then(|p| read_pem(p, KeyRole::Public)) {
            Some(pem) => Some(RsaOaepSystem::import_public_key(&pem)?),
            None => None,
        };

        Ok(Self {
            private_key,
            public_key,
        })
    }

    /// 使用内存中的密钥创建引擎
    pub fn from_keys(private_key: Option<RsaPrivateKey>, public_key: Option<RsaPublicKey>) -> Self {
        Self {
            private_key,
            public_key,
        }
    }

    pub fn has_private_key(&self) -> bool {
        self.private_key.is_some()
    }

    pub fn has_public_key(&self) -> bool {
        self.public_key.is_some()
    }

    /// 获取公钥，未加载时返回配置错误
    pub fn public_key(&self) -> Result<&RsaPublicKey> {
        self.public_key
            .as_ref()
            .ok_or_else(|| ConfigurationError::KeyNotConfigured(KeyRole::Public).into())
    }

    /// 获取私钥，未加载时返回配置错误
    pub fn private_key(&self) -> Result<&RsaPrivateKey> {
        self.private_key
            .as_ref()
            .ok_or_else(|| ConfigurationError::KeyNotConfigured(KeyRole::Private).into())
    }

    /// 单次加密可接受的最大明文长度（字节）
    pub fn max_plaintext_len(&self) -> Result<usize> {
        Ok(max_message_len(self.public_key()?))
    }
}

impl SecretsEngine for AsymmetricEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Asymmetric
    }

    fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>> {
        let public_key = self.public_key()?;
        Ok(RsaOaepSystem::encrypt(public_key, plaintext.as_bytes())?)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<String> {
        let private_key = self.private_key()?;
        let plaintext = RsaOaepSystem::decrypt(private_key, ciphertext)?;
        Ok(String::from_utf8(plaintext)?)
    }
}

/// 读取 PEM 文件；缺失或无法读取时记录告警并返回 `None`。
fn read_pem(path: &Path, role: KeyRole) -> Option<Zeroizing<String>> {
    match read_key_file(path) {
        Ok(Some(bytes)) => {
            debug!(path = %path.display(), %role, "loaded RSA key file");
            // 非 UTF-8 内容交给 PEM 解析器报告格式错误
            Some(Zeroizing::new(String::from_utf8_lossy(&bytes).into_owned()))
        }
        Ok(None) => {
            warn!(path = %path.display(), %role, "RSA key file does not exist, key left unset");
            None
        }
        Err(e) => {
            warn!(path = %path.display(), %role, error = %e, "RSA key file could not be read, key left unset");
            None
        }
    }
}

impl From<RsaPublicKey> for AsymmetricEngine {
    fn from(public_key: RsaPublicKey) -> Self {
        Self::from_keys(None, Some(public_key))
    }
}

impl From<RsaPrivateKey> for AsymmetricEngine {
    fn from(private_key: RsaPrivateKey) -> Self {
        let public_key = private_key.to_public_key();
        Self::from_keys(Some(private_key), Some(public_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::{Error, ErrorKind};
    use crate::test_support::rsa_keys as setup_keys;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    // 将密钥对写入临时目录，返回 (目录, 私钥路径, 公钥路径)
    fn write_keys(password: Option<&SecretString>) -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
        let (public_key, private_key) = setup_keys();
        let dir = tempdir().unwrap();
        let private_path = dir.path().join("private_key.pem");
        let public_path = dir.path().join("public_key.pem");
        fs::write(
            &private_path,
            RsaOaepSystem::export_private_key(private_key, password).unwrap(),
        )
        .unwrap();
        fs::write(
            &public_path,
            RsaOaepSystem::export_public_key(public_key).unwrap(),
        )
        .unwrap();
        (dir, private_path, public_path)
    }

    #[test]
    fn test_engine_roundtrip_from_files() {
        let (_dir, private_path, public_path) = write_keys(None);
        let engine = AsymmetricEngine::new(Some(&private_path), Some(&public_path), None).unwrap();

        assert!(engine.has_private_key());
        assert!(engine.has_public_key());

        let ciphertext = engine.encrypt("hello world").unwrap();
        assert_eq!(engine.decrypt(&ciphertext).unwrap(), "hello world");
    }

    #[test]
    fn test_public_only_engine_cannot_decrypt() {
        let (_dir, _, public_path) = write_keys(None);
        let engine = AsymmetricEngine::new(None, Some(&public_path), None).unwrap();

        let ciphertext = engine.encrypt("secret").unwrap();
        let err = engine.decrypt(&ciphertext).unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::KeyNotConfigured(KeyRole::Private))
        ));
    }

    #[test]
    fn test_private_only_engine_cannot_encrypt() {
        let (_dir, private_path, _) = write_keys(None);
        let engine = AsymmetricEngine::new(Some(&private_path), None, None).unwrap();

        let err = engine.encrypt("secret").unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::KeyNotConfigured(KeyRole::Public))
        ));
    }

    #[test]
    fn test_missing_paths_are_lenient() {
        let dir = tempdir().unwrap();
        let engine = AsymmetricEngine::new(
            Some(&dir.path().join("nope_private.pem")),
            Some(&dir.path().join("nope_public.pem")),
            None,
        )
        .unwrap();

        assert!(!engine.has_private_key());
        assert!(!engine.has_public_key());
        assert_eq!(
            engine.encrypt("x").unwrap_err().kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            engine.decrypt(b"x").unwrap_err().kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_unreadable_path_is_lenient() {
        let dir = tempdir().unwrap();
        // 目录存在但无法作为 PEM 文件读取
        let engine = AsymmetricEngine::new(Some(dir.path()), Some(dir.path()), None).unwrap();

        assert!(!engine.has_private_key());
        assert!(!engine.has_public_key());
        assert!(matches!(
            engine.encrypt("x").unwrap_err(),
            Error::Configuration(ConfigurationError::KeyNotConfigured(KeyRole::Public))
        ));
    }

    #[test]
    fn test_malformed_pem_is_key_load_error() {
        let dir = tempdir().unwrap();
        let public_path = dir.path().join("public_key.pem");
        fs::write(&public_path, "-----BEGIN PUBLIC KEY-----\ngarbage\n-----END PUBLIC KEY-----\n")
            .unwrap();

        let err = AsymmetricEngine::new(None, Some(&public_path), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyLoad);
    }

    #[test]
    fn test_encrypted_private_key_with_password() {
        let password = SecretString::from("s3cret".to_string());
        let (_dir, private_path, public_path) = write_keys(Some(&password));

        let engine =
            AsymmetricEngine::new(Some(&private_path), Some(&public_path), Some(&password))
                .unwrap();
        let ciphertext = engine.encrypt("unlocked").unwrap();
        assert_eq!(engine.decrypt(&ciphertext).unwrap(), "unlocked");

        let wrong = SecretString::from("guess".to_string());
        let err = AsymmetricEngine::new(Some(&private_path), None, Some(&wrong)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyLoad);

        let err = AsymmetricEngine::new(Some(&private_path), None, None).unwrap_err();
        assert!(matches!(
            err,
            Error::Rsa(crate::asymmetric::systems::traditional::RsaSystemError::MissingPassword)
        ));
    }

    #[test]
    fn test_oversized_plaintext_is_crypto_error() {
        let (public_key, _) = setup_keys();
        let engine = AsymmetricEngine::from(public_key.clone());
        let max = engine.max_plaintext_len().unwrap();

        let err = engine.encrypt(&"a".repeat(max + 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Crypto);
    }

    #[test]
    fn test_garbage_ciphertext_is_crypto_error() {
        let (_, private_key) = setup_keys();
        let engine = AsymmetricEngine::from(private_key.clone());

        let err = engine.decrypt(&[0u8; 256]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Crypto);
    }

    #[test]
    fn test_unicode_roundtrip() {
        let (_, private_key) = setup_keys();
        let engine = AsymmetricEngine::from(private_key.clone());
        let text = "密钥 🔑 secret";

        let ciphertext = engine.encrypt(text).unwrap();
        assert_eq!(engine.decrypt(&ciphertext).unwrap(), text);
    }

    #[test]
    fn test_kind() {
        assert_eq!(AsymmetricEngine::default().kind(), EngineKind::Asymmetric);
    }
}
