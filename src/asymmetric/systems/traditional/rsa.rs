//! `RsaOaepSystem` 提供了基于 RSA-OAEP 的非对称加解密功能。
//!
//! 填充参数固定为：哈希 SHA-256、MGF1-SHA-256、空标签。加密方与解密方必须使用
//! 完全相同的参数，否则解密会以填充/格式错误失败。

use crate::asymmetric::traits::AsymmetricCryptographicSystem;
use crate::common::config::CryptoConfig;
use crate::common::errors::ErrorKind;
use pkcs8::der::pem::decode_label as decode_pem_label;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::rand_core::{OsRng as RsaOsRng, RngCore};
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;

const SHA256_OUTPUT_SIZE: usize = 32;
/// OAEP 填充开销：`2 * hLen + 2`
const OAEP_OVERHEAD: usize = 2 * SHA256_OUTPUT_SIZE + 2;
const PBKDF2_ITERATIONS: u32 = 100_000;
const PBES2_SALT_SIZE: usize = 16;
const AES_IV_SIZE: usize = 16;

const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";
const ENCRYPTED_PRIVATE_KEY_LABEL: &str = "ENCRYPTED PRIVATE KEY";
const RSA_PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";
const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";
const RSA_PUBLIC_KEY_LABEL: &str = "RSA PUBLIC KEY";

/// RSA 系统的独立错误类型
#[derive(Error, Debug)]
pub enum RsaSystemError {
    #[error("Invalid PEM key data: {0}")]
    InvalidPem(String),

    #[error("Password was not given but private key is encrypted")]
    MissingPassword,

    #[error("Password was given but private key is not encrypted")]
    UnexpectedPassword,

    #[error("Could not decrypt private key: wrong password or corrupted key")]
    WrongPassword,

    #[error("RSA key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Plaintext is too long for RSA-OAEP: at most {max} bytes, got {actual}")]
    MessageTooLong { max: usize, actual: usize },

    #[error("RSA encryption failed: {0}")]
    Encryption(String),

    #[error("RSA decryption failed: OAEP padding or format mismatch")]
    Decryption,

    #[error("RSA key export failed: {0}")]
    Export(String),
}

impl RsaSystemError {
    pub(crate) fn kind(&self) -> ErrorKind {
        match self {
            RsaSystemError::InvalidPem(_)
            | RsaSystemError::MissingPassword
            | RsaSystemError::UnexpectedPassword
            | RsaSystemError::WrongPassword => ErrorKind::KeyLoad,
            RsaSystemError::KeyGeneration(_)
            | RsaSystemError::MessageTooLong { .. }
            | RsaSystemError::Encryption(_)
            | RsaSystemError::Decryption
            | RsaSystemError::Export(_) => ErrorKind::Crypto,
        }
    }
}

fn oaep_padding() -> Oaep {
    Oaep::new::<Sha256>()
}

/// 给定公钥下单次 OAEP 加密可接受的最大明文长度（字节）
pub fn max_message_len(public_key: &RsaPublicKey) -> usize {
    public_key.size().saturating_sub(OAEP_OVERHEAD)
}

/// OpenSSL 传统格式的加密私钥在 PEM 头部带有 `Proc-Type: 4,ENCRYPTED`
fn is_legacy_encrypted(pem: &str) -> bool {
    pem.lines()
        .map(str::trim)
        .take_while(|line| !line.is_empty())
        .any(|line| line.starts_with("Proc-Type:") && line.contains("ENCRYPTED"))
}

/// RSA-OAEP 加密系统实现
#[derive(Debug)]
pub struct RsaOaepSystem;

impl AsymmetricCryptographicSystem for RsaOaepSystem {
    type PublicKey = RsaPublicKey;
    type PrivateKey = RsaPrivateKey;
    type Error = RsaSystemError;

    fn generate_keypair(
        config: &CryptoConfig,
    ) -> Result<(Self::PublicKey, Self::PrivateKey), Self::Error> {
        let mut rng = RsaOsRng;
        let private_key = RsaPrivateKey::new(&mut rng, config.rsa_key_bits)
            .map_err(|e| RsaSystemError::KeyGeneration(e.to_string()))?;
        let public_key = private_key.to_public_key();
        Ok((public_key, private_key))
    }

    fn encrypt(public_key: &Self::PublicKey, plaintext: &[u8]) -> Result<Vec<u8>, Self::Error> {
        let max = max_message_len(public_key);
        if plaintext.len() > max {
            return Err(RsaSystemError::MessageTooLong {
                max,
                actual: plaintext.len(),
            });
        }

        let mut rng = RsaOsRng;
        public_key
            .encrypt(&mut rng, oaep_padding(), plaintext)
            .map_err(|e| RsaSystemError::Encryption(e.to_string()))
    }

    fn decrypt(
        private_key: &Self::PrivateKey,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, Self::Error> {
        private_key
            .decrypt(oaep_padding(), ciphertext)
            .map_err(|_| RsaSystemError::Decryption)
    }

    fn export_public_key(public_key: &Self::PublicKey) -> Result<String, Self::Error> {
        public_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| RsaSystemError::Export(e.to_string()))
    }

    fn export_private_key(
        private_key: &Self::PrivateKey,
        password: Option<&SecretString>,
    ) -> Result<String, Self::Error> {
        let Some(password) = password else {
            let pem = private_key
                .to_pkcs8_pem(LineEnding::LF)
                .map_err(|e| RsaSystemError::Export(e.to_string()))?;
            return Ok(pem.to_string());
        };

        // PBES2: PBKDF2-SHA256 + AES-256-CBC
        let der = private_key
            .to_pkcs8_der()
            .map_err(|e| RsaSystemError::Export(e.to_string()))?;
        let info = pkcs8::PrivateKeyInfo::try_from(der.as_bytes())
            .map_err(|e| RsaSystemError::Export(e.to_string()))?;

        let mut salt = [0u8; PBES2_SALT_SIZE];
        let mut iv = [0u8; AES_IV_SIZE];
        RsaOsRng.fill_bytes(&mut salt);
        RsaOsRng.fill_bytes(&mut iv);

        let params =
            pkcs8::pkcs5::pbes2::Parameters::pbkdf2_sha256_aes256cbc(PBKDF2_ITERATIONS, &salt, &iv)
                .map_err(|e| RsaSystemError::Export(e.to_string()))?;
        let encrypted = info
            .encrypt_with_params(params, password.expose_secret().as_bytes())
            .map_err(|e| RsaSystemError::Export(e.to_string()))?;
        let pem = encrypted
            .to_pem(ENCRYPTED_PRIVATE_KEY_LABEL, LineEnding::LF)
            .map_err(|e| RsaSystemError::Export(e.to_string()))?;
        Ok(pem.to_string())
    }

    fn import_public_key(pem: &str) -> Result<Self::PublicKey, Self::Error> {
        let label =
            decode_pem_label(pem.as_bytes()).map_err(|e| RsaSystemError::InvalidPem(e.to_string()))?;

        match label {
            PUBLIC_KEY_LABEL => RsaPublicKey::from_public_key_pem(pem)
                .map_err(|e| RsaSystemError::InvalidPem(e.to_string())),
            RSA_PUBLIC_KEY_LABEL => RsaPublicKey::from_pkcs1_pem(pem)
                .map_err(|e| RsaSystemError::InvalidPem(e.to_string())),
            other => Err(RsaSystemError::InvalidPem(format!(
                "unsupported public key PEM label: {other}"
            ))),
        }
    }

    fn import_private_key(
        pem: &str,
        password: Option<&SecretString>,
    ) -> Result<Self::PrivateKey, Self::Error> {
        if is_legacy_encrypted(pem) {
            return Err(RsaSystemError::InvalidPem(
                "unsupported legacy encrypted PEM (Proc-Type/DEK-Info); convert it to encrypted PKCS#8"
                    .to_string(),
            ));
        }
        let label =
            decode_pem_label(pem.as_bytes()).map_err(|e| RsaSystemError::InvalidPem(e.to_string()))?;

        match (label, password) {
            (ENCRYPTED_PRIVATE_KEY_LABEL, Some(password)) => {
                RsaPrivateKey::from_pkcs8_encrypted_pem(pem, password.expose_secret().as_bytes())
                    .map_err(|e| match e {
                        pkcs8::Error::EncryptedPrivateKey(_) => RsaSystemError::WrongPassword,
                        other => RsaSystemError::InvalidPem(other.to_string()),
                    })
            }
            (ENCRYPTED_PRIVATE_KEY_LABEL, None) => Err(RsaSystemError::MissingPassword),
            (PRIVATE_KEY_LABEL | RSA_PRIVATE_KEY_LABEL, Some(_)) => {
                Err(RsaSystemError::UnexpectedPassword)
            }
            (PRIVATE_KEY_LABEL, None) => RsaPrivateKey::from_pkcs8_pem(pem)
                .map_err(|e| RsaSystemError::InvalidPem(e.to_string())),
            (RSA_PRIVATE_KEY_LABEL, None) => RsaPrivateKey::from_pkcs1_pem(pem)
                .map_err(|e| RsaSystemError::InvalidPem(e.to_string())),
            (other, _) => Err(RsaSystemError::InvalidPem(format!(
                "unsupported private key PEM label: {other}"
            ))),
        }
    }
}
