//! Fernet 对称认证令牌实现
//!
//! 令牌结构（多字节整数均为大端序）：
//!
//! ```text
//! 0x80 | timestamp (8) | IV (16) | AES-128-CBC 密文 (PKCS7) | HMAC-SHA256 (32)
//! ```
//!
//! HMAC 覆盖它之前的全部字节。令牌对外以 URL-safe base64（带填充）文本表示，
//! 与其他 Fernet 实现生成的令牌互通。
use crate::common::config::CryptoConfig;
use crate::common::errors::ErrorKind;
use crate::symmetric::traits::SymmetricCryptographicSystem;
use aes::Aes128;
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{Engine, engine::general_purpose::URL_SAFE};
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand_core::{OsRng, TryRngCore};
use sha2::Sha256;
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

type HmacSha256 = Hmac<Sha256>;
type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

const VERSION: u8 = 0x80;
const KEY_SIZE: usize = 32;
const HALF_KEY_SIZE: usize = KEY_SIZE / 2;
const TIMESTAMP_SIZE: usize = 8;
const IV_SIZE: usize = 16;
const BLOCK_SIZE: usize = 16;
const HMAC_SIZE: usize = 32;
const HEADER_SIZE: usize = 1 + TIMESTAMP_SIZE + IV_SIZE;
const MIN_TOKEN_SIZE: usize = HEADER_SIZE + BLOCK_SIZE + HMAC_SIZE;

/// 令牌时间戳允许超前于本地时钟的秒数
pub const MAX_CLOCK_SKEW_SECS: u64 = 60;

/// Fernet 系统的独立错误类型
#[derive(Error, Debug)]
pub enum FernetSystemError {
    #[error("Invalid Fernet key: {0}")]
    InvalidKey(String),

    #[error("Token signature does not match the key")]
    InvalidSignature,

    #[error("Invalid Fernet token: {0}")]
    InvalidToken(String),

    #[error("Random number generation failed: {0}")]
    Rng(#[from] rand_core::OsError),
}

impl FernetSystemError {
    pub(crate) fn kind(&self) -> ErrorKind {
        match self {
            FernetSystemError::InvalidKey(_) => ErrorKind::KeyLoad,
            FernetSystemError::InvalidSignature | FernetSystemError::InvalidToken(_) => {
                ErrorKind::Authentication
            }
            FernetSystemError::Rng(_) => ErrorKind::Crypto,
        }
    }
}

/// Fernet 密钥：前 16 字节用于签名，后 16 字节用于加密。
///
/// `Debug` 输出不包含密钥材料，离开作用域时自动清零。
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct FernetKey {
    signing_key: [u8; HALF_KEY_SIZE],
    encryption_key: [u8; HALF_KEY_SIZE],
}

impl FernetKey {
    /// 从 32 字节原始密钥材料构造
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FernetSystemError> {
        if bytes.len() != KEY_SIZE {
            return Err(FernetSystemError::InvalidKey(format!(
                "expected {KEY_SIZE} bytes after decoding, got {}",
                bytes.len()
            )));
        }
        let (signing, encryption) = bytes.split_at(HALF_KEY_SIZE);
        let mut key = Self {
            signing_key: [0u8; HALF_KEY_SIZE],
            encryption_key: [0u8; HALF_KEY_SIZE],
        };
        key.signing_key.copy_from_slice(signing);
        key.encryption_key.copy_from_slice(encryption);
        Ok(key)
    }

    /// 原始密钥材料（签名密钥在前）
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(Vec::with_capacity(KEY_SIZE));
        bytes.extend_from_slice(&self.signing_key);
        bytes.extend_from_slice(&self.encryption_key);
        bytes
    }
}

impl fmt::Debug for FernetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FernetKey([REDACTED])")
    }
}

/// Fernet 对称认证加密系统
#[derive(Debug)]
pub struct FernetSystem;

impl FernetSystem {
    /// 以指定的时间戳（Unix 秒）生成令牌，返回 base64 文本的字节。
    pub fn encrypt_at_time(
        key: &FernetKey,
        plaintext: &[u8],
        timestamp: u64,
    ) -> Result<Vec<u8>, FernetSystemError> {
        let mut iv = [0u8; IV_SIZE];
        OsRng.try_fill_bytes(&mut iv)?;
        let token = seal(key, plaintext, timestamp, &iv)?;
        Ok(URL_SAFE.encode(token).into_bytes())
    }

    /// 在给定的当前时间 `now` 下校验并解密令牌。
    ///
    /// 接受 base64 文本（首尾空白会被忽略）或已解码的原始令牌字节。
    /// 检查顺序：结构 -> 签名 -> 有效期与时钟偏差（仅当 `ttl` 为 `Some`）-> 解密与去填充。
    pub fn decrypt_at_time(
        key: &FernetKey,
        token: &[u8],
        ttl: Option<u64>,
        now: u64,
    ) -> Result<Vec<u8>, FernetSystemError> {
        let raw = decode_token(token)?;
        let (signed, tag) = split_token(&raw)?;
        verify(key, signed, tag)?;
        let timestamp = read_timestamp(signed);

        // 未设置 ttl 时不检查时间戳
        // 只有设置了 ttl 才检查时间戳，与其他 Fernet 实现一致
        if let Some(ttl) = ttl {
            if timestamp.saturating_add(ttl) < now {
                return Err(FernetSystemError::InvalidToken("token has expired".to_string()));
            }
            if now.saturating_add(MAX_CLOCK_SKEW_SECS) < timestamp {
                return Err(FernetSystemError::InvalidToken(
                    "token timestamp is in the future".to_string(),
                ));
            }
        }

        let mut iv = [0u8; IV_SIZE];
        iv.copy_from_slice(&signed[1 + TIMESTAMP_SIZE..HEADER_SIZE]);
        Aes128CbcDec::new(&key.encryption_key.into(), &iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&signed[HEADER_SIZE..])
            .map_err(|_| FernetSystemError::InvalidToken("ciphertext padding is invalid".to_string()))
    }

    /// 校验签名后返回令牌中记录的创建时间（Unix 秒）
    pub fn extract_timestamp(key: &FernetKey, token: &[u8]) -> Result<u64, FernetSystemError> {
        let raw = decode_token(token)?;
        let (signed, tag) = split_token(&raw)?;
        verify(key, signed, tag)?;
        Ok(read_timestamp(signed))
    }

    pub fn decrypt_with_ttl(
        key: &FernetKey,
        token: &[u8],
        ttl: Option<u64>,
    ) -> Result<Vec<u8>, FernetSystemError> {
        Self::decrypt_at_time(key, token, ttl, current_timestamp())
    }
}

impl SymmetricCryptographicSystem for FernetSystem {
    const KEY_SIZE: usize = KEY_SIZE;
    type Key = FernetKey;
    type Error = FernetSystemError;

    fn generate_key(_config: &CryptoConfig) -> Result<Self::Key, Self::Error> {
        let mut key_bytes = Zeroizing::new([0u8; KEY_SIZE]);
        OsRng.try_fill_bytes(&mut key_bytes[..])?;
        FernetKey::from_bytes(&key_bytes[..])
    }

    fn encrypt(key: &Self::Key, plaintext: &[u8]) -> Result<Vec<u8>, Self::Error> {
        Self::encrypt_at_time(key, plaintext, current_timestamp())
    }

    fn decrypt(key: &Self::Key, ciphertext: &[u8]) -> Result<Vec<u8>, Self::Error> {
        Self::decrypt_with_ttl(key, ciphertext, None)
    }

    fn export_key(key: &Self::Key) -> Result<String, Self::Error> {
        Ok(URL_SAFE.encode(key.to_bytes().as_slice()))
    }

    fn import_key(key_data: &str) -> Result<Self::Key, Self::Error> {
        let bytes = URL_SAFE.decode(key_data.trim()).map_err(|e| {
            FernetSystemError::InvalidKey(format!("key is not URL-safe base64: {e}"))
        })?;
        let bytes = Zeroizing::new(bytes);
        FernetKey::from_bytes(&bytes)
    }
}

/// 当前 Unix 时间（秒）
pub(crate) fn current_timestamp() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}

fn seal(
    key: &FernetKey,
    plaintext: &[u8],
    timestamp: u64,
    iv: &[u8; IV_SIZE],
) -> Result<Vec<u8>, FernetSystemError> {
    let ciphertext = Aes128CbcEnc::new(&key.encryption_key.into(), &(*iv).into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut token = Vec::with_capacity(HEADER_SIZE + ciphertext.len() + HMAC_SIZE);
    token.push(VERSION);
    token.extend_from_slice(&timestamp.to_be_bytes());
    token.extend_from_slice(iv);
    token.extend_from_slice(&ciphertext);

    let mut mac = new_mac(key)?;
    mac.update(&token);
    token.extend_from_slice(&mac.finalize().into_bytes());
    Ok(token)
}

fn new_mac(key: &FernetKey) -> Result<HmacSha256, FernetSystemError> {
    HmacSha256::new_from_slice(&key.signing_key)
        .map_err(|e| FernetSystemError::InvalidKey(format!("signing key rejected: {e}")))
}

fn verify(key: &FernetKey, signed: &[u8], tag: &[u8]) -> Result<(), FernetSystemError> {
    let mut mac = new_mac(key)?;
    mac.update(signed);
    mac.verify_slice(tag)
        .map_err(|_| FernetSystemError::InvalidSignature)
}

// 以 0x80 开头的输入视为原始令牌，其余按 base64 文本解码
fn decode_token(token: &[u8]) -> Result<Cow<'_, [u8]>, FernetSystemError> {
    if token.first() == Some(&VERSION) {
        return Ok(Cow::Borrowed(token));
    }
    URL_SAFE
        .decode(token.trim_ascii())
        .map(Cow::Owned)
        .map_err(|e| FernetSystemError::InvalidToken(format!("token is not URL-safe base64: {e}")))
}

/// 拆分为 (被签名部分, HMAC)，同时检查版本与长度
fn split_token(raw: &[u8]) -> Result<(&[u8], &[u8]), FernetSystemError> {
    if raw.first() != Some(&VERSION) {
        return Err(FernetSystemError::InvalidToken("unknown token version".to_string()));
    }
    if raw.len() < MIN_TOKEN_SIZE {
        return Err(FernetSystemError::InvalidToken(format!(
            "token is too short: {} bytes",
            raw.len()
        )));
    }
    let (signed, tag) = raw.split_at(raw.len() - HMAC_SIZE);
    if (signed.len() - HEADER_SIZE) % BLOCK_SIZE != 0 {
        return Err(FernetSystemError::InvalidToken(
            "ciphertext is not a whole number of blocks".to_string(),
        ));
    }
    Ok((signed, tag))
}

fn read_timestamp(signed: &[u8]) -> u64 {
    let mut bytes = [0u8; TIMESTAMP_SIZE];
    bytes.copy_from_slice(&signed[1..1 + TIMESTAMP_SIZE]);
    u64::from_be_bytes(bytes)
}
