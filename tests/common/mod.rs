//!
//! 集成测试的通用辅助函数
//!

#![allow(dead_code)]

use rsa::{RsaPrivateKey, RsaPublicKey};
use secrecy::SecretString;
use secrets_kit::asymmetric::RsaOaepSystem;
use secrets_kit::asymmetric::traits::AsymmetricCryptographicSystem;
use secrets_kit::symmetric::FernetSystem;
use secrets_kit::symmetric::traits::SymmetricCryptographicSystem;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;
use tempfile::{TempDir, tempdir};

/// 整个测试进程复用的 2048 位 RSA 密钥对
pub fn rsa_keys() -> &'static (RsaPublicKey, RsaPrivateKey) {
    static KEYS: OnceLock<(RsaPublicKey, RsaPrivateKey)> = OnceLock::new();
    KEYS.get_or_init(|| RsaOaepSystem::generate_keypair(&Default::default()).unwrap())
}

/// 存放测试密钥文件的临时目录，随 `dir` 一起删除
pub struct KeyDir {
    pub dir: TempDir,
    pub private_key: PathBuf,
    pub public_key: PathBuf,
    pub fernet_key: PathBuf,
}

/// 写出 RSA 密钥对和一个新的 Fernet 密钥；提供密码时私钥以加密格式写出
pub fn setup_key_dir(password: Option<&SecretString>) -> KeyDir {
    let (public_key, private_key) = rsa_keys();
    let dir = tempdir().unwrap();

    let private_path = dir.path().join("private_key.pem");
    let public_path = dir.path().join("public_key.pem");
    let fernet_path = dir.path().join("fernet.key");

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
    write_fernet_key(&fernet_path);

    KeyDir {
        dir,
        private_key: private_path,
        public_key: public_path,
        fernet_key: fernet_path,
    }
}

/// 在 `path` 写入一个新生成的 Fernet 密钥
pub fn write_fernet_key(path: &std::path::Path) {
    let key = FernetSystem::generate_key(&Default::default()).unwrap();
    fs::write(path, FernetSystem::export_key(&key).unwrap() + "\n").unwrap();
}
