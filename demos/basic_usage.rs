use secrecy::SecretString;
use secrets_kit::asymmetric::RsaOaepSystem;
use secrets_kit::asymmetric::traits::AsymmetricCryptographicSystem;
use secrets_kit::prelude::*;
use secrets_kit::symmetric::FernetSystem;
use secrets_kit::symmetric::traits::SymmetricCryptographicSystem;
use std::fs;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let config = CryptoConfig::from_env();

    // 生成一对 RSA 密钥和一个 Fernet 密钥，写入临时目录
    let password = SecretString::from("demo-password".to_string());
    let (public_key, private_key) = RsaOaepSystem::generate_keypair(&config)?;
    let private_path = dir.path().join("private_key.pem");
    let public_path = dir.path().join("public_key.pem");
    fs::write(
        &private_path,
        RsaOaepSystem::export_private_key(&private_key, Some(&password))?,
    )?;
    fs::write(&public_path, RsaOaepSystem::export_public_key(&public_key)?)?;

    let fernet_key = FernetSystem::generate_key(&config)?;
    let fernet_path = dir.path().join("fernet.key");
    fs::write(&fernet_path, FernetSystem::export_key(&fernet_key)?)?;

    let mut registry = SecretsRegistry::new();
    registry.register_asymmetric("RSA", Some(&private_path), Some(&public_path), Some(&password))?;
    registry.register_symmetric("Fernet", Some(&fernet_path))?;
    println!("Registered engines: {:?}", registry.list_names());

    // 最后注册的 Fernet 引擎处于活动状态
    let token = registry.encrypt("top-secret")?;
    println!("Fernet token: {}", String::from_utf8_lossy(&token));
    println!("Decrypted: {}", registry.decrypt(&token)?);

    registry.switch("RSA")?;
    let ciphertext = registry.encrypt("hello world")?;
    println!("RSA ciphertext: {} bytes", ciphertext.len());
    println!("Decrypted: {}", registry.decrypt(&ciphertext)?);

    // 用 RSA 引擎解密 Fernet 令牌会失败
    if let Err(e) = registry.decrypt(&token) {
        println!("Expected failure ({:?}): {}", e.kind(), e);
    }

    Ok(())
}
