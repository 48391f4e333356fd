//!
//! # 通用配置模块
//!
//! 包含注册表所使用的配置结构：算法参数，以及从配置文件批量注册引擎所需的描述。
//!
use crate::common::errors::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 覆盖 RSA 密钥位数的环境变量
pub const RSA_KEY_BITS_ENV: &str = "SECRETS_RSA_KEY_BITS";
/// 覆盖 Fernet 令牌默认有效期（秒）的环境变量
pub const FERNET_TTL_ENV: &str = "SECRETS_FERNET_TTL_SECS";

fn default_rsa_key_bits() -> usize {
    2048
}

/// 加密系统配置
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CryptoConfig {
    /// 生成 RSA 密钥对时使用的位数
    #[serde(default = "default_rsa_key_bits")]
    pub rsa_key_bits: usize,
    /// Fernet 令牌的默认最长有效期（秒），`None` 表示不检查过期
    #[serde(default)]
    pub fernet_ttl_secs: Option<u64>,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            rsa_key_bits: default_rsa_key_bits(),
            fernet_ttl_secs: None,
        }
    }
}

impl CryptoConfig {
    /// 从环境变量加载配置，未设置或无法解析的变量保留默认值
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup(RSA_KEY_BITS_ENV) {
            if let Ok(bits) = value.parse::<usize>() {
                config.rsa_key_bits = bits;
            }
        }

        if let Some(value) = lookup(FERNET_TTL_ENV) {
            if let Ok(ttl) = value.parse::<u64>() {
                config.fernet_ttl_secs = Some(ttl);
            }
        }

        config
    }
}

/// 单个引擎的注册描述
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineConfig {
    /// RSA-OAEP 引擎，两条路径都可以省略
    Asymmetric {
        name: String,
        private_key_path: Option<PathBuf>,
        public_key_path: Option<PathBuf>,
        /// 保存私钥密码的环境变量名；密码本身不写入配置文件
        password_env: Option<String>,
    },
    /// Fernet 引擎
    Symmetric {
        name: String,
        key_path: Option<PathBuf>,
        /// 覆盖 `CryptoConfig::fernet_ttl_secs`
        ttl_secs: Option<u64>,
    },
}

impl EngineConfig {
    /// 引擎在注册表中的名称
    pub fn name(&self) -> &str {
        match self {
            EngineConfig::Asymmetric { name, .. } | EngineConfig::Symmetric { name, .. } => name,
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut Option<PathBuf>| {
            if let Some(p) = path {
                if p.is_relative() {
                    *p = base.join(&*p);
                }
            }
        };
        match self {
            EngineConfig::Asymmetric {
                private_key_path,
                public_key_path,
                ..
            } => {
                resolve(private_key_path);
                resolve(public_key_path);
            }
            EngineConfig::Symmetric { key_path, .. } => resolve(key_path),
        }
    }
}

/// 完整配置文件
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct ConfigFile {
    /// 加密配置
    #[serde(default)]
    pub crypto: CryptoConfig,
    /// 按顺序注册的引擎
    #[serde(default)]
    pub engines: Vec<EngineConfig>,
    /// 全部注册完成后切换到的引擎；省略时最后注册的引擎保持活动
    #[serde(default)]
    pub active: Option<String>,
}

impl ConfigFile {
    /// 从 JSON 字符串解析配置
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 从 JSON 文件加载配置。
    ///
    /// 相对的密钥路径按配置文件所在目录解析。
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let mut config = Self::from_json(&contents)?;

        if let Some(base) = path.parent() {
            for engine in &mut config.engines {
                engine.resolve_paths(base);
            }
        }

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_crypto_config_default() {
        let config = CryptoConfig::default();
        assert_eq!(config.rsa_key_bits, 2048);
        assert_eq!(config.fernet_ttl_secs, None);
    }

    #[test]
    fn test_crypto_config_from_lookup() {
        let config = CryptoConfig::from_lookup(|name| match name {
            RSA_KEY_BITS_ENV => Some("4096".to_string()),
            FERNET_TTL_ENV => Some("300".to_string()),
            _ => None,
        });
        assert_eq!(config.rsa_key_bits, 4096);
        assert_eq!(config.fernet_ttl_secs, Some(300));
    }

    #[test]
    fn test_crypto_config_ignores_unparsable_values() {
        let config = CryptoConfig::from_lookup(|name| match name {
            RSA_KEY_BITS_ENV => Some("lots".to_string()),
            _ => None,
        });
        assert_eq!(config, CryptoConfig::default());
    }

    #[test]
    fn test_parse_engine_configs() {
        let json = r#"{
            "engines": [
                { "type": "asymmetric", "name": "RSA", "public_key_path": "keys/public_key.pem" },
                { "type": "symmetric", "name": "Fernet", "key_path": "keys/fernet.key", "ttl_secs": 60 }
            ],
            "active": "RSA"
        }"#;
        let config = ConfigFile::from_json(json).unwrap();

        assert_eq!(config.crypto, CryptoConfig::default());
        assert_eq!(config.engines.len(), 2);
        assert_eq!(config.engines[0].name(), "RSA");
        assert_eq!(
            config.engines[1],
            EngineConfig::Symmetric {
                name: "Fernet".to_string(),
                key_path: Some(PathBuf::from("keys/fernet.key")),
                ttl_secs: Some(60),
            }
        );
        assert_eq!(config.active.as_deref(), Some("RSA"));
    }

    #[test]
    fn test_unknown_engine_type_is_rejected() {
        let json = r#"{ "engines": [ { "type": "quantum", "name": "Q" } ] }"#;
        assert!(ConfigFile::from_json(json).is_err());
    }

    #[test]
    fn test_from_file_resolves_relative_paths() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("secrets.json");
        let config = ConfigFile {
            engines: vec![
                EngineConfig::Symmetric {
                    name: "Fernet".to_string(),
                    key_path: Some(PathBuf::from("fernet.key")),
                    ttl_secs: None,
                },
                EngineConfig::Asymmetric {
                    name: "RSA".to_string(),
                    private_key_path: Some(PathBuf::from("/etc/keys/private_key.pem")),
                    public_key_path: None,
                    password_env: None,
                },
            ],
            ..Default::default()
        };
        config.save_to_file(&config_path).unwrap();

        let loaded = ConfigFile::from_file(&config_path).unwrap();
        match &loaded.engines[0] {
            EngineConfig::Symmetric { key_path, .. } => {
                assert_eq!(key_path.as_deref(), Some(dir.path().join("fernet.key").as_path()));
            }
            other => panic!("unexpected engine config: {other:?}"),
        }
        match &loaded.engines[1] {
            EngineConfig::Asymmetric {
                private_key_path, ..
            } => {
                assert_eq!(
                    private_key_path.as_deref(),
                    Some(Path::new("/etc/keys/private_key.pem"))
                );
            }
            other => panic!("unexpected engine config: {other:?}"),
        }
    }
}
