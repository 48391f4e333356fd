//! 引擎注册表 `SecretsRegistry`
//!
//! 注册表按名称保存引擎，并记录当前活动引擎的名称。注册一个引擎会同时把它设为
//! 活动引擎；`encrypt` / `decrypt` 总是转发给活动引擎。
use crate::common::config::{ConfigFile, CryptoConfig, EngineConfig};
use crate::common::errors::{ConfigurationError, Error, Result};
use crate::common::traits::{EngineKind, SecretsEngine};
use crate::engine::Engine;
use std::collections::HashMap;
use tracing::{debug, info};

#[cfg(feature = "asymmetric")]
use crate::asymmetric::engines::AsymmetricEngine;
#[cfg(feature = "symmetric")]
use crate::symmetric::engines::SymmetricEngine;
#[cfg(feature = "asymmetric")]
use secrecy::SecretString;
#[cfg(any(feature = "asymmetric", feature = "symmetric"))]
use std::path::Path;
#[cfg(feature = "symmetric")]
use std::time::Duration;

#[derive(Debug, Default)]
pub struct SecretsRegistry {
    engines: HashMap<String, Engine>,
    active: Option<String>,
}

impl SecretsRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    /// 按配置文件依次注册引擎，最后切换到 `active` 指定的引擎（若有）。
    ///
    /// 私钥密码从 `password_env` 指定的环境变量读取。
    pub fn from_config(config: &ConfigFile) -> Result<Self> {
        Self::from_config_with(config, |name| std::env::var(name).ok())
    }

    fn from_config_with(
        config: &ConfigFile,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut registry = Self::new();
        for engine_config in &config.engines {
            let engine = build_engine(engine_config, &config.crypto, &lookup)?;
            registry.register(engine_config.name(), engine)?;
        }
        if let Some(active) = &config.active {
            registry.switch_active(active)?;
        }
        info!(
            engines = registry.len(),
            active = registry.active_name().unwrap_or("<none>"),
            "secrets registry loaded from config"
        );
        Ok(registry)
    }

    /// 以 `name` 注册引擎并将其设为活动引擎；同名引擎会被替换。
    pub fn register(&mut self, name: impl Into<String>, engine: impl Into<Engine>) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;
        let engine = engine.into();
        let kind = engine.kind();

        let replaced = self.engines.insert(name.clone(), engine).is_some();
        info!(engine = %name, %kind, replaced, "registered secrets engine");
        self.active = Some(name);
        Ok(())
    }

    /// 从 PEM 文件构造 RSA 引擎并注册，路径的处理规则见 [`AsymmetricEngine::new`]。
    #[cfg(feature = "asymmetric")]
    pub fn register_asymmetric(
        &mut self,
        name: impl Into<String>,
        private_key_path: Option<&Path>,
        public_key_path: Option<&Path>,
        password: Option<&SecretString>,
    ) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;
        let engine = AsymmetricEngine::new(private_key_path, public_key_path, password)?;
        self.register(name, engine)
    }

    /// 从密钥文件构造 Fernet 引擎并注册
    #[cfg(feature = "symmetric")]
    pub fn register_symmetric(
        &mut self,
        name: impl Into<String>,
        key_path: Option<&Path>,
    ) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;
        let engine = SymmetricEngine::new(key_path)?;
        self.register(name, engine)
    }

    /// 切换活动引擎。名称不存在时返回错误，活动引擎保持不变。
    pub fn switch_active(&mut self, name: &str) -> Result<()> {
        if !self.engines.contains_key(name) {
            return Err(ConfigurationError::EngineNotFound(name.to_string()).into());
        }
        debug!(
            from = self.active.as_deref().unwrap_or("<none>"),
            to = name,
            "switched active secrets engine"
        );
        self.active = Some(name.to_string());
        Ok(())
    }

    /// [`switch_active`](Self::switch_active) 的别名
    pub fn switch(&mut self, name: &str) -> Result<()> {
        self.switch_active(name)
    }

    pub fn active_engine(&self) -> Result<&Engine> {
        let name = self
            .active
            .as_deref()
            .ok_or(ConfigurationError::NoActiveEngine)?;
        self.engines
            .get(name)
            .ok_or_else(|| ConfigurationError::EngineNotFound(name.to_string()).into())
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// 所有已注册的名称，按字典序排列
    pub fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.engines.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn engine(&self, name: &str) -> Option<&Engine> {
        self.engines.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.engines.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// 遍历 `(名称, 算法族)`，顺序不固定
    pub fn engines(&self) -> impl Iterator<Item = (&str, EngineKind)> {
        self.engines
            .iter()
            .map(|(name, engine)| (name.as_str(), engine.kind()))
    }

    /// 使用活动引擎加密
    pub fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>> {
        self.active_engine()?.encrypt(plaintext)
    }

    /// 使用活动引擎解密
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<String> {
        self.active_engine()?.decrypt(ciphertext)
    }

    /// 解密文本形式的密文（例如 Fernet 令牌）
    pub fn decrypt_text(&self, token: &str) -> Result<String> {
        self.decrypt(token.as_bytes())
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ConfigurationError::EmptyEngineName.into());
    }
    Ok(())
}

#[cfg_attr(
    not(all(feature = "asymmetric", feature = "symmetric")),
    allow(unused_variables)
)]
fn build_engine(
    engine_config: &EngineConfig,
    crypto: &CryptoConfig,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<Engine> {
    match engine_config {
        #[cfg(feature = "asymmetric")]
        EngineConfig::Asymmetric {
            private_key_path,
            public_key_path,
            password_env,
            ..
        } => {
            let password = match password_env {
                Some(var) => Some(SecretString::from(lookup(var).ok_or_else(|| {
                    ConfigurationError::PasswordEnvNotSet(var.clone())
                })?)),
                None => None,
            };
            let engine = AsymmetricEngine::new(
                private_key_path.as_deref(),
                public_key_path.as_deref(),
                password.as_ref(),
            )?;
            Ok(engine.into())
        }
        #[cfg(feature = "symmetric")]
        EngineConfig::Symmetric {
            key_path, ttl_secs, ..
        } => {
            let mut engine = SymmetricEngine::new(key_path.as_deref())?;
            if let Some(ttl) = (*ttl_secs).or(crypto.fernet_ttl_secs) {
                engine = engine.with_ttl(Duration::from_secs(ttl));
            }
            Ok(engine.into())
        }
        #[allow(unreachable_patterns)]
        other => Err(Error::Format(format!(
            "engine '{}' requires a feature that is not enabled",
            other.name()
        ))),
    }
}
