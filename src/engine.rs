//! 封闭的引擎变体集合 `Engine`。
//!
//! 注册表只保存这里列出的变体；新增算法族需要在此添加变体，
//! 而不是在运行时注入任意的 trait 对象。
use crate::common::errors::Result;
use crate::common::traits::{EngineKind, SecretsEngine};

#[cfg(feature = "asymmetric")]
use crate::asymmetric::engines::AsymmetricEngine;
#[cfg(feature = "symmetric")]
use crate::symmetric::engines::SymmetricEngine;

/// 可注册到 [`SecretsRegistry`](crate::SecretsRegistry) 的引擎
#[derive(Clone, Debug)]
pub enum Engine {
    #[cfg(feature = "asymmetric")]
    Asymmetric(AsymmetricEngine),
    #[cfg(feature = "symmetric")]
    Symmetric(SymmetricEngine),
}

impl Engine {
    #[cfg(feature = "asymmetric")]
    pub fn as_asymmetric(&self) -> Option<&AsymmetricEngine> {
        match self {
            Engine::Asymmetric(engine) => Some(engine),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    #[cfg(feature = "symmetric")]
    pub fn as_symmetric(&self) -> Option<&SymmetricEngine> {
        match self {
            Engine::Symmetric(engine) => Some(engine),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }
}

impl SecretsEngine for Engine {
    fn kind(&self) -> EngineKind {
        match self {
            #[cfg(feature = "asymmetric")]
            Engine::Asymmetric(engine) => engine.kind(),
            #[cfg(feature = "symmetric")]
            Engine::Symmetric(engine) => engine.kind(),
        }
    }

    fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>> {
        match self {
            #[cfg(feature = "asymmetric")]
            Engine::Asymmetric(engine) => engine.encrypt(plaintext),
            #[cfg(feature = "symmetric")]
            Engine::Symmetric(engine) => engine.encrypt(plaintext),
        }
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<String> {
        match self {
            #[cfg(feature = "asymmetric")]
            Engine::Asymmetric(engine) => engine.decrypt(ciphertext),
            #[cfg(feature = "symmetric")]
            Engine::Symmetric(engine) => engine.decrypt(ciphertext),
        }
    }
}

#[cfg(feature = "asymmetric")]
impl From<AsymmetricEngine> for Engine {
    fn from(engine: AsymmetricEngine) -> Self {
        Engine::Asymmetric(engine)
    }
}

#[cfg(feature = "symmetric")]
impl From<SymmetricEngine> for Engine {
    fn from(engine: SymmetricEngine) -> Self {
        Engine::Symmetric(engine)
    }
}
