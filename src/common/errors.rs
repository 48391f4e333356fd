use std::fmt;
use thiserror::Error;

#[cfg(feature = "asymmetric")]
use crate::asymmetric::systems::traditional::rsa::RsaSystemError;
#[cfg(feature = "symmetric")]
use crate::symmetric::systems::fernet::FernetSystemError;

/// 引擎操作所需的密钥角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    /// 非对称公钥，用于加密
    Public,
    /// 非对称私钥，用于解密
    Private,
    /// 对称共享密钥
    Shared,
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRole::Public => f.write_str("public"),
            KeyRole::Private => f.write_str("private"),
            KeyRole::Shared => f.write_str("symmetric"),
        }
    }
}

/// 注册表或引擎处于不可用状态时的错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("No secrets engine has been configured")]
    NoActiveEngine,

    #[error("No registered engines exist with name: {0}")]
    EngineNotFound(String),

    #[error("Engine name must not be empty")]
    EmptyEngineName,

    #[error("No {0} key has been set up yet")]
    KeyNotConfigured(KeyRole),

    #[error("Password environment variable is not set: {0}")]
    PasswordEnvNotSet(String),
}

/// 错误的粗粒度分类，供宿主层决定如何呈现失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 没有活动引擎、引擎名不存在、密钥尚未加载
    Configuration,
    /// PEM 格式错误、密码错误或缺失、对称密钥格式错误
    KeyLoad,
    /// OAEP 填充/格式不匹配、明文超长
    Crypto,
    /// 令牌签名无效，或令牌格式错误/已过期
    Authentication,
    Io,
    Format,
}

/// 加密操作可能遇到的错误类型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[cfg(feature = "asymmetric")]
    #[error("RSA error: {0}")]
    Rsa(#[from] RsaSystemError),

    #[cfg(feature = "symmetric")]
    #[error("Fernet error: {0}")]
    Fernet(#[from] FernetSystemError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error (JSON): {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data format: {0}")]
    Format(String),
}

impl Error {
    /// 返回该错误所属的分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::Configuration,
            #[cfg(feature = "asymmetric")]
            Error::Rsa(e) => e.kind(),
            #[cfg(feature = "symmetric")]
            Error::Fernet(e) => e.kind(),
            Error::Io(_) => ErrorKind::Io,
            Error::Json(_) | Error::Format(_) => ErrorKind::Format,
        }
    }
}

// 手动实现一些无法使用 #[from] 的转换
impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::Format(format!("UTF-8 conversion error: {}", err))
    }
}

/// `secrets-kit` 的结果类型别名
pub type Result<T, E = Error> = std::result::Result<T, E>;
