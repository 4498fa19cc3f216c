use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvLinkerError {
    NotFound(String),
    GenerationExhausted(String),
    StoreFailure(String),
    Codec(String),
    AccountingFailure(String),
    Config(String),
    FileOperation(String),
    InvalidTarget(String),
}

impl KvLinkerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            KvLinkerError::NotFound(_) => "E001",
            KvLinkerError::GenerationExhausted(_) => "E002",
            KvLinkerError::StoreFailure(_) => "E003",
            KvLinkerError::Codec(_) => "E004",
            KvLinkerError::AccountingFailure(_) => "E005",
            KvLinkerError::Config(_) => "E006",
            KvLinkerError::FileOperation(_) => "E007",
            KvLinkerError::InvalidTarget(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            KvLinkerError::NotFound(_) => "Resource Not Found",
            KvLinkerError::GenerationExhausted(_) => "Code Generation Exhausted",
            KvLinkerError::StoreFailure(_) => "Store Failure",
            KvLinkerError::Codec(_) => "Codec Error",
            KvLinkerError::AccountingFailure(_) => "Accounting Failure",
            KvLinkerError::Config(_) => "Configuration Error",
            KvLinkerError::FileOperation(_) => "File Operation Error",
            KvLinkerError::InvalidTarget(_) => "Invalid Target",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            KvLinkerError::NotFound(msg) => msg,
            KvLinkerError::GenerationExhausted(msg) => msg,
            KvLinkerError::StoreFailure(msg) => msg,
            KvLinkerError::Codec(msg) => msg,
            KvLinkerError::AccountingFailure(msg) => msg,
            KvLinkerError::Config(msg) => msg,
            KvLinkerError::FileOperation(msg) => msg,
            KvLinkerError::InvalidTarget(msg) => msg,
        }
    }

    /// 是否应当映射为 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, KvLinkerError::NotFound(_))
    }

    /// Prefix the message with the operation that was in flight.
    ///
    /// The variant is preserved, so callers can still match on the kind.
    pub fn with_context<C: fmt::Display>(self, context: C) -> Self {
        let wrap = |msg: String| format!("{}: {}", context, msg);
        match self {
            KvLinkerError::NotFound(msg) => KvLinkerError::NotFound(wrap(msg)),
            KvLinkerError::GenerationExhausted(msg) => {
                KvLinkerError::GenerationExhausted(wrap(msg))
            }
            KvLinkerError::StoreFailure(msg) => KvLinkerError::StoreFailure(wrap(msg)),
            KvLinkerError::Codec(msg) => KvLinkerError::Codec(wrap(msg)),
            KvLinkerError::AccountingFailure(msg) => KvLinkerError::AccountingFailure(wrap(msg)),
            KvLinkerError::Config(msg) => KvLinkerError::Config(wrap(msg)),
            KvLinkerError::FileOperation(msg) => KvLinkerError::FileOperation(wrap(msg)),
            KvLinkerError::InvalidTarget(msg) => KvLinkerError::InvalidTarget(wrap(msg)),
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for KvLinkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for KvLinkerError {}

// 便捷的构造函数
impl KvLinkerError {
    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        KvLinkerError::NotFound(msg.into())
    }

    pub fn generation_exhausted<T: Into<String>>(msg: T) -> Self {
        KvLinkerError::GenerationExhausted(msg.into())
    }

    pub fn store_failure<T: Into<String>>(msg: T) -> Self {
        KvLinkerError::StoreFailure(msg.into())
    }

    pub fn codec<T: Into<String>>(msg: T) -> Self {
        KvLinkerError::Codec(msg.into())
    }

    pub fn accounting_failure<T: Into<String>>(msg: T) -> Self {
        KvLinkerError::AccountingFailure(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        KvLinkerError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        KvLinkerError::FileOperation(msg.into())
    }

    pub fn invalid_target<T: Into<String>>(msg: T) -> Self {
        KvLinkerError::InvalidTarget(msg.into())
    }
}

// redb 的各类错误统一归为 StoreFailure
macro_rules! impl_from_store_error {
    ($($err:ty),* $(,)?) => {
        $(
            impl From<$err> for KvLinkerError {
                fn from(err: $err) -> Self {
                    KvLinkerError::StoreFailure(err.to_string())
                }
            }
        )*
    };
}

impl_from_store_error!(
    redb::Error,
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

impl From<std::io::Error> for KvLinkerError {
    fn from(err: std::io::Error) -> Self {
        KvLinkerError::FileOperation(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for KvLinkerError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        KvLinkerError::Codec(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, KvLinkerError>;
