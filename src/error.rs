use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// HTTP 请求错误
    Http(HttpError),
    /// 问卷页面解析错误
    Page(PageError),
    /// 设置文件错误
    Settings(SettingsError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Http(e) => write!(f, "HTTP错误: {}", e),
            AppError::Page(e) => write!(f, "页面错误: {}", e),
            AppError::Settings(e) => write!(f, "设置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Http(e) => Some(e),
            AppError::Page(e) => Some(e),
            AppError::Settings(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// HTTP 请求错误
#[derive(Debug)]
pub enum HttpError {
    /// 构建 HTTP 客户端失败
    ClientBuildFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 网络请求失败
    RequestFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpError::ClientBuildFailed { source } => {
                write!(f, "构建HTTP客户端失败: {}", source)
            }
            HttpError::RequestFailed { url, source } => {
                write!(f, "请求失败 ({}): {}", url, source)
            }
        }
    }
}

impl std::error::Error for HttpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HttpError::ClientBuildFailed { source } | HttpError::RequestFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 问卷页面解析错误
#[derive(Debug, PartialEq, Eq)]
pub enum PageError {
    /// 问卷未在运行，或页面显示可关闭的警告横幅
    NotRunning {
        session: u32,
    },
    /// 页面中找不到安全令牌
    TokenNotFound {
        session: u32,
    },
    /// 页面中找不到投票记录ID
    RecordIdNotFound {
        session: u32,
    },
    /// 单选选项索引超出范围
    ChoiceOutOfRange {
        index: usize,
        option_count: usize,
    },
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::NotRunning { session } => {
                write!(f, "问卷 {} 未在运行", session)
            }
            PageError::TokenNotFound { session } => {
                write!(f, "问卷 {} 的页面中找不到安全令牌", session)
            }
            PageError::RecordIdNotFound { session } => {
                write!(f, "问卷 {} 的页面中找不到记录ID", session)
            }
            PageError::ChoiceOutOfRange {
                index,
                option_count,
            } => {
                write!(
                    f,
                    "选项索引 {} 超出范围，页面共有 {} 个选项",
                    index, option_count
                )
            }
        }
    }
}

impl std::error::Error for PageError {}

/// 设置文件与输入校验错误
#[derive(Debug)]
pub enum SettingsError {
    /// 输入不是整数
    NotAnInteger {
        field: &'static str,
        value: String,
    },
    /// 必须为正整数
    NotPositive {
        field: &'static str,
    },
    /// 空文本不允许
    EmptyText,
    /// 读取设置文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入设置文件失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML 解析失败
    ParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::NotAnInteger { field, value } => {
                write!(f, "{}必须是整数，输入 '{}' 无效", field, value)
            }
            SettingsError::NotPositive { field } => {
                write!(f, "{}必须是正整数", field)
            }
            SettingsError::EmptyText => write!(f, "不允许空文本"),
            SettingsError::ReadFailed { path, source } => {
                write!(f, "读取设置文件失败 ({}): {}", path, source)
            }
            SettingsError::WriteFailed { path, source } => {
                write!(f, "写入设置文件失败 ({}): {}", path, source)
            }
            SettingsError::ParseFailed { path, source } => {
                write!(f, "TOML解析失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::ReadFailed { source, .. }
            | SettingsError::WriteFailed { source, .. }
            | SettingsError::ParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<HttpError> for AppError {
    fn from(err: HttpError) -> Self {
        AppError::Http(err)
    }
}

impl From<PageError> for AppError {
    fn from(err: PageError) -> Self {
        AppError::Page(err)
    }
}

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        AppError::Settings(err)
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建HTTP客户端构建错误
    pub fn client_build_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Http(HttpError::ClientBuildFailed {
            source: Box::new(source),
        })
    }

    /// 创建网络请求失败错误
    pub fn request_failed(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Http(HttpError::RequestFailed {
            url: url.into(),
            source: Box::new(source),
        })
    }
}

impl SettingsError {
    /// 创建设置文件读取错误
    pub fn read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SettingsError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// 创建设置文件写入错误
    pub fn write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SettingsError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// 创建TOML解析错误
    pub fn parse_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SettingsError::ParseFailed {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
