//! 持久化的投票设置
//!
//! 五个标量字段存放在一份扁平的 TOML 文档里，键名沿用站点脚本时代的
//! 命名（sessionId / sendAmount / valueText / valueSingleChoice /
//! valueNumeric）。加载时逐键回退：缺失的键记录日志后取默认值，
//! 文档里已有的键保持不变。

use crate::error::{AppResult, SettingsError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

/// 投票设置
///
/// 菜单修改成功后立即持久化；一次发送期间各字段保持不变
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VoteSettings {
    /// 问卷访问编号
    #[serde(rename = "sessionId")]
    pub session: u32,
    /// 发送次数
    #[serde(rename = "sendAmount")]
    pub amount: usize,
    /// 文本/标签云问卷的答案
    #[serde(rename = "valueText")]
    pub text: String,
    /// 单选问卷的选项索引（从0开始，0对应A）
    #[serde(rename = "valueSingleChoice")]
    pub choice: usize,
    /// 数值问卷的答案
    #[serde(rename = "valueNumeric")]
    pub numeric: i64,
}

impl Default for VoteSettings {
    fn default() -> Self {
        Self {
            session: 1001,
            amount: 25,
            text: "shrek'd".to_string(),
            choice: 1,
            numeric: 42,
        }
    }
}

/// 逐键回退用的中间结构，字段全部可选
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    #[serde(rename = "sessionId")]
    session: Option<u32>,
    #[serde(rename = "sendAmount")]
    amount: Option<usize>,
    #[serde(rename = "valueText")]
    text: Option<String>,
    #[serde(rename = "valueSingleChoice")]
    choice: Option<usize>,
    #[serde(rename = "valueNumeric")]
    numeric: Option<i64>,
}

/// 缺键回退，记录哪个键缺失
fn fallback<T: fmt::Display>(key: &str, value: Option<T>, default: T) -> T {
    match value {
        Some(v) => v,
        None => {
            warn!("⚠️ 设置缺少键 {}，回退到默认值 {}", key, default);
            default
        }
    }
}

impl VoteSettings {
    /// 从 TOML 文本解析设置
    ///
    /// # 参数
    /// - `content`: TOML 文本
    /// - `path`: 来源路径（用于错误报告）
    pub fn from_toml_str(content: &str, path: &str) -> Result<Self, SettingsError> {
        let raw: RawSettings =
            toml::from_str(content).map_err(|e| SettingsError::parse_failed(path, e))?;
        let default = Self::default();

        Ok(Self {
            session: fallback("sessionId", raw.session, default.session),
            amount: fallback("sendAmount", raw.amount, default.amount),
            text: fallback("valueText", raw.text, default.text),
            choice: fallback("valueSingleChoice", raw.choice, default.choice),
            numeric: fallback("valueNumeric", raw.numeric, default.numeric),
        })
    }

    /// 从文件加载设置
    pub async fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| SettingsError::read_failed(path.display().to_string(), e))?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// 保存设置到文件
    pub async fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content = toml::to_string(self)
            .map_err(|e| SettingsError::write_failed(path.display().to_string(), e))?;
        fs::write(path, content)
            .await
            .map_err(|e| SettingsError::write_failed(path.display().to_string(), e))?;
        Ok(())
    }

    // ========== 菜单编辑操作 ==========
    // 每个操作接收原始输入字符串并校验，无效输入返回错误且字段保持旧值

    /// 修改文本答案，空输入被拒绝
    pub fn apply_text(&mut self, input: &str) -> Result<(), SettingsError> {
        if input.is_empty() {
            return Err(SettingsError::EmptyText);
        }
        self.text = input.to_string();
        Ok(())
    }

    /// 修改单选选项索引
    pub fn apply_choice(&mut self, input: &str) -> Result<(), SettingsError> {
        self.choice = parse_integer("选项索引", input)?;
        Ok(())
    }

    /// 修改数值答案
    pub fn apply_numeric(&mut self, input: &str) -> Result<(), SettingsError> {
        self.numeric = parse_integer("数值答案", input)?;
        Ok(())
    }

    /// 修改发送次数
    pub fn apply_amount(&mut self, input: &str) -> Result<(), SettingsError> {
        self.amount = parse_integer("发送次数", input)?;
        Ok(())
    }

    /// 修改访问编号，必须为正整数
    pub fn apply_session(&mut self, input: &str) -> Result<(), SettingsError> {
        let value: u32 = parse_integer("访问编号", input)?;
        if value == 0 {
            return Err(SettingsError::NotPositive {
                field: "访问编号",
            });
        }
        self.session = value;
        Ok(())
    }
}

/// 解析整数输入
fn parse_integer<T: std::str::FromStr>(
    field: &'static str,
    input: &str,
) -> Result<T, SettingsError> {
    input.trim().parse().map_err(|_| SettingsError::NotAnInteger {
        field,
        value: input.to_string(),
    })
}

/// 初始化设置存储
///
/// 进程启动时显式调用一次：文件不存在则先用注入的默认值提供者创建，
/// 再加载。默认文档的生成是启动期的一个明确步骤，不藏在加载路径里。
pub async fn init_store(
    path: &Path,
    default_provider: impl FnOnce() -> VoteSettings,
) -> AppResult<VoteSettings> {
    if !path.exists() {
        info!("📝 设置文件 {} 不存在，使用默认值创建", path.display());
        default_provider().save(path).await?;
    }
    Ok(VoteSettings::load(path).await?)
}
