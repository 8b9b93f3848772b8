//! # Survey Vote Submit
//!
//! 一个面向 PINGO 课堂问卷站点的批量投票命令行工具
//!
//! ## 架构设计
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 封装对站点的 HTTP 访问
//! - `PingoClient` - 诊断抓取（GET）与投票提交（POST）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 只处理单个页面/负载
//! - `page_parser` - 具名字段提取契约（令牌、记录ID、问卷分类）
//! - `payload_builder` - 按问卷类型构建提交负载
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义一次发送的完整流程
//! - `VoteFlow` - 流程编排（抓取 → 分类 → 构建 → 并发投递）
//!
//! ### ④ 应用层（App）
//! - `app` - 交互菜单与设置编辑
//! - `settings` - 持久化的投票设置（扁平 TOML 文档，逐键默认值回退）
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod services;
pub mod settings;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use clients::PingoClient;
pub use config::AppConfig;
pub use error::{AppError, AppResult, HttpError, PageError, SettingsError};
pub use models::{AnswerValue, SurveyKind, SurveyPage, VotePayload};
pub use services::{build_payload, parse_survey_page};
pub use settings::VoteSettings;
pub use workflow::{DispatchStats, VoteFlow};
