//! 应用主结构与交互菜单
//!
//! 七项菜单循环：五个设置编辑项、触发发送、退出。
//! 编辑成功立即持久化；无效输入只打印诊断并保持旧值。

use crate::clients::PingoClient;
use crate::config::AppConfig;
use crate::error::SettingsError;
use crate::logger;
use crate::settings::{self, VoteSettings};
use crate::workflow::VoteFlow;
use anyhow::Result;
use dialoguer::{Input, Select};
use std::path::PathBuf;
use tracing::{error, info};

/// 应用主结构
pub struct App {
    config: AppConfig,
    client: PingoClient,
    settings: VoteSettings,
    prefs_path: PathBuf,
}

impl App {
    /// 初始化应用
    ///
    /// 设置存储的初始化是这里的一个明确步骤：
    /// 文件不存在则用默认值创建，再加载
    pub async fn initialize(config: AppConfig) -> Result<Self> {
        logger::log_startup(config.max_concurrent_votes);

        let prefs_path = PathBuf::from(&config.prefs_file);
        let settings = settings::init_store(&prefs_path, VoteSettings::default).await?;
        let client = PingoClient::new(&config)?;

        Ok(Self {
            config,
            client,
            settings,
            prefs_path,
        })
    }

    /// 运行交互菜单，直到用户选择退出
    pub async fn run(mut self) -> Result<()> {
        loop {
            let items = self.menu_items();
            let selection = match Select::new()
                .with_prompt("请选择 (1-7)")
                .items(&items)
                .default(0)
                .interact()
            {
                Ok(s) => s,
                // Ctrl-C 或非交互终端
                Err(_) => break,
            };

            match selection {
                0 => {
                    self.edit_field("文本答案", VoteSettings::apply_text)
                        .await?
                }
                1 => {
                    self.edit_field("选项索引", VoteSettings::apply_choice)
                        .await?
                }
                2 => {
                    self.edit_field("数值答案", VoteSettings::apply_numeric)
                        .await?
                }
                3 => {
                    self.edit_field("发送次数", VoteSettings::apply_amount)
                        .await?
                }
                4 => {
                    self.edit_field("访问编号", VoteSettings::apply_session)
                        .await?
                }
                5 => self.start_sending().await,
                6 => break,
                _ => {}
            }
        }

        Ok(())
    }

    /// 菜单条目，每轮循环重建以显示当前值
    fn menu_items(&self) -> Vec<String> {
        vec![
            format!("1 - 文本/标签云问卷答案: {}", self.settings.text),
            format!("2 - 单选/多选问卷选项 (从0开始): {}", self.settings.choice),
            format!("3 - 数值问卷答案: {}", self.settings.numeric),
            format!("4 - 发送次数: {}", self.settings.amount),
            format!("5 - 问卷访问编号: {}", self.settings.session),
            "6 - 开始发送!".to_string(),
            "7 - 退出".to_string(),
        ]
    }

    /// 修改一个设置字段
    ///
    /// 校验通过才持久化；无效输入打印诊断，字段保持旧值，文档不落盘
    async fn edit_field(
        &mut self,
        label: &str,
        apply: fn(&mut VoteSettings, &str) -> Result<(), SettingsError>,
    ) -> Result<()> {
        let input: String = Input::new()
            .with_prompt(format!("新的{}", label))
            .allow_empty(true)
            .interact_text()?;

        match apply(&mut self.settings, &input) {
            Ok(()) => {
                self.settings.save(&self.prefs_path).await?;
                info!("✓ {}已更新", label);
            }
            Err(e) => info!("⚠️ {}未修改: {}", label, e),
        }

        Ok(())
    }

    /// 触发一次发送流程
    ///
    /// 发送失败不退出菜单，打印错误后继续
    async fn start_sending(&self) {
        let flow = VoteFlow::new(self.client.clone(), &self.config);

        match flow.run(&self.settings).await {
            Ok(stats) => {
                if stats.total() > 0 {
                    info!("done! 共投递 {} 次\n", stats.total());
                }
            }
            Err(e) => error!("❌ 发送失败: {}", e),
        }
    }
}
