//! 提交负载构建模块

use crate::error::PageError;
use crate::models::{AnswerValue, SurveyKind, SurveyPage, VotePayload};
use crate::settings::VoteSettings;
use tracing::info;

/// 根据问卷类型构建提交负载
///
/// # 参数
/// - `page`: 诊断抓取的解析结果
/// - `settings`: 当前投票设置
///
/// # 返回
/// 返回构建好的负载；单选索引越界时返回类型化错误，不做截断或回绕
pub fn build_payload(
    page: &SurveyPage,
    settings: &VoteSettings,
) -> Result<VotePayload, PageError> {
    let answer = match &page.kind {
        SurveyKind::Numeric => {
            info!("  发送到数值问卷...");
            AnswerValue::Numeric(settings.numeric)
        }
        SurveyKind::SingleChoice(options) => {
            let value = options
                .get(settings.choice)
                .ok_or(PageError::ChoiceOutOfRange {
                    index: settings.choice,
                    option_count: options.len(),
                })?;
            info!("  发送到单选/多选问卷...");
            AnswerValue::Choice(value.clone())
        }
        SurveyKind::FreeText => {
            info!("  发送到文本/标签云问卷...");
            AnswerValue::Text(settings.text.clone())
        }
    };

    Ok(VotePayload {
        token: page.token.clone(),
        record_id: page.record_id.clone(),
        answer,
    })
}
