//! 问卷页面解析模块
//!
//! 对诊断抓取返回的原始页面执行具名字段提取：运行状态、安全令牌、
//! 记录ID、问卷类型与选项列表。任何字段缺失都以类型化错误报告。

use crate::error::PageError;
use crate::models::{SurveyKind, SurveyPage};
use regex::Regex;

/// 未运行标记（页面元素ID）
const NOT_RUNNING_MARKER: &str = r#"id="not_running""#;
/// 可关闭警告横幅标记，与未运行标记任一出现即中止
const ALERT_MARKER: &str = r#"data-dismiss="alert">"#;
/// 数值问卷的输入控件标记
const NUMERIC_MARKER: &str = r#"required="required" step="0.00001""#;

/// 解析问卷页面
///
/// # 参数
/// - `html`: 诊断抓取返回的原始页面
/// - `session`: 访问编号（用于错误报告）
///
/// # 返回
/// 返回解析出的 SurveyPage；问卷未运行或页面标记缺失时返回类型化错误
pub fn parse_survey_page(html: &str, session: u32) -> Result<SurveyPage, PageError> {
    if html.contains(NOT_RUNNING_MARKER) || html.contains(ALERT_MARKER) {
        return Err(PageError::NotRunning { session });
    }

    let token = extract_token(html).ok_or(PageError::TokenNotFound { session })?;
    let record_id = extract_record_id(html).ok_or(PageError::RecordIdNotFound { session })?;
    let kind = classify_kind(html);

    Ok(SurveyPage {
        token,
        record_id,
        kind,
    })
}

/// 提取安全令牌
///
/// 站点把令牌放在第二个 `content="..." name=...` 元信息标签里：
/// 第一个匹配是 csrf-param 的字段名，第二个才是 csrf-token 的值
fn extract_token(html: &str) -> Option<String> {
    let re = Regex::new(r#"content="([^"]*)" name="#).ok()?;
    let token = re
        .captures_iter(html)
        .nth(1)
        .and_then(|cap| cap.get(1).map(|m| m.as_str().to_string()));
    token
}

/// 提取投票记录ID，取第一个匹配的隐藏输入控件
fn extract_record_id(html: &str) -> Option<String> {
    let re = Regex::new(r#"<input id="id" name="id" type="hidden" value="([^"]*)""#).ok()?;
    re.captures(html)
        .and_then(|cap| cap.get(1).map(|m| m.as_str().to_string()))
}

/// 对页面分类
///
/// 数值标记优先；其次扫描单选控件的选项值；两者都没有则视为文本问卷
fn classify_kind(html: &str) -> SurveyKind {
    if html.contains(NUMERIC_MARKER) {
        return SurveyKind::Numeric;
    }

    let options = extract_options(html);
    if options.is_empty() {
        SurveyKind::FreeText
    } else {
        SurveyKind::SingleChoice(options)
    }
}

/// 按文档顺序提取单选控件的选项值，重复值保留
fn extract_options(html: &str) -> Vec<String> {
    match Regex::new(r#"name="option" type="radio" value="([^"]*)""#) {
        Ok(re) => re
            .captures_iter(html)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect(),
        Err(_) => Vec::new(),
    }
}
