//! 问卷页面与提交负载的数据模型

/// 问卷类型
///
/// 由诊断抓取的页面分类得出，决定提交负载中答案字段的名称和取值
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurveyKind {
    /// 数值输入问卷
    Numeric,
    /// 单选/多选问卷，携带页面上按文档顺序出现的选项值（允许重复）
    SingleChoice(Vec<String>),
    /// 文本/标签云问卷
    FreeText,
}

/// 一次诊断抓取的解析结果
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurveyPage {
    /// 站点签发的防伪令牌，提交时必须原样带回
    pub token: String,
    /// 限定本次投票所属问卷实例的记录ID
    pub record_id: String,
    /// 问卷类型
    pub kind: SurveyKind,
}

/// 答案字段取值
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerValue {
    /// 数值问卷，表单字段为 `option`
    Numeric(i64),
    /// 单选问卷，表单字段为 `option[]`，取页面选项列表中的值
    Choice(String),
    /// 文本问卷，表单字段为 `option[]`
    Text(String),
}

/// 投票提交负载
///
/// 每次发送只构建一次，之后在所有并发任务间只读共享
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VotePayload {
    pub token: String,
    pub record_id: String,
    pub answer: AnswerValue,
}

impl VotePayload {
    /// 转换为表单键值对
    ///
    /// 固定协议字段（UTF-8 标记、令牌、记录ID、提交标记）加上
    /// 恰好一个答案字段
    pub fn to_form(&self) -> Vec<(&'static str, String)> {
        let (field, value) = match &self.answer {
            AnswerValue::Numeric(n) => ("option", n.to_string()),
            AnswerValue::Choice(v) => ("option[]", v.clone()),
            AnswerValue::Text(t) => ("option[]", t.clone()),
        };

        vec![
            ("utf8", "✓".to_string()),
            ("authenticity_token", self.token.clone()),
            ("id", self.record_id.clone()),
            ("commit", "Vote!".to_string()),
            (field, value),
        ]
    }
}
