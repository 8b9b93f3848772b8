//! 发送流程集成测试
//!
//! 用本地 MockServer 模拟站点，验证诊断抓取 → 分类 → 投递的
//! 网络层行为：请求次数、负载一致性、请求头、未运行时零投递

use std::time::{Duration, Instant};
use survey_vote_submit::{AppConfig, AppError, PageError, PingoClient, VoteFlow, VoteSettings};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 数值问卷页面样例
const NUMERIC_PAGE: &str = r#"
<html>
<head>
  <meta content="authenticity_token" name="csrf-param" />
  <meta content="numtok123" name="csrf-token" />
</head>
<body>
  <form action="/vote" method="post">
    <input id="id" name="id" type="hidden" value="rec1001" />
    <input id="option" name="option" required="required" step="0.00001" type="number" />
  </form>
</body>
</html>
"#;

/// 文本问卷页面样例
const TEXT_PAGE: &str = r#"
<html>
<head>
  <meta content="authenticity_token" name="csrf-param" />
  <meta content="texttok456" name="csrf-token" />
</head>
<body>
  <form action="/vote" method="post">
    <input id="id" name="id" type="hidden" value="rec77" />
    <textarea name="option_text"></textarea>
  </form>
</body>
</html>
"#;

/// 未运行页面样例
const NOT_RUNNING_PAGE: &str = r#"
<html>
<body>
  <div id="not_running">This survey is not running at the moment.</div>
</body>
</html>
"#;

/// 缺少元信息标签（没有令牌）的残缺页面
const BROKEN_PAGE: &str = r#"
<html>
<body>
  <form action="/vote" method="post">
    <input id="id" name="id" type="hidden" value="rec1001" />
  </form>
</body>
</html>
"#;

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        base_url: server.uri(),
        max_concurrent_votes: 100,
        prefs_file: "prefs.toml".to_string(),
    }
}

fn flow_for(config: &AppConfig) -> VoteFlow {
    let client = PingoClient::new(config).expect("创建客户端失败");
    VoteFlow::new(client, config)
}

fn settings_for(session: u32, amount: usize) -> VoteSettings {
    VoteSettings {
        session,
        amount,
        text: "hallo".to_string(),
        choice: 1,
        numeric: 42,
    }
}

/// 收集所有发到 /vote 的请求体
async fn vote_bodies(server: &MockServer) -> Vec<Vec<u8>> {
    server
        .received_requests()
        .await
        .expect("MockServer 应当记录收到的请求")
        .iter()
        .filter(|r| r.method.as_str() == "POST" && r.url.path() == "/vote")
        .map(|r| r.body.clone())
        .collect()
}

#[tokio::test]
async fn not_running_survey_issues_zero_votes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1001"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NOT_RUNNING_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/vote"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let stats = flow_for(&config)
        .run(&settings_for(1001, 25))
        .await
        .expect("未运行只告警，不应当返回错误");

    assert_eq!(stats.total(), 0);
    server.verify().await;
}

#[tokio::test]
async fn dispatch_issues_exactly_amount_votes_with_identical_bodies() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/77"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TEXT_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/vote"))
        .respond_with(ResponseTemplate::new(200))
        .expect(7)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let stats = flow_for(&config)
        .run(&settings_for(77, 7))
        .await
        .expect("发送应当成功");

    assert_eq!(stats.success, 7);
    assert_eq!(stats.failed, 0);

    let bodies = vote_bodies(&server).await;
    assert_eq!(bodies.len(), 7);
    // 所有请求携带逐字节相同的负载
    for body in &bodies {
        assert_eq!(body, &bodies[0]);
    }

    let text = String::from_utf8_lossy(&bodies[0]).to_string();
    assert!(text.contains("authenticity_token=texttok456"));
    assert!(text.contains("id=rec77"));
    assert!(text.contains("option%5B%5D=hallo"));

    server.verify().await;
}

#[tokio::test]
async fn numeric_survey_sends_plain_option_field() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1001"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NUMERIC_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/vote"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let stats = flow_for(&config)
        .run(&settings_for(1001, 3))
        .await
        .expect("发送应当成功");

    assert_eq!(stats.total(), 3);

    let bodies = vote_bodies(&server).await;
    let text = String::from_utf8_lossy(&bodies[0]).to_string();
    assert!(text.contains("option=42"));
    assert!(!text.contains("option%5B%5D"));
    assert!(text.contains("authenticity_token=numtok123"));
    assert!(text.contains("id=rec1001"));

    server.verify().await;
}

#[tokio::test]
async fn vote_requests_carry_browser_impersonation_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/77"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TEXT_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/vote"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let config = config_for(&server);
    flow_for(&config)
        .run(&settings_for(77, 1))
        .await
        .expect("发送应当成功");

    let requests = server
        .received_requests()
        .await
        .expect("MockServer 应当记录收到的请求");
    let vote = requests
        .iter()
        .find(|r| r.method.as_str() == "POST" && r.url.path() == "/vote")
        .expect("应当有一条投票请求");

    let header = |name: &str| {
        vote.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };

    assert_eq!(
        header("user-agent"),
        "Mozilla/5.0 (Windows NT 6.1; WOW64; rv:25.0) Gecko/20100101 Firefox/25.0"
    );
    // Referer 从访问编号派生
    assert_eq!(header("referer"), format!("{}/77", server.uri()));
    assert_eq!(header("content-type"), "application/x-www-form-urlencoded");
    assert_eq!(header("connection"), "keep-alive");
    assert!(header("accept").contains("text/html"));
    assert!(!header("accept-language").is_empty());
    assert!(!header("accept-encoding").is_empty());
}

#[tokio::test]
async fn malformed_page_aborts_before_any_vote() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1001"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BROKEN_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/vote"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let err = flow_for(&config)
        .run(&settings_for(1001, 25))
        .await
        .expect_err("残缺页面应当让发送中止");

    assert!(matches!(
        err,
        AppError::Page(PageError::TokenNotFound { session: 1001 })
    ));
    server.verify().await;
}

#[tokio::test]
async fn non_2xx_vote_responses_are_not_retried_or_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/77"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TEXT_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/vote"))
        .respond_with(ResponseTemplate::new(500))
        .expect(5)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let stats = flow_for(&config)
        .run(&settings_for(77, 5))
        .await
        .expect("尽力而为的发送不应当因 500 失败");

    // 响应状态码不检查：请求发出即计为完成，恰好 5 次，没有重试
    assert_eq!(stats.total(), 5);
    server.verify().await;
}

#[tokio::test]
async fn votes_are_dispatched_concurrently() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/77"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TEXT_PAGE))
        .mount(&server)
        .await;
    // 每条投票响应延迟 500ms：串行发 8 条至少要 4 秒
    Mock::given(method("POST"))
        .and(path("/vote"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .expect(8)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let start = Instant::now();
    let stats = flow_for(&config)
        .run(&settings_for(77, 8))
        .await
        .expect("发送应当成功");
    let elapsed = start.elapsed();

    assert_eq!(stats.total(), 8);
    assert!(
        elapsed < Duration::from_secs(2),
        "并发投递不应当接近串行耗时: {:?}",
        elapsed
    );
    server.verify().await;
}
