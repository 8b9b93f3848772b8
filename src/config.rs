/// 程序配置
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// PINGO 站点基础 URL
    pub base_url: String,
    /// 同时在途的投票请求数量上限
    pub max_concurrent_votes: usize,
    /// 设置文件路径
    pub prefs_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://pingo.upb.de".to_string(),
            max_concurrent_votes: 100,
            prefs_file: "prefs.toml".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            base_url: std::env::var("PINGO_BASE_URL").unwrap_or(default.base_url),
            max_concurrent_votes: std::env::var("MAX_CONCURRENT_VOTES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_votes),
            prefs_file: std::env::var("PREFS_FILE").unwrap_or(default.prefs_file),
        }
    }
}
