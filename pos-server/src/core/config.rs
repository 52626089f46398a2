use chrono_tz::Tz;

use crate::auth::JwtConfig;
use crate::utils::time::parse_timezone;

/// 服务器配置 - POS 服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATABASE_PATH | ./data/pos.db | SQLite 数据库文件 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | BUSINESS_TIMEZONE | UTC | 业务时区 (IANA)，用于日期边界 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | DB_MAX_CONNECTIONS | 5 | 连接池大小 |
/// | AUDIT_BUFFER_SIZE | 1024 | 审计日志通道容量 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 格式日志 |
/// | LOG_DIR | (unset) | 日志目录，设置后按天滚动写文件 |
/// | JWT_SECRET | (dev key) | JWT 密钥 (至少 32 字符) |
/// | JWT_ISSUER | pos-auth | 令牌签发者 |
/// | JWT_AUDIENCE | pos-clients | 令牌受众 |
/// | JWT_EXPIRATION_MINUTES | 1440 | 令牌有效期 |
///
/// # 示例
///
/// ```ignore
/// DATABASE_PATH=/var/lib/pos/pos.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 数据库文件路径
    pub database_path: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 业务时区，日报和日期搜索按此时区切分日期
    pub business_timezone: Tz,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 连接池最大连接数
    pub db_max_connections: u32,
    /// 审计日志通道容量
    pub audit_buffer_size: usize,
    /// 日志级别
    pub log_level: String,
    /// JSON 格式日志
    pub log_json: bool,
    /// 日志目录
    pub log_dir: Option<String>,
    /// JWT 认证配置
    pub jwt: JwtConfig,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./data/pos.db".into()),
            http_port: env_or("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            business_timezone: parse_timezone(
                &std::env::var("BUSINESS_TIMEZONE").unwrap_or_else(|_| "UTC".into()),
            ),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", 30000),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 5),
            audit_buffer_size: env_or("AUDIT_BUFFER_SIZE", 1024),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_or("LOG_JSON", false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            jwt: JwtConfig::from_env(),
        }
    }

    /// 测试配置: 内存数据库路径占位，UTC，固定 JWT 密钥
    pub fn for_tests() -> Self {
        Self {
            database_path: ":memory:".into(),
            http_port: 0,
            environment: "test".into(),
            business_timezone: Tz::UTC,
            request_timeout_ms: 30000,
            db_max_connections: 1,
            audit_buffer_size: 256,
            log_level: "debug".into(),
            log_json: false,
            log_dir: None,
            jwt: JwtConfig {
                secret: "test-secret-key-that-is-at-least-32-chars".into(),
                expiration_minutes: 60,
                issuer: "pos-auth".into(),
                audience: "pos-clients".into(),
            },
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 启动前校验
    ///
    /// 生产环境必须显式配置 JWT_SECRET。
    pub fn validate(&self) -> Result<(), String> {
        if self.is_production() && self.jwt.is_development_secret() {
            return Err("JWT_SECRET must be set in production".into());
        }
        if self.jwt.secret.len() < 32 {
            return Err("JWT_SECRET must be at least 32 characters long".into());
        }
        if self.db_max_connections == 0 {
            return Err("DB_MAX_CONNECTIONS must be at least 1".into());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
