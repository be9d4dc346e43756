use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::orders::ShippingPolicy;

/// 服务器配置 - 店面服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/conch/store | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | GOOGLE_CLIENT_ID | (空) | Google OAuth client id |
/// | SHIPPING_FLAT_FEE | 5.0 | 固定运费 |
/// | FREE_SHIPPING_THRESHOLD | 99.0 | 免运费门槛 |
/// | ADMIN_EMAIL / ADMIN_PASSWORD | (空) | 首次启动播种的管理员账号 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/conch HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// Google OAuth client id (为空则禁用 OAuth 登录)
    pub google_client_id: String,
    /// 固定运费
    pub shipping_flat_fee: f64,
    /// 免运费门槛 (小计达到后免运费)
    pub free_shipping_threshold: f64,
    /// 首次启动播种的管理员邮箱
    pub admin_email: Option<String>,
    /// 首次启动播种的管理员密码
    pub admin_password: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/conch/store".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            google_client_id: std::env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            shipping_flat_fee: std::env::var("SHIPPING_FLAT_FEE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5.0),
            free_shipping_threshold: std::env::var("FREE_SHIPPING_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(99.0),
            admin_email: std::env::var("ADMIN_EMAIL").ok(),
            admin_password: std::env::var("ADMIN_PASSWORD").ok(),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 数据库路径 (work_dir/database/store.db)
    pub fn database_path(&self) -> PathBuf {
        self.database_dir().join("store.db")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(PathBuf::from(&self.work_dir).join("logs"))?;
        Ok(())
    }

    /// 运费策略
    pub fn shipping_policy(&self) -> ShippingPolicy {
        ShippingPolicy {
            flat_fee: self.shipping_flat_fee,
            free_threshold: self.free_shipping_threshold,
        }
    }
}
