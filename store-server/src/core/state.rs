use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::{GoogleVerifier, JwtService};
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::{User, UserRole};
use crate::db::repository::UserRepository;
use crate::orders::{CheckoutEngine, OrderLifecycle};
use crate::pricing::OfferEngine;
use shared::util::now_millis;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是店面服务的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | oauth | Arc<GoogleVerifier> | Google OAuth 核验 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// Google OAuth 核验服务
    pub oauth: Arc<GoogleVerifier>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        oauth: Arc<GoogleVerifier>,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            oauth,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/store.db)
    /// 3. JWT / OAuth 服务
    /// 4. 播种管理员账号 (如配置了 ADMIN_EMAIL / ADMIN_PASSWORD)
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_path();
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let state = Self::from_parts(config, db_service.db);
        state.seed_admin().await;
        state
    }

    /// 基于内存数据库初始化 (测试用)
    pub async fn initialize_memory(config: &Config) -> Self {
        let db_service = DbService::new_memory()
            .await
            .expect("Failed to initialize in-memory database");
        let state = Self::from_parts(config, db_service.db);
        state.seed_admin().await;
        state
    }

    fn from_parts(config: &Config, db: Surreal<Db>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let oauth = Arc::new(GoogleVerifier::new(config.google_client_id.clone()));
        Self::new(config.clone(), db, jwt_service, oauth)
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 下单引擎
    pub fn checkout_engine(&self) -> CheckoutEngine {
        CheckoutEngine::new(self.db.clone(), self.config.shipping_policy())
    }

    /// 订单生命周期引擎
    pub fn order_lifecycle(&self) -> OrderLifecycle {
        OrderLifecycle::new(self.db.clone())
    }

    /// 优惠解析引擎
    pub fn offer_engine(&self) -> OfferEngine {
        OfferEngine::new(self.db.clone())
    }

    /// 首次启动播种管理员账号
    ///
    /// 只在配置了 ADMIN_EMAIL/ADMIN_PASSWORD 且该邮箱不存在时创建。
    async fn seed_admin(&self) {
        let (Some(email), Some(password)) =
            (&self.config.admin_email, &self.config.admin_password)
        else {
            return;
        };

        let repo = UserRepository::new(self.db.clone());
        match repo.find_by_email(email).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                let hash = match User::hash_password(password) {
                    Ok(h) => h,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to hash admin password");
                        return;
                    }
                };
                let admin = User {
                    id: None,
                    email: email.clone(),
                    display_name: "Store Admin".to_string(),
                    hash_pass: Some(hash),
                    role: UserRole::Admin,
                    oauth_provider: None,
                    oauth_subject: None,
                    is_active: true,
                    created_at: now_millis(),
                };
                match repo.create(admin).await {
                    Ok(_) => tracing::info!(email = %email, "Seeded admin account"),
                    Err(e) => tracing::error!(error = %e, "Failed to seed admin account"),
                }
            }
            Err(e) => tracing::error!(error = %e, "Failed to look up admin account"),
        }
    }
}
