use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use sqlx::SqlitePool;
use uuid::Uuid;

use shared::message::{BusMessage, SyncPayload};
use shared::models::SyncStatus;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::admin_account;
use crate::message::MessageBus;

/// 资源版本管理器
///
/// 使用 DashMap 实现无锁并发的版本号管理。
/// 每种资源类型维护独立的版本号，支持原子递增。
///
/// # 使用场景
///
/// 用于 broadcast_sync 时自动生成递增的版本号，
/// 确保客户端可以通过版本号判断数据新旧。
#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    /// 创建空的版本管理器
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// 递增指定资源的版本号并返回新值
    ///
    /// 如果资源不存在，从 0 开始递增（返回 1）
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 获取指定资源的当前版本号
    ///
    /// 如果资源不存在，返回 0
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }

    /// 所有资源的版本快照
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.versions
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是终端服务器的核心数据结构，使用 Arc 实现浅拷贝。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | pool | SQLite 连接池 |
/// | message_bus | 进程内广播总线 |
/// | jwt_service | JWT 认证服务 |
/// | resource_versions | 资源版本管理 |
/// | epoch | 实例 epoch (启动时生成，客户端据此检测重启) |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// 消息总线
    pub message_bus: Arc<MessageBus>,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
    /// 资源版本管理器
    pub resource_versions: Arc<ResourceVersions>,
    /// 实例 epoch
    pub epoch: String,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/kiosk.db)
    /// 3. 管理员账户播种
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("kiosk.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let state = Self::with_pool(config.clone(), db_service.pool);
        state.seed_admin_account().await;
        state
    }

    /// 从现有连接池构造 (测试用)
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        Self {
            config,
            pool,
            message_bus: Arc::new(MessageBus::default()),
            jwt_service: Arc::new(JwtService::default()),
            resource_versions: Arc::new(ResourceVersions::new()),
            epoch: Uuid::new_v4().to_string(),
        }
    }

    /// 播种管理员账户 (已存在则跳过)
    ///
    /// 密码来自 ADMIN_PASSWORD；未设置时生成一次性密码并打印到日志。
    async fn seed_admin_account(&self) {
        match admin_account::get(&self.pool).await {
            Ok(Some(_)) => return,
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, "Failed to query admin account");
                return;
            }
        }

        let generated;
        let password = match &self.config.admin_password {
            Some(p) => p.as_str(),
            None => {
                generated = crate::auth::jwt::generate_printable_secret()[..16].to_string();
                tracing::warn!(
                    username = %self.config.admin_username,
                    initial_password = %generated,
                    "ADMIN_PASSWORD not set; generated an initial admin password — change it"
                );
                generated.as_str()
            }
        };

        let hash = match crate::auth::password::hash_password(password) {
            Ok(h) => h,
            Err(e) => {
                tracing::error!(error = %e, "Failed to hash admin password");
                return;
            }
        };

        if let Err(e) = admin_account::seed(&self.pool, &self.config.admin_username, &hash).await {
            tracing::error!(error = %e, "Failed to seed admin account");
        }
    }

    /// 广播同步消息
    ///
    /// 向所有连接的客户端广播资源变更通知。
    /// 版本号由 ResourceVersions 自动递增管理。
    ///
    /// # 参数
    /// - `resource`: 资源类型 (如 "employee", "leave", "notification")
    /// - `action`: 变更类型 ("created", "updated", "deleted")
    /// - `id`: 资源 ID
    /// - `data`: 资源数据 (deleted 时为 None)
    pub async fn broadcast_sync<T: serde::Serialize>(
        &self,
        resource: &str,
        action: &str,
        id: &str,
        data: Option<&T>,
    ) {
        let version = self.resource_versions.increment(resource);
        let payload = SyncPayload {
            resource: resource.to_string(),
            version,
            action: action.to_string(),
            id: id.to_string(),
            data: data.and_then(|d| serde_json::to_value(d).ok()),
        };
        self.message_bus.publish(BusMessage::sync(&payload));
    }

    /// 同步状态快照 (客户端重连时校验)
    pub fn sync_status(&self) -> SyncStatus {
        SyncStatus {
            epoch: self.epoch.clone(),
            versions: self.resource_versions.snapshot(),
        }
    }
}
