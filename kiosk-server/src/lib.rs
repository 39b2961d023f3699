//! Shiftline Kiosk Server - 单站点考勤与休假管理终端服务
//!
//! # 架构概述
//!
//! 本模块是终端服务器的主入口，提供以下核心功能：
//!
//! - **身份验证** (`verify`): 人脸描述子 / 平台凭证 / PIN 三路验证
//! - **考勤状态机** (`attendance`): 打卡切换、班次与加班计算、配对
//! - **休假生命周期** (`leave`): 申请审批、延期、回收站、年度额度
//! - **每日对账** (`reconcile`): 漏打卡补登与幂等守卫
//! - **数据库** (`db`): 嵌入式 SQLite 存储
//! - **消息总线** (`message`): 进程内变更订阅
//! - **HTTP API** (`api`): 终端与管理端接口
//!
//! # 模块结构
//!
//! ```text
//! kiosk-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── auth/          # 管理端 JWT 认证
//! ├── verify/        # 凭证验证与身份解析
//! ├── attendance/    # 考勤状态机
//! ├── leave/         # 休假生命周期
//! ├── reconcile/     # 每日对账任务
//! ├── api/           # HTTP 路由和处理器
//! ├── message/       # 消息总线
//! ├── db/            # 数据库层
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod attendance;
pub mod auth;
pub mod core;
pub mod db;
pub mod leave;
pub mod message;
pub mod reconcile;
pub mod utils;
pub mod verify;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use message::{BusMessage, EventType};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let json_format = std::env::var("ENVIRONMENT")
        .map(|e| e == "production")
        .unwrap_or(false);
    let log_dir = std::env::var("WORK_DIR")
        .map(|dir| format!("{dir}/logs"))
        .ok();

    init_logger_with_file(&level, json_format, log_dir.as_deref())
}

pub fn print_banner() {
    println!(
        r#"
   _____ __    _ ______  __  __ _
  / ___// /_  (_) __/ /_/ / /_/ (_)___  ___
  \__ \/ __ \/ / /_/ __/ / / / / / __ \/ _ \
 ___/ / / / / / __/ /_/ / / / / / / / /  __/
/____/_/ /_/_/_/  \__/_/_/_/_/_/_/ /_/\___/
    "#
    );
}
