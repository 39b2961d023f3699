//! Server Implementation
//!
//! HTTP 服务器启动和后台任务编排

use std::time::Duration;

use crate::api;
use crate::core::{BackgroundTasks, Config, ServerState, TaskKind};
use crate::db::repository::auth_challenge;
use crate::db::repository::employee;
use crate::reconcile;
use crate::security_log;

/// 对账任务重试间隔 — 守卫保证每天至多一次，轮询只是跨午夜触发器
const RECONCILE_TICK: Duration = Duration::from_secs(3600);
/// 挑战清理间隔
const CHALLENGE_PRUNE_TICK: Duration = Duration::from_secs(600);
/// 凭证完整性巡检间隔
const INTEGRITY_SWEEP_TICK: Duration = Duration::from_secs(6 * 3600);

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (tests construct state first)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await,
        };

        // Start background tasks
        let tasks = start_background_tasks(&state);
        tasks.log_summary();

        let app = api::build_app(&state).with_state(state.clone());

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Shiftline kiosk server listening on {}", addr);
        tracing::info!(
            timezone = %self.config.timezone,
            environment = %self.config.environment,
            "Site configuration loaded"
        );

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await?;

        tasks.shutdown().await;
        Ok(())
    }
}

/// 注册后台任务：每日对账、挑战清理、凭证完整性巡检
pub fn start_background_tasks(state: &ServerState) -> BackgroundTasks {
    let mut tasks = BackgroundTasks::new();
    let token = tasks.shutdown_token();

    // 每日对账：启动时立即尝试一次，然后每小时重试 —— 跨午夜的长进程
    // 依赖每日守卫而非调度器保证至多一次
    let reconcile_state = state.clone();
    let reconcile_token = token.clone();
    tasks.spawn("daily_reconciliation", TaskKind::Periodic, async move {
        loop {
            match reconcile::run(&reconcile_state).await {
                Ok(outcome) => tracing::debug!(?outcome, "Reconciliation tick"),
                // 守卫未更新，下一轮重试整个批次
                Err(e) => tracing::error!(error = %e, "Reconciliation failed; will retry"),
            }

            tokio::select! {
                _ = reconcile_token.cancelled() => break,
                _ = tokio::time::sleep(RECONCILE_TICK) => {}
            }
        }
    });

    // 过期挑战清理
    let prune_pool = state.pool.clone();
    let prune_token = token.clone();
    tasks.spawn("challenge_prune", TaskKind::Periodic, async move {
        loop {
            tokio::select! {
                _ = prune_token.cancelled() => break,
                _ = tokio::time::sleep(CHALLENGE_PRUNE_TICK) => {}
            }
            if let Err(e) = auth_challenge::prune_expired(&prune_pool).await {
                tracing::error!(error = %e, "Failed to prune expired challenges");
            }
        }
    });

    // 凭证完整性巡检：唯一索引之外的防线，发现重复立即告警
    let sweep_pool = state.pool.clone();
    let sweep_token = token;
    tasks.spawn("credential_integrity_sweep", TaskKind::Periodic, async move {
        loop {
            match employee::find_duplicate_pins(&sweep_pool).await {
                Ok(dups) if !dups.is_empty() => {
                    security_log!(ERROR, "duplicate_pins", count = dups.len());
                }
                Err(e) => tracing::error!(error = %e, "PIN integrity sweep failed"),
                _ => {}
            }
            match employee::find_duplicate_credentials(&sweep_pool).await {
                Ok(dups) if !dups.is_empty() => {
                    security_log!(ERROR, "duplicate_credentials", count = dups.len());
                }
                Err(e) => tracing::error!(error = %e, "Credential integrity sweep failed"),
                _ => {}
            }

            tokio::select! {
                _ = sweep_token.cancelled() => break,
                _ = tokio::time::sleep(INTEGRITY_SWEEP_TICK) => {}
            }
        }
    });

    tasks
}
