//! 消息总线
//!
//! 进程内广播总线：仓库写入后发布同步信号，实时视图（值班面板、
//! 待审批角标）订阅刷新。这是存储层对外的变更订阅原语。

mod bus;

pub use bus::MessageBus;
pub use shared::message::{BusMessage, EventType, NotificationPayload, SyncPayload};
