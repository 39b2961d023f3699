//! In-process broadcast bus

use tokio::sync::broadcast;

use shared::message::BusMessage;

/// 消息总线
///
/// tokio broadcast 信道的薄封装。订阅者各自持有接收端；慢消费者
/// 丢失的是最旧的消息 (lagged)，随后通过全量刷新追平 —— 同步信号
/// 本身是最终一致的快照提示，不是事实源。
#[derive(Debug)]
pub struct MessageBus {
    tx: broadcast::Sender<BusMessage>,
}

impl MessageBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// 发布消息；返回当前接收者数量 (无订阅者时为 0，不视为错误)
    pub fn publish(&self, message: BusMessage) -> usize {
        match self.tx.send(message) {
            Ok(receivers) => receivers,
            Err(_) => 0,
        }
    }

    /// 订阅总线
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.tx.subscribe()
    }

    /// 当前订阅者数量
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::message::{EventType, SyncPayload};

    #[tokio::test]
    async fn subscribers_receive_published_sync() {
        let bus = MessageBus::new(8);
        let mut rx = bus.subscribe();

        let payload = SyncPayload {
            resource: "leave".into(),
            version: 1,
            action: "created".into(),
            id: "99".into(),
            data: None,
        };
        let delivered = bus.publish(BusMessage::sync(&payload));
        assert_eq!(delivered, 1);

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.event_type, EventType::Sync);
        let parsed: SyncPayload = msg.parse_payload().unwrap();
        assert_eq!(parsed.resource, "leave");
    }

    #[test]
    fn publish_without_subscribers_is_not_an_error() {
        let bus = MessageBus::new(8);
        let payload = SyncPayload {
            resource: "employee".into(),
            version: 1,
            action: "updated".into(),
            id: "1".into(),
            data: None,
        };
        assert_eq!(bus.publish(BusMessage::sync(&payload)), 0);
    }
}
