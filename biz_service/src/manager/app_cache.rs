use std::sync::Arc;

use anyhow::{anyhow, Result};
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::{Message, OwnedMessage};
use serde::{Deserialize, Serialize};

use crate::entitys::application_entity::Application;
use common::config::KafkaConfig;

/// 变更事件操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOp {
    Insert,
    Update,
}

/// 申请记录变更事件：携带整行数据，按 id 归并
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppChangeEvent {
    pub op: ChangeOp,
    pub row: Application,
}

/// 纯归并函数：按记录 id upsert；同一行重复投递不改变结果
pub fn apply(state: &DashMap<String, Application>, event: AppChangeEvent) {
    state.insert(event.row.id.clone(), event.row);
}

/// 本地申请缓存：消费变更 topic，经 apply 归并，供实时列表读取
#[derive(Debug, Default)]
pub struct AppCacheManager {
    apps: DashMap<String, Application>,
}

static INSTANCE: OnceCell<Arc<AppCacheManager>> = OnceCell::new();

impl AppCacheManager {
    pub fn get() -> Arc<AppCacheManager> {
        INSTANCE.get_or_init(|| Arc::new(AppCacheManager::default())).clone()
    }

    pub fn merge(&self, event: AppChangeEvent) {
        apply(&self.apps, event);
    }

    /// 当前未关闭申请快照，创建时间倒序
    pub fn active_snapshot(&self) -> Vec<Application> {
        let mut list: Vec<Application> = self.apps.iter().filter(|e| !e.value().closed).map(|e| e.value().clone()).collect();
        list.sort_by(|a, b| b.create_time.cmp(&a.create_time));
        list
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

/// 启动变更事件消费循环
pub async fn start_consumer(kafka_cfg: KafkaConfig) -> Result<()> {
    let consumer: StreamConsumer = ClientConfig::new()
        .set("group.id", "portal-app-cache-group")
        .set("bootstrap.servers", &kafka_cfg.brokers)
        .set("enable.auto.commit", "true")
        .create()?;

    consumer.subscribe(&[&kafka_cfg.topic_application])?;
    log::info!("✅ Kafka 消费者已启动，订阅主题：{}", kafka_cfg.topic_application);

    let manager = AppCacheManager::get();
    loop {
        match consumer.recv().await {
            Ok(msg) => {
                let owned = msg.detach();
                if let Err(e) = handle_change_message(owned, &manager) {
                    log::error!("❌ 申请变更消息处理失败: {:?}", e);
                }
            }
            Err(e) => {
                log::error!("❌ Kafka 消费错误: {:?}", e);
            }
        }
    }
}

/// 处理单条变更消息
fn handle_change_message(msg: OwnedMessage, manager: &Arc<AppCacheManager>) -> Result<()> {
    let payload = msg
        .payload_view::<str>()
        .ok_or_else(|| anyhow!("Kafka 消息为空"))?
        .map_err(|e| anyhow!("Kafka 消息解码失败: {:?}", e))?;
    let event: AppChangeEvent = serde_json::from_str(payload)?;
    manager.merge(event);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entitys::application_entity::ApplyStatus;

    fn row(id: &str, status: ApplyStatus) -> Application {
        Application { id: id.to_string(), status, ..Default::default() }
    }

    #[test]
    fn test_apply_upserts_by_id() {
        let state = DashMap::new();
        apply(&state, AppChangeEvent { op: ChangeOp::Insert, row: row("a1", ApplyStatus::Pending) });
        apply(&state, AppChangeEvent { op: ChangeOp::Insert, row: row("a2", ApplyStatus::Pending) });
        assert_eq!(state.len(), 2);

        // update 覆盖同 id 记录
        apply(&state, AppChangeEvent { op: ChangeOp::Update, row: row("a1", ApplyStatus::Approved) });
        assert_eq!(state.len(), 2);
        assert_eq!(state.get("a1").unwrap().status, ApplyStatus::Approved);
    }

    #[test]
    fn test_apply_duplicate_delivery_is_noop() {
        let state = DashMap::new();
        let event = AppChangeEvent { op: ChangeOp::Insert, row: row("a1", ApplyStatus::Pending) };
        apply(&state, event.clone());
        apply(&state, event);
        assert_eq!(state.len(), 1);
        assert_eq!(state.get("a1").unwrap().status, ApplyStatus::Pending);
    }

    #[test]
    fn test_active_snapshot_excludes_closed() {
        let manager = AppCacheManager::default();
        let mut closed = row("a1", ApplyStatus::Approved);
        closed.closed = true;
        manager.merge(AppChangeEvent { op: ChangeOp::Insert, row: closed });
        let mut open = row("a2", ApplyStatus::Pending);
        open.create_time = 10;
        manager.merge(AppChangeEvent { op: ChangeOp::Insert, row: open });

        let snapshot = manager.active_snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, "a2");
    }
}
