use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use rdkafka::ClientConfig;
use serde_json::Value;

use crate::entitys::application_entity::Application;
use crate::manager::app_cache::{AppChangeEvent, ChangeOp};
use common::config::KafkaConfig;
use common::util::date_util::now;

/// Kafka 生产端：外部通知与申请变更事件都从这里发出
#[derive(Clone)]
pub struct KafkaService {
    pub producer: Arc<FutureProducer>,
    cfg: KafkaConfig,
}

impl fmt::Debug for KafkaService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KafkaService").field("producer", &"FutureProducer(...)").finish()
    }
}

static INSTANCE: OnceCell<Arc<KafkaService>> = OnceCell::new();

impl KafkaService {
    pub fn new(cfg: &KafkaConfig) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &cfg.brokers)
            .set("acks", "all")
            .set("queue.buffering.max.ms", "5") // 延迟聚合
            .set("compression.type", "lz4") // 压缩提升吞吐
            .set("message.timeout.ms", "30000")
            .create()
            .map_err(|e| anyhow!("Kafka producer create failed for {}: {e}", cfg.brokers))?;
        Ok(Self { producer: Arc::new(producer), cfg: cfg.clone() })
    }

    pub fn init(cfg: &KafkaConfig) {
        let instance = Self::new(cfg).expect("Failed to create Kafka producer");
        INSTANCE.set(Arc::new(instance)).expect("INSTANCE already initialized");
    }

    /// 获取单例
    pub fn get() -> Arc<Self> {
        INSTANCE.get().expect("INSTANCE is not initialized").clone()
    }

    async fn send_json(&self, topic: &str, key: &str, body: &Value) -> Result<()> {
        let payload = serde_json::to_vec(body)?;
        let record = FutureRecord::to(topic).key(key).payload(&payload);
        self.producer
            .send(record, Timeout::After(Duration::from_secs(5)))
            .await
            .map_err(|(e, _)| anyhow!("Kafka send to {topic} failed: {e}"))?;
        Ok(())
    }

    /// 外部通知（Discord 网桥等下游消费），尽力投递
    pub async fn send_notification(&self, event_type: &str, payload: Value) -> Result<()> {
        let body = serde_json::json!({
            "event_type": event_type,
            "payload": payload,
            "create_time": now(),
        });
        self.send_json(&self.cfg.topic_notify, event_type, &body).await
    }

    /// 申请记录变更事件，供实时缓存归并
    pub async fn send_application_event(&self, op: ChangeOp, row: &Application) -> Result<()> {
        let event = AppChangeEvent { op, row: row.clone() };
        let body = serde_json::to_value(&event)?;
        self.send_json(&self.cfg.topic_application, &row.id, &body).await
    }
}
