// src/entitys/mail_entity.rs
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// 邮件模板类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MailTemplate {
    ApplicationReceived,
    ApplicationApproved,
    ApplicationRejected,
}

/// 邮件发件箱记录；投递由独立的邮件 worker 消费
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct MailEntity {
    #[serde(rename = "_id")]
    pub id: String,
    pub template: MailTemplate,
    pub sender: String,
    pub receiver: String,
    pub subject: String,
    pub content: String,
    /// 投递状态：0 待发送 / 1 已发送
    pub status: i32,
    pub send_count: i32,
    pub create_time: i64,
    pub update_time: i64,
}
