use std::collections::HashMap;

use mongodb::bson::doc;
use mongodb::Database;
use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::biz_const::{RECENT_WINDOW_SECS, RESERVED_FIELD_KEY};
use crate::biz_service::application_type_service::ApplicationTypeService;
use crate::biz_service::kafka_service::KafkaService;
use crate::biz_service::mail_service::MailService;
use crate::entitys::application_entity::{Application, ApplyStatus};
use crate::entitys::application_type_entity::ApplicationType;
use crate::entitys::mail_entity::MailTemplate;
use crate::manager::app_cache::ChangeOp;
use crate::manager::form_schema;
use common::errors::AppError;
use common::repository_util::{BaseRepository, OrderType, Repository};
use common::util::common_utils::build_id;
use common::util::date_util::now;

/// 申请统计
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyStats {
    pub total: u64,
    pub pending: u64,
    pub under_review: u64,
    pub approved: u64,
    pub rejected: u64,
    /// 通过率：approved / (approved + rejected)，取整百分比
    pub approval_rate: u32,
    /// 近 7 天提交数（查询时刻计算，不缓存）
    pub recent: u64,
}

/// 通过率取整百分比；无已审记录时为 0
pub fn approval_rate(approved: u64, rejected: u64) -> u32 {
    let reviewed = approved + rejected;
    if reviewed == 0 {
        return 0;
    }
    ((approved as f64 / reviewed as f64) * 100.0).round() as u32
}

/// 组装新申请记录；保留身份字段由提交人 handle 填充
pub fn build_application(
    ty: &ApplicationType,
    mut form_data: HashMap<String, Value>,
    submitter_id: &str,
    submitter_handle: &str,
    discord_handle: Option<String>,
    time: i64,
) -> Application {
    form_data.insert(RESERVED_FIELD_KEY.to_string(), Value::String(submitter_handle.to_string()));
    Application {
        id: build_id(),
        user_id: submitter_id.to_string(),
        type_id: ty.id.clone(),
        status: ApplyStatus::Pending,
        form_data,
        discord_handle,
        notes: None,
        required_permissions: ty.required_permissions.clone(),
        closed: false,
        create_time: time,
        update_time: time,
        reviewed_at: None,
        reviewed_by: None,
        closed_at: None,
        closed_by: None,
    }
}

/// 校验并执行状态迁移；reviewed_at/reviewed_by 必须同时落定
pub fn apply_transition(
    mut app: Application,
    next: ApplyStatus,
    notes: Option<String>,
    reviewer_id: &str,
    time: i64,
) -> Result<Application, AppError> {
    if reviewer_id.trim().is_empty() {
        return Err(AppError::Unauthorized("reviewer is required".to_string()));
    }
    if !app.status.can_transition_to(next) {
        return Err(AppError::Validation(format!("status {} cannot transition to {}", app.status, next)));
    }
    app.status = next;
    app.notes = notes;
    app.reviewed_by = Some(reviewer_id.to_string());
    app.reviewed_at = Some(time);
    app.update_time = time;
    Ok(app)
}

/// 关闭是独立于状态的软隐藏；重复关闭为幂等
pub fn apply_close(mut app: Application, closer_id: &str, time: i64) -> Application {
    if app.closed {
        return app;
    }
    app.closed = true;
    app.closed_at = Some(time);
    app.closed_by = Some(closer_id.to_string());
    app.update_time = time;
    app
}

pub fn apply_reopen(mut app: Application, time: i64) -> Application {
    app.closed = false;
    app.closed_at = None;
    app.closed_by = None;
    app.update_time = time;
    app
}

#[derive(Debug)]
pub struct ApplicationService {
    pub dao: BaseRepository<Application>,
}

impl ApplicationService {
    pub fn new(db: Database) -> Self {
        let collection = db.collection("application");
        Self { dao: BaseRepository::new(db, collection.clone()) }
    }

    pub fn init(db: Database) {
        let instance = Self::new(db);
        INSTANCE.set(Arc::new(instance)).expect("INSTANCE already initialized");
    }

    /// 获取单例
    pub fn get() -> Arc<Self> {
        INSTANCE.get().expect("INSTANCE is not initialized").clone()
    }

    /// 提交申请：类型必须存在且启用，表单通过校验后以 pending 落库
    pub async fn submit(
        &self,
        type_id: &str,
        form_data: HashMap<String, Value>,
        submitter_id: &str,
        submitter_handle: &str,
        discord_handle: Option<String>,
    ) -> Result<Application, AppError> {
        if submitter_id.trim().is_empty() {
            return Err(AppError::Unauthenticated);
        }
        let ty = ApplicationTypeService::get().dao.find_by_id(type_id).await?.ok_or(AppError::NotFound)?;
        if !ty.enable {
            return Err(AppError::Inactive);
        }
        let errors = form_schema::validate(&ty.form_fields, &form_data);
        if !errors.is_empty() {
            return Err(AppError::FormInvalid(errors));
        }
        let app = build_application(&ty, form_data, submitter_id, submitter_handle, discord_handle, now());
        self.dao.insert(&app).await?;
        spawn_submit_effects(app.clone());
        Ok(app)
    }

    /// 审核迁移：落库成功后派发通知；并发迁移按最后写入为准
    pub async fn transition(
        &self,
        id: &str,
        next: ApplyStatus,
        notes: Option<String>,
        reviewer_id: &str,
    ) -> Result<Application, AppError> {
        let app = self.dao.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        let updated = apply_transition(app, next, notes, reviewer_id, now())?;
        let update = doc! {"$set": {
            "status": updated.status.to_string(),
            "notes": updated.notes.clone(),
            "reviewed_by": updated.reviewed_by.clone(),
            "reviewed_at": updated.reviewed_at,
            "update_time": updated.update_time,
        }};
        self.dao.update_by_id(id, update).await?;
        spawn_review_effects(updated.clone());
        Ok(updated)
    }

    /// 关闭（软隐藏）：不改状态；重复关闭为无操作成功
    pub async fn close(&self, id: &str, closer_id: &str) -> Result<Application, AppError> {
        if closer_id.trim().is_empty() {
            return Err(AppError::Unauthorized("closer is required".to_string()));
        }
        let app = self.dao.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        if app.closed {
            return Ok(app);
        }
        let updated = apply_close(app, closer_id, now());
        let update = doc! {"$set": {
            "closed": true,
            "closed_at": updated.closed_at,
            "closed_by": updated.closed_by.clone(),
            "update_time": updated.update_time,
        }};
        self.dao.update_by_id(id, update).await?;
        spawn_change_event(updated.clone());
        Ok(updated)
    }

    pub async fn reopen(&self, id: &str) -> Result<Application, AppError> {
        let app = self.dao.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        if !app.closed {
            return Ok(app);
        }
        let updated = apply_reopen(app, now());
        let update = doc! {"$set": {
            "closed": false,
            "closed_at": mongodb::bson::Bson::Null,
            "closed_by": mongodb::bson::Bson::Null,
            "update_time": updated.update_time,
        }};
        self.dao.update_by_id(id, update).await?;
        spawn_change_event(updated.clone());
        Ok(updated)
    }

    /// 硬删除，不可恢复
    pub async fn remove(&self, id: &str) -> Result<(), AppError> {
        let deleted = self.dao.delete_by_id(id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// 未关闭申请，创建时间倒序
    pub async fn list_active(&self) -> Result<Vec<Application>, AppError> {
        let list = self.dao.query_sorted(doc! {"closed": false}, "create_time", OrderType::Desc).await?;
        Ok(list)
    }

    /// 已关闭申请，关闭时间倒序；与 list_active 互不相交
    pub async fn list_closed(&self) -> Result<Vec<Application>, AppError> {
        let list = self.dao.query_sorted(doc! {"closed": true}, "closed_at", OrderType::Desc).await?;
        Ok(list)
    }

    pub async fn stats(&self) -> Result<ApplyStats, AppError> {
        let total = self.dao.count(doc! {}).await?;
        let pending = self.dao.count(doc! {"status": ApplyStatus::Pending.to_string()}).await?;
        let under_review = self.dao.count(doc! {"status": ApplyStatus::UnderReview.to_string()}).await?;
        let approved = self.dao.count(doc! {"status": ApplyStatus::Approved.to_string()}).await?;
        let rejected = self.dao.count(doc! {"status": ApplyStatus::Rejected.to_string()}).await?;
        let recent = self.dao.count(doc! {"create_time": {"$gte": now() - RECENT_WINDOW_SECS}}).await?;
        Ok(ApplyStats {
            total,
            pending,
            under_review,
            approved,
            rejected,
            approval_rate: approval_rate(approved, rejected),
            recent,
        })
    }
}

static INSTANCE: OnceCell<Arc<ApplicationService>> = OnceCell::new();

/// 提交成功后的尽力通知；结果只记日志，不影响主流程
fn spawn_submit_effects(app: Application) {
    tokio::spawn(async move {
        if let Err(e) = MailService::get().send_application_mail(MailTemplate::ApplicationReceived, &app.user_id, &app).await {
            log::warn!("⚠️ 受理邮件写入失败: {:?}", e);
        }
        let kafka = KafkaService::get();
        let payload = serde_json::json!({"id": app.id, "type_id": app.type_id, "user_id": app.user_id});
        if let Err(e) = kafka.send_notification("application_submitted", payload).await {
            log::warn!("⚠️ 提交通知发送失败: {:?}", e);
        }
        if let Err(e) = kafka.send_application_event(ChangeOp::Insert, &app).await {
            log::warn!("⚠️ 申请变更事件发送失败: {:?}", e);
        }
    });
}

/// 审核后的尽力通知：approved/rejected 发邮件+外部通知，under_review 只发外部通知
fn spawn_review_effects(app: Application) {
    tokio::spawn(async move {
        let mail_template = match app.status {
            ApplyStatus::Approved => Some(MailTemplate::ApplicationApproved),
            ApplyStatus::Rejected => Some(MailTemplate::ApplicationRejected),
            _ => None,
        };
        if let Some(template) = mail_template {
            if let Err(e) = MailService::get().send_application_mail(template, &app.user_id, &app).await {
                log::warn!("⚠️ 审核邮件写入失败: {:?}", e);
            }
        }
        let kafka = KafkaService::get();
        let payload = serde_json::json!({
            "id": app.id,
            "status": app.status.to_string(),
            "reviewed_by": app.reviewed_by,
        });
        if let Err(e) = kafka.send_notification("application_reviewed", payload).await {
            log::warn!("⚠️ 审核通知发送失败: {:?}", e);
        }
        if let Err(e) = kafka.send_application_event(ChangeOp::Update, &app).await {
            log::warn!("⚠️ 申请变更事件发送失败: {:?}", e);
        }
    });
}

/// 关闭/重开只同步变更事件
fn spawn_change_event(app: Application) {
    tokio::spawn(async move {
        if let Err(e) = KafkaService::get().send_application_event(ChangeOp::Update, &app).await {
            log::warn!("⚠️ 申请变更事件发送失败: {:?}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entitys::application_type_entity::{FieldKind, FormField};
    use crate::manager::form_schema::ensure_reserved_field;
    use serde_json::json;

    fn sample_type() -> ApplicationType {
        let fields = vec![
            FormField { key: "name".into(), label: "name".into(), kind: FieldKind::Text, required: true, ..Default::default() },
            FormField { key: "email".into(), label: "email".into(), kind: FieldKind::Email, required: true, ..Default::default() },
        ];
        ApplicationType {
            id: "t1".into(),
            name: "白名单申请".into(),
            form_fields: ensure_reserved_field(fields),
            required_permissions: vec!["moderator".into()],
            enable: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_approval_rate() {
        assert_eq!(approval_rate(3, 1), 75);
        assert_eq!(approval_rate(0, 0), 0);
        assert_eq!(approval_rate(1, 2), 33);
        assert_eq!(approval_rate(2, 0), 100);
    }

    #[test]
    fn test_build_application_fills_reserved_field() {
        let ty = sample_type();
        let data = HashMap::from([("name".to_string(), json!("Alex"))]);
        let app = build_application(&ty, data, "u1", "alex#42", None, 100);
        assert_eq!(app.status, ApplyStatus::Pending);
        assert!(!app.closed);
        assert_eq!(app.form_data.get(RESERVED_FIELD_KEY), Some(&json!("alex#42")));
        assert_eq!(app.required_permissions, vec!["moderator".to_string()]);
        assert!(app.reviewed_at.is_none() && app.reviewed_by.is_none());
    }

    #[test]
    fn test_transition_sets_review_pair_together() {
        let ty = sample_type();
        let app = build_application(&ty, HashMap::new(), "u1", "alex#42", None, 100);
        let reviewed = apply_transition(app, ApplyStatus::Approved, Some("ok".into()), "r1", 200).unwrap();
        assert_eq!(reviewed.status, ApplyStatus::Approved);
        assert_eq!(reviewed.reviewed_by.as_deref(), Some("r1"));
        assert_eq!(reviewed.reviewed_at, Some(200));
        assert_eq!(reviewed.notes.as_deref(), Some("ok"));
    }

    #[test]
    fn test_transition_requires_reviewer() {
        let ty = sample_type();
        let app = build_application(&ty, HashMap::new(), "u1", "alex#42", None, 100);
        let result = apply_transition(app, ApplyStatus::Approved, None, "  ", 200);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_close_is_idempotent_and_keeps_status() {
        let ty = sample_type();
        let app = build_application(&ty, HashMap::new(), "u1", "alex#42", None, 100);
        let closed = apply_close(app, "c1", 200);
        assert!(closed.closed);
        assert_eq!(closed.closed_at, Some(200));
        assert_eq!(closed.closed_by.as_deref(), Some("c1"));
        assert_eq!(closed.status, ApplyStatus::Pending);

        // 重复关闭不改变首次关闭信息
        let closed_again = apply_close(closed.clone(), "c2", 300);
        assert_eq!(closed_again.closed_at, Some(200));
        assert_eq!(closed_again.closed_by.as_deref(), Some("c1"));

        let reopened = apply_reopen(closed_again, 400);
        assert!(!reopened.closed);
        assert!(reopened.closed_at.is_none() && reopened.closed_by.is_none());
        assert_eq!(reopened.status, ApplyStatus::Pending);
    }

    #[test]
    fn test_submit_review_flow() {
        let ty = sample_type();

        // 首次提交：两个字段都不合法
        let bad = HashMap::from([("name".to_string(), json!("")), ("email".to_string(), json!("bad"))]);
        let errors = form_schema::validate(&ty.form_fields, &bad);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("email"));

        // 修正后通过校验并进入 pending
        let good = HashMap::from([("name".to_string(), json!("Alex")), ("email".to_string(), json!("a@b.co"))]);
        assert!(form_schema::validate(&ty.form_fields, &good).is_empty());
        let app = build_application(&ty, good, "u1", "alex#42", None, 100);
        assert_eq!(app.status, ApplyStatus::Pending);

        // 审核通过
        let approved = apply_transition(app, ApplyStatus::Approved, Some("ok".into()), "r1", 200).unwrap();
        assert_eq!(approved.status, ApplyStatus::Approved);
        assert_eq!(approved.reviewed_by.as_deref(), Some("r1"));

        // 终态之后任何迁移（包括回 pending）都被拒绝
        let result = apply_transition(approved, ApplyStatus::Pending, None, "r1", 300);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
