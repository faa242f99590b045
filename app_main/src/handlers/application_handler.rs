use std::collections::HashMap;

use actix_web::{get, post, web, Responder};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::result::{result, result_data, result_list};
use biz_service::biz_service::application_service::ApplicationService;
use biz_service::biz_service::user_role_service::UserRoleService;
use biz_service::entitys::application_entity::ApplyStatus;
use biz_service::manager::visibility::visible_applications;
use common::errors::AppError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(application_submit);
    cfg.service(application_list);
    cfg.service(application_closed_list);
    cfg.service(application_transition);
    cfg.service(application_close);
    cfg.service(application_reopen);
    cfg.service(application_delete);
    cfg.service(application_stats);
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationDto {
    pub type_id: String,
    /// 字段 key -> 提交值
    #[schema(value_type = Object)]
    pub form_data: HashMap<String, serde_json::Value>,
    pub submitter_id: String,
    /// 提交人游戏 handle，填充保留身份字段
    pub submitter_handle: String,
    pub discord_handle: Option<String>,
}

/// 访问者身份由调用方显式携带，核心逻辑不读会话态
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewerDto {
    pub user_id: String,
    pub role_name: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionDto {
    pub id: String,
    pub status: ApplyStatus,
    pub notes: Option<String>,
    pub reviewer_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloseApplicationDto {
    pub id: String,
    pub closer_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationIdDto {
    pub id: String,
}

#[utoipa::path(
    post,
    path = "/application/submit",
    request_body = SubmitApplicationDto,
    responses((status = 200, description = "申请提交成功"))
)]
#[post("/application/submit")]
pub async fn application_submit(req: web::Json<SubmitApplicationDto>) -> Result<impl Responder, AppError> {
    let service = ApplicationService::get();
    let app = service
        .submit(&req.type_id, req.form_data.clone(), &req.submitter_id, &req.submitter_handle, req.discord_handle.clone())
        .await?;
    Ok(web::Json(result_data(app)))
}

#[utoipa::path(
    post,
    path = "/application/list",
    request_body = ViewerDto,
    responses((status = 200, description = "按访问者可见性过滤后的未关闭申请"))
)]
#[post("/application/list")]
pub async fn application_list(req: web::Json<ViewerDto>) -> Result<impl Responder, AppError> {
    let viewer = UserRoleService::get()
        .build_viewer(&req.user_id, req.role_name.clone(), req.permissions.clone())
        .await?;
    let list = ApplicationService::get().list_active().await?;
    Ok(web::Json(result_list(visible_applications(list, &viewer))))
}

#[utoipa::path(
    post,
    path = "/application/closed/list",
    request_body = ViewerDto,
    responses((status = 200, description = "按访问者可见性过滤后的已关闭申请"))
)]
#[post("/application/closed/list")]
pub async fn application_closed_list(req: web::Json<ViewerDto>) -> Result<impl Responder, AppError> {
    let viewer = UserRoleService::get()
        .build_viewer(&req.user_id, req.role_name.clone(), req.permissions.clone())
        .await?;
    let list = ApplicationService::get().list_closed().await?;
    Ok(web::Json(result_list(visible_applications(list, &viewer))))
}

#[utoipa::path(
    post,
    path = "/application/transition",
    request_body = TransitionDto,
    responses((status = 200, description = "审核状态迁移成功"))
)]
#[post("/application/transition")]
pub async fn application_transition(req: web::Json<TransitionDto>) -> Result<impl Responder, AppError> {
    let service = ApplicationService::get();
    let app = service.transition(&req.id, req.status, req.notes.clone(), &req.reviewer_id).await?;
    Ok(web::Json(result_data(app)))
}

#[utoipa::path(
    post,
    path = "/application/close",
    request_body = CloseApplicationDto,
    responses((status = 200, description = "申请已关闭"))
)]
#[post("/application/close")]
pub async fn application_close(req: web::Json<CloseApplicationDto>) -> Result<impl Responder, AppError> {
    let app = ApplicationService::get().close(&req.id, &req.closer_id).await?;
    Ok(web::Json(result_data(app)))
}

#[utoipa::path(
    post,
    path = "/application/reopen",
    request_body = ApplicationIdDto,
    responses((status = 200, description = "申请已重开"))
)]
#[post("/application/reopen")]
pub async fn application_reopen(req: web::Json<ApplicationIdDto>) -> Result<impl Responder, AppError> {
    let app = ApplicationService::get().reopen(&req.id).await?;
    Ok(web::Json(result_data(app)))
}

#[utoipa::path(
    post,
    path = "/application/delete",
    request_body = ApplicationIdDto,
    responses((status = 200, description = "申请已删除（不可恢复）"))
)]
#[post("/application/delete")]
pub async fn application_delete(req: web::Json<ApplicationIdDto>) -> Result<impl Responder, AppError> {
    ApplicationService::get().remove(&req.id).await?;
    Ok(web::Json(result()))
}

#[utoipa::path(
    get,
    path = "/application/stats",
    responses((status = 200, description = "申请统计"))
)]
#[get("/application/stats")]
pub async fn application_stats() -> Result<impl Responder, AppError> {
    let stats = ApplicationService::get().stats().await?;
    Ok(web::Json(result_data(stats)))
}
