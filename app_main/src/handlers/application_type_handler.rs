use actix_web::{get, post, web, Responder};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::result::{result, result_data, result_list};
use biz_service::biz_service::application_type_service::ApplicationTypeService;
use biz_service::entitys::application_type_entity::{ApplicationType, FormField};
use common::errors::AppError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(application_type_add);
    cfg.service(application_type_update);
    cfg.service(application_type_delete);
    cfg.service(application_type_list);
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationTypeAddDto {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// 保存时会自动补齐保留身份字段
    #[serde(default)]
    pub form_fields: Vec<FormField>,
    #[serde(default)]
    pub required_permissions: Vec<String>,
    pub enable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationTypeIdDto {
    pub id: String,
}

#[utoipa::path(
    post,
    path = "/application-type/add",
    request_body = ApplicationTypeAddDto,
    responses((status = 200, description = "申请类型创建成功"))
)]
#[post("/application-type/add")]
pub async fn application_type_add(req: web::Json<ApplicationTypeAddDto>) -> Result<impl Responder, AppError> {
    let dto = req.into_inner();
    let ty = ApplicationType {
        name: dto.name,
        description: dto.description,
        form_fields: dto.form_fields,
        required_permissions: dto.required_permissions,
        enable: dto.enable,
        ..Default::default()
    };
    let created = ApplicationTypeService::get().create(ty).await?;
    Ok(web::Json(result_data(created)))
}

#[utoipa::path(
    post,
    path = "/application-type/update",
    request_body = ApplicationType,
    responses((status = 200, description = "申请类型更新成功"))
)]
#[post("/application-type/update")]
pub async fn application_type_update(req: web::Json<ApplicationType>) -> Result<impl Responder, AppError> {
    let updated = ApplicationTypeService::get().update_type(req.into_inner()).await?;
    Ok(web::Json(result_data(updated)))
}

#[utoipa::path(
    post,
    path = "/application-type/delete",
    request_body = ApplicationTypeIdDto,
    responses((status = 200, description = "申请类型已删除"))
)]
#[post("/application-type/delete")]
pub async fn application_type_delete(req: web::Json<ApplicationTypeIdDto>) -> Result<impl Responder, AppError> {
    ApplicationTypeService::get().remove(&req.id).await?;
    Ok(web::Json(result()))
}

#[utoipa::path(
    get,
    path = "/application-type/list",
    responses((status = 200, description = "申请类型列表"))
)]
#[get("/application-type/list")]
pub async fn application_type_list() -> Result<impl Responder, AppError> {
    let list = ApplicationTypeService::get().list().await?;
    Ok(web::Json(result_list(list)))
}
