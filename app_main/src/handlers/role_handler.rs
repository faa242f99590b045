use actix_web::{get, post, web, Responder};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::result::{result, result_data, result_list};
use biz_service::biz_service::role_service::RoleService;
use biz_service::biz_service::user_role_service::UserRoleService;
use biz_service::entitys::role_entity::RoleEntity;
use common::errors::AppError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(role_add);
    cfg.service(role_update);
    cfg.service(role_delete);
    cfg.service(role_list);
    cfg.service(user_role_assign);
    cfg.service(user_role_revoke);
    cfg.service(user_role_list);
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleAddDto {
    #[validate(length(min = 2, message = "role.name.too.short"))]
    pub name: String,
    pub show_name: String,
    #[serde(default)]
    pub color: String,
    pub level: i32,
    pub enable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleIdDto {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRoleDto {
    pub user_id: String,
    pub role_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserIdDto {
    pub user_id: String,
}

#[utoipa::path(
    post,
    path = "/role/add",
    request_body = RoleAddDto,
    responses((status = 200, description = "角色创建成功"))
)]
#[post("/role/add")]
pub async fn role_add(req: web::Json<RoleAddDto>) -> Result<impl Responder, AppError> {
    req.validate().map_err(|e| AppError::Validation(format!("参数验证失败: {}", e)))?;
    let dto = req.into_inner();
    let role = RoleEntity {
        name: dto.name,
        show_name: dto.show_name,
        color: dto.color,
        level: dto.level,
        enable: dto.enable,
        ..Default::default()
    };
    let created = RoleService::get().create(role).await?;
    Ok(web::Json(result_data(created)))
}

#[utoipa::path(
    post,
    path = "/role/update",
    request_body = RoleEntity,
    responses((status = 200, description = "角色更新成功"))
)]
#[post("/role/update")]
pub async fn role_update(req: web::Json<RoleEntity>) -> Result<impl Responder, AppError> {
    RoleService::get().update_role(&req).await?;
    Ok(web::Json(result()))
}

#[utoipa::path(
    post,
    path = "/role/delete",
    request_body = RoleIdDto,
    responses((status = 200, description = "角色已删除，关联指派一并清理"))
)]
#[post("/role/delete")]
pub async fn role_delete(req: web::Json<RoleIdDto>) -> Result<impl Responder, AppError> {
    RoleService::get().remove(&req.id).await?;
    UserRoleService::get().remove_by_role(&req.id).await?;
    Ok(web::Json(result()))
}

#[utoipa::path(
    get,
    path = "/role/list",
    responses((status = 200, description = "角色列表，层级升序"))
)]
#[get("/role/list")]
pub async fn role_list() -> Result<impl Responder, AppError> {
    let list = RoleService::get().list().await?;
    Ok(web::Json(result_list(list)))
}

#[utoipa::path(
    post,
    path = "/user-role/assign",
    request_body = UserRoleDto,
    responses((status = 200, description = "角色指派成功"))
)]
#[post("/user-role/assign")]
pub async fn user_role_assign(req: web::Json<UserRoleDto>) -> Result<impl Responder, AppError> {
    let assignment = UserRoleService::get().assign(&req.user_id, &req.role_id).await?;
    Ok(web::Json(result_data(assignment)))
}

#[utoipa::path(
    post,
    path = "/user-role/revoke",
    request_body = UserRoleDto,
    responses((status = 200, description = "角色指派已停用"))
)]
#[post("/user-role/revoke")]
pub async fn user_role_revoke(req: web::Json<UserRoleDto>) -> Result<impl Responder, AppError> {
    UserRoleService::get().revoke(&req.user_id, &req.role_id).await?;
    Ok(web::Json(result()))
}

#[utoipa::path(
    post,
    path = "/user-role/list",
    request_body = UserIdDto,
    responses((status = 200, description = "用户的全部角色指派"))
)]
#[post("/user-role/list")]
pub async fn user_role_list(req: web::Json<UserIdDto>) -> Result<impl Responder, AppError> {
    let list = UserRoleService::get().list_by_user(&req.user_id).await?;
    Ok(web::Json(result_list(list)))
}
