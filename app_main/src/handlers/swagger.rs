use actix_web::{get, web, HttpResponse, Responder};
use utoipa::OpenApi;

use crate::handlers::application_handler::*;
use crate::handlers::application_type_handler::*;
use crate::handlers::common_handler::*;
use crate::handlers::role_handler::*;
use crate::result::ApiResponse;
use biz_service::biz_service::application_service::ApplyStats;
use biz_service::entitys::application_entity::{Application, ApplyStatus};
use biz_service::entitys::application_type_entity::{ApplicationType, FieldKind, FormField};
use biz_service::entitys::role_entity::RoleEntity;
use biz_service::entitys::user_role_entity::UserRole;

#[derive(OpenApi)]
#[openapi(
    paths(
        status,
        application_submit,
        application_list,
        application_closed_list,
        application_transition,
        application_close,
        application_reopen,
        application_delete,
        application_stats,
        application_type_add,
        application_type_update,
        application_type_delete,
        application_type_list,
        role_add,
        role_update,
        role_delete,
        role_list,
        user_role_assign,
        user_role_revoke,
        user_role_list,
    ),
    components(schemas(
        ApiResponse<String>,
        Application,
        ApplyStatus,
        ApplyStats,
        ApplicationType,
        FormField,
        FieldKind,
        RoleEntity,
        UserRole,
    )),
    tags(
        (name = "申请", description = "申请提交与审核"),
        (name = "角色", description = "角色与指派管理")
    )
)]
struct ApiDoc;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(actix_files::Files::new("/swagger-ui", "./static/swagger-ui").index_file("index.html"))
        .service(openapi_json);
}

#[get("/openapi.json")]
async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().content_type("application/json").body(ApiDoc::openapi().to_json().unwrap())
}
