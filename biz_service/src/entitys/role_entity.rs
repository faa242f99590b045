use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 角色信息结构体；可见性判断只比对角色名，层级仅用于展示排序
#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
pub struct RoleEntity {
    /// 角色 ID（唯一）
    #[serde(rename = "_id")]
    pub id: String,
    /// 角色名（如 "admin"、"staff"、"moderator"，用于程序判断）
    pub name: String,
    /// 展示名称
    pub show_name: String,
    /// 展示颜色（如 "#e91e63"）
    pub color: String,
    /// 层级：数值越小权限展示越靠前，不参与鉴权
    pub level: i32,
    /// 是否启用
    pub enable: bool,
    /// 创建时间（Unix 时间戳，秒）
    pub create_time: i64,
    /// 最后更新时间（Unix 时间戳，秒）
    pub update_time: i64,
}
