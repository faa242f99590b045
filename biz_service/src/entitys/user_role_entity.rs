use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 用户角色指派
#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
pub struct UserRole {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub role_id: String,
    /// 停用的指派不参与可见性判断
    pub enable: bool,
    pub create_time: i64,
}
