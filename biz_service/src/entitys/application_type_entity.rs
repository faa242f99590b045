use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// 表单字段类型（闭集，提交校验按类型分派）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Display, EnumString, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Textarea,
    Number,
    Email,
    Select,
    Checkbox,
    Radio,
}

/// 表单字段定义
#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
pub struct FormField {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub placeholder: Option<String>,
    /// select/radio 的候选项
    pub options: Vec<String>,
    /// 系统字段：仅保留身份字段为 true，编辑器中只读、不可删除
    pub system: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
pub struct ApplicationType {
    /// 申请类型唯一 ID（hex 字符串）
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    /// 有序的表单字段定义；保存时保证首位为保留身份字段
    pub form_fields: Vec<FormField>,
    /// 允许查看/处理该类型申请的角色名
    pub required_permissions: Vec<String>,
    /// 停用后不再接受提交
    pub enable: bool,
    /// 创建时间（Unix 秒时间戳）
    pub create_time: i64,
    /// 最后更新时间（Unix 秒时间戳）
    pub update_time: i64,
}
