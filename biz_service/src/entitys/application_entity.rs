use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// 审核状态：pending 为初始态，approved/rejected 为终态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Display, EnumString, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ApplyStatus {
    #[default]
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

impl ApplyStatus {
    /// 状态可达表；任何状态都不能回到 pending
    pub fn can_transition_to(&self, next: ApplyStatus) -> bool {
        use ApplyStatus::*;
        matches!(
            (self, next),
            (Pending, UnderReview) | (Pending, Approved) | (Pending, Rejected) | (UnderReview, Approved) | (UnderReview, Rejected)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplyStatus::Approved | ApplyStatus::Rejected)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
pub struct Application {
    /// 申请记录唯一 ID（hex 字符串）
    #[serde(rename = "_id")]
    pub id: String,
    /// 提交人用户 ID
    pub user_id: String,
    /// 所属申请类型 ID
    pub type_id: String,
    /// 审核状态
    pub status: ApplyStatus,
    /// 表单提交内容（字段 key -> 提交值，结构由申请类型定义）
    #[schema(value_type = Object)]
    pub form_data: HashMap<String, serde_json::Value>,
    /// Discord 帐号（可选）
    pub discord_handle: Option<String>,
    /// 审核备注（可选）
    pub notes: Option<String>,
    /// 可见性权限名（提交时从申请类型冗余一份，用于过滤）
    pub required_permissions: Vec<String>,
    /// 关闭标记：与状态无关的软隐藏
    pub closed: bool,
    /// 创建时间（Unix 秒时间戳）
    pub create_time: i64,
    /// 最后更新时间（Unix 秒时间戳）
    pub update_time: i64,
    /// 审核时间（与 reviewed_by 同时设置）
    pub reviewed_at: Option<i64>,
    /// 审核人用户 ID
    pub reviewed_by: Option<String>,
    /// 关闭时间（与 closed_by 同时设置）
    pub closed_at: Option<i64>,
    /// 关闭人用户 ID
    pub closed_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::ApplyStatus::*;

    #[test]
    fn test_pending_transitions() {
        assert!(Pending.can_transition_to(UnderReview));
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_under_review_transitions() {
        assert!(UnderReview.can_transition_to(Approved));
        assert!(UnderReview.can_transition_to(Rejected));
        assert!(!UnderReview.can_transition_to(Pending));
        assert!(!UnderReview.can_transition_to(UnderReview));
    }

    #[test]
    fn test_terminal_states() {
        // approved/rejected 状态字段不再迁移
        for s in [Approved, Rejected] {
            assert!(s.is_terminal());
            for next in [Pending, UnderReview, Approved, Rejected] {
                assert!(!s.can_transition_to(next));
            }
        }
    }
}
