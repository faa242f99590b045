/// 保留身份字段 key：每个申请类型必含，由系统自动填充
pub const RESERVED_FIELD_KEY: &str = "game_id";
/// 保留身份字段展示名
pub const RESERVED_FIELD_LABEL: &str = "游戏ID";

/// 免过滤查看全部申请的权限名
pub const PERM_VIEW_ALL: &str = "applications.view";

/// 保留角色名：命中即可查看全部申请
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";

/// 近期统计窗口：滚动 7 天
pub const RECENT_WINDOW_SECS: i64 = 7 * 24 * 3600;
