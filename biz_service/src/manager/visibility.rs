use std::collections::HashSet;

use crate::biz_const::{PERM_VIEW_ALL, ROLE_ADMIN, ROLE_STAFF};
use crate::entitys::application_entity::Application;

/// 访问者身份快照：由调用方显式传入，核心逻辑不读任何全局状态
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    pub user_id: String,
    /// 帐号主角色名（可为空）
    pub role_name: Option<String>,
    /// 权限名集合
    pub permissions: Vec<String>,
    /// 生效的角色指派名集合
    pub role_names: Vec<String>,
}

impl Viewer {
    pub fn holds_role(&self, name: &str) -> bool {
        self.role_name.as_deref() == Some(name) || self.role_names.iter().any(|r| r == name)
    }
}

/// 可见性过滤：规则按优先级匹配，命中即返回，不继续落入后续规则。
/// 1. 持有 applications.view 权限 -> 全部
/// 2/3. 角色名或任一指派名为 admin / staff -> 全部
/// 4. 有角色指派 -> 按 required_permissions 与角色名交集过滤（空表不限制）
/// 5. 其余 -> 空集
pub fn visible_applications(apps: Vec<Application>, viewer: &Viewer) -> Vec<Application> {
    if viewer.permissions.iter().any(|p| p == PERM_VIEW_ALL) {
        return apps;
    }
    if viewer.holds_role(ROLE_ADMIN) {
        return apps;
    }
    if viewer.holds_role(ROLE_STAFF) {
        return apps;
    }
    if !viewer.role_names.is_empty() {
        let names: HashSet<&str> = viewer.role_names.iter().map(|s| s.as_str()).collect();
        return apps
            .into_iter()
            .filter(|a| a.required_permissions.is_empty() || a.required_permissions.iter().any(|p| names.contains(p.as_str())))
            .collect();
    }
    vec![]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(id: &str, perms: &[&str]) -> Application {
        Application {
            id: id.to_string(),
            required_permissions: perms.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<Application> {
        vec![app("a1", &[]), app("a2", &["moderator"]), app("a3", &["builder"])]
    }

    fn ids(apps: &[Application]) -> Vec<&str> {
        apps.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_blanket_permission_sees_all() {
        let viewer = Viewer { permissions: vec![PERM_VIEW_ALL.to_string()], ..Default::default() };
        assert_eq!(ids(&visible_applications(sample(), &viewer)), vec!["a1", "a2", "a3"]);
    }

    #[test]
    fn test_admin_and_staff_see_all() {
        for role in [ROLE_ADMIN, ROLE_STAFF] {
            // 主角色名命中
            let viewer = Viewer { role_name: Some(role.to_string()), ..Default::default() };
            assert_eq!(visible_applications(sample(), &viewer).len(), 3);
            // 指派名命中
            let viewer = Viewer { role_names: vec![role.to_string()], ..Default::default() };
            assert_eq!(visible_applications(sample(), &viewer).len(), 3);
        }
    }

    #[test]
    fn test_role_assignment_intersection() {
        let viewer = Viewer { role_names: vec!["moderator".to_string()], ..Default::default() };
        // 空 required_permissions 的记录对任何有指派的访问者可见
        assert_eq!(ids(&visible_applications(sample(), &viewer)), vec!["a1", "a2"]);
    }

    #[test]
    fn test_no_identity_sees_nothing() {
        let viewer = Viewer::default();
        assert!(visible_applications(sample(), &viewer).is_empty());
    }
}
