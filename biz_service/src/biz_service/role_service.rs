use mongodb::bson::doc;
use mongodb::Database;
use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::entitys::role_entity::RoleEntity;
use common::errors::AppError;
use common::repository_util::{BaseRepository, OrderType, Repository};
use common::util::common_utils::build_id;
use common::util::date_util::now;

#[derive(Debug)]
pub struct RoleService {
    pub dao: BaseRepository<RoleEntity>,
}

impl RoleService {
    pub fn new(db: Database) -> Self {
        let collection = db.collection("role");
        Self { dao: BaseRepository::new(db, collection.clone()) }
    }

    pub fn init(db: Database) {
        let instance = Self::new(db);
        INSTANCE.set(Arc::new(instance)).expect("INSTANCE already initialized");
    }

    /// 获取单例
    pub fn get() -> Arc<Self> {
        INSTANCE.get().expect("INSTANCE is not initialized").clone()
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<RoleEntity>, AppError> {
        let result = self.dao.find_one(doc! { "name": name }).await?;
        Ok(result)
    }

    /// 角色名唯一
    pub async fn create(&self, mut role: RoleEntity) -> Result<RoleEntity, AppError> {
        if role.name.trim().is_empty() {
            return Err(AppError::Validation("role name is empty".to_string()));
        }
        if self.find_by_name(&role.name).await?.is_some() {
            return Err(AppError::Conflict);
        }
        role.id = build_id();
        role.create_time = now();
        role.update_time = role.create_time;
        self.dao.insert(&role).await?;
        Ok(role)
    }

    /// 角色名创建后不再变更，只更新展示属性与启用状态
    pub async fn update_role(&self, role: &RoleEntity) -> Result<(), AppError> {
        self.dao.find_by_id(&role.id).await?.ok_or(AppError::NotFound)?;
        let update = doc! {"$set": {
            "show_name": role.show_name.clone(),
            "color": role.color.clone(),
            "level": role.level,
            "enable": role.enable,
            "update_time": now(),
        }};
        self.dao.update_by_id(&role.id, update).await?;
        Ok(())
    }

    pub async fn remove(&self, id: &str) -> Result<(), AppError> {
        let deleted = self.dao.delete_by_id(id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// 层级值小的在前，仅用于展示排序
    pub async fn list(&self) -> Result<Vec<RoleEntity>, AppError> {
        let list = self.dao.query_sorted(doc! {}, "level", OrderType::Asc).await?;
        Ok(list)
    }
}

static INSTANCE: OnceCell<Arc<RoleService>> = OnceCell::new();
