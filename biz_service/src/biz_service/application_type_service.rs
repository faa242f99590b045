use mongodb::bson::{doc, to_bson};
use mongodb::Database;
use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::entitys::application_type_entity::ApplicationType;
use crate::manager::form_schema::ensure_reserved_field;
use common::errors::AppError;
use common::repository_util::{BaseRepository, OrderType, Repository};
use common::util::common_utils::{build_id, build_uuid};
use common::util::date_util::now;

#[derive(Debug)]
pub struct ApplicationTypeService {
    pub dao: BaseRepository<ApplicationType>,
}

impl ApplicationTypeService {
    pub fn new(db: Database) -> Self {
        let collection = db.collection("application_type");
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

    /// 每次写入都会整理字段表：补齐缺失 key，并保证保留身份字段唯一
    fn normalize(mut ty: ApplicationType) -> ApplicationType {
        for field in ty.form_fields.iter_mut() {
            if field.key.trim().is_empty() {
                field.key = build_uuid();
            }
        }
        ty.form_fields = ensure_reserved_field(ty.form_fields);
        ty
    }

    pub async fn create(&self, ty: ApplicationType) -> Result<ApplicationType, AppError> {
        if ty.name.trim().is_empty() {
            return Err(AppError::Validation("application type name is empty".to_string()));
        }
        let mut ty = Self::normalize(ty);
        ty.id = build_id();
        ty.create_time = now();
        ty.update_time = ty.create_time;
        self.dao.insert(&ty).await?;
        Ok(ty)
    }

    /// 编辑字段表只影响后续提交，已存在申请的 form_data 不回写
    pub async fn update_type(&self, ty: ApplicationType) -> Result<ApplicationType, AppError> {
        if ty.name.trim().is_empty() {
            return Err(AppError::Validation("application type name is empty".to_string()));
        }
        self.dao.find_by_id(&ty.id).await?.ok_or(AppError::NotFound)?;
        let mut ty = Self::normalize(ty);
        ty.update_time = now();
        let fields = to_bson(&ty.form_fields).map_err(|e| AppError::Internal(e.to_string()))?;
        let permissions = to_bson(&ty.required_permissions).map_err(|e| AppError::Internal(e.to_string()))?;
        let update = doc! {"$set": {
            "name": ty.name.clone(),
            "description": ty.description.clone(),
            "form_fields": fields,
            "required_permissions": permissions,
            "enable": ty.enable,
            "update_time": ty.update_time,
        }};
        self.dao.update_by_id(&ty.id, update).await?;
        Ok(ty)
    }

    pub async fn remove(&self, id: &str) -> Result<(), AppError> {
        let deleted = self.dao.delete_by_id(id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<ApplicationType>, AppError> {
        let list = self.dao.query_sorted(doc! {}, "create_time", OrderType::Desc).await?;
        Ok(list)
    }
}

static INSTANCE: OnceCell<Arc<ApplicationTypeService>> = OnceCell::new();
