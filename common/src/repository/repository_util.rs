use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::FindOptions;
use mongodb::{bson::Document, error::Result, Collection, Database};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::marker::PhantomData;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum OrderType {
    #[default]
    Asc,
    Desc,
}

impl OrderType {
    fn direction(&self) -> i32 {
        match self {
            OrderType::Asc => 1,
            OrderType::Desc => -1,
        }
    }
}

#[async_trait]
pub trait Repository<T> {
    async fn find_by_id(&self, id: &str) -> Result<Option<T>>;
    async fn insert(&self, entity: &T) -> Result<()>;
    async fn find_one(&self, filter: Document) -> Result<Option<T>>;
    async fn query(&self, filter: Document) -> Result<Vec<T>>;
    async fn query_all(&self) -> Result<Vec<T>>;
    async fn query_sorted(&self, filter: Document, sort_field: &str, order: OrderType) -> Result<Vec<T>>;
    async fn count(&self, filter: Document) -> Result<u64>;
    async fn update(&self, filter: Document, update: Document) -> Result<u64>;
    async fn update_by_id(&self, id: &str, update: Document) -> Result<u64>;
    async fn delete(&self, filter: Document) -> Result<u64>;
    async fn delete_by_id(&self, id: &str) -> Result<u64>;
}

#[allow(dead_code)]
pub struct BaseRepository<T: Send + Sync> {
    pub collection: Collection<T>, // 线程安全的数据库连接池
    pub db: Database,
    _marker: PhantomData<T>,
}

impl<T: Send + Sync> BaseRepository<T> {
    pub fn new(db: Database, collection: Collection<T>) -> Self {
        Self { collection, db, _marker: Default::default() }
    }
}

impl<T: Send + Sync> std::fmt::Debug for BaseRepository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseRepository").field("collection", &self.collection.name()).finish()
    }
}

#[async_trait]
impl<T: Send + Sync> Repository<T> for BaseRepository<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    async fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        // 主键统一为 hex 字符串，直接按 _id 匹配
        self.find_one(doc! { "_id": id }).await
    }

    async fn insert(&self, entity: &T) -> Result<()> {
        self.collection.insert_one(entity).await?;
        Ok(())
    }

    async fn find_one(&self, filter: Document) -> Result<Option<T>> {
        let result = self.collection.find_one(filter).await?;
        Ok(result)
    }

    async fn query(&self, filter: Document) -> Result<Vec<T>> {
        let mut cursor = self.collection.find(filter).await?;
        let mut result = vec![];
        while let Some(doc) = cursor.try_next().await? {
            result.push(doc);
        }
        Ok(result)
    }

    async fn query_all(&self) -> Result<Vec<T>> {
        self.query(doc! {}).await
    }

    async fn query_sorted(&self, filter: Document, sort_field: &str, order: OrderType) -> Result<Vec<T>> {
        let find_options = FindOptions::builder().sort(doc! { sort_field: order.direction() }).build();
        let mut cursor = self.collection.find(filter).with_options(find_options).await?;
        let mut result = vec![];
        while let Some(doc) = cursor.try_next().await? {
            result.push(doc);
        }
        Ok(result)
    }

    async fn count(&self, filter: Document) -> Result<u64> {
        let count = self.collection.count_documents(filter).await?;
        Ok(count)
    }

    async fn update(&self, filter: Document, update: Document) -> Result<u64> {
        let result = self.collection.update_many(filter, update).await?;
        Ok(result.modified_count)
    }

    async fn update_by_id(&self, id: &str, update: Document) -> Result<u64> {
        let result = self.collection.update_one(doc! { "_id": id }, update).await?;
        Ok(result.modified_count)
    }

    async fn delete(&self, filter: Document) -> Result<u64> {
        let result = self.collection.delete_many(filter).await?;
        Ok(result.deleted_count)
    }

    async fn delete_by_id(&self, id: &str) -> Result<u64> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count)
    }
}
