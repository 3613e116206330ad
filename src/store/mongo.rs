//! MongoDB adapter: one collection per resource, documents keyed by the public `id`
//! field. The native `_id` never leaves this module.

use super::{Backend, ResourceStore};
use crate::config::{MongoSettings, PoolSettings};
use crate::error::StoreError;
use crate::model::{ChangeSet, FieldValue, Resource};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Bson, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct MongoStore {
    client: Client,
    db: Database,
    closed: AtomicBool,
}

impl MongoStore {
    /// Build the client and verify the server answers a ping.
    pub async fn connect(settings: &MongoSettings, pool: &PoolSettings) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(&settings.url).await?;
        options.min_pool_size = Some(pool.min_connections);
        options.max_pool_size = Some(pool.max_connections);
        let client = Client::with_options(options)?;
        let db = client.database(&settings.database);
        let store = Self {
            client,
            db,
            closed: AtomicBool::new(false),
        };
        store.ping().await?;
        tracing::info!(database = %settings.database, "connected to MongoDB");
        Ok(store)
    }

    pub fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }
}

pub(crate) fn to_bson(value: &FieldValue) -> Bson {
    match value {
        FieldValue::Null => Bson::Null,
        FieldValue::Text(s) => Bson::String(s.clone()),
        FieldValue::Int(n) => Bson::Int32(*n),
        FieldValue::Float(f) => Bson::Double(*f),
        FieldValue::Timestamp(t) => Bson::DateTime(bson::DateTime::from_millis(t.timestamp_millis())),
    }
}

pub(crate) fn to_document<'a, K, I>(fields: I) -> Document
where
    K: AsRef<str>,
    I: IntoIterator<Item = (K, &'a FieldValue)>,
{
    fields
        .into_iter()
        .map(|(name, value)| (name.as_ref().to_string(), to_bson(value)))
        .collect()
}

fn to_json(value: Bson) -> Result<Value, StoreError> {
    match value {
        Bson::DateTime(d) => chrono::DateTime::from_timestamp_millis(d.timestamp_millis())
            .map(|t| FieldValue::Timestamp(t).to_json())
            .ok_or_else(|| StoreError::Codec(format!("timestamp out of range: {}", d))),
        other => Ok(other.into_relaxed_extjson()),
    }
}

pub(crate) fn from_document<R: Resource>(mut document: Document) -> Result<R, StoreError> {
    document.remove("_id");
    let object = document
        .into_iter()
        .map(|(k, v)| to_json(v).map(|v| (k, v)))
        .collect::<Result<serde_json::Map<String, Value>, StoreError>>()?;
    Ok(serde_json::from_value(Value::Object(object))?)
}

#[async_trait]
impl Backend for MongoStore {
    fn name(&self) -> &'static str {
        "MongoDB"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn disconnect(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.client.clone().shutdown().await;
        tracing::info!("disconnected from MongoDB");
    }
}

#[async_trait]
impl<R: Resource> ResourceStore<R> for MongoStore {
    async fn insert(&self, record: &R) -> Result<(), StoreError> {
        let row = record.row();
        let document = to_document(row.iter().map(|(k, v)| (*k, v)));
        self.collection(R::TABLE).insert_one(document).await?;
        Ok(())
    }

    async fn find_one(&self, id: &str) -> Result<Option<R>, StoreError> {
        self.collection(R::TABLE)
            .find_one(doc! { "id": id })
            .await?
            .map(from_document)
            .transpose()
    }

    async fn find_all(&self) -> Result<Vec<R>, StoreError> {
        let cursor = self.collection(R::TABLE).find(doc! {}).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        documents.into_iter().map(from_document).collect()
    }

    async fn update_fields(&self, id: &str, changes: &ChangeSet) -> Result<bool, StoreError> {
        let set = to_document(changes.iter());
        let result = self
            .collection(R::TABLE)
            .update_one(doc! { "id": id }, doc! { "$set": set })
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_one(&self, id: &str) -> Result<u64, StoreError> {
        let result = self.collection(R::TABLE).delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{now, Product, User};

    #[test]
    fn document_round_trip_strips_native_key() {
        let user = User {
            id: "0b6e2c1a-3f4d-4e5b-9c8a-7d6e5f4a3b2c".into(),
            name: "John Doe".into(),
            email: "john@example.com".into(),
            age: Some(30),
            created_at: now(),
            updated_at: None,
        };
        let row = user.row();
        let mut document = to_document(row.iter().map(|(k, v)| (*k, v)));
        assert!(matches!(document.get("created_at"), Some(Bson::DateTime(_))));
        assert_eq!(document.get("updated_at"), Some(&Bson::Null));
        document.insert("_id", bson::oid::ObjectId::new());

        let back: User = from_document(document).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn whole_prices_decode_as_floats() {
        let document = doc! {
            "_id": bson::oid::ObjectId::new(),
            "id": "0b6e2c1a-3f4d-4e5b-9c8a-7d6e5f4a3b2c",
            "name": "Desk",
            "description": Bson::Null,
            "price": 50.0,
            "category": "furniture",
            "created_at": bson::DateTime::now(),
            "updated_at": Bson::Null,
        };
        let product: Product = from_document(document).unwrap();
        assert_eq!(product.price, 50.0);
        assert_eq!(product.description, None);
    }

    #[test]
    fn change_set_becomes_set_document() {
        let mut changes = ChangeSet::new();
        changes.set("price", 49.99);
        let set = to_document(changes.iter());
        assert_eq!(set.get("price"), Some(&Bson::Double(49.99)));
    }
}
