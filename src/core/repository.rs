use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::library::LibraryResult;

// Repository is the read side shared by entities looked up by id. The engine
// never writes circulation data.
#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // get an entity
    async fn get(&self, id: &str) -> LibraryResult<Entity>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum RepositoryStore {
    DynamoDB,
    LocalDynamoDB,
}

impl From<String> for RepositoryStore {
    fn from(s: String) -> Self {
        match s.as_str() {
            "local" | "LocalDynamoDB" => RepositoryStore::LocalDynamoDB,
            _ => RepositoryStore::DynamoDB,
        }
    }
}
