use async_trait::async_trait;
use common::options::{OptionStore, StoreError};
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, Set};
use tracing::error;

use crate::entity::option;

/// Options persisted in the `tracker_option` table.
#[derive(Clone)]
pub struct DatabaseOptionStore {
    db: DatabaseConnection,
}

impl DatabaseOptionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn backend_error(op: &'static str, name: &str, err: DbErr) -> StoreError {
    error!(option = name, "Option {op} failed: {err}");
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl OptionStore for DatabaseOptionStore {
    async fn get(&self, name: &str) -> Result<Option<String>, StoreError> {
        let row = option::Entity::find_by_id(name.to_owned())
            .one(&self.db)
            .await
            .map_err(|e| backend_error("read", name, e))?;
        Ok(row.map(|m| m.value))
    }

    async fn set(&self, name: &str, value: &str) -> Result<(), StoreError> {
        let model = option::ActiveModel {
            name: Set(name.to_owned()),
            value: Set(value.to_owned()),
            updated_at: Set(chrono::Utc::now()),
        };

        option::Entity::insert(model)
            .on_conflict(
                OnConflict::column(option::Column::Name)
                    .update_columns([option::Column::Value, option::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| backend_error("write", name, e))?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool, StoreError> {
        let res = option::Entity::delete_by_id(name.to_owned())
            .exec(&self.db)
            .await
            .map_err(|e| backend_error("delete", name, e))?;
        Ok(res.rows_affected > 0)
    }
}
