//! Address Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Address, AddressCreate, AddressUpdate};
use shared::util::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const ADDRESS_TABLE: &str = "address";

#[derive(Clone)]
pub struct AddressRepository {
    base: BaseRepository,
}

impl AddressRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All addresses of a user, default first
    pub async fn find_by_user(&self, user: &RecordId) -> RepoResult<Vec<Address>> {
        let addresses: Vec<Address> = self
            .base
            .db()
            .query("SELECT * FROM address WHERE user = $user ORDER BY is_default DESC, created_at DESC")
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(addresses)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Address>> {
        let rid = parse_record_id(ADDRESS_TABLE, id)?;
        let address: Option<Address> = self.base.db().select(rid).await?;
        Ok(address)
    }

    pub async fn create(&self, user: &RecordId, data: AddressCreate) -> RepoResult<Address> {
        let is_default = data.is_default.unwrap_or(false);
        if is_default {
            self.clear_default(user).await?;
        }

        let address = Address {
            id: None,
            user: user.clone(),
            recipient: data.recipient,
            street: data.street,
            city: data.city,
            state: data.state,
            postal_code: data.postal_code,
            phone: data.phone,
            is_default,
            created_at: now_millis(),
        };

        let created: Option<Address> = self
            .base
            .db()
            .create(ADDRESS_TABLE)
            .content(address)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create address".to_string()))
    }

    pub async fn update(&self, id: &str, data: AddressUpdate) -> RepoResult<Address> {
        let rid = parse_record_id(ADDRESS_TABLE, id)?;

        // Promote to default clears the flag on siblings first
        if data.is_default == Some(true)
            && let Some(existing) = self.find_by_id(id).await?
        {
            self.clear_default(&existing.user).await?;
        }

        let mut set_parts: Vec<&str> = Vec::new();
        if data.recipient.is_some() {
            set_parts.push("recipient = $recipient");
        }
        if data.street.is_some() {
            set_parts.push("street = $street");
        }
        if data.city.is_some() {
            set_parts.push("city = $city");
        }
        if data.state.is_some() {
            set_parts.push("state = $state");
        }
        if data.postal_code.is_some() {
            set_parts.push("postal_code = $postal_code");
        }
        if data.phone.is_some() {
            set_parts.push("phone = $phone");
        }
        if data.is_default.is_some() {
            set_parts.push("is_default = $is_default");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Address {} not found", id)));
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(&query_str).bind(("thing", rid));

        if let Some(v) = data.recipient {
            query = query.bind(("recipient", v));
        }
        if let Some(v) = data.street {
            query = query.bind(("street", v));
        }
        if let Some(v) = data.city {
            query = query.bind(("city", v));
        }
        if let Some(v) = data.state {
            query = query.bind(("state", v));
        }
        if let Some(v) = data.postal_code {
            query = query.bind(("postal_code", v));
        }
        if let Some(v) = data.phone {
            query = query.bind(("phone", v));
        }
        if let Some(v) = data.is_default {
            query = query.bind(("is_default", v));
        }

        let mut result = query.await?;
        let addresses: Vec<Address> = result.take(0)?;
        addresses
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Address {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = parse_record_id(ADDRESS_TABLE, id)?;
        let result: Option<Address> = self.base.db().delete(rid).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Address {} not found", id)));
        }
        Ok(())
    }

    /// Clear the default flag on all of a user's addresses
    async fn clear_default(&self, user: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE address SET is_default = false WHERE user = $user AND is_default = true")
            .bind(("user", user.clone()))
            .await?;
        Ok(())
    }
}
