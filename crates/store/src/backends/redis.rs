//! Redis backend.
//!
//! Implements both adapters against a single Redis connection:
//!
//! | Key | Type | Purpose |
//! |-----|------|---------|
//! | `{prefix}:task:{id}` | String (JSON) | Task record |
//! | `{prefix}:task-locations` | Geo/Sorted Set | Shared geo index |
//!
//! Record operations are plain `SET`/`GET`/`DEL`. The geo index maps to
//! `GEOADD`/`ZREM`/`GEOSEARCH`/`GEOPOS` on the one shared set; distance
//! computation and spatial indexing are Redis's concern, this adapter only
//! guarantees the member set it returns. The two structures are updated by
//! separate commands with no transaction across them.

use crate::error::{StoreError, StoreResult};
use crate::traits::{GeoIndex, RecordStore};
use async_trait::async_trait;
use geotask_core::{GeoPoint, Task, TaskId};
use redis::aio::MultiplexedConnection;

const DEFAULT_KEY_PREFIX: &str = "geotask";

/// Redis-backed record store and geo index.
///
/// Holds a [`MultiplexedConnection`], which is cloned cheaply per operation;
/// all clones share one TCP connection and are safe for concurrent use.
#[derive(Clone)]
pub struct RedisBackend {
    conn: MultiplexedConnection,
    key_prefix: String,
}

impl RedisBackend {
    /// Connect to Redis at the given URL.
    ///
    /// Fails fast if the connection cannot be established.
    pub async fn new(url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self {
            conn,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        })
    }

    /// Create a backend from a pre-built connection.
    pub fn with_connection(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }

    /// Set a custom key prefix (builder pattern). Useful for test isolation.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    fn record_key(&self, id: &TaskId) -> String {
        record_key_for(&self.key_prefix, id)
    }

    fn geo_key(&self) -> String {
        geo_key_for(&self.key_prefix)
    }
}

fn record_key_for(prefix: &str, id: &TaskId) -> String {
    format!("{prefix}:{}", id.record_key())
}

fn geo_key_for(prefix: &str) -> String {
    format!("{prefix}:task-locations")
}

#[async_trait]
impl RecordStore for RedisBackend {
    async fn get(&self, id: &TaskId) -> StoreResult<Option<Task>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = redis::cmd("GET")
            .arg(self.record_key(id))
            .query_async(&mut conn)
            .await?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, task: &Task) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let payload = serde_json::to_string(task)?;
        let _: () = redis::cmd("SET")
            .arg(self.record_key(&task.id))
            .arg(payload)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let removed: i64 = redis::cmd("DEL")
            .arg(self.record_key(id))
            .query_async(&mut conn)
            .await?;
        Ok(removed > 0)
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }

    async fn health_check(&self) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl GeoIndex for RedisBackend {
    async fn upsert(&self, id: &TaskId, position: GeoPoint) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        // GEOADD takes longitude before latitude.
        let _: i64 = redis::cmd("GEOADD")
            .arg(self.geo_key())
            .arg(position.lng)
            .arg(position.lat)
            .arg(id.to_string())
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn remove(&self, id: &TaskId) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        // ZREM returns 0 for a missing member without erroring, which is
        // exactly the idempotence this trait requires.
        let _: i64 = redis::cmd("ZREM")
            .arg(self.geo_key())
            .arg(id.to_string())
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn query_radius(&self, center: GeoPoint, radius_km: f64) -> StoreResult<Vec<TaskId>> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = redis::cmd("GEOSEARCH")
            .arg(self.geo_key())
            .arg("FROMLONLAT")
            .arg(center.lng)
            .arg(center.lat)
            .arg("BYRADIUS")
            .arg(radius_km)
            .arg("km")
            .arg("ASC")
            .query_async(&mut conn)
            .await?;

        let mut ids = Vec::with_capacity(members.len());
        for member in members {
            match TaskId::parse(&member) {
                Ok(id) => ids.push(id),
                // Foreign members in the index are skipped, not fatal.
                Err(_) => tracing::warn!(member = %member, "ignoring malformed geo index member"),
            }
        }
        Ok(ids)
    }

    async fn position_of(&self, id: &TaskId) -> StoreResult<Option<GeoPoint>> {
        let mut conn = self.conn.clone();
        let positions: Vec<Option<(f64, f64)>> = redis::cmd("GEOPOS")
            .arg(self.geo_key())
            .arg(id.to_string())
            .query_async(&mut conn)
            .await?;
        match positions.into_iter().next().flatten() {
            Some((lng, lat)) => {
                let position = GeoPoint::new(lat, lng)
                    .map_err(|e| StoreError::Backend(format!("geo index returned {e}")))?;
                Ok(Some(position))
            }
            None => Ok(None),
        }
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }

    async fn health_check(&self) -> StoreResult<()> {
        RecordStore::health_check(self).await
    }
}
