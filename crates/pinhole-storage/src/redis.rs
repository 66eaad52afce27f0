use async_trait::async_trait;
use pinhole_core::error::StorageError;
use pinhole_core::repository::{ReadRepository, Repository, Result};
use pinhole_core::{
    CountryRedirects, ExpiryDate, FieldChange, RecordPatch, ShortCode, ShortLinkRecord,
};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

const DEFAULT_KEY_PREFIX: &str = "ph:";

const FIELD_LONG_URL: &str = "long_url";
const FIELD_CLICKS: &str = "clicks";
const FIELD_PASSWORD: &str = "password";
const FIELD_EXPIRY_DATE: &str = "expiry_date";
const FIELD_MAX_CLICKS: &str = "max_clicks";
const FIELD_MOBILE_URL: &str = "mobile_url";
const FIELD_DESKTOP_URL: &str = "desktop_url";
const FIELD_COUNTRY_REDIRECT: &str = "country_redirect";

/// Writes the hash only if the key is absent. Returns 1 on insert, 0 on conflict.
const INSERT_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
  return 0
end
redis.call('HSET', KEYS[1], unpack(ARGV))
return 1
"#;

/// Increments `clicks` without creating a hash for an unknown key.
const INCREMENT_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
  return false
end
return redis.call('HINCRBY', KEYS[1], 'clicks', 1)
"#;

/// Redis implementation of the repository contract.
///
/// Each link is one hash under `{prefix}link:{code}`. Unset optional fields
/// are absent from the hash. Inserts and increments run as Lua scripts so
/// both the existence check and the write happen atomically on the server.
#[derive(Clone)]
pub struct RedisRepository {
    conn: ConnectionManager,
    key_prefix: String,
    insert_script: Script,
    increment_script: Script,
}

impl std::fmt::Debug for RedisRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRepository")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StorageError {
    let message = format!("{operation}: {err}");
    if message.to_ascii_lowercase().contains("timed out") {
        StorageError::Timeout(message)
    } else if err.is_io_error() {
        StorageError::Unavailable(message)
    } else {
        StorageError::Operation(message)
    }
}

impl RedisRepository {
    /// Creates a repository from an existing connection manager.
    pub fn new(conn: ConnectionManager) -> Self {
        Self::with_prefix(conn, DEFAULT_KEY_PREFIX)
    }

    /// Creates a repository with a custom key prefix (e.g. "myapp:").
    pub fn with_prefix(conn: ConnectionManager, key_prefix: impl Into<String>) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
            insert_script: Script::new(INSERT_SCRIPT),
            increment_script: Script::new(INCREMENT_SCRIPT),
        }
    }

    /// Opens a client for `redis_url` and wraps it in a connection manager.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| map_redis_error("invalid redis url", e))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;
        Ok(Self::new(conn))
    }

    fn link_key(&self, code: &ShortCode) -> String {
        format!("{}link:{}", self.key_prefix, code.as_str())
    }
}

/// Hash field operation derived from a record or a patch.
enum FieldWrite {
    Set(&'static str, String),
    Delete(&'static str),
}

fn encode_country(redirects: &CountryRedirects) -> Result<String> {
    serde_json::to_string(redirects)
        .map_err(|e| StorageError::InvalidData(format!("failed to encode country_redirect: {e}")))
}

fn optional(field: &'static str, value: Option<String>) -> FieldWrite {
    match value {
        Some(value) => FieldWrite::Set(field, value),
        None => FieldWrite::Delete(field),
    }
}

fn encode_change(change: &FieldChange) -> Result<FieldWrite> {
    let write = match change {
        FieldChange::LongUrl(url) => FieldWrite::Set(FIELD_LONG_URL, url.clone()),
        FieldChange::Password(v) => optional(FIELD_PASSWORD, v.clone()),
        FieldChange::ExpiryDate(v) => optional(FIELD_EXPIRY_DATE, v.map(|d| d.to_string())),
        FieldChange::MaxClicks(v) => optional(FIELD_MAX_CLICKS, v.map(|n| n.to_string())),
        FieldChange::MobileUrl(v) => optional(FIELD_MOBILE_URL, v.clone()),
        FieldChange::DesktopUrl(v) => optional(FIELD_DESKTOP_URL, v.clone()),
        FieldChange::CountryRedirect(v) => optional(
            FIELD_COUNTRY_REDIRECT,
            v.as_ref().map(encode_country).transpose()?,
        ),
    };
    Ok(write)
}

fn encode_record(record: &ShortLinkRecord) -> Result<Vec<(&'static str, String)>> {
    let mut fields = vec![
        (FIELD_LONG_URL, record.long_url.clone()),
        (FIELD_CLICKS, record.clicks.to_string()),
    ];

    let changes = [
        FieldChange::Password(record.password.clone()),
        FieldChange::ExpiryDate(record.expiry_date),
        FieldChange::MaxClicks(record.max_clicks),
        FieldChange::MobileUrl(record.mobile_url.clone()),
        FieldChange::DesktopUrl(record.desktop_url.clone()),
        FieldChange::CountryRedirect(record.country_redirect.clone()),
    ];
    for change in &changes {
        if let FieldWrite::Set(field, value) = encode_change(change)? {
            fields.push((field, value));
        }
    }

    Ok(fields)
}

fn decode_record(code: &ShortCode, mut fields: HashMap<String, String>) -> Result<ShortLinkRecord> {
    let invalid = |what: String| StorageError::InvalidData(format!("{code}: {what}"));

    let long_url = fields
        .remove(FIELD_LONG_URL)
        .ok_or_else(|| invalid("missing long_url".to_string()))?;
    let clicks = fields
        .remove(FIELD_CLICKS)
        .map(|v| v.parse::<u64>())
        .transpose()
        .map_err(|e| invalid(format!("invalid clicks: {e}")))?
        .unwrap_or(0);
    let expiry_date = fields
        .remove(FIELD_EXPIRY_DATE)
        .map(|v| ExpiryDate::parse(&v))
        .transpose()
        .map_err(|e| invalid(format!("invalid expiry_date: {e}")))?;
    let max_clicks = fields
        .remove(FIELD_MAX_CLICKS)
        .map(|v| v.parse::<u64>())
        .transpose()
        .map_err(|e| invalid(format!("invalid max_clicks: {e}")))?;
    let country_redirect = fields
        .remove(FIELD_COUNTRY_REDIRECT)
        .map(|v| serde_json::from_str::<CountryRedirects>(&v))
        .transpose()
        .map_err(|e| invalid(format!("invalid country_redirect: {e}")))?;

    Ok(ShortLinkRecord {
        long_url,
        clicks,
        password: fields.remove(FIELD_PASSWORD),
        expiry_date,
        max_clicks,
        mobile_url: fields.remove(FIELD_MOBILE_URL),
        desktop_url: fields.remove(FIELD_DESKTOP_URL),
        country_redirect,
    })
}

#[async_trait]
impl ReadRepository for RedisRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortLinkRecord>> {
        let key = self.link_key(code);
        trace!(code = %code, "fetching link from Redis");

        let mut conn = self.conn.clone();
        let fields: HashMap<String, String> = conn
            .hgetall(&key)
            .await
            .map_err(|e| map_redis_error("failed to fetch link", e))?;

        if fields.is_empty() {
            trace!(code = %code, "link not found in Redis");
            return Ok(None);
        }

        decode_record(code, fields).map(Some).inspect_err(|e| {
            warn!(code = %code, error = %e, "stored link is malformed");
        })
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let mut conn = self.conn.clone();
        conn.exists(self.link_key(code))
            .await
            .map_err(|e| map_redis_error("failed to check link existence", e))
    }
}

#[async_trait]
impl Repository for RedisRepository {
    async fn insert(&self, code: &ShortCode, record: ShortLinkRecord) -> Result<()> {
        let key = self.link_key(code);
        let fields = encode_record(&record)?;

        let mut invocation = self.insert_script.key(&key);
        for (field, value) in &fields {
            invocation.arg(*field).arg(value);
        }

        let mut conn = self.conn.clone();
        let inserted: i64 = invocation
            .invoke_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("failed to insert link", e))?;

        if inserted == 0 {
            return Err(StorageError::Conflict(code.to_string()));
        }

        debug!(code = %code, "stored link in Redis");
        Ok(())
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<Option<u64>> {
        let mut conn = self.conn.clone();
        self.increment_script
            .key(self.link_key(code))
            .invoke_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("failed to increment clicks", e))
    }

    async fn update(
        &self,
        code: &ShortCode,
        patch: &RecordPatch,
    ) -> Result<Option<ShortLinkRecord>> {
        // Links are never deleted, so a present key stays present for the
        // rest of this call.
        if !self.exists(code).await? {
            return Ok(None);
        }

        let key = self.link_key(code);
        let mut sets: Vec<(&'static str, String)> = Vec::new();
        let mut deletes: Vec<&'static str> = Vec::new();
        for change in patch.changes() {
            match encode_change(change)? {
                FieldWrite::Set(field, value) => sets.push((field, value)),
                FieldWrite::Delete(field) => deletes.push(field),
            }
        }

        let mut pipe = redis::pipe();
        pipe.atomic();
        if !sets.is_empty() {
            pipe.hset_multiple(&key, sets.as_slice()).ignore();
        }
        if !deletes.is_empty() {
            pipe.hdel(&key, &deletes).ignore();
        }

        let mut conn = self.conn.clone();
        pipe.query_async::<()>(&mut conn)
            .await
            .map_err(|e| map_redis_error("failed to update link", e))?;

        debug!(code = %code, fields = patch.changes().len(), "updated link in Redis");
        self.get(code).await
    }
}
