use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::{db::Database, storage::KeyValueStore};

impl Database {
    /// Fetch the raw value stored under `key`.
    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.execute(move |conn| {
            conn.query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("failed to read key {key}"))
        })
    }

    /// Insert or fully replace the value stored under `key`.
    pub fn put_value(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO kv_store (key, value, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = excluded.updated_at",
                params![key, value, Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("failed to write key {key}"))?;
            Ok(())
        })
    }

    pub fn delete_value(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.execute(move |conn| {
            conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])
                .with_context(|| format!("failed to delete key {key}"))?;
            Ok(())
        })
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_value(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.put_value(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.delete_value(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::METRICS_KEY;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.sqlite3");

        {
            let db = Database::new(path.clone()).unwrap();
            db.set(METRICS_KEY, "{\"attempts\":2}").unwrap();
            db.set(METRICS_KEY, "{\"attempts\":3}").unwrap();
        }

        let db = Database::new(path).unwrap();
        assert_eq!(
            db.get(METRICS_KEY).unwrap().as_deref(),
            Some("{\"attempts\":3}")
        );

        db.remove(METRICS_KEY).unwrap();
        assert_eq!(db.get(METRICS_KEY).unwrap(), None);
    }

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("nested").join("store.sqlite3")).unwrap();
        assert_eq!(db.get("absent").unwrap(), None);
        db.remove("absent").unwrap();
    }
}
