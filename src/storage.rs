use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

use crate::controller::state::Theme;

pub const THEME_KEY: &str = "theme";

/// Key/value preference table. Only the theme flag lives here.
pub struct PreferenceStore {
    conn: Connection,
}

impl PreferenceStore {
    pub fn new(path: &str) -> Result<Self> {
        Ok(Self { conn: Connection::open(path)? })
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self { conn: Connection::open_in_memory()? })
    }

    pub fn init(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "BEGIN;
            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            COMMIT;",
        )?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Last write wins.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO preferences (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Stored theme, or `fallback` when nothing (or garbage) is stored.
    pub fn load_theme(&self, fallback: Theme) -> Result<Theme> {
        Ok(self
            .get(THEME_KEY)?
            .and_then(|v| Theme::parse(&v))
            .unwrap_or(fallback))
    }

    pub fn save_theme(&mut self, theme: Theme) -> Result<()> {
        self.set(THEME_KEY, theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> PreferenceStore {
        let mut s = PreferenceStore::in_memory().unwrap();
        s.init().unwrap();
        s
    }

    #[test]
    fn missing_theme_uses_fallback() {
        let s = store();
        assert_eq!(s.load_theme(Theme::Dark).unwrap(), Theme::Dark);
        assert_eq!(s.load_theme(Theme::Light).unwrap(), Theme::Light);
    }

    #[test]
    fn last_write_wins() {
        let mut s = store();
        s.save_theme(Theme::Dark).unwrap();
        s.save_theme(Theme::Light).unwrap();
        assert_eq!(s.load_theme(Theme::Dark).unwrap(), Theme::Light);
        assert_eq!(s.get(THEME_KEY).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn garbage_value_falls_back() {
        let mut s = store();
        s.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(s.load_theme(Theme::Dark).unwrap(), Theme::Dark);
    }

    #[test]
    fn init_is_idempotent() {
        let mut s = store();
        s.save_theme(Theme::Dark).unwrap();
        s.init().unwrap();
        assert_eq!(s.load_theme(Theme::Light).unwrap(), Theme::Dark);
    }
}
