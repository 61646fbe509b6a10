use crate::Database;
use crate::models::PushTokenRow;
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    /// Register a device address for a user. Returns false if it was already known.
    pub fn upsert_push_token(&self, user_id: &str, fcm_token: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO user_push_tokens (user_id, fcm_token) VALUES (?1, ?2)",
                (user_id, fcm_token),
            )?;
            Ok(inserted > 0)
        })
    }

    /// Device addresses for a user, oldest registration first.
    pub fn get_push_tokens(&self, user_id: &str) -> Result<Vec<PushTokenRow>> {
        self.with_conn(|conn| query_push_tokens(conn, user_id))
    }
}

fn query_push_tokens(conn: &Connection, user_id: &str) -> Result<Vec<PushTokenRow>> {
    let mut stmt = conn.prepare(
        "SELECT fcm_token FROM user_push_tokens WHERE user_id = ?1 ORDER BY rowid ASC",
    )?;

    let rows = stmt
        .query_map([user_id], |row| {
            Ok(PushTokenRow {
                fcm_token: row.get(0)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("tokens.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn tokens_come_back_in_registration_order() {
        let (_dir, db) = open_temp();
        assert!(db.upsert_push_token("user-1", "tok-b").unwrap());
        assert!(db.upsert_push_token("user-1", "tok-a").unwrap());
        assert!(db.upsert_push_token("user-2", "tok-c").unwrap());

        let rows = db.get_push_tokens("user-1").unwrap();
        let tokens: Vec<_> = rows.into_iter().filter_map(|r| r.fcm_token).collect();
        assert_eq!(tokens, vec!["tok-b", "tok-a"]);
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let (_dir, db) = open_temp();
        assert!(db.upsert_push_token("user-1", "tok-a").unwrap());
        assert!(!db.upsert_push_token("user-1", "tok-a").unwrap());
        assert_eq!(db.get_push_tokens("user-1").unwrap().len(), 1);
    }

    #[test]
    fn unknown_user_has_no_tokens() {
        let (_dir, db) = open_temp();
        assert!(db.get_push_tokens("nobody").unwrap().is_empty());
    }
}
