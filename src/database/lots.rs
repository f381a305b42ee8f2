use crate::models::Lot;
use crate::row_factories::LotRowFactory;
use rusqlite::{Connection, Result, params};

const LOT_COLUMNS: &str = "id, bet_id, created_at, observation";

pub struct LotsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LotsRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        LotsRepository { conn }
    }

    pub fn insert(&self, lot: &Lot) -> Result<()> {
        self.conn.execute(
            "INSERT INTO lots (id, bet_id, created_at, observation) VALUES (?1, ?2, ?3, ?4)",
            params![
                lot.id,
                lot.bet_id,
                lot.created_at.to_rfc3339(),
                lot.observation
            ],
        )?;
        Ok(())
    }

    pub fn get(&self, lot_id: &str) -> Result<Option<Lot>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM lots WHERE id = ?1", LOT_COLUMNS))?;

        let mut rows = stmt.query([lot_id])?;

        if let Some(row) = rows.next()? {
            Ok(Some(LotRowFactory::from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn list(&self) -> Result<Vec<Lot>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM lots ORDER BY rowid", LOT_COLUMNS))?;
        let rows = stmt.query_map([], LotRowFactory::from_row)?;
        rows.collect()
    }

    /// Changes bet and observation; creation time is kept
    pub fn update(&self, lot: &Lot) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE lots SET bet_id = ?1, observation = ?2 WHERE id = ?3",
            params![lot.bet_id, lot.observation, lot.id],
        )?;
        Ok(changed > 0)
    }

    pub fn delete(&self, lot_id: &str) -> Result<bool> {
        let changed = self.conn.execute("DELETE FROM lots WHERE id = ?1", [lot_id])?;
        Ok(changed > 0)
    }

    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM lots", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::init_connection;
    use chrono::{DateTime, FixedOffset};

    fn create_test_db() -> Connection {
        init_connection(":memory:").expect("Failed to create test database")
    }

    fn lot(id: &str, created_at: &str) -> Lot {
        Lot {
            id: id.to_string(),
            bet_id: "bet_1".to_string(),
            created_at: DateTime::<FixedOffset>::parse_from_rfc3339(created_at).unwrap(),
            observation: Some("Semana atual".to_string()),
        }
    }

    #[test]
    fn test_insert_and_get_lot_keeps_offset() {
        let conn = create_test_db();
        let repo = LotsRepository::new(&conn);
        let original = lot("lot_1", "2025-03-10T21:30:00-03:00");
        repo.insert(&original).unwrap();

        let stored = repo.get("lot_1").unwrap().unwrap();
        assert_eq!(stored, original);
        assert_eq!(stored.created_at.offset().local_minus_utc(), -3 * 3600);
    }

    #[test]
    fn test_update_keeps_created_at() {
        let conn = create_test_db();
        let repo = LotsRepository::new(&conn);
        repo.insert(&lot("lot_1", "2025-03-10T10:00:00+00:00")).unwrap();

        let mut edited = lot("lot_1", "2030-01-01T00:00:00+00:00");
        edited.bet_id = "bet_2".to_string();
        edited.observation = None;
        assert!(repo.update(&edited).unwrap());

        let stored = repo.get("lot_1").unwrap().unwrap();
        assert_eq!(stored.bet_id, "bet_2");
        assert_eq!(stored.observation, None);
        assert_eq!(stored.created_at.to_rfc3339(), "2025-03-10T10:00:00+00:00");
    }

    #[test]
    fn test_delete_lot() {
        let conn = create_test_db();
        let repo = LotsRepository::new(&conn);
        repo.insert(&lot("lot_1", "2025-03-10T10:00:00+00:00")).unwrap();

        assert!(repo.delete("lot_1").unwrap());
        assert_eq!(repo.list().unwrap().len(), 0);
    }
}
