use crate::models::Bet;
use crate::row_factories::BetRowFactory;
use rusqlite::{Connection, Result, params};

pub struct BetsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> BetsRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        BetsRepository { conn }
    }

    pub fn insert(&self, bet: &Bet) -> Result<()> {
        self.conn.execute(
            "INSERT INTO bets (id, name) VALUES (?1, ?2)",
            params![bet.id, bet.name],
        )?;
        Ok(())
    }

    pub fn get(&self, bet_id: &str) -> Result<Option<Bet>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM bets WHERE id = ?1")?;

        let mut rows = stmt.query([bet_id])?;

        if let Some(row) = rows.next()? {
            Ok(Some(BetRowFactory::from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn list(&self) -> Result<Vec<Bet>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM bets ORDER BY rowid")?;
        let rows = stmt.query_map([], BetRowFactory::from_row)?;
        rows.collect()
    }

    pub fn update(&self, bet: &Bet) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE bets SET name = ?1 WHERE id = ?2",
            params![bet.name, bet.id],
        )?;
        Ok(changed > 0)
    }

    /// Registrations and lots pointing at this bet are left untouched
    pub fn delete(&self, bet_id: &str) -> Result<bool> {
        let changed = self.conn.execute("DELETE FROM bets WHERE id = ?1", [bet_id])?;
        Ok(changed > 0)
    }

    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM bets", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::init_connection;

    fn create_test_db() -> Connection {
        init_connection(":memory:").expect("Failed to create test database")
    }

    fn bet(id: &str, name: &str) -> Bet {
        Bet {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_insert_and_list_bets() {
        let conn = create_test_db();
        let repo = BetsRepository::new(&conn);
        repo.insert(&bet("b2", "SeguraBet")).unwrap();
        repo.insert(&bet("b1", "BetApp")).unwrap();

        let bets = repo.list().unwrap();
        assert_eq!(bets, vec![bet("b2", "SeguraBet"), bet("b1", "BetApp")]);
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_rename_bet() {
        let conn = create_test_db();
        let repo = BetsRepository::new(&conn);
        repo.insert(&bet("b1", "BetApp")).unwrap();

        assert!(repo.update(&bet("b1", "BetApp Plus")).unwrap());
        assert_eq!(repo.get("b1").unwrap().unwrap().name, "BetApp Plus");
    }

    #[test]
    fn test_delete_bet() {
        let conn = create_test_db();
        let repo = BetsRepository::new(&conn);
        repo.insert(&bet("b1", "BetApp")).unwrap();

        assert!(repo.delete("b1").unwrap());
        assert!(!repo.delete("b1").unwrap());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
