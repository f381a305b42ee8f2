use crate::models::LotItem;
use crate::row_factories::LotItemRowFactory;
use rusqlite::{Connection, Result, params};

pub struct LotItemsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LotItemsRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        LotItemsRepository { conn }
    }

    pub fn insert(&self, item: &LotItem) -> Result<()> {
        self.conn.execute(
            "INSERT INTO lot_items (id, lot_id, value_cents, planned_quantity)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                item.id,
                item.lot_id,
                item.value_cents,
                item.planned_quantity
            ],
        )?;
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<LotItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, lot_id, value_cents, planned_quantity FROM lot_items ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], LotItemRowFactory::from_row)?;
        rows.collect()
    }

    pub fn list_for_lot(&self, lot_id: &str) -> Result<Vec<LotItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, lot_id, value_cents, planned_quantity FROM lot_items
             WHERE lot_id = ?1
             ORDER BY rowid",
        )?;
        let rows = stmt.query_map([lot_id], LotItemRowFactory::from_row)?;
        rows.collect()
    }

    /// Returns how many items were removed
    pub fn delete_for_lot(&self, lot_id: &str) -> Result<usize> {
        self.conn
            .execute("DELETE FROM lot_items WHERE lot_id = ?1", [lot_id])
    }

    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM lot_items", [], |row| row.get(0))?;
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

    fn item(id: &str, lot_id: &str, value_cents: i64, planned_quantity: i64) -> LotItem {
        LotItem {
            id: id.to_string(),
            lot_id: lot_id.to_string(),
            value_cents,
            planned_quantity,
        }
    }

    #[test]
    fn test_list_for_lot_only_returns_its_items() {
        let conn = create_test_db();
        let repo = LotItemsRepository::new(&conn);
        repo.insert(&item("i1", "lot_a", 1000, 50)).unwrap();
        repo.insert(&item("i2", "lot_b", 1000, 5)).unwrap();
        repo.insert(&item("i3", "lot_a", 2000, 30)).unwrap();

        let items = repo.list_for_lot("lot_a").unwrap();
        assert_eq!(
            items,
            vec![item("i1", "lot_a", 1000, 50), item("i3", "lot_a", 2000, 30)]
        );
        assert_eq!(repo.list().unwrap().len(), 3);
    }

    #[test]
    fn test_delete_for_lot() {
        let conn = create_test_db();
        let repo = LotItemsRepository::new(&conn);
        repo.insert(&item("i1", "lot_a", 1000, 50)).unwrap();
        repo.insert(&item("i2", "lot_a", 2000, 30)).unwrap();
        repo.insert(&item("i3", "lot_b", 1000, 5)).unwrap();

        assert_eq!(repo.delete_for_lot("lot_a").unwrap(), 2);
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.delete_for_lot("lot_a").unwrap(), 0);
    }
}
