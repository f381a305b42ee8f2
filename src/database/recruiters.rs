use crate::models::Recruiter;
use crate::row_factories::RecruiterRowFactory;
use rusqlite::{Connection, Result, params};

pub struct RecruitersRepository<'a> {
    conn: &'a Connection,
}

impl<'a> RecruitersRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        RecruitersRepository { conn }
    }

    pub fn insert(&self, recruiter: &Recruiter) -> Result<()> {
        self.conn.execute(
            "INSERT INTO recruiters (id, name, active) VALUES (?1, ?2, ?3)",
            params![recruiter.id, recruiter.name, recruiter.active as i32],
        )?;
        Ok(())
    }

    pub fn get(&self, recruiter_id: &str) -> Result<Option<Recruiter>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, active FROM recruiters WHERE id = ?1")?;

        let mut rows = stmt.query([recruiter_id])?;

        if let Some(row) = rows.next()? {
            Ok(Some(RecruiterRowFactory::from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// All recruiters, active or not, in insertion order
    pub fn list(&self) -> Result<Vec<Recruiter>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, active FROM recruiters ORDER BY rowid")?;
        let rows = stmt.query_map([], RecruiterRowFactory::from_row)?;
        rows.collect()
    }

    /// Returns false when no recruiter has this id
    pub fn update(&self, recruiter: &Recruiter) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE recruiters SET name = ?1, active = ?2 WHERE id = ?3",
            params![recruiter.name, recruiter.active as i32, recruiter.id],
        )?;
        Ok(changed > 0)
    }

    pub fn delete(&self, recruiter_id: &str) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM recruiters WHERE id = ?1", [recruiter_id])?;
        Ok(changed > 0)
    }

    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM recruiters", [], |row| row.get(0))?;
        Ok(count)
    }
}
