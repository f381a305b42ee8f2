use crate::models::Registration;
use crate::row_factories::RegistrationRowFactory;
use log::debug;
use rusqlite::{Connection, Result, params};

const REGISTRATION_COLUMNS: &str =
    "id, timestamp, recruiter_id, bet_id, value_cents, refund_status, observation, lot_id";

pub struct RegistrationsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> RegistrationsRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        RegistrationsRepository { conn }
    }

    pub fn insert(&self, registration: &Registration) -> Result<()> {
        self.conn.execute(
            "INSERT INTO registrations
                (id, timestamp, recruiter_id, bet_id, value_cents, refund_status, observation, lot_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                registration.id,
                registration.timestamp.to_rfc3339(),
                registration.recruiter_id,
                registration.bet_id,
                registration.value_cents,
                registration.refund.as_str(),
                registration.observation,
                registration.lot_id
            ],
        )?;
        debug!("Inserted registration {}", registration.id);
        Ok(())
    }

    pub fn get(&self, registration_id: &str) -> Result<Option<Registration>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM registrations WHERE id = ?1",
            REGISTRATION_COLUMNS
        ))?;

        let mut rows = stmt.query([registration_id])?;

        if let Some(row) = rows.next()? {
            Ok(Some(RegistrationRowFactory::from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn list(&self) -> Result<Vec<Registration>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM registrations ORDER BY rowid",
            REGISTRATION_COLUMNS
        ))?;
        let rows = stmt.query_map([], RegistrationRowFactory::from_row)?;
        rows.collect()
    }

    /// Rewrites every field except `timestamp`, which is fixed at creation
    pub fn update(&self, registration: &Registration) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE registrations SET
                recruiter_id = ?1,
                bet_id = ?2,
                value_cents = ?3,
                refund_status = ?4,
                observation = ?5,
                lot_id = ?6
             WHERE id = ?7",
            params![
                registration.recruiter_id,
                registration.bet_id,
                registration.value_cents,
                registration.refund.as_str(),
                registration.observation,
                registration.lot_id,
                registration.id
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn delete(&self, registration_id: &str) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM registrations WHERE id = ?1", [registration_id])?;
        Ok(changed > 0)
    }

    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM registrations", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::init_connection;
    use crate::models::RefundStatus;
    use chrono::DateTime;

    fn create_test_db() -> Connection {
        init_connection(":memory:").expect("Failed to create test database")
    }

    fn registration(id: &str, timestamp: &str) -> Registration {
        Registration {
            id: id.to_string(),
            timestamp: DateTime::parse_from_rfc3339(timestamp).unwrap(),
            recruiter_id: "rec_1".to_string(),
            bet_id: "bet_1".to_string(),
            value_cents: 1000,
            refund: RefundStatus::NotRefunded,
            observation: None,
            lot_id: None,
        }
    }

    #[test]
    fn test_insert_and_get_registration() {
        let conn = create_test_db();
        let repo = RegistrationsRepository::new(&conn);
        let mut original = registration("reg_1", "2025-01-15T12:00:00+00:00");
        original.refund = RefundStatus::Refunded;
        original.observation = Some("Cliente novo".to_string());
        original.lot_id = Some("lot_1".to_string());
        repo.insert(&original).unwrap();

        assert_eq!(repo.get("reg_1").unwrap(), Some(original));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_update_never_touches_timestamp() {
        let conn = create_test_db();
        let repo = RegistrationsRepository::new(&conn);
        repo.insert(&registration("reg_1", "2025-01-15T12:00:00+00:00"))
            .unwrap();

        let mut edited = registration("reg_1", "1999-12-31T23:59:59+00:00");
        edited.value_cents = 4000;
        edited.refund = RefundStatus::Refunded;
        assert!(repo.update(&edited).unwrap());

        let stored = repo.get("reg_1").unwrap().unwrap();
        assert_eq!(stored.value_cents, 4000);
        assert!(stored.is_refunded());
        assert_eq!(stored.timestamp.to_rfc3339(), "2025-01-15T12:00:00+00:00");
    }

    #[test]
    fn test_delete_registration() {
        let conn = create_test_db();
        let repo = RegistrationsRepository::new(&conn);
        repo.insert(&registration("reg_1", "2025-01-15T12:00:00+00:00"))
            .unwrap();
        repo.insert(&registration("reg_2", "2025-01-16T12:00:00+00:00"))
            .unwrap();

        assert!(repo.delete("reg_1").unwrap());
        let remaining: Vec<String> = repo.list().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(remaining, vec!["reg_2"]);
    }

    #[test]
    fn test_unknown_refund_status_is_a_read_error() {
        let conn = create_test_db();
        let repo = RegistrationsRepository::new(&conn);
        let mut refunded = registration("reg_1", "2025-01-15T12:00:00+00:00");
        refunded.refund = RefundStatus::Refunded;
        repo.insert(&refunded).unwrap();
        conn.execute(
            "UPDATE registrations SET refund_status = 'Sim' WHERE id = 'reg_1'",
            [],
        )
        .unwrap();

        assert!(matches!(
            repo.list(),
            Err(rusqlite::Error::FromSqlConversionFailure(5, _, _))
        ));
        assert!(repo.get("reg_1").is_err());
    }
}
