//! # Employee Repository
//!
//! Employee lookup and the plaintext-comparison login carried over from
//! the legacy system. There is no session or token issuance; a
//! successful login simply returns the employee row.

use sqlx::SqlitePool;
use tracing::{info, warn};

use lylas_core::Employee;

use crate::error::{DbError, DbResult};

/// Repository for employee operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Verifies a username/password pair.
    ///
    /// Returns the employee on success; `NotFound` when the username
    /// does not exist or the password does not match. The two failure
    /// modes are deliberately indistinguishable to the caller.
    pub async fn verify_login(&self, username: &str, password: &str) -> DbResult<Employee> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT id, username, full_name, password
             FROM employees WHERE username = ? AND password = ?",
        )
        .bind(username)
        .bind(password)
        .fetch_optional(&self.pool)
        .await?;

        match employee {
            Some(employee) => {
                info!(employee_id = employee.id, "Login succeeded");
                Ok(employee)
            }
            None => {
                warn!(username, "Login failed");
                Err(DbError::not_found("Employee", username))
            }
        }
    }

    /// Lists all employees.
    pub async fn list(&self) -> DbResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            "SELECT id, username, full_name, password FROM employees ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    /// Fetches an employee by ID.
    pub async fn get(&self, id: i64) -> DbResult<Employee> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT id, username, full_name, password FROM employees WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Employee", id))?;

        Ok(employee)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query(
            "INSERT INTO employees (username, full_name, password)
             VALUES ('maria', 'Maria Cruz', 'secret')",
        )
        .execute(db.pool())
        .await
        .unwrap();
        db
    }

    #[tokio::test]
    async fn test_login_success() {
        let db = test_db().await;
        let employee = db
            .employees()
            .verify_login("maria", "secret")
            .await
            .unwrap();
        assert_eq!(employee.full_name, "Maria Cruz");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let db = test_db().await;
        let err = db
            .employees()
            .verify_login("maria", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let db = test_db().await;
        let err = db
            .employees()
            .verify_login("nobody", "secret")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_employees() {
        let db = test_db().await;
        sqlx::query(
            "INSERT INTO employees (username, full_name, password)
             VALUES ('ana', 'Ana Lim', 'pw')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let employees = db.employees().list().await.unwrap();
        assert_eq!(employees.len(), 2);
        // Ordered by username.
        assert_eq!(employees[0].username, "ana");
        assert_eq!(employees[1].username, "maria");
    }

    #[tokio::test]
    async fn test_get_employee() {
        let db = test_db().await;
        let employee = db.employees().get(1).await.unwrap();
        assert_eq!(employee.username, "maria");
    }
}
