use crate::checks::StudentPatch;
use crate::config::DatabaseConfig;
use crate::error::AppError;
use crate::model::{Scores, Student};
use sqlx::any::{AnyPoolOptions, install_default_drivers};
use sqlx::{AnyConnection, AnyPool, FromRow};
use tracing::{debug, error, info, instrument};

/// Table definition for the database behind `url`. Roll numbers compare
/// byte for byte: MySQL's default collation would ignore case and
/// trailing spaces, SQLite's `BINARY` already does not.
fn schema(url: &str) -> String {
    let roll_no = if url.starts_with("mysql:") {
        "VARCHAR(64) CHARACTER SET utf8mb4 COLLATE utf8mb4_0900_bin"
    } else {
        "VARCHAR(64)"
    };
    format!(
        "CREATE TABLE IF NOT EXISTS students (
            roll_no {roll_no} NOT NULL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            java BIGINT NOT NULL DEFAULT 0,
            cpp BIGINT NOT NULL DEFAULT 0,
            python BIGINT NOT NULL DEFAULT 0,
            genai BIGINT NOT NULL DEFAULT 0,
            fsd BIGINT NOT NULL DEFAULT 0
        )"
    )
}

trait Step<T> {
    /// Log a failed database step under `what` and pass the error on.
    fn step(self, what: &str) -> Result<T, sqlx::Error>;
}

impl<T> Step<T> for Result<T, sqlx::Error> {
    fn step(self, what: &str) -> Result<T, sqlx::Error> {
        self.inspect_err(|e| error!(error = %e, "{what}"))
    }
}

const SELECT: &str = "SELECT roll_no, name, java, cpp, python, genai, fsd FROM students";

#[derive(FromRow)]
struct StudentRow {
    roll_no: String,
    name: String,
    java: i64,
    cpp: i64,
    python: i64,
    genai: i64,
    fsd: i64,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Student {
            name: row.name,
            roll_no: row.roll_no,
            scores: Scores {
                java: row.java,
                cpp: row.cpp,
                python: row.python,
                genai: row.genai,
                fsd: row.fsd,
            },
        }
    }
}

/// Student records kept in a SQL database (SQLite or MySQL).
#[derive(Clone)]
pub struct Store {
    pool: AnyPool,
}

impl Store {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        install_default_drivers();
        let mut options = AnyPoolOptions::new().max_connections(config.max_connections.max(1));
        // Every connection to an in-memory database sees its own database.
        if config.url.contains(":memory:") {
            options = options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = options
            .connect(&config.url)
            .await
            .step("cannot connect to database")?;
        let store = Self { pool };
        store.migrate(&config.url).await?;
        info!(url = %config.url, "connected to database");
        Ok(store)
    }

    async fn migrate(&self, url: &str) -> Result<(), sqlx::Error> {
        sqlx::query(&schema(url))
            .execute(&self.pool)
            .await
            .step("cannot create students table")?;
        Ok(())
    }

    #[instrument(skip_all, fields(roll_no = %student.roll_no))]
    pub async fn insert(&self, student: &Student) -> Result<(), AppError> {
        let mut trans = self.pool.begin().await.step("cannot start transaction")?;
        if find_in(&mut trans, &student.roll_no).await?.is_some() {
            return Err(AppError::DuplicateRollNo(student.roll_no.clone()));
        }
        sqlx::query(
            "INSERT INTO students (roll_no, name, java, cpp, python, genai, fsd)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(student.roll_no.as_str())
        .bind(student.name.as_str())
        .bind(student.scores.java)
        .bind(student.scores.cpp)
        .bind(student.scores.python)
        .bind(student.scores.genai)
        .bind(student.scores.fsd)
        .execute(&mut *trans)
        .await
        .map_err(|e| unique_violation(e, &student.roll_no, "cannot insert student"))?;
        trans
            .commit()
            .await
            .step("error when committing transaction")?;
        debug!("student inserted");
        Ok(())
    }

    pub async fn find(&self, roll_no: &str) -> Result<Option<Student>, sqlx::Error> {
        let mut conn = self.pool.acquire().await.step("cannot acquire connection")?;
        find_in(&mut conn, roll_no).await
    }

    pub async fn all(&self) -> Result<Vec<Student>, sqlx::Error> {
        Ok(
            sqlx::query_as::<_, StudentRow>(&format!("{SELECT} ORDER BY roll_no"))
                .fetch_all(&self.pool)
                .await
                .step("cannot load students")?
                .into_iter()
                .map(Student::from)
                .collect(),
        )
    }

    /// Apply `patch` to the student known as `roll_no`. Returns `None` when
    /// there is no such student.
    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        roll_no: &str,
        patch: StudentPatch,
    ) -> Result<Option<Student>, AppError> {
        let mut trans = self.pool.begin().await.step("cannot start transaction")?;
        let Some(current) = find_in(&mut trans, roll_no).await? else {
            return Ok(None);
        };
        let updated = patch.apply(current)?;
        if updated.roll_no != roll_no && find_in(&mut trans, &updated.roll_no).await?.is_some() {
            return Err(AppError::DuplicateRollNo(updated.roll_no));
        }
        sqlx::query(
            "UPDATE students SET roll_no=?, name=?, java=?, cpp=?, python=?, genai=?, fsd=?
             WHERE roll_no=?",
        )
        .bind(updated.roll_no.as_str())
        .bind(updated.name.as_str())
        .bind(updated.scores.java)
        .bind(updated.scores.cpp)
        .bind(updated.scores.python)
        .bind(updated.scores.genai)
        .bind(updated.scores.fsd)
        .bind(roll_no)
        .execute(&mut *trans)
        .await
        .map_err(|e| unique_violation(e, &updated.roll_no, "cannot update student"))?;
        trans
            .commit()
            .await
            .step("error when committing transaction")?;
        debug!("student updated");
        Ok(Some(updated))
    }

    /// Remove the student known as `roll_no` and return what was removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, roll_no: &str) -> Result<Option<Student>, sqlx::Error> {
        let mut trans = self.pool.begin().await.step("cannot start transaction")?;
        let Some(student) = find_in(&mut trans, roll_no).await? else {
            return Ok(None);
        };
        sqlx::query("DELETE FROM students WHERE roll_no=?")
            .bind(roll_no)
            .execute(&mut *trans)
            .await
            .step("cannot delete student")?;
        trans
            .commit()
            .await
            .step("error when committing transaction")?;
        debug!("student deleted");
        Ok(Some(student))
    }
}

async fn find_in(conn: &mut AnyConnection, roll_no: &str) -> Result<Option<Student>, sqlx::Error> {
    Ok(
        sqlx::query_as::<_, StudentRow>(&format!("{SELECT} WHERE roll_no=?"))
            .bind(roll_no)
            .fetch_optional(conn)
            .await
            .step("cannot look up student")?
            .map(Student::from),
    )
}

fn unique_violation(e: sqlx::Error, roll_no: &str, what: &str) -> AppError {
    match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            AppError::DuplicateRollNo(roll_no.to_owned())
        }
        e => {
            error!(error = %e, "{what}");
            AppError::Database(e)
        }
    }
}
