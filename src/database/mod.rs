use std::sync::Arc;

use libsql::{named_params, params::IntoParams, Builder, Database as LibsqlDatabase, Value};
use time::{macros::format_description, OffsetDateTime, PrimitiveDateTime};
use uuid::Uuid;

use crate::configuration::DatabaseLocation;
use crate::questionnaire::{InvitationSummary, QuestionnaireRecord};

#[derive(thiserror::Error, Debug)]
#[error("Error creating database: {0}")]
pub(crate) struct CreateError(#[from] libsql::Error);

#[derive(thiserror::Error, Debug)]
pub(crate) enum InitializationError {
    #[error("Error creating databse: {0}")]
    CreateError(#[from] CreateError),
    #[error("Error executing create tables batch query: {0}")]
    CreateTablesError(#[from] StatementError),
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum StatementError {
    #[error("Error connecting to database: {0}")]
    ConnectionError(libsql::Error),
    #[error("Error preparing statement: {0}")]
    PrepareError(libsql::Error),
    #[error("Error exectuing statement: {0}")]
    ExecuteError(libsql::Error),
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum RowError {
    #[error("Error reading value from row: {0}")]
    ReadError(#[from] libsql::Error),
    #[error("Expected text or null in column {0}")]
    UnexpectedColumnType(i32),
    #[error("Error parsing creation timestamp: {0}")]
    TimestampError(#[from] time::error::Parse),
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum SingleRowQueryError {
    #[error("Error running statement: {0}")]
    StatementError(#[from] StatementError),
    #[error("Error getting row: {0}")]
    NextRowError(libsql::Error),
    #[error(transparent)]
    RowError(#[from] RowError),
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum MultiRowQueryError {
    #[error("Error running statement: {0}")]
    StatementError(#[from] StatementError),
    #[error("Error getting next row: {0}")]
    NextRowError(libsql::Error),
    #[error(transparent)]
    RowError(#[from] RowError),
}

/// A wrapper around the libsql database to hide the database and provide access to predefined queries.
/// Every query acquires its own connection which is dropped when the query is done.
pub(crate) struct Database(LibsqlDatabase);

impl Database {
    async fn create(location: &DatabaseLocation) -> Result<Database, CreateError> {
        let database = match location {
            DatabaseLocation::Local(path) => Builder::new_local(path).build().await?,
            DatabaseLocation::Remote { url, auth_token } => {
                Builder::new_remote(url.clone(), auth_token.clone())
                    .build()
                    .await?
            }
        };

        Ok(Self(database))
    }

    /// Opens (or creates) the database and makes sure the tables exist
    pub(crate) async fn initialize(
        location: &DatabaseLocation,
    ) -> Result<Database, InitializationError> {
        let database = Self::create(location).await?;
        database.ensure_schema().await?;

        tracing::debug!("Tables created");

        Ok(database)
    }

    /// Safe to call any number of times, existing rows are left alone
    pub(crate) async fn ensure_schema(&self) -> Result<(), StatementError> {
        let connection = self.connect()?;

        let query = include_str!("./create_tables.sql");
        connection
            .execute_batch(query)
            .await
            .map_err(StatementError::ExecuteError)?;

        Ok(())
    }

    fn connect(&self) -> Result<libsql::Connection, StatementError> {
        self.0.connect().map_err(StatementError::ConnectionError)
    }

    async fn insert(
        &self,
        sql: &'static str,
        parameters: impl IntoParams,
    ) -> Result<(), StatementError> {
        let connection = self.connect()?;

        let mut statement = connection
            .prepare(sql)
            .await
            .map_err(StatementError::PrepareError)?;

        statement
            .execute(parameters)
            .await
            .map_err(StatementError::ExecuteError)?;

        Ok(())
    }

    async fn query(
        &self,
        sql: &'static str,
        parameters: impl IntoParams,
    ) -> Result<libsql::Rows, StatementError> {
        let connection = self.connect()?;
        let mut statement = connection
            .prepare(sql)
            .await
            .map_err(StatementError::PrepareError)?;

        statement
            .query(parameters)
            .await
            .map_err(StatementError::ExecuteError)
    }

    /// Issues a new invitation and returns its token
    pub(crate) async fn create_invitation(&self) -> Result<Arc<str>, StatementError> {
        // Collisions of v4 UUIDs are not handled, the unique constraint would reject the insert
        let token = Uuid::new_v4().to_string();

        self.insert(
            "INSERT INTO questionnaires (id, token) VALUES (:id, :token)",
            named_params! {
                ":id": token.as_str(),
                ":token": token.as_str(),
            },
        )
        .await?;

        tracing::debug!(%token, "Created invitation");

        Ok(Arc::from(token))
    }

    pub(crate) async fn get_by_token(
        &self,
        token: &str,
    ) -> Result<Option<QuestionnaireRecord>, SingleRowQueryError> {
        let mut rows = self
            .query(
                "SELECT id, token, first_name, last_name, created_at \
                FROM questionnaires \
                WHERE token = :token",
                named_params![":token": token],
            )
            .await?;

        let Some(row) = rows
            .next()
            .await
            .map_err(SingleRowQueryError::NextRowError)?
        else {
            return Ok(None);
        };

        Ok(Some(QuestionnaireRecord {
            id: row.get_str(0).map(Arc::from).map_err(RowError::from)?,
            token: row.get_str(1).map(Arc::from).map_err(RowError::from)?,
            first_name: optional_text(&row, 2)?,
            last_name: optional_text(&row, 3)?,
            created_at: parse_timestamp(row.get_str(4).map_err(RowError::from)?)?,
        }))
    }

    /// Up to `limit` invitations, newest first
    pub(crate) async fn list_recent(
        &self,
        limit: u32,
    ) -> Result<Vec<InvitationSummary>, MultiRowQueryError> {
        // CURRENT_TIMESTAMP only has second precision so the rowid decides between
        // invitations created in the same second
        let mut rows = self
            .query(
                "SELECT token, first_name, last_name, created_at \
                FROM questionnaires \
                ORDER BY created_at DESC, rowid DESC \
                LIMIT :limit",
                named_params![":limit": i64::from(limit)],
            )
            .await?;

        let mut invitations = Vec::new();

        while let Some(row) = rows
            .next()
            .await
            .map_err(MultiRowQueryError::NextRowError)?
        {
            invitations.push(InvitationSummary {
                token: row.get_str(0).map(Arc::from).map_err(RowError::from)?,
                first_name: optional_text(&row, 1)?,
                last_name: optional_text(&row, 2)?,
                created_at: parse_timestamp(row.get_str(3).map_err(RowError::from)?)?,
            });
        }

        Ok(invitations)
    }
}

fn optional_text(row: &libsql::Row, index: i32) -> Result<Option<Arc<str>>, RowError> {
    match row.get_value(index)? {
        Value::Null => Ok(None),
        Value::Text(text) => Ok(Some(Arc::from(text))),
        _ => Err(RowError::UnexpectedColumnType(index)),
    }
}

/// SQLite stores CURRENT_TIMESTAMP as UTC text without an offset
fn parse_timestamp(value: &str) -> Result<OffsetDateTime, RowError> {
    let timestamp = PrimitiveDateTime::parse(
        value,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )?;

    Ok(timestamp.assume_utc())
}
