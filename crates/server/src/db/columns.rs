//! Explicit mapping between `users` table columns and [`User`] fields.
//!
//! Every persisted field appears exactly once in [`USER_COLUMNS`]. The SQL
//! used by [`PgUserStore`](super::PgUserStore) is generated from this table,
//! and [`validate_schema`] compares it with `information_schema` at startup so
//! a drifted table fails fast instead of failing on the first request.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::LazyLock;

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use user_directory_core::{User, UserDetails, UserId};

use super::RepositoryError;

/// Name of the table holding users.
pub const USERS_TABLE: &str = "users";

/// Primary key column.
pub const ID_COLUMN: &str = "id";

/// SQL type of [`ID_COLUMN`].
const ID_PG_TYPE: &str = "bigint";

/// SQL type of a mapped column, as reported by `information_schema`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Double,
    Text,
}

impl ColumnKind {
    /// The `data_type` string `PostgreSQL` reports for this kind.
    #[must_use]
    pub const fn pg_type(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Double => "double precision",
            Self::Text => "text",
        }
    }
}

/// A single field value moving between a row and a [`UserDetails`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(Option<i32>),
    Double(Option<f64>),
    Text(Option<String>),
}

/// One mapped column.
pub struct Column {
    /// Column name in the `users` table.
    pub name: &'static str,
    /// Expected SQL type.
    pub kind: ColumnKind,
    read: fn(&UserDetails) -> FieldValue,
    write: fn(&mut UserDetails, FieldValue),
}

impl Column {
    /// Extract this column's value from a user.
    #[must_use]
    pub fn read(&self, details: &UserDetails) -> FieldValue {
        (self.read)(details)
    }

    /// Store a value into the mapped field.
    pub fn write(&self, details: &mut UserDetails, value: FieldValue) {
        (self.write)(details, value);
    }

    fn decode(&self, row: &PgRow) -> Result<FieldValue, sqlx::Error> {
        Ok(match self.kind {
            ColumnKind::Integer => FieldValue::Integer(row.try_get(self.name)?),
            ColumnKind::Double => FieldValue::Double(row.try_get(self.name)?),
            ColumnKind::Text => FieldValue::Text(row.try_get(self.name)?),
        })
    }
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

macro_rules! column {
    ($name:literal, Text, $($field:ident).+) => {
        Column {
            name: $name,
            kind: ColumnKind::Text,
            read: |d| FieldValue::Text(d.$($field).+.clone()),
            write: |d, v| {
                if let FieldValue::Text(v) = v {
                    d.$($field).+ = v;
                }
            },
        }
    };
    ($name:literal, Integer, $($field:ident).+) => {
        Column {
            name: $name,
            kind: ColumnKind::Integer,
            read: |d| FieldValue::Integer(d.$($field).+),
            write: |d, v| {
                if let FieldValue::Integer(v) = v {
                    d.$($field).+ = v;
                }
            },
        }
    };
    ($name:literal, Double, $($field:ident).+) => {
        Column {
            name: $name,
            kind: ColumnKind::Double,
            read: |d| FieldValue::Double(d.$($field).+),
            write: |d, v| {
                if let FieldValue::Double(v) = v {
                    d.$($field).+ = v;
                }
            },
        }
    };
}

/// Every non-key column, in table order.
pub static USER_COLUMNS: &[Column] = &[
    column!("first_name", Text, first_name),
    column!("last_name", Text, last_name),
    column!("maiden_name", Text, maiden_name),
    column!("age", Integer, age),
    column!("gender", Text, gender),
    column!("email", Text, email),
    column!("phone", Text, phone),
    column!("username", Text, username),
    column!("password", Text, password),
    column!("birth_date", Text, birth_date),
    column!("image", Text, image),
    column!("blood_group", Text, blood_group),
    column!("height", Double, height),
    column!("weight", Double, weight),
    column!("eye_color", Text, eye_color),
    column!("hair_color", Text, hair.color),
    column!("hair_type", Text, hair.kind),
    column!("address_street", Text, address.street),
    column!("address_city", Text, address.city),
    column!("address_state", Text, address.state),
    column!("address_state_code", Text, address.state_code),
    column!("address_postal_code", Text, address.postal_code),
    column!("address_lat", Double, address.coordinates.lat),
    column!("address_lng", Double, address.coordinates.lng),
    column!("address_country", Text, address.country),
    column!("bank_card_expire", Text, bank.card_expire),
    column!("bank_card_number", Text, bank.card_number),
    column!("bank_card_type", Text, bank.card_type),
    column!("bank_currency", Text, bank.currency),
    column!("bank_iban", Text, bank.iban),
    column!("company_department", Text, company.department),
    column!("company_name", Text, company.name),
    column!("company_title", Text, company.title),
    column!("ein", Text, ein),
    column!("ssn", Text, ssn),
    column!("user_agent", Text, user_agent),
    column!("role", Text, role),
];

/// Columns matched by substring search.
pub const SEARCH_COLUMNS: [&str; 3] = ["first_name", "last_name", "ssn"];

/// `id, first_name, ..., role`
fn column_list() -> String {
    std::iter::once(ID_COLUMN)
        .chain(USER_COLUMNS.iter().map(|c| c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `SELECT <all columns> FROM users`
pub static SELECT_USERS: LazyLock<String> =
    LazyLock::new(|| format!("SELECT {} FROM {USERS_TABLE}", column_list()));

/// Upsert on primary key; binds `id` as `$1` then [`USER_COLUMNS`] in order.
pub static UPSERT_USER: LazyLock<String> = LazyLock::new(|| {
    let placeholders = (1..=USER_COLUMNS.len() + 1)
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let assignments = USER_COLUMNS
        .iter()
        .map(|c| format!("{0} = EXCLUDED.{0}", c.name))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {USERS_TABLE} ({}) VALUES ({placeholders}) \
         ON CONFLICT ({ID_COLUMN}) DO UPDATE SET {assignments} \
         RETURNING {}",
        column_list(),
        column_list()
    )
});

/// Three-way OR substring match; binds the query as `$1`.
pub static SEARCH_USERS: LazyLock<String> = LazyLock::new(|| {
    let mut sql = format!("{} WHERE ", *SELECT_USERS);
    for (i, column) in SEARCH_COLUMNS.iter().enumerate() {
        if i > 0 {
            sql.push_str(" OR ");
        }
        // strpos keeps `%` and `_` in the query literal
        let _ = write!(sql, "strpos(coalesce({column}, ''), $1) > 0");
    }
    let _ = write!(sql, " ORDER BY {ID_COLUMN}");
    sql
});

/// Bind `user` to [`UPSERT_USER`].
pub fn bind_user<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    user: &User,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    USER_COLUMNS
        .iter()
        .fold(query.bind(user.id), |query, column| {
            match column.read(&user.details) {
                FieldValue::Integer(v) => query.bind(v),
                FieldValue::Double(v) => query.bind(v),
                FieldValue::Text(v) => query.bind(v),
            }
        })
}

/// Decode a full row selected with [`SELECT_USERS`] or returned by [`UPSERT_USER`].
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if a column has an unexpected type.
pub fn user_from_row(row: &PgRow) -> Result<User, RepositoryError> {
    let id: UserId = row
        .try_get(ID_COLUMN)
        .map_err(|e| RepositoryError::DataCorruption(format!("column {ID_COLUMN}: {e}")))?;

    let mut details = UserDetails::default();
    for column in USER_COLUMNS {
        let value = column
            .decode(row)
            .map_err(|e| RepositoryError::DataCorruption(format!("column {}: {e}", column.name)))?;
        column.write(&mut details, value);
    }

    Ok(User::new(id, details))
}

/// Compare the declared mapping with the live `users` table.
///
/// # Errors
///
/// Returns `RepositoryError::Schema` listing every missing or mistyped column,
/// or `RepositoryError::Database` if `information_schema` cannot be read.
pub async fn validate_schema(pool: &PgPool) -> Result<(), RepositoryError> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        r"
        SELECT column_name::text, data_type::text
        FROM information_schema.columns
        WHERE table_schema = current_schema() AND table_name = $1
        ",
    )
    .bind(USERS_TABLE)
    .fetch_all(pool)
    .await?;

    check_columns(&rows.into_iter().collect())
}

/// Check a `column_name -> data_type` map against the declared mapping.
///
/// Extra columns in the table are allowed.
///
/// # Errors
///
/// Returns `RepositoryError::Schema` describing every mismatch.
pub fn check_columns(actual: &HashMap<String, String>) -> Result<(), RepositoryError> {
    if actual.is_empty() {
        return Err(RepositoryError::Schema(format!(
            "table '{USERS_TABLE}' does not exist"
        )));
    }

    let expected = std::iter::once((ID_COLUMN, ID_PG_TYPE))
        .chain(USER_COLUMNS.iter().map(|c| (c.name, c.kind.pg_type())));

    let problems: Vec<String> = expected
        .filter_map(|(name, pg_type)| match actual.get(name) {
            None => Some(format!("missing column '{name}'")),
            Some(found) if found != pg_type => {
                Some(format!("column '{name}' is {found}, expected {pg_type}"))
            }
            Some(_) => None,
        })
        .collect();

    if problems.is_empty() {
        Ok(())
    } else {
        Err(RepositoryError::Schema(problems.join("; ")))
    }
}
