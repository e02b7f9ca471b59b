//! SQLite configuration, schema definition and connection bootstrap.
//!
//! The schema types describe tables declaratively; [`Schema::to_sql`] renders
//! idempotent DDL (`CREATE ... IF NOT EXISTS`) so opening an existing
//! database file is safe.

use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

/// Name of the table holding runs.
pub const RUN_TABLE: &str = "run";

/// Schema definition for the SQLite database
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    pub tables: Vec<TableDefinition>,
}

impl Schema {
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    pub fn add_table(mut self, table: TableDefinition) -> Self {
        self.tables.push(table);
        self
    }

    /// The schema the run store needs: one `run` table keyed by `id`, with an
    /// index on `location`.
    pub fn runs() -> Self {
        Self::new().add_table(
            TableDefinition::new(RUN_TABLE)
                .column(
                    ColumnDefinition::new("id", DataType::Integer)
                        .constraint(ColumnConstraint::PrimaryKey),
                )
                .column(
                    ColumnDefinition::new("title", DataType::Text)
                        .constraint(ColumnConstraint::NotNull),
                )
                .column(
                    ColumnDefinition::new("started_on", DataType::Text)
                        .constraint(ColumnConstraint::NotNull),
                )
                .column(ColumnDefinition::new("completed_on", DataType::Text))
                .column(
                    ColumnDefinition::new("miles", DataType::Real)
                        .constraint(ColumnConstraint::NotNull),
                )
                .column(
                    ColumnDefinition::new("location", DataType::Text)
                        .constraint(ColumnConstraint::NotNull)
                        .constraint(ColumnConstraint::Check(
                            "location IN ('INDOOR', 'OUTDOOR')".to_string(),
                        )),
                )
                .column(ColumnDefinition::new("version", DataType::Integer))
                .index(IndexDefinition {
                    name: "idx_run_location".to_string(),
                    columns: vec!["location".to_string()],
                    unique: false,
                }),
        )
    }

    /// Renders the DDL for every table and index as one batch.
    pub fn to_sql(&self) -> String {
        let mut statements = Vec::new();
        for table in &self.tables {
            statements.push(table.create_table_sql());
            statements.extend(table.create_index_sql());
        }
        statements.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
    pub indexes: Vec<IndexDefinition>,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    pub fn index(mut self, index: IndexDefinition) -> Self {
        self.indexes.push(index);
        self
    }

    fn create_table_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(ColumnDefinition::to_sql)
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE IF NOT EXISTS {} ({});", self.name, columns)
    }

    fn create_index_sql(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|index| {
                format!(
                    "CREATE {}INDEX IF NOT EXISTS {} ON {}({});",
                    if index.unique { "UNIQUE " } else { "" },
                    index.name,
                    self.name,
                    index.columns.join(", ")
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            constraints: Vec::new(),
        }
    }

    pub fn constraint(mut self, constraint: ColumnConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.data_type.as_sql());
        for constraint in &self.constraints {
            sql.push(' ');
            sql.push_str(&constraint.to_sql());
        }
        sql
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Integer,
    Text,
    Real,
}

impl DataType {
    fn as_sql(&self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
            Self::Real => "REAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnConstraint {
    /// `INTEGER PRIMARY KEY` makes the column an alias of the rowid, so SQLite
    /// assigns a value when none is supplied.
    PrimaryKey,
    NotNull,
    Unique,
    Check(String),
}

impl ColumnConstraint {
    fn to_sql(&self) -> String {
        match self {
            Self::PrimaryKey => "PRIMARY KEY".to_string(),
            Self::NotNull => "NOT NULL".to_string(),
            Self::Unique => "UNIQUE".to_string(),
            Self::Check(expr) => format!("CHECK ({expr})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexDefinition {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

/// SQLite configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SqliteConfig {
    /// Path to the SQLite database file, or `:memory:`
    pub db_path: String,
    /// Schema definition for the database
    pub schema: Schema,
}

impl SqliteConfig {
    /// Create a new SQLite config with path and schema
    pub fn new(db_path: impl Into<String>, schema: Schema) -> Self {
        Self {
            db_path: db_path.into(),
            schema,
        }
    }

    /// A private in-memory database carrying the run schema.
    pub fn in_memory() -> Self {
        Self::new(":memory:", Schema::runs())
    }

    /// Opens the database and applies the schema.
    pub fn open(&self) -> Result<Connection> {
        info!(path = %self.db_path, "opening sqlite database");
        let conn = if self.db_path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(&self.db_path)?
        };
        initialize_schema(&conn, &self.schema)?;
        Ok(conn)
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self::new("runnerz.db", Schema::runs())
    }
}

fn initialize_schema(conn: &Connection, schema: &Schema) -> Result<()> {
    conn.execute_batch(&schema.to_sql())?;
    Ok(())
}
