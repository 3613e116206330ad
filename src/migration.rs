//! Relational schema: users, products, orders. DDL is rendered per dialect from
//! one declarative table list and is safe to re-run.

use crate::error::StoreError;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use sqlx::MySqlPool;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Postgres,
}

impl Dialect {
    fn quote(self, s: &str) -> String {
        match self {
            Dialect::MySql => format!("`{}`", s.replace('`', "``")),
            Dialect::Postgres => format!("\"{}\"", s.replace('"', "\"\"")),
        }
    }

    fn type_str(self, kind: ColumnKind) -> String {
        match (self, kind) {
            (_, ColumnKind::Key) => "VARCHAR(36)".into(),
            (_, ColumnKind::Text(n)) => format!("VARCHAR({})", n),
            (_, ColumnKind::LongText) => "TEXT".into(),
            (Dialect::MySql, ColumnKind::Integer) => "INT".into(),
            (Dialect::Postgres, ColumnKind::Integer) => "INTEGER".into(),
            (Dialect::MySql, ColumnKind::Double) => "DOUBLE".into(),
            (Dialect::Postgres, ColumnKind::Double) => "DOUBLE PRECISION".into(),
            (Dialect::MySql, ColumnKind::Timestamp) => "DATETIME(3)".into(),
            (Dialect::Postgres, ColumnKind::Timestamp) => "TIMESTAMPTZ".into(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum ColumnKind {
    Key,
    Text(u32),
    LongText,
    Integer,
    Double,
    Timestamp,
}

#[derive(Clone, Copy, Debug)]
enum Check {
    Between(i64, i64),
    Positive,
}

#[derive(Clone, Copy, Debug)]
struct ColumnDef {
    name: &'static str,
    kind: ColumnKind,
    nullable: bool,
    unique: bool,
    check: Option<Check>,
}

impl ColumnDef {
    const fn new(name: &'static str, kind: ColumnKind) -> Self {
        ColumnDef {
            name,
            kind,
            nullable: false,
            unique: false,
            check: None,
        }
    }

    const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    const fn check(mut self, check: Check) -> Self {
        self.check = Some(check);
        self
    }
}

struct ForeignKey {
    column: &'static str,
    references: &'static str,
}

struct TableDef {
    name: &'static str,
    columns: &'static [ColumnDef],
    foreign_keys: &'static [ForeignKey],
}

const TIMESTAMPS: [ColumnDef; 2] = [
    ColumnDef::new("created_at", ColumnKind::Timestamp),
    ColumnDef::new("updated_at", ColumnKind::Timestamp).nullable(),
];

/// Parents before children so foreign keys resolve.
const TABLES: &[TableDef] = &[
    TableDef {
        name: "users",
        columns: &[
            ColumnDef::new("id", ColumnKind::Key),
            ColumnDef::new("name", ColumnKind::Text(100)),
            ColumnDef::new("email", ColumnKind::Text(255)).unique(),
            ColumnDef::new("age", ColumnKind::Integer).nullable().check(Check::Between(0, 150)),
            TIMESTAMPS[0],
            TIMESTAMPS[1],
        ],
        foreign_keys: &[],
    },
    TableDef {
        name: "products",
        columns: &[
            ColumnDef::new("id", ColumnKind::Key),
            ColumnDef::new("name", ColumnKind::Text(200)),
            ColumnDef::new("description", ColumnKind::LongText).nullable(),
            ColumnDef::new("price", ColumnKind::Double).check(Check::Positive),
            ColumnDef::new("category", ColumnKind::Text(100)),
            TIMESTAMPS[0],
            TIMESTAMPS[1],
        ],
        foreign_keys: &[],
    },
    TableDef {
        name: "orders",
        columns: &[
            ColumnDef::new("id", ColumnKind::Key),
            ColumnDef::new("user_id", ColumnKind::Key),
            ColumnDef::new("product_id", ColumnKind::Key),
            ColumnDef::new("quantity", ColumnKind::Integer).check(Check::Positive),
            ColumnDef::new("total_amount", ColumnKind::Double).check(Check::Positive),
            TIMESTAMPS[0],
            TIMESTAMPS[1],
        ],
        foreign_keys: &[
            ForeignKey {
                column: "user_id",
                references: "users",
            },
            ForeignKey {
                column: "product_id",
                references: "products",
            },
        ],
    },
];

const UPDATED_AT_FUNCTION: &str = r#"CREATE OR REPLACE FUNCTION update_updated_at_column()
RETURNS TRIGGER AS $$
BEGIN
    IF NEW.updated_at IS NOT DISTINCT FROM OLD.updated_at THEN
        NEW.updated_at = NOW();
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql"#;

fn column_sql(dialect: Dialect, c: &ColumnDef) -> String {
    let name = dialect.quote(c.name);
    let mut def = format!("{} {}", name, dialect.type_str(c.kind));
    if c.name == "id" {
        def.push_str(" PRIMARY KEY");
    } else if !c.nullable {
        def.push_str(" NOT NULL");
    }
    if c.unique {
        def.push_str(" UNIQUE");
    }
    match c.check {
        Some(Check::Between(min, max)) => {
            def.push_str(&format!(" CHECK ({} >= {} AND {} <= {})", name, min, name, max))
        }
        Some(Check::Positive) => def.push_str(&format!(" CHECK ({} > 0)", name)),
        None => {}
    }
    def
}

fn create_table_sql(dialect: Dialect, t: &TableDef) -> String {
    let mut parts: Vec<String> = t.columns.iter().map(|c| column_sql(dialect, c)).collect();
    for fk in t.foreign_keys {
        parts.push(format!(
            "FOREIGN KEY ({}) REFERENCES {}({}) ON DELETE CASCADE",
            dialect.quote(fk.column),
            dialect.quote(fk.references),
            dialect.quote("id")
        ));
    }
    let mut sql = format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
        dialect.quote(t.name),
        parts.join(",\n    ")
    );
    if dialect == Dialect::MySql {
        sql.push_str(" ENGINE=InnoDB DEFAULT CHARSET=utf8mb4");
    }
    sql
}

fn trigger_sql(t: &TableDef) -> [String; 2] {
    let trigger = format!("update_{}_updated_at", t.name);
    let table = Dialect::Postgres.quote(t.name);
    [
        format!("DROP TRIGGER IF EXISTS {} ON {}", trigger, table),
        format!(
            "CREATE TRIGGER {} BEFORE UPDATE ON {} FOR EACH ROW EXECUTE FUNCTION update_updated_at_column()",
            trigger, table
        ),
    ]
}

/// Every DDL statement for `dialect`, in execution order.
pub fn statements(dialect: Dialect) -> Vec<String> {
    let mut out: Vec<String> = TABLES.iter().map(|t| create_table_sql(dialect, t)).collect();
    if dialect == Dialect::Postgres {
        out.push(UPDATED_AT_FUNCTION.to_string());
        for t in TABLES {
            out.extend(trigger_sql(t));
        }
    }
    out
}

pub async fn apply_mysql(pool: &MySqlPool) -> Result<(), StoreError> {
    for sql in statements(Dialect::MySql) {
        sqlx::query(&sql).execute(pool).await?;
    }
    tracing::info!(tables = TABLES.len(), "MySQL schema ensured");
    Ok(())
}

pub async fn apply_postgres(db: &DatabaseConnection) -> Result<(), StoreError> {
    for sql in statements(Dialect::Postgres) {
        db.execute_unprepared(&sql).await?;
    }
    tracing::info!(tables = TABLES.len(), "PostgreSQL schema ensured");
    Ok(())
}
