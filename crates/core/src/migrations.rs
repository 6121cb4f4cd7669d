use crate::database::Database;
use crate::error::{Result, StoreError};

/// A schema change applied once, in `version` order.
struct Migration {
    version: i64,
    name: &'static str,
    statements: &'static [&'static str],
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 20241018_000001,
        name: "create_users_table",
        statements: &[
            r#"
            CREATE TABLE users (
                id TEXT PRIMARY KEY NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'Agent'
                    CHECK (role IN ('SuperAdmin', 'Admin', 'Supervisor', 'Agent')),
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
        ],
    },
    Migration {
        version: 20241018_000002,
        name: "create_products_table",
        statements: &[
            r#"
            CREATE TABLE products (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                price REAL NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                image_url TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT 'General',
                stock INTEGER NOT NULL DEFAULT 0,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
            "CREATE INDEX idx_products_active_created ON products (is_active, created_at)",
        ],
    },
];

/// Apply every pending migration.
///
/// Returns the number of migrations that ran; zero means the schema was
/// already current.
pub async fn run_migrations(db: &Database) -> Result<usize> {
    let pool = db.pool();

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    let applied: Vec<(i64,)> = sqlx::query_as("SELECT version FROM _migrations")
        .fetch_all(pool)
        .await?;
    let applied: Vec<i64> = applied.into_iter().map(|(v,)| v).collect();

    let mut ran = 0;
    for migration in MIGRATIONS.iter().filter(|m| !applied.contains(&m.version)) {
        let wrap = |source| StoreError::Migration {
            name: migration.name,
            source,
        };

        let mut tx = pool.begin().await?;
        for statement in migration.statements {
            sqlx::query(*statement).execute(&mut *tx).await.map_err(wrap)?;
        }
        sqlx::query("INSERT INTO _migrations (version, name) VALUES (?1, ?2)")
            .bind(migration.version)
            .bind(migration.name)
            .execute(&mut *tx)
            .await
            .map_err(wrap)?;
        tx.commit().await?;

        tracing::info!(version = migration.version, name = migration.name, "applied migration");
        ran += 1;
    }

    Ok(ran)
}
