use libsql::{Builder, Connection};
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::error::Result;

use super::schema;

/// SQLite pragmas for local databases. `journal_mode` is stored in the file
/// and set once; the others are per connection.
#[derive(Debug, Clone)]
struct Pragmas {
    busy_timeout_ms: u64,
    journal_mode: &'static str,
    synchronous: &'static str,
}

impl Pragmas {
    fn from_env() -> Self {
        Self {
            busy_timeout_ms: std::env::var("DATABASE_BUSY_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5000),
            journal_mode: normalize_journal_mode(
                &std::env::var("DATABASE_JOURNAL_MODE").unwrap_or_else(|_| "WAL".to_string()),
            ),
            synchronous: normalize_synchronous(
                &std::env::var("DATABASE_SYNCHRONOUS").unwrap_or_else(|_| "NORMAL".to_string()),
            ),
        }
    }

    fn database_statements(&self) -> [(&'static str, String); 1] {
        [("journal_mode", format!("PRAGMA journal_mode = {}", self.journal_mode))]
    }

    fn connection_statements(&self) -> [(&'static str, String); 2] {
        [
            ("busy_timeout", format!("PRAGMA busy_timeout = {}", self.busy_timeout_ms)),
            ("synchronous", format!("PRAGMA synchronous = {}", self.synchronous)),
        ]
    }
}

/// Handle on the libSQL database: local file, `:memory:`, remote, or an
/// embedded replica of a remote database.
#[derive(Clone)]
pub struct Database {
    db: Arc<libsql::Database>,
    /// Every `connect()` on `:memory:` opens a new empty database, so one
    /// connection is shared instead.
    shared: Option<Connection>,
    /// `None` for remote databases.
    pragmas: Option<Pragmas>,
    is_remote: bool,
}

impl Database {
    /// Open the database, apply pragmas, and create missing tables. The
    /// knowledge table is created `embedding_dimensions` wide.
    pub async fn new(config: &DatabaseConfig, embedding_dimensions: usize) -> Result<Self> {
        let is_remote = config.url.starts_with("libsql://") || config.url.starts_with("https://");

        let db = if is_remote {
            let token = config.auth_token.clone().unwrap_or_default();
            match config.local_path {
                Some(ref local_path) => {
                    Builder::new_remote_replica(local_path, config.url.clone(), token)
                        .build()
                        .await?
                }
                None => Builder::new_remote(config.url.clone(), token).build().await?,
            }
        } else if config.url == ":memory:" {
            Builder::new_local(":memory:").build().await?
        } else {
            let path = config.url.strip_prefix("file:").unwrap_or(&config.url);
            Builder::new_local(path).build().await?
        };

        let pragmas = (!is_remote).then(Pragmas::from_env);
        let shared = if config.url == ":memory:" {
            let conn = db.connect()?;
            if let Some(ref pragmas) = pragmas {
                apply_pragmas(&conn, &pragmas.connection_statements()).await;
            }
            Some(conn)
        } else {
            None
        };

        let database = Self {
            db: Arc::new(db),
            shared,
            pragmas,
            is_remote,
        };

        let conn = database.connect().await?;
        if let Some(ref pragmas) = database.pragmas {
            apply_pragmas(&conn, &pragmas.database_statements()).await;
        }
        schema::init_schema(&conn, embedding_dimensions).await?;

        tracing::info!(url = %redact_url(&config.url), "Database ready");
        Ok(database)
    }

    /// Open a connection with the per-connection pragmas applied.
    pub async fn connect(&self) -> Result<Connection> {
        if let Some(ref conn) = self.shared {
            return Ok(conn.clone());
        }
        let conn = self.db.connect()?;
        if let Some(ref pragmas) = self.pragmas {
            apply_pragmas(&conn, &pragmas.connection_statements()).await;
        }
        Ok(conn)
    }

    /// Pull replicated changes. Local databases have nothing to sync.
    pub async fn sync(&self) -> Result<()> {
        if !self.is_remote {
            return Ok(());
        }
        match self.db.sync().await {
            Ok(replicated) => tracing::info!("Database synced: {:?}", replicated),
            Err(e) => tracing::debug!("Database sync skipped: {e}"),
        }
        Ok(())
    }
}

async fn apply_pragmas(conn: &Connection, statements: &[(&'static str, String)]) {
    for (name, sql) in statements.iter() {
        if let Err(error) = conn.execute_batch(sql.as_str()).await {
            tracing::warn!(pragma = *name, error = %error, "Failed to set SQLite pragma");
        }
    }
}

/// Hide credentials that may be embedded in a database URL.
fn redact_url(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => format!("{base}?…"),
        None => url.to_string(),
    }
}

fn normalize_journal_mode(value: &str) -> &'static str {
    match value.trim().to_uppercase().as_str() {
        "DELETE" => "DELETE",
        "TRUNCATE" => "TRUNCATE",
        "PERSIST" => "PERSIST",
        "MEMORY" => "MEMORY",
        "OFF" => "OFF",
        _ => "WAL",
    }
}

fn normalize_synchronous(value: &str) -> &'static str {
    match value.trim().to_uppercase().as_str() {
        "OFF" => "OFF",
        "FULL" => "FULL",
        "EXTRA" => "EXTRA",
        _ => "NORMAL",
    }
}
