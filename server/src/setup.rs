use anyhow::{Context, Result};
use database::SqliteTaskRepository;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use task_web::TaskServer;
use tracing::{error, info};

use crate::config::Config;

/// Create a task repository based on the complete configuration
pub async fn create_repository(config: &Config) -> Result<Arc<SqliteTaskRepository>> {
    let database_url = config.database_url();
    info!("Initializing SQLite repository at: {}", database_url);

    let repo = SqliteTaskRepository::with_pool_options(
        &database_url,
        config.database.max_connections,
        Duration::from_secs(config.database.connection_timeout),
    )
    .await
    .with_context(|| format!("Failed to open database at {database_url}"))?;

    info!("Running database migrations");
    repo.migrate()
        .await
        .context("Failed to run database migrations")?;

    info!("Task repository created successfully");
    Ok(Arc::new(repo))
}

/// Seed an empty store with the default tasks.
///
/// Failures are logged and reported as zero inserted tasks; the server
/// still starts.
pub async fn seed_database(repository: &SqliteTaskRepository) -> usize {
    match task_core::seed_if_empty(repository).await {
        Ok(count) => count,
        Err(e) => {
            error!(error = %e, "An error occurred seeding the database");
            0
        }
    }
}

/// Create and configure the HTTP server
pub fn create_server(repository: Arc<SqliteTaskRepository>) -> TaskServer<SqliteTaskRepository> {
    TaskServer::new(repository)
}

/// Initialize the complete application
pub async fn initialize_app(config: &Config) -> Result<TaskServer<SqliteTaskRepository>> {
    info!("Initializing application");

    let repository = create_repository(config)
        .await
        .context("Failed to create repository")?;

    if config.seed.enabled {
        seed_database(&repository).await;
    } else {
        info!("Seeding disabled by configuration");
    }

    let server = create_server(repository);

    info!("Application initialized successfully");
    Ok(server)
}

/// Ensure the database directory exists using config
pub fn ensure_database_directory_from_config(config: &Config) -> Result<()> {
    ensure_database_directory(&config.database_url())
}

/// File path behind a SQLite URL, `None` for in-memory databases
pub fn database_file_path(database_url: &str) -> Option<&Path> {
    if database_url.contains(":memory:") || database_url.contains("mode=memory") {
        return None;
    }

    database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .filter(|path| !path.is_empty())
        .map(Path::new)
}

/// Ensure the database directory exists and set secure permissions
pub fn ensure_database_directory(database_url: &str) -> Result<()> {
    let Some(db_path) = database_file_path(database_url) else {
        return Ok(());
    };

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            info!("Creating database directory: {}", parent.display());
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;

            // Owner only
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let permissions = std::fs::Permissions::from_mode(0o700);
                std::fs::set_permissions(parent, permissions)
                    .context("Failed to set directory permissions")?;
            }
        }
    }

    if db_path.exists() {
        set_secure_file_permissions(db_path)?;
    }

    Ok(())
}

/// Set secure file permissions (owner-only access on Unix)
fn set_secure_file_permissions(file_path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(file_path, permissions)
            .with_context(|| format!("Failed to set permissions for {}", file_path.display()))?;
        info!("Set secure permissions (0600) for database file: {}", file_path.display());
    }

    #[cfg(not(unix))]
    {
        info!("Database file permissions managed by the system: {}", file_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, LogFormat, LoggingConfig, SeedConfig, ServerConfig};
    use task_core::TaskRepository;
    use tempfile::TempDir;

    fn test_config(url: String, seed: bool) -> Config {
        Config {
            database: DatabaseConfig {
                url: Some(url),
                max_connections: 5,
                connection_timeout: 30,
            },
            server: ServerConfig {
                listen_addr: "127.0.0.1".to_string(),
                port: 5000,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
            },
            seed: SeedConfig { enabled: seed },
        }
    }

    #[tokio::test]
    async fn test_create_repository_with_custom_url() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let config = test_config(format!("sqlite://{}", db_path.display()), true);

        let repo = create_repository(&config).await;
        match repo {
            Ok(repo) => assert!(repo.health_check().await.is_ok()),
            Err(e) => panic!("Failed to create repository: {e:?}"),
        }
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_seed_failure_is_not_fatal() {
        // No migrations, so the Task table is missing
        let repo = SqliteTaskRepository::new("sqlite::memory:").await.unwrap();
        assert_eq!(seed_database(&repo).await, 0);
    }

    #[test]
    fn test_database_file_path() {
        assert_eq!(
            database_file_path("sqlite:///tmp/tasks.sqlite"),
            Some(Path::new("/tmp/tasks.sqlite"))
        );
        assert_eq!(database_file_path("sqlite:tasks.sqlite"), Some(Path::new("tasks.sqlite")));
        assert_eq!(database_file_path("sqlite::memory:"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_database_directory_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("data").join("priority-tasks");
        let url = format!("sqlite://{}", nested.join("tasks.sqlite").display());

        ensure_database_directory(&url).unwrap();

        let mode = std::fs::metadata(&nested).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }
}
