//! Local Beach: the shared reverse proxy and database server every project
//! instance runs behind.

use std::path::{Path, PathBuf};

/// Compose project name of the shared services.
pub const COMPOSE_PROJECT: &str = "localbeach";
/// Shared compose file below the base directory.
pub const COMPOSE_FILE: &str = "compose.yaml";

pub const NGINX_CONTAINER: &str = "local_beach_nginx";
pub const DATABASE_CONTAINER: &str = "local_beach_database";

/// Compose service names of the shared services.
pub const SERVICES: &[&str] = &["webserver", "database"];
pub const WEBSERVER_SERVICE: &str = "webserver";

/// Wildcard host name the default certificate is issued for.
pub const CERTIFICATE_HOSTS: &str = "*.localbeach.net";

/// Directory layout of a Local Beach installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalBeachLayout {
    pub base: PathBuf,
    pub certificates: PathBuf,
    pub database: PathBuf,
}

impl LocalBeachLayout {
    /// Standard layout below `base`.
    #[must_use]
    pub fn under(base: &Path) -> Self {
        Self {
            base: base.to_path_buf(),
            certificates: base.join("Nginx").join("Certificates"),
            database: base.join("MariaDB"),
        }
    }

    #[must_use]
    pub fn compose_file(&self) -> PathBuf {
        self.base.join(COMPOSE_FILE)
    }

    #[must_use]
    pub fn certificate_file(&self) -> PathBuf {
        self.certificates.join("default.crt")
    }

    #[must_use]
    pub fn certificate_key_file(&self) -> PathBuf {
        self.certificates.join("default.key")
    }

    /// Render the shared compose template for this layout.
    #[must_use]
    pub fn render_compose_file(&self, template: &str) -> String {
        template
            .replace("{{databasePath}}", &self.database.to_string_lossy())
            .replace("{{certificatesPath}}", &self.certificates.to_string_lossy())
    }
}

/// SQL statement creating the database of a project.
#[must_use]
pub fn create_database_statement(project_name: &str) -> String {
    format!("echo 'CREATE DATABASE IF NOT EXISTS `{project_name}`' | mysql -u root --password=password")
}
