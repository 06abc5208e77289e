use anyhow::Error;
use common_macros::hash_map;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    pub psql_url: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct CatalogConfig {
    /// E-mails allowed to add and delete books
    pub admins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoversConfig {
    pub root: PathBuf,
    pub public_url: String,
}

impl Default for CoversConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public"),
            public_url: "http://localhost:8080/book-covers".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImportConfig {
    pub api_url: String,
    pub subject: String,
    pub page_size: usize,
    pub max_books: usize,
    pub api_key: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            api_url: "https://www.googleapis.com/books/v1/volumes".into(),
            subject: "fiction".into(),
            page_size: 40,
            max_books: 200,
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_databases")]
    pub databases: HashMap<String, DatabaseConfig>,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub covers: CoversConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

fn default_databases() -> HashMap<String, DatabaseConfig> {
    hash_map! {
        "books".into() => DatabaseConfig {
            psql_url: "postgres://postgres:@localhost/books".into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            databases: default_databases(),
            catalog: Default::default(),
            covers: Default::default(),
            import: Default::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let parsed: Self = toml::from_str(&contents)?;
        Ok(parsed)
    }

    /// Secrets usually live in `.env`, `DATABASE_URL` points the `books`
    /// database somewhere else and `GOOGLE_API_KEY` feeds the importer.
    pub fn apply_vars(&mut self, vars: &HashMap<String, String>) {
        if let Some(url) = vars.get("DATABASE_URL") {
            self.databases.insert(
                "books".into(),
                DatabaseConfig {
                    psql_url: url.clone(),
                },
            );
        }

        if let Some(key) = vars.get("GOOGLE_API_KEY") {
            self.import.api_key = key.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Error;

    #[test]
    fn load_example_config() -> Result<(), Error> {
        let expected = Config {
            databases: hash_map! {
                "books".into() => DatabaseConfig {
                    psql_url: "postgres://postgres:@localhost/books".into(),
                },
                "books-staging".into() => DatabaseConfig {
                    psql_url: "postgres://postgres:@staging/books".into(),
                },
            },
            catalog: CatalogConfig {
                admins: vec!["angela@example.com".into(), "tijl@example.com".into()],
            },
            covers: CoversConfig {
                root: PathBuf::from("public"),
                public_url: "http://localhost:8080/book-covers".into(),
            },
            import: ImportConfig {
                api_url: "https://www.googleapis.com/books/v1/volumes".into(),
                subject: "fiction".into(),
                page_size: 40,
                max_books: 200,
                api_key: String::new(),
            },
        };

        let loaded = Config::load("example.toml")?;
        assert_eq!(expected, loaded);

        Ok(())
    }

    #[test]
    fn partial_config_uses_defaults() -> Result<(), Error> {
        let parsed: Config = toml::from_str("[import]\nsubject = \"poetry\"\n")?;

        assert_eq!(parsed.import.subject, "poetry");
        assert_eq!(parsed.import.page_size, 40);
        assert!(parsed.catalog.admins.is_empty());
        assert_eq!(parsed.databases, Config::default().databases);

        Ok(())
    }

    #[test]
    fn vars_override_secrets() {
        let mut config = Config::default();
        let vars = hash_map! {
            "DATABASE_URL".to_string() => "postgres://elsewhere/books".to_string(),
            "GOOGLE_API_KEY".to_string() => "secret".to_string(),
        };

        config.apply_vars(&vars);

        assert_eq!(config.databases["books"].psql_url, "postgres://elsewhere/books");
        assert_eq!(config.import.api_key, "secret");
    }
}
