//! One-time resolution of configuration into a live database handle.
//!
//! The [`Bootstrapper`] turns a [`MongoConfig`] into a client, a bound
//! database and the resolved global [`Mapper`]. Resolution is lazy and
//! memoized: the first caller pays the construction cost, concurrent
//! callers await that single in-flight initialization, and later callers
//! get the memoized result. A failed resolution is not memoized; the next
//! caller retries.

use std::sync::Arc;

use mongodb::{
    Client, Database,
    options::{ClientOptions, ServerAddress},
};
use tokio::sync::OnceCell;

use mongoplug_core::{
    config::{self, MongoConfig},
    error::{MongoPlugError, MongoPlugResult},
};

use crate::mapper::{Mapper, MapperConfigurer, write_concern_from_policy};

/// The product of a successful bootstrap: one shared client, the bound
/// database, and the global mapper.
pub(crate) struct Bootstrapped {
    pub(crate) client: Client,
    pub(crate) database: Database,
    pub(crate) mapper: Mapper,
}

/// Lazily resolves configuration into a [`Bootstrapped`] connection,
/// exactly once per instance.
pub struct Bootstrapper {
    config: MongoConfig,
    configurer: Option<Arc<dyn MapperConfigurer>>,
    state: OnceCell<Bootstrapped>,
}

impl Bootstrapper {
    pub fn new(config: MongoConfig) -> Self {
        Self {
            config,
            configurer: None,
            state: OnceCell::new(),
        }
    }

    pub fn with_configurer(config: MongoConfig, configurer: Arc<dyn MapperConfigurer>) -> Self {
        Self {
            config,
            configurer: Some(configurer),
            state: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &MongoConfig {
        &self.config
    }

    /// The bound database handle, bootstrapping on first call.
    pub async fn database(&self) -> MongoPlugResult<Database> {
        Ok(self.resolve().await?.database.clone())
    }

    /// The shared client, bootstrapping on first call.
    pub async fn client(&self) -> MongoPlugResult<Client> {
        Ok(self.resolve().await?.client.clone())
    }

    /// The resolved global mapper, bootstrapping on first call.
    pub async fn mapper(&self) -> MongoPlugResult<Mapper> {
        Ok(self.resolve().await?.mapper.clone())
    }

    pub(crate) fn bootstrapped(&self) -> Option<&Bootstrapped> {
        self.state.get()
    }

    pub(crate) async fn resolve(&self) -> MongoPlugResult<&Bootstrapped> {
        self.state.get_or_try_init(|| self.bootstrap()).await
    }

    async fn bootstrap(&self) -> MongoPlugResult<Bootstrapped> {
        let (options, database_name) = self.client_options().await?;
        log::info!(
            "connecting to mongodb hosts {:?}, database `{database_name}`",
            options.hosts
        );

        let mapper = self.global_mapper(&options);
        let client = Client::with_options(options)
            .map_err(|e| MongoPlugError::Driver(e.to_string()))?;
        let database = client.database(&database_name);

        Ok(Bootstrapped {
            client,
            database,
            mapper,
        })
    }

    /// Builds the client options and resolves the database name, failing
    /// fast on malformed configuration before any client is constructed.
    async fn client_options(&self) -> MongoPlugResult<(ClientOptions, String)> {
        // Credentials are validated here but intentionally not applied to
        // the connection; the setting is reserved.
        if let Some(raw) = &self.config.credentials {
            let credentials = config::parse_credentials(raw)?;
            log::warn!(
                "mongodb credentials configured for user `{}` but credential application is disabled",
                credentials.username
            );
        }

        let default_write_concern = self
            .config
            .default_write_concern
            .as_deref()
            .and_then(config::parse_write_concern)
            .map(write_concern_from_policy);

        if let Some(uri) = &self.config.uri {
            let mut options = ClientOptions::parse(uri)
                .await
                .map_err(|e| MongoPlugError::Driver(e.to_string()))?;
            let database_name = options
                .default_database
                .clone()
                .or_else(|| self.config.database.clone())
                .unwrap_or_else(|| config::DEFAULT_DATABASE.to_string());
            // A concern carried by the URI wins over the configured default.
            options.write_concern = options.write_concern.take().or(default_write_concern);
            Ok((options, database_name))
        } else {
            let hosts = config::parse_server_list(self.config.servers_or_default())?
                .into_iter()
                .map(|entry| ServerAddress::Tcp {
                    host: entry.host,
                    port: entry.port,
                })
                .collect::<Vec<_>>();
            let mut options = ClientOptions::builder().hosts(hosts).build();
            options.write_concern = default_write_concern;
            let database_name = self.config.database_or_default().to_string();
            Ok((options, database_name))
        }
    }

    fn global_mapper(&self, options: &ClientOptions) -> Mapper {
        let mapper = match options.write_concern.clone() {
            Some(write_concern) => Mapper::new().with_write_concern(write_concern),
            None => Mapper::new(),
        };
        match &self.configurer {
            Some(configurer) => configurer.configure(mapper),
            None => mapper,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::options::WriteConcern;

    #[tokio::test]
    async fn server_list_builds_hosts_in_order() {
        let bootstrapper = Bootstrapper::new(MongoConfig {
            servers: Some("alpha:27018,beta".to_string()),
            database: Some("orders".to_string()),
            ..MongoConfig::default()
        });
        let (options, database) = bootstrapper.client_options().await.expect("valid config");

        assert_eq!(database, "orders");
        assert_eq!(
            options.hosts,
            vec![
                ServerAddress::Tcp {
                    host: "alpha".to_string(),
                    port: Some(27018)
                },
                ServerAddress::Tcp {
                    host: "beta".to_string(),
                    port: None
                },
            ]
        );
    }

    #[tokio::test]
    async fn defaults_apply_when_nothing_is_configured() {
        let bootstrapper = Bootstrapper::new(MongoConfig::default());
        let (options, database) = bootstrapper.client_options().await.expect("valid config");

        assert_eq!(database, "play");
        assert_eq!(
            options.hosts,
            vec![ServerAddress::Tcp {
                host: "localhost".to_string(),
                port: None
            }]
        );
    }

    #[tokio::test]
    async fn uri_database_wins_over_configured_database() {
        let bootstrapper = Bootstrapper::new(MongoConfig {
            uri: Some("mongodb://localhost:27017/testdb".to_string()),
            database: Some("ignored".to_string()),
            ..MongoConfig::default()
        });
        let (_, database) = bootstrapper.client_options().await.expect("valid config");

        assert_eq!(database, "testdb");
    }

    #[tokio::test]
    async fn default_write_concern_is_applied_when_recognized() {
        let bootstrapper = Bootstrapper::new(MongoConfig {
            default_write_concern: Some("MAJORITY".to_string()),
            ..MongoConfig::default()
        });
        let (options, _) = bootstrapper.client_options().await.expect("valid config");

        assert_eq!(options.write_concern, Some(WriteConcern::majority()));
    }

    #[tokio::test]
    async fn unknown_write_concern_is_silently_ignored() {
        let bootstrapper = Bootstrapper::new(MongoConfig {
            default_write_concern: Some("PARANOID".to_string()),
            ..MongoConfig::default()
        });
        let (options, _) = bootstrapper.client_options().await.expect("valid config");

        assert!(options.write_concern.is_none());
    }

    #[tokio::test]
    async fn malformed_server_entry_fails_before_any_client_exists() {
        let bootstrapper = Bootstrapper::new(MongoConfig {
            servers: Some("localhost:abc".to_string()),
            ..MongoConfig::default()
        });
        let err = bootstrapper.client_options().await.expect_err("must fail");

        assert!(matches!(err, MongoPlugError::Configuration(_)));
        assert!(bootstrapper.bootstrapped().is_none());
    }

    #[tokio::test]
    async fn malformed_credentials_fail_the_bootstrap() {
        let bootstrapper = Bootstrapper::new(MongoConfig {
            credentials: Some("no-separator".to_string()),
            ..MongoConfig::default()
        });

        assert!(bootstrapper.client_options().await.is_err());
    }
}
