use crate::Result;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage};
use typed_builder::TypedBuilder;

const REDIS_PORT: u16 = 6379;

#[derive(Debug, Clone, TypedBuilder)]
pub struct RedisConfig {
    #[builder(default = "redis".to_string(), setter(into))]
    image: String,
    #[builder(default = "8.6.0".to_string(), setter(into))]
    tag: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Test fixture for a disposable standalone Redis server.
///
/// The container is removed when the fixture is dropped.
pub struct RedisServer {
    container: ContainerAsync<GenericImage>,
}

impl RedisServer {
    /// Starts a Redis container with the default image.
    pub async fn new() -> Result<Self> {
        Self::with_config(RedisConfig::default()).await
    }

    pub async fn with_config(config: RedisConfig) -> Result<Self> {
        let container = GenericImage::new(config.image, config.tag)
            .with_exposed_port(REDIS_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"))
            .start()
            .await?;

        Ok(Self { container })
    }

    pub async fn host(&self) -> Result<String> {
        let host = self.container.get_host().await?.to_string();

        Ok(match host.as_str() {
            "localhost" => String::from("127.0.0.1"),
            _ => host,
        })
    }

    pub async fn port(&self) -> Result<u16> {
        Ok(self.container.get_host_port_ipv4(REDIS_PORT).await?)
    }

    /// Connection URL for the `redis` client, e.g. `redis://127.0.0.1:32768`.
    pub async fn url(&self) -> Result<String> {
        let host = self.host().await?;
        let port = self.port().await?;
        Ok(format!("redis://{}:{}", host, port))
    }

    /// Opens a plain client against the container, for seeding or inspecting keys.
    pub async fn client(&self) -> Result<redis::Client> {
        Ok(redis::Client::open(self.url().await?)?)
    }
}
