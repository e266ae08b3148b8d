use crate::config::ClickhouseConfig;

pub fn get_clickhouse_client(config: &ClickhouseConfig) -> clickhouse::Client {
    clickhouse::Client::default()
        .with_url(&config.url)
        .with_user(&config.user)
        .with_password(&config.password)
        .with_database(&config.database)
}
