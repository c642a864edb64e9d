#[derive(serde::Deserialize)]
pub(crate) struct Config {
    pub bot_config: digest_bot::Config,
    pub repo_config: digest_repo::Config,
    pub ai_config: digest_ai::Config,
    #[serde(default)]
    pub service_config: digest_service::Config,
}

impl Config {
    pub fn new() -> Result<Config, config::ConfigError> {
        let env_config = config::Environment::default()
            .separator("__")
            .list_separator(";")
            .with_list_parse_key("service_config.allowed_chat_ids")
            .try_parsing(true);

        let mut conf_builder = config::Config::builder().add_source(env_config);

        if std::path::Path::new("Settings.toml").exists() {
            conf_builder = conf_builder.add_source(config::File::with_name("./Settings.toml"));
        }

        conf_builder.build()?.try_deserialize::<Config>()
    }
}
