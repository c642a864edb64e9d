#[derive(serde::Deserialize)]
pub struct Config {
    pub connection_string: String,
    #[serde(default = "default_database_name")]
    pub database_name: String,
}

fn default_database_name() -> String {
    "groupdigest".to_string()
}
