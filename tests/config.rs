#[cfg(test)]
mod tests {
    use medapp::db::DeletePolicy;
    use medapp::libs::config::{BackendConfig, Config, CONFIG_FILE_NAME, CONNECTION_STRING_ENV};
    use medapp::libs::data_storage::DataStorage;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ConfigTestContext {
        _temp_dir: TempDir,
        storage: DataStorage,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let storage = DataStorage::at(temp_dir.path().join("medapp"));
            ConfigTestContext { _temp_dir: temp_dir, storage }
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_missing_file_gives_defaults(ctx: &mut ConfigTestContext) {
        let config = Config::read_from(&ctx.storage).unwrap();

        assert_eq!(config.backend, BackendConfig::Sqlite { path: None });
        assert_eq!(config.delete_policy, None);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_back(ctx: &mut ConfigTestContext) {
        let config = Config {
            backend: BackendConfig::Files {
                dir: Some(PathBuf::from("/srv/clinic")),
            },
            delete_policy: Some(DeletePolicy::Block),
        };

        let path = config.save_to(&ctx.storage).unwrap();
        assert_eq!(path, ctx.storage.base_path().join(CONFIG_FILE_NAME));
        assert_eq!(Config::read_from(&ctx.storage).unwrap(), config);
    }

    #[test]
    fn test_json_layout() {
        let config = Config {
            backend: BackendConfig::Mssql {
                connection_string: "Server=tcp:localhost,1433;Database=Clinic".to_string(),
            },
            delete_policy: Some(DeletePolicy::Cascade),
        };

        let json: serde_json::Value = serde_json::to_value(&config).unwrap();
        assert_eq!(json["backend"]["type"], "mssql");
        assert_eq!(json["delete_policy"], "cascade");

        let parsed: Config = serde_json::from_str(r#"{"backend":{"type":"sqlite"}}"#).unwrap();
        assert_eq!(parsed.backend, BackendConfig::Sqlite { path: None });
        assert_eq!(parsed.delete_policy, None);
    }

    #[test]
    fn test_connection_string_resolution() {
        let configured = Config {
            backend: BackendConfig::Mssql {
                connection_string: "Server=tcp:db,1433".to_string(),
            },
            delete_policy: None,
        };

        std::env::remove_var(CONNECTION_STRING_ENV);
        assert_eq!(configured.connection_string().as_deref(), Some("Server=tcp:db,1433"));
        assert_eq!(Config::default().connection_string(), None);

        std::env::set_var(CONNECTION_STRING_ENV, "Server=tcp:override,1433");
        assert_eq!(configured.connection_string().as_deref(), Some("Server=tcp:override,1433"));
        std::env::remove_var(CONNECTION_STRING_ENV);
    }
}
