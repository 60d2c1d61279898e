use std::time::Duration;

use wavelift::presentation::config::{Environment, Settings, StorageProviderSetting, TransferSettings};

#[test]
fn given_environment_aliases_when_parsing_then_maps_to_profiles() {
    assert_eq!(Environment::try_from("dev".to_string()), Ok(Environment::Local));
    assert_eq!(Environment::try_from("TEST".to_string()), Ok(Environment::Test));
    assert_eq!(Environment::try_from("production".to_string()), Ok(Environment::Prod));
    assert!(Environment::try_from("staging".to_string()).is_err());
}

#[test]
fn given_no_overrides_when_defaulting_transfer_settings_then_matches_wire_constants() {
    let settings = TransferSettings::default();

    assert_eq!(settings.key_prefix, "audio");
    assert_eq!(settings.resample_part_size_bytes, 20 * 1024 * 1024);
    assert_eq!(settings.direct_part_size_bytes, 5 * 1024 * 1024);
    assert_eq!(settings.split_part_data_bytes, 100 * 1024 * 1024 - 44);
    assert_eq!(settings.part_pacing(), Duration::from_millis(10));
    assert_eq!(settings.url_ttl(), Duration::from_secs(3600));
    assert!(settings.scratch_dir.is_none());
}

#[test]
fn given_partial_transfer_section_when_deserializing_then_missing_fields_use_defaults() {
    let settings: TransferSettings =
        serde_json::from_str(r#"{ "part_pacing_ms": 0, "key_prefix": "calls" }"#).unwrap();

    assert_eq!(settings.key_prefix, "calls");
    assert!(settings.part_pacing().is_zero());
    assert_eq!(settings.url_ttl_secs, 3600);
}

#[test]
fn given_local_profile_when_loading_then_reads_appsettings_file() {
    let settings = Settings::load(Environment::Local).unwrap();

    assert_eq!(settings.storage.provider, StorageProviderSetting::Memory);
    assert!(!settings.broker.base_url.is_empty());
    assert_eq!(settings.logging.level, "info");
}
