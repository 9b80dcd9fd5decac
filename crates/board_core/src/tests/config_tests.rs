use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn defaults_match_scripted_demo() {
    let settings = BoardSettings::default();
    assert_eq!(settings.claim_delay(), Duration::from_millis(30_000));
    assert_eq!(settings.clock_interval(), Duration::from_secs(1));
    assert_eq!(settings.notify_timeout(), Duration::from_secs(10));
    assert_eq!(settings.keep_alive_interval(), Duration::from_secs(300));
    assert_eq!(settings.zone_offset_secs, 28_800);
    settings.validate().expect("defaults are valid");
}

#[test]
fn api_base_strips_trailing_slash() {
    let settings = BoardSettings {
        backend_url: "https://claims.example.com/".into(),
        ..BoardSettings::default()
    };
    assert_eq!(
        settings.api_base().expect("api base"),
        "https://claims.example.com/api"
    );
}

#[test]
fn api_base_is_joined_as_a_path_segment() {
    let settings = BoardSettings::default();
    assert_eq!(settings.api_base().expect("api base"), "http://127.0.0.1:8001/api");

    let settings = BoardSettings {
        backend_url: "https://gateway.example.com/claims/".into(),
        ..BoardSettings::default()
    };
    assert_eq!(
        settings.api_base().expect("api base"),
        "https://gateway.example.com/claims/api"
    );
}

#[test]
fn rejects_backend_with_query_or_fragment() {
    for raw in ["http://claims.example.com/?x=1", "http://claims.example.com/#top"] {
        let settings = BoardSettings {
            backend_url: raw.into(),
            ..BoardSettings::default()
        };
        assert!(
            matches!(settings.api_base(), Err(ConfigError::BackendQuery(_))),
            "{raw} should be rejected"
        );
        assert!(settings.validate().is_err());
    }
}

#[test]
fn zone_caption_comes_from_settings() {
    let settings = BoardSettings::default();
    assert_eq!(
        settings.display_zone().expect("zone").caption(),
        "Singapore Time (SGT)"
    );

    let mut settings = BoardSettings::default();
    settings
        .apply_toml("zone_label = \"JST\"\nzone_name = \"Tokyo Time\"\nzone_offset_secs = 32400\n")
        .expect("toml");
    let zone = settings.display_zone().expect("zone");
    assert_eq!(zone.caption(), "Tokyo Time (JST)");
    assert_eq!(zone.offset().local_minus_utc(), 32_400);

    settings.apply_env(env_from(&[("APP__ZONE_NAME", "Japan Standard Time")]));
    assert_eq!(
        settings.display_zone().expect("zone").caption(),
        "Japan Standard Time (JST)"
    );
}

#[test]
fn rejects_non_http_backend() {
    let settings = BoardSettings {
        backend_url: "ftp://claims.example.com".into(),
        ..BoardSettings::default()
    };
    assert!(matches!(
        settings.api_base(),
        Err(ConfigError::BackendScheme(scheme)) if scheme == "ftp"
    ));

    let settings = BoardSettings {
        backend_url: "not a url".into(),
        ..BoardSettings::default()
    };
    assert!(matches!(settings.api_base(), Err(ConfigError::BackendUrl { .. })));
}

#[test]
fn toml_overrides_defaults_and_env_overrides_toml() {
    let mut settings = BoardSettings::default();
    settings
        .apply_toml(
            r#"
            backend_url = "http://file.example:9000"
            claim_delay_ms = 500
            zone_label = "UTC"
            zone_offset_secs = 0
            "#,
        )
        .expect("toml");
    assert_eq!(settings.backend_url, "http://file.example:9000");
    assert_eq!(settings.claim_delay_ms, 500);

    settings.apply_env(env_from(&[
        ("BOARD_BACKEND_URL", "http://env.example:1"),
        ("APP__CLAIM_DELAY_MS", "not-a-number"),
        ("APP__PROBE_ENABLED", "false"),
    ]));
    assert_eq!(settings.backend_url, "http://env.example:1");
    assert_eq!(settings.claim_delay_ms, 500);
    assert!(!settings.probe_enabled);
    assert_eq!(settings.zone_label, "UTC");
}

#[test]
fn app_prefixed_backend_url_wins_over_board_prefix() {
    let mut settings = BoardSettings::default();
    settings.apply_env(env_from(&[
        ("BOARD_BACKEND_URL", "http://first.example"),
        ("APP__BACKEND_URL", "http://second.example"),
    ]));
    assert_eq!(settings.backend_url, "http://second.example");
}

#[test]
fn unknown_toml_keys_are_rejected() {
    let mut settings = BoardSettings::default();
    let err = settings
        .apply_toml("mongo_url = \"mongodb://localhost\"")
        .expect_err("unknown key");
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn validate_rejects_zero_intervals_and_bad_offsets() {
    let settings = BoardSettings {
        clock_interval_ms: 0,
        ..BoardSettings::default()
    };
    assert!(matches!(
        settings.validate(),
        Err(ConfigError::Zero("clock_interval_ms"))
    ));

    let settings = BoardSettings {
        zone_offset_secs: 30 * 60 * 60,
        ..BoardSettings::default()
    };
    assert!(matches!(settings.validate(), Err(ConfigError::ZoneOffset(_))));

    let settings = BoardSettings {
        probe_enabled: false,
        keep_alive_secs: 0,
        ..BoardSettings::default()
    };
    settings.validate().expect("keep-alive unused when probe disabled");
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("claim_board_missing_{suffix}.toml"));

    let settings = load_settings_from(&path, |_| None).expect("settings");
    assert_eq!(settings, BoardSettings::default());
}

#[test]
fn reads_config_file_from_disk() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("claim_board_settings_{suffix}.toml"));
    fs::write(&path, "claim_delay_ms = 1200\nprobe_enabled = false\n").expect("write");

    let settings = load_settings_from(&path, env_from(&[("APP__KEEP_ALIVE_SECS", "60")]))
        .expect("settings");
    assert_eq!(settings.claim_delay_ms, 1200);
    assert!(!settings.probe_enabled);
    assert_eq!(settings.keep_alive_secs, 60);

    fs::remove_file(path).expect("cleanup");
}
