use chartslot::config::{AppConfig, ColorParser, ConfigManager, Rgb, Theme};
use std::fs;
use tempfile::TempDir;

// Helper to create a temporary config directory for testing
fn setup_test_config_dir() -> (TempDir, ConfigManager) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_manager = ConfigManager::with_dir(temp_dir.path().to_path_buf());
    (temp_dir, config_manager)
}

#[test]
fn test_default_config() {
    let config = AppConfig::default();

    assert_eq!(config.version, "0.1");

    assert_eq!(config.chart.escape_tick_threshold, 20);
    assert_eq!(config.chart.hover_placement_threshold_px, 800.0);
    assert_eq!(config.chart.bar_half_width, 0.3);

    assert_eq!(config.ticks.scientific_threshold, 1e6);
    assert_eq!(config.ticks.max_significant_digits, 6);

    assert_eq!(config.layout.width_one, 195);
    assert_eq!(config.layout.width_two, 400);
    assert_eq!(config.layout.height_one, 195);
    assert_eq!(config.layout.height_two, 380);

    assert_eq!(config.theme.colors.background, "white");
    assert_eq!(config.logging.filter, "warn");
}

#[test]
fn test_generate_default_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let template = config_manager.generate_default_config().unwrap();

    assert!(template.contains("[chart]"));
    assert!(template.contains("[ticks]"));
    assert!(template.contains("[layout]"));
    assert!(template.contains("[theme.colors]"));
    assert!(template.contains("[logging]"));
    assert!(template.contains("version = \"0.1\""));

    // every setting is commented out
    for line in template.lines() {
        let trimmed = line.trim();
        assert!(
            trimmed.is_empty() || trimmed.starts_with('#'),
            "uncommented line in template: {}",
            line
        );
    }
}

#[test]
fn test_write_default_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let path = config_manager.write_default_config(false).unwrap();
    assert!(path.exists());
    assert_eq!(path, config_manager.config_path("config.toml"));

    // second write without force is refused
    assert!(config_manager.write_default_config(false).is_err());
    assert!(config_manager.write_default_config(true).is_ok());

    // the commented template loads as defaults
    let loaded = AppConfig::load_from(&config_manager).unwrap();
    assert_eq!(loaded, AppConfig::default());
}

#[test]
fn test_missing_config_file_gives_defaults() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    let loaded = AppConfig::load_from(&config_manager).unwrap();
    assert_eq!(loaded, AppConfig::default());
}

#[test]
fn test_user_config_overrides_defaults() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    config_manager.ensure_config_dir().unwrap();
    fs::write(
        config_manager.config_path("config.toml"),
        r##"
[chart]
hover_placement_threshold_px = 640.0
escape_tick_threshold = 12

[ticks]
scientific_threshold = 1000.0

[theme.colors]
na_group = "light_gray"
chart_series_color_1 = "#112233"
"##,
    )
    .unwrap();

    let config = AppConfig::load_from(&config_manager).unwrap();
    assert_eq!(config.chart.hover_placement_threshold_px, 640.0);
    assert_eq!(config.chart.escape_tick_threshold, 12);
    assert_eq!(config.chart.bar_half_width, 0.3);
    assert_eq!(config.ticks.scientific_threshold, 1000.0);
    assert_eq!(config.ticks.max_significant_digits, 6);

    let theme = Theme::from_config(&config.theme).unwrap();
    assert_eq!(theme.get("na_group"), Rgb(211, 211, 211));
    assert_eq!(theme.series_color(0), Rgb(0x11, 0x22, 0x33));
    assert_eq!(theme.series_color(7), Rgb(0x11, 0x22, 0x33));
}

#[test]
fn test_invalid_values_are_rejected() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    config_manager.ensure_config_dir().unwrap();
    let path = config_manager.config_path("config.toml");

    fs::write(&path, "[chart]\nbar_half_width = 0.9\n").unwrap();
    let err = AppConfig::load_from(&config_manager).unwrap_err();
    assert!(err.to_string().contains("bar_half_width"), "got: {}", err);

    fs::write(&path, "[theme.colors]\naxis = \"chartreuse\"\n").unwrap();
    assert!(AppConfig::load_from(&config_manager).is_err());

    fs::write(&path, "version = \"2.0\"\n").unwrap();
    assert!(AppConfig::load_from(&config_manager).is_err());

    fs::write(&path, "[chart\n").unwrap();
    assert!(AppConfig::load_from(&config_manager).is_err());
}

#[test]
fn test_color_parser() {
    let parser = ColorParser::new();
    assert_eq!(parser.parse("#FF0000").unwrap(), Rgb(255, 0, 0));
    assert_eq!(parser.parse(" white ").unwrap(), Rgb(255, 255, 255));
    assert_eq!(parser.parse("Steel Blue").unwrap(), Rgb(70, 130, 180));
    assert!(parser.parse("#ff00").is_err());
    assert!(parser.parse("#gg0000").is_err());
    assert!(parser.parse("nope").is_err());
    assert_eq!(Rgb(41, 134, 226).to_hex(), "#2986e2");
}
