use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Manages config directory and config file operations
#[derive(Clone)]
pub struct ConfigManager {
    pub(crate) config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);

        Ok(Self { config_dir })
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get path to a specific config file or subdirectory
    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    /// Ensure the config directory exists
    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Generate default configuration template as a string with comments.
    /// All fields are commented out so defaults are used, but users can uncomment to override.
    pub fn generate_default_config(&self) -> Result<String> {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| eyre!("Failed to serialize default config: {}", e))?;

        let comments = Self::collect_all_comments();
        Ok(Self::comment_all_fields(toml_str, comments))
    }

    /// Collect all field comments from struct constants into a map
    fn collect_all_comments() -> HashMap<String, String> {
        let mut comments = HashMap::new();

        for (field, comment) in APP_COMMENTS {
            comments.insert(field.to_string(), comment.to_string());
        }
        for (field, comment) in CHART_COMMENTS {
            comments.insert(format!("chart.{}", field), comment.to_string());
        }
        for (field, comment) in TICK_COMMENTS {
            comments.insert(format!("ticks.{}", field), comment.to_string());
        }
        for (field, comment) in LAYOUT_COMMENTS {
            comments.insert(format!("layout.{}", field), comment.to_string());
        }
        for (field, comment) in COLOR_COMMENTS {
            comments.insert(format!("theme.colors.{}", field), comment.to_string());
        }
        for (field, comment) in LOGGING_COMMENTS {
            comments.insert(format!("logging.{}", field), comment.to_string());
        }

        comments
    }

    /// Comment out all fields in TOML and add comments
    fn comment_all_fields(toml: String, comments: HashMap<String, String>) -> String {
        let mut result = String::new();
        result.push_str("# chartslot configuration file\n");
        result
            .push_str("# This file uses TOML format. See https://toml.io/ for syntax reference.\n");
        result.push('\n');

        let mut current_section = String::new();

        for line in toml.lines() {
            if let Some(section) = Self::extract_section_name(line) {
                current_section = section.clone();

                if let Some(header) = SECTION_HEADERS.iter().find(|(s, _)| s == &section) {
                    result.push_str(header.1);
                    result.push('\n');
                }

                result.push_str("# ");
                result.push_str(line);
                result.push('\n');
                continue;
            }

            if let Some(field_path) = Self::extract_field_path_simple(line, &current_section) {
                if let Some(comment) = comments.get(&field_path) {
                    for comment_line in comment.lines() {
                        result.push_str("# ");
                        result.push_str(comment_line);
                        result.push('\n');
                    }
                }

                result.push_str("# ");
                result.push_str(line);
                result.push('\n');
            } else {
                result.push_str(line);
                result.push('\n');
            }
        }

        result
    }

    /// Extract section name from TOML line like "[chart]" or "[theme.colors]"
    fn extract_section_name(line: &str) -> Option<String> {
        let trimmed = line.trim();
        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            Some(trimmed[1..trimmed.len() - 1].to_string())
        } else {
            None
        }
    }

    /// Extract field path from a line (e.g. "escape_tick_threshold = 20" in [chart])
    fn extract_field_path_simple(line: &str, current_section: &str) -> Option<String> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('[') {
            return None;
        }

        let eq_pos = trimmed.find('=')?;
        let field_name = trimmed[..eq_pos].trim();
        if current_section.is_empty() {
            Some(field_name.to_string())
        } else {
            Some(format!("{}.{}", current_section, field_name))
        }
    }

    /// Write default configuration to config file
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let config_path = self.config_path("config.toml");

        if config_path.exists() && !force {
            return Err(eyre!(
                "Config file already exists at {}. Use --force to overwrite.",
                config_path.display()
            ));
        }

        self.ensure_config_dir()?;

        let template = self.generate_default_config()?;
        std::fs::write(&config_path, template)?;

        Ok(config_path)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration format version (for future compatibility)
    pub version: String,
    pub chart: ChartConfig,
    pub ticks: TickConfig,
    pub layout: LayoutConfig,
    pub theme: ThemeConfig,
    pub logging: LoggingConfig,
}

const APP_COMMENTS: &[(&str, &str)] = &[(
    "version",
    "Configuration format version (for future compatibility)",
)];

const SECTION_HEADERS: &[(&str, &str)] = &[
    (
        "chart",
        "# ============================================================================\n# Chart Interaction\n# ============================================================================",
    ),
    (
        "ticks",
        "# ============================================================================\n# Histogram Tick Labels\n# ============================================================================",
    ),
    (
        "layout",
        "# ============================================================================\n# Chart Size Classes (pixels)\n# ============================================================================",
    ),
    (
        "theme.colors",
        "# ============================================================================\n# Color Theme\n# ============================================================================\n# Supported formats:\n#   - Named colors: \"red\", \"steel_blue\", \"dark_gray\", etc. (case-insensitive)\n#   - Hex colors: \"#ff0000\" or \"#FF0000\" (case-insensitive)",
    ),
    (
        "logging",
        "# ============================================================================\n# Logging\n# ============================================================================",
    ),
];

pub const DEFAULT_ESCAPE_TICK_THRESHOLD: usize = 20;
pub const DEFAULT_HOVER_PLACEMENT_THRESHOLD_PX: f64 = 800.0;
pub const DEFAULT_BAR_HALF_WIDTH: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Histogram tick labels rotate once the axis has more ticks than this.
    pub escape_tick_threshold: usize,
    /// Flyouts open to the left when the pointer enters right of this x coordinate.
    pub hover_placement_threshold_px: f64,
    /// Half the width of a histogram bar, in axis units.
    pub bar_half_width: f64,
}

const CHART_COMMENTS: &[(&str, &str)] = &[
    (
        "escape_tick_threshold",
        "Rotate histogram tick labels (315 degrees) when there are more ticks than this",
    ),
    (
        "hover_placement_threshold_px",
        "Pointer x position (pixels) past which chart flyouts open to the left instead of the right",
    ),
    (
        "bar_half_width",
        "Half width of a histogram bar in axis units. Drag selections pick every bar they overlap",
    ),
];

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            escape_tick_threshold: DEFAULT_ESCAPE_TICK_THRESHOLD,
            hover_placement_threshold_px: DEFAULT_HOVER_PLACEMENT_THRESHOLD_PX,
            bar_half_width: DEFAULT_BAR_HALF_WIDTH,
        }
    }
}

impl ChartConfig {
    pub fn merge(&mut self, other: Self) {
        let default = ChartConfig::default();
        if other.escape_tick_threshold != default.escape_tick_threshold {
            self.escape_tick_threshold = other.escape_tick_threshold;
        }
        if other.hover_placement_threshold_px != default.hover_placement_threshold_px {
            self.hover_placement_threshold_px = other.hover_placement_threshold_px;
        }
        if other.bar_half_width != default.bar_half_width {
            self.bar_half_width = other.bar_half_width;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Values at or above this magnitude are written in scientific form.
    pub scientific_threshold: f64,
    /// Values needing more significant digits than this are written in scientific form.
    pub max_significant_digits: usize,
}

const TICK_COMMENTS: &[(&str, &str)] = &[
    (
        "scientific_threshold",
        "Numeric bin boundaries with an absolute value at or above this are shown as m×10^e",
    ),
    (
        "max_significant_digits",
        "Boundaries that need more significant digits than this are also shown as m×10^e (1-17)",
    ),
];

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            scientific_threshold: 1e6,
            max_significant_digits: 6,
        }
    }
}

impl TickConfig {
    pub fn merge(&mut self, other: Self) {
        let default = TickConfig::default();
        if other.scientific_threshold != default.scientific_threshold {
            self.scientific_threshold = other.scientific_threshold;
        }
        if other.max_significant_digits != default.max_significant_digits {
            self.max_significant_digits = other.max_significant_digits;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub width_one: u32,
    pub width_two: u32,
    pub height_one: u32,
    pub height_two: u32,
}

const LAYOUT_COMMENTS: &[(&str, &str)] = &[
    ("width_one", "Width of single-column charts (pie, table, histogram)"),
    ("width_two", "Width of double-column charts"),
    ("height_one", "Height of single-row charts (pie, table)"),
    ("height_two", "Height of double-row charts (histogram)"),
];

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width_one: 195,
            width_two: 400,
            height_one: 195,
            height_two: 380,
        }
    }
}

impl LayoutConfig {
    pub fn merge(&mut self, other: Self) {
        let default = LayoutConfig::default();
        if other.width_one != default.width_one {
            self.width_one = other.width_one;
        }
        if other.width_two != default.width_two {
            self.width_two = other.width_two;
        }
        if other.height_one != default.height_one {
            self.height_one = other.height_one;
        }
        if other.height_two != default.height_two {
            self.height_two = other.height_two;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    pub colors: ColorConfig,
}

impl ThemeConfig {
    pub fn merge(&mut self, other: Self) {
        self.colors.merge(other.colors);
    }
}

/// Colors used by the chart renderers.
///
/// - `selected_group` / `unselected_group`: bars, slices and rows matching or not matching the
///   active filters
/// - `na_group`: analysis-group color for samples or patients without a group
/// - `axis`, `text`, `background`: chart chrome
/// - `chart_series_color_1..7`: palette for pie slices and analysis groups without a color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub selected_group: String,
    pub unselected_group: String,
    pub na_group: String,
    pub axis: String,
    pub text: String,
    pub background: String,
    pub chart_series_color_1: String,
    pub chart_series_color_2: String,
    pub chart_series_color_3: String,
    pub chart_series_color_4: String,
    pub chart_series_color_5: String,
    pub chart_series_color_6: String,
    pub chart_series_color_7: String,
}

const COLOR_COMMENTS: &[(&str, &str)] = &[
    ("selected_group", "Fill for bars and slices matching an active filter"),
    ("unselected_group", "Fill for bars and slices not matching any filter"),
    ("na_group", "Color for samples or patients without an analysis group"),
    ("axis", "Axis lines and tick marks"),
    ("text", "Labels and titles"),
    ("background", "Chart background"),
    (
        "chart_series_color_1",
        "Series palette (1-7) for pie slices and analysis groups without their own color",
    ),
];

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            selected_group: "#2986e2".to_string(),
            unselected_group: "#cccccc".to_string(),
            na_group: "#d3d3d3".to_string(),
            axis: "#666666".to_string(),
            text: "#333333".to_string(),
            background: "white".to_string(),
            chart_series_color_1: "#2986e2".to_string(),
            chart_series_color_2: "#dc3912".to_string(),
            chart_series_color_3: "#f88508".to_string(),
            chart_series_color_4: "#109618".to_string(),
            chart_series_color_5: "#990099".to_string(),
            chart_series_color_6: "#0099c6".to_string(),
            chart_series_color_7: "#dd4477".to_string(),
        }
    }
}

impl ColorConfig {
    /// (name, value) for every color field, in declaration order
    fn entries(&self) -> [(&'static str, &str); 13] {
        [
            ("selected_group", self.selected_group.as_str()),
            ("unselected_group", self.unselected_group.as_str()),
            ("na_group", self.na_group.as_str()),
            ("axis", self.axis.as_str()),
            ("text", self.text.as_str()),
            ("background", self.background.as_str()),
            ("chart_series_color_1", self.chart_series_color_1.as_str()),
            ("chart_series_color_2", self.chart_series_color_2.as_str()),
            ("chart_series_color_3", self.chart_series_color_3.as_str()),
            ("chart_series_color_4", self.chart_series_color_4.as_str()),
            ("chart_series_color_5", self.chart_series_color_5.as_str()),
            ("chart_series_color_6", self.chart_series_color_6.as_str()),
            ("chart_series_color_7", self.chart_series_color_7.as_str()),
        ]
    }

    /// Validate all color strings can be parsed
    fn validate(&self, parser: &ColorParser) -> Result<()> {
        for (name, value) in self.entries() {
            parser.parse(value).map_err(|e| {
                eyre!(
                    "theme.colors.{}: {}. Use a valid color name (e.g. red, steel_blue) or hex (#rrggbb)",
                    name,
                    e
                )
            })?;
        }
        Ok(())
    }

    pub fn merge(&mut self, other: Self) {
        let default = ColorConfig::default();

        macro_rules! merge_color {
            ($($field:ident),*) => {
                $(
                    if other.$field != default.$field {
                        self.$field = other.$field;
                    }
                )*
            };
        }

        merge_color!(
            selected_group,
            unselected_group,
            na_group,
            axis,
            text,
            background,
            chart_series_color_1,
            chart_series_color_2,
            chart_series_color_3,
            chart_series_color_4,
            chart_series_color_5,
            chart_series_color_6,
            chart_series_color_7
        );
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
}

const LOGGING_COMMENTS: &[(&str, &str)] = &[(
    "filter",
    "Default tracing filter directive (RUST_LOG and --log-filter take precedence). Example: chartslot=debug",
)];

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn merge(&mut self, other: Self) {
        if other.filter != LoggingConfig::default().filter {
            self.filter = other.filter;
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            chart: ChartConfig::default(),
            ticks: TickConfig::default(),
            layout: LayoutConfig::default(),
            theme: ThemeConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// Configuration loading and merging
impl AppConfig {
    /// Load configuration from all layers (default → user)
    pub fn load(app_name: &str) -> Result<Self> {
        let manager = ConfigManager::new(app_name)?;
        Self::load_from(&manager)
    }

    /// Load from a specific config directory; a missing file yields defaults
    pub fn load_from(manager: &ConfigManager) -> Result<Self> {
        let config_path = manager.config_path("config.toml");
        let mut config = AppConfig::default();
        config.merge(Self::load_user_config(&config_path)?);

        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration in {}: {}", config_path.display(), e))?;

        Ok(config)
    }

    fn load_user_config(config_path: &Path) -> Result<AppConfig> {
        if !config_path.exists() {
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(config_path).map_err(|e| {
            eyre!(
                "Failed to read config file at {}: {}",
                config_path.display(),
                e
            )
        })?;

        toml::from_str(&content).map_err(|e| {
            eyre!(
                "Failed to parse config file at {}: {}",
                config_path.display(),
                e
            )
        })
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: AppConfig) {
        if other.version != AppConfig::default().version {
            self.version = other.version;
        }

        self.chart.merge(other.chart);
        self.ticks.merge(other.ticks);
        self.layout.merge(other.layout);
        self.theme.merge(other.theme);
        self.logging.merge(other.logging);
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.version.starts_with("0.1") {
            return Err(eyre!(
                "Unsupported config version: {}. Expected 0.1.x",
                self.version
            ));
        }

        let hover = self.chart.hover_placement_threshold_px;
        if !hover.is_finite() || hover < 0.0 {
            return Err(eyre!(
                "chart.hover_placement_threshold_px must be a non-negative number, got {}",
                hover
            ));
        }

        let half = self.chart.bar_half_width;
        if !(half > 0.0 && half <= 0.5) {
            return Err(eyre!(
                "chart.bar_half_width must be in (0, 0.5], got {}",
                half
            ));
        }

        let threshold = self.ticks.scientific_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(eyre!(
                "ticks.scientific_threshold must be greater than 0, got {}",
                threshold
            ));
        }

        if !(1..=17).contains(&self.ticks.max_significant_digits) {
            return Err(eyre!(
                "ticks.max_significant_digits must be between 1 and 17, got {}",
                self.ticks.max_significant_digits
            ));
        }

        let l = &self.layout;
        if [l.width_one, l.width_two, l.height_one, l.height_two].contains(&0) {
            return Err(eyre!("layout sizes must be greater than 0"));
        }

        let parser = ColorParser::new();
        self.theme.colors.validate(&parser)?;

        Ok(())
    }
}

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Components scaled to 0.0-1.0 (PostScript setrgbcolor)
    pub fn to_unit(self) -> (f64, f64, f64) {
        (
            self.0 as f64 / 255.0,
            self.1 as f64 / 255.0,
            self.2 as f64 / 255.0,
        )
    }
}

/// Parses config color strings
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorParser;

impl ColorParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a color string (hex or named)
    pub fn parse(&self, s: &str) -> Result<Rgb> {
        let trimmed = s.trim();

        if trimmed.starts_with('#') {
            let (r, g, b) = parse_hex(trimmed)?;
            return Ok(Rgb(r, g, b));
        }

        let lower = trimmed.to_lowercase().replace(' ', "_");
        match lower.as_str() {
            "black" => Ok(Rgb(0, 0, 0)),
            "white" => Ok(Rgb(255, 255, 255)),
            "red" => Ok(Rgb(220, 57, 18)),
            "green" => Ok(Rgb(16, 150, 24)),
            "blue" => Ok(Rgb(51, 102, 204)),
            "yellow" => Ok(Rgb(255, 153, 0)),
            "magenta" | "purple" => Ok(Rgb(153, 0, 153)),
            "cyan" => Ok(Rgb(0, 153, 198)),
            "orange" => Ok(Rgb(248, 133, 8)),
            "steel_blue" => Ok(Rgb(70, 130, 180)),
            "gray" | "grey" => Ok(Rgb(128, 128, 128)),
            "dark_gray" | "dark_grey" => Ok(Rgb(102, 102, 102)),
            "light_gray" | "light_grey" => Ok(Rgb(211, 211, 211)),
            _ => Err(eyre!(
                "Unknown color name: '{}'. Supported: basic color names (red, blue, gray, etc.) \
                 or hex colors (#ff0000)",
                trimmed
            )),
        }
    }
}

/// Parse hex color string (#ff0000) to RGB components
fn parse_hex(s: &str) -> Result<(u8, u8, u8)> {
    if !s.starts_with('#') || s.len() != 7 || !s.is_ascii() {
        return Err(eyre!(
            "Invalid hex color format: '{}'. Expected format: #rrggbb",
            s
        ));
    }

    let r = u8::from_str_radix(&s[1..3], 16)
        .map_err(|_| eyre!("Invalid red component in hex color: {}", s))?;
    let g = u8::from_str_radix(&s[3..5], 16)
        .map_err(|_| eyre!("Invalid green component in hex color: {}", s))?;
    let b = u8::from_str_radix(&s[5..7], 16)
        .map_err(|_| eyre!("Invalid blue component in hex color: {}", s))?;

    Ok((r, g, b))
}

/// Theme containing parsed colors ready for use
#[derive(Debug, Clone)]
pub struct Theme {
    pub colors: HashMap<String, Rgb>,
    series: Vec<Rgb>,
}

impl Theme {
    /// Create a Theme from a ThemeConfig by parsing all color strings
    pub fn from_config(config: &ThemeConfig) -> Result<Self> {
        let parser = ColorParser::new();
        let mut colors = HashMap::new();
        let mut series = Vec::new();

        for (name, value) in config.colors.entries() {
            let rgb = parser.parse(value)?;
            if name.starts_with("chart_series_color_") {
                series.push(rgb);
            }
            colors.insert(name.to_string(), rgb);
        }

        Ok(Self { colors, series })
    }

    /// Get a color by name, returns black if not found
    pub fn get(&self, name: &str) -> Rgb {
        self.colors.get(name).copied().unwrap_or(Rgb::BLACK)
    }

    /// Palette color for series `index`, cycling through the configured colors
    pub fn series_color(&self, index: usize) -> Rgb {
        if self.series.is_empty() {
            return Rgb::BLACK;
        }
        self.series[index % self.series.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::from_config(&ThemeConfig::default()).unwrap_or_else(|_| Theme {
            colors: HashMap::new(),
            series: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        AppConfig::default().validate().unwrap();
    }

    #[test]
    fn test_merge_takes_non_default_values() {
        let mut base = AppConfig::default();
        let mut user = AppConfig::default();
        user.chart.hover_placement_threshold_px = 1024.0;
        user.ticks.max_significant_digits = 4;
        user.theme.colors.selected_group = "#ff0000".to_string();
        base.merge(user);

        assert_eq!(base.chart.hover_placement_threshold_px, 1024.0);
        assert_eq!(base.chart.escape_tick_threshold, DEFAULT_ESCAPE_TICK_THRESHOLD);
        assert_eq!(base.ticks.max_significant_digits, 4);
        assert_eq!(base.theme.colors.selected_group, "#ff0000");
        assert_eq!(base.theme.colors.unselected_group, "#cccccc");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.ticks.scientific_threshold = 0.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.chart.bar_half_width = 0.75;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.theme.colors.axis = "not-a-color".to_string();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("theme.colors.axis"));

        let mut config = AppConfig::default();
        config.version = "2.0".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_colors() {
        let parser = ColorParser::new();
        assert_eq!(parser.parse("#2986E2").unwrap(), Rgb(0x29, 0x86, 0xe2));
        assert_eq!(parser.parse("Steel Blue").unwrap(), Rgb(70, 130, 180));
        assert!(parser.parse("#12345").is_err());
        assert!(parser.parse("#gg0000").is_err());
        assert_eq!(Rgb(255, 0, 16).to_hex(), "#ff0010");
    }

    #[test]
    fn test_theme_series_cycles() {
        let theme = Theme::default();
        assert_eq!(theme.series_color(0), theme.series_color(7));
        assert_eq!(theme.get("background"), Rgb(255, 255, 255));
        assert_eq!(theme.get("missing"), Rgb::BLACK);
    }

    #[test]
    fn test_generated_template_is_commented_toml() {
        let manager = ConfigManager::with_dir(PathBuf::from("/nonexistent"));
        let template = manager.generate_default_config().unwrap();
        assert!(template.contains("# [chart]"));
        assert!(template.contains("# escape_tick_threshold = 20"));
        assert!(template.contains("# Rotate histogram tick labels"));

        // Every field is commented out, so the template parses to the defaults.
        let parsed: AppConfig = toml::from_str(&template).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }
}
