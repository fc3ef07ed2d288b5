use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ratatui::style::Color;

use crate::highlight::Background;

/// Document shown by `palace explain` unless `--file` overrides it.
pub const DEFAULT_DOCUMENT_PATH: &str = "docs/explain.md";
pub const DEFAULT_WRAP_WIDTH: u16 = 76;
pub const DEFAULT_SCALE_PERCENT: u16 = 80;
const MIN_SCALE_PERCENT: u16 = 10;
const MAX_SCALE_PERCENT: u16 = 100;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    /// Pick a concrete background; `Auto` reads the terminal's `COLORFGBG` hint.
    pub fn resolve(self, colorfgbg: Option<&str>) -> Background {
        match self {
            Self::Auto => Background::from_colorfgbg(colorfgbg),
            Self::Light => Background::Light,
            Self::Dark => Background::Dark,
        }
    }
}

/// Immutable presentation settings handed to the layout composer and the
/// markdown renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Foreground of the outer rounded border
    pub border_color: Color,
    /// Foreground of the header title
    pub title_color: Color,
    /// Foreground of the footer scroll/key-hint label
    pub info_color: Color,
    /// Columns between the outer border and the content on each side
    pub box_padding_x: u16,
    /// Rows between the outer border and the content on each side
    pub box_padding_y: u16,
    /// Columns between a header/footer label border and its text
    pub label_padding_x: u16,
    /// Cells taken off the scaled box in both directions for the viewport
    pub viewport_padding: u16,
    /// Share of the terminal the box occupies, in percent
    pub scale_percent: u16,
    /// Column at which the renderer wraps document text
    pub wrap_width: u16,
    /// Terminal background the document palette is chosen for
    pub background: Background,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            border_color: Color::Indexed(63),
            title_color: Color::Indexed(212),
            info_color: Color::Indexed(241),
            box_padding_x: 2,
            box_padding_y: 1,
            label_padding_x: 1,
            viewport_padding: 4,
            scale_percent: DEFAULT_SCALE_PERCENT,
            wrap_width: DEFAULT_WRAP_WIDTH,
            background: Background::Dark,
        }
    }
}

impl LayoutConfig {
    /// Apply saved/command-line flags on top of the defaults.
    pub fn from_flags(flags: &ConfigFlags, colorfgbg: Option<&str>) -> Self {
        let defaults = Self::default();
        Self {
            scale_percent: flags.scale.unwrap_or(defaults.scale_percent),
            wrap_width: flags.wrap_width.unwrap_or(defaults.wrap_width),
            background: flags.theme.unwrap_or(ThemeMode::Auto).resolve(colorfgbg),
            ..defaults
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub file: Option<PathBuf>,
    pub wrap_width: Option<u16>,
    pub scale: Option<u16>,
    pub theme: Option<ThemeMode>,
    pub no_mouse: bool,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            file: other.file.clone().or_else(|| self.file.clone()),
            wrap_width: other.wrap_width.or(self.wrap_width),
            scale: other.scale.or(self.scale),
            theme: other.theme.or(self.theme),
            no_mouse: self.no_mouse || other.no_mouse,
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }

    /// Document path after applying `--file`.
    pub fn document_path(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT_PATH))
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("palace").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("palace")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("palace").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("palace").join("config");
        }
    }

    PathBuf::from(".palacerc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".palacerc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Write `flags` as one flag per line.
///
/// # Errors
///
/// Fails without touching `path` when a saved path contains whitespace or is
/// not UTF-8, since [`load_config_flags`] splits lines on whitespace and could
/// not read it back.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# palace defaults (saved with --save)".to_string());
    if let Some(file) = &flags.file {
        lines.push(format!("--file {}", savable_path("--file", file)?));
    }
    if let Some(width) = flags.wrap_width {
        lines.push(format!("--wrap-width {width}"));
    }
    if let Some(scale) = flags.scale {
        lines.push(format!("--scale {scale}"));
    }
    if let Some(theme) = flags.theme {
        let theme_str = match theme {
            ThemeMode::Auto => "auto",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        };
        lines.push(format!("--theme {theme_str}"));
    }
    if flags.no_mouse {
        lines.push("--no-mouse".to_string());
    }
    if let Some(log_file) = &flags.log_file {
        lines.push(format!("--log-file {}", savable_path("--log-file", log_file)?));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

fn savable_path<'a>(flag: &str, path: &'a Path) -> Result<&'a str> {
    let Some(text) = path.to_str() else {
        anyhow::bail!("Cannot save {flag}: {} is not valid UTF-8", path.display());
    };
    if text.chars().any(char::is_whitespace) {
        anyhow::bail!("Cannot save {flag}: \"{text}\" contains whitespace");
    }
    Ok(text)
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pull the flags palace understands out of a token list.
///
/// Both `--flag value` and `--flag=value` spellings are accepted. Unknown
/// tokens (the program name, the subcommand, `--save`) are skipped, and a
/// value that does not parse leaves the flag unset.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };

        if name == "--no-mouse" {
            flags.no_mouse = true;
            i += 1;
            continue;
        }
        if !matches!(
            name,
            "--file" | "--wrap-width" | "--scale" | "--theme" | "--log-file"
        ) {
            i += 1;
            continue;
        }

        let value = match inline_value {
            Some(value) => Some(value),
            None => {
                i += 1;
                tokens.get(i).map(String::as_str)
            }
        };
        if let Some(value) = value {
            match name {
                "--file" => flags.file = Some(PathBuf::from(value)),
                "--wrap-width" => flags.wrap_width = parse_wrap_width(value),
                "--scale" => flags.scale = parse_scale(value),
                "--theme" => flags.theme = parse_theme(value),
                "--log-file" => flags.log_file = Some(PathBuf::from(value)),
                _ => {}
            }
        }
        i += 1;
    }
    flags
}

/// Lenient `--wrap-width` value: anything that is not a column count is dropped.
pub fn parse_wrap_width(s: &str) -> Option<u16> {
    s.trim().parse().ok()
}

/// Lenient `--scale` value: a percentage between 10 and 100, else dropped.
pub fn parse_scale(s: &str) -> Option<u16> {
    s.trim()
        .parse::<u16>()
        .ok()
        .filter(|p| (MIN_SCALE_PERCENT..=MAX_SCALE_PERCENT).contains(p))
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s {
        "auto" => Some(ThemeMode::Auto),
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = tokens(&[
            "palace",
            "explain",
            "--wrap-width",
            "60",
            "--scale=90",
            "--theme",
            "light",
            "--no-mouse",
            "--file=notes/loci.md",
            "--log-file",
            "palace.log",
        ]);
        let flags = parse_flag_tokens(&args);
        assert_eq!(flags.wrap_width, Some(60));
        assert_eq!(flags.scale, Some(90));
        assert_eq!(flags.theme, Some(ThemeMode::Light));
        assert!(flags.no_mouse);
        assert_eq!(flags.file, Some(PathBuf::from("notes/loci.md")));
        assert_eq!(flags.log_file, Some(PathBuf::from("palace.log")));
    }

    #[test]
    fn test_parse_flag_tokens_ignores_bad_values() {
        let args = tokens(&["--wrap-width", "wide", "--scale", "150", "--theme", "neon"]);
        let flags = parse_flag_tokens(&args);
        assert_eq!(flags, ConfigFlags::default());
    }

    #[test]
    fn test_parse_flag_tokens_keeps_zero_wrap_width_for_the_renderer_to_reject() {
        let flags = parse_flag_tokens(&tokens(&["--wrap-width=0"]));
        assert_eq!(flags.wrap_width, Some(0));
    }

    #[test]
    fn test_flag_without_value_at_end_is_ignored() {
        let flags = parse_flag_tokens(&tokens(&["--file"]));
        assert!(flags.file.is_none());
    }

    #[test]
    fn test_config_union_prefers_later_values() {
        let file = ConfigFlags {
            wrap_width: Some(70),
            theme: Some(ThemeMode::Light),
            no_mouse: true,
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            scale: Some(60),
            theme: Some(ThemeMode::Dark),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert_eq!(merged.wrap_width, Some(70));
        assert_eq!(merged.scale, Some(60));
        assert_eq!(merged.theme, Some(ThemeMode::Dark));
        assert!(merged.no_mouse);
    }

    #[test]
    fn test_document_path_defaults_to_explain_doc() {
        assert_eq!(
            ConfigFlags::default().document_path(),
            PathBuf::from("docs/explain.md")
        );
    }

    #[test]
    fn test_layout_config_defaults_match_explain_view() {
        let config = LayoutConfig::default();
        assert_eq!(config.scale_percent, 80);
        assert_eq!(config.wrap_width, 76);
        assert_eq!(config.viewport_padding, 4);
        assert_eq!(config.border_color, Color::Indexed(63));
        assert_eq!(config.title_color, Color::Indexed(212));
        assert_eq!(config.info_color, Color::Indexed(241));
    }

    #[test]
    fn test_layout_config_from_flags() {
        let flags = ConfigFlags {
            wrap_width: Some(50),
            scale: Some(100),
            theme: Some(ThemeMode::Light),
            ..ConfigFlags::default()
        };
        let config = LayoutConfig::from_flags(&flags, Some("15;0"));
        assert_eq!(config.wrap_width, 50);
        assert_eq!(config.scale_percent, 100);
        assert_eq!(config.background, Background::Light);
    }

    #[test]
    fn test_auto_theme_follows_colorfgbg() {
        assert_eq!(ThemeMode::Auto.resolve(Some("0;15")), Background::Light);
        assert_eq!(ThemeMode::Auto.resolve(Some("15;0")), Background::Dark);
        assert_eq!(ThemeMode::Auto.resolve(None), Background::Dark);
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("palace").join("config");
        let flags = ConfigFlags {
            file: Some(PathBuf::from("docs/other.md")),
            wrap_width: Some(72),
            scale: Some(70),
            theme: Some(ThemeMode::Dark),
            no_mouse: true,
            log_file: Some(PathBuf::from("palace.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_save_refuses_paths_with_whitespace() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        for flags in [
            ConfigFlags {
                file: Some(PathBuf::from("my notes/loci.md")),
                ..ConfigFlags::default()
            },
            ConfigFlags {
                log_file: Some(PathBuf::from("palace\tlog")),
                ..ConfigFlags::default()
            },
        ] {
            let err = save_config_flags(&path, &flags).unwrap_err();
            assert!(err.to_string().contains("whitespace"));
            assert!(!path.exists());
        }
    }

    #[test]
    fn test_missing_config_loads_defaults() {
        let dir = tempdir().unwrap();
        let flags = load_config_flags(&dir.path().join("absent")).unwrap();
        assert_eq!(flags, ConfigFlags::default());
    }
}
