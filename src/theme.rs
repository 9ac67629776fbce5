pub const LIGHT_THEMES: [&str; 5] = [
    "github-light",
    "solarized-light",
    "one-light",
    "catppuccin-latte",
    "rosepine-dawn",
];

/// Unknown theme ids are treated as dark.
pub fn is_dark_theme(theme: &str) -> bool {
    !LIGHT_THEMES.contains(&theme)
}
