//! Color names to bar escape sequences.

use serde_derive::{Deserialize, Serialize};
use std::str::FromStr;

/// How the target bar understands colors.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    /// No colors at all.
    Plain,
    /// ANSI SGR sequences, for terminals.
    Ansi,
    /// tmux status line `#[...]` styles.
    Tmux,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown palette '{0}', expected one of plain, ansi, tmux")]
pub struct UnknownPalette(String);

impl FromStr for Palette {
    type Err = UnknownPalette;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "ansi" => Ok(Self::Ansi),
            "tmux" => Ok(Self::Tmux),
            other => Err(UnknownPalette(other.to_string())),
        }
    }
}

impl Palette {
    /// Sequence switching the foreground to `name`. Unknown names yield nothing.
    pub fn color(self, name: &str) -> String {
        match self {
            Self::Plain => String::new(),
            Self::Ansi => match ansi_code(name) {
                Some(code) => format!("\x1b[{}m", code),
                None => unknown(name),
            },
            Self::Tmux => match tmux_name(name) {
                Some(color) => format!("#[fg={}]", color),
                None => unknown(name),
            },
        }
    }

    pub fn reset(self) -> String {
        match self {
            Self::Plain => String::new(),
            Self::Ansi => "\x1b[0m".to_string(),
            Self::Tmux => "#[default]".to_string(),
        }
    }
}

fn unknown(name: &str) -> String {
    log::warn!("unknown color name '{}'", name);
    String::new()
}

fn ansi_code(name: &str) -> Option<u8> {
    let code = match name {
        "default" => 39,
        "black" => 30,
        "red" => 31,
        "green" => 32,
        "brown" => 33,
        "blue" => 34,
        "magenta" => 35,
        "cyan" => 36,
        "gray" | "grey" => 37,
        "darkgray" | "darkgrey" => 90,
        "lightred" => 91,
        "lightgreen" => 92,
        "yellow" => 93,
        "lightblue" => 94,
        "lightmagenta" => 95,
        "lightcyan" => 96,
        "white" => 97,
        _ => return None,
    };
    Some(code)
}

fn tmux_name(name: &str) -> Option<&'static str> {
    let color = match name {
        "default" => "default",
        "black" => "black",
        "red" => "red",
        "green" => "green",
        "brown" => "yellow",
        "blue" => "blue",
        "magenta" => "magenta",
        "cyan" => "cyan",
        "gray" | "grey" => "white",
        "darkgray" | "darkgrey" => "brightblack",
        "lightred" => "brightred",
        "lightgreen" => "brightgreen",
        "yellow" => "brightyellow",
        "lightblue" => "brightblue",
        "lightmagenta" => "brightmagenta",
        "lightcyan" => "brightcyan",
        "white" => "brightwhite",
        _ => return None,
    };
    Some(color)
}
