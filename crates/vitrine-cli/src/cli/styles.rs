//! Terminal styles for the vitrine CLI.
//!
//! Code refers to styles by what they mark (an index, a favorite, a tag), never by
//! color. The palette is picked from the archive's `theme` preference, so the same
//! setting that a graphical client would use for its look also drives the terminal
//! output. Unknown theme names fall back to the dark palette.
//!
//! Colors are turned off automatically when stdout is not a terminal (`console`
//! handles the detection), which keeps piped output and test assertions plain.

use console::Style;
use vitrine::prefs::Theme;

#[derive(Debug, Clone)]
pub struct Styles {
    pub heading: Style,
    pub index: Style,
    pub title: Style,
    pub muted: Style,
    pub favorite: Style,
    pub tag: Style,
    pub success: Style,
    pub warning: Style,
}

impl Styles {
    pub fn for_theme(theme: &Theme) -> Self {
        match theme {
            Theme::Light => light(),
            _ => dark(),
        }
    }

    /// Styles that never emit escape codes.
    #[cfg(test)]
    pub fn plain() -> Self {
        Self {
            heading: Style::new(),
            index: Style::new(),
            title: Style::new(),
            muted: Style::new(),
            favorite: Style::new(),
            tag: Style::new(),
            success: Style::new(),
            warning: Style::new(),
        }
    }
}

fn light() -> Styles {
    Styles {
        heading: Style::new().black().bold(),
        index: Style::new().color256(136),
        title: Style::new().black(),
        muted: Style::new().color256(243),
        favorite: Style::new().color256(136).bold(),
        tag: Style::new().color256(24),
        success: Style::new().green(),
        warning: Style::new().yellow().bold(),
    }
}

fn dark() -> Styles {
    Styles {
        heading: Style::new().white().bold(),
        index: Style::new().color256(220),
        title: Style::new().white(),
        muted: Style::new().color256(249),
        favorite: Style::new().color256(220).bold(),
        tag: Style::new().cyan(),
        success: Style::new().green(),
        warning: Style::new().yellow().bold(),
    }
}
