//! Styles for the stencil CLI.
//!
//! Code asks for styles by what the text means (a status, a timestamp, an id),
//! never by color, so the palette can change in one place. `console` drops the
//! escape codes on its own when stdout is not a terminal.

use console::Style;
use stencilapp::model::TemplateStatus;

pub fn title() -> Style {
    Style::new().bold()
}

pub fn id() -> Style {
    Style::new().yellow()
}

pub fn time() -> Style {
    Style::new().color256(247).italic()
}

pub fn muted() -> Style {
    Style::new().dim()
}

pub fn tag() -> Style {
    Style::new().cyan()
}

pub fn success() -> Style {
    Style::new().green()
}

pub fn failure() -> Style {
    Style::new().red()
}

pub fn status(status: TemplateStatus) -> Style {
    match status {
        TemplateStatus::Draft => Style::new().color256(247),
        TemplateStatus::Active => Style::new().green(),
        TemplateStatus::Archived => Style::new().red().dim(),
    }
}
