//! Keyboard-shortcut commands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::Enablement;
use crate::error::SheetlightError;
use crate::zoom::ZoomDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    ToggleRow,
    ToggleColumn,
    ToggleBoth,
    CycleZoomOut,
    CycleZoomIn,
}

/// What running a command asks the caller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Persist and broadcast the new enablement, then redraw
    Enablement(Enablement),
    /// Hand the step to the zoom driver
    Zoom(ZoomDirection),
}

impl Command {
    pub const ALL: [Self; 5] = [
        Self::ToggleRow,
        Self::ToggleColumn,
        Self::ToggleBoth,
        Self::CycleZoomOut,
        Self::CycleZoomIn,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ToggleRow => "toggleRow",
            Self::ToggleColumn => "toggleColumn",
            Self::ToggleBoth => "toggleBoth",
            Self::CycleZoomOut => "cycleZoomOut",
            Self::CycleZoomIn => "cycleZoomIn",
        }
    }

    /// Apply the command to the current enablement.
    ///
    /// `toggleBoth` turns both bands off if either is on, else both on.
    pub fn apply(self, current: Enablement) -> CommandOutcome {
        match self {
            Self::ToggleRow => CommandOutcome::Enablement(Enablement {
                row: !current.row,
                ..current
            }),
            Self::ToggleColumn => CommandOutcome::Enablement(Enablement {
                column: !current.column,
                ..current
            }),
            Self::ToggleBoth => {
                let on = !(current.row || current.column);
                CommandOutcome::Enablement(Enablement { row: on, column: on })
            }
            Self::CycleZoomOut => CommandOutcome::Zoom(ZoomDirection::Out),
            Self::CycleZoomIn => CommandOutcome::Zoom(ZoomDirection::In),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = SheetlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.name() == s)
            .ok_or_else(|| SheetlightError::Message(format!("unknown command: {s}")))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn enablement(row: bool, column: bool) -> Enablement {
        Enablement { row, column }
    }

    #[test]
    fn toggle_both_turns_off_when_either_is_on() {
        for current in [enablement(true, false), enablement(false, true), enablement(true, true)] {
            assert_eq!(
                Command::ToggleBoth.apply(current),
                CommandOutcome::Enablement(enablement(false, false))
            );
        }
        assert_eq!(
            Command::ToggleBoth.apply(enablement(false, false)),
            CommandOutcome::Enablement(enablement(true, true))
        );
    }

    #[test]
    fn single_toggles_flip_one_flag() {
        assert_eq!(
            Command::ToggleRow.apply(enablement(true, false)),
            CommandOutcome::Enablement(enablement(false, false))
        );
        assert_eq!(
            Command::ToggleColumn.apply(enablement(true, false)),
            CommandOutcome::Enablement(enablement(true, true))
        );
    }

    #[test]
    fn names_parse_back() {
        for command in Command::ALL {
            assert_eq!(command.to_string().parse::<Command>().unwrap(), command);
        }
        assert!("toggleEverything".parse::<Command>().is_err());
    }

    #[test]
    fn zoom_commands_route_to_driver() {
        assert_eq!(
            Command::CycleZoomIn.apply(Enablement::default()),
            CommandOutcome::Zoom(ZoomDirection::In)
        );
    }
}
