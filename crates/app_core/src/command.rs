//! Command vocabulary for user actions
//!
//! Commands are addressed by dotted ids (`nav.next_item`). A command that
//! takes an argument carries it after a colon: `nav.go_to:3`.

use crate::AppError;
use std::fmt;
use std::str::FromStr;

/// Command identifiers
pub struct CommandId;

impl CommandId {
    // Navigation commands
    pub const NAV_NEXT_ITEM: &'static str = "nav.next_item";
    pub const NAV_PREV_ITEM: &'static str = "nav.prev_item";
    pub const NAV_FIRST_ITEM: &'static str = "nav.first_item";
    pub const NAV_LAST_ITEM: &'static str = "nav.last_item";
    pub const NAV_GO_TO: &'static str = "nav.go_to";

    // View commands
    pub const VIEW_TOGGLE_STORY: &'static str = "view.toggle_story";
    pub const VIEW_TOGGLE_ORIGINAL: &'static str = "view.toggle_original";
    pub const VIEW_TOGGLE_FULLSCREEN: &'static str = "view.toggle_fullscreen";

    // App commands
    pub const APP_EXIT: &'static str = "app.exit";
}

/// Operations on the gallery controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryCommand {
    Next,
    Previous,
    First,
    Last,
    GoTo(usize),
    ToggleStoryPanel,
    ToggleAlternate,
}

/// Any bindable command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Gallery(GalleryCommand),
    ToggleFullscreen,
    Exit,
}

impl Command {
    /// Canonical id, including the argument if any
    pub fn id(&self) -> String {
        match self {
            Command::Gallery(GalleryCommand::Next) => CommandId::NAV_NEXT_ITEM.to_string(),
            Command::Gallery(GalleryCommand::Previous) => CommandId::NAV_PREV_ITEM.to_string(),
            Command::Gallery(GalleryCommand::First) => CommandId::NAV_FIRST_ITEM.to_string(),
            Command::Gallery(GalleryCommand::Last) => CommandId::NAV_LAST_ITEM.to_string(),
            Command::Gallery(GalleryCommand::GoTo(index)) => {
                format!("{}:{}", CommandId::NAV_GO_TO, index)
            }
            Command::Gallery(GalleryCommand::ToggleStoryPanel) => {
                CommandId::VIEW_TOGGLE_STORY.to_string()
            }
            Command::Gallery(GalleryCommand::ToggleAlternate) => {
                CommandId::VIEW_TOGGLE_ORIGINAL.to_string()
            }
            Command::ToggleFullscreen => CommandId::VIEW_TOGGLE_FULLSCREEN.to_string(),
            Command::Exit => CommandId::APP_EXIT.to_string(),
        }
    }

    pub fn as_gallery(&self) -> Option<GalleryCommand> {
        match self {
            Command::Gallery(cmd) => Some(*cmd),
            _ => None,
        }
    }
}

impl From<GalleryCommand> for Command {
    fn from(cmd: GalleryCommand) -> Self {
        Command::Gallery(cmd)
    }
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg.trim())),
            None => (s, None),
        };

        let unknown = || AppError::UnknownCommand(s.to_string());

        let cmd = match (name, arg) {
            (CommandId::NAV_NEXT_ITEM, None) => GalleryCommand::Next.into(),
            (CommandId::NAV_PREV_ITEM, None) => GalleryCommand::Previous.into(),
            (CommandId::NAV_FIRST_ITEM, None) => GalleryCommand::First.into(),
            (CommandId::NAV_LAST_ITEM, None) => GalleryCommand::Last.into(),
            (CommandId::NAV_GO_TO, Some(index)) => {
                let index = index.parse::<usize>().map_err(|_| unknown())?;
                GalleryCommand::GoTo(index).into()
            }
            (CommandId::VIEW_TOGGLE_STORY, None) => GalleryCommand::ToggleStoryPanel.into(),
            (CommandId::VIEW_TOGGLE_ORIGINAL, None) => GalleryCommand::ToggleAlternate.into(),
            (CommandId::VIEW_TOGGLE_FULLSCREEN, None) => Command::ToggleFullscreen,
            (CommandId::APP_EXIT, None) => Command::Exit,
            _ => return Err(unknown()),
        };

        Ok(cmd)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!("nav.next_item".parse::<Command>().unwrap(), Command::Gallery(GalleryCommand::Next));
        assert_eq!("nav.prev_item".parse::<Command>().unwrap(), Command::Gallery(GalleryCommand::Previous));
        assert_eq!(" view.toggle_story ".parse::<Command>().unwrap(), Command::Gallery(GalleryCommand::ToggleStoryPanel));
        assert_eq!("app.exit".parse::<Command>().unwrap(), Command::Exit);
    }

    #[test]
    fn test_parse_go_to() {
        assert_eq!("nav.go_to:4".parse::<Command>().unwrap(), Command::Gallery(GalleryCommand::GoTo(4)));
        assert!("nav.go_to".parse::<Command>().is_err());
        assert!("nav.go_to:-1".parse::<Command>().is_err());
        assert!("nav.next_item:2".parse::<Command>().is_err());
    }

    #[test]
    fn test_unknown_command() {
        match "file.delete".parse::<Command>() {
            Err(AppError::UnknownCommand(id)) => assert_eq!(id, "file.delete"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_id_matches_parse() {
        let commands = [
            Command::Gallery(GalleryCommand::First),
            Command::Gallery(GalleryCommand::GoTo(12)),
            Command::Gallery(GalleryCommand::ToggleAlternate),
            Command::ToggleFullscreen,
        ];
        for cmd in commands {
            assert_eq!(cmd.id().parse::<Command>().unwrap(), cmd);
        }
    }

    #[test]
    fn test_as_gallery() {
        assert_eq!(Command::Gallery(GalleryCommand::Last).as_gallery(), Some(GalleryCommand::Last));
        assert_eq!(Command::Exit.as_gallery(), None);
    }
}
