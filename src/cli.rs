//! Console front end — line commands for driving the controller from stdin.

use crate::error::ControllerError;
use crate::onboarding::ProfileField;
use crate::onboarding::languages::{language_option_value, resolve_language};

pub const HELP: &str = "\
Commands:
  set <field> <value>   fullName | bio | nativeLanguage | learningLanguage | location | profilePic
  random                generate a random avatar
  avatar-failed         simulate the avatar image failing to load
  submit                complete onboarding
  show                  print the current draft and submission state
  languages             list selectable languages
  help                  show this help
  quit                  exit";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { field: ProfileField, value: String },
    RandomAvatar,
    AvatarFailed,
    Submit,
    Show,
    Languages,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Empty lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, ControllerError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let command = match verb {
            "set" => {
                let rest = rest.trim_start();
                let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let field: ProfileField = name.parse()?;
                let value = value.trim().to_string();
                let value = match field {
                    ProfileField::NativeLanguage | ProfileField::LearningLanguage => {
                        resolve_language(&value).unwrap_or_else(|| language_option_value(&value))
                    }
                    _ => value,
                };
                Self::Set { field, value }
            }
            "random" => Self::RandomAvatar,
            "avatar-failed" => Self::AvatarFailed,
            "submit" => Self::Submit,
            "show" => Self::Show,
            "languages" => Self::Languages,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "/quit" => Self::Quit,
            other => return Err(ControllerError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}
