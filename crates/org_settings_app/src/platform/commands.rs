use std::path::PathBuf;

use org_settings_core::Field;

pub(crate) const HELP: &str = "commands: name <text> | website <text> | email <text> | logo <path> | show | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Edit { field: Field, value: String },
    Logo(PathBuf),
    Show,
    Help,
    Quit,
}

/// Parses one stdin line. Blank lines yield `Ok(None)`.
///
/// Everything after the first space is the field value, kept verbatim so
/// inner and trailing spaces reach the validators.
pub(crate) fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }
    let line = line.trim_start();
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));

    if let Some(field) = Field::from_key(verb) {
        return Ok(Some(Command::Edit {
            field,
            value: rest.to_string(),
        }));
    }

    match verb {
        "logo" => {
            let path = rest.trim();
            if path.is_empty() {
                Err("logo needs a file path".to_string())
            } else {
                Ok(Some(Command::Logo(PathBuf::from(path))))
            }
        }
        "show" => Ok(Some(Command::Show)),
        "help" | "?" => Ok(Some(Command::Help)),
        "quit" | "exit" => Ok(Some(Command::Quit)),
        other => Err(format!("unknown command `{other}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_edits_keep_the_rest_of_the_line() {
        assert_eq!(
            parse_command("name Acme  Inc \n"),
            Ok(Some(Command::Edit {
                field: Field::Name,
                value: "Acme  Inc ".to_string()
            }))
        );
        assert_eq!(
            parse_command("email"),
            Ok(Some(Command::Edit {
                field: Field::Email,
                value: String::new()
            }))
        );
    }

    #[test]
    fn logo_requires_a_path() {
        assert_eq!(
            parse_command("logo  ./acme.png "),
            Ok(Some(Command::Logo(PathBuf::from("./acme.png"))))
        );
        assert!(parse_command("logo").is_err());
    }

    #[test]
    fn control_commands_and_blank_lines() {
        assert_eq!(parse_command("   \r\n"), Ok(None));
        assert_eq!(parse_command("show"), Ok(Some(Command::Show)));
        assert_eq!(parse_command("?"), Ok(Some(Command::Help)));
        assert_eq!(parse_command("exit"), Ok(Some(Command::Quit)));
        assert_eq!(
            parse_command("delete org"),
            Err("unknown command `delete`".to_string())
        );
    }
}
