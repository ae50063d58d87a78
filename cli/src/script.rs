use chordsweep_core::{Coord, Coordinate, MouseButtons, PointerEvent};
use thiserror::Error;

/// One line of a replay script.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Command {
    Pointer(PointerEvent),
    Restart,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum ScriptError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("unknown button `{0}`, expected left, right, middle, back or forward")]
    UnknownButton(String),
    #[error("invalid coordinate `{0}`")]
    InvalidCoordinate(String),
    #[error("`{command}` takes {expected} arguments, got {got}")]
    ArgumentCount {
        command: &'static str,
        expected: usize,
        got: usize,
    },
}

/// Parses a script line, `None` for blank lines and comments.
///
/// ```text
/// press ROW COL BUTTON
/// release ROW COL BUTTON
/// enter ROW COL
/// leave ROW COL
/// restart
/// ```
pub(crate) fn parse_line(line: &str) -> Result<Option<Command>, ScriptError> {
    let line = line.split('#').next().unwrap_or_default();
    let mut tokens = line.split_whitespace();
    let Some(command) = tokens.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = tokens.collect();

    let command = match command.to_ascii_lowercase().as_str() {
        "press" => {
            let (coordinate, button) = with_button("press", &args)?;
            Command::Pointer(PointerEvent::press(coordinate, button))
        }
        "release" => {
            let (coordinate, button) = with_button("release", &args)?;
            Command::Pointer(PointerEvent::release(coordinate, button))
        }
        "enter" => Command::Pointer(PointerEvent::enter(coordinate_only("enter", &args)?)),
        "leave" => Command::Pointer(PointerEvent::leave(coordinate_only("leave", &args)?)),
        "restart" => {
            check_count("restart", &args, 0)?;
            Command::Restart
        }
        _ => return Err(ScriptError::UnknownCommand(command.to_owned())),
    };
    Ok(Some(command))
}

fn with_button(command: &'static str, args: &[&str]) -> Result<(Coordinate, MouseButtons), ScriptError> {
    check_count(command, args, 3)?;
    Ok((parse_coordinate(args[0], args[1])?, parse_button(args[2])?))
}

fn coordinate_only(command: &'static str, args: &[&str]) -> Result<Coordinate, ScriptError> {
    check_count(command, args, 2)?;
    parse_coordinate(args[0], args[1])
}

fn check_count(command: &'static str, args: &[&str], expected: usize) -> Result<(), ScriptError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ScriptError::ArgumentCount {
            command,
            expected,
            got: args.len(),
        })
    }
}

fn parse_coordinate(row: &str, col: &str) -> Result<Coordinate, ScriptError> {
    let axis = |value: &str| {
        value
            .parse::<Coord>()
            .map_err(|_| ScriptError::InvalidCoordinate(value.to_owned()))
    };
    Ok(Coordinate::new(axis(row)?, axis(col)?))
}

fn parse_button(name: &str) -> Result<MouseButtons, ScriptError> {
    Ok(match name.to_ascii_lowercase().as_str() {
        "left" => MouseButtons::LEFT,
        "right" => MouseButtons::RIGHT,
        "middle" => MouseButtons::MIDDLE,
        "back" => MouseButtons::BACK,
        "forward" => MouseButtons::FORWARD,
        _ => return Err(ScriptError::UnknownButton(name.to_owned())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pointer(line: &str) -> PointerEvent {
        match parse_line(line) {
            Ok(Some(Command::Pointer(event))) => event,
            other => panic!("expected pointer event for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn parses_pointer_commands() {
        let cell = Coordinate::new(3, 12);
        assert_eq!(pointer("press 3 12 left"), PointerEvent::press(cell, MouseButtons::LEFT));
        assert_eq!(
            pointer("  RELEASE 3 12 Right  "),
            PointerEvent::release(cell, MouseButtons::RIGHT)
        );
        assert_eq!(pointer("enter 3 12"), PointerEvent::enter(cell));
        assert_eq!(pointer("leave 3 12 # dragged off"), PointerEvent::leave(cell));
    }

    #[test]
    fn skips_blank_lines_and_comments() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(parse_line("# first click"), Ok(None));
        assert_eq!(parse_line("restart"), Ok(Some(Command::Restart)));
    }

    #[test]
    fn reports_malformed_lines() {
        assert_eq!(
            parse_line("poke 1 1"),
            Err(ScriptError::UnknownCommand("poke".to_owned()))
        );
        assert_eq!(
            parse_line("press 1 1 thumb"),
            Err(ScriptError::UnknownButton("thumb".to_owned()))
        );
        assert_eq!(
            parse_line("enter -1 2"),
            Err(ScriptError::InvalidCoordinate("-1".to_owned()))
        );
        assert_eq!(
            parse_line("press 1 1"),
            Err(ScriptError::ArgumentCount {
                command: "press",
                expected: 3,
                got: 2,
            })
        );
        assert!(parse_line("restart now").is_err());
    }
}
