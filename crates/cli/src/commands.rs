//! Line-oriented command language of the interactive session.
//!
//! ```text
//! retouch <x> <y> <instruction...>   localized edit at a pixel
//! filter <style...>                  stylistic filter
//! adjust <description...>            global adjustment
//! crop <x> <y> <width> <height>      crop to a rectangle
//! crop free|square|<w>:<h>           largest centered crop of that aspect
//! undo | redo                        walk the history
//! status                             show the current version
//! original                           show the original upload
//! load <path>                        start over with another image
//! save [path]                        write the current version
//! help | quit
//! ```

use std::path::PathBuf;

use retouch_core::crop::AspectRatio;
use retouch_core::types::{Hotspot, Rect};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Retouch(Hotspot),
    Filter(String),
    Adjust(String),
    Crop(Rect),
    CropAspect(AspectRatio),
    Undo,
    Redo,
    Status,
    Original,
    Load(PathBuf),
    Save(Option<PathBuf>),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("'{value}' is not a valid {what}")]
    Number { what: &'static str, value: String },
}

pub const HELP: &str = "\
commands:
  retouch <x> <y> <instruction>   localized edit at a pixel
  filter <style>                  stylistic filter
  adjust <description>            global adjustment
  crop <x> <y> <width> <height>   crop to a rectangle
  crop free|square|<w>:<h>        largest centered crop of that aspect
  undo | redo                     walk the history
  status | original               show current or original image
  load <path>                     start over with another image
  save [path]                     write the current version
  help | quit";

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "retouch" => parse_retouch(rest)?,
        "filter" => Command::Filter(require_text(rest, "filter <style>")?),
        "adjust" => Command::Adjust(require_text(rest, "adjust <description>")?),
        "crop" => parse_crop(rest)?,
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "status" => Command::Status,
        "original" => Command::Original,
        "load" => Command::Load(PathBuf::from(require_text(rest, "load <path>")?)),
        "save" => Command::Save((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn require_text(rest: &str, usage: &'static str) -> Result<String, ParseError> {
    if rest.is_empty() {
        Err(ParseError::Usage(usage))
    } else {
        Ok(rest.to_string())
    }
}

fn parse_number(value: &str, what: &'static str) -> Result<i64, ParseError> {
    value.parse().map_err(|_| ParseError::Number {
        what,
        value: value.to_string(),
    })
}

fn parse_retouch(rest: &str) -> Result<Command, ParseError> {
    const USAGE: &str = "retouch <x> <y> <instruction>";
    let (x, rest) = next_field(rest).ok_or(ParseError::Usage(USAGE))?;
    let (y, instruction) = next_field(rest).ok_or(ParseError::Usage(USAGE))?;
    let instruction = instruction.trim();
    if instruction.is_empty() {
        return Err(ParseError::Usage(USAGE));
    }
    Ok(Command::Retouch(Hotspot::new(
        parse_number(x, "x coordinate")?,
        parse_number(y, "y coordinate")?,
        instruction,
    )))
}

/// Split off the first whitespace-delimited word, returning it and the
/// untrimmed remainder.
fn next_field(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    Some(text.split_once(char::is_whitespace).unwrap_or((text, "")))
}

fn parse_crop(rest: &str) -> Result<Command, ParseError> {
    const USAGE: &str = "crop <x> <y> <width> <height> | crop free|square|<w>:<h>";
    let fields: Vec<&str> = rest.split_whitespace().collect();
    match fields.as_slice() {
        [x, y, w, h] => Ok(Command::Crop(Rect::new(
            parse_number(x, "x coordinate")?,
            parse_number(y, "y coordinate")?,
            parse_number(w, "width")?,
            parse_number(h, "height")?,
        ))),
        [preset] => parse_aspect(preset)
            .map(Command::CropAspect)
            .ok_or(ParseError::Usage(USAGE)),
        _ => Err(ParseError::Usage(USAGE)),
    }
}

fn parse_aspect(preset: &str) -> Option<AspectRatio> {
    match preset.to_ascii_lowercase().as_str() {
        "free" => Some(AspectRatio::Free),
        "square" | "1:1" => Some(AspectRatio::Square),
        other => {
            let (w, h) = other.split_once(':')?;
            Some(AspectRatio::Ratio(w.parse().ok()?, h.parse().ok()?))
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(parse_command("# a comment").unwrap(), None);
    }

    #[test]
    fn retouch_keeps_the_whole_instruction() {
        let cmd = parse_command("retouch 12 34   remove the red  blemish ").unwrap();
        assert_eq!(
            cmd,
            Some(Command::Retouch(Hotspot::new(
                12,
                34,
                "remove the red  blemish"
            )))
        );
    }

    #[test]
    fn retouch_tolerates_runs_of_whitespace_between_fields() {
        assert_eq!(
            parse_command("retouch 10  20 remove blemish").unwrap(),
            Some(Command::Retouch(Hotspot::new(10, 20, "remove blemish")))
        );
        assert_eq!(
            parse_command("retouch \t 10 \t 20\t  remove  blemish ").unwrap(),
            Some(Command::Retouch(Hotspot::new(10, 20, "remove  blemish")))
        );
        assert_matches!(parse_command("retouch 10   20   "), Err(ParseError::Usage(_)));
    }

    #[test]
    fn retouch_requires_coordinates_and_text() {
        assert_matches!(parse_command("retouch 1 2"), Err(ParseError::Usage(_)));
        assert_matches!(parse_command("retouch"), Err(ParseError::Usage(_)));
        assert_matches!(
            parse_command("retouch a 2 fix"),
            Err(ParseError::Number { what: "x coordinate", .. })
        );
    }

    #[test]
    fn negative_coordinates_parse() {
        assert_eq!(
            parse_command("retouch -5 3 fix").unwrap(),
            Some(Command::Retouch(Hotspot::new(-5, 3, "fix")))
        );
    }

    #[test]
    fn filter_and_adjust_take_free_text() {
        assert_eq!(
            parse_command("filter vintage sepia").unwrap(),
            Some(Command::Filter("vintage sepia".into()))
        );
        assert_eq!(
            parse_command("ADJUST increase brightness").unwrap(),
            Some(Command::Adjust("increase brightness".into()))
        );
        assert_matches!(parse_command("filter"), Err(ParseError::Usage(_)));
    }

    #[test]
    fn crop_rectangle_and_presets() {
        assert_eq!(
            parse_command("crop 0 0 50 50").unwrap(),
            Some(Command::Crop(Rect::new(0, 0, 50, 50)))
        );
        assert_eq!(
            parse_command("crop square").unwrap(),
            Some(Command::CropAspect(AspectRatio::Square))
        );
        assert_eq!(
            parse_command("crop 16:9").unwrap(),
            Some(Command::CropAspect(AspectRatio::Ratio(16, 9)))
        );
        assert_matches!(parse_command("crop 1 2 3"), Err(ParseError::Usage(_)));
        assert_matches!(parse_command("crop wide"), Err(ParseError::Usage(_)));
        assert_matches!(
            parse_command("crop 0 0 ten 5"),
            Err(ParseError::Number { what: "width", .. })
        );
    }

    #[test]
    fn save_path_is_optional() {
        assert_eq!(parse_command("save").unwrap(), Some(Command::Save(None)));
        assert_eq!(
            parse_command("save out/final.png").unwrap(),
            Some(Command::Save(Some(PathBuf::from("out/final.png"))))
        );
    }

    #[test]
    fn simple_verbs() {
        assert_eq!(parse_command("undo").unwrap(), Some(Command::Undo));
        assert_eq!(parse_command("redo").unwrap(), Some(Command::Redo));
        assert_eq!(parse_command("exit").unwrap(), Some(Command::Quit));
        assert_eq!(parse_command("?").unwrap(), Some(Command::Help));
    }

    #[test]
    fn unknown_verb_is_reported() {
        assert_matches!(
            parse_command("sharpen everything"),
            Err(ParseError::Unknown(v)) if v == "sharpen"
        );
    }
}
