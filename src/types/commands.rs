use std::str::FromStr;

use crate::app::state::Stage;

/// One discrete input on the keyframe marker page
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerInput {
    /// Raw scroll axis; scaled by the wheel speed
    Scroll(f32),
    NextKeyFrame,
    PrevKeyFrame,
    AssignNextTag,
    /// Digit key 1-9
    Tag(u32),
    ClearTag,
}

/// Operator command, processed one per tick
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SwitchStage(Stage),
    SetFileName(String),
    SetTagCount(String),
    SetOverwrite(bool),
    /// Marker: open skeleton file. Trainer: load training config.
    Open,
    Save,
    Train,
    Marker(MarkerInput),
    ShowObserver,
    Help,
    Quit,
}

pub const HELP_TEXT: &str = "\
mark | train            switch page
name <text>             set the file / gesture name field
count <n>               set the key posture number
open                    open skeleton file (mark) or load training config (train)
save                    save key frames (mark)
build                   train and save the template (train)
overwrite on|off        allow overwriting an existing template
wheel <axis>            scroll by axis * wheel speed frames
next | prev             go to the next / previous key frame
tag                     mark the current frame with the next key posture
1..9                    mark the current frame with that key posture
del                     delete the current frame's tag
info                    show frame info and key frame list / event log
help | quit";

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "mark" => Command::SwitchStage(Stage::Mark),
            "train" => Command::SwitchStage(Stage::Train),
            "name" => Command::SetFileName(rest.to_string()),
            "count" => Command::SetTagCount(rest.to_string()),
            "open" => Command::Open,
            "save" => Command::Save,
            "build" => Command::Train,
            "overwrite" => match rest {
                "on" | "true" | "1" => Command::SetOverwrite(true),
                "off" | "false" | "0" => Command::SetOverwrite(false),
                _ => return Err(format!("overwrite expects on or off, got \"{}\"", rest)),
            },
            "wheel" => {
                let axis = rest
                    .parse::<f32>()
                    .map_err(|e| format!("invalid scroll axis \"{}\": {}", rest, e))?;
                if !axis.is_finite() {
                    return Err(format!("invalid scroll axis \"{}\"", rest));
                }
                Command::Marker(MarkerInput::Scroll(axis))
            }
            "next" => Command::Marker(MarkerInput::NextKeyFrame),
            "prev" => Command::Marker(MarkerInput::PrevKeyFrame),
            "tag" => Command::Marker(MarkerInput::AssignNextTag),
            "del" | "delete" => Command::Marker(MarkerInput::ClearTag),
            "info" => Command::ShowObserver,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            digit if digit.len() == 1 && ('1'..='9').contains(&digit.chars().next().unwrap_or('0')) => {
                Command::Marker(MarkerInput::Tag(digit.parse().map_err(|_| digit.to_string())?))
            }
            "" => return Err("empty command".to_string()),
            other => return Err(format!("unknown command \"{}\"", other)),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!("train".parse::<Command>(), Ok(Command::SwitchStage(Stage::Train)));
        assert_eq!("name  wave take 1 ".parse::<Command>(), Ok(Command::SetFileName("wave take 1".into())));
        assert_eq!("name".parse::<Command>(), Ok(Command::SetFileName(String::new())));
        assert_eq!("wheel -0.3".parse::<Command>(), Ok(Command::Marker(MarkerInput::Scroll(-0.3))));
        assert_eq!("7".parse::<Command>(), Ok(Command::Marker(MarkerInput::Tag(7))));
        assert_eq!("overwrite on".parse::<Command>(), Ok(Command::SetOverwrite(true)));
    }

    #[test]
    fn rejects_garbage() {
        assert!("0".parse::<Command>().is_err());
        assert!("12".parse::<Command>().is_err());
        assert!("wheel fast".parse::<Command>().is_err());
        assert!("wheel inf".parse::<Command>().is_err());
        assert!("wheel NaN".parse::<Command>().is_err());
        assert_eq!("wheel 1e30".parse::<Command>(), Ok(Command::Marker(MarkerInput::Scroll(1e30))));
        assert!("overwrite maybe".parse::<Command>().is_err());
        assert!("   ".parse::<Command>().is_err());
        assert!("jump".parse::<Command>().is_err());
    }
}
