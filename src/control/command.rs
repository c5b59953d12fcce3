use serde::Serialize;
use utoipa::ToSchema;

use crate::servo::{Axis, ServoAngle};

/// Step applied by "clockwise", "up" and friends.
pub const ADJUST_STEP: i32 = 15;

const LOCATION_KEYWORDS: [&str; 3] = ["weather", "for", "in"];
const LOCATION_FILLERS: [&str; 3] = ["please", "now", "today"];

/// A control action recognised in free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ControlCommand {
    SetAngle { axis: Axis, angle: i32 },
    Adjust { axis: Axis, delta: i32 },
    EnableTracking,
    DisableTracking,
    ResetLocation,
    Weather { location: Option<String> },
    Unrecognized,
}

/// Interprets a voice transcript or typed command.
pub fn parse_command(text: &str) -> ControlCommand {
    let text = text.trim().to_lowercase();
    let has = |needle: &str| text.contains(needle);
    let has_any = |needles: &[&str]| needles.iter().any(|n| text.contains(n));

    if has_any(&["counter", "anti-clockwise"]) {
        return adjust(Axis::Base, -ADJUST_STEP);
    }
    if has("clockwise") {
        return adjust(Axis::Base, ADJUST_STEP);
    }

    if has_any(&["panel zero", "panel to zero"]) {
        return set(Axis::Panel, ServoAngle::MIN);
    }
    if has_any(&["panel max", "panel to max"]) {
        return set(Axis::Panel, ServoAngle::MAX);
    }
    if has_any(&["base zero", "base to zero"]) {
        return set(Axis::Base, ServoAngle::MIN);
    }
    if has_any(&["base max", "base to max"]) {
        return set(Axis::Base, ServoAngle::MAX);
    }

    if has_any(&["auto mode on", "start tracking"]) {
        return ControlCommand::EnableTracking;
    }
    if has_any(&["auto mode off", "stop tracking"]) {
        return ControlCommand::DisableTracking;
    }
    if has_any(&["reset location", "clear location", "location reset"]) {
        return ControlCommand::ResetLocation;
    }

    if has("weather") {
        return ControlCommand::Weather {
            location: extract_location(&text),
        };
    }

    let words: Vec<&str> = text.split(|c: char| !c.is_alphanumeric()).collect();
    if words.contains(&"up") {
        return adjust(Axis::Panel, ADJUST_STEP);
    }
    if words.contains(&"down") {
        return adjust(Axis::Panel, -ADJUST_STEP);
    }

    let Some(angle) = first_number(&text) else {
        return ControlCommand::Unrecognized;
    };
    let angle = ServoAngle::clamped(angle).get();
    if has("base") {
        ControlCommand::SetAngle {
            axis: Axis::Base,
            angle,
        }
    } else if has_any(&["panel", "angle", "set"]) {
        ControlCommand::SetAngle {
            axis: Axis::Panel,
            angle,
        }
    } else {
        ControlCommand::Unrecognized
    }
}

fn adjust(axis: Axis, delta: i32) -> ControlCommand {
    ControlCommand::Adjust { axis, delta }
}

fn set(axis: Axis, angle: ServoAngle) -> ControlCommand {
    ControlCommand::SetAngle {
        axis,
        angle: angle.get(),
    }
}

/// Words after the first "weather", "for" or "in", minus further leading
/// "for"/"in" and one trailing "please"/"now"/"today".
fn extract_location(text: &str) -> Option<String> {
    let words: Vec<&str> = text
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| matches!(c, '.' | ',' | '!' | '?')))
        .filter(|w| !w.is_empty())
        .collect();

    let start = words.iter().position(|w| LOCATION_KEYWORDS.contains(w))? + 1;
    let mut rest = &words[start..];
    while let Some((first, tail)) = rest.split_first() {
        if *first == "for" || *first == "in" {
            rest = tail;
        } else {
            break;
        }
    }
    if let Some((last, head)) = rest.split_last() {
        if LOCATION_FILLERS.contains(last) {
            rest = head;
        }
    }

    if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    }
}

/// First run of digits, cut to three like a `\d{1,3}` search.
fn first_number(text: &str) -> Option<i32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .take(3)
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather(location: &str) -> ControlCommand {
        ControlCommand::Weather {
            location: Some(location.to_string()),
        }
    }

    #[test]
    fn test_rotation_words() {
        assert_eq!(parse_command("Clockwise"), adjust(Axis::Base, 15));
        assert_eq!(parse_command("counter-clockwise"), adjust(Axis::Base, -15));
        assert_eq!(parse_command("turn anti-clockwise"), adjust(Axis::Base, -15));
        assert_eq!(parse_command("Panel up"), adjust(Axis::Panel, 15));
        assert_eq!(parse_command("down."), adjust(Axis::Panel, -15));
    }

    #[test]
    fn test_presets() {
        assert_eq!(parse_command("panel zero"), set(Axis::Panel, ServoAngle::MIN));
        assert_eq!(parse_command("set panel to max"), set(Axis::Panel, ServoAngle::MAX));
        assert_eq!(parse_command("Base to zero"), set(Axis::Base, ServoAngle::MIN));
        assert_eq!(parse_command("base max"), set(Axis::Base, ServoAngle::MAX));
    }

    #[test]
    fn test_tracking_and_location() {
        assert_eq!(parse_command("auto mode on"), ControlCommand::EnableTracking);
        assert_eq!(parse_command("Start tracking"), ControlCommand::EnableTracking);
        assert_eq!(parse_command("stop tracking"), ControlCommand::DisableTracking);
        assert_eq!(parse_command("auto mode off"), ControlCommand::DisableTracking);
        assert_eq!(parse_command("clear location"), ControlCommand::ResetLocation);
        assert_eq!(parse_command("location reset"), ControlCommand::ResetLocation);
    }

    #[test]
    fn test_weather_location() {
        assert_eq!(parse_command("Weather for Berlin"), weather("berlin"));
        assert_eq!(parse_command("weather in new york please"), weather("new york"));
        assert_eq!(parse_command("what's the weather in Paris today?"), weather("paris"));
        assert_eq!(parse_command("weather Tokyo now"), weather("tokyo"));
        assert_eq!(
            parse_command("weather"),
            ControlCommand::Weather { location: None }
        );
        assert_eq!(
            parse_command("weather now"),
            ControlCommand::Weather { location: None }
        );
    }

    #[test]
    fn test_numeric_angles() {
        assert_eq!(
            parse_command("base 45"),
            ControlCommand::SetAngle {
                axis: Axis::Base,
                angle: 45
            }
        );
        assert_eq!(
            parse_command("set angle to 120"),
            ControlCommand::SetAngle {
                axis: Axis::Panel,
                angle: 120
            }
        );
        assert_eq!(
            parse_command("panel 999"),
            ControlCommand::SetAngle {
                axis: Axis::Panel,
                angle: 180
            }
        );
        assert_eq!(
            parse_command("base 1234"),
            ControlCommand::SetAngle {
                axis: Axis::Base,
                angle: 123
            }
        );
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(parse_command("hello there"), ControlCommand::Unrecognized);
        assert_eq!(parse_command("42"), ControlCommand::Unrecognized);
        assert_eq!(parse_command(""), ControlCommand::Unrecognized);
    }
}
