use std::collections::HashMap;

use crossterm::event::{
    KeyCode,
    KeyEvent,
    KeyModifiers,
};
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
};

use super::action::{
    Action,
    Scroll,
};

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Default,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub keybindings: KeyBindings,
}

#[derive(Clone, Debug)]
pub struct KeyBindings(pub HashMap<Mode, HashMap<Vec<KeyEvent>, Action>>);

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings: &[(&str, Action)] = &[
            ("ctrl-c", Action::Quit),
            ("ctrl-l", Action::ClearScreen),
            ("pageup", Action::Scroll(Scroll::Up(5))),
            ("pagedown", Action::Scroll(Scroll::Down(5))),
        ];

        let mut default_mode = HashMap::new();
        for (raw, action) in bindings {
            let sequence = parse_key_sequence(raw).expect("default keybindings parse");
            default_mode.insert(sequence, action.clone());
        }

        let mut map = HashMap::new();
        map.insert(Mode::Default, default_mode);
        Self(map)
    }
}

impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed_map = HashMap::<Mode, HashMap<String, Action>>::deserialize(deserializer)?;

        let keybindings = parsed_map
            .into_iter()
            .map(|(mode, inner_map)| {
                let converted_inner_map = inner_map
                    .into_iter()
                    .filter_map(|(key_str, cmd)| parse_key_sequence(&key_str).ok().map(|seq| (seq, cmd)))
                    .collect();
                (mode, converted_inner_map)
            })
            .collect();

        Ok(KeyBindings(keybindings))
    }
}

/// Parses a whitespace-separated sequence of keys, e.g. `"ctrl-x ctrl-s"`.
pub fn parse_key_sequence(raw: &str) -> Result<Vec<KeyEvent>, String> {
    raw.split_whitespace().map(parse_key_event).collect()
}

fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
    let lowered = raw.to_lowercase();
    let mut rest = lowered.as_str();
    let mut modifiers = KeyModifiers::NONE;

    loop {
        if let Some(stripped) = rest.strip_prefix("ctrl-") {
            modifiers |= KeyModifiers::CONTROL;
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("alt-") {
            modifiers |= KeyModifiers::ALT;
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("shift-") {
            modifiers |= KeyModifiers::SHIFT;
            rest = stripped;
        } else {
            break;
        }
    }

    let code = match rest {
        "esc" => KeyCode::Esc,
        "enter" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        single if single.chars().count() == 1 => {
            KeyCode::Char(single.chars().next().ok_or_else(|| format!("invalid key: {raw}"))?)
        },
        _ => return Err(format!("unknown key: {raw}")),
    };

    Ok(KeyEvent::new(code, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_key() {
        assert_eq!(
            parse_key_sequence("q").unwrap(),
            vec![KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)]
        );
    }

    #[test]
    fn test_parse_modified_key() {
        assert_eq!(
            parse_key_sequence("ctrl-c").unwrap(),
            vec![KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)]
        );
    }

    #[test]
    fn test_parse_multi_key_sequence() {
        assert_eq!(
            parse_key_sequence("ctrl-x ctrl-s").unwrap(),
            vec![
                KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL),
                KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
            ]
        );
    }

    #[test]
    fn test_parse_unknown_key_fails() {
        assert!(parse_key_sequence("hyper-q").is_err());
    }

    #[test]
    fn test_default_bindings_include_quit() {
        let config = Config::default();
        let bindings = config.keybindings.0.get(&Mode::Default).unwrap();
        let quit = bindings
            .get(&vec![KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)])
            .unwrap();
        assert_eq!(*quit, Action::Quit);
    }
}
