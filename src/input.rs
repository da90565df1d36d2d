//! Key decoding for the page navigation loop.

const ESC: char = '\x1b';

/// Navigation action bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Next,
    Previous,
    /// Back to the command prompt to run with different options.
    Options,
    Quit,
}

impl NavKey {
    /// Maps a key id from [`parse_key`] to a navigation action.
    pub fn from_key_id(key_id: &str) -> Option<Self> {
        match key_id {
            "down" => Some(Self::Next),
            "up" => Some(Self::Previous),
            "m" => Some(Self::Options),
            "q" | "escape" | "ctrl+c" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Decodes one key sequence into a key id such as `up`, `escape`, `ctrl+c`
/// or a printable character.
pub fn parse_key(data: &str) -> Option<String> {
    if let Some(key_id) = legacy_sequence_key_id(data) {
        return Some(key_id.to_string());
    }

    if data == "\x1b" {
        return Some("escape".to_string());
    }
    if data == "\r" || data == "\n" {
        return Some("enter".to_string());
    }
    if data == "\x7f" || data == "\x08" {
        return Some("backspace".to_string());
    }

    let mut chars = data.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let code = ch as u32;
    if (1..=26).contains(&code) {
        let letter = char::from_u32(code + 96)?;
        return Some(format!("ctrl+{letter}"));
    }
    if !ch.is_control() {
        return Some(ch.to_string());
    }

    None
}

fn legacy_sequence_key_id(data: &str) -> Option<&'static str> {
    match data {
        "\x1b[A" | "\x1bOA" => Some("up"),
        "\x1b[B" | "\x1bOB" => Some("down"),
        "\x1b[C" | "\x1bOC" => Some("right"),
        "\x1b[D" | "\x1bOD" => Some("left"),
        "\x1b[H" | "\x1bOH" => Some("home"),
        "\x1b[F" | "\x1bOF" => Some("end"),
        "\x1b[5~" | "\x1b[[5~" => Some("pageUp"),
        "\x1b[6~" | "\x1b[[6~" => Some("pageDown"),
        _ => None,
    }
}

/// Splits a chunk read from stdin into individual key sequences.
///
/// Handles CSI (`ESC [ ... final`), SS3 (`ESC O x`), a lone `ESC`, and plain
/// characters. An escape sequence cut off at the end of the chunk is returned
/// as-is.
pub fn split_sequences(data: &str) -> Vec<String> {
    let chars: Vec<char> = data.chars().collect();
    let mut sequences = Vec::new();
    let mut idx = 0;

    while idx < chars.len() {
        let start = idx;
        if chars[idx] != ESC {
            idx += 1;
        } else {
            idx += 1;
            match chars.get(idx) {
                Some('[') => {
                    idx += 1;
                    // Doubled bracket in linux console page keys.
                    if chars.get(idx) == Some(&'[') {
                        idx += 1;
                    }
                    while idx < chars.len() && !is_csi_final(chars[idx]) {
                        idx += 1;
                    }
                    idx = (idx + 1).min(chars.len());
                }
                Some('O') => {
                    idx = (idx + 2).min(chars.len());
                }
                _ => {}
            }
        }
        sequences.push(chars[start..idx].iter().collect());
    }

    sequences
}

fn is_csi_final(ch: char) -> bool {
    ('\x40'..='\x7e').contains(&ch)
}
