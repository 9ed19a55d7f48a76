//! Major-key scale table used by the transposition engine.
//!
//! Each key lists its seven diatonic roots in scale-degree order, spelled
//! the way the key signature spells them (F# major uses E#, not F).

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the twelve supported major keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    #[serde(rename = "Ab")]
    AFlat,
    A,
    #[serde(rename = "Bb")]
    BFlat,
    B,
    C,
    #[serde(rename = "Db")]
    DFlat,
    D,
    #[serde(rename = "Eb")]
    EFlat,
    E,
    F,
    #[serde(rename = "F#")]
    FSharp,
    G,
}

impl Key {
    pub const ALL: [Key; 12] = [
        Key::AFlat,
        Key::A,
        Key::BFlat,
        Key::B,
        Key::C,
        Key::DFlat,
        Key::D,
        Key::EFlat,
        Key::E,
        Key::F,
        Key::FSharp,
        Key::G,
    ];

    /// Look a key up by the name used in chart text (`Ab`, `F#`, ...).
    pub fn from_name(name: &str) -> Option<Key> {
        Key::ALL.iter().copied().find(|k| k.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Key::AFlat => "Ab",
            Key::A => "A",
            Key::BFlat => "Bb",
            Key::B => "B",
            Key::C => "C",
            Key::DFlat => "Db",
            Key::D => "D",
            Key::EFlat => "Eb",
            Key::E => "E",
            Key::F => "F",
            Key::FSharp => "F#",
            Key::G => "G",
        }
    }

    /// The seven diatonic roots; position is the 0-based scale degree.
    pub fn scale_degrees(self) -> &'static [&'static str; 7] {
        match self {
            Key::AFlat => &["Ab", "Bb", "C", "Db", "Eb", "F", "G"],
            Key::A => &["A", "B", "C#", "D", "E", "F#", "G#"],
            Key::BFlat => &["Bb", "C", "D", "Eb", "F", "G", "A"],
            Key::B => &["B", "C#", "D#", "E", "F#", "G#", "A#"],
            Key::C => &["C", "D", "E", "F", "G", "A", "B"],
            Key::DFlat => &["Db", "Eb", "F", "Gb", "Ab", "Bb", "C"],
            Key::D => &["D", "E", "F#", "G", "A", "B", "C#"],
            Key::EFlat => &["Eb", "F", "G", "Ab", "Bb", "C", "D"],
            Key::E => &["E", "F#", "G#", "A", "B", "C#", "D#"],
            Key::F => &["F", "G", "A", "Bb", "C", "D", "E"],
            Key::FSharp => &["F#", "G#", "A#", "B", "C#", "D#", "E#"],
            Key::G => &["G", "A", "B", "C", "D", "E", "F#"],
        }
    }

    /// Scale degree of an exactly spelled root, if the key contains it.
    pub fn degree_of(self, root: &str) -> Option<usize> {
        self.scale_degrees().iter().position(|&r| r == root)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
