//! Scale-degree transposition of chord symbols.
//!
//! A chord root is located in the source key's scale table, and the root at
//! the same degree in the destination key replaces it. Roots outside the
//! scale are handled as a scale root plus an explicit accidental, so the
//! destination spelling stays diatonic wherever possible.

use crate::error::TransposeError;
use crate::keys::Key;
use crate::model::{KeyChange, REPEAT_CHAR, REPEAT_MEASURE};

/// Transposes measure tokens for the key change currently in effect.
///
/// With no key change the transposer is the identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transposer {
    change: Option<KeyChange>,
}

impl Transposer {
    pub fn new(change: Option<KeyChange>) -> Self {
        Self { change }
    }

    pub fn identity() -> Self {
        Self { change: None }
    }

    pub fn transpose_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<String>, TransposeError> {
        match self.change {
            None => Ok(tokens.iter().map(|t| t.as_ref().to_string()).collect()),
            Some(KeyChange { from, to }) => tokens
                .iter()
                .map(|t| transpose_token(from, to, t.as_ref()))
                .collect(),
        }
    }
}

/// Transpose a sequence of raw measure tokens from one key to another.
pub fn transpose_tokens<S: AsRef<str>>(from: Key, to: Key, tokens: &[S]) -> Result<Vec<String>, TransposeError> {
    Transposer::new(Some(KeyChange { from, to })).transpose_tokens(tokens)
}

/// Transpose one measure token, splitting simultaneous chords (space) and
/// slash chords (`/`) and transposing each part on its own.
pub fn transpose_token(from: Key, to: Key, token: &str) -> Result<String, TransposeError> {
    let separator = if token.contains(' ') {
        ' '
    } else if token.contains('/') {
        '/'
    } else {
        return transpose_chord(from, to, token);
    };

    let parts = token
        .split(separator)
        .map(|part| transpose_token(from, to, part))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join(&separator.to_string()))
}

/// Transpose a single chord symbol such as `Bbm7`, `:F#` or `G7:`.
pub fn transpose_chord(from: Key, to: Key, chord: &str) -> Result<String, TransposeError> {
    if chord.is_empty() || chord == REPEAT_MEASURE {
        return Ok(chord.to_string());
    }

    let (lead, body, trail) = if let Some(rest) = chord.strip_prefix(REPEAT_CHAR) {
        (":", rest, "")
    } else if let Some(rest) = chord.strip_suffix(REPEAT_CHAR) {
        ("", rest, ":")
    } else {
        ("", chord, "")
    };
    if body.is_empty() {
        return Ok(chord.to_string());
    }

    let (degree, after) = find_degree(from, body).ok_or_else(|| TransposeError::UnrecognizedRoot {
        chord: chord.to_string(),
        key: from.name().to_string(),
    })?;

    let transposed = format!("{lead}{}{after}{trail}", to.scale_degrees()[degree]);

    // The destination spelling plus a leftover source accidental can cancel out.
    Ok(transposed.replace("b#", "").replace("#b", ""))
}

/// Locate the chord's root in `key`, returning the scale degree and the
/// remainder of the chord that follows the root.
fn find_degree(key: Key, chord: &str) -> Option<(usize, String)> {
    let mut chars = chord.char_indices();
    let (_, letter) = chars.next()?;
    let after_one = chars.next().map_or(chord.len(), |(i, _)| i);
    let after_two = chars.next().map_or(chord.len(), |(i, _)| i);

    if after_two > after_one {
        if let Some(degree) = key.degree_of(&chord[..after_two]) {
            return Some((degree, chord[after_two..].to_string()));
        }
    }

    let rest = &chord[after_one..];
    let natural = letter.to_string();
    if let Some(degree) = key.degree_of(&natural) {
        return Some((degree, rest.to_string()));
    }
    // The natural is a semitone below the key's sharp: F in G major is the
    // flat seventh, so F goes to F#b, which cancels back to F.
    if let Some(degree) = key.degree_of(&format!("{letter}#")) {
        return Some((degree, format!("b{rest}")));
    }
    // The natural is a semitone above the key's flat: B in F major is the
    // sharp fourth, so B goes to Bb#, which cancels back to B.
    if let Some(degree) = key.degree_of(&format!("{letter}b")) {
        return Some((degree, format!("#{rest}")));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tr(from: &str, to: &str, chord: &str) -> String {
        let from = Key::from_name(from).unwrap();
        let to = Key::from_name(to).unwrap();
        transpose_token(from, to, chord).unwrap()
    }

    #[test]
    fn diatonic_roots_keep_their_degree() {
        assert_eq!(tr("C", "D", "C"), "D");
        assert_eq!(tr("C", "D", "Am7"), "Bm7");
        assert_eq!(tr("C", "Eb", "G7"), "Bb7");
        assert_eq!(tr("F", "A", "Bbmaj7"), "Dmaj7");
    }

    #[test]
    fn enharmonic_spelling_follows_destination_key() {
        assert_eq!(tr("C", "F#", "C"), "F#");
        assert_eq!(tr("C", "F#", "B"), "E#");
        assert_eq!(tr("G", "F#", "F#m7b5"), "E#m7b5");
    }

    #[test]
    fn chromatic_roots_carry_an_accidental() {
        // bVII in C is Bb; in D it is C natural.
        assert_eq!(tr("C", "D", "Bb"), "C");
        // bVII in C lands on E natural in F#, not E#b.
        assert_eq!(tr("C", "F#", "Bb"), "E");
        // #IV in C lands on E natural in Bb, not Eb#.
        assert_eq!(tr("C", "Bb", "F#dim"), "Edim");
        // Natural 7 in F is a raised Bb.
        assert_eq!(tr("G", "C", "F"), "Bb");
        assert_eq!(tr("F", "G", "B"), "C#");
    }

    #[test]
    fn repeat_markers_are_preserved() {
        assert_eq!(tr("C", "G", ":Cmaj7"), ":Gmaj7");
        assert_eq!(tr("C", "G", "Dm7:"), "Am7:");
    }

    #[test]
    fn compound_tokens_recurse() {
        assert_eq!(tr("C", "D", "C G/B"), "D A/C#");
        assert_eq!(tr("C", "A", "F/G"), "D/E");
        assert_eq!(tr("C", "E", ":C Am:"), ":E C#m:");
    }

    #[test]
    fn placeholders_pass_through() {
        assert_eq!(tr("C", "E", "%"), "%");
        assert_eq!(tr("C", "E", ""), "");
    }

    #[test]
    fn unknown_root_is_an_error() {
        let err = transpose_chord(Key::C, Key::D, "Hm").unwrap_err();
        assert_eq!(
            err,
            TransposeError::UnrecognizedRoot {
                chord: "Hm".into(),
                key: "C".into()
            }
        );
    }

    #[test]
    fn identity_without_key_change() {
        let t = Transposer::identity();
        assert_eq!(t.transpose_tokens(&["Hm", "C"]).unwrap(), vec!["Hm", "C"]);
    }

    #[test]
    fn round_trip_over_every_key_pair() {
        for k1 in Key::ALL {
            for k2 in Key::ALL {
                let tokens: Vec<String> = k1
                    .scale_degrees()
                    .iter()
                    .map(|root| format!("{root}m7"))
                    .collect();
                let there = transpose_tokens(k1, k2, &tokens).unwrap();
                let back = transpose_tokens(k2, k1, &there).unwrap();
                assert_eq!(back, tokens, "{k1} -> {k2} -> {k1}");
            }
        }
    }
}
