//! Character classification for the parser.
//!
//! Every input byte maps to exactly one [`CharClass`]; the parser indexes its
//! action table by `(state, class)`. Classification is a single array lookup
//! for ASCII, and every byte above `0x7F` is [`CharClass::Other`] so UTF-8
//! payload bytes flow through string and token accumulation untouched.

/// Lexical class of a single input byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CharClass {
    /// Letters and underscore, except `e`/`E`.
    Alpha,
    /// `e` or `E`. Split from [`CharClass::Alpha`] so number states can
    /// recognize an exponent marker.
    Exponent,
    /// Any other visible character, including all bytes above `0x7F`.
    Other,
    /// ASCII digits.
    Digit,
    /// `.`
    Dot,
    /// `+` or `-`.
    Sign,
    /// `*`
    Star,
    /// Horizontal tab, line feed, space.
    Space,
    /// `"`
    Quote,
    /// `\`
    Backslash,
    /// `/`
    Slash,
    /// `:`
    Colon,
    /// `{`
    BeginObject,
    /// `}`
    EndObject,
    /// `[`
    BeginArray,
    /// `]`
    EndArray,
    /// `,` or `;`.
    Comma,
    /// Control characters (carriage return included) and DEL.
    Bad,
}

/// Number of character classes; the width of the parser's action table.
pub const CLASS_COUNT: usize = 18;

// Short aliases keep the table readable.
const AZ: CharClass = CharClass::Alpha;
const EE: CharClass = CharClass::Exponent;
const UN: CharClass = CharClass::Other;
const NU: CharClass = CharClass::Digit;
const DT: CharClass = CharClass::Dot;
const SG: CharClass = CharClass::Sign;
const AS: CharClass = CharClass::Star;
const SP: CharClass = CharClass::Space;
const QU: CharClass = CharClass::Quote;
const BS: CharClass = CharClass::Backslash;
const SL: CharClass = CharClass::Slash;
const CL: CharClass = CharClass::Colon;
const LC: CharClass = CharClass::BeginObject;
const RC: CharClass = CharClass::EndObject;
const LS: CharClass = CharClass::BeginArray;
const RS: CharClass = CharClass::EndArray;
const CM: CharClass = CharClass::Comma;
const ER: CharClass = CharClass::Bad;

const ASCII_CLASSES: [CharClass; 128] = [
    //0   1   2   3   4   5   6   7
    ER, ER, ER, ER, ER, ER, ER, ER, // 0x00 NUL..BEL
    ER, SP, SP, ER, ER, ER, ER, ER, // 0x08 BS HT LF VT FF CR SO SI
    ER, ER, ER, ER, ER, ER, ER, ER, // 0x10
    ER, ER, ER, ER, ER, ER, ER, ER, // 0x18
    SP, UN, QU, UN, UN, UN, UN, UN, // 0x20 SP ! " # $ % & '
    UN, UN, AS, SG, CM, SG, DT, SL, // 0x28 ( ) * + , - . /
    NU, NU, NU, NU, NU, NU, NU, NU, // 0x30 0 1 2 3 4 5 6 7
    NU, NU, CL, CM, UN, UN, UN, UN, // 0x38 8 9 : ; < = > ?
    UN, AZ, AZ, AZ, AZ, EE, AZ, AZ, // 0x40 @ A B C D E F G
    AZ, AZ, AZ, AZ, AZ, AZ, AZ, AZ, // 0x48 H..O
    AZ, AZ, AZ, AZ, AZ, AZ, AZ, AZ, // 0x50 P..W
    AZ, AZ, AZ, LS, BS, RS, UN, AZ, // 0x58 X Y Z [ \ ] ^ _
    UN, AZ, AZ, AZ, AZ, EE, AZ, AZ, // 0x60 ` a b c d e f g
    AZ, AZ, AZ, AZ, AZ, AZ, AZ, AZ, // 0x68 h..o
    AZ, AZ, AZ, AZ, AZ, AZ, AZ, AZ, // 0x70 p..w
    AZ, AZ, AZ, LC, UN, RC, UN, ER, // 0x78 x y z { | } ~ DEL
];

/// Classifies one input byte.
#[inline]
pub const fn classify(byte: u8) -> CharClass {
    if byte < 0x80 {
        ASCII_CLASSES[byte as usize]
    } else {
        CharClass::Other
    }
}

/// Number of continuation bytes that follow a UTF-8 lead byte.
///
/// Returns `None` for bare continuation bytes and the invalid leads
/// `0xFE`/`0xFF`. The 5-byte and 6-byte forms are reported so the decoder
/// can consume them and reject the sequence as malformed in one place.
#[inline]
pub const fn utf8_extra_bytes(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(0),
        0x80..=0xBF => None,
        0xC0..=0xDF => Some(1),
        0xE0..=0xEF => Some(2),
        0xF0..=0xF7 => Some(3),
        0xF8..=0xFB => Some(4),
        0xFC..=0xFD => Some(5),
        _ => None,
    }
}
