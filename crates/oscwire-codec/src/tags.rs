//! Type-tag characters.
//!
//! Every message argument is announced by exactly one character in the
//! message's type-tag string. The string itself always starts with [`DEFAULT`].

/// Leading marker of every type-tag string (an empty argument list).
pub const DEFAULT: char = ',';

/// 32-bit signed integer.
pub const INT32: char = 'i';

/// 64-bit signed integer.
pub const INT64: char = 'h';

/// 32-bit float.
pub const FLOAT32: char = 'f';

/// 32-bit float equal to positive infinity. Carries no payload.
pub const INFINITUM: char = 'I';

/// 64-bit float.
pub const FLOAT64: char = 'd';

/// ASCII string.
pub const STRING: char = 's';

/// Symbol. Decoded exactly like [`STRING`].
pub const SYMBOL: char = 'S';

/// Length-prefixed byte blob.
pub const BLOB: char = 'b';

/// 8-byte time tag.
pub const TIME_TAG: char = 't';

/// Single character, carried as a 32-bit integer code point.
pub const CHAR: char = 'c';

/// RGBA color. Only ever produced by `append`; see [`tag_name`].
pub const COLOR: char = 'r';

/// Boolean true. Carries no payload.
pub const TRUE: char = 'T';

/// Boolean false. Carries no payload.
pub const FALSE: char = 'F';

/// Nil. Carries no payload.
pub const NIL: char = 'N';

/// Returns a human-readable name for a type-tag character.
pub fn tag_name(tag: char) -> &'static str {
    match tag {
        DEFAULT => "default",
        INT32 => "int32",
        INT64 => "int64",
        FLOAT32 => "float32",
        INFINITUM => "infinitum",
        FLOAT64 => "float64",
        STRING => "string",
        SYMBOL => "symbol",
        BLOB => "blob",
        TIME_TAG => "time tag",
        CHAR => "char",
        COLOR => "color",
        TRUE => "true",
        FALSE => "false",
        NIL => "nil",
        _ => "unknown",
    }
}

/// Returns true if `tag` announces an argument with no payload bytes.
pub fn is_payload_free(tag: char) -> bool {
    matches!(tag, INFINITUM | TRUE | FALSE | NIL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_cover_the_table() {
        for tag in "ihfIdsSbtcrTFN".chars() {
            assert_ne!(tag_name(tag), "unknown", "tag {tag:?}");
        }
        assert_eq!(tag_name('x'), "unknown");
    }

    #[test]
    fn payload_free_tags() {
        assert!(is_payload_free(TRUE));
        assert!(is_payload_free(INFINITUM));
        assert!(!is_payload_free(FLOAT32));
    }
}
