//! Integration tests for the input cursor: validity, whitespace skipping,
//! position tracking, and token lookahead with rollback.

use laxjson_core::cursor::Cursor;

fn cursor(input: &str) -> Cursor<&[u8]> {
    Cursor::new(input.as_bytes()).expect("cursor over a slice cannot fail")
}

// ===== validity =====

#[test]
fn drains_to_invalid() {
    let mut c = cursor("line 1line 2line 3");
    while c.valid() {
        c.advance().unwrap();
    }
    assert!(!c.valid());
    assert_eq!(c.symbol(), 0);
}

#[test]
fn empty_input_is_invalid_from_the_start() {
    let c = cursor("");
    assert!(!c.valid());
    assert_eq!(c.symbol(), 0);
}

// ===== whitespace =====

#[test]
fn skip_spaces_stops_on_content() {
    let mut c = cursor("hello    world");

    c.skip_spaces().unwrap();
    assert_eq!(c.symbol(), b'h');

    while c.valid() && !c.is_space() {
        c.advance().unwrap();
    }

    c.skip_spaces().unwrap();
    assert_eq!(c.symbol(), b'w');

    // already on content, nothing to do
    c.skip_spaces().unwrap();
    assert_eq!(c.symbol(), b'w');
}

#[test]
fn carriage_return_is_not_whitespace() {
    let mut c = cursor("\t\n \rx");
    c.skip_spaces().unwrap();
    assert!(!c.is_space());
    assert_eq!(c.symbol(), b'\r');

    // a token match delimited by whitespace stops at the CR too
    let mut c = cursor("word\rmore");
    let r = c.match_token(&["word\rmore"], None).unwrap();
    assert_eq!(r, 0);
}

// ===== position tracking =====

#[test]
fn position_tracks_lines_and_columns() {
    let mut c = cursor("hello\n,\nworld");

    while c.valid() && !c.is_space() {
        c.advance().unwrap();
    }
    assert_eq!(c.position().line, 1);
    assert_eq!(c.position().column, 0);

    c.skip_spaces().unwrap();
    assert_eq!(c.position().line, 1);
    assert_eq!(c.position().column, 1);

    c.advance().unwrap();
    assert_eq!(c.position().line, 2);
    assert_eq!(c.position().column, 0);

    c.advance().unwrap();
    assert_eq!(c.position().line, 2);
    assert_eq!(c.position().column, 1);
}

// ===== match_token =====

#[test]
fn whitespace_delimited_match() {
    let mut c = cursor("hello world");
    assert_eq!(c.symbol(), b'h');

    let r = c.match_token(&["hello", "world"], None).unwrap();
    assert_eq!(r, 0);
    assert_eq!(c.symbol(), b' ');

    c.advance().unwrap();
    assert_eq!(c.symbol(), b'w');

    let r = c.match_token(&["world"], None).unwrap();
    assert_eq!(r, 0);
    assert_eq!(c.symbol(), 0);
}

#[test]
fn predicate_match_picks_longest_candidate() {
    let mut c = cursor("hello1 world");
    let not_space = |b: u8| !b.is_ascii_whitespace();
    let r = c
        .match_token(&["hello", "hello1", "world"], Some(&not_space))
        .unwrap();
    assert_eq!(r, 1);
    assert_eq!(c.symbol(), b' ');
}

#[test]
fn predicate_rejecting_first_symbol_matches_nothing() {
    let mut c = cursor("lorem ipsum");
    let space = |b: u8| b.is_ascii_whitespace();
    let r = c.match_token(&["hello", "world"], Some(&space)).unwrap();
    assert_eq!(r, 2);
    assert_eq!(c.symbol(), b'l');
}

#[test]
fn prefix_only_is_not_a_match() {
    let mut c = cursor("hell o worl d");
    let space = |b: u8| b.is_ascii_whitespace();
    let r = c.match_token(&["hello", "world"], Some(&space)).unwrap();
    assert_eq!(r, 2);
    assert_eq!(c.symbol(), b'h');
}

#[test]
fn match_at_end_of_input() {
    let mut c = cursor("hello");
    let not_space = |b: u8| !b.is_ascii_whitespace();
    let r = c.match_token(&["hello", "world"], Some(&not_space)).unwrap();
    assert_eq!(r, 0);
    assert_eq!(c.symbol(), 0);
}

#[test]
fn mismatch_at_end_of_input_rolls_back() {
    let mut c = cursor("lorem");
    let not_space = |b: u8| !b.is_ascii_whitespace();
    let r = c.match_token(&["hello", "world"], Some(&not_space)).unwrap();
    assert_eq!(r, 2);
    assert_eq!(c.symbol(), b'l');
}

#[test]
fn predicate_boundary_leaves_cursor_on_terminator() {
    let mut c = cursor("hello1 world");
    let not_one = |b: u8| b != b'1';
    let r = c.match_token(&["hello", "world"], Some(&not_one)).unwrap();
    assert_eq!(r, 0);
    assert_eq!(c.symbol(), b'1');
}

#[test]
fn mismatch_rolls_back_symbol_and_stream() {
    let mut c = cursor("lorem1 ipsum");
    let not_one = |b: u8| b != b'1';
    let r = c
        .match_token(&["one", "two", "three", "hello1"], Some(&not_one))
        .unwrap();
    assert_eq!(r, 4);
    assert_eq!(c.symbol(), b'l');

    // the rolled-back bytes replay in order
    let mut replay = Vec::new();
    while c.valid() {
        replay.push(c.symbol());
        c.advance().unwrap();
    }
    assert_eq!(replay, b"lorem1 ipsum");
}

#[test]
fn mismatch_restores_position() {
    let mut c = cursor("lorem ipsum");
    let before = c.position();
    let not_space = |b: u8| !b.is_ascii_whitespace();
    c.match_token(&["nope"], Some(&not_space)).unwrap();
    assert_eq!(c.position(), before);
}

#[test]
fn empty_candidate_list_matches_trivially() {
    let mut c = cursor("anything");
    let r = c.match_token(&[], None).unwrap();
    assert_eq!(r, 0);
    assert_eq!(c.symbol(), b'a');
}
