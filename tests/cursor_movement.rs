//! Caret movement tests - arrow keys, line start/end, clamping

mod common;

use common::buffer_at;
use scratch::{Buffer, Caret};

#[test]
fn test_caret_left_moves_one_char() {
    let buffer = buffer_at("hello", 0, 3).caret_left();
    assert_eq!(buffer.caret(), Caret::new(0, 2));
}

#[test]
fn test_caret_left_stops_at_line_start() {
    // Does not wrap to the previous line
    let buffer = buffer_at("ab\ncd", 1, 0).caret_left();
    assert_eq!(buffer.caret(), Caret::new(1, 0));
}

#[test]
fn test_caret_right_stops_at_line_end() {
    let buffer = buffer_at("ab\ncd", 0, 2).caret_right();
    assert_eq!(buffer.caret(), Caret::new(0, 2));
}

#[test]
fn test_caret_right_moves_one_char() {
    let buffer = buffer_at("hello", 0, 0).caret_right().caret_right();
    assert_eq!(buffer.caret(), Caret::new(0, 2));
}

#[test]
fn test_caret_up_at_first_line_stays() {
    let buffer = buffer_at("hello\nworld", 0, 3).caret_up();
    assert_eq!(buffer.caret(), Caret::new(0, 3));
}

#[test]
fn test_caret_down_at_last_line_stays() {
    let buffer = buffer_at("hello\nworld", 1, 3).caret_down();
    assert_eq!(buffer.caret(), Caret::new(1, 3));
}

#[test]
fn test_caret_down_clamps_to_shorter_line() {
    let buffer = buffer_at("hello world\nhi", 0, 8).caret_down();
    assert_eq!(buffer.caret(), Caret::new(1, 2));
}

#[test]
fn test_caret_up_clamps_to_shorter_line() {
    let buffer = buffer_at("ab\nlonger line", 1, 9).caret_up();
    assert_eq!(buffer.caret(), Caret::new(0, 2));
}

#[test]
fn test_vertical_motion_does_not_remember_column() {
    // Down to a short line clamps; back up keeps the clamped column
    let buffer = buffer_at("hello\nhi\nworld", 0, 4).caret_down().caret_up();
    assert_eq!(buffer.caret(), Caret::new(0, 2));
}

#[test]
fn test_line_start_and_end() {
    let buffer = buffer_at("one\nthree", 1, 2);
    assert_eq!(buffer.caret_line_start().caret(), Caret::new(1, 0));
    assert_eq!(buffer.caret_line_end().caret(), Caret::new(1, 5));
}

#[test]
fn test_with_caret_clamps_out_of_range() {
    let buffer = Buffer::from_text("ab\ncd").with_caret(Caret::new(10, 10));
    assert_eq!(buffer.caret(), Caret::new(1, 2));
}

#[test]
fn test_motion_counts_chars_not_bytes() {
    let buffer = buffer_at("日本語", 0, 3).caret_left();
    assert_eq!(buffer.caret(), Caret::new(0, 2));
    assert_eq!(buffer.caret_line_end().caret(), Caret::new(0, 3));
}

#[test]
fn test_motion_never_changes_lines() {
    let start = buffer_at("one\ntwo\nthree", 1, 1);
    let moved = start
        .caret_left()
        .caret_down()
        .caret_right()
        .caret_up()
        .caret_line_end()
        .caret_line_start();
    assert_eq!(moved.lines(), start.lines());
}

#[test]
fn test_caret_stays_in_bounds_after_every_motion() {
    let texts = ["", "a", "ab\n", "\n\n\n", "short\na much longer line\nx"];
    for text in texts {
        let mut buffer = Buffer::from_text(text);
        for step in 0..40 {
            buffer = match step % 6 {
                0 => buffer.caret_right(),
                1 => buffer.caret_down(),
                2 => buffer.caret_right(),
                3 => buffer.caret_up(),
                4 => buffer.caret_left(),
                _ => buffer.caret_line_end(),
            };
            let caret = buffer.caret();
            assert!(caret.line < buffer.line_count(), "{:?} in {:?}", caret, text);
            assert!(
                caret.character <= buffer.line_length(caret.line),
                "{:?} in {:?}",
                caret,
                text
            );
        }
    }
}

#[test]
fn test_offset_and_caret_agree() {
    let buffer = Buffer::from_text("ab\ncde\n\nf");
    for offset in 0..=buffer.char_count() {
        let caret = buffer.offset_to_caret(offset);
        assert_eq!(buffer.caret_to_offset(caret), offset);
    }
    assert_eq!(
        buffer.offset_to_caret(buffer.char_count() + 5),
        Caret::new(3, 1)
    );
}
