//! Benchmarks for immutable buffer operations and screen projection
//!
//! Run with: cargo bench buffer_ops

use scratch::{Buffer, Caret, Screen};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn document(lines: usize) -> Buffer {
    Buffer::from_text(&vec!["foo bar baz"; lines].join("\n"))
}

// ============================================================================
// Edits
// ============================================================================

#[divan::bench(args = [100, 10_000])]
fn input_char_middle(bencher: divan::Bencher, lines: usize) {
    let buffer = document(lines).with_caret(Caret::new(lines / 2, 4));
    bencher.bench_local(|| divan::black_box(&buffer).input("x"));
}

#[divan::bench(args = [100, 10_000])]
fn new_line_middle(bencher: divan::Bencher, lines: usize) {
    let buffer = document(lines).with_caret(Caret::new(lines / 2, 4));
    bencher.bench_local(|| divan::black_box(&buffer).new_line());
}

#[divan::bench(args = [100, 10_000])]
fn delete_backwards_middle(bencher: divan::Bencher, lines: usize) {
    let buffer = document(lines).with_caret(Caret::new(lines / 2, 4));
    bencher.bench_local(|| divan::black_box(&buffer).delete_backwards());
}

#[divan::bench]
fn type_paragraph() -> Buffer {
    let mut buffer = Buffer::empty();
    for word in "the quick brown fox jumps over the lazy dog".split(' ') {
        buffer = buffer.input(divan::black_box(word)).input(" ");
    }
    buffer
}

// ============================================================================
// Caret movement (no copy of the lines)
// ============================================================================

#[divan::bench(args = [100, 10_000])]
fn caret_down(bencher: divan::Bencher, lines: usize) {
    let buffer = document(lines);
    bencher.bench_local(|| divan::black_box(&buffer).caret_down());
}

#[divan::bench]
fn select_across_document(bencher: divan::Bencher) {
    let buffer = document(1_000);
    let end = buffer.char_count();
    bencher.bench_local(|| divan::black_box(&buffer).select(10, end - 10));
}

// ============================================================================
// Screen projection
// ============================================================================

#[divan::bench(args = [0, 12, 100])]
fn project_screen(bencher: divan::Bencher, max_lines: usize) {
    let buffer = document(10_000).with_caret(Caret::new(5_000, 0));
    bencher.bench_local(|| Screen::project(divan::black_box(&buffer), max_lines));
}
