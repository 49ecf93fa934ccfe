//! Benchmarks for pagination and reflow

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pageflow::{split_paragraphs, BookEditor, LayoutContext, LineBreakMeasurer, PageSettings};

fn sample_text(paragraphs: usize) -> String {
    (0..paragraphs)
        .map(|i| {
            format!(
                "Paragraph {} contains enough text to span multiple lines and test the line breaking algorithm. {}",
                i,
                "More words follow here. ".repeat(i % 7)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn bench_measure_paragraph(c: &mut Criterion) {
    let settings = PageSettings::default();
    let measurer = LineBreakMeasurer::new();
    let text = sample_text(1);

    c.bench_function("measure_paragraph", |b| {
        b.iter(|| {
            // Fresh context so the height cache does not short-circuit
            let ctx = LayoutContext::new(&measurer, &settings);
            ctx.paragraph_height(black_box(&text)).ok()
        });
    });
}

fn bench_split_paragraphs(c: &mut Criterion) {
    let text = sample_text(500);
    c.bench_function("split_paragraphs_500", |b| {
        b.iter(|| split_paragraphs(black_box(&text)));
    });
}

fn bench_import_medium(c: &mut Criterion) {
    let text = sample_text(200);
    c.bench_function("import_200_paragraphs", |b| {
        b.iter(|| {
            let mut editor = BookEditor::new(LineBreakMeasurer::new());
            editor.import_text(black_box(&text)).ok()
        });
    });
}

fn bench_cascade_reflow(c: &mut Criterion) {
    let text = sample_text(200);
    c.bench_function("cascade_from_first_page", |b| {
        let mut editor = BookEditor::new(LineBreakMeasurer::new());
        editor.import_text(&text).ok();
        let first = editor.pages()[0].content().to_string();
        let grown = format!("{}\n\n{}", sample_text(4), first);

        b.iter(|| {
            editor.edit_page(0, black_box(&grown), 0).ok();
            editor.flush_pending().ok();
            editor.undo();
        });
    });
}

fn bench_undo_redo(c: &mut Criterion) {
    c.bench_function("undo_redo", |b| {
        let mut editor = BookEditor::new(LineBreakMeasurer::new());
        editor.import_text(&sample_text(40)).ok();
        editor.move_last_paragraph_to_next(0).ok();

        b.iter(|| {
            editor.undo();
            editor.redo();
        });
    });
}

criterion_group!(
    benches,
    bench_measure_paragraph,
    bench_split_paragraphs,
    bench_import_medium,
    bench_cascade_reflow,
    bench_undo_redo,
);

criterion_main!(benches);
