use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use mise_core::model::ENGLISH_MODEL;
use mise_core::preprocess::PreProcessor;
use mise_core::{IngredientParser, ParserOptions};

const SENTENCES: &[&str] = &[
    "2 cups flour, sifted",
    "1½ tablespoons unsalted butter, melted",
    "1-2 large eggs, beaten",
    "salt and pepper to taste",
    "1 pint milk (optional)",
];

fn bench_parse(c: &mut Criterion) {
    let parser = IngredientParser::new(ENGLISH_MODEL.ensure_ready().unwrap());
    let options = ParserOptions::default();

    c.bench_function("parse_single", |b| {
        b.iter(|| parser.parse(black_box(SENTENCES[0]), &options).unwrap());
    });

    c.bench_function("parse_batch_5", |b| {
        b.iter(|| {
            for sentence in SENTENCES {
                let _ = parser.parse(black_box(sentence), &options).unwrap();
            }
        });
    });
}

fn bench_preprocess(c: &mut Criterion) {
    c.bench_function("preprocess_single", |b| {
        b.iter(|| PreProcessor::new(black_box(SENTENCES[1])));
    });
}

criterion_group!(benches, bench_parse, bench_preprocess);
criterion_main!(benches);
