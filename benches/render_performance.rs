//! Render Benchmarks
//!
//! Splicing annotation markup into volume-sized base texts.
//!
//! Run with: `cargo bench --bench render_performance`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use pecha_serializer::{
    Annotation, AnnotationKind, Layer, PechaSerializer, TextSpan, VolumeOffsetTable, VolumeSpan,
};

/// Tibetan-looking base text of roughly `syllables` syllables with line breaks
fn create_base_text(syllables: usize) -> String {
    let mut text = String::new();
    for i in 0..syllables {
        text.push_str("བཀྲ་");
        if i % 40 == 39 {
            text.push('\n');
        }
    }
    text
}

/// One page marker per 400 chars plus nested root text / commentary spans
fn create_layers(len: usize) -> Vec<Layer> {
    let mut pages = Layer::new("pagination", "v001");
    let mut topics = Layer::new("topic", "v001");
    for (page, start) in (0..len).step_by(400).enumerate() {
        pages.insert(Annotation::new(
            AnnotationKind::Pagination {
                page_index: format!("{}a", page + 1),
                page_info: String::new(),
            },
            TextSpan::new(start, start),
        ));
        let end = (start + 300).min(len);
        topics.insert(Annotation::new(AnnotationKind::Tsawa, TextSpan::new(start, end)));
        if start + 10 < end {
            topics.insert(Annotation::new(
                AnnotationKind::Yigchung,
                TextSpan::new(start + 10, (start + 50).min(end)),
            ));
        }
    }
    vec![pages, topics]
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for syllables in [1_000, 10_000, 100_000] {
        let base = create_base_text(syllables);
        let len = base.chars().count();
        let table = VolumeOffsetTable::new().with_volume("v001", VolumeSpan::new(0));
        let mut serializer = PechaSerializer::new(table);
        serializer.add_volume("v001", base.clone()).unwrap();
        for layer in create_layers(len) {
            serializer.apply_layer(&layer).unwrap();
        }

        group.throughput(Throughput::Bytes(base.len() as u64));
        group.bench_with_input(BenchmarkId::new("volume", syllables), &serializer, |b, s| {
            b.iter(|| black_box(s.render("v001").unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
