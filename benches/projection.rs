//! Projection micro-benchmarks
//!
//! Measures parsing, reads at document and view scope, writes, and options compilation.

use activedoc::{ComputedBucket, Document, ElementRef, RangeConstraint, SearchOptions};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn records_xml(count: usize) -> String {
    let mut xml = String::from(r#"<records xmlns="urn:bench">"#);
    for i in 0..count {
        xml.push_str(&format!(
            "<record><id>{}</id><name>item {}</name><tags><tag>a</tag><tag>b</tag></tags></record>",
            i, i
        ));
    }
    xml.push_str("</records>");
    xml
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for count in [10, 100, 1000] {
        let xml = records_xml(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &xml, |b, xml| {
            b.iter(|| Document::parse(black_box(xml)))
        });
    }
    group.finish();
}

fn benchmark_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");
    for count in [10, 100, 1000] {
        let mut doc = Document::parse(&records_xml(count)).expect("valid bench document");
        doc.set_default_namespace(Some("urn:bench".to_string()));

        group.bench_with_input(BenchmarkId::new("text_list", count), &doc, |b, doc| {
            b.iter(|| doc.read(black_box("name")))
        });
        group.bench_with_input(BenchmarkId::new("predicate", count), &doc, |b, doc| {
            b.iter(|| doc.read(black_box("record[id = '7']/name")))
        });
        group.bench_with_input(BenchmarkId::new("view", count), &doc, |b, doc| {
            b.iter(|| doc.read(black_box("record")))
        });
    }
    group.finish();
}

fn benchmark_chained_read(c: &mut Criterion) {
    let mut doc = Document::parse(&records_xml(100)).expect("valid bench document");
    doc.set_default_namespace(Some("urn:bench".to_string()));
    let records = doc
        .read("record")
        .ok()
        .and_then(|p| p.into_view())
        .expect("records view");

    c.bench_function("chained_read", |b| {
        b.iter(|| {
            records
                .get(black_box(50))
                .map(|record| record.read("tag"))
        })
    });
}

fn benchmark_write(c: &mut Criterion) {
    let mut doc = Document::parse(&records_xml(100)).expect("valid bench document");
    doc.set_default_namespace(Some("urn:bench".to_string()));

    c.bench_function("write", |b| {
        b.iter(|| doc.write(black_box("record[id = '42']/name"), black_box("renamed")))
    });
}

fn benchmark_options(c: &mut Criterion) {
    let mut options = SearchOptions::new();
    for i in 0..20 {
        let element = ElementRef::new("urn:bench", format!("field{}", i)).expect("valid element");
        let mut range = RangeConstraint::new("xs:int", element).expect("valid range");
        for j in 0..5 {
            let (ge, lt) = (j.to_string(), (j + 1).to_string());
            let bucket = ComputedBucket::new(format!("b{}", j), ge, lt, "zero", "Bucket")
                .expect("valid bucket");
            range.add_bucket(bucket);
        }
        options
            .add_range_constraint(format!("Field {}", i), range)
            .expect("unique constraint");
    }

    c.bench_function("serialize_options", |b| b.iter(|| black_box(&options).serialize()));
}

criterion_group!(
    benches,
    benchmark_parse,
    benchmark_read,
    benchmark_chained_read,
    benchmark_write,
    benchmark_options
);
criterion_main!(benches);
