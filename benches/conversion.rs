// Benchmarks for html-to-markdown conversion.

use criterion::{criterion_group, criterion_main, Criterion};
use antimark::convert;

fn bench_simple(c: &mut Criterion) {
    let html = "<h1>Hello</h1><p>This is a <strong>simple</strong> document.</p>";
    c.bench_function("simple_document", |b| {
        b.iter(|| convert(html).unwrap());
    });
}

fn bench_nested_lists(c: &mut Criterion) {
    let mut html = String::from("<ul>");
    for i in 0..50 {
        html.push_str(&format!(
            "<li>item {i}<ol><li>first</li><li>second</li></ol></li>"
        ));
    }
    html.push_str("</ul>");
    c.bench_function("nested_lists", |b| {
        b.iter(|| convert(&html).unwrap());
    });
}

fn bench_mixed_document(c: &mut Criterion) {
    let html = r#"
        <h1>Title</h1>
        <p>Intro with a <a href="http://example.com" title="E">link</a> and
        <code>inline code</code>.</p>
        <blockquote><p>A quoted thought.</p><p>And another.</p></blockquote>
        <pre><code>fn main() {
    println!("hi");
}</code></pre>
        <hr/>
        <p><img src="pic.png" alt="pic"/>caption</p>
    "#;
    c.bench_function("mixed_document", |b| {
        b.iter(|| convert(html).unwrap());
    });
}

criterion_group!(benches, bench_simple, bench_nested_lists, bench_mixed_document);
criterion_main!(benches);
