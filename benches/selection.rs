//! Benchmarks for candidate linking and combination search.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};

use onto_linker::config::LinkerConfig;
use onto_linker::embed::StaticEmbeddings;
use onto_linker::linker::{CombinationSelector, EntityLinker};
use onto_linker::ontology::{Category, OntologyBuilder, OntologyIndex};
use onto_linker::vocab::{MatchItem, ScoredTranslation};

const CLASSES: usize = 200;
const PROPERTIES: usize = 40;

fn iri(kind: &str, n: usize) -> String {
    format!("http://example.org/bench#{kind}{n}")
}

/// A class tree of depth ~7 with restricted, used properties.
fn ontology(rng: &mut impl Rng) -> OntologyIndex {
    let mut b = OntologyBuilder::new();
    for n in 0..CLASSES {
        b.class(&iri("Class", n)).unwrap();
        if n > 0 {
            b.subsume(&iri("Class", n), &iri("Class", (n - 1) / 2)).unwrap();
        }
    }
    for n in 0..PROPERTIES {
        b.declare(Category::ObjectProperty, &iri("relatesTo", n), None, None)
            .unwrap();
        b.add_domain(&iri("relatesTo", n), &iri("Class", rng.gen_range(0..8))).unwrap();
        b.add_range(&iri("relatesTo", n), &iri("Class", rng.gen_range(0..8))).unwrap();
    }
    for _ in 0..CLASSES {
        let subject = iri("Class", rng.gen_range(0..CLASSES));
        let property = iri("relatesTo", rng.gen_range(0..PROPERTIES));
        let object = iri("Class", rng.gen_range(0..CLASSES));
        b.assert(&subject, &property, Some(&object)).unwrap();
    }
    b.build()
}

fn candidates(index: &OntologyIndex, category: Category, n: usize, rng: &mut impl Rng) -> Vec<ScoredTranslation> {
    let labels: Vec<&str> = index.vocabulary(category).labels().collect();
    let mut out: Vec<ScoredTranslation> = (0..n)
        .map(|_| {
            let label = labels[rng.gen_range(0..labels.len())];
            ScoredTranslation::new(rng.r#gen::<f32>(), label, category)
        })
        .collect();
    out.sort_by(|a, b| b.score.total_cmp(&a.score));
    out
}

fn bench_best_combination(c: &mut Criterion) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    let index = ontology(&mut rng);
    let selector = CombinationSelector::new(&index);

    let mut group = c.benchmark_group("best_combination");
    for n in [3, 5, 10] {
        let relations = candidates(&index, Category::ObjectProperty, n, &mut rng);
        let lefts = candidates(&index, Category::Class, n, &mut rng);
        let rights = candidates(&index, Category::Class, n, &mut rng);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, _| {
            bench.iter(|| black_box(selector.best_combination(&relations, &lefts, Some(&rights)).unwrap()))
        });
    }
    group.finish();
}

fn bench_link_phrase(c: &mut Criterion) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    let index = ontology(&mut rng);
    // Label tokens are not in the table, so they all take seeded vectors.
    let row: Vec<f32> = (0..50).map(|_| rng.r#gen()).collect();
    let embeddings = StaticEmbeddings::from_rows([("links", row)]).unwrap();
    let linker = EntityLinker::new(&index, LinkerConfig::default()).with_embedder(&embeddings);

    let question = "Which thing links to another thing?";
    let item = MatchItem::tagged(question, 12, 17, false).unwrap();
    c.bench_function("link_relation_phrase", |bench| {
        bench.iter(|| black_box(linker.candidates(&item, Category::ObjectProperty, 3, question).unwrap()))
    });
}

criterion_group!(benches, bench_best_combination, bench_link_phrase);
criterion_main!(benches);
