use criterion::{Criterion, criterion_group, criterion_main};
use skilltree::model::NodeIdAllocator;
use skilltree::parser::SkillTreeParser;
use std::hint::black_box;

/// (name, depth, branching factor)
const GENERATED_TREES: &[(&str, usize, usize)] = &[
    ("deep-binary", 12, 2),
    ("wide-shallow", 3, 16),
    ("balanced-4", 6, 4),
];

/// Writes a complete tree of the given depth and branching factor,
/// with leaf types cycling through human, robot, mixed.
fn generate(depth: usize, branching: usize) -> String {
    fn write(out: &mut String, depth: usize, branching: usize, counter: &mut usize) {
        *counter += 1;
        out.push_str(&format!("n{counter}"));
        if depth == 0 {
            out.push_str(["  human ", " robot ", " mixed "][*counter % 3]);
            return;
        }
        out.push_str(" { ");
        for _ in 0..branching {
            write(out, depth - 1, branching, counter);
        }
        out.push_str("} ");
    }

    let mut out = String::new();
    write(&mut out, depth, branching, &mut 0);
    out
}

fn parsing(c: &mut Criterion) {
    let parser = SkillTreeParser::new().with_allocator(NodeIdAllocator::new());
    for (name, depth, branching) in GENERATED_TREES {
        let input = generate(*depth, *branching);
        c.bench_function(&format!("parse/{name}"), |b| {
            b.iter(|| parser.parse_str(black_box(&input)).unwrap());
        });
    }
}

fn labeling(c: &mut Criterion) {
    let parser = SkillTreeParser::new().with_allocator(NodeIdAllocator::new());
    for (name, depth, branching) in GENERATED_TREES {
        let tree = parser.parse_str(&generate(*depth, *branching)).unwrap();
        c.bench_function(&format!("assign_labels/{name}"), |b| {
            b.iter(|| {
                let mut tree = tree.clone();
                tree.assign_labels().unwrap();
                tree
            });
        });
    }
}

criterion_group!(benches, parsing, labeling);
criterion_main!(benches);
