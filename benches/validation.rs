use codspeed_criterion_compat::{criterion_group, criterion_main, Criterion};
use oxrdf::{Graph, NamedNode, Term, Triple};
use oxshex::{
    Interval, Label, RecursiveValidation, RefineValidation, Shape, ShapeExpr, ShexSchema,
    ShexSchemaBuilder, TcProperty, TripleConstraint, TripleExpr, ValidationAlgorithm,
};

fn ex(local: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.org/{local}"))
}

/// S = { next @S ? }
fn chain_schema() -> ShexSchema {
    let s = Label::from(ex("S"));
    let mut builder = ShexSchemaBuilder::new();
    builder
        .add_shape(
            s.clone(),
            ShapeExpr::Shape(Shape::new(TripleExpr::repeated(
                TripleExpr::TripleConstraint(TripleConstraint::new(
                    TcProperty::forward(ex("next")),
                    ShapeExpr::ShapeRef(s),
                )),
                Interval::OPT,
            ))),
        )
        .unwrap();
    builder.build().unwrap()
}

fn chain_graph(length: usize) -> Graph {
    let mut graph = Graph::new();
    for i in 0..length {
        graph.insert(&Triple::new(
            ex(&format!("n{i}")),
            ex("next"),
            ex(&format!("n{}", i + 1)),
        ));
    }
    graph
}

fn recursive_chain(c: &mut Criterion) {
    let schema = chain_schema();
    let label = Label::from(ex("S"));
    for length in [10, 100, 1000] {
        let graph = chain_graph(length);
        let head = Term::from(ex("n0"));
        c.bench_function(&format!("recursive validation on a chain of {length}"), |b| {
            b.iter(|| {
                let mut validator = RecursiveValidation::new(&schema, &graph);
                assert!(validator.validate(&head, Some(&label)).unwrap())
            })
        });
    }
}

fn refinement_chain(c: &mut Criterion) {
    let schema = chain_schema();
    let label = Label::from(ex("S"));
    for length in [10, 100, 1000] {
        let graph = chain_graph(length);
        let head = Term::from(ex("n0"));
        c.bench_function(&format!("refinement validation on a chain of {length}"), |b| {
            b.iter(|| {
                let mut validator = RefineValidation::new(&schema, &graph);
                assert!(validator.validate(&head, Some(&label)).unwrap())
            })
        });
    }
}

criterion_group!(validation, recursive_chain, refinement_chain);
criterion_main!(validation);
