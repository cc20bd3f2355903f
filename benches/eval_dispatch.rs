//! Dispatch benchmarks: fixed-arity vs. variadic-tail `call` evaluation,
//! and end-to-end `let`-wrapped evaluation through the tree-walking JIT
//! bridge.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glaive_eval::ast::{CallExpr, Expr, ExprBase, Frame, PrimitiveLiteralExpr};
use glaive_eval::value::{CallArgs, NativeFn, Object};
use glaive_eval::{eval, Context, TreeWalkingHost};
use std::rc::Rc;

fn bench_call_args_from_evaluated(c: &mut Criterion) {
    let mut group = c.benchmark_group("call_args_from_evaluated");
    for argc in [0usize, 5, 10, 11, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(argc), &argc, |b, &argc| {
            let args: Vec<Object> = (0..argc).map(|i| Object::Integer(i as i64)).collect();
            b.iter(|| CallArgs::from_evaluated(args.clone()));
        });
    }
    group.finish();
}

fn literal(frame: &Rc<Frame>, n: i64) -> Expr {
    Expr::PrimitiveLiteral(PrimitiveLiteralExpr {
        base: ExprBase::new(Rc::clone(frame)),
        data: Object::Integer(n),
    })
}

fn bench_native_call_eval(c: &mut Criterion) {
    let ctx = Rc::new(Context::new("bench"));
    let jit: Rc<dyn glaive_eval::JitHost> = TreeWalkingHost::new();
    let root = Frame::root();

    ctx.intern_var("bench", "identity").bind_root(Object::Function(Rc::new(
        NativeFn::new("identity", |args| match args {
            CallArgs::Fixed(mut v) if v.len() == 1 => Ok(v.remove(0)),
            other => Ok(Object::Integer(other.len() as i64)),
        }),
    )));

    let call_expr = Expr::Call(CallExpr {
        base: ExprBase::new(Rc::clone(&root)),
        source_expr: Box::new(Expr::VarDeref(glaive_eval::ast::VarDerefExpr {
            base: ExprBase::new(Rc::clone(&root)),
            qualified_name: glaive_eval::value::Symbol::qualified("bench", "identity"),
        })),
        arg_exprs: vec![literal(&root, 42)],
    });

    c.bench_function("native_call_eval", |b| {
        b.iter(|| eval(&ctx, &jit, &call_expr).unwrap());
    });
}

criterion_group!(benches, bench_call_args_from_evaluated, bench_native_call_eval);
criterion_main!(benches);
