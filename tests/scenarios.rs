//! End-to-end evaluator scenarios (SPEC_FULL.md §8, S1-S6): each builds an
//! AST by hand (no reader/analyzer in this crate) and checks `eval`'s
//! return value.

use glaive_eval::ast::*;
use glaive_eval::value::{CallArgs, NativeFn, Object, PersistentList, Symbol};
use glaive_eval::{eval, Context, JitHost, TreeWalkingHost};
use std::rc::Rc;

fn literal(frame: &Rc<Frame>, obj: Object) -> Expr {
    Expr::PrimitiveLiteral(PrimitiveLiteralExpr {
        base: ExprBase::new(Rc::clone(frame)),
        data: obj,
    })
}

fn var_deref(frame: &Rc<Frame>, ns: &str, name: &str) -> Expr {
    Expr::VarDeref(VarDerefExpr {
        base: ExprBase::new(Rc::clone(frame)),
        qualified_name: Symbol::qualified(ns, name),
    })
}

fn call(frame: &Rc<Frame>, source: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call(CallExpr {
        base: ExprBase::new(Rc::clone(frame)),
        source_expr: Box::new(source),
        arg_exprs: args,
    })
}

fn setup() -> (Rc<Context>, Rc<dyn JitHost>, Rc<Frame>) {
    let ctx = Rc::new(Context::new("user"));
    let jit = TreeWalkingHost::new() as Rc<dyn JitHost>;
    let root = Frame::root();
    (ctx, jit, root)
}

fn install_plus(ctx: &Context) {
    ctx.intern_var("user", "+").bind_root(Object::Function(Rc::new(NativeFn::new(
        "+",
        |args| {
            let sum: i64 = match args {
                CallArgs::Fixed(v) => v
                    .iter()
                    .map(|o| match o {
                        Object::Integer(i) => *i,
                        _ => 0,
                    })
                    .sum(),
                CallArgs::WithRest(fixed, rest) => {
                    let fixed_sum: i64 = fixed
                        .iter()
                        .map(|o| match o {
                            Object::Integer(i) => *i,
                            _ => 0,
                        })
                        .sum();
                    let rest_sum: i64 = rest
                        .iter()
                        .map(|o| match o {
                            Object::Integer(i) => *i,
                            _ => 0,
                        })
                        .sum();
                    fixed_sum + rest_sum
                }
            };
            Ok(Object::Integer(sum))
        },
    ))));
}

/// S1: `(def x 7)` returns the var; `(var_deref x)` then returns `7`.
#[test]
fn s1_def_then_deref() {
    let (ctx, jit, root) = setup();

    let def_expr = Expr::Def(DefExpr {
        base: ExprBase::new(Rc::clone(&root)),
        name: Symbol::new("x"),
        value: Some(Box::new(literal(&root, Object::Integer(7)))),
    });
    let defined = eval(&ctx, &jit, &def_expr).expect("def should succeed");
    assert!(matches!(defined, Object::Var(_)));

    let deref_expr = var_deref(&root, "user", "x");
    let value = eval(&ctx, &jit, &deref_expr).expect("deref should succeed");
    assert_eq!(value, Object::Integer(7));
}

/// S2: `(if true :a :b)` returns interned keyword `:a`, pointer-identical to
/// a previously interned handle.
#[test]
fn s2_if_returns_interned_keyword() {
    let (ctx, jit, root) = setup();
    let prior = ctx.intern_keyword(None, "a");

    let if_expr = Expr::If(IfExpr {
        base: ExprBase::new(Rc::clone(&root)),
        condition: Box::new(literal(&root, Object::Bool(true))),
        then: Box::new(literal(&root, Object::Keyword(ctx.intern_keyword(None, "a")))),
        else_: Some(Box::new(literal(&root, Object::Keyword(ctx.intern_keyword(None, "b"))))),
    });

    let value = eval(&ctx, &jit, &if_expr).expect("if should succeed");
    match value {
        Object::Keyword(k) => assert!(k.is_same_instance(&prior)),
        other => panic!("expected a keyword, got {other:?}"),
    }
}

/// S3: `[1 (+ 1 2) 3]` evaluates the nested call to `3` and yields `[1 3 3]`.
#[test]
fn s3_vector_literal_with_nested_call() {
    let (ctx, jit, root) = setup();
    install_plus(&ctx);

    let nested_call = call(
        &root,
        var_deref(&root, "user", "+"),
        vec![literal(&root, Object::Integer(1)), literal(&root, Object::Integer(2))],
    );
    let vector_expr = Expr::Vector(VectorExpr {
        base: ExprBase::new(Rc::clone(&root)),
        data_exprs: vec![literal(&root, Object::Integer(1)), nested_call, literal(&root, Object::Integer(3))],
    });

    let value = eval(&ctx, &jit, &vector_expr).expect("vector eval should succeed");
    let Object::Vector(v) = value else { panic!("expected a vector") };
    assert_eq!(v.len(), 3);
    assert_eq!(v.get(0), Some(&Object::Integer(1)));
    assert_eq!(v.get(1), Some(&Object::Integer(3)));
    assert_eq!(v.get(2), Some(&Object::Integer(3)));
}

/// §4.3: metadata present on a vector/map/set literal must be attached to
/// the constructed collection, not silently dropped.
#[test]
fn collection_literal_metadata_is_attached() {
    let (ctx, jit, root) = setup();
    let meta_tag = ctx.intern_keyword(None, "doc");

    let mut vector_base = ExprBase::new(Rc::clone(&root));
    vector_base.meta = Some(Object::Keyword(meta_tag.clone()));
    let vector_expr = Expr::Vector(VectorExpr {
        base: vector_base,
        data_exprs: vec![literal(&root, Object::Integer(1))],
    });
    let Object::Vector(v) = eval(&ctx, &jit, &vector_expr).expect("vector eval should succeed") else {
        panic!("expected a vector")
    };
    assert_eq!(v.meta(), Some(&Object::Keyword(meta_tag.clone())));

    let mut set_base = ExprBase::new(Rc::clone(&root));
    set_base.meta = Some(Object::Keyword(meta_tag.clone()));
    let set_expr = Expr::Set(SetExpr {
        base: set_base,
        data_exprs: vec![literal(&root, Object::Integer(1))],
    });
    let Object::HashSet(s) = eval(&ctx, &jit, &set_expr).expect("set eval should succeed") else {
        panic!("expected a set")
    };
    assert_eq!(s.meta(), Some(&Object::Keyword(meta_tag)));
}

/// S4: a 12-argument call against a variadic native observes positional
/// args `0..9` and a trailing persistent-list `(10 11)`.
#[test]
fn s4_variadic_tail_beyond_ten_args() {
    let (ctx, jit, root) = setup();
    ctx.intern_var("user", "observe").bind_root(Object::Function(Rc::new(NativeFn::new(
        "observe",
        |args| match args {
            CallArgs::WithRest(fixed, rest) => {
                for (i, arg) in fixed.iter().enumerate() {
                    assert_eq!(*arg, Object::Integer(i as i64));
                }
                assert_eq!(rest, PersistentList::from_slice(&[Object::Integer(10), Object::Integer(11)]));
                Ok(Object::Bool(true))
            }
            other => panic!("expected a variadic tail, got {other:?} fixed args"),
        },
    ))));

    let args: Vec<Expr> = (0..12).map(|i| literal(&root, Object::Integer(i))).collect();
    let call_expr = call(&root, var_deref(&root, "user", "observe"), args);

    let value = eval(&ctx, &jit, &call_expr).expect("call should succeed");
    assert_eq!(value, Object::Bool(true));
}

/// S5: `(let [x 2] (+ x x))` is routed through the JIT wrapper and returns `4`.
#[test]
fn s5_let_through_jit_wrapper() {
    let (ctx, jit, root) = setup();
    install_plus(&ctx);

    let let_expr = Expr::Let(LetExpr {
        base: ExprBase::new(Rc::clone(&root)),
        bindings: vec![(Symbol::new("x"), literal(&root, Object::Integer(2)))],
        body: vec![call(
            &root,
            var_deref(&root, "user", "+"),
            vec![
                Expr::LocalReference(LocalReferenceExpr {
                    base: ExprBase::new(Rc::clone(&root)),
                    name: Symbol::new("x"),
                }),
                Expr::LocalReference(LocalReferenceExpr {
                    base: ExprBase::new(Rc::clone(&root)),
                    name: Symbol::new("x"),
                }),
            ],
        )],
    });

    let value = eval(&ctx, &jit, &let_expr).expect("let should succeed");
    assert_eq!(value, Object::Integer(4));
}

/// S6: `(try (throw "boom") (catch Exception e :caught))` returns `:caught`.
#[test]
fn s6_try_catches_thrown_value() {
    let (ctx, jit, root) = setup();

    let try_expr = Expr::Try(TryExpr {
        base: ExprBase::new(Rc::clone(&root)),
        body: vec![Expr::Throw(ThrowExpr {
            base: ExprBase::new(Rc::clone(&root)),
            value: Box::new(literal(&root, Object::Str(Rc::from("boom")))),
        })],
        catch_name: Symbol::new("e"),
        catch_body: vec![literal(&root, Object::Keyword(ctx.intern_keyword(None, "caught")))],
    });

    let value = eval(&ctx, &jit, &try_expr).expect("try should succeed");
    assert_eq!(value, Object::Keyword(ctx.intern_keyword(None, "caught")));
}

/// §4.4 step 2: a `call` whose `source_expr` evaluates to the var itself
/// (`var_ref`, not `var_deref`) must deref it before dispatching, same as
/// if the call had gone through `var_deref` directly.
#[test]
fn call_source_var_ref_is_dereffed_before_dispatch() {
    let (ctx, jit, root) = setup();
    install_plus(&ctx);

    let source = Expr::VarRef(VarRefExpr {
        base: ExprBase::new(Rc::clone(&root)),
        qualified_name: Symbol::qualified("user", "+"),
    });
    let call_expr = call(
        &root,
        source,
        vec![
            literal(&root, Object::Integer(1)),
            literal(&root, Object::Integer(2)),
        ],
    );

    let value = eval(&ctx, &jit, &call_expr).expect("call through var_ref should succeed");
    assert_eq!(value, Object::Integer(3));
}
