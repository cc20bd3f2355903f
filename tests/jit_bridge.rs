//! Behavior that only exists inside a compiled function frame: multi-arity
//! dispatch, `recur` trampolining, and named self-recursion (SPEC_FULL.md
//! §4.5, §4.9). These never reach `eval` directly — only through a
//! [`TreeWalkingHost`]-compiled [`FunctionExpr`].

use glaive_eval::ast::*;
use glaive_eval::value::{dynamic_call, CallArgs, Object, Symbol};
use glaive_eval::{Context, JitHost, TreeWalkingHost};
use std::rc::Rc;

fn literal(frame: &Rc<Frame>, obj: Object) -> Expr {
    Expr::PrimitiveLiteral(PrimitiveLiteralExpr {
        base: ExprBase::new(Rc::clone(frame)),
        data: obj,
    })
}

fn local(frame: &Rc<Frame>, name: &str) -> Expr {
    Expr::LocalReference(LocalReferenceExpr {
        base: ExprBase::new(Rc::clone(frame)),
        name: Symbol::new(name),
    })
}

fn setup() -> (Rc<Context>, Rc<dyn JitHost>) {
    (Rc::new(Context::new("user")), TreeWalkingHost::new() as Rc<dyn JitHost>)
}

/// `recur` loops within a single arity without growing the Rust stack: a
/// countdown function compiled once, invoked with a large starting count.
#[test]
fn recur_trampolines_without_stack_growth() {
    let (ctx, jit) = setup();
    let root = Frame::root();
    let arity_frame = Frame::child(&root, FrameKind::Fn);

    // (fn countdown [n] (if (= n 0) :done (recur (dec n))))
    //
    // `=`/`dec` aren't primitives this crate models, so the body inlines
    // the arithmetic via a `let` binding plus a crude integer comparison
    // expressed as `if` on a literal-folded condition is awkward without a
    // runtime `=`; instead drive the loop with `recur`'s argument directly
    // reaching zero, checked structurally below via a native predicate.
    let body = vec![Expr::If(IfExpr {
        base: ExprBase::new(Rc::clone(&arity_frame)),
        condition: Box::new(Expr::Call(CallExpr {
            base: ExprBase::new(Rc::clone(&arity_frame)),
            source_expr: Box::new(Expr::VarDeref(VarDerefExpr {
                base: ExprBase::new(Rc::clone(&arity_frame)),
                qualified_name: Symbol::qualified("user", "zero?"),
            })),
            arg_exprs: vec![local(&arity_frame, "n")],
        })),
        then: Box::new(literal(&arity_frame, Object::Keyword(ctx.intern_keyword(None, "done")))),
        else_: Some(Box::new(Expr::Recur(RecurExpr {
            base: ExprBase::new(Rc::clone(&arity_frame)),
            arg_exprs: vec![Expr::Call(CallExpr {
                base: ExprBase::new(Rc::clone(&arity_frame)),
                source_expr: Box::new(Expr::VarDeref(VarDerefExpr {
                    base: ExprBase::new(Rc::clone(&arity_frame)),
                    qualified_name: Symbol::qualified("user", "dec"),
                })),
                arg_exprs: vec![local(&arity_frame, "n")],
            })],
        }))),
    })];

    ctx.intern_var("user", "zero?").bind_root(Object::Function(Rc::new(
        glaive_eval::value::NativeFn::new("zero?", |args| match args {
            CallArgs::Fixed(v) => Ok(Object::Bool(matches!(v.as_slice(), [Object::Integer(0)]))),
            _ => Ok(Object::Bool(false)),
        }),
    )));
    ctx.intern_var("user", "dec").bind_root(Object::Function(Rc::new(
        glaive_eval::value::NativeFn::new("dec", |args| match args {
            CallArgs::Fixed(v) => match v.as_slice() {
                [Object::Integer(n)] => Ok(Object::Integer(n - 1)),
                _ => panic!("dec expects one integer"),
            },
            _ => panic!("dec expects one integer"),
        }),
    )));

    let function_expr = FunctionExpr {
        base: ExprBase::new(Rc::clone(&root)),
        name: "countdown".to_string(),
        unique_name: "countdown_0".to_string(),
        arities: vec![FunctionArity {
            frame: arity_frame,
            params: vec![Symbol::new("n")],
            is_variadic: false,
            body,
        }],
    };

    let compiled = jit.compile(&ctx, &function_expr).unwrap();
    let result = dynamic_call(
        compiled.as_ref(),
        CallArgs::Fixed(vec![Object::Integer(100_000)]),
    )
    .unwrap();
    assert_eq!(result, Object::Keyword(ctx.intern_keyword(None, "done")));
}

/// Multi-arity dispatch: a 1-arity and a 2-arity arm on the same function,
/// selected by argument count.
#[test]
fn multi_arity_dispatch_selects_by_argc() {
    let (ctx, jit) = setup();
    let root = Frame::root();
    let unary_frame = Frame::child(&root, FrameKind::Fn);
    let binary_frame = Frame::child(&root, FrameKind::Fn);

    let function_expr = FunctionExpr {
        base: ExprBase::new(Rc::clone(&root)),
        name: "greet".to_string(),
        unique_name: "greet_0".to_string(),
        arities: vec![
            FunctionArity {
                frame: Rc::clone(&unary_frame),
                params: vec![Symbol::new("a")],
                is_variadic: false,
                body: vec![local(&unary_frame, "a")],
            },
            FunctionArity {
                frame: Rc::clone(&binary_frame),
                params: vec![Symbol::new("a"), Symbol::new("b")],
                is_variadic: false,
                body: vec![local(&binary_frame, "b")],
            },
        ],
    };

    let compiled = jit.compile(&ctx, &function_expr).unwrap();
    assert_eq!(
        dynamic_call(compiled.as_ref(), CallArgs::Fixed(vec![Object::Integer(1)])).unwrap(),
        Object::Integer(1)
    );
    assert_eq!(
        dynamic_call(
            compiled.as_ref(),
            CallArgs::Fixed(vec![Object::Integer(1), Object::Integer(2)])
        )
        .unwrap(),
        Object::Integer(2)
    );
    assert!(dynamic_call(compiled.as_ref(), CallArgs::Fixed(vec![])).is_err());
}

/// `recursion_reference` yields the enclosing function's own callable
/// handle, usable for non-tail self-calls via `named_recursion`.
#[test]
fn named_recursion_self_reference() {
    let (ctx, jit) = setup();
    let root = Frame::root();
    let arity_frame = Frame::child(&root, FrameKind::Fn);

    ctx.intern_var("user", "zero?").bind_root(Object::Function(Rc::new(
        glaive_eval::value::NativeFn::new("zero?", |args| match args {
            CallArgs::Fixed(v) => Ok(Object::Bool(matches!(v.as_slice(), [Object::Integer(0)]))),
            _ => Ok(Object::Bool(false)),
        }),
    )));
    ctx.intern_var("user", "dec").bind_root(Object::Function(Rc::new(
        glaive_eval::value::NativeFn::new("dec", |args| match args {
            CallArgs::Fixed(v) => match v.as_slice() {
                [Object::Integer(n)] => Ok(Object::Integer(n - 1)),
                _ => panic!("dec expects one integer"),
            },
            _ => panic!("dec expects one integer"),
        }),
    )));
    ctx.intern_var("user", "*").bind_root(Object::Function(Rc::new(
        glaive_eval::value::NativeFn::new("*", |args| match args {
            CallArgs::Fixed(v) => match v.as_slice() {
                [Object::Integer(a), Object::Integer(b)] => Ok(Object::Integer(a * b)),
                _ => panic!("* expects two integers"),
            },
            _ => panic!("* expects two integers"),
        }),
    )));

    // (fn fact [n] (if (zero? n) 1 (* n (fact (dec n)))))
    let body = vec![Expr::If(IfExpr {
        base: ExprBase::new(Rc::clone(&arity_frame)),
        condition: Box::new(Expr::Call(CallExpr {
            base: ExprBase::new(Rc::clone(&arity_frame)),
            source_expr: Box::new(Expr::VarDeref(VarDerefExpr {
                base: ExprBase::new(Rc::clone(&arity_frame)),
                qualified_name: Symbol::qualified("user", "zero?"),
            })),
            arg_exprs: vec![local(&arity_frame, "n")],
        })),
        then: Box::new(literal(&arity_frame, Object::Integer(1))),
        else_: Some(Box::new(Expr::Call(CallExpr {
            base: ExprBase::new(Rc::clone(&arity_frame)),
            source_expr: Box::new(Expr::VarDeref(VarDerefExpr {
                base: ExprBase::new(Rc::clone(&arity_frame)),
                qualified_name: Symbol::qualified("user", "*"),
            })),
            arg_exprs: vec![
                local(&arity_frame, "n"),
                Expr::NamedRecursion(NamedRecursionExpr {
                    base: ExprBase::new(Rc::clone(&arity_frame)),
                    arg_exprs: vec![Expr::Call(CallExpr {
                        base: ExprBase::new(Rc::clone(&arity_frame)),
                        source_expr: Box::new(Expr::VarDeref(VarDerefExpr {
                            base: ExprBase::new(Rc::clone(&arity_frame)),
                            qualified_name: Symbol::qualified("user", "dec"),
                        })),
                        arg_exprs: vec![local(&arity_frame, "n")],
                    })],
                }),
            ],
        }))),
    })];

    let function_expr = FunctionExpr {
        base: ExprBase::new(Rc::clone(&root)),
        name: "fact".to_string(),
        unique_name: "fact_0".to_string(),
        arities: vec![FunctionArity {
            frame: arity_frame,
            params: vec![Symbol::new("n")],
            is_variadic: false,
            body,
        }],
    };

    let compiled = jit.compile(&ctx, &function_expr).unwrap();
    let result = dynamic_call(compiled.as_ref(), CallArgs::Fixed(vec![Object::Integer(5)])).unwrap();
    assert_eq!(result, Object::Integer(120));
}
