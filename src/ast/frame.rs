//! Lexical scope frames.
//!
//! Frames form an acyclic, parent-linked tree; many expressions sharing a
//! scope observe the same [`Frame`] through shared ownership.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A frame's role in the scope chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FrameKind {
    /// The top-level, pre-wrapping frame.
    Root,
    /// A frame introduced by `let`.
    Let,
    /// A frame introduced by a function arity (including a synthetic
    /// wrapper's arity, once wrapping retags the root frame).
    Fn,
}

/// Per-arity bookkeeping cross-linked from a frame once it becomes a
/// function frame.
#[derive(Debug)]
pub struct FunctionContext {
    /// The owning function's name, copied at cross-link time.
    pub name: RefCell<String>,
    /// The owning function's mangled unique name.
    pub unique_name: RefCell<String>,
}

impl FunctionContext {
    /// A function context for a function named `name`/`unique_name`.
    pub fn new(name: impl Into<String>, unique_name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: RefCell::new(name.into()),
            unique_name: RefCell::new(unique_name.into()),
        })
    }
}

/// A node in the lexical-scope tree.
#[derive(Debug)]
pub struct Frame {
    /// The enclosing frame, if any. Root frames have no parent.
    pub parent: Option<Rc<Frame>>,
    kind: Cell<FrameKind>,
    fn_ctx: RefCell<Option<Rc<FunctionContext>>>,
}

impl Frame {
    /// A fresh root frame.
    pub fn root() -> Rc<Self> {
        Rc::new(Self {
            parent: None,
            kind: Cell::new(FrameKind::Root),
            fn_ctx: RefCell::new(None),
        })
    }

    /// A child frame of `parent` with the given kind.
    pub fn child(parent: &Rc<Frame>, kind: FrameKind) -> Rc<Self> {
        Rc::new(Self {
            parent: Some(Rc::clone(parent)),
            kind: Cell::new(kind),
            fn_ctx: RefCell::new(None),
        })
    }

    /// This frame's current kind.
    pub fn kind(&self) -> FrameKind {
        self.kind.get()
    }

    /// Retags this frame's kind in place (used when wrapping promotes a
    /// root frame to a function frame).
    pub fn set_kind(&self, kind: FrameKind) {
        self.kind.set(kind);
    }

    /// The cross-linked function context, if this is a function frame.
    pub fn fn_ctx(&self) -> Option<Rc<FunctionContext>> {
        self.fn_ctx.borrow().clone()
    }

    /// Cross-links a function context onto this frame
    /// (`F.arity[0].frame.fn_ctx = ctx`).
    pub fn set_fn_ctx(&self, ctx: Rc<FunctionContext>) {
        *self.fn_ctx.borrow_mut() = Some(ctx);
    }

    /// Walks `parent` links to the root of this frame's chain.
    pub fn root_of(frame: &Rc<Frame>) -> Rc<Frame> {
        let mut current = Rc::clone(frame);
        while let Some(parent) = current.parent.clone() {
            current = parent;
        }
        current
    }
}
