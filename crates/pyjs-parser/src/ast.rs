use serde::Serialize;

use pyjs_common::Loc;

/// A decoded literal value, mirroring [`pyjs_lexer::Literal`] at the AST
/// layer so the parser crate does not need to depend on lexer token shapes
/// beyond what it consumes while building nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LitValue {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
}

/// Body of a `lambda params: expr` or `def(params): body` expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LambdaBody {
    Expr(Box<Expr>),
    Block(Vec<Stmt>),
}

/// A `for` head's step clause: "any expression, typically an assignment or
/// augmented assignment" (the only place outside `AssignStmt` where an
/// assignment-shaped clause is legal).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ForStep {
    Expr(Expr),
    Assign {
        target: Box<Expr>,
        op: AssignOp,
        value: Box<Expr>,
    },
}

/// Expression AST -- a plain tagged sum, exhaustively matched by the
/// transpiler. No subtype hierarchy, no lossless trivia.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Literal {
        value: LitValue,
        loc: Loc,
    },
    Var {
        name: String,
        loc: Loc,
    },
    SelfRef {
        loc: Loc,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
        loc: Loc,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        loc: Loc,
    },
    Logical {
        left: Box<Expr>,
        op: LogicalOp,
        right: Box<Expr>,
        loc: Loc,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        loc: Loc,
    },
    Member {
        object: Box<Expr>,
        name: String,
        loc: Loc,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
        loc: Loc,
    },
    Group {
        inner: Box<Expr>,
        loc: Loc,
    },
    ObjectLiteral {
        entries: Vec<(String, Expr)>,
        loc: Loc,
    },
    ListLiteral {
        elements: Vec<Expr>,
        loc: Loc,
    },
    Lambda {
        params: Vec<String>,
        body: LambdaBody,
        loc: Loc,
    },
}

impl Expr {
    pub fn loc(&self) -> Loc {
        match self {
            Expr::Literal { loc, .. }
            | Expr::Var { loc, .. }
            | Expr::SelfRef { loc }
            | Expr::Binary { loc, .. }
            | Expr::Unary { loc, .. }
            | Expr::Logical { loc, .. }
            | Expr::Call { loc, .. }
            | Expr::Member { loc, .. }
            | Expr::Index { loc, .. }
            | Expr::Group { loc, .. }
            | Expr::ObjectLiteral { loc, .. }
            | Expr::ListLiteral { loc, .. }
            | Expr::Lambda { loc, .. } => *loc,
        }
    }
}

/// Statement AST -- one variant per statement kind from the grammar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    Variable {
        name: String,
        value: Expr,
        is_local: bool,
        loc: Loc,
    },
    Function {
        name: String,
        params: Vec<String>,
        body: Vec<Stmt>,
        is_local: bool,
        is_reserved: bool,
        loc: Loc,
    },
    Class {
        name: String,
        parent: Option<String>,
        members: Vec<Stmt>,
        is_local: bool,
        loc: Loc,
    },
    If {
        branches: Vec<(Expr, Vec<Stmt>)>,
        else_body: Option<Vec<Stmt>>,
        loc: Loc,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
        loc: Loc,
    },
    For {
        init_name: String,
        init_value: Expr,
        init_is_local: bool,
        cond: Expr,
        step: ForStep,
        body: Vec<Stmt>,
        loc: Loc,
    },
    Return {
        value: Option<Expr>,
        loc: Loc,
    },
    Break {
        loc: Loc,
    },
    Pass {
        loc: Loc,
    },
    Expression {
        expression: Expr,
        loc: Loc,
    },
    Assign {
        target: Expr,
        op: AssignOp,
        value: Expr,
        loc: Loc,
    },
}

impl Stmt {
    pub fn loc(&self) -> Loc {
        match self {
            Stmt::Variable { loc, .. }
            | Stmt::Function { loc, .. }
            | Stmt::Class { loc, .. }
            | Stmt::If { loc, .. }
            | Stmt::While { loc, .. }
            | Stmt::For { loc, .. }
            | Stmt::Return { loc, .. }
            | Stmt::Break { loc }
            | Stmt::Pass { loc }
            | Stmt::Expression { loc, .. }
            | Stmt::Assign { loc, .. } => *loc,
        }
    }
}
