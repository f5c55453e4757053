//! The structures that make up a parsed formula
//!
//! - [`Tree`] - an arena of [`Node`]s with a designated root
//! - [`Node`] - a binary operator, a unary operator, a parenthesis, or an identifier leaf
//! - [`Proposition`] - the value carried by an identifier leaf
//! - [`SymbolTable`] - the identifiers of one parse, each mapped to its unique leaf
//!
//! Nodes point at their children and at their parent with [`NodeId`]s into the arena, so parent
//! links carry no ownership. Every occurrence of an identifier within one formula refers to the
//! same leaf, which makes the tree a DAG whose only shared nodes are leaves. Assigning a value to
//! that leaf is therefore enough to re-evaluate the whole formula.
use crate::operator::{Kind, Operator, CLOSED_PRECEDENCE, OPEN_PARENTHESIS_PRECEDENCE};
use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// The index of a node inside its [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// A truth constant shared by every formula
#[derive(Debug)]
pub struct Constant {
    name: &'static str,
    value: bool,
}

impl Constant {
    /// The identifier that denotes the constant
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The constant's value
    pub fn value(&self) -> bool {
        self.value
    }
}

/// The constant written `T`
pub static TRUE: Constant = Constant {
    name: "T",
    value: true,
};

/// The constant written `F`
pub static FALSE: Constant = Constant {
    name: "F",
    value: false,
};

/// The value held by an identifier leaf
#[derive(Debug, Clone)]
pub enum Proposition<'a> {
    /// One of the [`TRUE`] and [`FALSE`] singletons
    Constant(&'static Constant),
    /// A named variable whose value is assigned from outside
    Variable {
        /// The identifier text
        name: &'a str,
        /// The current assignment
        value: Cell<bool>,
    },
}

impl<'a> Proposition<'a> {
    /// A fresh variable, initially false
    pub fn variable(name: &'a str) -> Self {
        Proposition::Variable {
            name,
            value: Cell::new(false),
        }
    }

    /// Resolve an identifier, mapping `T` and `F` to the shared constants
    pub fn resolve(name: &'a str) -> Self {
        match name {
            "T" => Proposition::Constant(&TRUE),
            "F" => Proposition::Constant(&FALSE),
            name => Proposition::variable(name),
        }
    }

    /// The identifier text
    pub fn name(&self) -> &'a str {
        match self {
            Proposition::Constant(constant) => constant.name,
            Proposition::Variable { name, .. } => *name,
        }
    }

    /// The current value
    pub fn value(&self) -> bool {
        match self {
            Proposition::Constant(constant) => constant.value,
            Proposition::Variable { value, .. } => value.get(),
        }
    }

    /// Assign a value; constants ignore this
    pub fn set_value(&self, new: bool) {
        if let Proposition::Variable { value, .. } = self {
            value.set(new);
        }
    }

    /// True for the `T` and `F` singletons
    pub fn is_constant(&self) -> bool {
        matches!(self, Proposition::Constant(_))
    }
}

/// A node of a parsed formula
#[derive(Debug, Clone)]
pub enum Node<'a> {
    /// An infix operator
    Binary {
        /// The operator descriptor
        operator: &'a Operator,
        /// The left operand
        left: NodeId,
        /// The right operand
        right: NodeId,
        /// The enclosing operator, `None` at the root
        parent: Option<NodeId>,
    },
    /// A prefix operator
    Unary {
        /// The operator descriptor
        operator: &'a Operator,
        /// The operand
        right: NodeId,
        /// The enclosing operator, `None` at the root
        parent: Option<NodeId>,
    },
    /// A parenthesized group
    ///
    /// A group still open when the input ended stays `closed: false`.
    Parenthesis {
        /// The opener that started the group, rendered in infix
        operator: &'a Operator,
        /// Whether the matching `)` was seen
        closed: bool,
        /// The grouped formula
        right: NodeId,
        /// The enclosing operator, `None` at the root
        parent: Option<NodeId>,
    },
    /// An identifier leaf
    Identifier(Proposition<'a>),
}

impl<'a> Node<'a> {
    /// The kind of the node; parentheses count as unary
    pub fn kind(&self) -> Kind {
        match self {
            Node::Binary { .. } => Kind::Binary,
            Node::Unary { .. } | Node::Parenthesis { .. } => Kind::Unary,
            Node::Identifier(_) => Kind::Value,
        }
    }

    /// How tightly the node binds
    pub fn precedence(&self) -> i32 {
        match self {
            Node::Binary { operator, .. } | Node::Unary { operator, .. } => operator.precedence(),
            Node::Parenthesis { closed: false, .. } => OPEN_PARENTHESIS_PRECEDENCE,
            Node::Parenthesis { closed: true, .. } | Node::Identifier(_) => CLOSED_PRECEDENCE,
        }
    }

    /// The symbol written for the node in infix notation
    pub fn symbol(&self) -> &str {
        match self {
            Node::Binary { operator, .. }
            | Node::Unary { operator, .. }
            | Node::Parenthesis { operator, .. } => &operator.symbol,
            Node::Identifier(prop) => prop.name(),
        }
    }

    /// The enclosing operator, always `None` for leaves
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            Node::Binary { parent, .. }
            | Node::Unary { parent, .. }
            | Node::Parenthesis { parent, .. } => *parent,
            Node::Identifier(_) => None,
        }
    }

    /// The left operand of a binary node
    pub fn left(&self) -> Option<NodeId> {
        match self {
            Node::Binary { left, .. } => Some(*left),
            _ => None,
        }
    }

    /// The right (or only) operand of an operator node
    pub fn right(&self) -> Option<NodeId> {
        match self {
            Node::Binary { right, .. }
            | Node::Unary { right, .. }
            | Node::Parenthesis { right, .. } => Some(*right),
            Node::Identifier(_) => None,
        }
    }

    /// The proposition of an identifier leaf
    pub fn proposition(&self) -> Option<&Proposition<'a>> {
        match self {
            Node::Identifier(prop) => Some(prop),
            _ => None,
        }
    }
}

/// A notation to render a formula in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notation {
    /// Operators between their operands, parentheses kept, e.g. `(a|b)&c`
    Infix,
    /// Operators before their operands, e.g. `&|abc`
    Polish,
    /// Operators after their operands, e.g. `ab|c&`
    ReversePolish,
}

/// A parsed formula
///
/// The topology is fixed once parsing completes, only the values of variable leaves change.
#[derive(Debug, Clone)]
pub struct Tree<'a> {
    nodes: Box<[Node<'a>]>,
    root: NodeId,
}

impl<'a> Tree<'a> {
    pub(crate) fn new(nodes: Box<[Node<'a>]>, root: NodeId) -> Self {
        Tree { nodes, root }
    }

    /// The outermost node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The number of nodes; each distinct identifier counts once
    ///
    /// A parsed tree always has at least one node.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Get a node by id
    ///
    /// # Panics
    /// When `id` comes from a different tree and is out of bounds.
    pub fn node(&self, id: NodeId) -> &Node<'a> {
        &self.nodes[id.0]
    }

    /// Get a node by id, `None` when out of bounds
    pub fn get(&self, id: NodeId) -> Option<&Node<'a>> {
        self.nodes.get(id.0)
    }

    /// The parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// The proposition stored at `id`, if it is a leaf
    pub fn proposition(&self, id: NodeId) -> Option<&Proposition<'a>> {
        self.get(id).and_then(Node::proposition)
    }

    /// Iterate over all nodes with their ids
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<'a>)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    /// Evaluate the formula with the current leaf values
    ///
    /// Nothing is cached, every call walks the whole tree.
    pub fn evaluate(&self) -> bool {
        self.evaluate_at(self.root)
    }

    /// Evaluate the subformula rooted at `id`
    ///
    /// The walk keeps its own stack, so arbitrarily deep formulas don't overflow.
    pub fn evaluate_at(&self, id: NodeId) -> bool {
        let mut pending = vec![(id, false)];
        let mut values: Vec<bool> = Vec::new();
        while let Some((id, expanded)) = pending.pop() {
            let node = self.node(id);
            match (node, expanded) {
                (Node::Identifier(prop), _) => values.push(prop.value()),
                (_, false) => {
                    pending.push((id, true));
                    pending.extend(node.right().map(|right| (right, false)));
                    pending.extend(node.left().map(|left| (left, false)));
                }
                // operands were pushed left first, so they come off right first
                (Node::Binary { operator, .. }, true) => {
                    let right = values.pop().unwrap_or_default();
                    let left = values.pop().unwrap_or_default();
                    values.push(operator.apply(Some(left), right));
                }
                (Node::Unary { operator, .. }, true) => {
                    let right = values.pop().unwrap_or_default();
                    values.push(operator.apply(None, right));
                }
                (Node::Parenthesis { .. }, true) => {}
            }
        }
        values.pop().unwrap_or_default()
    }

    /// Render the formula
    pub fn render(&self, notation: Notation) -> String {
        self.render_at(self.root, notation)
    }

    /// Render the subformula rooted at `id`
    pub fn render_at(&self, id: NodeId, notation: Notation) -> String {
        let mut out = String::new();
        self.render_into(id, notation, &mut out);
        out
    }

    /// Append the rendering of the subformula rooted at `id` to `out`
    pub fn render_into(&self, id: NodeId, notation: Notation, out: &mut String) {
        let mut pending = vec![Step::Visit(id)];
        while let Some(step) = pending.pop() {
            let id = match step {
                Step::Emit(text) => {
                    out.push_str(text);
                    continue;
                }
                Step::Visit(id) => id,
            };
            // steps are pushed in reverse of their output order
            match (self.node(id), notation) {
                (Node::Identifier(prop), _) => out.push_str(prop.name()),
                (Node::Parenthesis { operator, right, .. }, Notation::Infix) => {
                    pending.extend([
                        Step::Emit(")"),
                        Step::Visit(*right),
                        Step::Emit(&operator.symbol),
                    ]);
                }
                (Node::Parenthesis { right, .. }, _) => pending.push(Step::Visit(*right)),
                (
                    Node::Binary {
                        operator,
                        left,
                        right,
                        ..
                    },
                    _,
                ) => {
                    let (left, right, symbol) =
                        (Step::Visit(*left), Step::Visit(*right), Step::Emit(&operator.symbol));
                    pending.extend(match notation {
                        Notation::Infix => [right, symbol, left],
                        Notation::Polish => [right, left, symbol],
                        Notation::ReversePolish => [symbol, right, left],
                    });
                }
                (
                    Node::Unary {
                        operator, right, ..
                    },
                    Notation::Infix | Notation::Polish,
                ) => pending.extend([Step::Visit(*right), Step::Emit(&operator.symbol)]),
                (
                    Node::Unary {
                        operator, right, ..
                    },
                    Notation::ReversePolish,
                ) => pending.extend([Step::Emit(&operator.symbol), Step::Visit(*right)]),
            }
        }
    }
}

/// A pending piece of a rendering
enum Step<'t> {
    Visit(NodeId),
    Emit(&'t str),
}

/// Formats the formula in infix notation
impl<'a> fmt::Display for Tree<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Notation::Infix))
    }
}

/// A proposition picked out of a [`SymbolTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol<'a> {
    /// The identifier text
    pub name: &'a str,
    /// The leaf holding the proposition
    pub id: NodeId,
}

/// The variables of one parsed formula
///
/// Constants are not listed. A table belongs to the tree it was parsed with; using it with any
/// other tree is an error that [`enumerate`][crate::enumerate] reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable<'a> {
    ids: HashMap<&'a str, NodeId>,
}

impl<'a> SymbolTable<'a> {
    pub(crate) fn insert(&mut self, name: &'a str, id: NodeId) {
        self.ids.insert(name, id);
    }

    /// The leaf of a variable
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.ids.get(name).copied()
    }

    /// The number of distinct variables
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if the formula has no variables
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate over the variables in no particular order
    pub fn iter(&self) -> impl Iterator<Item = Symbol<'a>> + '_ {
        self.ids.iter().map(|(&name, &id)| Symbol { name, id })
    }

    /// The variables sorted by identifier text
    ///
    /// ```
    /// let parsed = polish_notation::parse("q | p & q_2").unwrap();
    /// let names: Vec<_> = parsed.symbols.ordered().iter().map(|s| s.name).collect();
    /// assert_eq!(names, ["p", "q", "q_2"]);
    /// ```
    pub fn ordered(&self) -> Vec<Symbol<'a>> {
        self.ordered_by(|left, right| left.name.cmp(right.name))
    }

    /// The variables sorted with a custom comparator
    pub fn ordered_by<F>(&self, compare: F) -> Vec<Symbol<'a>>
    where
        F: FnMut(&Symbol<'a>, &Symbol<'a>) -> Ordering,
    {
        let mut symbols: Vec<_> = self.iter().collect();
        symbols.sort_by(compare);
        symbols
    }
}
