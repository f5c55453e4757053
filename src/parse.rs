use crate::operator::{
    DefaultOperators, Kind, Operator, ParserConfig, CLOSED_PRECEDENCE,
    OPEN_PARENTHESIS_PRECEDENCE, ROOT_OPERATOR,
};
use crate::prefix_map::PrefixMap;
use crate::scanner::{is_identifier_char, Cursor};
use crate::tree::{Node, NodeId, Proposition, SymbolTable, Tree};
use lazy_static::lazy_static;
use std::collections::HashMap;
use thiserror::Error;

lazy_static! {
    static ref DEFAULT_CONFIG: ParserConfig<DefaultOperators> = ParserConfig::default();
}

/// Why a formula couldn't be parsed
///
/// Every variant carries the position of the offending character, counted in `char`s from the
/// start of the input. Parsing stops at the first error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// The input ended where an operand was expected
    #[error("unexpected end of expression at {position}")]
    UnexpectedEnd {
        /// Where the operand was expected
        position: usize,
    },
    /// No unary operator starts with this character
    #[error("unknown unary operator {found:?} at {position}")]
    UnknownUnaryOperator {
        /// The offending character
        found: char,
        /// Its position
        position: usize,
    },
    /// No binary operator starts with this character
    #[error("unknown binary operator {found:?} at {position}")]
    UnknownBinaryOperator {
        /// The offending character
        found: char,
        /// Its position
        position: usize,
    },
    /// A `)` without an open parenthesis to close
    #[error("unmatched right parenthesis at {position}")]
    UnmatchedRightParenthesis {
        /// The position of the `)`
        position: usize,
    },
}

impl SyntaxError {
    /// The position of the offending character
    pub fn position(&self) -> usize {
        match *self {
            SyntaxError::UnexpectedEnd { position }
            | SyntaxError::UnknownUnaryOperator { position, .. }
            | SyntaxError::UnknownBinaryOperator { position, .. }
            | SyntaxError::UnmatchedRightParenthesis { position } => position,
        }
    }
}

/// A parsed formula together with its variables
#[derive(Debug, Clone)]
pub struct Parsed<'a> {
    /// The formula
    pub tree: Tree<'a>,
    /// Every variable of the formula, mapped to its leaf in `tree`
    pub symbols: SymbolTable<'a>,
}

impl<'a> Parsed<'a> {
    /// Assign a value to a variable by name, returning false if the formula doesn't contain it
    ///
    /// ```
    /// let parsed = polish_notation::parse("p ^ q").unwrap();
    /// assert!(parsed.evaluate());
    /// parsed.assign("p", true);
    /// assert!(!parsed.evaluate());
    /// assert!(!parsed.assign("r", true));
    /// ```
    pub fn assign(&self, name: &str, value: bool) -> bool {
        match self
            .symbols
            .get(name)
            .and_then(|id| self.tree.proposition(id))
        {
            Some(prop) => {
                prop.set_value(value);
                true
            }
            None => false,
        }
    }

    /// Evaluate the formula with the current assignment
    pub fn evaluate(&self) -> bool {
        self.tree.evaluate()
    }
}

/// What the parser accepts next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// An identifier or a unary operator
    Operand,
    /// A binary operator, a `)`, or the end of input
    OperatorOrEnd,
    Done,
}

/// A node while the tree is still growing; children can be missing
#[derive(Debug)]
enum Draft<'a> {
    Operator {
        operator: &'a Operator,
        left: Option<usize>,
        right: Option<usize>,
        parent: Option<usize>,
    },
    Parenthesis {
        operator: &'a Operator,
        closed: bool,
        right: Option<usize>,
        parent: Option<usize>,
    },
    Leaf(Proposition<'a>),
}

impl<'a> Draft<'a> {
    fn from_operator(operator: &'a Operator) -> Self {
        if operator.is_parenthesis() {
            Draft::Parenthesis {
                operator,
                closed: false,
                right: None,
                parent: None,
            }
        } else {
            Draft::Operator {
                operator,
                left: None,
                right: None,
                parent: None,
            }
        }
    }

    fn precedence(&self) -> i32 {
        match self {
            Draft::Operator { operator, .. } => operator.precedence(),
            Draft::Parenthesis { closed: false, .. } => OPEN_PARENTHESIS_PRECEDENCE,
            Draft::Parenthesis { closed: true, .. } | Draft::Leaf(_) => CLOSED_PRECEDENCE,
        }
    }

    fn parent(&self) -> Option<usize> {
        match self {
            Draft::Operator { parent, .. } | Draft::Parenthesis { parent, .. } => *parent,
            Draft::Leaf(_) => None,
        }
    }
}

/// The synthetic root always sits at the start of the arena
const ROOT: usize = 0;

/// Builds a tree by climbing parent links from the insertion point
struct Climber<'a, M> {
    cursor: Cursor<'a>,
    config: &'a ParserConfig<M>,
    drafts: Vec<Draft<'a>>,
    /// The insertion point: the operator awaiting its next child
    former: usize,
    leaves: HashMap<&'a str, usize>,
}

impl<'a, M> Climber<'a, M>
where
    M: PrefixMap<Operator>,
{
    fn new(inp: &'a str, config: &'a ParserConfig<M>) -> Self {
        Climber {
            cursor: Cursor::new(inp),
            config,
            drafts: vec![Draft::from_operator(&ROOT_OPERATOR)],
            former: ROOT,
            leaves: HashMap::new(),
        }
    }

    fn push(&mut self, draft: Draft<'a>) -> usize {
        self.drafts.push(draft);
        self.drafts.len() - 1
    }

    /// Replace the right child of `at`, returning the previous one
    fn replace_right(&mut self, at: usize, child: usize) -> Option<usize> {
        match &mut self.drafts[at] {
            Draft::Operator { right, .. } | Draft::Parenthesis { right, .. } => {
                right.replace(child)
            }
            Draft::Leaf(_) => None,
        }
    }

    fn set_left(&mut self, at: usize, child: Option<usize>) {
        if let Draft::Operator { left, .. } = &mut self.drafts[at] {
            *left = child;
        }
    }

    fn set_parent(&mut self, at: usize, new: usize) {
        match &mut self.drafts[at] {
            Draft::Operator { parent, .. } | Draft::Parenthesis { parent, .. } => {
                *parent = Some(new);
            }
            Draft::Leaf(_) => {}
        }
    }

    /// Each identifier gets one leaf per parse, constants included
    fn leaf(&mut self, name: &'a str) -> usize {
        if let Some(&id) = self.leaves.get(name) {
            return id;
        }
        let id = self.push(Draft::Leaf(Proposition::resolve(name)));
        self.leaves.insert(name, id);
        id
    }

    /// The closest open parenthesis at or above the insertion point
    fn open_parenthesis(&self) -> Option<usize> {
        let mut at = Some(self.former);
        while let Some(id) = at {
            if let Draft::Parenthesis { closed: false, .. } = self.drafts[id] {
                return Some(id);
            }
            at = self.drafts[id].parent();
        }
        None
    }

    fn expect_operand(&mut self) -> Result<State, SyntaxError> {
        self.cursor.skip_blank();
        let position = self.cursor.position();
        let next = self
            .cursor
            .peek()
            .ok_or(SyntaxError::UnexpectedEnd { position })?;

        if is_identifier_char(next) {
            if let Some(name) = self.cursor.next_identifier() {
                let leaf = self.leaf(name);
                self.replace_right(self.former, leaf);
            }
            return Ok(State::OperatorOrEnd);
        }

        let config = self.config;
        let unary = config
            .operators(Kind::Unary)
            .ok()
            .and_then(|ops| self.cursor.next_operator(ops));
        let operator = match unary {
            Some(operator) => operator,
            None if next == ')' && self.open_parenthesis().is_none() => {
                return Err(SyntaxError::UnmatchedRightParenthesis { position })
            }
            None => {
                return Err(SyntaxError::UnknownUnaryOperator {
                    found: next,
                    position,
                })
            }
        };
        let node = self.push(Draft::from_operator(operator));
        self.replace_right(self.former, node);
        self.set_parent(node, self.former);
        self.former = node;
        Ok(State::Operand)
    }

    fn expect_operator(&mut self) -> Result<State, SyntaxError> {
        self.cursor.skip_blank();
        let position = self.cursor.position();
        let Some(next) = self.cursor.peek() else {
            return Ok(State::Done);
        };

        if next == ')' {
            let open = self
                .open_parenthesis()
                .ok_or(SyntaxError::UnmatchedRightParenthesis { position })?;
            if let Draft::Parenthesis { closed, .. } = &mut self.drafts[open] {
                *closed = true;
            }
            self.former = self.drafts[open].parent().unwrap_or(ROOT);
            self.cursor.bump();
            return Ok(State::OperatorOrEnd);
        }

        let config = self.config;
        let binary = config
            .operators(Kind::Binary)
            .ok()
            .and_then(|ops| self.cursor.next_operator(ops));
        let Some(operator) = binary else {
            return Err(SyntaxError::UnknownBinaryOperator {
                found: next,
                position,
            });
        };
        let precedence = operator.precedence();
        // the root is below every operator, so this stops there at the latest
        while self.drafts[self.former].precedence() >= precedence {
            match self.drafts[self.former].parent() {
                Some(parent) => self.former = parent,
                None => break,
            }
        }
        let node = self.push(Draft::from_operator(operator));
        let detached = self.replace_right(self.former, node);
        self.set_left(node, detached);
        self.set_parent(node, self.former);
        if let Some(detached) = detached {
            self.set_parent(detached, node);
        }
        self.former = node;
        Ok(State::Operand)
    }

    fn run(mut self) -> Result<Parsed<'a>, SyntaxError> {
        let mut state = State::Operand;
        while state != State::Done {
            state = match state {
                State::Operand => self.expect_operand()?,
                State::OperatorOrEnd => self.expect_operator()?,
                State::Done => State::Done,
            };
        }
        self.finish()
    }

    /// Drop the synthetic root and freeze the drafts into a tree
    fn finish(self) -> Result<Parsed<'a>, SyntaxError> {
        let end = SyntaxError::UnexpectedEnd {
            position: self.cursor.position(),
        };
        // ids shift down by one once the root is gone, and its children lose their parent
        let shift = |id: usize| NodeId(id - 1);
        let link = |id: Option<usize>| id.filter(|&id| id != ROOT).map(shift);

        let root = match self.drafts[ROOT] {
            Draft::Operator { right, .. } => link(right).ok_or_else(|| end.clone())?,
            _ => return Err(end),
        };
        let mut symbols = SymbolTable::default();
        let mut nodes = Vec::with_capacity(self.drafts.len() - 1);
        for (id, draft) in self.drafts.into_iter().enumerate().skip(1) {
            let node = match draft {
                Draft::Operator {
                    operator,
                    left: Some(left),
                    right,
                    parent: up,
                } => Node::Binary {
                    operator,
                    left: shift(left),
                    right: link(right).ok_or_else(|| end.clone())?,
                    parent: link(up),
                },
                Draft::Operator {
                    operator,
                    left: None,
                    right,
                    parent: up,
                } => Node::Unary {
                    operator,
                    right: link(right).ok_or_else(|| end.clone())?,
                    parent: link(up),
                },
                Draft::Parenthesis {
                    operator,
                    closed,
                    right,
                    parent: up,
                } => Node::Parenthesis {
                    operator,
                    closed,
                    right: link(right).ok_or_else(|| end.clone())?,
                    parent: link(up),
                },
                Draft::Leaf(prop) => {
                    if !prop.is_constant() {
                        symbols.insert(prop.name(), shift(id));
                    }
                    Node::Identifier(prop)
                }
            };
            nodes.push(node);
        }
        Ok(Parsed {
            tree: Tree::new(nodes.into(), root),
            symbols,
        })
    }
}

/// Parse a formula with an explicit operator configuration
///
/// ```
/// use polish_notation::{parse_with, Notation, ParserConfig};
///
/// let config = ParserConfig::default();
/// let parsed = parse_with("!(a | b) & c", &config).unwrap();
/// assert_eq!(parsed.tree.render(Notation::Polish), "&!|abc");
/// ```
pub fn parse_with<'a, M>(inp: &'a str, config: &'a ParserConfig<M>) -> Result<Parsed<'a>, SyntaxError>
where
    M: PrefixMap<Operator>,
{
    Climber::new(inp, config).run()
}

/// Parse a formula with the [built-in operators][crate::BUILTIN_OPERATORS]
pub fn parse(inp: &str) -> Result<Parsed<'_>, SyntaxError> {
    parse_with(inp, &*DEFAULT_CONFIG)
}
