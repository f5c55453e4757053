//! A small extensible parser for propositional formulas
//!
//! This crate parses formulas like `!(p | q) & r` into an explicit expression [`Tree`], evaluates
//! them, renders them in infix, Polish, or reverse Polish notation, and derives their truth
//! tables along with the principal disjunctive and conjunctive normal forms. The parsed tree
//! keeps references to the input string and to the operator configuration in order to avoid
//! copies.
//!
//! ## Usage
//!
//! ```sh
//! cargo add polish-notation
//! ```
//!
//! then
//!
//! ```
//! use polish_notation::{enumerate, parse, Direction, Notation};
//!
//! let parsed = parse("!(p | q) & r").unwrap();
//! assert_eq!(parsed.tree.render(Notation::Polish), "&!|pqr");
//! assert_eq!(parsed.tree.render(Notation::ReversePolish), "pq|!r&");
//!
//! let table = enumerate(&parsed.tree, &parsed.symbols.ordered(), Direction::Ascending).unwrap();
//! assert_eq!(table.pdnf(), [1]);
//! ```
//!
//! A command line front end is available with the `cli` feature:
//!
//! ```sh
//! cargo run --features cli --bin polish -- 'a & !b | c'
//! ```
//!
//! ## Dialect
//!
//! Identifiers are maximal runs of `[A-Za-z0-9_]`, so `p1`, `_x` and even `42` are all
//! propositions. `T` and `F` are reserved for the true and false constants. Space, tab, and
//! newline may appear between tokens and are otherwise ignored.
//!
//! The default operators, loosest first, are
//!
//! ```txt
//! ↓   nor            1
//! ↑   nand           2
//! ~   biconditional  3
//! ^   implication    7
//! |   or             10
//! &   and            15
//! !   not            1000 (unary)
//! ( ) grouping
//! ```
//!
//! Every binary operator is left-associative, `a ^ b ^ c` is `(a ^ b) ^ c`. The grammar the
//! parser accepts is
//!
//! ```txt
//! v ::= identifier
//! u ::= ! | ...              unary operators
//! b ::= | | & | ^ | ...      binary operators
//! E ::= v | uE | (E) | (E | EbE
//! ```
//!
//! Note the `(E` alternative: a parenthesis still open at the end of the input is accepted and
//! renders as if it had been closed. Any other error stops parsing with a [`SyntaxError`] that
//! points at the offending character.
//!
//! ### Extensions
//!
//! The operator set isn't fixed.
//!
//! 1. [`parse`][crate::parse()] uses the [`BUILTIN_OPERATORS`], but [`parse_with`] accepts any
//!    [`ParserConfig`].
//! 2. New operators are added to an [`OperatorRegistry`], which is then frozen into a config.
//!    Multi-character symbols are matched longest first, so `<->` never parses as `<` followed by
//!    `->`.
//!    ```
//!    use polish_notation::{parse_with, Kind, Notation, OperatorRegistry, ParserConfig};
//!
//!    let mut registry = OperatorRegistry::default();
//!    registry.register("<->", Kind::Binary, 3, |l, r| l.unwrap_or_default() == r).unwrap();
//!    registry.register("<-", Kind::Binary, 7, |l, r| l.unwrap_or_default() || !r).unwrap();
//!    let config = ParserConfig::from(registry);
//!
//!    let parsed = parse_with("a <-> b <- c", &config).unwrap();
//!    assert_eq!(parsed.tree.render(Notation::Polish), "<->a<-bc");
//!    ```
//! 3. The map used to match operators can be swapped for any [`PrefixMap`][prefix_map::PrefixMap]
//!    with [`ParserConfig::with_map`].
//!    ```
//!    use polish_notation::prefix_map::HashPrefixMap;
//!    use polish_notation::{parse_with, OperatorRegistry, ParserConfig};
//!
//!    let config: ParserConfig<HashPrefixMap<_, _>> =
//!        ParserConfig::with_map(OperatorRegistry::default());
//!    let parsed = parse_with("p ~ q", &config).unwrap();
//!    ```
//!
//! ## Design
//!
//! The parser makes a single pass over the input and never backtracks. Rather than keeping an
//! operator stack or recursing, it keeps an *insertion point*: the node that's waiting for its
//! next child. When a binary operator arrives the insertion point climbs parent links while the
//! node there binds at least as tightly as the new operator, then the new operator steals that
//! node's right subtree as its own left operand. A synthetic root whose precedence is lower than
//! everything else stops the climb.
//!
//! Parentheses take part in the climb like any other node. An open parenthesis has precedence 0,
//! lower than every registered operator, so nothing climbs past it. Closing it raises its
//! precedence above every operator, so from then on it behaves like an identifier.
//!
//! ## Tree Structure
//!
//! A [`Tree`] is an arena of [`Node`]s addressed by [`NodeId`]. Operator nodes own their children
//! through ids and record their parent as an id, which carries no ownership. Each identifier of a
//! formula is a single leaf shared by every occurrence, and its value is a [`Cell`] so assigning
//! it through the [`SymbolTable`] is enough to re-evaluate the whole formula:
//!
//! ```
//! let parsed = polish_notation::parse("p & (p | q)").unwrap();
//! assert!(!parsed.tree.evaluate());
//! parsed.assign("p", true);
//! assert!(parsed.tree.evaluate());
//! ```
//!
//! Every parse gets its own symbol table, so separate formulas never share assignments.
//!
//! [`Cell`]: std::cell::Cell
#![warn(missing_docs)]
mod operator;
mod parse;
pub mod prefix_map;
mod scanner;
mod table;
mod tree;

pub use operator::{
    DefaultOperators, Form, Kind, Operator, OperatorRegistry, ParserConfig, RegistryError, Rule,
    BUILTIN_OPERATORS, CLOSED_PRECEDENCE, OPEN_PARENTHESIS_PRECEDENCE,
};
pub use parse::{parse, parse_with, Parsed, SyntaxError};
pub use scanner::{is_blank, is_identifier_char, Cursor};
pub use table::{
    enumerate, enumerate_cancellable, Direction, Row, TableError, TruthTable, MAX_PROPOSITIONS,
};
pub use tree::{
    Constant, Node, NodeId, Notation, Proposition, Symbol, SymbolTable, Tree, FALSE, TRUE,
};
