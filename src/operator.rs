//! Operator descriptors, the registry that collects them, and the frozen [`ParserConfig`]
//!
//! The registry is the only thing the parser consults to decide how a symbol binds. Every
//! descriptor is either *evaluated* (a precedence plus an evaluation [`Rule`]) or a *parenthesis*
//! opener, which makes the parser build a [`Parenthesis`][crate::Node::Parenthesis] node whose
//! precedence flips from lowest to highest when it is closed.
//!
//! Registration happens on an [`OperatorRegistry`]; once everything is registered the registry is
//! frozen into a [`ParserConfig`] that holds one [`PrefixMap`] per arity and is shared, read-only,
//! by every parse.
//!
//! ```
//! use polish_notation::{parse_with, Notation, OperatorRegistry, ParserConfig, Kind};
//!
//! let mut registry = OperatorRegistry::default();
//! registry.register("->", Kind::Binary, 7, |l, r| !l.unwrap_or_default() || r).unwrap();
//! let config = ParserConfig::from(registry);
//!
//! let parsed = parse_with("a -> b -> c", &config).unwrap();
//! assert_eq!(parsed.tree.render(Notation::Polish), "->->abc");
//! ```
#[cfg(not(feature = "qp-trie"))]
use crate::prefix_map::HashPrefixMap;
use crate::prefix_map::PrefixMap;
#[cfg(feature = "qp-trie")]
use crate::prefix_map::QpTriePrefixMap;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Precedence of an open parenthesis, lower than every registered operator
pub const OPEN_PARENTHESIS_PRECEDENCE: i32 = 0;
/// Precedence of a closed parenthesis and of identifiers, higher than every registered operator
pub const CLOSED_PRECEDENCE: i32 = i32::MAX;
/// Precedence of the synthetic root the parser climbs towards
pub(crate) const ROOT_PRECEDENCE: i32 = -1;

/// The kind of a node, which doubles as the arity of an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A prefix operator with a single operand
    Unary,
    /// An infix operator with two operands
    Binary,
    /// A proposition; never valid as an operator arity
    Value,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Unary => "unary",
            Kind::Binary => "binary",
            Kind::Value => "value",
        })
    }
}

/// How an operator combines its operands
///
/// Unary operators are called with `None` as their left operand.
pub type Rule = fn(Option<bool>, bool) -> bool;

/// The two shapes an operator descriptor can take
#[derive(Debug, Clone, Copy)]
pub enum Form {
    /// A regular operator with a fixed precedence
    Evaluated {
        /// Higher binds tighter
        precedence: i32,
        /// The evaluation rule
        rule: Rule,
    },
    /// A grouping opener that produces a parenthesis node
    ///
    /// The node is closed by `)`, and its precedence is [`OPEN_PARENTHESIS_PRECEDENCE`] while open
    /// and [`CLOSED_PRECEDENCE`] after.
    Parenthesis,
}

/// An immutable operator descriptor
#[derive(Debug, Clone)]
pub struct Operator {
    /// The symbol as it appears in formulas
    pub symbol: Cow<'static, str>,
    /// Whether the operator is unary or binary
    pub kind: Kind,
    /// Precedence and rule, or the parenthesis form
    pub form: Form,
}

impl Operator {
    /// Create an evaluated operator
    pub const fn evaluated(symbol: &'static str, kind: Kind, precedence: i32, rule: Rule) -> Self {
        Operator {
            symbol: Cow::Borrowed(symbol),
            kind,
            form: Form::Evaluated { precedence, rule },
        }
    }

    /// Create a parenthesis opener
    pub const fn parenthesis(symbol: &'static str) -> Self {
        Operator {
            symbol: Cow::Borrowed(symbol),
            kind: Kind::Unary,
            form: Form::Parenthesis,
        }
    }

    /// The precedence of nodes built from this operator
    ///
    /// Parenthesis openers report their open precedence.
    pub fn precedence(&self) -> i32 {
        match self.form {
            Form::Evaluated { precedence, .. } => precedence,
            Form::Parenthesis => OPEN_PARENTHESIS_PRECEDENCE,
        }
    }

    /// Apply the operator to already evaluated operands
    ///
    /// Parentheses pass their operand through.
    pub fn apply(&self, left: Option<bool>, right: bool) -> bool {
        match self.form {
            Form::Evaluated { rule, .. } => rule(left, right),
            Form::Parenthesis => right,
        }
    }

    /// True for parenthesis openers
    pub fn is_parenthesis(&self) -> bool {
        matches!(self.form, Form::Parenthesis)
    }
}

mod rules {
    pub fn or(left: Option<bool>, right: bool) -> bool {
        left.unwrap_or_default() || right
    }

    pub fn and(left: Option<bool>, right: bool) -> bool {
        left.unwrap_or_default() && right
    }

    pub fn implies(left: Option<bool>, right: bool) -> bool {
        !left.unwrap_or_default() || right
    }

    pub fn iff(left: Option<bool>, right: bool) -> bool {
        left.unwrap_or_default() == right
    }

    pub fn nand(left: Option<bool>, right: bool) -> bool {
        !(left.unwrap_or_default() && right)
    }

    pub fn nor(left: Option<bool>, right: bool) -> bool {
        !(left.unwrap_or_default() || right)
    }

    pub fn not(_: Option<bool>, right: bool) -> bool {
        !right
    }

    pub fn pass(_: Option<bool>, right: bool) -> bool {
        right
    }
}

macro_rules! operators {
    (@one $kind:ident $symbol:literal (parenthesis)) => {
        Operator::parenthesis($symbol)
    };
    (@one $kind:ident $symbol:literal ($precedence:literal, $rule:path)) => {
        Operator::evaluated($symbol, Kind::$kind, $precedence, $rule)
    };
    ($($kind:ident $symbol:literal => $form:tt;)+) => {
        [
            $(
                operators!(@one $kind $symbol $form),
            )+
        ]
    };
}

/// The built-in operators
///
/// | symbol | arity | precedence | meaning |
/// |---|---|---|---|
/// | `\|` | binary | 10 | or |
/// | `&` | binary | 15 | and |
/// | `^` | binary | 7 | implication |
/// | `~` | binary | 3 | biconditional |
/// | `↑` | binary | 2 | nand |
/// | `↓` | binary | 1 | nor |
/// | `!` | unary | 1000 | negation |
/// | `(` | unary | - | parenthesis |
pub const BUILTIN_OPERATORS: [Operator; 8] = operators!(
    Binary "|" => (10, rules::or);
    Binary "&" => (15, rules::and);
    Binary "^" => (7, rules::implies);
    Binary "~" => (3, rules::iff);
    Binary "↑" => (2, rules::nand);
    Binary "↓" => (1, rules::nor);
    Unary "!" => (1000, rules::not);
    Unary "(" => (parenthesis);
);

/// The unary operator the parser hangs the whole formula under
pub(crate) static ROOT_OPERATOR: Operator =
    Operator::evaluated("", Kind::Unary, ROOT_PRECEDENCE, rules::pass);

/// Errors raised while registering or looking up operators
///
/// These are programming errors: a correctly set up registry never produces them while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No operator with this symbol and arity exists
    #[error("{kind} operator {symbol:?} doesn't exist")]
    UnknownOperator {
        /// The requested symbol
        symbol: String,
        /// The requested arity
        kind: Kind,
    },
    /// The arity can't hold the requested operator
    #[error("operators can't have arity {kind}")]
    InvalidArity {
        /// The rejected arity
        kind: Kind,
    },
    /// The precedence would collide with the parenthesis or identifier precedences
    #[error("precedence {precedence} of {symbol:?} is outside the operator range")]
    InvalidPrecedence {
        /// The operator symbol
        symbol: String,
        /// The rejected precedence
        precedence: i32,
    },
    /// Operators need at least one character
    #[error("operator symbols can't be empty")]
    EmptySymbol,
}

/// A mutable collection of operator descriptors
///
/// [`Default`] holds the [`BUILTIN_OPERATORS`]; [`OperatorRegistry::empty`] holds nothing. Freeze
/// it into a [`ParserConfig`] before parsing.
#[derive(Debug, Clone)]
pub struct OperatorRegistry {
    unary: HashMap<Cow<'static, str>, Operator>,
    binary: HashMap<Cow<'static, str>, Operator>,
}

impl OperatorRegistry {
    /// A registry without any operators, not even parentheses
    pub fn empty() -> Self {
        OperatorRegistry {
            unary: HashMap::new(),
            binary: HashMap::new(),
        }
    }

    fn table(&self, kind: Kind) -> Result<&HashMap<Cow<'static, str>, Operator>, RegistryError> {
        match kind {
            Kind::Unary => Ok(&self.unary),
            Kind::Binary => Ok(&self.binary),
            Kind::Value => Err(RegistryError::InvalidArity { kind }),
        }
    }

    fn insert(&mut self, operator: Operator) -> Result<Option<Operator>, RegistryError> {
        if operator.symbol.is_empty() {
            return Err(RegistryError::EmptySymbol);
        }
        let table = match operator.kind {
            Kind::Unary => &mut self.unary,
            Kind::Binary if !operator.is_parenthesis() => &mut self.binary,
            kind => return Err(RegistryError::InvalidArity { kind }),
        };
        Ok(table.insert(operator.symbol.clone(), operator))
    }

    /// Add or replace an evaluated operator, returning the descriptor it replaced
    ///
    /// # Errors
    /// - [`RegistryError::InvalidArity`] for [`Kind::Value`]
    /// - [`RegistryError::EmptySymbol`] for `""`
    /// - [`RegistryError::InvalidPrecedence`] unless `0 < precedence < i32::MAX`
    pub fn register<S>(
        &mut self,
        symbol: S,
        kind: Kind,
        precedence: i32,
        rule: Rule,
    ) -> Result<Option<Operator>, RegistryError>
    where
        S: Into<Cow<'static, str>>,
    {
        let symbol = symbol.into();
        if precedence <= OPEN_PARENTHESIS_PRECEDENCE || precedence >= CLOSED_PRECEDENCE {
            return Err(RegistryError::InvalidPrecedence {
                symbol: symbol.into_owned(),
                precedence,
            });
        }
        self.insert(Operator {
            symbol,
            kind,
            form: Form::Evaluated { precedence, rule },
        })
    }

    /// Add or replace a parenthesis opener, returning the descriptor it replaced
    ///
    /// Only [`Kind::Unary`] is accepted: openers always start an operand.
    pub fn register_parenthesis<S>(
        &mut self,
        symbol: S,
        kind: Kind,
    ) -> Result<Option<Operator>, RegistryError>
    where
        S: Into<Cow<'static, str>>,
    {
        self.insert(Operator {
            symbol: symbol.into(),
            kind,
            form: Form::Parenthesis,
        })
    }

    /// Find the descriptor for a symbol and arity
    pub fn lookup(&self, symbol: &str, kind: Kind) -> Result<&Operator, RegistryError> {
        self.table(kind)?
            .get(symbol)
            .ok_or_else(|| RegistryError::UnknownOperator {
                symbol: symbol.to_owned(),
                kind,
            })
    }

    /// Iterate over every registered descriptor
    pub fn iter(&self) -> impl Iterator<Item = &Operator> {
        self.unary.values().chain(self.binary.values())
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        OperatorRegistry::from_iter(BUILTIN_OPERATORS)
    }
}

/// Collect descriptors, later duplicates replacing earlier ones
///
/// Unlike [`OperatorRegistry::register`] this doesn't validate anything, descriptors with
/// [`Kind::Value`] are dropped.
impl FromIterator<Operator> for OperatorRegistry {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Operator>,
    {
        let mut registry = OperatorRegistry::empty();
        for operator in iter {
            let table = match operator.kind {
                Kind::Unary => &mut registry.unary,
                Kind::Binary => &mut registry.binary,
                Kind::Value => continue,
            };
            table.insert(operator.symbol.clone(), operator);
        }
        registry
    }
}

/// The operator map used when no other is requested
#[cfg(feature = "qp-trie")]
pub type DefaultOperators = QpTriePrefixMap<Cow<'static, str>, Operator>;
/// The operator map used when no other is requested
#[cfg(not(feature = "qp-trie"))]
pub type DefaultOperators = HashPrefixMap<Cow<'static, str>, Operator>;

/// A frozen registry, ready to be shared by any number of parses
///
/// `M` is the [`PrefixMap`] used to match operators at the cursor.
#[derive(Debug, Clone)]
pub struct ParserConfig<M = DefaultOperators> {
    unary: M,
    binary: M,
}

impl<M> ParserConfig<M> {
    /// Freeze a registry, building each prefix map with `build`
    ///
    /// Useful for maps that aren't [`FromIterator`], e.g. with a custom hasher.
    pub fn with_map_from<F>(registry: OperatorRegistry, mut build: F) -> Self
    where
        F: FnMut(HashMap<Cow<'static, str>, Operator>) -> M,
    {
        ParserConfig {
            unary: build(registry.unary),
            binary: build(registry.binary),
        }
    }
}

impl<M> ParserConfig<M>
where
    M: FromIterator<(Cow<'static, str>, Operator)>,
{
    /// Freeze a registry into a config backed by a specific prefix map
    pub fn with_map(registry: OperatorRegistry) -> Self {
        ParserConfig::with_map_from(registry, |operators| operators.into_iter().collect())
    }
}

impl<M> ParserConfig<M>
where
    M: PrefixMap<Operator>,
{
    /// The prefix map holding operators of one arity
    pub fn operators(&self, kind: Kind) -> Result<&M, RegistryError> {
        match kind {
            Kind::Unary => Ok(&self.unary),
            Kind::Binary => Ok(&self.binary),
            Kind::Value => Err(RegistryError::InvalidArity { kind }),
        }
    }

    /// Find the descriptor for a symbol and arity
    pub fn lookup(&self, symbol: &str, kind: Kind) -> Result<&Operator, RegistryError> {
        self.operators(kind)?
            .get(symbol)
            .ok_or_else(|| RegistryError::UnknownOperator {
                symbol: symbol.to_owned(),
                kind,
            })
    }
}

impl From<OperatorRegistry> for ParserConfig {
    fn from(registry: OperatorRegistry) -> Self {
        ParserConfig::with_map(registry)
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig::from(OperatorRegistry::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Form, Kind, OperatorRegistry, ParserConfig, RegistryError, BUILTIN_OPERATORS,
        CLOSED_PRECEDENCE,
    };

    #[test]
    fn builtins_pass_validation() {
        let mut registry = OperatorRegistry::empty();
        for op in BUILTIN_OPERATORS {
            match op.form {
                Form::Evaluated { precedence, rule } => {
                    registry.register(op.symbol, op.kind, precedence, rule)
                }
                Form::Parenthesis => registry.register_parenthesis(op.symbol, op.kind),
            }
            .unwrap();
        }
        assert_eq!(registry.iter().count(), 8);
    }

    #[test]
    fn builtin_truth_functions() {
        let registry = OperatorRegistry::default();
        let table = |symbol: &str| {
            let op = registry.lookup(symbol, Kind::Binary).unwrap();
            [(false, false), (false, true), (true, false), (true, true)]
                .map(|(l, r)| op.apply(Some(l), r))
        };
        assert_eq!(table("|"), [false, true, true, true]);
        assert_eq!(table("&"), [false, false, false, true]);
        assert_eq!(table("^"), [true, true, false, true]);
        assert_eq!(table("~"), [true, false, false, true]);
        assert_eq!(table("↑"), [true, true, true, false]);
        assert_eq!(table("↓"), [true, false, false, false]);

        let not = registry.lookup("!", Kind::Unary).unwrap();
        assert!(not.apply(None, false));
        assert!(!not.apply(None, true));
        assert_eq!(not.precedence(), 1000);

        let paren = registry.lookup("(", Kind::Unary).unwrap();
        assert!(paren.is_parenthesis());
        assert_eq!(paren.precedence(), 0);
        assert!(paren.apply(None, true));
    }

    #[test]
    fn lookup_failures() {
        let registry = OperatorRegistry::default();
        assert_eq!(
            registry.lookup("&", Kind::Unary).unwrap_err(),
            RegistryError::UnknownOperator {
                symbol: "&".into(),
                kind: Kind::Unary
            }
        );
        assert_eq!(
            registry.lookup("!", Kind::Value).unwrap_err(),
            RegistryError::InvalidArity { kind: Kind::Value }
        );
    }

    #[test]
    fn register_replaces() {
        let mut registry = OperatorRegistry::default();
        let old = registry
            .register("|", Kind::Binary, 20, |l, r| l.unwrap_or_default() ^ r)
            .unwrap()
            .unwrap();
        assert_eq!(old.precedence(), 10);
        let new = registry.lookup("|", Kind::Binary).unwrap();
        assert_eq!(new.precedence(), 20);
        assert!(!new.apply(Some(true), true));
    }

    #[test]
    fn register_rejections() {
        let mut registry = OperatorRegistry::empty();
        assert_eq!(
            registry.register("", Kind::Binary, 5, |_, r| r).unwrap_err(),
            RegistryError::EmptySymbol
        );
        assert_eq!(
            registry.register("?", Kind::Value, 5, |_, r| r).unwrap_err(),
            RegistryError::InvalidArity { kind: Kind::Value }
        );
        assert_eq!(
            registry.register("?", Kind::Binary, 0, |_, r| r).unwrap_err(),
            RegistryError::InvalidPrecedence {
                symbol: "?".into(),
                precedence: 0
            }
        );
        assert!(registry
            .register("?", Kind::Binary, CLOSED_PRECEDENCE, |_, r| r)
            .is_err());
        assert_eq!(
            registry.register_parenthesis("[", Kind::Binary).unwrap_err(),
            RegistryError::InvalidArity { kind: Kind::Binary }
        );
        assert_eq!(registry.iter().count(), 0);
    }

    #[test]
    fn config_lookup_is_exact() {
        let mut registry = OperatorRegistry::default();
        registry
            .register(String::from("<->"), Kind::Binary, 3, |l, r| {
                l.unwrap_or_default() == r
            })
            .unwrap();
        let config = ParserConfig::from(registry);
        assert_eq!(config.lookup("<->", Kind::Binary).unwrap().precedence(), 3);
        assert!(config.lookup("<-", Kind::Binary).is_err());
        assert!(config.lookup("!", Kind::Binary).is_err());
        assert!(config.lookup("!", Kind::Unary).is_ok());
    }
}
