//! Truth tables and principal normal forms
//!
//! A table is built by assigning every combination of values to the variables of a parsed formula
//! and evaluating the tree once per combination. Row indices read the assignment as a binary
//! number, most significant bit first, in the order the symbols were given.
//!
//! ```
//! use polish_notation::{enumerate, parse, Direction};
//!
//! let parsed = parse("a | b").unwrap();
//! let table = enumerate(&parsed.tree, &parsed.symbols.ordered(), Direction::Ascending).unwrap();
//! assert_eq!(table.len(), 4);
//! assert_eq!(table.pdnf(), [1, 2, 3]);
//! assert_eq!(table.cnf(), [3]);
//! ```
use crate::tree::{NodeId, Notation, Proposition, Symbol, Tree};
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// The most variables a table can enumerate, bounded by 32-bit signed row indices
pub const MAX_PROPOSITIONS: usize = 31;

/// The order rows are visited and reported in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// From all false to all true
    #[default]
    Ascending,
    /// From all true to all false
    Descending,
}

impl Direction {
    /// The row index visited at `position`; applying it twice is the identity
    fn index(self, position: u32, rows: u32) -> u32 {
        match self {
            Direction::Ascending => position,
            Direction::Descending => rows - 1 - position,
        }
    }
}

/// Why a table couldn't be built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// More than [`MAX_PROPOSITIONS`] variables
    #[error("{count} propositions exceed the limit of {MAX_PROPOSITIONS}")]
    TooManyPropositions {
        /// The number of variables requested
        count: usize,
    },
    /// The symbol doesn't name a variable leaf of the tree
    #[error("proposition {name:?} doesn't belong to this formula")]
    ForeignSymbol {
        /// The symbol's name
        name: String,
    },
    /// The same variable was listed twice
    #[error("proposition {name:?} is listed more than once")]
    DuplicateProposition {
        /// The symbol's name
        name: String,
    },
    /// The cancellation flag was raised
    #[error("enumeration cancelled after {rows} rows")]
    Cancelled {
        /// Rows evaluated before stopping
        rows: usize,
    },
}

/// One evaluated assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Row {
    /// The row index, the assignment read as a binary number
    pub index: u32,
    /// The value of the formula under the assignment
    pub value: bool,
    width: usize,
}

impl Row {
    /// The assignment of every variable, in table order
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.width).map(|j| self.bit(j))
    }

    /// The value of the `j`th variable, `None` past the last one
    pub fn assignment(&self, j: usize) -> Option<bool> {
        (j < self.width).then(|| self.bit(j))
    }

    fn bit(&self, j: usize) -> bool {
        (self.index >> (self.width - 1 - j)) & 1 == 1
    }
}

/// The evaluated truth table of a formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable<'a> {
    names: Vec<&'a str>,
    formula: String,
    direction: Direction,
    /// Formula values in visiting order
    values: Vec<bool>,
}

impl<'a> TruthTable<'a> {
    /// The number of rows, `2^n` for `n` variables
    ///
    /// Never zero, a formula without variables still has one row.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// The variable names in column order
    pub fn names(&self) -> &[&'a str] {
        &self.names
    }

    /// The formula in infix notation
    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// The order rows were visited in
    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn rows_u32(&self) -> u32 {
        // at most 2^31 rows
        self.values.len() as u32
    }

    /// Row indices paired with formula values, in visiting order
    fn visited(&self) -> impl Iterator<Item = (u32, bool)> + '_ {
        self.rows().map(|row| (row.index, row.value))
    }

    /// The rows in visiting order
    pub fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        let rows = self.rows_u32();
        let width = self.names.len();
        self.values
            .iter()
            .zip(0..)
            .map(move |(&value, position)| Row {
                index: self.direction.index(position, rows),
                value,
                width,
            })
    }

    /// Minterms of the principal disjunctive normal form
    ///
    /// The indices of every row where the formula is true, always ascending whatever the
    /// direction the table was enumerated in.
    pub fn pdnf(&self) -> Vec<u32> {
        let mut minterms: Vec<_> = self
            .visited()
            .filter(|&(_, value)| value)
            .map(|(index, _)| index)
            .collect();
        if self.direction == Direction::Descending {
            minterms.reverse();
        }
        minterms
    }

    /// Maxterms of the principal conjunctive normal form
    ///
    /// `2^n - 1 - i` for every row `i` where the formula is false, ascending like
    /// [`pdnf`][TruthTable::pdnf].
    pub fn cnf(&self) -> Vec<u32> {
        let last = self.rows_u32() - 1;
        let mut maxterms: Vec<_> = self
            .visited()
            .filter(|&(_, value)| !value)
            .map(|(index, _)| last - index)
            .collect();
        if self.direction == Direction::Ascending {
            maxterms.reverse();
        }
        maxterms
    }

    /// Render the table with custom value symbols and separators
    ///
    /// The header lists each variable followed by `sep`, then the formula and `line_sep`. Each row
    /// lists every assignment and the formula value, each followed by `sep`, and ends with
    /// `line_sep`.
    ///
    /// ```
    /// use polish_notation::{enumerate, parse, Direction};
    ///
    /// let parsed = parse("!p").unwrap();
    /// let table = enumerate(&parsed.tree, &parsed.symbols.ordered(), Direction::Ascending).unwrap();
    /// assert_eq!(table.render("1", "0", " ", "; "), "p !p; 0 1 ; 1 0 ; ");
    /// ```
    pub fn render(&self, t: &str, f: &str, sep: &str, line_sep: &str) -> String {
        let mut out = String::new();
        for name in &self.names {
            out.push_str(name);
            out.push_str(sep);
        }
        out.push_str(&self.formula);
        out.push_str(line_sep);
        for row in self.rows() {
            for val in row.bits().chain([row.value]) {
                out.push_str(if val { t } else { f });
                out.push_str(sep);
            }
            out.push_str(line_sep);
        }
        out
    }
}

/// Renders with `T`, `F`, tabs, and newlines
impl<'a> fmt::Display for TruthTable<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render("T", "F", "\t", "\n"))
    }
}

/// Resolve symbols to the leaves they assign
fn columns<'t, 'a>(
    tree: &'t Tree<'a>,
    symbols: &[Symbol<'a>],
) -> Result<Vec<&'t Proposition<'a>>, TableError> {
    if symbols.len() > MAX_PROPOSITIONS {
        return Err(TableError::TooManyPropositions {
            count: symbols.len(),
        });
    }
    let mut seen: HashSet<NodeId> = HashSet::with_capacity(symbols.len());
    symbols
        .iter()
        .map(|symbol| {
            let prop = tree
                .proposition(symbol.id)
                .filter(|prop| !prop.is_constant() && prop.name() == symbol.name)
                .ok_or_else(|| TableError::ForeignSymbol {
                    name: symbol.name.to_owned(),
                })?;
            if !seen.insert(symbol.id) {
                return Err(TableError::DuplicateProposition {
                    name: symbol.name.to_owned(),
                });
            }
            Ok(prop)
        })
        .collect()
}

fn enumerate_inner<'a>(
    tree: &Tree<'a>,
    symbols: &[Symbol<'a>],
    direction: Direction,
    cancel: Option<&AtomicBool>,
) -> Result<TruthTable<'a>, TableError> {
    let props = columns(tree, symbols)?;
    let count = props.len();
    let rows = 1u32 << count;
    let mut values = Vec::with_capacity(rows as usize);
    for position in 0..rows {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return Err(TableError::Cancelled { rows: values.len() });
        }
        let mut current = direction.index(position, rows);
        for prop in props.iter().rev() {
            prop.set_value(current & 1 == 1);
            current >>= 1;
        }
        values.push(tree.evaluate());
    }
    Ok(TruthTable {
        names: symbols.iter().map(|symbol| symbol.name).collect(),
        formula: tree.render(Notation::Infix),
        direction,
        values,
    })
}

/// Evaluate a formula under every assignment of `symbols`
///
/// `symbols` is usually [`SymbolTable::ordered`][crate::SymbolTable::ordered] of the same parse,
/// but any ordering of distinct variables of `tree` is accepted. Variables left out keep their
/// current value; the listed ones are left holding the last visited assignment.
///
/// # Errors
/// - [`TableError::TooManyPropositions`] for more than [`MAX_PROPOSITIONS`] symbols
/// - [`TableError::ForeignSymbol`] when a symbol doesn't name a variable leaf of `tree`
/// - [`TableError::DuplicateProposition`] when a variable is listed twice
pub fn enumerate<'a>(
    tree: &Tree<'a>,
    symbols: &[Symbol<'a>],
    direction: Direction,
) -> Result<TruthTable<'a>, TableError> {
    enumerate_inner(tree, symbols, direction, None)
}

/// [`enumerate`] that gives up once `cancel` is set
///
/// The flag is checked before every row, so another thread can stop a large enumeration.
///
/// ```
/// use polish_notation::{enumerate_cancellable, parse, Direction, TableError};
/// use std::sync::atomic::AtomicBool;
///
/// let parsed = parse("a & b").unwrap();
/// let symbols = parsed.symbols.ordered();
/// let cancel = AtomicBool::new(true);
/// let res = enumerate_cancellable(&parsed.tree, &symbols, Direction::Ascending, &cancel);
/// assert_eq!(res.unwrap_err(), TableError::Cancelled { rows: 0 });
/// ```
pub fn enumerate_cancellable<'a>(
    tree: &Tree<'a>,
    symbols: &[Symbol<'a>],
    direction: Direction,
    cancel: &AtomicBool,
) -> Result<TruthTable<'a>, TableError> {
    enumerate_inner(tree, symbols, direction, Some(cancel))
}

#[cfg(test)]
mod tests {
    use super::{enumerate, enumerate_cancellable, Direction, TableError, MAX_PROPOSITIONS};
    use crate::parse::parse;
    use crate::tree::{NodeId, Symbol};
    use std::sync::atomic::AtomicBool;

    #[test]
    fn ascending_forms() {
        let parsed = parse("a|b").unwrap();
        let symbols = parsed.symbols.ordered();
        let table = enumerate(&parsed.tree, &symbols, Direction::Ascending).unwrap();
        assert_eq!(table.pdnf(), [1, 2, 3]);
        assert_eq!(table.cnf(), [3]);

        let parsed = parse("a&b").unwrap();
        let symbols = parsed.symbols.ordered();
        let table = enumerate(&parsed.tree, &symbols, Direction::Ascending).unwrap();
        assert_eq!(table.pdnf(), [3]);
        assert_eq!(table.cnf(), [1, 2, 3]);

        let parsed = parse("a^b").unwrap();
        let symbols = parsed.symbols.ordered();
        let table = enumerate(&parsed.tree, &symbols, Direction::Ascending).unwrap();
        assert_eq!(table.pdnf(), [0, 1, 3]);
        assert_eq!(table.cnf(), [1]);
    }

    #[test]
    fn descending_forms() {
        let parsed = parse("a|b").unwrap();
        let symbols = parsed.symbols.ordered();
        let table = enumerate(&parsed.tree, &symbols, Direction::Descending).unwrap();
        assert_eq!(table.pdnf(), [1, 2, 3]);
        assert_eq!(table.cnf(), [3]);

        let parsed = parse("a&b").unwrap();
        let symbols = parsed.symbols.ordered();
        let table = enumerate(&parsed.tree, &symbols, Direction::Descending).unwrap();
        assert_eq!(table.pdnf(), [3]);
        assert_eq!(table.cnf(), [1, 2, 3]);

        let parsed = parse("a^b^c").unwrap();
        let symbols = parsed.symbols.ordered();
        let up = enumerate(&parsed.tree, &symbols, Direction::Ascending).unwrap();
        let down = enumerate(&parsed.tree, &symbols, Direction::Descending).unwrap();
        assert_eq!(down.pdnf(), up.pdnf());
        assert_eq!(down.cnf(), up.cnf());
    }

    #[test]
    fn rows_and_bits() {
        let parsed = parse("a & !b").unwrap();
        let symbols = parsed.symbols.ordered();
        let table = enumerate(&parsed.tree, &symbols, Direction::Descending).unwrap();
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].index, 3);
        assert_eq!(rows[0].bits().collect::<Vec<_>>(), [true, true]);
        assert!(!rows[0].value);
        assert_eq!(rows[1].index, 2);
        assert_eq!(rows[1].assignment(0), Some(true));
        assert_eq!(rows[1].assignment(1), Some(false));
        assert_eq!(rows[1].assignment(2), None);
        assert!(rows[1].value);
        assert_eq!(rows[3].index, 0);
    }

    #[test]
    fn symbol_order_picks_the_bits() {
        let parsed = parse("a & !b").unwrap();
        let symbols = parsed.symbols.ordered_by(|l, r| r.name.cmp(l.name));
        let table = enumerate(&parsed.tree, &symbols, Direction::Ascending).unwrap();
        assert_eq!(table.names(), ["b", "a"]);
        // a true and b false is now 01
        assert_eq!(table.pdnf(), [1]);
    }

    #[test]
    fn default_rendering() {
        let parsed = parse("a|b").unwrap();
        let symbols = parsed.symbols.ordered();
        let table = enumerate(&parsed.tree, &symbols, Direction::Ascending).unwrap();
        assert_eq!(
            table.to_string(),
            "a\tb\ta|b\nF\tF\tF\t\nF\tT\tT\t\nT\tF\tT\t\nT\tT\tT\t\n"
        );
        assert_eq!(table.formula(), "a|b");
    }

    #[test]
    fn without_variables() {
        let parsed = parse("T & !F").unwrap();
        let table = enumerate(&parsed.tree, &[], Direction::Descending).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.pdnf(), [0]);
        assert!(table.cnf().is_empty());
        assert_eq!(table.to_string(), "T&!F\nT\t\n");
    }

    #[test]
    fn rejected_symbols() {
        let parsed = parse("a | T").unwrap();
        let a = parsed.symbols.get("a").unwrap();
        let dup = [Symbol { name: "a", id: a }, Symbol { name: "a", id: a }];
        assert_eq!(
            enumerate(&parsed.tree, &dup, Direction::Ascending).unwrap_err(),
            TableError::DuplicateProposition { name: "a".into() }
        );
        let missing = [Symbol {
            name: "z",
            id: NodeId(99),
        }];
        assert_eq!(
            enumerate(&parsed.tree, &missing, Direction::Ascending).unwrap_err(),
            TableError::ForeignSymbol { name: "z".into() }
        );
        let renamed = [Symbol { name: "b", id: a }];
        assert!(enumerate(&parsed.tree, &renamed, Direction::Ascending).is_err());
        let root = [Symbol {
            name: "a",
            id: parsed.tree.root(),
        }];
        assert!(enumerate(&parsed.tree, &root, Direction::Ascending).is_err());
    }

    #[test]
    fn too_many_propositions() {
        let formula = (0..=MAX_PROPOSITIONS)
            .map(|i| format!("p{i}"))
            .collect::<Vec<_>>()
            .join(" | ");
        let parsed = parse(&formula).unwrap();
        let symbols = parsed.symbols.ordered();
        assert_eq!(
            enumerate(&parsed.tree, &symbols, Direction::Ascending).unwrap_err(),
            TableError::TooManyPropositions { count: 32 }
        );
    }

    #[test]
    fn cancellation_is_checked_per_row() {
        let parsed = parse("a | b").unwrap();
        let symbols = parsed.symbols.ordered();
        let cancel = AtomicBool::new(false);
        let table =
            enumerate_cancellable(&parsed.tree, &symbols, Direction::Ascending, &cancel).unwrap();
        assert_eq!(table.len(), 4);
        cancel.store(true, std::sync::atomic::Ordering::Relaxed);
        assert_eq!(
            enumerate_cancellable(&parsed.tree, &symbols, Direction::Ascending, &cancel)
                .unwrap_err(),
            TableError::Cancelled { rows: 0 }
        );
    }
}
