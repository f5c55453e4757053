#[cfg(feature = "fnv")]
use polish_notation::prefix_map::FnvHashPrefixMap;
#[cfg(feature = "qp-trie")]
use polish_notation::prefix_map::QpTriePrefixMap;
use polish_notation::prefix_map::{HashPrefixMap, LinearPrefixMap};
use polish_notation::{parse_with, Cursor, Kind, Notation, Operator, OperatorRegistry, ParserConfig};
use rand::distributions::{Alphanumeric, Slice};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::WeightedIndex;
use std::borrow::Cow;

/// The builtins plus symbols that share prefixes with each other
fn registry() -> OperatorRegistry {
    let mut registry = OperatorRegistry::default();
    registry
        .register("->", Kind::Binary, 7, |l, r| !l.unwrap_or_default() || r)
        .unwrap();
    registry
        .register("<-", Kind::Binary, 7, |l, r| l.unwrap_or_default() || !r)
        .unwrap();
    registry
        .register("<->", Kind::Binary, 3, |l, r| l.unwrap_or_default() == r)
        .unwrap();
    registry
        .register("||", Kind::Binary, 10, |l, r| l.unwrap_or_default() || r)
        .unwrap();
    registry
        .register("-", Kind::Unary, 1000, |_, r| !r)
        .unwrap();
    registry
}

fn symbols() -> Vec<(Cow<'static, str>, Operator)> {
    registry()
        .iter()
        .map(|op| (op.symbol.clone(), op.clone()))
        .collect()
}

fn random_string<V>(rng: &mut impl Rng, tokens: &[(Cow<'static, str>, V)]) -> String {
    let token = Slice::new(tokens).unwrap();
    let choice = WeightedIndex::new([1, 1, 3]).unwrap();

    let mut res = String::new();
    for _ in 0..30 {
        match rng.sample(&choice) {
            0 => res.push(' '),
            1 => res.push(rng.sample(Alphanumeric).try_into().unwrap()),
            2 => res.push_str(&rng.sample(&token).0),
            _ => unreachable!(),
        }
    }
    res
}

/// Scan a string the way the parser does, recording every operator match
fn scan<M: polish_notation::prefix_map::PrefixMap<Operator>>(
    inp: &str,
    operators: &M,
) -> Vec<(usize, String)> {
    let mut cursor = Cursor::new(inp);
    let mut res = Vec::new();
    loop {
        cursor.skip_blank();
        let position = cursor.position();
        match cursor.next_operator(operators) {
            Some(op) => res.push((position, op.symbol.to_string())),
            None if cursor.bump().is_none() => break,
            None => {}
        }
    }
    res
}

const FORMULAS: [&str; 5] = [
    "a <-> b <- c -> d",
    "-(p || q) | r",
    "x<->-y||z",
    "!(a ↑ b) ↓ -c",
    "p<-q<->r->s",
];

macro_rules! make_test {
    ($name:ident, $struct:ident, $factory:ident) => {
        mod $name {
            use super::*;

            #[test]
            fn random_prefix() {
                let linear_ops = LinearPrefixMap::from_vec(symbols());
                let ref_ops = $struct::$factory(symbols());

                let mut rng = StdRng::from_seed([0; 32]);
                for _ in 0..20 {
                    let string = random_string(&mut rng, &symbols());
                    assert_eq!(scan(&string, &linear_ops), scan(&string, &ref_ops));
                }
            }

            #[test]
            fn same_trees() {
                let linear: ParserConfig<LinearPrefixMap<_, _>> =
                    ParserConfig::with_map(registry());
                let other = ParserConfig::with_map_from(registry(), $struct::$factory);
                for formula in FORMULAS {
                    let left = parse_with(formula, &linear).unwrap();
                    let right = parse_with(formula, &other).unwrap();
                    for notation in [Notation::Infix, Notation::Polish, Notation::ReversePolish] {
                        assert_eq!(left.tree.render(notation), right.tree.render(notation));
                    }
                }
            }
        }
    };
}

make_test! {hash, HashPrefixMap, from_iter}
#[cfg(feature = "fnv")]
make_test! {fnv, FnvHashPrefixMap, from_iter_hasher}
#[cfg(feature = "qp-trie")]
make_test! {qptrie, QpTriePrefixMap, from_iter}

#[test]
fn longest_symbols_in_formulas() {
    let config: ParserConfig<LinearPrefixMap<_, _>> = ParserConfig::with_map(registry());
    let parsed = parse_with("a <-> b <- c -> d", &config).unwrap();
    assert_eq!(parsed.tree.render(Notation::Polish), "<->a-><-bcd");
    let parsed = parse_with("x<->-y||z", &config).unwrap();
    assert_eq!(parsed.tree.render(Notation::Polish), "<->x||-yz");
}
