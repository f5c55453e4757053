#![feature(test)]


extern crate test;

#[cfg(feature = "fnv")]
use polish_notation::prefix_map::FnvHashPrefixMap;
#[cfg(feature = "qp-trie")]
use polish_notation::prefix_map::QpTriePrefixMap;
use polish_notation::prefix_map::{HashPrefixMap, LinearPrefixMap};
use polish_notation::{parse_with, OperatorRegistry, ParserConfig};
use examples::{EXAMPLES, RANDOM_EXAMPLES};
use std::hint::black_box;
use test::Bencher;

macro_rules! make_bench {
    ($name:ident, $struct:ident, $factory:ident) => {
        mod $name {
            use super::*;

            #[bench]
            fn example_parse(bench: &mut Bencher) {
                let config = ParserConfig::with_map_from(OperatorRegistry::default(), $struct::$factory);
                bench.iter(|| {
                    for example in EXAMPLES {
                        black_box(parse_with(black_box(example), &config)).unwrap();
                    }
                });
            }

            #[bench]
            fn random_parse(bench: &mut Bencher) {
                let config = ParserConfig::with_map_from(OperatorRegistry::default(), $struct::$factory);
                let examples = &*RANDOM_EXAMPLES; // deref to for generation outside of bench
                bench.iter(|| {
                    for example in examples {
                        black_box(parse_with(black_box(example), &config)).unwrap();
                    }
                });
            }
        }
    };
}

make_bench! {linear, LinearPrefixMap, from_iter}
make_bench! {hash, HashPrefixMap, from_iter}
#[cfg(feature = "fnv")]
make_bench! {fnv, FnvHashPrefixMap, from_iter_hasher}
#[cfg(feature = "qp-trie")]
make_bench! {qptrie, QpTriePrefixMap, from_iter}
