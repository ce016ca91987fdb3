// ── Query engine ──
//
// Predicate resolution for `where`/`find`, and the pluggable matcher
// behind `filter`.

pub mod matcher;
pub mod predicate;

pub use matcher::{ExpressionMatcher, FilterComparator, FilterExpression, Matcher, ValueCompareFn};
pub use predicate::{MatchFn, Predicate};
