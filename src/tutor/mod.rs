pub mod hint;

pub use hint::{Hint, HintKind, RecommendedMove, generate_hint, hint_value};
