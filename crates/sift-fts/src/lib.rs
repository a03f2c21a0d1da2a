//! Text analysis for Sift.
//!
//! Everything here is pure and synchronous: no I/O, no shared state.
//!
//! # Modules
//!
//! - [`lexer`]: Query string to [`ParsedInput`]
//! - [`tokenizer`]: Word extraction and term frequencies
//! - [`stopwords`]: Per-language [`StopWordList`]
//! - [`soundex`]: [`SoundexGenerator`] with classic Soundex and Kölner Phonetik
//! - [`similarity`]: Longest-common-substring similarity
//! - [`nerf`]: [`TermWeightLearner`] and nerf-word classification
//!
//! # Example
//!
//! ```rust
//! use sift_fts::{parse, tokenize};
//!
//! let parsed = parse("rust -java @docs");
//! assert_eq!(parsed.required_groups, vec!["rust"]);
//! assert_eq!(tokenize("Hello, World"), vec!["hello", "world"]);
//! ```

#![forbid(unsafe_code)]

pub mod lexer;
pub mod nerf;
pub mod similarity;
pub mod soundex;
pub mod stopwords;
pub mod tokenizer;
pub mod types;

pub use lexer::parse;
pub use nerf::{NodeTermStat, TermStat, TermWeightLearner};
pub use similarity::similarity;
pub use soundex::{
    ClassicSoundex, ColognePhonetic, NoPhonetic, PhoneticEncoder, SoundexGenerator,
};
pub use stopwords::StopWordList;
pub use tokenizer::{term_frequencies, tokenize};
pub use types::ParsedInput;
