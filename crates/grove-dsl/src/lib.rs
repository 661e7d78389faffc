//! Text front end for grove behavior trees.
//!
//! ```text
//! # patrol.bt
//! tree Guard {
//!     Selector root {
//!         Sequence chase {
//!             Condition HasValue { key: "target" }
//!             Timeout give_up {
//!                 timeout: 4
//!                 Action Wait { duration: 10 }
//!             }
//!         }
//!         Action Log { message: "all quiet" }
//!     }
//! }
//! ```
//!
//! [`parse`] tokenizes the source, finds the first `tree` declaration and
//! builds its root node, resolving `Action`/`Condition` leaves by name through
//! a [`grove_bt::NodeRegistry`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod error;
pub mod parser;
pub mod token;

pub use error::{ParseError, Result};
pub use parser::{parse, parse_file, Parser};
pub use token::{tokenize, Keyword, Token, TokenKind};
