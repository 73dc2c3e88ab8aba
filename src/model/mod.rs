//! Schema model: fields, filters, validators and the tables of a star schema.
//!
//! Everything here is built once from configuration and is immutable
//! afterwards, apart from the current value held by each [`Filter`].

pub mod field;
pub mod filter;
pub mod table;
pub mod validator;

pub use field::{Field, FieldInfo, FieldLike, ForeignKey, SummaryField, TableField};
pub use filter::{Filter, Operator, LIKE_ESCAPE};
pub use table::{Dimension, Fact, LookupTable, OrderSpec, Table, LABEL_COLUMN};
pub use validator::{Validation, Validator};
