//! Search options: typed constraint definitions and the compiler that turns
//! them into the options document understood by the search service.

pub mod constraint;
pub mod error;
pub mod options;

pub use constraint::{
    ComputedBucket, ConstraintDefinition, ElementRef, RangeConstraint, ValueConstraint,
    WordConstraint,
};
pub use error::SearchError;
pub use options::{SEARCH_NAMESPACE, SearchOptions, constraint_token};
