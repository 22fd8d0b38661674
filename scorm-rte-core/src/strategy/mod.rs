//! Strategy layer for validation behaviour.
//!
//! Conformant content gets strict checks against the namespace table; legacy
//! content written against permissive LMSs can opt out.

pub mod validation;

pub use validation::{
    select_validation_strategy, PermissiveValidation, StrictValidation, ValidationStrategy,
};
