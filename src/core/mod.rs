pub mod currency;
pub mod error;
pub mod validation;

pub use currency::CurrencyCode;
pub use error::{AppError, Result};
pub use validation::{FieldError, FieldPath, PathSegment, ValidationErrors};
