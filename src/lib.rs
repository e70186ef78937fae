pub use reflectpad_internal::*;
