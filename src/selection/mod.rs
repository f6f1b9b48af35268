//! Model selection: search spaces, validation strategies, grid search and
//! result naming

pub mod grid;
pub mod naming;
pub mod search_space;
pub mod validator;

pub use self::grid::{FailurePolicy, GridSearch, SearchEntry, SearchFailure, SearchReport};
pub use self::naming::{method_token, result_name, result_name_from_tag, results_filename};
pub use self::search_space::{generate, ExponentRange, SearchSpace, SearchStrategy};
pub use self::validator::{
    EvaluationMethod, ProblemKind, ValidationResult, ValidationStrategy, Validator,
};
