//! Configuration for the coordinator pipeline and the HTTP transport
//!
//! Every configuration type implements [`Validator`]; the coordinator and
//! connector constructors validate before use.

pub mod pipeline;
pub mod transport;
pub mod validation;

pub use pipeline::CoordinatorConfig;
pub use transport::HttpTransportConfig;
pub use validation::{ConfigDefaults, ConfigResult, ConfigValidator, ConfigurationError, Validator};
