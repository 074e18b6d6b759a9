mod assignment;
mod domain;
mod domain_id;
mod linear_expression;
mod literal;
mod model_error;

pub use assignment::Assignment;
pub use domain::Domain;
pub use domain_id::DomainId;
pub use linear_expression::LinearExpression;
pub use literal::Literal;
pub use model_error::ModelError;
