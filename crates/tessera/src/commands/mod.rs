pub mod bind;
pub mod schema;
pub mod scopes;
