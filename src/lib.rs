pub mod config;
pub mod corpus;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod record;
pub mod serve;
