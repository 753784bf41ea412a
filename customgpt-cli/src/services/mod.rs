// Business logic services layer
//
// Reusable logic on top of the API executor, shared by the CLI commands.

pub mod pagination;
pub mod projects;
