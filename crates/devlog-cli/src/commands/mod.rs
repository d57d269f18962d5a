pub mod auto;
pub mod events;
pub mod projects;
pub mod runs;
pub mod sessions;
pub mod snippets;
pub mod stats;
pub mod users;
