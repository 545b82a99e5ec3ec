//! String-level helpers for asset URIs and destination paths.
//!
//! Kept separate from the resolver so the URI rules (scheme detection, query stripping,
//! resource entry naming) can be tested without any collaborator in place.

mod bundle;
mod destination;
mod filters;

pub use bundle::{resource_entry_name, strip_file_scheme, strip_query};
pub use destination::{default_destination, file_name_of, parent_dir};
pub use filters::is_network_url;
