//! Hosted backend collaborators
//!
//! The site talks to a hosted database service for exactly two things:
//! posting contact form submissions and fetching optional copy overrides.

pub mod contact;
pub mod content;
mod http;

pub use contact::{ContactFields, ContactForm, FormStatus, FormSubmitter, HttpSubmitter};
pub use content::{fetch_required, load_section_copy, ContentSource, Filter, HttpContentSource, Record, SectionCopy};
