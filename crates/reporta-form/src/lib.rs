//! Reporta Form Library
//!
//! The surrounding incident-report form: draft validation, national-ID
//! lookup, multipart submission, and the controller that ties the draft, the
//! evidence collection, and the camera session together.

pub mod controller;
pub mod lookup;
pub mod schema;
pub mod submit;

// Re-export commonly used types
pub use controller::FormController;
pub use lookup::{DniClient, IdentityInfo, IdentityLookup};
pub use submit::{ReportSubmitter, SubmitBackend, SubmitReceipt};
