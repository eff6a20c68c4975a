//! Follow-up jobs on a cleaned table: image re-hosting and document upload.

mod rehost;
mod upload;

pub use rehost::{
    IMAGE_CONTENT_TYPE, RehostOutcome, RehostReport, RehostTally, Rehoster, strip_zone_label,
};
pub use upload::{
    DOCUMENT_FIELDS, UploadReport, Uploader, document_from_record, list_documents, missing_columns,
};
