//! Report snapshot codec, shareable URLs, and the short-id report store.

pub mod codec;
pub mod share;
pub mod store;

pub use codec::{decode, decode_safe, encode};
pub use share::{classify_share_url, create_shareable_url, ShareUrlKind, ShareUrlShape};
pub use store::ReportStore;
