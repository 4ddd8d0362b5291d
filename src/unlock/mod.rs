pub mod ooxml;
pub mod pdf;
pub mod service;
pub mod xml;

pub use ooxml::OoxmlUnlocker;
pub use pdf::PdfUnlocker;
pub use service::{DocumentUnlocker, UnlockService};
pub use xml::XmlUnlocker;
