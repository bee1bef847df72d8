pub mod flow;
pub mod locator;
pub mod period;
pub mod request;
pub mod step;

pub use flow::Flow;
pub use locator::{Locator, LocatorStrategy};
pub use period::{Month, Period, Year};
pub use request::{artifact_file_name, DownloadArtifact, ExtractionRequest};
pub use step::ActionStep;
