pub mod chromium_driver;
pub mod driver;

pub use chromium_driver::ChromiumDriver;
pub use driver::UiDriver;
