pub mod host;
pub mod site;

pub use host::TestHost;
pub use site::TestSite;
