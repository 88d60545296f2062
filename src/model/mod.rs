pub mod proto;
pub mod swagger;
