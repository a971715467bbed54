//! Command implementations for the myz CLI.

pub mod compress;
pub mod decompress;
pub mod info;
pub mod roundtrip;
pub mod test;

pub use compress::cmd_compress;
pub use decompress::cmd_decompress;
pub use info::cmd_info;
pub use roundtrip::cmd_roundtrip;
pub use test::cmd_test;
