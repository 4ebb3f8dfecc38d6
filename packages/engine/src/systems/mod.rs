pub mod reseed;

pub use reseed::ReseedController;
