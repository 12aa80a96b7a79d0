pub mod arbiter;
