pub mod lstm;
pub mod test_utils;
