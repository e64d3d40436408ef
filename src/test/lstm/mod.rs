pub mod test_tensor_preparation;
pub mod test_training;
