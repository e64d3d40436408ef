pub mod config;
pub mod constants;
pub mod error;
pub mod pipeline;
#[cfg(test)]
pub mod test;

pub mod lstm {
    pub mod step_1_tensor_preparation;
    pub mod step_2_lstm_cell;
    pub mod step_3_lstm_model_arch;
    pub mod step_4_train_model;
    pub mod step_5_prediction;
}

pub mod util {
    pub mod csv_reshape;
    pub mod metrics;
    pub mod model_logger;
    pub mod plotting;
    pub mod pre_processor;
    pub mod scaler;
}

/// Build metadata generated by `build.rs`
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
