// Input / output files
pub const PRICE_CSV_PATH: &str = "BTC-USD.csv";
pub const EXCHANGE_CSV_PATH: &str = "Gemini_BTCUSD_1h.csv";
pub const RESHAPED_SUFFIX: &str = "_output.csv";
pub const PLOT_PATH: &str = "btc_price_prediction.svg";
pub const REPORT_DIR: &str = "reports";

// Price CSV columns
pub const DATE_COLUMN: &str = "Date";
pub const CLOSE_COLUMN: &str = "Close";

// Windowing
pub const SEQUENCE_LENGTH: usize = 24; // Number of time steps to look back
pub const TEST_SIZE: usize = 48; // Trailing records held out for testing

// Model parameters
pub const LSTM_UNITS: usize = 4;
pub const DENSE_UNITS: usize = 12800;
pub const DENSE_LAYERS: usize = 4;

// Training
pub const LEARNING_RATE: f64 = 0.00001;
pub const EPOCHS: usize = 2500;
pub const SEED: u64 = 3600;

// Reshape layout
pub const EXCHANGE_HEADER_LINES: usize = 2;
pub const EXCHANGE_FIELD_COUNT: usize = 9;
pub const RESHAPE_PROJECTION: [usize; 6] = [1, 3, 4, 5, 6, 6];
pub const RESHAPED_HEADER: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Adj Close"];
