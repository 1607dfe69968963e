pub mod conversion_log;

pub use conversion_log::ConversionLog;
