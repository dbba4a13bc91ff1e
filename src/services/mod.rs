pub mod dataset;
pub mod features;
pub mod prediction_service;
pub mod savings;
