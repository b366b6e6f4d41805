//! Safe Exposure Engine
//!
//! Feature derivation and safe-exposure labeling for the adaptive UV & air
//! quality dashboard. The engine converts raw sensor/weather readings into a
//! fixed, versioned feature vector - identically at training time (historic
//! batches) and at inference time (one live reading) - and turns UV, PM2.5
//! and heat index into training labels via a rule-based budget.
//!
//! Data acquisition, CSV persistence, model training and the dashboard shell
//! live outside this crate; the trained model is consumed here as an opaque
//! ONNX artifact.

pub mod features;
pub mod label;
pub mod pipeline;
pub mod model;
pub mod predict;
pub mod sim;
