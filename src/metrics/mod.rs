//! Prometheus metrics for detection monitoring.
//!
//! # Metrics Exposed
//!
//! ## Counters
//! - `fomo_vision_frames_total` - Frames submitted for detection
//! - `fomo_vision_objects_total` - Objects detected
//! - `fomo_vision_input_errors_total` - Frames rejected before inference
//! - `fomo_vision_inference_errors_total` - Engine failures
//!
//! ## Last Result
//! - `fomo_vision_objects` - Objects in the most recent result
//! - `fomo_vision_found` - First-slot detection flag (1=found, 0=not found)
//!
//! ## Timing
//! - `fomo_vision_dsp_milliseconds` - Engine signal processing time
//! - `fomo_vision_classification_milliseconds` - Engine classification time
//! - `fomo_vision_wall_milliseconds` - Resample plus inference wall time
//!
//! # Example
//!
//! ```no_run
//! use fomo_vision::metrics::{MetricsRegistry, MetricsSnapshot};
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//!
//! let snapshot = MetricsSnapshot {
//!     frames_total: 100,
//!     objects_total: 42,
//!     objects: 1,
//!     found: true,
//!     ..Default::default()
//! };
//!
//! registry.update(&snapshot);
//! println!("{}", registry.encode().unwrap());
//! ```

mod collector;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
