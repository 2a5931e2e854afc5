//! Discrete-event scheduler for tapedeck.
//!
//! Turns millisecond durations into a virtual tick stream advanced once
//! per host frame. Provides cancellable delayed callbacks with stable
//! FIFO ordering, and an adaptive throttle that lengthens the tick
//! period when the host cannot keep up with its frame budget.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod driver;
pub mod metrics;
pub mod queue;
pub mod scheduler;
pub mod throttle;

pub use config::{SchedulerConfig, ThrottleConfig};
pub use driver::{DriverReport, FrameDriver};
pub use metrics::SchedulerMetrics;
pub use scheduler::{Callback, Epoch, Scheduler, TickReport};
pub use throttle::FrameThrottle;
