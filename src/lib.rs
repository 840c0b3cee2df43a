//! Fixed-capacity ring buffer with depth insertion, and a harness that
//! checks it against a plain list model.
//!
//! ```
//! use ringcheck::RingBuf;
//!
//! let mut rb = RingBuf::new(10).unwrap();
//! for i in 0..5 {
//!     rb.put(i);
//! }
//! rb.insert(2, -1).unwrap();
//! assert_eq!(rb.snapshot(), vec![4, 3, -1, 2, 1, 0]);
//! ```

pub mod config;
pub mod error;
pub mod listify;
pub mod model;
pub mod report;
pub mod ring_buf;
pub mod stress;

pub use error::{ListifyError, RingBufError, StressError};
pub use ring_buf::RingBuf;
