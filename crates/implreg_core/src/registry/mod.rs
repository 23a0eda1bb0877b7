//! Page-wide implementors registry and its late-registration protocol.
//!
//! # Responsibility
//! - Accept contributions from any number of independently loaded fragments.
//! - Hand them to exactly one consumer, whichever side finishes loading first.
//!
//! # Invariants
//! - `register` never fails and never drops a contribution once a consumer
//!   is installed.
//! - Delivery order equals `register` call order.
//! - Installing a consumer drains the pending holder; nothing is replayed to
//!   a replacement consumer.

pub mod implementors;
